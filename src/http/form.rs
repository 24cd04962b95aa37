//! Request body decoding
//!
//! Buffers the body up to a size limit and decodes
//! `application/x-www-form-urlencoded` fields.

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BodyError {
    #[error("request body exceeds {0} bytes")]
    TooLarge(usize),
    #[error("failed to read request body: {0}")]
    Read(String),
}

/// Collect the whole body, failing once more than `limit` bytes arrive
pub async fn read_body<B>(body: B, limit: usize) -> Result<Bytes, BodyError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => Err(BodyError::TooLarge(limit)),
        Err(e) => Err(BodyError::Read(e.to_string())),
    }
}

/// Decode urlencoded fields. When a name repeats, the first value wins.
pub fn parse_form(body: &[u8]) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    for (name, value) in form_urlencoded::parse(body).into_owned() {
        fields.entry(name).or_insert(value);
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::Full;

    #[test]
    fn test_parse_form_decodes() {
        let fields = parse_form(b"author=Ada&title=Hello+there&tags=x%2C+y&blogpost=a%26b");
        assert_eq!(fields["author"], "Ada");
        assert_eq!(fields["title"], "Hello there");
        assert_eq!(fields["tags"], "x, y");
        assert_eq!(fields["blogpost"], "a&b");
    }

    #[test]
    fn test_parse_form_first_value_wins() {
        let fields = parse_form(b"tags=a&tags=b&empty=");
        assert_eq!(fields["tags"], "a");
        assert_eq!(fields["empty"], "");
        assert!(!fields.contains_key("missing"));
    }

    #[tokio::test]
    async fn test_read_body_within_limit() {
        let body = Full::new(Bytes::from_static(b"author=Ada"));
        let bytes = read_body(body, 64).await.unwrap();
        assert_eq!(&bytes[..], b"author=Ada");
    }

    #[tokio::test]
    async fn test_read_body_over_limit() {
        let body = Full::new(Bytes::from(vec![b'a'; 100]));
        assert!(matches!(
            read_body(body, 10).await,
            Err(BodyError::TooLarge(10))
        ));
    }
}
