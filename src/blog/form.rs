// Create/edit form submission

use std::collections::HashMap;

use crate::error::{BlogError, Result};

/// Required fields of a create or edit submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogForm {
    pub author: String,
    pub title: String,
    pub body: String,
    /// Raw tag text; split per route by `parse_create_tags` / `parse_edit_tags`
    pub tags: String,
}

impl BlogForm {
    /// Build from decoded form fields. A field that is present but empty is
    /// accepted; an absent one is `MissingField`.
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self> {
        let take = |name: &'static str| {
            fields
                .get(name)
                .cloned()
                .ok_or(BlogError::MissingField(name))
        };

        Ok(Self {
            author: take("author")?,
            title: take("title")?,
            body: take("blogpost")?,
            tags: take("tags")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_from_fields() {
        let form = BlogForm::from_fields(&fields(&[
            ("author", "Ada"),
            ("title", "Hello"),
            ("blogpost", "World"),
            ("tags", "x, y"),
        ]))
        .unwrap();
        assert_eq!(form.author, "Ada");
        assert_eq!(form.body, "World");
        assert_eq!(form.tags, "x, y");
    }

    #[test]
    fn test_empty_values_are_present() {
        let form = BlogForm::from_fields(&fields(&[
            ("author", ""),
            ("title", ""),
            ("blogpost", ""),
            ("tags", ""),
        ]))
        .unwrap();
        assert!(form.title.is_empty());
    }

    #[test]
    fn test_missing_field() {
        let err = BlogForm::from_fields(&fields(&[
            ("author", "Ada"),
            ("title", "Hello"),
            ("tags", "x"),
        ]))
        .unwrap_err();
        assert!(matches!(err, BlogError::MissingField("blogpost")));
    }
}
