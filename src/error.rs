//! Error types for the blog store and request handlers

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlogError {
    /// Backing file exists but cannot be read or parsed
    #[error("blog storage at '{}' is corrupt: {reason}", path.display())]
    StorageCorrupt { path: PathBuf, reason: String },

    /// Backing file cannot be written
    #[error("failed to write blog storage at '{}': {source}", path.display())]
    StorageWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no blog at index {index} (collection has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("missing required form field '{0}'")]
    MissingField(&'static str),
}

impl BlogError {
    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::StorageCorrupt {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StorageWriteError {
            path: path.into(),
            source,
        }
    }

    /// HTTP status code the handler layer reports for this error
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::StorageCorrupt { .. } | Self::StorageWriteError { .. } => 500,
            Self::IndexOutOfRange { .. } => 404,
            Self::MissingField(_) => 400,
        }
    }
}

pub type Result<T> = std::result::Result<T, BlogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(BlogError::corrupt("blogs.csv", "bad header").status_code(), 500);
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(BlogError::write("blogs.csv", io).status_code(), 500);
        assert_eq!(
            BlogError::IndexOutOfRange { index: 3, len: 2 }.status_code(),
            404
        );
        assert_eq!(BlogError::MissingField("title").status_code(), 400);
    }

    #[test]
    fn test_messages_name_the_problem() {
        let err = BlogError::corrupt("data/blogs.csv", "expected 11 columns, found 3");
        let msg = err.to_string();
        assert!(msg.contains("data/blogs.csv"));
        assert!(msg.contains("expected 11 columns"));

        let err = BlogError::IndexOutOfRange { index: 5, len: 2 };
        assert_eq!(err.to_string(), "no blog at index 5 (collection has 2)");
    }
}
