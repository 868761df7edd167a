use thiserror::Error;

use crate::content::models::CommentId;
use crate::content::models::PostId;
use crate::domain::errors::ErrorKind;

/// Error for post and comment text validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContentTextError {
    #[error("Content is required")]
    Blank,

    #[error("Content too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Top-level error for post and comment operations
#[derive(Debug, Clone, Error)]
pub enum ContentError {
    #[error("Invalid post content: {0}")]
    InvalidPostContent(ContentTextError),

    #[error("Invalid comment content: {0}")]
    InvalidCommentContent(ContentTextError),

    #[error("Post not found: {0}")]
    PostNotFound(PostId),

    #[error("Comment not found: {0}")]
    CommentNotFound(CommentId),

    #[error("Not allowed to modify this {0}")]
    Forbidden(&'static str),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ContentError {
    /// Category the HTTP boundary maps to a status code.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ContentError::InvalidPostContent(_) | ContentError::InvalidCommentContent(_) => {
                ErrorKind::Validation
            }
            ContentError::PostNotFound(_) | ContentError::CommentNotFound(_) => {
                ErrorKind::NotFound
            }
            ContentError::Forbidden(_) => ErrorKind::Forbidden,
            ContentError::DatabaseError(_) | ContentError::Unknown(_) => ErrorKind::Internal,
        }
    }

    pub fn field(&self) -> Option<&'static str> {
        match self {
            ContentError::InvalidPostContent(_) | ContentError::InvalidCommentContent(_) => {
                Some("content")
            }
            _ => None,
        }
    }
}

impl From<anyhow::Error> for ContentError {
    fn from(err: anyhow::Error) -> Self {
        ContentError::Unknown(err.to_string())
    }
}
