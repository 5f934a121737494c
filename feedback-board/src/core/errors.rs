use thiserror::Error;

use crate::storage::StoreError;

/// Coarse classification used by callers that map errors onto a transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Unauthorized,
    NotFound,
    Storage,
    Configuration,
}

/// Errors surfaced by the comment store, the session gate and the moderation engine.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Comment cannot be empty.")]
    EmptyContent,
    #[error("Comment is too long ({chars} characters, max 500).")]
    ContentTooLong { chars: usize },
    #[error("Invalid status '{0}' (expected pending, approved or rejected).")]
    InvalidStatus(String),
    #[error("Invalid status filter '{0}' (expected all, pending, approved or rejected).")]
    InvalidFilter(String),
    #[error("Nothing to update: provide a status or a reply.")]
    EmptyPatch,
    #[error("Not authorized.")]
    Unauthorized,
    #[error("Comment {0} not found.")]
    NotFound(String),
    #[error("Admin password is not configured.")]
    SecretNotConfigured,
    #[error("storage fault: {0}")]
    Storage(#[from] StoreError),
}

impl BoardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BoardError::EmptyContent
            | BoardError::ContentTooLong { .. }
            | BoardError::InvalidStatus(_)
            | BoardError::InvalidFilter(_)
            | BoardError::EmptyPatch => ErrorKind::Validation,
            BoardError::Unauthorized => ErrorKind::Unauthorized,
            BoardError::NotFound(_) => ErrorKind::NotFound,
            BoardError::SecretNotConfigured => ErrorKind::Configuration,
            BoardError::Storage(_) => ErrorKind::Storage,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}

pub type BoardResult<T> = Result<T, BoardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(BoardError::EmptyContent.kind(), ErrorKind::Validation);
        assert_eq!(BoardError::ContentTooLong { chars: 501 }.kind(), ErrorKind::Validation);
        assert_eq!(BoardError::InvalidStatus("done".into()).kind(), ErrorKind::Validation);
        assert_eq!(BoardError::Unauthorized.kind(), ErrorKind::Unauthorized);
        assert_eq!(BoardError::NotFound("x".into()).kind(), ErrorKind::NotFound);
        assert_eq!(BoardError::SecretNotConfigured.kind(), ErrorKind::Configuration);
        assert_eq!(BoardError::Storage(StoreError::Internal).kind(), ErrorKind::Storage);
    }

    #[test]
    fn too_long_message_names_limit() {
        let msg = BoardError::ContentTooLong { chars: 612 }.to_string();
        assert!(msg.contains("612"));
        assert!(msg.contains("500"));
    }
}
