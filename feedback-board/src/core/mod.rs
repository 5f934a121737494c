pub mod comment;
pub mod commands;
pub mod errors;
pub mod moderation;
pub mod visibility;

pub use comment::{validate_content, Comment, CommentPatch, CommentStatus, CommentStore, MAX_CONTENT_CHARS};
pub use commands::{ModerationCommand, ModerationOutcome};
pub use errors::{BoardError, BoardResult, ErrorKind};
pub use moderation::{AdminGrant, Moderator};
pub use visibility::{public_feed, Audience, CommentView, PublicComment, StatusFilter};
