use serde::{Deserialize, Serialize};

use crate::core::comment::{Comment, CommentPatch, CommentStatus};

/// Admin actions on a single comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModerationCommand {
    /// Overwrite the moderation status; any state may move to any other
    SetStatus { status: CommentStatus },
    /// Set the public reply; `None` clears it
    SetReply { reply: Option<String> },
    /// Status and reply together, in one store update
    Patch { status: Option<CommentStatus>, reply: Option<Option<String>> },
    /// Soft delete
    Delete,
}

impl ModerationCommand {
    /// Get the command type as a string for logging
    pub fn command_type(&self) -> &'static str {
        match self {
            ModerationCommand::SetStatus { .. } => "SetStatus",
            ModerationCommand::SetReply { .. } => "SetReply",
            ModerationCommand::Patch { .. } => "Patch",
            ModerationCommand::Delete => "Delete",
        }
    }

    /// The record change this command makes, `None` for deletion.
    pub fn as_patch(&self) -> Option<CommentPatch> {
        match self {
            ModerationCommand::SetStatus { status } => Some(CommentPatch::status(*status)),
            ModerationCommand::SetReply { reply } => Some(CommentPatch { status: None, reply: Some(reply.clone()) }),
            ModerationCommand::Patch { status, reply } => Some(CommentPatch { status: *status, reply: reply.clone() }),
            ModerationCommand::Delete => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationOutcome {
    Updated(Comment),
    Deleted,
}
