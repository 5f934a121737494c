use std::str::FromStr;

use serde::Serialize;

use crate::core::comment::{Comment, CommentStatus, CommentStore};
use crate::core::errors::{BoardError, BoardResult};

/// Status narrowing for the public feed. Absent means `All`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(CommentStatus),
}

impl StatusFilter {
    pub fn admits(&self, comment: &Comment) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => comment.status == *status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "all" => Ok(StatusFilter::All),
            other => {
                other.parse::<CommentStatus>().map(StatusFilter::Only).map_err(|_| BoardError::InvalidFilter(other.to_string()))
            }
        }
    }
}

/// Non-deleted comments admitted by `filter`, newest first.
pub fn public_feed(comments: &CommentStore, filter: StatusFilter) -> BoardResult<Vec<Comment>> {
    Ok(comments.list_visible()?.into_iter().filter(|c| filter.admits(c)).collect())
}

/// Who a record is rendered for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Audience {
    Public,
    Admin,
}

impl Audience {
    pub fn from_admin(is_admin: bool) -> Self {
        if is_admin {
            Audience::Admin
        } else {
            Audience::Public
        }
    }
}

/// A comment as shown to anonymous readers: no submitter address, no
/// deletion flag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicComment {
    pub id: String,
    pub content: String,
    pub nickname: String,
    pub avatar: String,
    pub status: CommentStatus,
    pub reply: Option<String>,
    pub category: Option<String>,
    pub created_at: u64,
}

impl From<Comment> for PublicComment {
    fn from(c: Comment) -> Self {
        Self {
            id: c.id,
            content: c.content,
            nickname: c.nickname,
            avatar: c.avatar,
            status: c.status,
            reply: c.reply,
            category: c.category,
            created_at: c.created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CommentView {
    Public(PublicComment),
    Full(Comment),
}

impl CommentView {
    pub fn render(comment: Comment, audience: Audience) -> Self {
        match audience {
            Audience::Public => CommentView::Public(comment.into()),
            Audience::Admin => CommentView::Full(comment),
        }
    }
}
