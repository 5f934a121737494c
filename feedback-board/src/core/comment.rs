use std::fmt;
use std::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::SharedClock;
use crate::core::errors::{BoardError, BoardResult};
use crate::profile::Profile;
use crate::storage::{Store, StoreStats};

pub const MAX_CONTENT_CHARS: usize = 500;

/// Moderation state of a comment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl CommentStatus {
    pub const ALL: [CommentStatus; 3] = [CommentStatus::Pending, CommentStatus::Approved, CommentStatus::Rejected];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommentStatus::Pending => "pending",
            CommentStatus::Approved => "approved",
            CommentStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for CommentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommentStatus {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommentStatus::ALL.into_iter().find(|status| status.as_str() == s).ok_or_else(|| BoardError::InvalidStatus(s.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub nickname: String,
    pub avatar: String,
    pub ip: String,
    pub status: CommentStatus,
    pub reply: Option<String>,
    pub category: Option<String>,
    pub is_deleted: bool,
    /// Milliseconds since the Unix epoch.
    pub created_at: u64,
}

/// Partial update restricted to the admin-mutable fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommentPatch {
    pub status: Option<CommentStatus>,
    /// `Some(None)` clears the reply.
    pub reply: Option<Option<String>>,
}

impl CommentPatch {
    pub fn status(status: CommentStatus) -> Self {
        Self { status: Some(status), reply: None }
    }

    /// An empty reply text clears the reply.
    pub fn reply(text: impl Into<String>) -> Self {
        Self { status: None, reply: Some(normalize_reply(text.into())) }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.reply.is_none()
    }

    pub fn apply_to(&self, comment: &mut Comment) {
        if let Some(status) = self.status {
            comment.status = status;
        }
        if let Some(reply) = &self.reply {
            comment.reply = reply.clone();
        }
    }
}

pub(crate) fn normalize_reply(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

pub fn validate_content(content: &str) -> BoardResult<()> {
    if content.trim().is_empty() {
        return Err(BoardError::EmptyContent);
    }
    let chars = content.chars().count();
    if chars > MAX_CONTENT_CHARS {
        return Err(BoardError::ContentTooLong { chars });
    }
    Ok(())
}

/// The comment table: validation and lookup semantics over a storage backend.
#[derive(Clone)]
pub struct CommentStore {
    store: Store,
    clock: SharedClock,
}

impl CommentStore {
    pub fn new(store: Store, clock: SharedClock) -> Self {
        Self { store, clock }
    }

    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    pub fn create(&self, content: &str, profile: Profile, ip: &str) -> BoardResult<Comment> {
        validate_content(content)?;
        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            content: content.to_string(),
            nickname: profile.nickname,
            avatar: profile.avatar,
            ip: ip.to_string(),
            status: CommentStatus::Pending,
            reply: None,
            category: None,
            is_deleted: false,
            created_at: self.clock.now_ms(),
        };
        self.store.insert(&comment)?;
        info!("comment created: id={} chars={}", comment.id, comment.content.chars().count());
        Ok(comment)
    }

    /// Non-deleted comments, newest first.
    pub fn list_visible(&self) -> BoardResult<Vec<Comment>> {
        Ok(self.store.list_visible()?)
    }

    pub fn get(&self, id: &str) -> BoardResult<Comment> {
        self.store.get(id)?.ok_or_else(|| BoardError::NotFound(id.to_string()))
    }

    pub fn update(&self, id: &str, patch: &CommentPatch) -> BoardResult<Comment> {
        self.store.update(id, patch)?.ok_or_else(|| BoardError::NotFound(id.to_string()))
    }

    pub fn soft_delete(&self, id: &str) -> BoardResult<()> {
        if self.store.soft_delete(id)? {
            Ok(())
        } else {
            Err(BoardError::NotFound(id.to_string()))
        }
    }

    pub fn stats(&self) -> BoardResult<StoreStats> {
        Ok(self.store.stats()?)
    }

    pub fn flush(&self) -> BoardResult<()> {
        Ok(self.store.flush()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::{new_store, StoreBackend};
    use std::path::Path;

    fn profile() -> Profile {
        Profile { nickname: "Quinn Otter".into(), avatar: "https://api.dicebear.com/7.x/micah/svg?seed=q".into() }
    }

    fn store() -> CommentStore {
        let store = new_store(StoreBackend::Memory, Path::new("unused")).unwrap();
        CommentStore::new(store, ManualClock::new(5_000))
    }

    #[test]
    fn status_parses_only_known_values() {
        assert_eq!("approved".parse::<CommentStatus>().unwrap(), CommentStatus::Approved);
        assert_eq!("pending".parse::<CommentStatus>().unwrap(), CommentStatus::Pending);
        assert!(matches!("Approved".parse::<CommentStatus>(), Err(BoardError::InvalidStatus(_))));
        assert!(matches!("".parse::<CommentStatus>(), Err(BoardError::InvalidStatus(_))));
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&CommentStatus::Rejected).unwrap(), "\"rejected\"");
    }

    #[test]
    fn content_limits_count_characters() {
        assert!(validate_content("a").is_ok());
        assert!(validate_content(&"a".repeat(500)).is_ok());
        // 500 multi-byte characters are still within the limit
        assert!(validate_content(&"反".repeat(500)).is_ok());
        assert!(matches!(validate_content(&"a".repeat(501)), Err(BoardError::ContentTooLong { chars: 501 })));
        assert!(matches!(validate_content(""), Err(BoardError::EmptyContent)));
        assert!(matches!(validate_content("  \n\t"), Err(BoardError::EmptyContent)));
    }

    #[test]
    fn create_starts_pending_and_visible() {
        let comments = store();
        let c = comments.create("Love the new firmware", profile(), "10.0.0.1").unwrap();
        assert_eq!(c.status, CommentStatus::Pending);
        assert!(!c.is_deleted);
        assert_eq!(c.reply, None);
        assert_eq!(c.category, None);
        assert_eq!(c.created_at, 5_000);
        assert_eq!(comments.get(&c.id).unwrap(), c);
    }

    #[test]
    fn rejected_content_stores_nothing() {
        let comments = store();
        assert!(comments.create("", profile(), "ip").is_err());
        assert!(comments.create(&"x".repeat(501), profile(), "ip").is_err());
        assert!(comments.list_visible().unwrap().is_empty());
        assert_eq!(comments.stats().unwrap().total, 0);
    }

    #[test]
    fn patch_applies_only_given_fields() {
        let comments = store();
        let c = comments.create("hello", profile(), "ip").unwrap();
        let updated = comments.update(&c.id, &CommentPatch::reply("Thanks!")).unwrap();
        assert_eq!(updated.reply.as_deref(), Some("Thanks!"));
        assert_eq!(updated.status, CommentStatus::Pending);

        let updated = comments.update(&c.id, &CommentPatch::status(CommentStatus::Approved)).unwrap();
        assert_eq!(updated.status, CommentStatus::Approved);
        assert_eq!(updated.reply.as_deref(), Some("Thanks!"));

        let cleared = comments.update(&c.id, &CommentPatch::reply("")).unwrap();
        assert_eq!(cleared.reply, None);
        assert_eq!(cleared.status, CommentStatus::Approved);
    }

    #[test]
    fn deleted_comment_is_gone_for_good() {
        let comments = store();
        let c = comments.create("bye", profile(), "ip").unwrap();
        comments.soft_delete(&c.id).unwrap();
        assert!(matches!(comments.get(&c.id), Err(BoardError::NotFound(_))));
        assert!(matches!(comments.update(&c.id, &CommentPatch::reply("x")), Err(BoardError::NotFound(_))));
        assert!(matches!(comments.soft_delete(&c.id), Err(BoardError::NotFound(_))));
        assert!(matches!(comments.soft_delete("missing"), Err(BoardError::NotFound(_))));
        let stats = comments.stats().unwrap();
        assert_eq!((stats.total, stats.visible, stats.deleted), (1, 0, 1));
    }
}
