use log::{info, warn};

use crate::auth::Gate;
use crate::core::commands::{ModerationCommand, ModerationOutcome};
use crate::core::comment::{normalize_reply, Comment, CommentStatus, CommentStore};
use crate::core::errors::{BoardError, BoardResult};

/// Proof that the caller presented a live admin session.
#[derive(Debug)]
pub struct AdminGrant {
    _private: (),
}

/// Admin-only operations on comments. Every entry point checks the session
/// first, then the arguments, and only then touches the store, so a caller
/// without a session learns nothing about which ids exist.
#[derive(Clone)]
pub struct Moderator {
    comments: CommentStore,
    gate: Gate,
}

impl Moderator {
    pub fn new(comments: CommentStore, gate: Gate) -> Self {
        Self { comments, gate }
    }

    pub fn authorize(&self, token: Option<&str>) -> BoardResult<AdminGrant> {
        if self.gate.verify(token) {
            Ok(AdminGrant { _private: () })
        } else {
            Err(BoardError::Unauthorized)
        }
    }

    pub fn execute(&self, _grant: &AdminGrant, id: &str, cmd: ModerationCommand) -> BoardResult<ModerationOutcome> {
        let result = match cmd.as_patch() {
            Some(patch) if patch.is_empty() => Err(BoardError::EmptyPatch),
            Some(patch) => self.comments.update(id, &patch).map(ModerationOutcome::Updated),
            None => self.comments.soft_delete(id).map(|()| ModerationOutcome::Deleted),
        };
        match &result {
            Ok(ModerationOutcome::Updated(c)) => {
                info!("moderation {} on {id}: status={} reply={}", cmd.command_type(), c.status, c.reply.is_some())
            }
            Ok(ModerationOutcome::Deleted) => info!("moderation {} on {id}: deleted", cmd.command_type()),
            Err(e) => warn!("moderation {} on {id} failed: {e}", cmd.command_type()),
        }
        result
    }

    pub fn set_status(&self, token: Option<&str>, id: &str, status: &str) -> BoardResult<Comment> {
        let grant = self.authorize(token)?;
        let status: CommentStatus = status.parse()?;
        updated(id, self.execute(&grant, id, ModerationCommand::SetStatus { status })?)
    }

    /// An empty `text` clears the reply. Status is left alone.
    pub fn set_reply(&self, token: Option<&str>, id: &str, text: &str) -> BoardResult<Comment> {
        let grant = self.authorize(token)?;
        let reply = normalize_reply(text.to_string());
        updated(id, self.execute(&grant, id, ModerationCommand::SetReply { reply })?)
    }

    /// Status and reply in one update; at least one must be given.
    pub fn apply_patch(
        &self,
        token: Option<&str>,
        id: &str,
        status: Option<&str>,
        reply: Option<Option<String>>,
    ) -> BoardResult<Comment> {
        let grant = self.authorize(token)?;
        let status = status.map(str::parse::<CommentStatus>).transpose()?;
        let reply = reply.map(|r| r.and_then(normalize_reply));
        updated(id, self.execute(&grant, id, ModerationCommand::Patch { status, reply })?)
    }

    pub fn delete_comment(&self, token: Option<&str>, id: &str) -> BoardResult<()> {
        let grant = self.authorize(token)?;
        self.execute(&grant, id, ModerationCommand::Delete).map(|_| ())
    }
}

fn updated(id: &str, outcome: ModerationOutcome) -> BoardResult<Comment> {
    match outcome {
        ModerationOutcome::Updated(comment) => Ok(comment),
        ModerationOutcome::Deleted => Err(BoardError::NotFound(id.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{SessionGate, SharedSecretGate};
    use crate::clock::ManualClock;
    use crate::profile::Profile;
    use crate::storage::{new_store, StoreBackend};
    use std::path::Path;
    use std::sync::Arc;

    fn setup() -> (Moderator, CommentStore, String) {
        let clock = ManualClock::new(1_000);
        let comments = CommentStore::new(new_store(StoreBackend::Memory, Path::new("unused")).unwrap(), clock.clone());
        let gate = Arc::new(SharedSecretGate::new(Some("pw".into()), clock));
        let token = gate.login("pw").unwrap().as_str().to_string();
        (Moderator::new(comments.clone(), gate), comments, token)
    }

    fn comment(comments: &CommentStore) -> Comment {
        comments.create("Nice board", Profile { nickname: "Sam Fox".into(), avatar: "a".into() }, "1.2.3.4").unwrap()
    }

    #[test]
    fn status_transitions_are_unconstrained() {
        let (moderator, comments, token) = setup();
        let c = comment(&comments);
        for status in ["approved", "rejected", "pending", "pending", "approved"] {
            let updated = moderator.set_status(Some(&token), &c.id, status).unwrap();
            assert_eq!(updated.status.as_str(), status);
            assert_eq!(comments.get(&c.id).unwrap(), updated);
        }
    }

    #[test]
    fn unauthorized_wins_over_validation_and_existence() {
        let (moderator, comments, _) = setup();
        let c = comment(&comments);
        assert!(matches!(moderator.set_status(None, "missing", "bogus"), Err(BoardError::Unauthorized)));
        assert!(matches!(moderator.set_status(Some("forged"), &c.id, "approved"), Err(BoardError::Unauthorized)));
        assert!(matches!(moderator.set_reply(None, &c.id, "hi"), Err(BoardError::Unauthorized)));
        assert!(matches!(moderator.delete_comment(Some("forged"), "missing"), Err(BoardError::Unauthorized)));
        assert_eq!(comments.get(&c.id).unwrap(), c);
    }

    #[test]
    fn validation_wins_over_existence() {
        let (moderator, _, token) = setup();
        assert!(matches!(moderator.set_status(Some(&token), "missing", "done"), Err(BoardError::InvalidStatus(_))));
        assert!(matches!(moderator.apply_patch(Some(&token), "missing", None, None), Err(BoardError::EmptyPatch)));
        assert!(matches!(moderator.set_status(Some(&token), "missing", "approved"), Err(BoardError::NotFound(_))));
    }

    #[test]
    fn reply_leaves_status_and_empty_clears() {
        let (moderator, comments, token) = setup();
        let c = comment(&comments);
        moderator.set_status(Some(&token), &c.id, "rejected").unwrap();
        let replied = moderator.set_reply(Some(&token), &c.id, "We hear you").unwrap();
        assert_eq!(replied.reply.as_deref(), Some("We hear you"));
        assert_eq!(replied.status, CommentStatus::Rejected);
        let replaced = moderator.set_reply(Some(&token), &c.id, "Fixed in 1.2").unwrap();
        assert_eq!(replaced.reply.as_deref(), Some("Fixed in 1.2"));
        let cleared = moderator.set_reply(Some(&token), &c.id, "").unwrap();
        assert_eq!(cleared.reply, None);
    }

    #[test]
    fn patch_sets_both_fields() {
        let (moderator, comments, token) = setup();
        let c = comment(&comments);
        let updated = moderator.apply_patch(Some(&token), &c.id, Some("approved"), Some(Some("Thanks".into()))).unwrap();
        assert_eq!(updated.status, CommentStatus::Approved);
        assert_eq!(updated.reply.as_deref(), Some("Thanks"));
        let cleared = moderator.apply_patch(Some(&token), &c.id, None, Some(Some(String::new()))).unwrap();
        assert_eq!(cleared.reply, None);
        assert_eq!(cleared.status, CommentStatus::Approved);
    }

    #[test]
    fn delete_twice_is_not_found() {
        let (moderator, comments, token) = setup();
        let c = comment(&comments);
        moderator.delete_comment(Some(&token), &c.id).unwrap();
        assert!(matches!(moderator.delete_comment(Some(&token), &c.id), Err(BoardError::NotFound(_))));
        assert!(matches!(moderator.set_status(Some(&token), &c.id, "approved"), Err(BoardError::NotFound(_))));
    }
}
