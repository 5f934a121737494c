use std::sync::Arc;

use log::info;

use crate::auth::{Gate, SharedSecretGate};
use crate::clock::{SharedClock, SystemClock};
use crate::config::BoardConfig;
use crate::core::{public_feed, BoardResult, Comment, CommentStore, Moderator, StatusFilter};
use crate::storage::{new_store, Store, StoreError};

/// Comment store, session gate and moderation engine wired to one clock.
#[derive(Clone)]
pub struct Board {
    comments: CommentStore,
    gate: Gate,
    moderator: Moderator,
}

impl Board {
    pub fn new(store: Store, clock: SharedClock, secret: Option<String>) -> Self {
        let comments = CommentStore::new(store, clock.clone());
        let gate: Gate = Arc::new(SharedSecretGate::new(secret, clock));
        let moderator = Moderator::new(comments.clone(), gate.clone());
        Self { comments, gate, moderator }
    }

    /// Opens the configured backend with the system clock.
    pub fn open(config: &BoardConfig) -> Result<Self, StoreError> {
        let store = new_store(config.storage, &config.db_path)?;
        info!("board opened with {:?} storage", config.storage);
        Ok(Self::new(store, Arc::new(SystemClock), config.admin_password.clone()))
    }

    pub fn comments(&self) -> &CommentStore {
        &self.comments
    }

    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    pub fn moderator(&self) -> &Moderator {
        &self.moderator
    }

    pub fn is_admin(&self, token: Option<&str>) -> bool {
        self.gate.verify(token)
    }

    /// Feed for a raw filter value such as a query parameter; `None` means all.
    pub fn public_feed(&self, filter: Option<&str>) -> BoardResult<Vec<Comment>> {
        let filter: StatusFilter = filter.unwrap_or_default().parse()?;
        public_feed(&self.comments, filter)
    }
}
