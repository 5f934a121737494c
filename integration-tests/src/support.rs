use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use feedback_board::clock::ManualClock;
use feedback_board::core::Comment;
use feedback_board::profile::Profile;
use feedback_board::storage::{new_store, StoreBackend};
use feedback_board::Board;
use tempfile::TempDir;

pub const ADMIN_PASSWORD: &str = "moderator-secret";
/// 2024-01-01T00:00:00Z
pub const START_MS: u64 = 1_704_067_200_000;

pub const BACKENDS: [StoreBackend; 2] = [StoreBackend::Memory, StoreBackend::Sled];

/// A board on a manual clock. Keeps the sled directory alive for its lifetime.
pub struct TestBoard {
    pub board: Board,
    pub clock: Arc<ManualClock>,
    dir: TempDir,
}

impl TestBoard {
    pub fn new(backend: StoreBackend) -> Self {
        Self::with_secret(backend, Some(ADMIN_PASSWORD))
    }

    pub fn with_secret(backend: StoreBackend, secret: Option<&str>) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = new_store(backend, &dir.path().join("board.db")).expect("open store");
        let clock = ManualClock::new(START_MS);
        let board = Board::new(store, clock.clone(), secret.map(str::to_string));
        Self { board, clock, dir }
    }

    pub fn login(&self) -> String {
        self.board.gate().login(ADMIN_PASSWORD).expect("admin login").as_str().to_string()
    }

    /// Creates a comment one second after the previous clock reading.
    pub fn post(&self, content: &str) -> Comment {
        self.clock.advance(Duration::from_secs(1));
        self.board.comments().create(content, profile(), "198.51.100.4").expect("create comment")
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

pub fn profile() -> Profile {
    Profile { nickname: "Harper Koala".to_string(), avatar: "https://api.dicebear.com/7.x/notionists/svg?seed=h".to_string() }
}
