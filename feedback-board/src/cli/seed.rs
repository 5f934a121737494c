use log::info;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::board::Board;
use crate::config::BoardConfig;
use crate::core::{BoardError, BoardResult, Comment};
use crate::profile::local_profile;
use crate::storage::{StoreBackend, StoreError};

const SEED_IP: &str = "127.0.0.1";

const SAMPLE_CONTENTS: &[&str] = &[
    "The app feels smooth, nice experience!",
    "Please support more wallet types.",
    "The interface is a bit plain, could use some polish.",
    "Support replied really fast, thumbs up!",
    "Some features are hard to find, the navigation could be better.",
    "Security feels solid, I trust it.",
    "Some of the English copy reads awkwardly.",
    "The mobile layout could be improved.",
    "Hit a couple of small bugs but overall it works well.",
    "Would love more languages, especially Japanese and Korean.",
    "Official replies are quick and the community is friendly.",
    "Updates ship often, you can tell the team cares.",
    "Loading is sometimes slow, performance could be better.",
    "More tutorials and docs would help newcomers.",
    "The UI has real design sense, love it!",
    "Lots of features but the flows are a little complex.",
    "The backup flow is clear and reassuring.",
    "A problem I reported was fixed quickly.",
    "Hope to see integrations with more apps.",
    "Very happy overall, will recommend to friends!",
    "I have been using this for a while and the experience keeps getting better. The latest update made the interface \
     cleaner and everything feels faster. Hope the team keeps shipping improvements at this pace!",
    "As a newcomer I was a bit lost at first, but the docs and the community helped a lot. Some video tutorials would \
     make onboarding much easier for people like me.",
    "Had a transfer stuck once, contacted support and it was sorted out right away. Great service.",
    "Please add more personalization, such as theme switching and font size settings, so different users can adjust it \
     to their needs.",
    "Some entry points are hidden deep in menus. Shortcuts on the home screen would make it much easier to use.",
];

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("refusing to seed the memory backend; the comments would be lost on exit (use --storage sled)")]
    Ephemeral,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Opens the configured on-disk board and seeds it.
pub fn run(config: &BoardConfig, count: usize) -> Result<Vec<Comment>, SeedError> {
    if config.storage == StoreBackend::Memory {
        return Err(SeedError::Ephemeral);
    }
    let board = Board::open(config)?;
    Ok(seed(&board, count)?)
}

/// Inserts `count` comments with random sample content and local profiles.
pub fn seed(board: &Board, count: usize) -> BoardResult<Vec<Comment>> {
    let comments = board.comments();
    let mut rng = rand::thread_rng();
    let mut created = Vec::with_capacity(count);
    for _ in 0..count {
        let content = SAMPLE_CONTENTS.choose(&mut rng).copied().unwrap_or(SAMPLE_CONTENTS[0]);
        let profile = local_profile(comments.clock().now_ms());
        created.push(comments.create(content, profile, SEED_IP)?);
    }
    comments.flush()?;
    info!("seeded {} comments", created.len());
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::core::{validate_content, CommentStatus};
    use crate::storage::{new_store, StoreBackend};
    use std::path::Path;

    #[test]
    fn samples_are_valid_content() {
        for sample in SAMPLE_CONTENTS {
            validate_content(sample).unwrap();
        }
    }

    #[test]
    fn seeds_pending_local_comments() {
        let board = Board::new(new_store(StoreBackend::Memory, Path::new("unused")).unwrap(), ManualClock::new(1), None);
        let created = seed(&board, 5).unwrap();
        assert_eq!(created.len(), 5);
        assert!(created.iter().all(|c| c.ip == SEED_IP && c.status == CommentStatus::Pending));
        assert_eq!(board.public_feed(None).unwrap().len(), 5);
    }

    #[test]
    fn run_refuses_memory_backend() {
        let config = BoardConfig { storage: StoreBackend::Memory, ..Default::default() };
        assert!(matches!(run(&config, 3), Err(SeedError::Ephemeral)));
    }

    #[test]
    fn run_persists_to_default_backend() {
        let dir = tempfile::tempdir().unwrap();
        let config = BoardConfig { db_path: dir.path().join("seeded.db"), ..Default::default() };
        assert_eq!(config.storage, StoreBackend::Sled);
        assert_eq!(run(&config, 4).unwrap().len(), 4);
        let reopened = Board::open(&config).unwrap();
        assert_eq!(reopened.public_feed(None).unwrap().len(), 4);
    }
}
