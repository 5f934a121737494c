use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use borsh::{BorshDeserialize, BorshSerialize};
use clap::ValueEnum;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::core::comment::{Comment, CommentPatch, CommentStatus};

pub const COMMENT_SCHEMA_VERSION: u32 = 1;
const META_TREE: &str = "__meta";
const COMMENTS_TREE: &str = "comments";
const SCHEMA_KEY: &[u8] = b"schema_version";

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("internal error")]
    Internal,
    #[error("comment id {0} already exists")]
    Duplicate(String),
    #[error("I/O error while preparing comment storage: {0}")]
    Io(#[from] std::io::Error),
    #[error("database error: {0}")]
    Db(#[from] sled::Error),
    #[error("unsupported comment schema version {found}")]
    UnsupportedVersion { found: u32 },
    #[error("invalid comment schema marker")]
    InvalidSchemaMarker,
    #[error("failed to serialize comment record")]
    Serialize,
    #[error("failed to deserialize comment record")]
    Deserialize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    #[default]
    Sled,
}

pub type Store = Arc<dyn StoreTrait + Send + Sync + 'static>;

/// Raw comment table. `None`/`false` results mean "absent or soft-deleted".
pub trait StoreTrait {
    fn insert(&self, comment: &Comment) -> Result<(), StoreError>;
    fn list_visible(&self) -> Result<Vec<Comment>, StoreError>;
    fn get(&self, id: &str) -> Result<Option<Comment>, StoreError>;
    fn update(&self, id: &str, patch: &CommentPatch) -> Result<Option<Comment>, StoreError>;
    fn soft_delete(&self, id: &str) -> Result<bool, StoreError>;

    fn stats(&self) -> Result<StoreStats, StoreError>;

    fn flush(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub total: usize,
    pub visible: usize,
    pub deleted: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl StoreStats {
    fn count(&mut self, comment: &Comment) {
        self.total += 1;
        if comment.is_deleted {
            self.deleted += 1;
            return;
        }
        self.visible += 1;
        match comment.status {
            CommentStatus::Pending => self.pending += 1,
            CommentStatus::Approved => self.approved += 1,
            CommentStatus::Rejected => self.rejected += 1,
        }
    }
}

/// A stored comment plus its insertion sequence, used to order equal timestamps.
#[derive(Clone, Debug, BorshSerialize, BorshDeserialize)]
struct Row {
    seq: u64,
    comment: Comment,
}

fn newest_first(rows: impl Iterator<Item = Row>) -> Vec<Comment> {
    rows.filter(|row| !row.comment.is_deleted)
        .sorted_by(|a, b| (b.comment.created_at, b.seq).cmp(&(a.comment.created_at, a.seq)))
        .map(|row| row.comment)
        .collect()
}

pub fn new_store(backend: StoreBackend, db_path: &Path) -> Result<Store, StoreError> {
    match backend {
        StoreBackend::Memory => Ok(Arc::new(Mem::default())),
        StoreBackend::Sled => Ok(Arc::new(SledStore::open(db_path)?)),
    }
}

// ================= In-memory backend =================

#[derive(Default)]
struct MemTable {
    rows: HashMap<String, Row>, // id -> row
    next_seq: u64,
}

#[derive(Default)]
struct Mem {
    table: Mutex<MemTable>,
}

impl StoreTrait for Mem {
    fn insert(&self, comment: &Comment) -> Result<(), StoreError> {
        let mut table = self.table.lock().map_err(|_| StoreError::Internal)?;
        if table.rows.contains_key(&comment.id) {
            return Err(StoreError::Duplicate(comment.id.clone()));
        }
        let seq = table.next_seq;
        table.next_seq += 1;
        table.rows.insert(comment.id.clone(), Row { seq, comment: comment.clone() });
        Ok(())
    }

    fn list_visible(&self) -> Result<Vec<Comment>, StoreError> {
        let table = self.table.lock().map_err(|_| StoreError::Internal)?;
        Ok(newest_first(table.rows.values().cloned()))
    }

    fn get(&self, id: &str) -> Result<Option<Comment>, StoreError> {
        let table = self.table.lock().map_err(|_| StoreError::Internal)?;
        Ok(table.rows.get(id).filter(|row| !row.comment.is_deleted).map(|row| row.comment.clone()))
    }

    fn update(&self, id: &str, patch: &CommentPatch) -> Result<Option<Comment>, StoreError> {
        let mut table = self.table.lock().map_err(|_| StoreError::Internal)?;
        match table.rows.get_mut(id) {
            Some(row) if !row.comment.is_deleted => {
                patch.apply_to(&mut row.comment);
                Ok(Some(row.comment.clone()))
            }
            _ => Ok(None),
        }
    }

    fn soft_delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut table = self.table.lock().map_err(|_| StoreError::Internal)?;
        match table.rows.get_mut(id) {
            Some(row) if !row.comment.is_deleted => {
                row.comment.is_deleted = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn stats(&self) -> Result<StoreStats, StoreError> {
        let table = self.table.lock().map_err(|_| StoreError::Internal)?;
        let mut stats = StoreStats::default();
        table.rows.values().for_each(|row| stats.count(&row.comment));
        Ok(stats)
    }
}

// ================= sled backend =================

pub struct SledStore {
    db: sled::Db,
    tree: sled::Tree,
}

impl SledStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let db = sled::Config::new().path(path).open()?;
        ensure_schema(&db)?;
        let tree = db.open_tree(COMMENTS_TREE)?;
        Ok(Self { db, tree })
    }

    pub fn schema_version(&self) -> Result<u32, StoreError> {
        let meta = self.db.open_tree(META_TREE)?;
        let Some(raw) = meta.get(SCHEMA_KEY)? else {
            return Err(StoreError::InvalidSchemaMarker);
        };
        decode_version(&raw)
    }

    fn decode_row(bytes: &[u8]) -> Result<Row, StoreError> {
        Row::try_from_slice(bytes).map_err(|_| StoreError::Deserialize)
    }

    fn encode_row(row: &Row) -> Result<Vec<u8>, StoreError> {
        borsh::to_vec(row).map_err(|_| StoreError::Serialize)
    }

    fn rows(&self) -> impl Iterator<Item = Result<Row, StoreError>> + '_ {
        self.tree.iter().map(|entry| {
            let (_key, value) = entry?;
            Self::decode_row(&value)
        })
    }

    /// Read-modify-write of one live row. Concurrent writers race through
    /// compare-and-swap, so the last successful swap wins and no write is torn.
    fn modify(&self, id: &str, change: impl Fn(&mut Comment)) -> Result<Option<Comment>, StoreError> {
        loop {
            let Some(current) = self.tree.get(id)? else {
                return Ok(None);
            };
            let mut row = Self::decode_row(&current)?;
            if row.comment.is_deleted {
                return Ok(None);
            }
            change(&mut row.comment);
            let next = Self::encode_row(&row)?;
            if self.tree.compare_and_swap(id, Some(&current[..]), Some(next))?.is_ok() {
                self.tree.flush()?;
                return Ok(Some(row.comment));
            }
        }
    }
}

impl StoreTrait for SledStore {
    fn insert(&self, comment: &Comment) -> Result<(), StoreError> {
        let row = Row { seq: self.db.generate_id()?, comment: comment.clone() };
        let bytes = Self::encode_row(&row)?;
        if self.tree.compare_and_swap(comment.id.as_str(), None as Option<&[u8]>, Some(bytes))?.is_err() {
            return Err(StoreError::Duplicate(comment.id.clone()));
        }
        self.tree.flush()?;
        Ok(())
    }

    fn list_visible(&self) -> Result<Vec<Comment>, StoreError> {
        let rows: Vec<Row> = self.rows().collect::<Result<_, _>>()?;
        Ok(newest_first(rows.into_iter()))
    }

    fn get(&self, id: &str) -> Result<Option<Comment>, StoreError> {
        let Some(bytes) = self.tree.get(id)? else { return Ok(None) };
        let row = Self::decode_row(&bytes)?;
        Ok(Some(row.comment).filter(|comment| !comment.is_deleted))
    }

    fn update(&self, id: &str, patch: &CommentPatch) -> Result<Option<Comment>, StoreError> {
        self.modify(id, |comment| patch.apply_to(comment))
    }

    fn soft_delete(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.modify(id, |comment| comment.is_deleted = true)?.is_some())
    }

    fn stats(&self) -> Result<StoreStats, StoreError> {
        let mut stats = StoreStats::default();
        for row in self.rows() {
            stats.count(&row?.comment);
        }
        Ok(stats)
    }

    fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }
}

fn decode_version(raw: &[u8]) -> Result<u32, StoreError> {
    let arr: [u8; 4] = raw.try_into().map_err(|_| StoreError::InvalidSchemaMarker)?;
    Ok(u32::from_le_bytes(arr))
}

fn ensure_schema(db: &sled::Db) -> Result<(), StoreError> {
    let meta = db.open_tree(META_TREE)?;
    let from_version = match meta.get(SCHEMA_KEY)? {
        Some(raw) => decode_version(&raw)?,
        None => 0,
    };
    if from_version > COMMENT_SCHEMA_VERSION {
        return Err(StoreError::UnsupportedVersion { found: from_version });
    }
    if from_version < COMMENT_SCHEMA_VERSION {
        run_migrations(db, from_version)?;
        meta.insert(SCHEMA_KEY, COMMENT_SCHEMA_VERSION.to_le_bytes().to_vec())?;
        db.flush()?;
    }
    Ok(())
}

fn run_migrations(db: &sled::Db, from_version: u32) -> Result<(), StoreError> {
    match from_version {
        0 => {
            db.open_tree(COMMENTS_TREE)?;
            Ok(())
        }
        v if v == COMMENT_SCHEMA_VERSION => Ok(()),
        v => Err(StoreError::UnsupportedVersion { found: v }),
    }
}
