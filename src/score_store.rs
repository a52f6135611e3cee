use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::app_dirs::AppDirs;
use crate::catalog::Difficulty;
use crate::error::StoreError;

/// Fixed identifier the score log is stored under
pub const STORAGE_KEY: &str = "code_typing_scores";
pub const DEFAULT_RETENTION: usize = 50;

/// Result of one completed snippet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub username: String,
    pub wpm: u32,
    pub accuracy: u8,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
}

impl ScoreRecord {
    pub fn new(username: impl Into<String>, wpm: u32, accuracy: u8, difficulty: Difficulty) -> Self {
        Self {
            username: username.into(),
            wpm,
            accuracy,
            difficulty,
            recorded_at: Some(Utc::now()),
        }
    }
}

/// Where the score log lives between runs
pub trait ScoreBackend {
    /// Anything unreadable loads as an empty log
    fn load(&self) -> Vec<ScoreRecord>;
    fn save(&self, records: &[ScoreRecord]) -> Result<(), StoreError>;
}

/// JSON array on disk
#[derive(Debug, Clone)]
pub struct FileScoreBackend {
    path: PathBuf,
}

impl FileScoreBackend {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::scores_path()
            .unwrap_or_else(|| PathBuf::from(format!("{STORAGE_KEY}.json")));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreBackend for FileScoreBackend {
    fn load(&self) -> Vec<ScoreRecord> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_slice::<Vec<ScoreRecord>>(&bytes) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    "ignoring unreadable score log {}: {}",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    fn save(&self, records: &[ScoreRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(records)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

/// In-memory backend. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreBackend {
    records: Rc<RefCell<Vec<ScoreRecord>>>,
}

impl MemoryScoreBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ScoreRecord>) -> Self {
        Self {
            records: Rc::new(RefCell::new(records)),
        }
    }

    pub fn saved(&self) -> Vec<ScoreRecord> {
        self.records.borrow().clone()
    }
}

impl ScoreBackend for MemoryScoreBackend {
    fn load(&self) -> Vec<ScoreRecord> {
        self.records.borrow().clone()
    }

    fn save(&self, records: &[ScoreRecord]) -> Result<(), StoreError> {
        *self.records.borrow_mut() = records.to_vec();
        Ok(())
    }
}

/// Newest-first, capped log of completed attempts
#[derive(Debug)]
pub struct ScoreStore<B: ScoreBackend> {
    backend: B,
    records: Vec<ScoreRecord>,
    retention: usize,
}

impl<B: ScoreBackend> ScoreStore<B> {
    pub fn open(backend: B, retention: usize) -> Self {
        let mut records = backend.load();
        records.truncate(retention);
        Self {
            backend,
            records,
            retention,
        }
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recent `depth` records, by recency rather than score
    pub fn leaderboard(&self, depth: usize) -> &[ScoreRecord] {
        &self.records[..depth.min(self.records.len())]
    }

    /// Puts the record first, evicts past the retention cap and writes the
    /// whole list back. The in-memory log is updated even if the write fails.
    pub fn append(&mut self, record: ScoreRecord) -> Result<(), StoreError> {
        self.records.insert(0, record);
        self.records.truncate(self.retention);
        self.backend.save(&self.records)
    }

    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.records.clear();
        self.backend.save(&self.records)
    }
}
