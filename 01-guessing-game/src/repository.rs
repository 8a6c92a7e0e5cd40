//! High score persistence behind a trait, with a JSON file implementation and an in-memory one.
//! Saves are unconditional; deciding whether a score is good enough is done by `record_if_best`.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::models::{GameError, HighScoreRecord, Result};

/// File name of the persisted record inside the data directory.
pub const HIGH_SCORE_FILE: &str = "HighScoreData.json";

pub trait HighScoreStore: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet; `CorruptData` when the stored text does not parse.
    fn load(&self) -> Result<Option<HighScoreRecord>>;
    /// Overwrites whatever is stored.
    fn save(&self, score: u32, achieved_at: DateTime<Utc>) -> Result<()>;
}

/// Record kept as a pretty-printed JSON document on disk.
#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    /// Store at `<data_dir>/HighScoreData.json`.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self { Self::new(data_dir.as_ref().join(HIGH_SCORE_FILE)) }

    pub fn path(&self) -> &Path { &self.path }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn load(&self) -> Result<Option<HighScoreRecord>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(GameError::Persistence(format!("reading {}: {e}", self.path.display()))),
        };
        let record = HighScoreRecord::from_document(&text)
            .map_err(|e| GameError::CorruptData(format!("{}: {e}", self.path.display())))?;
        debug!(path = %self.path.display(), score = record.score, "high score loaded");
        Ok(Some(record))
    }

    fn save(&self, score: u32, achieved_at: DateTime<Utc>) -> Result<()> {
        let document = HighScoreRecord::new(score, achieved_at).to_document()?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        // Write the sibling then rename so readers never see a half-written record; a failed rename removes the sibling.
        let tmp = self.temp_path();
        fs::write(&tmp, document)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(GameError::Persistence(format!("replacing {}: {e}", self.path.display())));
        }
        info!(path = %self.path.display(), score, "high score saved");
        Ok(())
    }
}

/// Keeps the serialized document in memory so loads go through the same parsing as files.
#[derive(Debug, Default, Clone)]
pub struct InMemoryHighScoreStore {
    inner: Arc<RwLock<Option<String>>>,
}

impl InMemoryHighScoreStore {
    pub fn new() -> Self { Self::default() }

    /// Seeds the store with raw text, e.g. to simulate a damaged file.
    pub fn with_document(text: impl Into<String>) -> Self {
        Self { inner: Arc::new(RwLock::new(Some(text.into()))) }
    }

    /// The stored document, if any.
    pub fn document(&self) -> Option<String> {
        self.inner.read().ok().and_then(|d| d.clone())
    }
}

impl HighScoreStore for InMemoryHighScoreStore {
    fn load(&self) -> Result<Option<HighScoreRecord>> {
        let doc = self.inner.read().map_err(|e| GameError::Persistence(e.to_string()))?;
        doc.as_deref().map(HighScoreRecord::from_document).transpose()
    }

    fn save(&self, score: u32, achieved_at: DateTime<Utc>) -> Result<()> {
        let document = HighScoreRecord::new(score, achieved_at).to_document()?;
        let mut doc = self.inner.write().map_err(|e| GameError::Persistence(e.to_string()))?;
        *doc = Some(document);
        Ok(())
    }
}

/// Picks a store implementation.
#[derive(Debug, Clone)]
pub struct StoreFactory;

impl StoreFactory {
    pub fn file(data_dir: impl AsRef<Path>) -> Arc<dyn HighScoreStore> { Arc::new(FileHighScoreStore::in_dir(data_dir)) }
    pub fn in_memory() -> Arc<dyn HighScoreStore> { Arc::new(InMemoryHighScoreStore::new()) }
}

/// What `record_if_best` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScoreUpdate {
    /// The record that was stored before this evaluation.
    pub previous: Option<HighScoreRecord>,
    /// Whether `attempts` was written as the new record.
    pub is_new_record: bool,
}

/// Saves `attempts` only when no record exists or it uses strictly fewer attempts.
pub fn record_if_best(store: &dyn HighScoreStore, attempts: u32, achieved_at: DateTime<Utc>) -> Result<HighScoreUpdate> {
    let previous = store.load()?;
    let is_new_record = previous.as_ref().is_none_or(|r| r.is_beaten_by(attempts));
    if is_new_record {
        store.save(attempts, achieved_at)?;
    }
    Ok(HighScoreUpdate { previous, is_new_record })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> { Utc.with_ymd_and_hms(2025, 4, 1, h, 0, 0).unwrap() }

    #[test]
    fn empty_in_memory_store_loads_none() {
        let store = InMemoryHighScoreStore::new();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn in_memory_save_overwrites_unconditionally() {
        let store = InMemoryHighScoreStore::new();
        store.save(3, at(1)).unwrap();
        store.save(9, at(2)).unwrap();
        assert_eq!(store.load().unwrap(), Some(HighScoreRecord::new(9, at(2))));
    }

    #[test]
    fn corrupt_document_surfaces_error() {
        let store = InMemoryHighScoreStore::with_document("not json");
        assert!(matches!(store.load(), Err(GameError::CorruptData(_))));
    }

    #[test]
    fn record_if_best_writes_first_score() {
        let store = InMemoryHighScoreStore::new();
        let update = record_if_best(&store, 6, at(1)).unwrap();
        assert_eq!(update, HighScoreUpdate { previous: None, is_new_record: true });
        assert_eq!(store.load().unwrap().unwrap().score, 6);
    }

    #[test]
    fn record_if_best_keeps_ties() {
        let store = InMemoryHighScoreStore::new();
        store.save(4, at(1)).unwrap();
        let update = record_if_best(&store, 4, at(2)).unwrap();
        assert!(!update.is_new_record);
        assert_eq!(store.load().unwrap(), Some(HighScoreRecord::new(4, at(1))));
    }

    #[test]
    fn record_if_best_propagates_corruption_without_writing() {
        let store = InMemoryHighScoreStore::with_document("{");
        assert!(matches!(record_if_best(&store, 1, at(1)), Err(GameError::CorruptData(_))));
        assert_eq!(store.document().as_deref(), Some("{"));
    }

    #[test]
    fn factory_in_memory_round_trips() {
        let store = StoreFactory::in_memory();
        store.save(2, at(3)).unwrap();
        assert_eq!(store.load().unwrap(), Some(HighScoreRecord::new(2, at(3))));
    }
}
