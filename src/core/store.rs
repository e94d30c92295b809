//! Reading persistence: one pretty JSON file per record, or in memory

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use sha2::{Digest, Sha256};

use crate::types::ReadingRecord;
use crate::OraklError;

/// Where finished readings go
pub trait ReadingStore: Send + Sync {
    /// Persist a record, returning its id
    fn save(&self, record: &ReadingRecord) -> Result<String, OraklError>;

    /// Look a record up; Ok(None) when it does not exist
    fn load(&self, id: &str) -> Result<Option<ReadingRecord>, OraklError>;
}

/// SHA-256 hex over the question and signs, NUL separated
pub fn input_digest(question: &str, signs: &[String]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(question.as_bytes());
    for sign in signs {
        hasher.update([0u8]);
        hasher.update(sign.as_bytes());
    }
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Ids are uuids; anything else never reaches the filesystem
fn valid_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Directory of `<id>.json` files, created on first save
#[derive(Debug, Clone)]
pub struct FileReadingStore {
    dir: PathBuf,
}

impl FileReadingStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }
}

impl ReadingStore for FileReadingStore {
    fn save(&self, record: &ReadingRecord) -> Result<String, OraklError> {
        if !valid_id(&record.id) {
            return Err(OraklError::Store(format!("invalid id {:?}", record.id)));
        }

        let json = serde_json::to_string_pretty(record)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(&record.id), json)?;

        Ok(record.id.clone())
    }

    fn load(&self, id: &str) -> Result<Option<ReadingRecord>, OraklError> {
        if !valid_id(id) {
            return Ok(None);
        }

        let path = self.path_for(id);
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryReadingStore {
    records: RwLock<HashMap<String, ReadingRecord>>,
}

impl MemoryReadingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ReadingStore for MemoryReadingStore {
    fn save(&self, record: &ReadingRecord) -> Result<String, OraklError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| OraklError::Store("reading store lock poisoned".to_string()))?;
        records.insert(record.id.clone(), record.clone());
        Ok(record.id.clone())
    }

    fn load(&self, id: &str) -> Result<Option<ReadingRecord>, OraklError> {
        let records = self
            .records
            .read()
            .map_err(|_| OraklError::Store("reading store lock poisoned".to_string()))?;
        Ok(records.get(id).cloned())
    }
}
