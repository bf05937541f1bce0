use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::media::MediaType;

pub const EDITED_PROMPT_PREFIX: &str = "[Edited] ";
const RECORD_ID_PREFIX: &str = "item-";
const TEMP_SUFFIX: &str = "tmp";

static RECORD_SEQUENCE: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("record id is empty")]
    MissingRecordId,
    #[error("record {id} already exists")]
    DuplicateRecord { id: String },
    #[error("history serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub type HistoryResult<T> = std::result::Result<T, HistoryError>;

/// One generated or edited media item, persisted verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub url: String,
    pub prompt: String,
    #[serde(rename = "timestamp")]
    pub timestamp_millis: u64,
    pub aspect_ratio: String,
}

impl HistoryRecord {
    /// New image record derived from an edit of `source`.
    ///
    /// The aspect-ratio tag is copied from `source` even when the crop
    /// changed the real ratio of the pixels behind `url`.
    pub fn derived_from_edit(source: &HistoryRecord, url: String) -> Self {
        Self {
            id: next_record_id(),
            media_type: MediaType::Image,
            url,
            prompt: format!("{EDITED_PROMPT_PREFIX}{}", source.prompt),
            timestamp_millis: now_millis(),
            aspect_ratio: source.aspect_ratio.clone(),
        }
    }
}

pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}

pub fn next_record_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    let sequence = RECORD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{RECORD_ID_PREFIX}{nanos}-{sequence}")
}

/// Newest-first list of records, mirrored to a JSON file after each change.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    path: Option<PathBuf>,
    records: Vec<HistoryRecord>,
}

impl HistoryStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Loads the list at `path`; a missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match load_records(&path) {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(
                    ?err,
                    path = %path.display(),
                    "failed to load history; starting empty"
                );
                Vec::new()
            }
        };
        tracing::info!(count = records.len(), path = %path.display(), "history loaded");
        Self {
            path: Some(path),
            records,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&HistoryRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Inserts `record` at the front (newest first).
    ///
    /// Every mutation is undone in memory when the file cannot be written.
    pub fn push(&mut self, record: HistoryRecord) -> HistoryResult<()> {
        if record.id.is_empty() {
            return Err(HistoryError::MissingRecordId);
        }
        if self.get(&record.id).is_some() {
            return Err(HistoryError::DuplicateRecord { id: record.id });
        }
        tracing::debug!(
            id = %record.id,
            media = record.media_type.label(),
            "history record added"
        );
        self.records.insert(0, record);
        if let Err(err) = self.persist() {
            self.records.remove(0);
            return Err(err);
        }
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> HistoryResult<Option<HistoryRecord>> {
        let Some(index) = self.records.iter().position(|record| record.id == id) else {
            return Ok(None);
        };
        let removed = self.records.remove(index);
        if let Err(err) = self.persist() {
            self.records.insert(index, removed);
            return Err(err);
        }
        Ok(Some(removed))
    }

    pub fn clear(&mut self) -> HistoryResult<()> {
        let previous = std::mem::take(&mut self.records);
        if let Err(err) = self.persist() {
            self.records = previous;
            return Err(err);
        }
        Ok(())
    }

    fn persist(&self) -> HistoryResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let payload = serde_json::to_vec(&self.records)?;
        write_replace(path, &payload)?;
        Ok(())
    }
}

fn load_records(path: &Path) -> HistoryResult<Vec<HistoryRecord>> {
    match fs::read(path) {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(err) => Err(HistoryError::Io(err)),
    }
}

fn write_replace(destination: &Path, payload: &[u8]) -> io::Result<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }
    let staging = destination.with_extension(TEMP_SUFFIX);
    fs::write(&staging, payload)?;
    fs::rename(&staging, destination)
}
