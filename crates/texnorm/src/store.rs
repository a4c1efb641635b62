//! Capability boundary to the host application's record store.
//!
//! texnorm never owns record persistence; it only needs to look up
//! archive-bearing attachments and append a tag after a successful
//! run. Hosts implement [`RecordStore`]; [`MemoryStore`] is an
//! in-memory stand-in used by the tests.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::StoreError;

pub const ZIP_CONTENT_TYPE: &str = "application/zip";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub enum RecordKind {
    /// A file-bearing attachment record.
    Attachment {
        content_type: String,
        title: String,
        file_path: Option<PathBuf>,
    },
    /// A container record whose children may hold the archive.
    Container,
}

#[derive(Debug, Clone)]
pub struct Record {
    pub id: RecordId,
    pub kind: RecordKind,
}

impl Record {
    /// Returns the attachment's file path when this record is a zip
    /// attachment whose title contains `marker`.
    pub fn matching_archive(&self, marker: &str) -> Option<&Path> {
        match &self.kind {
            RecordKind::Attachment {
                content_type,
                title,
                file_path,
            } if content_type == ZIP_CONTENT_TYPE && title.contains(marker) => {
                file_path.as_deref()
            }
            _ => None,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self.kind, RecordKind::Container)
    }
}

pub trait RecordStore: Send + Sync {
    fn get(&self, id: &RecordId) -> Result<Record, StoreError>;

    /// Child records of a container, in the host's order.
    fn children(&self, id: &RecordId) -> Vec<Record>;

    fn add_tag(&self, id: &RecordId, tag: &str) -> Result<(), StoreError>;

    fn save(&self, id: &RecordId) -> Result<(), StoreError>;
}

#[derive(Default)]
struct MemoryInner {
    records: HashMap<RecordId, Record>,
    children: HashMap<RecordId, Vec<RecordId>>,
    tags: HashMap<RecordId, Vec<String>>,
    saves: HashMap<RecordId, usize>,
}

/// In-memory [`RecordStore`] used by tests and embedding hosts that
/// have no real store.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_attachment(
        &self,
        id: &str,
        title: &str,
        content_type: &str,
        file_path: Option<PathBuf>,
    ) -> RecordId {
        let record_id = RecordId::new(id);
        let record = Record {
            id: record_id.clone(),
            kind: RecordKind::Attachment {
                content_type: content_type.to_string(),
                title: title.to_string(),
                file_path,
            },
        };
        self.inner
            .lock()
            .expect("store lock")
            .records
            .insert(record_id.clone(), record);
        record_id
    }

    pub fn insert_container(&self, id: &str, child_ids: &[RecordId]) -> RecordId {
        let record_id = RecordId::new(id);
        let record = Record {
            id: record_id.clone(),
            kind: RecordKind::Container,
        };
        let mut inner = self.inner.lock().expect("store lock");
        inner.records.insert(record_id.clone(), record);
        inner
            .children
            .insert(record_id.clone(), child_ids.to_vec());
        record_id
    }

    pub fn tags(&self, id: &RecordId) -> Vec<String> {
        self.inner
            .lock()
            .expect("store lock")
            .tags
            .get(id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn save_count(&self, id: &RecordId) -> usize {
        self.inner
            .lock()
            .expect("store lock")
            .saves
            .get(id)
            .copied()
            .unwrap_or(0)
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, id: &RecordId) -> Result<Record, StoreError> {
        self.inner
            .lock()
            .expect("store lock")
            .records
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn children(&self, id: &RecordId) -> Vec<Record> {
        let inner = self.inner.lock().expect("store lock");
        inner
            .children
            .get(id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|child| inner.records.get(child).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn add_tag(&self, id: &RecordId, tag: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store lock");
        if !inner.records.contains_key(id) {
            return Err(StoreError::NotFound(id.to_string()));
        }
        let tags = inner.tags.entry(id.clone()).or_default();
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
        Ok(())
    }

    fn save(&self, id: &RecordId) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store lock");
        if !inner.records.contains_key(id) {
            return Err(StoreError::NotFound(id.to_string()));
        }
        *inner.saves.entry(id.clone()).or_insert(0) += 1;
        Ok(())
    }
}
