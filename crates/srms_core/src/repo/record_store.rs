//! Record store over key-value storage.
//!
//! # Responsibility
//! - Read/write the JSON store document under one storage key.
//! - Emit metadata-only `store_*` logging events.
//!
//! # Invariants
//! - `load` never returns an error.
//! - `load(save(doc)) == normalize_document(to_value(doc))`.
//! - Student names and marks never reach the log.

use crate::model::catalog::{Semester, SubjectCatalog};
use crate::model::document::StoreDocument;
use crate::repo::normalize::normalize_document_with_report;
use crate::storage::{KeyValueStorage, StorageError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "SRMS_DATA_V1";

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure while writing the store document.
#[derive(Debug)]
pub enum StoreError {
    Storage(StorageError),
    Serialize(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "failed to persist store document: {err}"),
            Self::Serialize(err) => write!(f, "failed to serialize store document: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Record store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordStoreConfig {
    /// Key the whole document is stored under.
    pub storage_key: String,
}

impl Default for RecordStoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// Loads and saves the store document through a storage backend.
pub struct RecordStore<S: KeyValueStorage> {
    storage: S,
    config: RecordStoreConfig,
}

impl<S: KeyValueStorage> RecordStore<S> {
    /// Creates a store using the default storage key.
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, RecordStoreConfig::default())
    }

    pub fn with_config(storage: S, config: RecordStoreConfig) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &RecordStoreConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Releases the underlying storage backend.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Reads the persisted document, normalizing it into typed form.
    ///
    /// Missing, unreadable, unparsable or structurally invalid data yields
    /// `StoreDocument::default()` (no students, built-in catalog).
    pub fn load(&self) -> StoreDocument {
        let key = self.config.storage_key.as_str();
        let raw = match self.storage.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("event=store_load module=store status=first_run");
                return StoreDocument::default();
            }
            Err(err) => {
                warn!(
                    "event=store_load module=store status=fallback error_code=storage_read_failed error={err}"
                );
                return StoreDocument::default();
            }
        };

        let value = match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "event=store_load module=store status=fallback error_code=invalid_json bytes={} error={err}",
                    raw.len()
                );
                return StoreDocument::default();
            }
        };

        let (document, report) = normalize_document_with_report(value);
        if report.is_clean() {
            info!(
                "event=store_load module=store status=ok students={}",
                document.students.len()
            );
        } else {
            warn!(
                "event=store_load module=store status=repaired students={} document_reset={} students_reset={} catalog_reset={} dropped_students={} dropped_catalog_entries={}",
                document.students.len(),
                report.document_reset,
                report.students_reset,
                report.catalog_reset,
                report.dropped_students,
                report.dropped_catalog_entries
            );
        }
        document
    }

    /// Serializes `document` and overwrites the persisted copy.
    ///
    /// # Errors
    /// - `StoreError::Serialize` when the document cannot be encoded.
    /// - `StoreError::Storage` when the backend rejects the write; the
    ///   caller's in-memory document is left as is.
    pub fn save(&mut self, document: &StoreDocument) -> StoreResult<()> {
        let encoded = serde_json::to_string(document)?;
        match self
            .storage
            .set_item(self.config.storage_key.as_str(), encoded.as_str())
        {
            Ok(()) => {
                info!(
                    "event=store_save module=store status=ok students={} bytes={}",
                    document.students.len(),
                    encoded.len()
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=store_save module=store status=error error_code=storage_write_failed bytes={} error={err}",
                    encoded.len()
                );
                Err(err.into())
            }
        }
    }
}

/// Returns the live subject list for `(branch, semester)`, populating it
/// from the built-in catalog when absent.
pub fn ensure_subject_list<'a>(
    catalog: &'a mut SubjectCatalog,
    branch: &str,
    semester: Semester,
) -> &'a mut Vec<String> {
    catalog.ensure_subject_list(branch, semester)
}
