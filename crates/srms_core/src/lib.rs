//! Core domain logic for the student result manager.
//! This crate is the single source of truth for grading rules and
//! record-store invariants.

pub mod db;
pub mod grading;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;

pub use grading::{
    compute_result, grade_from_cgpa, grade_point, LetterGrade, PassStatus, ResultSummary,
    MAX_MARKS_PER_SUBJECT, PASS_MARKS_PER_SUBJECT,
};
pub use logging::{
    default_log_level, init_logging, init_logging_with, logging_status, LoggingConfig,
};
pub use model::catalog::{semesters_for_branch, Semester, SubjectCatalog};
pub use model::document::StoreDocument;
pub use model::student::{StudentId, StudentRecord};
pub use repo::normalize::normalize_document;
pub use repo::record_store::{
    ensure_subject_list, RecordStore, RecordStoreConfig, StoreError, StoreResult,
    DEFAULT_STORAGE_KEY,
};
pub use service::query::{ResultStats, StudentDetail, StudentFilter, SubjectRow};
pub use service::result_service::{ResultService, SaveOutcome, ServiceError, ServiceResult};
pub use service::validation::{FieldError, StudentDraft, ValidationErrors};
pub use storage::{KeyValueStorage, MemoryStorage, SqliteStorage, StorageError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
