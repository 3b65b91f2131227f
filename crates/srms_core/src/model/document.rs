//! Persisted store document.

use crate::model::catalog::SubjectCatalog;
use crate::model::student::StudentRecord;
use serde::{Deserialize, Serialize};

/// Whole persisted state: student list plus subject catalog.
///
/// Owned by exactly one store/service per process and written back after
/// every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    pub students: Vec<StudentRecord>,
    pub subjects: SubjectCatalog,
}

impl Default for StoreDocument {
    /// First-run document: no students, built-in catalog.
    fn default() -> Self {
        Self {
            students: Vec::new(),
            subjects: SubjectCatalog::with_defaults(),
        }
    }
}

impl StoreDocument {
    pub fn find_student(&self, id: &str) -> Option<&StudentRecord> {
        self.students.iter().find(|student| student.id == id)
    }

    /// Replaces the record with the same id, or appends it.
    ///
    /// Returns `true` when an existing record was replaced.
    pub fn upsert_student(&mut self, record: StudentRecord) -> bool {
        match self.students.iter_mut().find(|student| student.id == record.id) {
            Some(existing) => {
                *existing = record;
                true
            }
            None => {
                self.students.push(record);
                false
            }
        }
    }

    /// Removes every record with `id`; returns whether anything was removed.
    pub fn remove_student(&mut self, id: &str) -> bool {
        let before = self.students.len();
        self.students.retain(|student| student.id != id);
        self.students.len() != before
    }
}
