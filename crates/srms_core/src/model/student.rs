//! Student result record.
//!
//! # Responsibility
//! - Define the persisted shape of one student's semester result.
//! - Refresh and fall back on cached derived metrics.
//!
//! # Invariants
//! - `id` is opaque and unique within one store document.
//! - Cached metrics, when present, equal `compute_result(&marks)` at save
//!   time; readers recompute when a cached value is absent.

use crate::grading::{compute_result, LetterGrade, PassStatus, ResultSummary};
use crate::model::catalog::Semester;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque student identifier.
///
/// Kept as a plain string so identifiers written by older builds (short
/// random tokens) load unchanged.
pub type StudentId = String;

/// Generates a fresh random student identifier.
pub fn generate_student_id() -> StudentId {
    Uuid::new_v4().simple().to_string()
}

/// One student's marks for one branch/semester, plus cached results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: StudentId,
    pub name: String,
    pub roll_no: String,
    /// Branch code, e.g. `BCA`.
    pub branch: String,
    pub semester: Semester,
    /// Marks aligned with the catalog subject list for `(branch, semester)`.
    pub marks: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cgpa: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<LetterGrade>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PassStatus>,
}

impl StudentRecord {
    /// Creates a record with a caller-provided id and freshly cached metrics.
    pub fn with_id(
        id: impl Into<StudentId>,
        name: impl Into<String>,
        roll_no: impl Into<String>,
        branch: impl Into<String>,
        semester: Semester,
        marks: Vec<f64>,
    ) -> Self {
        let mut record = Self {
            id: id.into(),
            name: name.into(),
            roll_no: roll_no.into(),
            branch: branch.into(),
            semester,
            marks,
            cgpa: None,
            grade: None,
            status: None,
        };
        record.refresh_derived();
        record
    }

    /// Recomputes and caches `cgpa`, `grade` and `status` from `marks`.
    pub fn refresh_derived(&mut self) -> ResultSummary {
        let summary = compute_result(&self.marks);
        self.cgpa = Some(summary.cgpa);
        self.grade = Some(summary.grade);
        self.status = Some(summary.status);
        summary
    }

    /// Recomputes metrics from marks, ignoring cached values.
    pub fn computed_result(&self) -> ResultSummary {
        compute_result(&self.marks)
    }

    /// Cached CGPA when valid, otherwise recomputed.
    pub fn effective_cgpa(&self) -> f64 {
        match self.cgpa {
            Some(cgpa) if cgpa.is_finite() => cgpa,
            _ => self.computed_result().cgpa,
        }
    }

    /// Cached grade when present, otherwise recomputed.
    pub fn effective_grade(&self) -> LetterGrade {
        self.grade.unwrap_or_else(|| self.computed_result().grade)
    }

    /// Cached status when present, otherwise recomputed.
    pub fn effective_status(&self) -> PassStatus {
        self.status.unwrap_or_else(|| self.computed_result().status)
    }
}
