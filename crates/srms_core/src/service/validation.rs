//! Field-level input validation for service commands.
//!
//! # Invariants
//! - Validation never mutates the store document.
//! - Every failing field is reported, not just the first one.

use crate::grading::MAX_MARKS_PER_SUBJECT;
use crate::model::catalog::{semesters_for_branch, Semester, KNOWN_BRANCHES};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

pub const FIELD_NAME: &str = "name";
pub const FIELD_ROLL_NO: &str = "rollNo";
pub const FIELD_BRANCH: &str = "branch";
pub const FIELD_SEMESTER: &str = "semester";
pub const FIELD_SUBJECTS: &str = "subjects";
pub const FIELD_MARKS: &str = "marks";
pub const FIELD_SUBJECT_NAME: &str = "subjectName";

/// One user-facing validation message bound to an input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Non-empty set of field errors returned by a rejected command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// First message reported for `field`, if any.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }

    /// Comma-separated field names, for metadata-only logging.
    pub fn field_list(&self) -> String {
        self.errors
            .iter()
            .map(|error| error.field)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Converts into `Err(self)` when any error was collected.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let messages = self
            .errors
            .iter()
            .map(|error| format!("{}: {}", error.field, error.message))
            .collect::<Vec<_>>();
        write!(f, "validation failed: {}", messages.join("; "))
    }
}

impl Error for ValidationErrors {}

/// Student form input before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentDraft {
    pub name: String,
    pub roll_no: String,
    pub branch: String,
    pub semester: Option<Semester>,
    /// One entry per configured subject, in catalog order.
    pub marks: Vec<f64>,
}

/// Collapses inner whitespace runs and trims a subject name.
pub fn normalize_subject_name(raw: &str) -> String {
    WHITESPACE_RE.replace_all(raw.trim(), " ").into_owned()
}

/// Checks that `branch` is offered and `semester` lies within its range.
pub(crate) fn check_selection(
    branch: &str,
    semester: Option<Semester>,
    errors: &mut ValidationErrors,
) -> bool {
    let branch = branch.trim();
    if branch.is_empty() {
        errors.push(FIELD_BRANCH, "Select branch");
        if semester.is_none() {
            errors.push(FIELD_SEMESTER, "Select semester");
        }
        return false;
    }
    if !KNOWN_BRANCHES.contains(&branch) {
        errors.push(FIELD_BRANCH, format!("Unknown branch `{branch}`"));
        return false;
    }

    match semester {
        None => {
            errors.push(FIELD_SEMESTER, "Select semester");
            false
        }
        Some(semester) if semester == 0 || semester > semesters_for_branch(branch) => {
            errors.push(
                FIELD_SEMESTER,
                format!(
                    "Semester must be between 1 and {}",
                    semesters_for_branch(branch)
                ),
            );
            false
        }
        Some(_) => true,
    }
}

/// Checks required text fields and mark ranges of a student draft.
///
/// Subject-count alignment is checked by the service, which owns the
/// catalog.
pub(crate) fn check_student_fields(draft: &StudentDraft, errors: &mut ValidationErrors) -> bool {
    let before = errors.errors().len();
    if draft.name.trim().is_empty() {
        errors.push(FIELD_NAME, "Name is required");
    }
    if draft.roll_no.trim().is_empty() {
        errors.push(FIELD_ROLL_NO, "Roll number is required");
    }
    if draft
        .marks
        .iter()
        .any(|mark| !mark.is_finite() || *mark < 0.0 || *mark > MAX_MARKS_PER_SUBJECT)
    {
        errors.push(
            FIELD_MARKS,
            format!("Marks must be between 0 and {MAX_MARKS_PER_SUBJECT}"),
        );
    }
    errors.errors().len() == before
}
