//! Load-boundary normalization of the persisted JSON document.
//!
//! # Responsibility
//! - Turn arbitrary JSON into a strict `StoreDocument`.
//! - Count what had to be discarded so callers can log it.
//!
//! # Invariants
//! - Normalization never fails; any shape deviation is treated as absent.
//! - Well-formed records pass through field-for-field unchanged.

use crate::grading::{coerce_mark, LetterGrade, PassStatus};
use crate::model::catalog::{Semester, SubjectCatalog};
use crate::model::document::StoreDocument;
use crate::model::student::StudentRecord;
use serde_json::{Map, Value};

/// Summary of repairs applied while normalizing one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizationReport {
    /// Top-level value was not an object; defaults were used.
    pub document_reset: bool,
    /// `students` was present but not an array.
    pub students_reset: bool,
    /// `subjects` was absent or not an object; default catalog was used.
    pub catalog_reset: bool,
    /// Student entries discarded for missing id/semester or wrong shape.
    pub dropped_students: usize,
    /// Catalog entries discarded for wrong key or value shape.
    pub dropped_catalog_entries: usize,
}

impl NormalizationReport {
    /// Returns whether any repair was applied.
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

/// Normalizes a raw JSON value into a typed document.
pub fn normalize_document(value: Value) -> StoreDocument {
    normalize_document_with_report(value).0
}

/// Normalizes a raw JSON value and reports which repairs were needed.
pub fn normalize_document_with_report(value: Value) -> (StoreDocument, NormalizationReport) {
    let mut report = NormalizationReport::default();
    let Value::Object(mut root) = value else {
        report.document_reset = true;
        return (StoreDocument::default(), report);
    };

    let students = match root.remove("students") {
        Some(Value::Array(items)) => {
            let total = items.len();
            let students: Vec<StudentRecord> =
                items.into_iter().filter_map(normalize_student).collect();
            report.dropped_students = total - students.len();
            students
        }
        Some(_) => {
            report.students_reset = true;
            Vec::new()
        }
        None => Vec::new(),
    };

    let subjects = match root.remove("subjects") {
        Some(Value::Object(branches)) => normalize_catalog(branches, &mut report),
        _ => {
            report.catalog_reset = true;
            SubjectCatalog::with_defaults()
        }
    };

    (StoreDocument { students, subjects }, report)
}

fn normalize_student(value: Value) -> Option<StudentRecord> {
    let Value::Object(fields) = value else {
        return None;
    };

    let id = coerce_string(fields.get("id")).filter(|id| !id.trim().is_empty())?;
    let semester = fields.get("semester").and_then(coerce_semester)?;
    let marks = match fields.get("marks") {
        Some(Value::Array(items)) => items.iter().map(coerce_mark_value).collect(),
        _ => Vec::new(),
    };

    Some(StudentRecord {
        id,
        name: coerce_string(fields.get("name")).unwrap_or_default(),
        roll_no: coerce_string(fields.get("rollNo")).unwrap_or_default(),
        branch: coerce_string(fields.get("branch")).unwrap_or_default(),
        semester,
        marks,
        cgpa: fields
            .get("cgpa")
            .and_then(Value::as_f64)
            .filter(|cgpa| cgpa.is_finite()),
        grade: fields
            .get("grade")
            .and_then(Value::as_str)
            .and_then(LetterGrade::parse),
        status: fields
            .get("status")
            .and_then(Value::as_str)
            .and_then(PassStatus::parse),
    })
}

fn normalize_catalog(
    branches: Map<String, Value>,
    report: &mut NormalizationReport,
) -> SubjectCatalog {
    let mut catalog = SubjectCatalog::new();
    for (branch, semesters) in branches {
        let Value::Object(semesters) = semesters else {
            report.dropped_catalog_entries += 1;
            continue;
        };
        for (semester_key, subjects) in semesters {
            let semester = parse_semester(&semester_key);
            match (semester, subjects) {
                (Some(semester), Value::Array(names)) => {
                    let names = names
                        .into_iter()
                        .filter_map(|name| match name {
                            Value::String(name) => Some(name),
                            _ => None,
                        })
                        .collect();
                    catalog.set_subjects(&branch, semester, names);
                }
                _ => report.dropped_catalog_entries += 1,
            }
        }
    }
    catalog
}

fn coerce_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn coerce_semester(value: &Value) -> Option<Semester> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .and_then(|raw| Semester::try_from(raw).ok())
            .filter(|semester| *semester > 0),
        Value::String(text) => parse_semester(text),
        _ => None,
    }
}

fn parse_semester(text: &str) -> Option<Semester> {
    text.trim()
        .parse::<Semester>()
        .ok()
        .filter(|semester| *semester > 0)
}

fn coerce_mark_value(value: &Value) -> f64 {
    let raw = match value {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => text.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    coerce_mark(raw)
}
