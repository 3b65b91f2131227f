//! Read-only projections over the store document.
//!
//! Projections are ephemeral and never persisted.

use crate::grading::{
    compute_result, is_subject_pass, round_to_hundredths, ResultSummary, MAX_MARKS_PER_SUBJECT,
};
use crate::model::catalog::Semester;
use crate::model::student::StudentRecord;
use serde::Serialize;
use std::cmp::Ordering;

/// Listing filter; unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    pub branch: Option<String>,
    pub semester: Option<Semester>,
    /// Case-insensitive substring matched against name or roll number.
    pub search: Option<String>,
}

impl StudentFilter {
    pub fn matches(&self, student: &StudentRecord) -> bool {
        if let Some(branch) = self.branch.as_deref().filter(|b| !b.is_empty()) {
            if student.branch != branch {
                return false;
            }
        }
        if let Some(semester) = self.semester {
            if student.semester != semester {
                return false;
            }
        }
        match self.normalized_search() {
            Some(needle) => {
                student.name.to_lowercase().contains(&needle)
                    || student.roll_no.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }

    fn normalized_search(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(|search| search.trim().to_lowercase())
            .filter(|search| !search.is_empty())
    }
}

/// Returns matching students sorted by name (case-insensitive).
pub fn filter_students<'a>(
    students: &'a [StudentRecord],
    filter: &StudentFilter,
) -> Vec<&'a StudentRecord> {
    let mut rows: Vec<&StudentRecord> = students
        .iter()
        .filter(|student| filter.matches(student))
        .collect();
    rows.sort_by(|left, right| compare_by_name(left, right));
    rows
}

fn compare_by_name(left: &StudentRecord, right: &StudentRecord) -> Ordering {
    left.name
        .to_lowercase()
        .cmp(&right.name.to_lowercase())
        .then_with(|| left.name.cmp(&right.name))
        .then_with(|| left.id.cmp(&right.id))
}

/// Aggregate figures for a filtered student set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultStats {
    pub total_students: usize,
    /// Mean effective CGPA rounded to two decimals; `0` for no students.
    pub average_cgpa: f64,
    pub pass_count: usize,
    /// `pass_count / total_students` as a rounded whole percentage.
    pub pass_rate_percent: u32,
}

/// Computes aggregate figures, falling back on recomputed metrics when a
/// record's cached values are absent.
pub fn compute_stats<'a>(students: impl IntoIterator<Item = &'a StudentRecord>) -> ResultStats {
    let mut total_students = 0_usize;
    let mut cgpa_sum = 0.0_f64;
    let mut pass_count = 0_usize;
    for student in students {
        total_students += 1;
        cgpa_sum += student.effective_cgpa();
        if student.effective_status().is_pass() {
            pass_count += 1;
        }
    }

    if total_students == 0 {
        return ResultStats {
            total_students,
            average_cgpa: 0.0,
            pass_count,
            pass_rate_percent: 0,
        };
    }

    ResultStats {
        total_students,
        average_cgpa: round_to_hundredths(cgpa_sum / total_students as f64),
        pass_count,
        pass_rate_percent: (pass_count as f64 * 100.0 / total_students as f64).round() as u32,
    }
}

/// One subject line of a student result sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRow {
    /// 1-based position in the catalog list.
    pub position: usize,
    pub subject: String,
    pub obtained: f64,
    pub max: f64,
    pub passed: bool,
}

/// Full result sheet for one student.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDetail {
    pub student: StudentRecord,
    pub rows: Vec<SubjectRow>,
    /// Always recomputed from marks, never taken from the cache.
    pub summary: ResultSummary,
}

/// Builds a result sheet by pairing catalog subjects with marks.
///
/// Subjects without a recorded mark show `0` obtained.
pub fn build_detail(student: &StudentRecord, subjects: &[String]) -> StudentDetail {
    let rows = subjects
        .iter()
        .enumerate()
        .map(|(index, subject)| {
            let obtained = student.marks.get(index).copied().unwrap_or(0.0);
            SubjectRow {
                position: index + 1,
                subject: subject.clone(),
                obtained,
                max: MAX_MARKS_PER_SUBJECT,
                passed: is_subject_pass(obtained),
            }
        })
        .collect();

    StudentDetail {
        student: student.clone(),
        rows,
        summary: compute_result(&student.marks),
    }
}
