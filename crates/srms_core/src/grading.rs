//! Grading engine: marks to grade points, CGPA, letter grade and status.
//!
//! # Responsibility
//! - Derive every result metric from raw marks alone.
//! - Keep grading rules free of storage and presentation concerns.
//!
//! # Invariants
//! - `total_max == marks.len() * MAX_MARKS_PER_SUBJECT`.
//! - `0 <= total_obtained <= total_max` for any input.
//! - Any single mark below `PASS_MARKS_PER_SUBJECT` fails the result, even
//!   when the CGPA alone would pass (per-subject backlog rule).

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Maximum marks obtainable in one subject.
pub const MAX_MARKS_PER_SUBJECT: f64 = 100.0;
/// Minimum marks in one subject to avoid a backlog.
pub const PASS_MARKS_PER_SUBJECT: f64 = 35.0;

/// Letter grade derived from CGPA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "F")]
    F,
}

impl LetterGrade {
    /// Returns the wire/display label (`A+`, `A`, ... `F`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }

    /// Parses a wire label; unknown labels yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "A+" => Some(Self::APlus),
            "A" => Some(Self::A),
            "B+" => Some(Self::BPlus),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            "F" => Some(Self::F),
            _ => None,
        }
    }
}

impl Display for LetterGrade {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall pass/fail outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PassStatus {
    Pass,
    Fail,
}

impl PassStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "Pass",
            Self::Fail => "Fail",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Pass" => Some(Self::Pass),
            "Fail" => Some(Self::Fail),
            _ => None,
        }
    }

    pub fn is_pass(self) -> bool {
        matches!(self, Self::Pass)
    }
}

impl Display for PassStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived metrics for one ordered set of subject marks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSummary {
    pub total_max: f64,
    pub total_obtained: f64,
    /// Mean grade point rounded to two decimals.
    pub cgpa: f64,
    pub grade: LetterGrade,
    pub status: PassStatus,
}

/// Coerces one raw mark into the valid `[0, 100]` range.
///
/// Non-finite input (NaN, infinities) is treated as `0`.
pub fn coerce_mark(mark: f64) -> f64 {
    if !mark.is_finite() {
        return 0.0;
    }
    mark.clamp(0.0, MAX_MARKS_PER_SUBJECT)
}

/// Maps one mark onto the 10-point grade scale.
///
/// Bucket lower bounds are inclusive: exactly `90` yields `10`, exactly `80`
/// yields `9`, and so on. Anything under `40` earns no grade point.
pub fn grade_point(mark: f64) -> u8 {
    let mark = coerce_mark(mark);
    if mark >= 90.0 {
        10
    } else if mark >= 80.0 {
        9
    } else if mark >= 70.0 {
        8
    } else if mark >= 60.0 {
        7
    } else if mark >= 50.0 {
        6
    } else if mark >= 40.0 {
        5
    } else {
        0
    }
}

/// Maps a CGPA onto its letter grade.
pub fn grade_from_cgpa(cgpa: f64) -> LetterGrade {
    if cgpa >= 9.0 {
        LetterGrade::APlus
    } else if cgpa >= 8.0 {
        LetterGrade::A
    } else if cgpa >= 7.0 {
        LetterGrade::BPlus
    } else if cgpa >= 6.0 {
        LetterGrade::B
    } else if cgpa >= 5.0 {
        LetterGrade::C
    } else if cgpa > 0.0 {
        LetterGrade::D
    } else {
        LetterGrade::F
    }
}

/// Returns whether one subject mark clears the backlog threshold.
pub fn is_subject_pass(mark: f64) -> bool {
    coerce_mark(mark) >= PASS_MARKS_PER_SUBJECT
}

/// Computes every derived metric for an ordered list of marks.
///
/// Safe for any length, including zero: an empty input yields
/// `cgpa = 0`, grade `F` and status `Fail`.
pub fn compute_result(marks: &[f64]) -> ResultSummary {
    let total_max = marks.len() as f64 * MAX_MARKS_PER_SUBJECT;
    let total_obtained: f64 = marks.iter().copied().map(coerce_mark).sum();

    let cgpa = if marks.is_empty() {
        0.0
    } else {
        let points: u32 = marks.iter().map(|mark| u32::from(grade_point(*mark))).sum();
        round_to_hundredths(f64::from(points) / marks.len() as f64)
    };

    let grade = grade_from_cgpa(cgpa);
    let has_backlog = marks.iter().any(|mark| !is_subject_pass(*mark));
    let status = if has_backlog || grade == LetterGrade::F {
        PassStatus::Fail
    } else {
        PassStatus::Pass
    };

    ResultSummary {
        total_max,
        total_obtained,
        cgpa,
        grade,
        status,
    }
}

pub(crate) fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
