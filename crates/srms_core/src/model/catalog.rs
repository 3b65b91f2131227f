//! Branch/semester subject catalog.
//!
//! # Responsibility
//! - Map `branch -> semester -> ordered subject names`.
//! - Provide the built-in default catalog and per-branch semester counts.
//!
//! # Invariants
//! - `ensure_subject_list` never overwrites an existing entry.
//! - Default entries are copied on demand, never shared.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Semester number, starting at `1`.
pub type Semester = u8;

/// Minimum subjects a semester keeps after an edit.
pub const MIN_SUBJECTS_PER_SEMESTER: usize = 3;
/// Maximum subjects a semester may hold.
pub const MAX_SUBJECTS_PER_SEMESTER: usize = 10;

/// Branch codes offered for student entry.
pub const KNOWN_BRANCHES: &[&str] = &["BCA", "MCA"];

const BCA_SUBJECTS: [[&str; 5]; 6] = [
    [
        "Mathematics I",
        "Programming in C",
        "Computer Fundamentals",
        "Digital Logic",
        "Communication Skills",
    ],
    [
        "Mathematics II",
        "Data Structures",
        "OOP in C++",
        "Operating Systems",
        "Environmental Studies",
    ],
    [
        "DBMS",
        "Discrete Mathematics",
        "Computer Networks",
        "Java Programming",
        "Accounting Fundamentals",
    ],
    [
        "Software Engineering",
        "Web Technologies",
        "Computer Graphics",
        "Probability & Statistics",
        "Microprocessors",
    ],
    [
        "Python Programming",
        "Information Security",
        "Mobile App Dev",
        "AI Fundamentals",
        "Management Info Systems",
    ],
    [
        "Cloud Computing",
        "Project",
        "Data Analytics",
        "Elective I",
        "Elective II",
    ],
];

const MCA_SUBJECTS: [[&str; 5]; 4] = [
    [
        "Mathematical Foundations",
        "Programming in C",
        "Computer Architecture",
        "DBMS",
        "Communication Skills",
    ],
    [
        "Data Structures",
        "Operating Systems",
        "OOP in Java",
        "Software Engineering",
        "Discrete Mathematics",
    ],
    [
        "Computer Networks",
        "Web Technologies",
        "Data Warehousing",
        "Elective I",
        "Probability & Statistics",
    ],
    [
        "AI & ML",
        "Cloud Computing",
        "Project",
        "Elective II",
        "Professional Ethics",
    ],
];

fn default_branch_table(branch: &str) -> Option<&'static [[&'static str; 5]]> {
    match branch {
        "BCA" => Some(&BCA_SUBJECTS[..]),
        "MCA" => Some(&MCA_SUBJECTS[..]),
        _ => None,
    }
}

/// Returns the number of semesters offered by a branch, `0` when unknown.
pub fn semesters_for_branch(branch: &str) -> Semester {
    default_branch_table(branch).map_or(0, |table| table.len() as Semester)
}

/// Returns the built-in subject list for one `(branch, semester)`.
pub fn default_subjects(branch: &str, semester: Semester) -> Option<&'static [&'static str]> {
    let table = default_branch_table(branch)?;
    let index = usize::from(semester).checked_sub(1)?;
    table.get(index).map(|subjects| subjects.as_slice())
}

/// Subject catalog keyed by branch code and semester number.
///
/// Serialized as `{ "<branch>": { "<semester>": ["<subject>", ...] } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectCatalog {
    branches: BTreeMap<String, BTreeMap<Semester, Vec<String>>>,
}

impl SubjectCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a fresh copy of the built-in catalog.
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        for branch in KNOWN_BRANCHES {
            for semester in 1..=semesters_for_branch(branch) {
                catalog.ensure_subject_list(branch, semester);
            }
        }
        catalog
    }

    /// Returns the stored list for `(branch, semester)` without populating
    /// defaults.
    pub fn subjects(&self, branch: &str, semester: Semester) -> Option<&[String]> {
        self.branches
            .get(branch)
            .and_then(|semesters| semesters.get(&semester))
            .map(Vec::as_slice)
    }

    /// Returns the live subject list for `(branch, semester)`, inserting a
    /// copy of the default list (or an empty list) when absent.
    ///
    /// # Invariants
    /// - An existing entry, even an empty one, is returned untouched.
    /// - Repeated calls return the same underlying list.
    pub fn ensure_subject_list(&mut self, branch: &str, semester: Semester) -> &mut Vec<String> {
        self.branches
            .entry(branch.to_string())
            .or_default()
            .entry(semester)
            .or_insert_with(|| {
                default_subjects(branch, semester)
                    .map(|names| names.iter().map(|name| (*name).to_string()).collect())
                    .unwrap_or_default()
            })
    }

    /// Replaces the list for `(branch, semester)` wholesale.
    pub fn set_subjects(&mut self, branch: &str, semester: Semester, subjects: Vec<String>) {
        self.branches
            .entry(branch.to_string())
            .or_default()
            .insert(semester, subjects);
    }

    /// Iterates branch codes in sorted order.
    pub fn branches(&self) -> impl Iterator<Item = &str> {
        self.branches.keys().map(String::as_str)
    }

    /// Iterates the configured semesters of one branch in ascending order.
    pub fn semesters(&self, branch: &str) -> impl Iterator<Item = (Semester, &[String])> {
        self.branches
            .get(branch)
            .into_iter()
            .flat_map(|semesters| semesters.iter())
            .map(|(semester, subjects)| (*semester, subjects.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }
}
