//! Student result use-case service.
//!
//! # Responsibility
//! - Own the single in-memory store document for the process.
//! - Validate commands, apply them, and write back after every mutation.
//! - Serve read-only listing, stats and result-sheet projections.
//!
//! # Invariants
//! - Rejected commands leave the document untouched.
//! - A failed save leaves the in-memory mutation in place; memory and
//!   storage may diverge until the next successful save.
//! - Saved students carry `marks.len()` equal to their subject count.

use crate::model::catalog::{
    default_subjects, Semester, MAX_SUBJECTS_PER_SEMESTER, MIN_SUBJECTS_PER_SEMESTER,
};
use crate::model::document::StoreDocument;
use crate::model::student::{generate_student_id, StudentId, StudentRecord};
use crate::repo::record_store::{RecordStore, StoreError};
use crate::service::query::{
    build_detail, compute_stats, filter_students, ResultStats, StudentDetail, StudentFilter,
};
use crate::service::validation::{
    check_selection, check_student_fields, normalize_subject_name, StudentDraft,
    ValidationErrors, FIELD_MARKS, FIELD_SUBJECTS, FIELD_SUBJECT_NAME,
};
use crate::storage::KeyValueStorage;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for result use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Input rejected; nothing was changed.
    Validation(ValidationErrors),
    /// Target student does not exist.
    StudentNotFound(StudentId),
    /// Persisting the document failed.
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(errors) => write!(f, "{errors}"),
            Self::StudentNotFound(id) => write!(f, "student not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(errors) => Some(errors),
            Self::StudentNotFound(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Whether `save_student` inserted a new record or replaced one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created(StudentId),
    Updated(StudentId),
}

impl SaveOutcome {
    pub fn id(&self) -> &str {
        match self {
            Self::Created(id) | Self::Updated(id) => id.as_str(),
        }
    }
}

/// Result management facade over one record store.
pub struct ResultService<S: KeyValueStorage> {
    store: RecordStore<S>,
    document: StoreDocument,
}

impl<S: KeyValueStorage> ResultService<S> {
    /// Loads the persisted document and takes ownership of it.
    pub fn open(store: RecordStore<S>) -> Self {
        let document = store.load();
        Self { store, document }
    }

    pub fn document(&self) -> &StoreDocument {
        &self.document
    }

    pub fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    /// Releases the record store, discarding the in-memory document.
    pub fn into_store(self) -> RecordStore<S> {
        self.store
    }

    /// Validates and saves a student's result.
    ///
    /// With `editing_id`, the record carrying that id is replaced (or
    /// inserted under that id when it no longer exists); otherwise a new
    /// record with a fresh id is appended. A blank `editing_id` counts as
    /// absent. Cached metrics are recomputed.
    ///
    /// # Errors
    /// - `Validation` with every failing field; nothing is changed.
    /// - `Store` when the write-back fails.
    pub fn save_student(
        &mut self,
        draft: &StudentDraft,
        editing_id: Option<&str>,
    ) -> ServiceResult<SaveOutcome> {
        let mut errors = ValidationErrors::new();
        check_student_fields(draft, &mut errors);
        let branch = draft.branch.trim();
        if check_selection(branch, draft.semester, &mut errors) {
            let semester = draft.semester.unwrap_or_default();
            match self.subject_count(branch, semester) {
                0 => errors.push(FIELD_SUBJECTS, "No subjects configured for this semester"),
                expected if expected != draft.marks.len() => errors.push(
                    FIELD_MARKS,
                    format!("Expected {expected} marks, got {}", draft.marks.len()),
                ),
                _ => {}
            }
        }
        if let Err(errors) = errors.into_result() {
            info!(
                "event=student_save module=service status=rejected fields={}",
                errors.field_list()
            );
            return Err(errors.into());
        }

        let semester = draft.semester.unwrap_or_default();
        self.document.subjects.ensure_subject_list(branch, semester);

        // A blank id would be dropped on the next load.
        let id = editing_id
            .filter(|id| !id.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(generate_student_id);
        let record = StudentRecord::with_id(
            id.clone(),
            draft.name.trim(),
            draft.roll_no.trim(),
            branch,
            semester,
            draft.marks.clone(),
        );
        let replaced = self.document.upsert_student(record);
        self.persist("student_save")?;

        Ok(if replaced {
            SaveOutcome::Updated(id)
        } else {
            SaveOutcome::Created(id)
        })
    }

    /// Deletes one student by id.
    pub fn delete_student(&mut self, id: &str) -> ServiceResult<()> {
        if !self.document.remove_student(id) {
            return Err(ServiceError::StudentNotFound(id.to_string()));
        }
        self.persist("student_delete")
    }

    /// Returns the live subject list for `(branch, semester)`, populating
    /// defaults in memory when absent.
    pub fn subjects_for(&mut self, branch: &str, semester: Semester) -> &[String] {
        self.document
            .subjects
            .ensure_subject_list(branch, semester)
            .as_slice()
    }

    /// Appends one subject to a semester list.
    pub fn add_subject(
        &mut self,
        branch: &str,
        semester: Semester,
        name: &str,
    ) -> ServiceResult<()> {
        let mut errors = ValidationErrors::new();
        let name = normalize_subject_name(name);
        let selected = check_selection(branch, Some(semester), &mut errors);
        if name.is_empty() {
            errors.push(FIELD_SUBJECT_NAME, "Enter subject name");
        }
        if selected && self.subject_count(branch.trim(), semester) >= MAX_SUBJECTS_PER_SEMESTER {
            errors.push(
                FIELD_SUBJECTS,
                format!("Max {MAX_SUBJECTS_PER_SEMESTER} subjects allowed"),
            );
        }
        errors.into_result()?;

        self.document
            .subjects
            .ensure_subject_list(branch.trim(), semester)
            .push(name);
        self.persist("subject_add")
    }

    /// Replaces a semester's subject list, dropping blank names.
    ///
    /// The cleaned list must keep between 3 and 10 subjects.
    pub fn replace_subjects<I, T>(
        &mut self,
        branch: &str,
        semester: Semester,
        names: I,
    ) -> ServiceResult<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut errors = ValidationErrors::new();
        check_selection(branch, Some(semester), &mut errors);
        let cleaned: Vec<String> = names
            .into_iter()
            .map(|name| normalize_subject_name(name.as_ref()))
            .filter(|name| !name.is_empty())
            .collect();
        if cleaned.len() < MIN_SUBJECTS_PER_SEMESTER {
            errors.push(
                FIELD_SUBJECTS,
                format!("Please keep at least {MIN_SUBJECTS_PER_SEMESTER} subjects"),
            );
        } else if cleaned.len() > MAX_SUBJECTS_PER_SEMESTER {
            errors.push(
                FIELD_SUBJECTS,
                format!("Limit to {MAX_SUBJECTS_PER_SEMESTER} subjects"),
            );
        }
        errors.into_result()?;

        let list = self
            .document
            .subjects
            .ensure_subject_list(branch.trim(), semester);
        list.clear();
        list.extend(cleaned);
        self.persist("subject_replace")
    }

    /// Removes the subject at 0-based `index` and returns its name.
    pub fn remove_subject(
        &mut self,
        branch: &str,
        semester: Semester,
        index: usize,
    ) -> ServiceResult<String> {
        let mut errors = ValidationErrors::new();
        if check_selection(branch, Some(semester), &mut errors)
            && index >= self.subject_count(branch.trim(), semester)
        {
            errors.push(FIELD_SUBJECTS, format!("No subject at position {}", index + 1));
        }
        errors.into_result()?;

        let removed = self
            .document
            .subjects
            .ensure_subject_list(branch.trim(), semester)
            .remove(index);
        self.persist("subject_remove")?;
        Ok(removed)
    }

    /// Removes every student and custom subject list.
    pub fn clear_all(&mut self) -> ServiceResult<()> {
        self.document = StoreDocument::default();
        self.persist("store_clear")
    }

    /// Lists students matching `filter`, sorted by name.
    pub fn list_students(&self, filter: &StudentFilter) -> Vec<&StudentRecord> {
        filter_students(&self.document.students, filter)
    }

    /// Aggregates the students matching `filter`.
    pub fn stats(&self, filter: &StudentFilter) -> ResultStats {
        compute_stats(
            self.document
                .students
                .iter()
                .filter(|student| filter.matches(student)),
        )
    }

    /// Builds the per-subject result sheet for one student.
    pub fn student_detail(&mut self, id: &str) -> ServiceResult<StudentDetail> {
        let student = self
            .document
            .find_student(id)
            .cloned()
            .ok_or_else(|| ServiceError::StudentNotFound(id.to_string()))?;
        let subjects = self
            .document
            .subjects
            .ensure_subject_list(&student.branch, student.semester);
        Ok(build_detail(&student, subjects))
    }

    /// Subject count for `(branch, semester)` without populating defaults.
    fn subject_count(&self, branch: &str, semester: Semester) -> usize {
        match self.document.subjects.subjects(branch, semester) {
            Some(subjects) => subjects.len(),
            None => default_subjects(branch, semester).map_or(0, |subjects| subjects.len()),
        }
    }

    fn persist(&mut self, event: &'static str) -> ServiceResult<()> {
        match self.store.save(&self.document) {
            Ok(()) => {
                info!("event={event} module=service status=ok");
                Ok(())
            }
            Err(err) => {
                warn!("event={event} module=service status=error error_code=persist_failed");
                Err(err.into())
            }
        }
    }
}
