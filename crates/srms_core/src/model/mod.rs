//! Domain model for student results and subject catalogs.
//!
//! # Responsibility
//! - Define the typed shapes persisted inside the store document.
//! - Hold the built-in default subject catalog.
//!
//! # Invariants
//! - `StudentRecord::marks` aligns positionally with the catalog's subject
//!   list for the record's `(branch, semester)`.
//! - Cached `cgpa`/`grade`/`status` are always recomputable from `marks`.

pub mod catalog;
pub mod document;
pub mod student;
