//! Record store: persistence and normalization of the store document.
//!
//! # Responsibility
//! - Load the persisted document, repairing malformed data to defaults.
//! - Write the document back to key-value storage.
//!
//! # Invariants
//! - Loading never fails; invalid persisted state is treated as first run.
//! - Saving overwrites unconditionally; storage failures are surfaced.

pub mod normalize;
pub mod record_store;
