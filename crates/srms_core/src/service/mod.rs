//! Use-case services over the record store.
//!
//! # Responsibility
//! - Validate user commands and apply them to the owned document.
//! - Keep callers decoupled from storage and normalization details.

pub mod query;
pub mod result_service;
pub mod validation;
