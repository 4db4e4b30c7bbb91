//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, auth)
//! - `recipe` - Recipe aggregate, rating ledger and listing query compiler

pub mod foundation;
pub mod recipe;
