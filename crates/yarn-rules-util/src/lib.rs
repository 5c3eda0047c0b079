//! Shared utilities for yarn-rules.
//!
//! This crate provides the cross-cutting concerns used by the other crates:
//! the unified error type and helpers for reading the input document and
//! writing the generated rules.

pub mod errors;
pub mod fs;
