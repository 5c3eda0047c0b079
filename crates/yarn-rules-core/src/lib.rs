//! Core data types for yarn-rules.
//!
//! This crate defines the types the rewriter works on: the dependency tree
//! as emitted by `yarn list --json`, `name@version` package identifiers, the
//! flattened package registry, the render configuration, and the formatting
//! of build rules.
//!
//! This crate performs no I/O beyond loading a configuration file.

pub mod config;
pub mod package;
pub mod registry;
pub mod rule;
pub mod tree;
