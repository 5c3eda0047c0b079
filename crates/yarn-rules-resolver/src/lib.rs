//! Cycle elimination engine: a depth-first walk from the declared root
//! packages that drops every edge pointing back into the current path, and
//! a graph view of the registry for cycle diagnostics.

pub mod graph;
pub mod normalize;
