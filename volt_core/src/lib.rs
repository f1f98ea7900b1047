//! # volt_core - Electrical Design Calculation Engine
//!
//! `volt_core` is the computational heart of Voltaic, providing power
//! distribution calculations over a typed project graph. All inputs and
//! outputs are JSON-serializable, so projects round-trip cleanly through
//! files and downstream tooling.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take a graph and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Deterministic**: Same graph in, same numbers out - every time
//!
//! ## Quick Start
//!
//! ```rust
//! use volt_core::project::ProjectGraph;
//! use volt_core::validate::{has_errors, validate_project};
//!
//! let graph = ProjectGraph::new("Subpanel Add", 2020, "CA");
//! let issues = validate_project(&graph);
//! assert!(!has_errors(&issues));
//! ```
//!
//! ## Modules
//!
//! - [`project`] - Project graph container, metadata, and analysis settings
//! - [`network`] - Nodes, feeders, cables, and panel schedules
//! - [`tables`] - Embedded placeholder lookup tables (ampacity, impedance, ...)
//! - [`validate`] - Pre-analysis sanity checks over the graph
//! - [`analysis`] - Deterministic analyses (load, voltage drop, fault, taps)
//! - [`export`] - CSV/JSON report writers
//! - [`errors`] - Structured error types
//! - [`file_io`] - File operations with atomic saves

pub mod analysis;
pub mod errors;
pub mod export;
pub mod file_io;
pub mod network;
pub mod project;
pub mod tables;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_fixtures;

// Re-export commonly used types at crate root for convenience
pub use analysis::{run_analysis, AnalysisResults};
pub use errors::{EeError, EeResult};
pub use export::export_all;
pub use file_io::{load_project, save_project};
pub use project::{ProjectGraph, ProjectMetadata, SCHEMA_VERSION};
pub use validate::{validate_project, Issue, Severity};
