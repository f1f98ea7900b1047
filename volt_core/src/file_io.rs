//! # File I/O Module
//!
//! Handles project file operations with safety features:
//! - **Atomic saves**: Write to .tmp, sync, rename to prevent corruption
//! - **Version validation**: Ensure schema compatibility on load
//!
//! ## File Format
//!
//! Projects are saved as plain `.json` files containing a serialized
//! [`ProjectGraph`]. The `schema_version` field inside the file is checked
//! against [`SCHEMA_VERSION`] on load.
//!
//! ## Example
//!
//! ```rust,no_run
//! use volt_core::file_io::{save_project, load_project};
//! use volt_core::project::ProjectGraph;
//! use std::path::Path;
//!
//! let graph = ProjectGraph::new("Subpanel Add", 2020, "CA");
//! let path = Path::new("project.json");
//!
//! save_project(&graph, path).unwrap();
//! let loaded = load_project(path).unwrap();
//! assert_eq!(loaded.meta.name, "Subpanel Add");
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use crate::errors::{EeError, EeResult};
use crate::project::{ProjectGraph, SCHEMA_VERSION};

/// Save a project graph to a file with atomic write semantics.
///
/// The save process:
/// 1. Serialize graph to JSON
/// 2. Write to a temporary file (.tmp)
/// 3. Sync to disk (fsync)
/// 4. Rename .tmp to the final path (atomic on most filesystems)
///
/// This prevents corruption if the process is interrupted during write.
pub fn save_project(graph: &ProjectGraph, path: &Path) -> EeResult<()> {
    let json = serde_json::to_string_pretty(graph).map_err(|e| EeError::SerializationError {
        reason: e.to_string(),
    })?;

    let tmp_path = path.with_extension("json.tmp");

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        EeError::file_error(
            "create temp file",
            tmp_path.display().to_string(),
            e.to_string(),
        )
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        EeError::file_error(
            "write temp file",
            tmp_path.display().to_string(),
            e.to_string(),
        )
    })?;

    tmp_file.sync_all().map_err(|e| {
        EeError::file_error(
            "sync temp file",
            tmp_path.display().to_string(),
            e.to_string(),
        )
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        // Clean up temp file if rename fails
        let _ = fs::remove_file(&tmp_path);
        EeError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

/// Load a project graph from a file.
///
/// # Returns
///
/// * `Ok(ProjectGraph)` - Successfully loaded project
/// * `Err(EeError::VersionMismatch)` - File schema version is incompatible
/// * `Err(EeError::SerializationError)` - Invalid JSON
/// * `Err(EeError::FileError)` - I/O error
pub fn load_project(path: &Path) -> EeResult<ProjectGraph> {
    let mut file = File::open(path)
        .map_err(|e| EeError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| EeError::file_error("read", path.display().to_string(), e.to_string()))?;

    let graph: ProjectGraph =
        serde_json::from_str(&contents).map_err(|e| EeError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;

    validate_version(&graph.schema_version)?;

    Ok(graph)
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> EeResult<()> {
    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(EeError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        });
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(EeError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        });
    }

    // For 0.x versions, a file with a newer minor version is unsupported
    if current_parts[0] == 0 && file_parts.len() > 1 && current_parts.len() > 1 {
        if file_parts[1] > current_parts[1] {
            return Err(EeError::VersionMismatch {
                file_version: file_version.to_string(),
                expected_version: SCHEMA_VERSION.to_string(),
            });
        }
    }

    Ok(())
}
