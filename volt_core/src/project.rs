//! # Project Graph
//!
//! The `ProjectGraph` struct is the root container for an electrical design:
//! buses (nodes), feeders (edges), and panel schedules, plus the code context
//! and analysis configuration. Projects serialize to human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! ProjectGraph
//! ├── meta: ProjectMetadata (name, code context, timestamps)
//! ├── flags: AnalysisFlags (which analyses run)
//! ├── config: AnalysisConfig (power factor, VD limits)
//! ├── nodes / edges (the one-line topology)
//! ├── panel_schedules (circuit-level loads)
//! └── assumptions / sources (provenance)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use volt_core::project::ProjectGraph;
//!
//! let mut graph = ProjectGraph::new("Subpanel Add", 2020, "CA");
//!
//! // Serialize to JSON
//! let json = serde_json::to_string_pretty(&graph).unwrap();
//! assert!(json.contains("Subpanel Add"));
//! ```

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::network::{Edge, Node, PanelSchedule};

/// Current schema version for project files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container.
///
/// This is the top-level struct that gets serialized to project files.
/// Node ids are plain strings from the drawings; referential integrity is
/// the validators' job, not the constructor's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectGraph {
    /// Schema version (for migration compatibility)
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Project metadata (name, code context, timestamps)
    pub meta: ProjectMetadata,

    /// Which analyses are enabled for this project
    #[serde(default)]
    pub flags: AnalysisFlags,

    /// Analysis configuration (power factor, voltage-drop limits)
    #[serde(default)]
    pub config: AnalysisConfig,

    /// Engineering assumptions carried into the report
    #[serde(default)]
    pub assumptions: Vec<Assumption>,

    /// Source documents the graph was extracted from
    #[serde(default)]
    pub sources: Vec<SourceDoc>,

    /// Buses of the one-line diagram
    #[serde(default)]
    pub nodes: Vec<Node>,

    /// Feeders between buses
    #[serde(default)]
    pub edges: Vec<Edge>,

    /// Circuit-level load listings
    #[serde(default)]
    pub panel_schedules: Vec<PanelSchedule>,

    /// Service fault input for the short-circuit stub
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_fault: Option<ServiceFault>,
}

fn default_schema_version() -> String {
    SCHEMA_VERSION.to_string()
}

impl ProjectGraph {
    /// Create a new empty project graph.
    ///
    /// # Arguments
    ///
    /// * `name` - Project name (e.g., "4380 Mission Blvd - Subpanel Add")
    /// * `nec_year` - NEC edition year in force
    /// * `jurisdiction` - Authority having jurisdiction (e.g., "CA")
    pub fn new(name: impl Into<String>, nec_year: u32, jurisdiction: impl Into<String>) -> Self {
        let now = Utc::now();
        ProjectGraph {
            schema_version: SCHEMA_VERSION.to_string(),
            meta: ProjectMetadata {
                name: name.into(),
                code: CodeContext {
                    nec_year,
                    jurisdiction: jurisdiction.into(),
                    amendments: Vec::new(),
                },
                created: now,
                modified: now,
            },
            flags: AnalysisFlags::default(),
            config: AnalysisConfig::default(),
            assumptions: Vec::new(),
            sources: Vec::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            panel_schedules: Vec::new(),
            service_fault: None,
        }
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Panel schedule for a node, if one exists.
    pub fn schedule_for(&self, panel_id: &str) -> Option<&PanelSchedule> {
        self.panel_schedules.iter().find(|s| s.panel_id == panel_id)
    }

    /// Operating line-to-line voltage of a node, if known. Transformers
    /// without an explicit bus voltage fall back to secondary, then primary.
    pub fn node_voltage(&self, id: &str) -> Option<f64> {
        self.node(id).and_then(|n| n.operating_voltage())
    }

    /// Parent -> children adjacency over edges whose endpoints both exist.
    pub fn adjacency(&self) -> HashMap<&str, Vec<&str>> {
        let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
        for edge in &self.edges {
            if self.node(&edge.from_id).is_some() && self.node(&edge.to_id).is_some() {
                adjacency
                    .entry(edge.from_id.as_str())
                    .or_default()
                    .push(edge.to_id.as_str());
            }
        }
        adjacency
    }

    /// Child -> parents map over edges whose endpoints both exist.
    pub fn parents(&self) -> HashMap<&str, Vec<&str>> {
        let mut parents: HashMap<&str, Vec<&str>> = HashMap::new();
        for edge in &self.edges {
            if self.node(&edge.from_id).is_some() && self.node(&edge.to_id).is_some() {
                parents
                    .entry(edge.to_id.as_str())
                    .or_default()
                    .push(edge.from_id.as_str());
            }
        }
        parents
    }

    /// Topological order of node ids (Kahn's algorithm).
    ///
    /// On a cyclic graph the returned order is partial; the topology
    /// validator reports the cycle as an error separately.
    pub fn topological_order(&self) -> Vec<String> {
        let adjacency = self.adjacency();
        let mut indegree: HashMap<&str, usize> =
            self.nodes.iter().map(|n| (n.id.as_str(), 0)).collect();
        for children in adjacency.values() {
            for child in children {
                *indegree.entry(child).or_insert(0) += 1;
            }
        }

        // Seed from the declared node order for deterministic output
        let mut queue: VecDeque<&str> = self
            .nodes
            .iter()
            .map(|n| n.id.as_str())
            .filter(|id| indegree.get(id).copied().unwrap_or(0) == 0)
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(id) = queue.pop_front() {
            order.push(id.to_string());
            for child in adjacency.get(id).into_iter().flatten() {
                let deg = indegree.entry(child).or_insert(0);
                *deg = deg.saturating_sub(1);
                if *deg == 0 {
                    queue.push_back(child);
                }
            }
        }
        order
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Project name
    pub name: String,

    /// Code context the project is designed under
    pub code: CodeContext,

    /// When the project was created
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,

    /// When the project was last modified
    #[serde(default = "Utc::now")]
    pub modified: DateTime<Utc>,
}

/// Applicable electrical code edition and jurisdiction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeContext {
    /// NEC edition year (e.g., 2020)
    pub nec_year: u32,

    /// Authority having jurisdiction
    pub jurisdiction: String,

    /// Local amendments in force
    #[serde(default)]
    pub amendments: Vec<String>,
}

/// Which analyses run for this project.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AnalysisFlags {
    /// Load rollup and panel summary
    #[serde(default = "enabled")]
    pub load: bool,

    /// Per-edge and per-path voltage drop
    #[serde(default = "enabled")]
    pub voltage_drop: bool,

    /// Short-circuit estimate
    #[serde(default)]
    pub short_circuit: bool,
}

fn enabled() -> bool {
    true
}

impl Default for AnalysisFlags {
    fn default() -> Self {
        AnalysisFlags {
            load: true,
            voltage_drop: true,
            short_circuit: false,
        }
    }
}

/// Tunable analysis parameters.
///
/// Defaults follow common design practice: 0.9 power factor, 3 % voltage
/// drop on branches and feeders, 5 % total.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Assumed power factor where the schedule gives none
    #[serde(default = "default_pf")]
    pub pf: f64,

    /// Allowable branch-circuit voltage drop in percent
    #[serde(default = "default_vd_segment")]
    pub vd_branch_pct: f64,

    /// Allowable feeder voltage drop in percent
    #[serde(default = "default_vd_segment")]
    pub vd_feeder_pct: f64,

    /// Allowable total (service-to-load) voltage drop in percent
    #[serde(default = "default_vd_total")]
    pub vd_total_pct: f64,
}

fn default_pf() -> f64 {
    0.9
}

fn default_vd_segment() -> f64 {
    3.0
}

fn default_vd_total() -> f64 {
    5.0
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            pf: 0.9,
            vd_branch_pct: 3.0,
            vd_feeder_pct: 3.0,
            vd_total_pct: 5.0,
        }
    }
}

/// Engineering assumption recorded with the project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assumption {
    /// Short identifier (e.g., "A1")
    pub id: String,

    /// Assumption text
    pub text: String,
}

/// Source document the graph was extracted from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDoc {
    /// Short identifier (e.g., "S1")
    pub id: String,

    /// File name or reference
    pub file: String,
}

/// Utility-declared fault duty at the service, input to the stub
/// short-circuit analysis.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ServiceFault {
    /// Available fault current at the service in kA
    #[serde(rename = "available_fault_kA")]
    pub available_fault_ka: f64,
}
