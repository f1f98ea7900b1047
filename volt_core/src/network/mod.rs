//! # Network Elements
//!
//! Typed building blocks of the project graph: buses ([`Node`]), the feeders
//! that connect them ([`Edge`] with optional [`Ocpd`] and [`Cable`] data),
//! and panel schedules.
//!
//! All types serialize to the project JSON schema. Field names follow the
//! wire format (`voltage_ll_V`, `rating_A`, `kVA`) via serde renames so that
//! Rust code stays snake_case.
//!
//! ## Submodules
//!
//! - [`feeder`] - Edge, OCPD, and cable definitions
//! - [`panel`] - Panel schedules and entries

pub mod feeder;
pub mod panel;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use feeder::{Cable, Conductor, Edge, Insulation, Ocpd, OcpdKind, Raceway};
pub use panel::{PanelEntry, PanelSchedule};

/// Bus/equipment category for a node in the project graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Utility service entrance
    UtilityService,
    /// Transformer (primary/secondary voltages on the node)
    Transformer,
    /// Switchboard or switchgear lineup
    Switchboard,
    /// Panelboard
    Panel,
    /// Disconnect switch
    Disconnect,
    /// Motor control center
    Mcc,
    /// Terminal load (motor, receptacle group, equipment)
    Load,
}

impl NodeKind {
    /// Short display label used in report rows
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::UtilityService => "utility_service",
            NodeKind::Transformer => "transformer",
            NodeKind::Switchboard => "switchboard",
            NodeKind::Panel => "panel",
            NodeKind::Disconnect => "disconnect",
            NodeKind::Mcc => "mcc",
            NodeKind::Load => "load",
        }
    }
}

/// Phase connection of a bus or load.
///
/// Serializes as the bare phase string ("A", "AB", "ABC", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phases {
    A,
    B,
    C,
    AB,
    BC,
    CA,
    ABC,
}

impl Phases {
    /// Number of phase conductors
    pub fn count(&self) -> u32 {
        match self {
            Phases::A | Phases::B | Phases::C => 1,
            Phases::AB | Phases::BC | Phases::CA => 2,
            Phases::ABC => 3,
        }
    }

    /// Individual phases present in this connection
    pub fn letters(&self) -> &'static [char] {
        match self {
            Phases::A => &['A'],
            Phases::B => &['B'],
            Phases::C => &['C'],
            Phases::AB => &['A', 'B'],
            Phases::BC => &['B', 'C'],
            Phases::CA => &['C', 'A'],
            Phases::ABC => &['A', 'B', 'C'],
        }
    }

    /// True if every phase of `other` is available on `self`.
    ///
    /// Used to check that a downstream connection can actually be served
    /// from the upstream bus (e.g., a BC load cannot hang off an A-only bus).
    pub fn supplies(&self, other: Phases) -> bool {
        other
            .letters()
            .iter()
            .all(|p| self.letters().contains(p))
    }
}

/// A bus in the project graph: service, transformer, board, panel, or load.
///
/// Most fields are optional because extraction from drawings is incremental;
/// the validators report what is missing for the enabled analyses.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "P4L4D",
///   "type": "panel",
///   "voltage_ll_V": 208,
///   "phases": "ABC",
///   "rating_A": 400
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique bus identifier (e.g., "P4L4D", "NEW-SP")
    pub id: String,

    /// Equipment category
    #[serde(rename = "type")]
    pub kind: NodeKind,

    /// Optional human-readable name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Line-to-line voltage in volts
    #[serde(rename = "voltage_ll_V", default, skip_serializing_if = "Option::is_none")]
    pub voltage_ll_v: Option<f64>,

    /// Transformer primary voltage in volts
    #[serde(rename = "pri_V", default, skip_serializing_if = "Option::is_none")]
    pub pri_v: Option<f64>,

    /// Transformer secondary voltage in volts
    #[serde(rename = "sec_V", default, skip_serializing_if = "Option::is_none")]
    pub sec_v: Option<f64>,

    /// Phase connection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phases: Option<Phases>,

    /// Bus/main rating in amperes
    #[serde(rename = "rating_A", default, skip_serializing_if = "Option::is_none")]
    pub rating_a: Option<f64>,

    /// Main-lugs-only panel (no main breaker)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mlo: Option<bool>,

    /// Connected load in kVA (load nodes)
    #[serde(rename = "kVA", default, skip_serializing_if = "Option::is_none")]
    pub kva: Option<f64>,

    /// Connected load in kW, converted through the power factor when kVA
    /// was not entered
    #[serde(rename = "kW", default, skip_serializing_if = "Option::is_none")]
    pub kw: Option<f64>,

    /// Load is continuous (3+ hours), subject to the 125 % factor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continuous: Option<bool>,

    /// Load power factor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pf: Option<f64>,

    /// Declared available fault current at this bus in kA (seeds the
    /// short-circuit walk)
    #[serde(rename = "available_fault_kA", default, skip_serializing_if = "Option::is_none")]
    pub available_fault_ka: Option<f64>,

    /// Short-circuit current rating of the equipment in kA
    #[serde(rename = "sccr_kA", default, skip_serializing_if = "Option::is_none")]
    pub sccr_ka: Option<f64>,
}

impl Node {
    /// Create a bare node with just an id and kind.
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Node {
            id: id.into(),
            kind,
            name: None,
            voltage_ll_v: None,
            pri_v: None,
            sec_v: None,
            phases: None,
            rating_a: None,
            mlo: None,
            kva: None,
            kw: None,
            continuous: None,
            pf: None,
            available_fault_ka: None,
            sccr_ka: None,
        }
    }

    /// Number of phases, defaulting to three when unspecified.
    pub fn phase_count(&self) -> u32 {
        self.phases.map(|p| p.count()).unwrap_or(3)
    }

    /// Operating voltage: line-to-line if set, then the transformer
    /// secondary, then the primary.
    pub fn operating_voltage(&self) -> Option<f64> {
        self.voltage_ll_v.or(self.sec_v).or(self.pri_v)
    }
}
