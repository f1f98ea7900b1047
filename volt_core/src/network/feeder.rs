//! # Feeder Elements
//!
//! Edges of the project graph carry the feeder data: the overcurrent
//! protective device ([`Ocpd`]) at the source end and the conductor run
//! ([`Cable`]) between the buses. Both are optional - an edge with neither
//! still records topology.

use serde::{Deserialize, Serialize};

/// Overcurrent protective device kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcpdKind {
    Breaker,
    Fuse,
    Switch,
}

/// Overcurrent protective device at the source end of a feeder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ocpd {
    /// Device kind
    #[serde(rename = "type")]
    pub kind: OcpdKind,

    /// Trip/fuse rating in amperes
    #[serde(rename = "rating_A")]
    pub rating_a: f64,

    /// Interrupting rating in kA, if known
    #[serde(rename = "interrupting_rating_kA", default, skip_serializing_if = "Option::is_none")]
    pub interrupting_rating_ka: Option<f64>,
}

/// Conductor material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Conductor {
    Cu,
    Al,
}

impl Conductor {
    pub fn label(&self) -> &'static str {
        match self {
            Conductor::Cu => "Cu",
            Conductor::Al => "Al",
        }
    }
}

/// Conductor insulation system.
///
/// The placeholder ampacity table carries one value set per temperature
/// column, so insulation only matters for naming; real 310.16 data would
/// key on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Insulation {
    #[serde(rename = "THHN")]
    Thhn,
    #[serde(rename = "XHHW-2")]
    Xhhw2,
}

impl Default for Insulation {
    fn default() -> Self {
        Insulation::Thhn
    }
}

/// Raceway/installation method for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Raceway {
    Emt,
    Pvc,
    Rmc,
}

impl Default for Raceway {
    fn default() -> Self {
        Raceway::Emt
    }
}

fn default_qty() -> u32 {
    1
}

fn default_temp_rating() -> u32 {
    75
}

/// Conductor run between two buses.
///
/// ## JSON Example
///
/// ```json
/// {
///   "conductor": "Cu",
///   "size_awg": "#1",
///   "qty_per_phase": 3,
///   "egc_awg": "#8",
///   "length_ft": 135
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cable {
    /// Conductor material
    pub conductor: Conductor,

    /// AWG or kcmil size (e.g., "#1", "4/0", "250")
    pub size_awg: String,

    /// Parallel conductors per phase (1 = no parallel sets)
    #[serde(default = "default_qty")]
    pub qty_per_phase: u32,

    /// Insulation system
    #[serde(default)]
    pub insulation: Insulation,

    /// Insulation temperature rating in °C (60/75/90)
    #[serde(rename = "temp_rating_C", default = "default_temp_rating")]
    pub temp_rating_c: u32,

    /// Raceway type for the run
    #[serde(default)]
    pub raceway: Raceway,

    /// Run length in feet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_ft: Option<f64>,

    /// Equipment grounding conductor size, if specified on drawings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub egc_awg: Option<String>,

    /// Neutral carries harmonic/unbalanced current and counts as a CCC
    #[serde(default)]
    pub neutral_counts_as_ccc: bool,

    /// Ambient temperature in °C (defaults to 30 °C when absent)
    #[serde(rename = "ambient_C", default, skip_serializing_if = "Option::is_none")]
    pub ambient_c: Option<f64>,

    /// Height above rooftop in inches, if installed on a roof
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rooftop_height_in: Option<f64>,

    /// Run is a feeder tap (240.21(B) rules apply instead of plain ampacity)
    #[serde(default)]
    pub is_tap: bool,

    /// Tap terminates in an OCPD rated at or below the conductor ampacity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tap_termination_has_ocpd: Option<bool>,
}

impl Cable {
    /// Create a cable with defaults for everything except material and size.
    pub fn new(conductor: Conductor, size_awg: impl Into<String>) -> Self {
        Cable {
            conductor,
            size_awg: size_awg.into(),
            qty_per_phase: 1,
            insulation: Insulation::default(),
            temp_rating_c: 75,
            raceway: Raceway::default(),
            length_ft: None,
            egc_awg: None,
            neutral_counts_as_ccc: false,
            ambient_c: None,
            rooftop_height_in: None,
            is_tap: false,
            tap_termination_has_ocpd: None,
        }
    }

    /// Number of current-carrying conductors in the raceway.
    ///
    /// Three per set, four when the neutral counts as a CCC.
    pub fn circuit_conductors(&self) -> u32 {
        let per_set = if self.neutral_counts_as_ccc { 4 } else { 3 };
        self.parallel_sets() * per_set
    }

    /// Parallel set count, clamped to at least one.
    pub fn parallel_sets(&self) -> u32 {
        self.qty_per_phase.max(1)
    }
}

/// Directed edge of the project graph: power flows `from` -> `to`.
///
/// JSON uses `"from"`/`"to"` keys; the Rust fields carry an `_id` suffix
/// because `from` is a keyword.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// Source bus id
    #[serde(rename = "from")]
    pub from_id: String,

    /// Destination bus id
    #[serde(rename = "to")]
    pub to_id: String,

    /// Protective device at the source end
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocpd: Option<Ocpd>,

    /// Conductor run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cable: Option<Cable>,
}

impl Edge {
    /// Create a bare topology edge.
    pub fn new(from_id: impl Into<String>, to_id: impl Into<String>) -> Self {
        Edge {
            from_id: from_id.into(),
            to_id: to_id.into(),
            ocpd: None,
            cable: None,
        }
    }
}
