//! # Deterministic Analyses
//!
//! Pure, single-threaded calculations over the project graph. Each analysis
//! follows the pattern:
//!
//! - row structs that serialize cleanly to JSON/CSV
//! - `run_*(graph, ...) -> rows` free functions
//!
//! [`run_analysis`] orchestrates the set, honoring the project's
//! [`AnalysisFlags`](crate::project::AnalysisFlags). The load rollup always
//! runs internally because voltage drop and tap checks consume its design
//! currents; its report rows are included only when the flag is on.
//!
//! ## Available analyses
//!
//! - [`load`] - panel summary and design currents
//! - [`voltage_drop`] - per-edge feeder checks and per-path accumulation
//! - [`short_circuit`] - available-fault estimate (Thevenin walk or stub)
//! - [`taps`] - 240.21(B) feeder tap rules

pub mod load;
pub mod short_circuit;
pub mod taps;
pub mod voltage_drop;

use serde::{Deserialize, Serialize};

use crate::errors::EeResult;
use crate::project::ProjectGraph;

// Re-export commonly used types
pub use load::{run_load_calc, LoadResults, PanelSummaryRow};
pub use short_circuit::{run_short_circuit, FaultRow};
pub use taps::{check_feeder_taps, TapCheck};
pub use voltage_drop::{run_voltage_drop, EdgeCheck, PathDrop, VoltageDropResults};

/// Complete output of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResults {
    /// Panel summary rows (present when the load flag is on)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panel_summary: Option<Vec<PanelSummaryRow>>,

    /// Feeder checks and path drops (present when the voltage-drop flag is on)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voltage_drop: Option<VoltageDropResults>,

    /// Available-fault rows (present when the short-circuit flag is on)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_circuit: Option<Vec<FaultRow>>,

    /// Tap checks (always evaluated; empty when the project has no taps)
    pub tap_checks: Vec<TapCheck>,
}

/// Run all enabled analyses over the graph.
pub fn run_analysis(graph: &ProjectGraph) -> EeResult<AnalysisResults> {
    let loads = run_load_calc(graph);

    let voltage_drop = if graph.flags.voltage_drop {
        Some(run_voltage_drop(graph, &loads))
    } else {
        None
    };

    let short_circuit = if graph.flags.short_circuit {
        Some(run_short_circuit(graph))
    } else {
        None
    };

    let tap_checks = check_feeder_taps(graph, &loads)?;

    let panel_summary = if graph.flags.load {
        Some(loads.rows)
    } else {
        None
    };

    Ok(AnalysisResults {
        panel_summary,
        voltage_drop,
        short_circuit,
        tap_checks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ServiceFault;
    use crate::test_fixtures::sample_graph;

    #[test]
    fn test_flags_control_sections() {
        let graph = sample_graph();
        let results = run_analysis(&graph).unwrap();
        assert!(results.panel_summary.is_some());
        assert!(results.voltage_drop.is_some());
        assert!(results.short_circuit.is_none());
        assert!(results.tap_checks.is_empty());
    }

    #[test]
    fn test_short_circuit_flag() {
        let mut graph = sample_graph();
        graph.flags.short_circuit = true;
        graph.service_fault = Some(ServiceFault {
            available_fault_ka: 22.0,
        });
        let results = run_analysis(&graph).unwrap();
        let rows = results.short_circuit.unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_disabled_load_still_feeds_voltage_drop() {
        let mut graph = sample_graph();
        graph.flags.load = false;
        let results = run_analysis(&graph).unwrap();
        assert!(results.panel_summary.is_none());
        // Currents still flowed into the feeder checks
        let vd = results.voltage_drop.unwrap();
        assert!(vd.per_edge[1].current_a > 0.0);
    }

    #[test]
    fn test_results_serialize() {
        let results = run_analysis(&sample_graph()).unwrap();
        let json = serde_json::to_string_pretty(&results).unwrap();
        assert!(json.contains("panel_summary"));
        assert!(json.contains("NEW-SP"));
        assert!(!json.contains("short_circuit"));
    }
}
