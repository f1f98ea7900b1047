//! # Feeder Checks and Voltage Drop
//!
//! Per-edge feeder checks (adjusted ampacity, raceway fill, EGC sizing, and
//! voltage drop against the segment limit) plus per-path accumulation of
//! drop from the source down to each bus against the total limit.
//!
//! Edges with missing data (no cable, no length, unknown voltage, a size the
//! placeholder tables don't carry) produce rows with `None` values rather
//! than failing the whole analysis.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::analysis::load::LoadResults;
use crate::network::Edge;
use crate::project::ProjectGraph;
use crate::tables::ampacity::{ampacity_adjusted, ampacity_at_90c};
use crate::tables::grounding::{equipment_ground_size, upsized_equipment_ground};
use crate::tables::impedance::{conductor_impedance, percent_voltage_drop};
use crate::tables::raceway::minimum_raceway_size;

const SQRT3: f64 = 1.732_050_807_568_877_2;

/// Per-edge feeder check row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeCheck {
    /// Source bus id
    pub from: String,

    /// Destination bus id
    pub to: String,

    /// Conductor size, when a cable is present
    pub size_awg: Option<String>,

    /// Design current through the feeder (load at the destination bus)
    #[serde(rename = "I_A")]
    pub current_a: f64,

    /// Adjusted ampacity including corrections and parallel sets
    #[serde(rename = "ampacity_A")]
    pub ampacity_a: Option<f64>,

    /// Voltage drop across the run in volts
    #[serde(rename = "VD_V")]
    pub drop_v: Option<f64>,

    /// Voltage drop as a percentage of nominal
    #[serde(rename = "VD_pct")]
    pub drop_pct: Option<f64>,

    /// Drop within the per-segment limit
    pub within_limit: Option<bool>,

    /// Minimum EMT trade size for the conductors at 40 % fill
    pub min_raceway_in: Option<f64>,

    /// Equipment grounding conductor: as drawn, or sized from the OCPD
    pub egc_awg: Option<String>,
}

/// Accumulated voltage drop from the source down to one bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathDrop {
    /// Bus id
    pub bus: String,

    /// Worst-case cumulative drop in volts
    #[serde(rename = "VD_V")]
    pub drop_v: f64,

    /// Worst-case cumulative drop in percent
    #[serde(rename = "VD_pct")]
    pub drop_pct: f64,

    /// Cumulative drop within the total limit
    pub within_total_limit: bool,
}

/// Results of the feeder check pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoltageDropResults {
    /// One row per edge, in declared edge order
    pub per_edge: Vec<EdgeCheck>,

    /// One row per node, in declared node order
    pub per_path: Vec<PathDrop>,
}

fn edge_drop(graph: &ProjectGraph, edge: &Edge, current_a: f64) -> (Option<f64>, Option<f64>) {
    let Some(cable) = &edge.cable else {
        return (None, None);
    };
    let Some(length_ft) = cable.length_ft else {
        return (None, None);
    };
    let Some(voltage_ll) = graph.node_voltage(&edge.to_id) else {
        return (None, None);
    };
    if voltage_ll <= 0.0 {
        return (None, None);
    }
    let Ok((r, x)) = conductor_impedance(
        cable.conductor,
        &cable.size_awg,
        length_ft,
        cable.raceway,
        cable.qty_per_phase,
    ) else {
        return (None, None);
    };

    let pf = graph.config.pf.clamp(0.0, 1.0);
    let single_phase = graph
        .node(&edge.to_id)
        .map(|n| n.phase_count() == 1)
        .unwrap_or(false);
    let (drop_v, drop_pct) = if single_phase {
        // Out-and-back on a line-to-neutral circuit
        let sin_phi = (1.0 - pf * pf).max(0.0).sqrt();
        let drop_v = 2.0 * current_a * (r * pf + x * sin_phi);
        (drop_v, drop_v / (voltage_ll / SQRT3) * 100.0)
    } else {
        let pct = percent_voltage_drop(current_a, voltage_ll, r, x, pf);
        (pct / 100.0 * voltage_ll, pct)
    };
    (Some(drop_v), Some(drop_pct))
}

fn check_edge(graph: &ProjectGraph, edge: &Edge, loads: &LoadResults) -> EdgeCheck {
    let current_a = loads.current_at(&edge.to_id);
    let (drop_v, drop_pct) = edge_drop(graph, edge, current_a);
    let within_limit = drop_pct.map(|pct| pct <= graph.config.vd_feeder_pct);

    let cable = edge.cable.as_ref();
    let ampacity_a = cable.and_then(|c| ampacity_adjusted(c).ok());

    // Explicit EGC wins; otherwise size from the OCPD rating with the
    // 250.122(B) proportional upsizing when derating shrank the run
    let egc_awg = cable.and_then(|c| c.egc_awg.clone()).or_else(|| {
        cable.map(|c| {
            let ocpd_rating = edge
                .ocpd
                .as_ref()
                .map(|o| o.rating_a)
                .unwrap_or(current_a * 1.25);
            let upsizing = match (ampacity_at_90c(c), ampacity_adjusted(c)) {
                (Ok(base), Ok(adjusted)) if adjusted > 0.0 => base / adjusted,
                _ => 1.0,
            };
            upsized_equipment_ground(ocpd_rating, upsizing, c.conductor)
                .unwrap_or(equipment_ground_size(ocpd_rating, c.conductor))
                .to_string()
        })
    });

    let min_raceway_in = cable.and_then(|c| {
        let mut conductors = vec![(c.size_awg.as_str(), c.circuit_conductors())];
        if let Some(egc) = &egc_awg {
            conductors.push((egc.as_str(), c.parallel_sets()));
        }
        minimum_raceway_size(&conductors, 0.4).ok()
    });

    EdgeCheck {
        from: edge.from_id.clone(),
        to: edge.to_id.clone(),
        size_awg: cable.map(|c| c.size_awg.clone()),
        current_a,
        ampacity_a,
        drop_v,
        drop_pct,
        within_limit,
        min_raceway_in,
        egc_awg,
    }
}

/// Worst cumulative (volts, percent) drop from any source down to `bus`.
fn accumulate(
    bus: &str,
    incoming: &HashMap<&str, Vec<usize>>,
    edges: &[Edge],
    per_edge: &[EdgeCheck],
    memo: &mut HashMap<String, (f64, f64)>,
    visiting: &mut HashSet<String>,
) -> (f64, f64) {
    if let Some(cached) = memo.get(bus) {
        return *cached;
    }
    // Cycle guard; the topology validator reports the cycle itself
    if !visiting.insert(bus.to_string()) {
        return (0.0, 0.0);
    }

    let mut worst = (0.0, 0.0);
    for idx in incoming.get(bus).into_iter().flatten() {
        let upstream = accumulate(
            &edges[*idx].from_id,
            incoming,
            edges,
            per_edge,
            memo,
            visiting,
        );
        let total_v = upstream.0 + per_edge[*idx].drop_v.unwrap_or(0.0);
        let total_pct = upstream.1 + per_edge[*idx].drop_pct.unwrap_or(0.0);
        if total_v > worst.0 {
            worst = (total_v, total_pct);
        }
    }

    visiting.remove(bus);
    memo.insert(bus.to_string(), worst);
    worst
}

/// Run the feeder checks and path accumulation.
pub fn run_voltage_drop(graph: &ProjectGraph, loads: &LoadResults) -> VoltageDropResults {
    let per_edge: Vec<EdgeCheck> = graph
        .edges
        .iter()
        .map(|edge| check_edge(graph, edge, loads))
        .collect();

    let mut incoming: HashMap<&str, Vec<usize>> = HashMap::new();
    for (idx, edge) in graph.edges.iter().enumerate() {
        incoming.entry(edge.to_id.as_str()).or_default().push(idx);
    }

    let mut memo = HashMap::new();
    let mut visiting = HashSet::new();
    let per_path = graph
        .nodes
        .iter()
        .map(|node| {
            let (drop_v, drop_pct) = accumulate(
                &node.id,
                &incoming,
                &graph.edges,
                &per_edge,
                &mut memo,
                &mut visiting,
            );
            PathDrop {
                bus: node.id.clone(),
                drop_v,
                drop_pct,
                within_total_limit: drop_pct <= graph.config.vd_total_pct,
            }
        })
        .collect();

    VoltageDropResults { per_edge, per_path }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::load::run_load_calc;
    use crate::test_fixtures::sample_graph;

    #[test]
    fn test_subpanel_feeder_drop() {
        let graph = sample_graph();
        let loads = run_load_calc(&graph);
        let results = run_voltage_drop(&graph, &loads);

        let feeder = &results.per_edge[1];
        assert_eq!(feeder.to, "NEW-SP");
        let pct = feeder.drop_pct.unwrap();
        assert!(pct > 0.0);
        assert!(pct < 3.0, "3x #1 Cu at 135 ft should be comfortably under 3 %");
        assert_eq!(feeder.within_limit, Some(true));
        // 3 parallel #1 Cu: 130 A base x 0.7 bundling x 3 sets
        assert!((feeder.ampacity_a.unwrap() - 130.0 * 0.7 * 3.0).abs() < 1e-9);
        assert_eq!(feeder.egc_awg.as_deref(), Some("#8"));
        assert!(feeder.min_raceway_in.unwrap() >= 1.0);
    }

    #[test]
    fn test_edge_without_cable_yields_none() {
        let graph = sample_graph();
        let loads = run_load_calc(&graph);
        let results = run_voltage_drop(&graph, &loads);

        let service = &results.per_edge[0];
        assert!(service.drop_pct.is_none());
        assert!(service.ampacity_a.is_none());
        assert!(service.within_limit.is_none());
    }

    #[test]
    fn test_path_accumulation() {
        let graph = sample_graph();
        let loads = run_load_calc(&graph);
        let results = run_voltage_drop(&graph, &loads);

        let edge_pct = results.per_edge[1].drop_pct.unwrap();
        let subpanel = results
            .per_path
            .iter()
            .find(|p| p.bus == "NEW-SP")
            .unwrap();
        // Service edge has no cable, so the path total equals the feeder drop
        assert!((subpanel.drop_pct - edge_pct).abs() < 1e-12);
        assert!(subpanel.within_total_limit);

        let service = results.per_path.iter().find(|p| p.bus == "UTIL1").unwrap();
        assert_eq!(service.drop_pct, 0.0);
    }

    #[test]
    fn test_long_undersized_run_flagged() {
        let mut graph = sample_graph();
        {
            let cable = graph.edges[1].cable.as_mut().unwrap();
            cable.size_awg = "#6".to_string();
            cable.qty_per_phase = 1;
            cable.length_ft = Some(400.0);
        }
        let loads = run_load_calc(&graph);
        let results = run_voltage_drop(&graph, &loads);

        let feeder = &results.per_edge[1];
        assert!(feeder.drop_pct.unwrap() > 3.0);
        assert_eq!(feeder.within_limit, Some(false));
        let subpanel = results
            .per_path
            .iter()
            .find(|p| p.bus == "NEW-SP")
            .unwrap();
        assert!(!subpanel.within_total_limit);
    }

    #[test]
    fn test_egc_sized_from_ocpd_when_not_drawn() {
        let mut graph = sample_graph();
        graph.edges[1].cable.as_mut().unwrap().egc_awg = None;
        let loads = run_load_calc(&graph);
        let results = run_voltage_drop(&graph, &loads);
        // 100 A breaker -> #8 Cu base; the 90 C column has 145/130 headroom
        // over the capped run, so the ground bumps one size
        assert_eq!(results.per_edge[1].egc_awg.as_deref(), Some("#6"));
    }

    #[test]
    fn test_egc_without_ocpd_uses_design_current() {
        let mut graph = sample_graph();
        {
            let edge = &mut graph.edges[1];
            edge.ocpd = None;
            edge.cable.as_mut().unwrap().egc_awg = None;
        }
        let loads = run_load_calc(&graph);
        let results = run_voltage_drop(&graph, &loads);
        // 124.9 A x 1.25 = 156 A -> #6 Cu base, bumped one size
        assert_eq!(results.per_edge[1].egc_awg.as_deref(), Some("#4"));
    }

    #[test]
    fn test_computed_egc_feeds_raceway_fill() {
        let mut graph = sample_graph();
        graph.edges[1].cable.as_mut().unwrap().egc_awg = None;
        let loads = run_load_calc(&graph);
        let results = run_voltage_drop(&graph, &loads);
        // The fill calc sees the computed ground, not just the phase set
        assert!(results.per_edge[1].min_raceway_in.unwrap() >= 1.0);
    }
}
