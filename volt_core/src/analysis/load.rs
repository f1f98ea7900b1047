//! # Load Rollup
//!
//! Aggregates connected load up the feeder topology and converts it to
//! design current per bus.
//!
//! Panel-schedule entries carry the 125 % continuous factor. An entry whose
//! description or circuit text names a downstream bus is treated as that
//! bus's load (so a "NEW-SP feeder" row lands on NEW-SP, not on the panel
//! that feeds it); everything else counts at the panel. Node-level kVA
//! (terminal loads) adds on top. Loads then roll up children-into-parents in
//! reverse topological order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::project::ProjectGraph;

const SQRT3: f64 = 1.732_050_807_568_877_2;

/// Per-bus row of the panel summary report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelSummaryRow {
    /// Bus id
    pub bus: String,

    /// Equipment category label
    pub kind: String,

    /// Operating line-to-line voltage
    #[serde(rename = "voltage_ll_V")]
    pub voltage_ll_v: Option<f64>,

    /// Bus rating in amperes
    #[serde(rename = "rating_A")]
    pub rating_a: Option<f64>,

    /// Continuous kVA on this bus's own schedule (raw, no factor)
    #[serde(rename = "kVA_cont")]
    pub kva_cont: f64,

    /// Non-continuous kVA on this bus's own schedule
    #[serde(rename = "kVA_noncont")]
    pub kva_noncont: f64,

    /// Design kVA landing on this bus before rollup (125 % factor applied)
    #[serde(rename = "kVA_design")]
    pub kva_design: f64,

    /// Total design kVA including everything downstream
    #[serde(rename = "kVA_total")]
    pub kva_total: f64,

    /// Design current in amperes, if the voltage is known
    #[serde(rename = "I_design_A")]
    pub current_a: Option<f64>,

    /// Design current as a percentage of the bus rating
    pub utilization_pct: Option<f64>,

    /// Spare capacity in amperes (rating minus design current)
    #[serde(rename = "margin_A")]
    pub margin_a: Option<f64>,
}

/// Results of the load rollup: report rows plus the per-bus design currents
/// the other analyses consume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadResults {
    /// One row per node, in declared node order
    pub rows: Vec<PanelSummaryRow>,

    /// Design current per bus id
    currents: HashMap<String, f64>,
}

impl LoadResults {
    /// Design current at a bus, zero when unknown.
    pub fn current_at(&self, bus: &str) -> f64 {
        self.currents.get(bus).copied().unwrap_or(0.0)
    }
}

/// Design kVA landing directly on each bus, before rollup.
fn base_loads(graph: &ProjectGraph) -> HashMap<String, f64> {
    let mut base: HashMap<String, f64> = HashMap::new();

    // Terminal loads declared on nodes; kW converts through the power factor
    for node in &graph.nodes {
        let mut kva = match (node.kva, node.kw) {
            (Some(kva), _) => kva,
            (None, Some(kw)) => kw / node.pf.unwrap_or(1.0).max(1e-6),
            (None, None) => 0.0,
        };
        if node.continuous.unwrap_or(false) {
            kva *= 1.25;
        }
        base.insert(node.id.clone(), kva);
    }

    // Panel-schedule entries, assigned to a named child where possible
    let adjacency = graph.adjacency();
    for schedule in &graph.panel_schedules {
        let children = adjacency
            .get(schedule.panel_id.as_str())
            .cloned()
            .unwrap_or_default();
        for entry in &schedule.entries {
            let value = entry.design_kva();
            if value == 0.0 {
                continue;
            }
            let desc = entry.desc.to_uppercase();
            let ckt = entry.ckt.to_uppercase();
            let target = children
                .iter()
                .find(|child| {
                    let token = child.to_uppercase();
                    !token.is_empty() && (desc.contains(&token) || ckt.contains(&token))
                })
                .map(|child| child.to_string())
                .unwrap_or_else(|| schedule.panel_id.clone());
            *base.entry(target).or_insert(0.0) += value;
        }
    }

    base
}

/// Run the load rollup over the whole graph.
pub fn run_load_calc(graph: &ProjectGraph) -> LoadResults {
    let mut aggregated = base_loads(graph);

    // Children finalize before parents read them
    let parents = graph.parents();
    for node_id in graph.topological_order().iter().rev() {
        let load = aggregated.get(node_id).copied().unwrap_or(0.0);
        for parent in parents.get(node_id.as_str()).into_iter().flatten() {
            *aggregated.entry(parent.to_string()).or_insert(0.0) += load;
        }
    }

    let base = base_loads(graph);
    let mut currents = HashMap::new();
    let mut rows = Vec::with_capacity(graph.nodes.len());

    for node in &graph.nodes {
        let (cont, noncont) = graph
            .schedule_for(&node.id)
            .map(|s| s.totals_kva())
            .unwrap_or((0.0, 0.0));
        let total = aggregated.get(&node.id).copied().unwrap_or(0.0);

        let current_a = node.operating_voltage().filter(|v| *v > 0.0).map(|v_ll| {
            if node.phase_count() == 1 {
                // Single-phase loads see line-to-neutral voltage
                total * 1000.0 / (v_ll / SQRT3)
            } else {
                total * 1000.0 / (SQRT3 * v_ll)
            }
        });
        if let Some(current) = current_a {
            currents.insert(node.id.clone(), current);
        }

        let utilization_pct = match (current_a, node.rating_a) {
            (Some(i), Some(rating)) if rating > 0.0 => Some(i / rating * 100.0),
            _ => None,
        };
        let margin_a = match (current_a, node.rating_a) {
            (Some(i), Some(rating)) => Some(rating - i),
            _ => None,
        };

        rows.push(PanelSummaryRow {
            bus: node.id.clone(),
            kind: node.kind.label().to_string(),
            voltage_ll_v: node.operating_voltage(),
            rating_a: node.rating_a,
            kva_cont: cont,
            kva_noncont: noncont,
            kva_design: base.get(&node.id).copied().unwrap_or(0.0),
            kva_total: total,
            current_a,
            utilization_pct,
            margin_a,
        });
    }

    LoadResults { rows, currents }
}
