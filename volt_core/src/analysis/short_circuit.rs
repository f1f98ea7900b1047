//! # Short-Circuit Estimate
//!
//! Two fidelity levels, both deliberately simple:
//!
//! - **Thevenin walk**: buses with a declared available fault current seed a
//!   driving-point impedance `Z = V / (sqrt(3) * I)`; walking downstream
//!   adds each feeder's R + jX, and the fault at a bus is
//!   `V / (sqrt(3) * |Z|)`. No motor contribution, no transformer modeling.
//! - **Stub propagation**: when only a service-level figure exists, it is
//!   copied to every bus unreduced - a conservative placeholder.
//!
//! The walk runs whenever any bus is seeded; otherwise the stub runs off
//! `service_fault`.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::network::Edge;
use crate::project::ProjectGraph;
use crate::tables::impedance::conductor_impedance;

const SQRT3: f64 = 1.732_050_807_568_877_2;

/// Available fault estimate at one bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaultRow {
    /// Bus id
    pub bus: String,

    /// Estimated available fault current in kA
    #[serde(rename = "available_fault_kA")]
    pub available_fault_ka: f64,

    /// Magnitude of the Thevenin impedance in ohms (walk only)
    #[serde(rename = "Z_th_ohm")]
    pub thevenin_ohm: Option<f64>,

    /// "thevenin" or "stub"
    pub method: String,
}

/// Series impedance of a feeder run as (R, X); zero when undataed.
fn edge_impedance(edge: &Edge) -> (f64, f64) {
    let Some(cable) = &edge.cable else {
        return (0.0, 0.0);
    };
    let Some(length_ft) = cable.length_ft else {
        return (0.0, 0.0);
    };
    conductor_impedance(
        cable.conductor,
        &cable.size_awg,
        length_ft,
        cable.raceway,
        cable.qty_per_phase,
    )
    .unwrap_or((0.0, 0.0))
}

fn thevenin_walk(graph: &ProjectGraph) -> Vec<FaultRow> {
    // Seed driving-point impedances from declared fault duties
    let mut z_map: HashMap<String, (f64, f64)> = HashMap::new();
    for node in &graph.nodes {
        let (Some(fault_ka), Some(voltage)) = (node.available_fault_ka, node.operating_voltage())
        else {
            continue;
        };
        if fault_ka <= 0.0 || voltage <= 0.0 {
            continue;
        }
        let z = voltage / (SQRT3 * fault_ka * 1000.0);
        z_map.insert(node.id.clone(), (z, 0.0));
    }

    let mut children: HashMap<&str, Vec<&Edge>> = HashMap::new();
    for edge in &graph.edges {
        children.entry(edge.from_id.as_str()).or_default().push(edge);
    }

    let mut queue: VecDeque<String> = z_map.keys().cloned().collect();
    let mut seen: HashSet<(String, String)> = HashSet::new();
    while let Some(parent_id) = queue.pop_front() {
        let Some(parent_z) = z_map.get(&parent_id).copied() else {
            continue;
        };
        for edge in children.get(parent_id.as_str()).into_iter().flatten() {
            let key = (edge.from_id.clone(), edge.to_id.clone());
            if !seen.insert(key) {
                continue;
            }
            let (r, x) = edge_impedance(edge);
            z_map.insert(edge.to_id.clone(), (parent_z.0 + r, parent_z.1 + x));
            queue.push_back(edge.to_id.clone());
        }
    }

    let mut rows = Vec::new();
    for node in &graph.nodes {
        let Some((r, x)) = z_map.get(&node.id) else {
            continue;
        };
        let Some(voltage) = node.operating_voltage() else {
            continue;
        };
        let magnitude = (r * r + x * x).sqrt();
        if magnitude <= 0.0 || voltage <= 0.0 {
            continue;
        }
        rows.push(FaultRow {
            bus: node.id.clone(),
            available_fault_ka: voltage / (SQRT3 * magnitude) / 1000.0,
            thevenin_ohm: Some(magnitude),
            method: "thevenin".to_string(),
        });
    }
    rows
}

fn stub_propagation(graph: &ProjectGraph, fault_ka: f64) -> Vec<FaultRow> {
    graph
        .nodes
        .iter()
        .map(|node| FaultRow {
            bus: node.id.clone(),
            available_fault_ka: fault_ka,
            thevenin_ohm: None,
            method: "stub".to_string(),
        })
        .collect()
}

/// Estimate the available fault current at each bus.
///
/// Returns an empty list when no fault input exists at all; the coverage
/// validator flags that condition when the analysis is enabled.
pub fn run_short_circuit(graph: &ProjectGraph) -> Vec<FaultRow> {
    let seeded = graph
        .nodes
        .iter()
        .any(|n| n.available_fault_ka.is_some() && n.operating_voltage().is_some());
    if seeded {
        return thevenin_walk(graph);
    }
    if let Some(service) = graph.service_fault {
        return stub_propagation(graph, service.available_fault_ka);
    }
    Vec::new()
}
