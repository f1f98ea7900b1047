//! # Project Graph Validators
//!
//! Each validator inspects the whole graph and returns a list of
//! [`Issue`]s; [`validate_project`] runs the standard set in order and
//! flattens the results. Validators never mutate the graph and never fail -
//! bad data becomes issues, not errors.
//!
//! ## Standard set
//!
//! 1. [`TopologyValidator`] - edge references and acyclicity
//! 2. [`VoltagePhaseValidator`] - voltage and phasing compatibility
//! 3. [`PanelProtectionValidator`] - OCPD presence on panel feeders
//! 4. [`AmpacityValidator`] - feeder ampacity vs OCPD rating
//! 5. [`CoverageValidator`] - inputs present for the enabled analyses
//!
//! ## Example
//!
//! ```rust
//! use volt_core::project::ProjectGraph;
//! use volt_core::validate::{validate_project, has_errors};
//!
//! let graph = ProjectGraph::new("Empty", 2020, "CA");
//! let issues = validate_project(&graph);
//! assert!(!has_errors(&issues));
//! ```

pub mod issues;

use std::collections::{HashMap, VecDeque};

pub use issues::{has_errors, Issue, Severity};

use crate::network::NodeKind;
use crate::project::ProjectGraph;
use crate::tables::ampacity::ampacity_base;

/// A single validation rule over the whole project graph.
pub trait Validator {
    /// Stable name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Inspect the graph and report findings.
    fn check(&self, graph: &ProjectGraph) -> Vec<Issue>;
}

/// Checks that edges reference known nodes and the feeder topology is
/// acyclic.
pub struct TopologyValidator;

impl Validator for TopologyValidator {
    fn name(&self) -> &'static str {
        "topology"
    }

    fn check(&self, graph: &ProjectGraph) -> Vec<Issue> {
        let mut issues = Vec::new();

        for (idx, edge) in graph.edges.iter().enumerate() {
            if graph.node(&edge.from_id).is_none() {
                issues.push(Issue::error(
                    "TOPOLOGY_UNKNOWN_FROM",
                    format!("edges[{}].from", idx),
                    format!("Edge references unknown node {}", edge.from_id),
                ));
            }
            if graph.node(&edge.to_id).is_none() {
                issues.push(Issue::error(
                    "TOPOLOGY_UNKNOWN_TO",
                    format!("edges[{}].to", idx),
                    format!("Edge references unknown node {}", edge.to_id),
                ));
            }
        }

        // Kahn's algorithm: anything left unvisited sits on a cycle
        let adjacency = graph.adjacency();
        let mut indegree: HashMap<&str, usize> =
            graph.nodes.iter().map(|n| (n.id.as_str(), 0)).collect();
        for children in adjacency.values() {
            for child in children {
                *indegree.entry(child).or_insert(0) += 1;
            }
        }
        let mut queue: VecDeque<&str> = indegree
            .iter()
            .filter(|(_, deg)| **deg == 0)
            .map(|(id, _)| *id)
            .collect();
        let mut visited = 0usize;
        while let Some(id) = queue.pop_front() {
            visited += 1;
            for child in adjacency.get(id).into_iter().flatten() {
                let deg = indegree.get_mut(child).expect("indegree seeded for all nodes");
                *deg -= 1;
                if *deg == 0 {
                    queue.push_back(child);
                }
            }
        }
        if visited != graph.nodes.len() {
            issues.push(Issue::error(
                "TOPOLOGY_CYCLE",
                "edges",
                "Cycle detected in feeder topology",
            ));
        }

        issues
    }
}

/// Checks voltage and phase compatibility across each edge.
pub struct VoltagePhaseValidator;

impl Validator for VoltagePhaseValidator {
    fn name(&self) -> &'static str {
        "voltage_phase"
    }

    fn check(&self, graph: &ProjectGraph) -> Vec<Issue> {
        let mut issues = Vec::new();

        for (idx, edge) in graph.edges.iter().enumerate() {
            let (Some(upstream), Some(downstream)) =
                (graph.node(&edge.from_id), graph.node(&edge.to_id))
            else {
                continue;
            };

            if let (Some(v_up), Some(v_down)) = (upstream.voltage_ll_v, downstream.voltage_ll_v) {
                // 5 % relative tolerance covers nominal-vs-utilization spreads
                let tolerance = (v_up.abs().max(v_down.abs()) * 0.05).max(1e-3);
                if (v_up - v_down).abs() > tolerance {
                    issues.push(Issue::warning(
                        "VOLTAGE_MISMATCH",
                        format!("edges[{}]", idx),
                        format!(
                            "Voltage mismatch between {} ({} V) and {} ({} V)",
                            edge.from_id, v_up, edge.to_id, v_down
                        ),
                    ));
                }
            }

            if let (Some(p_up), Some(p_down)) = (upstream.phases, downstream.phases) {
                if !p_up.supplies(p_down) {
                    issues.push(Issue::error(
                        "PHASE_INCOMPATIBLE",
                        format!("edges[{}]", idx),
                        format!(
                            "Downstream phases {:?} not available at upstream {:?}",
                            p_down, p_up
                        ),
                    ));
                }
            }
        }

        issues
    }
}

/// Checks that panel feeders carry overcurrent protection.
///
/// An MLO (main-lugs-only) panel has no main breaker, so a feeder without an
/// upstream OCPD leaves it unprotected - that is an error. Panels with mains
/// get a warning instead.
pub struct PanelProtectionValidator;

impl Validator for PanelProtectionValidator {
    fn name(&self) -> &'static str {
        "panel_protection"
    }

    fn check(&self, graph: &ProjectGraph) -> Vec<Issue> {
        let mut issues = Vec::new();

        let mut incoming: HashMap<&str, Vec<usize>> = HashMap::new();
        for (idx, edge) in graph.edges.iter().enumerate() {
            incoming.entry(edge.to_id.as_str()).or_default().push(idx);
        }

        for node in &graph.nodes {
            if node.kind != NodeKind::Panel {
                continue;
            }
            let mlo = node.mlo.unwrap_or(false);
            for idx in incoming.get(node.id.as_str()).into_iter().flatten() {
                if graph.edges[*idx].ocpd.is_some() {
                    continue;
                }
                if mlo {
                    issues.push(Issue::error(
                        "MLO_REQUIRES_OCPD",
                        format!("edges[{}].ocpd", idx),
                        format!("Panel {} is MLO but feeder lacks OCPD", node.id),
                    ));
                } else {
                    issues.push(Issue::warning(
                        "MISSING_OCPD",
                        format!("edges[{}].ocpd", idx),
                        format!("Panel {} feeder should include OCPD", node.id),
                    ));
                }
            }
        }

        issues
    }
}

/// Checks feeder ampacity against the protecting OCPD.
///
/// Uses base table ampacity times parallel sets; unknown sizes or table
/// misses are skipped silently (the placeholder tables are not exhaustive).
pub struct AmpacityValidator;

impl Validator for AmpacityValidator {
    fn name(&self) -> &'static str {
        "ampacity"
    }

    fn check(&self, graph: &ProjectGraph) -> Vec<Issue> {
        let mut issues = Vec::new();

        for (idx, edge) in graph.edges.iter().enumerate() {
            let (Some(ocpd), Some(cable)) = (&edge.ocpd, &edge.cable) else {
                continue;
            };
            let Ok(base) = ampacity_base(&cable.size_awg, cable.conductor, cable.temp_rating_c)
            else {
                continue;
            };
            let effective = base * cable.parallel_sets() as f64;
            if ocpd.rating_a > effective {
                issues.push(Issue::warning(
                    "AMPACITY_LT_OCPD",
                    format!("edges[{}].cable.size_awg", idx),
                    format!(
                        "Feeder ampacity {:.0} A < OCPD rating {:.0} A",
                        effective, ocpd.rating_a
                    ),
                ));
            }
        }

        issues
    }
}

/// Checks that required inputs exist for the enabled analyses.
pub struct CoverageValidator;

impl Validator for CoverageValidator {
    fn name(&self) -> &'static str {
        "coverage"
    }

    fn check(&self, graph: &ProjectGraph) -> Vec<Issue> {
        let mut issues = Vec::new();

        if graph.flags.short_circuit {
            let seeded = graph.service_fault.is_some()
                || graph.nodes.iter().any(|n| n.available_fault_ka.is_some());
            if !seeded {
                issues.push(Issue::error(
                    "SHORT_CIRCUIT_INPUT_MISSING",
                    "service_fault.available_fault_kA",
                    "Short-circuit analysis enabled but no fault current input provided",
                ));
            }
        }

        if graph.flags.load {
            let schedules_present = graph.panel_schedules.iter().any(|s| !s.entries.is_empty());
            let loads_present = graph
                .nodes
                .iter()
                .any(|n| n.kva.or(n.kw).unwrap_or(0.0) > 0.0);
            if !schedules_present && !loads_present {
                issues.push(Issue::warning(
                    "LOAD_INPUT_INCOMPLETE",
                    "panel_schedules",
                    "Load analysis enabled but no panel schedules or node loads provided",
                ));
            }
        }

        issues
    }
}

/// Run the standard validator set and flatten the findings.
pub fn validate_project(graph: &ProjectGraph) -> Vec<Issue> {
    let validators: [&dyn Validator; 5] = [
        &TopologyValidator,
        &VoltagePhaseValidator,
        &PanelProtectionValidator,
        &AmpacityValidator,
        &CoverageValidator,
    ];
    let mut issues = Vec::new();
    for validator in validators {
        issues.extend(validator.check(graph));
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{Cable, Conductor, Edge, Node, NodeKind, Ocpd, OcpdKind, Phases};
    use crate::project::ProjectGraph;
    use crate::test_fixtures::sample_graph;

    fn codes(issues: &[Issue]) -> Vec<&str> {
        issues.iter().map(|i| i.code.as_str()).collect()
    }

    #[test]
    fn test_sample_graph_has_no_errors() {
        let issues = validate_project(&sample_graph());
        assert!(!has_errors(&issues), "unexpected errors: {:?}", issues);
    }

    #[test]
    fn test_unknown_node_reference() {
        let mut graph = sample_graph();
        graph.edges.push(Edge::new("P4L4D", "GHOST"));
        let issues = TopologyValidator.check(&graph);
        assert!(codes(&issues).contains(&"TOPOLOGY_UNKNOWN_TO"));
    }

    #[test]
    fn test_cycle_detection() {
        let mut graph = sample_graph();
        graph.edges.push(Edge::new("NEW-SP", "UTIL1"));
        let issues = TopologyValidator.check(&graph);
        assert!(codes(&issues).contains(&"TOPOLOGY_CYCLE"));
    }

    #[test]
    fn test_voltage_mismatch_warning() {
        let mut graph = sample_graph();
        // 208 V panel fed from a 480 V board
        graph.nodes[0].voltage_ll_v = Some(480.0);
        let issues = VoltagePhaseValidator.check(&graph);
        let mismatch = issues.iter().find(|i| i.code == "VOLTAGE_MISMATCH").unwrap();
        assert_eq!(mismatch.severity, Severity::Warning);
    }

    #[test]
    fn test_phase_incompatible_error() {
        let mut graph = sample_graph();
        graph.nodes[1].phases = Some(Phases::AB);
        graph.nodes[2].phases = Some(Phases::BC);
        let issues = VoltagePhaseValidator.check(&graph);
        let issue = issues.iter().find(|i| i.code == "PHASE_INCOMPATIBLE").unwrap();
        assert_eq!(issue.severity, Severity::Error);
    }

    #[test]
    fn test_mlo_panel_requires_ocpd() {
        let mut graph = sample_graph();
        // Strip the OCPD from the MLO panel feeder
        graph.edges[1].ocpd = None;
        let issues = PanelProtectionValidator.check(&graph);
        let issue = issues.iter().find(|i| i.code == "MLO_REQUIRES_OCPD").unwrap();
        assert_eq!(issue.severity, Severity::Error);
    }

    #[test]
    fn test_non_mlo_panel_warns() {
        let mut graph = sample_graph();
        graph.edges[1].ocpd = None;
        if let Some(node) = graph.nodes.iter_mut().find(|n| n.id == "NEW-SP") {
            node.mlo = Some(false);
        }
        let issues = PanelProtectionValidator.check(&graph);
        let issue = issues.iter().find(|i| i.code == "MISSING_OCPD").unwrap();
        assert_eq!(issue.severity, Severity::Warning);
    }

    #[test]
    fn test_ampacity_vs_ocpd() {
        let mut graph = sample_graph();
        // A single #8 Cu (50 A at 75C) behind a 100 A breaker
        let mut cable = Cable::new(Conductor::Cu, "#8");
        cable.length_ft = Some(50.0);
        graph.edges[1].cable = Some(cable);
        let issues = AmpacityValidator.check(&graph);
        assert!(codes(&issues).contains(&"AMPACITY_LT_OCPD"));
    }

    #[test]
    fn test_ampacity_skips_unknown_size() {
        let mut graph = sample_graph();
        graph.edges[1].cable = Some(Cable::new(Conductor::Cu, "95mm2"));
        let issues = AmpacityValidator.check(&graph);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_coverage_short_circuit_input() {
        let mut graph = sample_graph();
        graph.flags.short_circuit = true;
        graph.service_fault = None;
        for node in &mut graph.nodes {
            node.available_fault_ka = None;
        }
        let issues = CoverageValidator.check(&graph);
        let issue = issues
            .iter()
            .find(|i| i.code == "SHORT_CIRCUIT_INPUT_MISSING")
            .unwrap();
        assert_eq!(issue.severity, Severity::Error);
    }

    #[test]
    fn test_coverage_load_inputs() {
        let mut graph = sample_graph();
        graph.panel_schedules.clear();
        let issues = CoverageValidator.check(&graph);
        assert!(codes(&issues).contains(&"LOAD_INPUT_INCOMPLETE"));
    }

    #[test]
    fn test_ocpd_protected_panel_is_clean() {
        let mut graph = ProjectGraph::new("Protected", 2020, "CA");
        let mut panel = Node::new("P1", NodeKind::Panel);
        panel.mlo = Some(true);
        graph.nodes = vec![Node::new("SB", NodeKind::Switchboard), panel];
        let mut edge = Edge::new("SB", "P1");
        edge.ocpd = Some(Ocpd {
            kind: OcpdKind::Breaker,
            rating_a: 100.0,
            interrupting_rating_ka: None,
        });
        graph.edges = vec![edge];
        assert!(PanelProtectionValidator.check(&graph).is_empty());
    }
}
