//! Shared test fixtures. Compiled only for tests.

use crate::network::{
    Cable, Conductor, Edge, Node, NodeKind, Ocpd, OcpdKind, PanelEntry, PanelSchedule, Phases,
};
use crate::project::ProjectGraph;

/// A small but realistic project: 208 V service feeding a 400 A house panel
/// with a new 100 A MLO subpanel on a 135 ft run of 3x #1 Cu.
///
/// Node order: UTIL1, P4L4D, NEW-SP. Edge order: service feeder, subpanel
/// feeder. Several tests index into these directly.
pub fn sample_graph() -> ProjectGraph {
    let mut graph = ProjectGraph::new("4380 Mission Blvd - Subpanel Add", 2020, "CA");

    let mut util = Node::new("UTIL1", NodeKind::UtilityService);
    util.voltage_ll_v = Some(208.0);
    util.phases = Some(Phases::ABC);

    let mut house_panel = Node::new("P4L4D", NodeKind::Panel);
    house_panel.voltage_ll_v = Some(208.0);
    house_panel.phases = Some(Phases::ABC);
    house_panel.rating_a = Some(400.0);

    let mut subpanel = Node::new("NEW-SP", NodeKind::Panel);
    subpanel.voltage_ll_v = Some(208.0);
    subpanel.phases = Some(Phases::ABC);
    subpanel.rating_a = Some(100.0);
    subpanel.mlo = Some(true);

    graph.nodes = vec![util, house_panel, subpanel];

    let service_feeder = Edge::new("UTIL1", "P4L4D");

    let mut subpanel_feeder = Edge::new("P4L4D", "NEW-SP");
    subpanel_feeder.ocpd = Some(Ocpd {
        kind: OcpdKind::Breaker,
        rating_a: 100.0,
        interrupting_rating_ka: None,
    });
    let mut cable = Cable::new(Conductor::Cu, "#1");
    cable.qty_per_phase = 3;
    cable.egc_awg = Some("#8".to_string());
    cable.length_ft = Some(135.0);
    subpanel_feeder.cable = Some(cable);

    graph.edges = vec![service_feeder, subpanel_feeder];

    graph.panel_schedules = vec![PanelSchedule {
        panel_id: "P4L4D".to_string(),
        entries: vec![PanelEntry {
            ckt: "5-7".to_string(),
            desc: "NEW-SP feeder".to_string(),
            kva: Some(36.0),
            kw: None,
            continuous: true,
            phases: None,
            pf: None,
        }],
    }];

    graph
}
