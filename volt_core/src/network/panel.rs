//! # Panel Schedules
//!
//! Circuit-by-circuit load listings for panelboards. Entries feed the load
//! rollup: continuous entries carry the 125 % factor, and entries whose
//! description or circuit text names a downstream bus are assigned to that
//! bus instead of counting at the panel itself.

use serde::{Deserialize, Serialize};

use super::Phases;

/// One circuit row in a panel schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelEntry {
    /// Circuit designation (e.g., "5-7" for a multi-pole breaker)
    pub ckt: String,

    /// Load description as shown on the schedule
    pub desc: String,

    /// Connected load in kVA
    #[serde(rename = "kVA", default, skip_serializing_if = "Option::is_none")]
    pub kva: Option<f64>,

    /// Connected load in kW, used when kVA was not entered
    #[serde(rename = "kW", default, skip_serializing_if = "Option::is_none")]
    pub kw: Option<f64>,

    /// Continuous load (3+ hours at full current)
    #[serde(default)]
    pub continuous: bool,

    /// Phase connection of the circuit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phases: Option<Phases>,

    /// Power factor, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pf: Option<f64>,
}

impl PanelEntry {
    /// Connected kVA as entered: kVA wins, a kW entry stands in unconverted.
    pub fn input_kva(&self) -> f64 {
        self.kva.or(self.kw).unwrap_or(0.0)
    }

    /// Design kVA for this entry: continuous loads carry the 125 % factor.
    pub fn design_kva(&self) -> f64 {
        if self.continuous {
            self.input_kva() * 1.25
        } else {
            self.input_kva()
        }
    }
}

/// Schedule of circuits served from one panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelSchedule {
    /// Panel node id this schedule belongs to
    pub panel_id: String,

    /// Circuit entries
    #[serde(default)]
    pub entries: Vec<PanelEntry>,
}

impl PanelSchedule {
    /// Create an empty schedule for a panel.
    pub fn new(panel_id: impl Into<String>) -> Self {
        PanelSchedule {
            panel_id: panel_id.into(),
            entries: Vec::new(),
        }
    }

    /// Total connected kVA split into (continuous, non-continuous).
    ///
    /// Raw values, without the 125 % factor.
    pub fn totals_kva(&self) -> (f64, f64) {
        let mut cont = 0.0;
        let mut noncont = 0.0;
        for entry in &self.entries {
            if entry.continuous {
                cont += entry.input_kva();
            } else {
                noncont += entry.input_kva();
            }
        }
        (cont, noncont)
    }

    /// Design kVA for the whole schedule: 1.25 x continuous + non-continuous.
    pub fn design_kva(&self) -> f64 {
        let (cont, noncont) = self.totals_kva();
        cont * 1.25 + noncont
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> PanelSchedule {
        PanelSchedule {
            panel_id: "P1".to_string(),
            entries: vec![
                PanelEntry {
                    ckt: "1".to_string(),
                    desc: "Lighting".to_string(),
                    kva: Some(8.0),
                    kw: None,
                    continuous: true,
                    phases: None,
                    pf: None,
                },
                PanelEntry {
                    ckt: "3".to_string(),
                    desc: "Receptacles".to_string(),
                    kva: Some(6.0),
                    kw: None,
                    continuous: false,
                    phases: None,
                    pf: None,
                },
            ],
        }
    }

    #[test]
    fn test_totals_split() {
        let (cont, noncont) = schedule().totals_kva();
        assert_eq!(cont, 8.0);
        assert_eq!(noncont, 6.0);
    }

    #[test]
    fn test_design_kva_applies_continuous_factor() {
        assert_eq!(schedule().design_kva(), 8.0 * 1.25 + 6.0);
    }

    #[test]
    fn test_entry_design_kva() {
        let entry = PanelEntry {
            ckt: "5-7".to_string(),
            desc: "NEW-SP feeder".to_string(),
            kva: Some(36.0),
            kw: None,
            continuous: true,
            phases: None,
            pf: None,
        };
        assert_eq!(entry.design_kva(), 45.0);
    }

    #[test]
    fn test_entry_kw_stands_in_for_kva() {
        let mut entry = PanelEntry {
            ckt: "2".to_string(),
            desc: "EF-1".to_string(),
            kva: None,
            kw: Some(4.0),
            continuous: false,
            phases: None,
            pf: None,
        };
        assert_eq!(entry.input_kva(), 4.0);
        // kVA wins when both are present
        entry.kva = Some(5.0);
        assert_eq!(entry.input_kva(), 5.0);
        // Neither entered counts as no load
        entry.kva = None;
        entry.kw = None;
        assert_eq!(entry.design_kva(), 0.0);
    }

    #[test]
    fn test_schedule_wire_format() {
        let json = r#"{
            "panel_id": "P4L4D",
            "entries": [
                {"ckt": "5-7", "desc": "NEW-SP feeder", "kVA": 36.0, "continuous": true}
            ]
        }"#;
        let schedule: PanelSchedule = serde_json::from_str(json).unwrap();
        assert_eq!(schedule.panel_id, "P4L4D");
        assert_eq!(schedule.entries[0].kva, Some(36.0));
        assert!(schedule.entries[0].kw.is_none());
        assert!(schedule.entries[0].continuous);
    }
}
