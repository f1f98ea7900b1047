//! # Report Export
//!
//! Writes analysis results to a directory of flat files: one CSV per report
//! plus a machine-readable `results.json` and a `run_meta.json` capturing
//! provenance (tool version, run id, timestamp, code context, assumptions).
//!
//! CSV output is hand-rolled: fields are quoted only when they contain a
//! comma, quote, or newline, and numbers are written with four decimal
//! places so diffs between runs stay readable.

use std::fs;
use std::path::Path;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::analysis::AnalysisResults;
use crate::errors::{EeError, EeResult};
use crate::project::ProjectGraph;

/// Quote a CSV field if it contains a delimiter, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_row(fields: &[String]) -> String {
    let quoted: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
    quoted.join(",")
}

fn num(value: f64) -> String {
    format!("{:.4}", value)
}

fn opt_num(value: Option<f64>) -> String {
    value.map(num).unwrap_or_default()
}

fn opt_str(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn opt_bool(value: Option<bool>) -> String {
    value.map(|b| b.to_string()).unwrap_or_default()
}

fn write_text(path: &Path, contents: &str) -> EeResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            EeError::file_error("create_dir", parent.to_string_lossy(), e.to_string())
        })?;
    }
    fs::write(path, contents)
        .map_err(|e| EeError::file_error("write", path.to_string_lossy(), e.to_string()))
}

fn write_csv(path: &Path, header: &[&str], rows: Vec<Vec<String>>) -> EeResult<()> {
    let mut out = String::new();
    out.push_str(&header.join(","));
    out.push('\n');
    for row in rows {
        out.push_str(&csv_row(&row));
        out.push('\n');
    }
    write_text(path, &out)
}

/// Write the panel summary report.
pub fn write_panel_summary(dir: &Path, results: &AnalysisResults) -> EeResult<()> {
    let rows = match &results.panel_summary {
        Some(rows) => rows,
        None => return Ok(()),
    };
    let header = [
        "bus",
        "type",
        "voltage_ll_V",
        "rating_A",
        "kVA_cont",
        "kVA_noncont",
        "kVA_design",
        "kVA_total",
        "I_design_A",
        "utilization_pct",
        "margin_A",
    ];
    let data = rows
        .iter()
        .map(|r| {
            vec![
                r.bus.clone(),
                r.kind.clone(),
                opt_num(r.voltage_ll_v),
                opt_num(r.rating_a),
                num(r.kva_cont),
                num(r.kva_noncont),
                num(r.kva_design),
                num(r.kva_total),
                opt_num(r.current_a),
                opt_num(r.utilization_pct),
                opt_num(r.margin_a),
            ]
        })
        .collect();
    write_csv(&dir.join("panel_summary.csv"), &header, data)
}

/// Write the per-edge feeder checks.
pub fn write_edge_checks(dir: &Path, results: &AnalysisResults) -> EeResult<()> {
    let vd = match &results.voltage_drop {
        Some(vd) => vd,
        None => return Ok(()),
    };
    let header = [
        "from",
        "to",
        "size_awg",
        "I_A",
        "ampacity_A",
        "VD_V",
        "VD_pct",
        "within_limit",
        "min_raceway_in",
        "egc_awg",
    ];
    let data = vd
        .per_edge
        .iter()
        .map(|e| {
            vec![
                e.from.clone(),
                e.to.clone(),
                opt_str(&e.size_awg),
                num(e.current_a),
                opt_num(e.ampacity_a),
                opt_num(e.drop_v),
                opt_num(e.drop_pct),
                opt_bool(e.within_limit),
                opt_num(e.min_raceway_in),
                opt_str(&e.egc_awg),
            ]
        })
        .collect();
    write_csv(&dir.join("edge_checks.csv"), &header, data)
}

/// Write the cumulative voltage drop per bus.
pub fn write_path_drops(dir: &Path, results: &AnalysisResults) -> EeResult<()> {
    let vd = match &results.voltage_drop {
        Some(vd) => vd,
        None => return Ok(()),
    };
    let header = ["bus", "VD_V", "VD_pct", "within_total_limit"];
    let data = vd
        .per_path
        .iter()
        .map(|p| {
            vec![
                p.bus.clone(),
                num(p.drop_v),
                num(p.drop_pct),
                p.within_total_limit.to_string(),
            ]
        })
        .collect();
    write_csv(&dir.join("voltage_drop.csv"), &header, data)
}

/// Write the available-fault report.
pub fn write_short_circuit(dir: &Path, results: &AnalysisResults) -> EeResult<()> {
    let rows = match &results.short_circuit {
        Some(rows) => rows,
        None => return Ok(()),
    };
    let header = ["bus", "available_fault_kA", "Z_th_ohm", "method"];
    let data = rows
        .iter()
        .map(|r| {
            vec![
                r.bus.clone(),
                num(r.available_fault_ka),
                opt_num(r.thevenin_ohm),
                r.method.clone(),
            ]
        })
        .collect();
    write_csv(&dir.join("short_circuit.csv"), &header, data)
}

/// Write the 240.21(B) tap check report. Skipped when the project has no taps.
pub fn write_tap_checks(dir: &Path, results: &AnalysisResults) -> EeResult<()> {
    if results.tap_checks.is_empty() {
        return Ok(());
    }
    let header = [
        "from",
        "to",
        "length_ft",
        "ampacity_A",
        "load_A",
        "passes_10ft",
        "passes_25ft",
        "passes",
    ];
    let data = results
        .tap_checks
        .iter()
        .map(|t| {
            vec![
                t.from.clone(),
                t.to.clone(),
                num(t.length_ft),
                num(t.ampacity_a),
                num(t.load_a),
                t.passes_10ft.to_string(),
                t.passes_25ft.to_string(),
                t.passes.to_string(),
            ]
        })
        .collect();
    write_csv(&dir.join("tap_checks.csv"), &header, data)
}

/// Write the raw panel schedules as entered.
pub fn write_panel_schedules(dir: &Path, graph: &ProjectGraph) -> EeResult<()> {
    if graph.panel_schedules.is_empty() {
        return Ok(());
    }
    let header = ["panel_id", "ckt", "desc", "kVA", "kW", "continuous", "phases", "pf"];
    let mut data = Vec::new();
    for schedule in &graph.panel_schedules {
        for entry in &schedule.entries {
            data.push(vec![
                schedule.panel_id.clone(),
                entry.ckt.clone(),
                entry.desc.clone(),
                opt_num(entry.kva),
                opt_num(entry.kw),
                entry.continuous.to_string(),
                entry
                    .phases
                    .map(|p| p.letters().iter().collect::<String>())
                    .unwrap_or_default(),
                opt_num(entry.pf),
            ]);
        }
    }
    write_csv(&dir.join("panel_schedules.csv"), &header, data)
}

/// Nodes+edges payload for one-line-diagram tooling.
pub fn one_line_json(graph: &ProjectGraph) -> EeResult<String> {
    let payload = serde_json::json!({
        "nodes": graph.nodes,
        "edges": graph.edges,
    });
    serde_json::to_string_pretty(&payload).map_err(|e| EeError::SerializationError {
        reason: e.to_string(),
    })
}

/// Write the one-line payload alongside the reports.
pub fn write_one_line(dir: &Path, graph: &ProjectGraph) -> EeResult<()> {
    write_text(&dir.join("one_line.json"), &one_line_json(graph)?)
}

#[derive(Debug, Serialize)]
struct RunMeta {
    tool: &'static str,
    version: &'static str,
    run_id: String,
    generated_at: String,
    project: String,
    nec_year: u32,
    jurisdiction: String,
    assumptions: Vec<String>,
}

/// Write provenance for this run: version, run id, timestamp, code context.
pub fn write_run_meta(dir: &Path, graph: &ProjectGraph) -> EeResult<()> {
    let meta = RunMeta {
        tool: "voltaic",
        version: env!("CARGO_PKG_VERSION"),
        run_id: Uuid::new_v4().to_string(),
        generated_at: Utc::now().to_rfc3339(),
        project: graph.meta.name.clone(),
        nec_year: graph.meta.code.nec_year,
        jurisdiction: graph.meta.code.jurisdiction.clone(),
        assumptions: graph.assumptions.iter().map(|a| a.text.clone()).collect(),
    };
    let json = serde_json::to_string_pretty(&meta).map_err(|e| EeError::SerializationError {
        reason: e.to_string(),
    })?;
    write_text(&dir.join("run_meta.json"), &json)
}

/// Round every fractional number in a JSON tree to four decimal places.
fn round_numbers(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Number(n) => {
            if let Some(f) = n.as_f64() {
                if f.fract() != 0.0 {
                    let rounded = (f * 10_000.0).round() / 10_000.0;
                    if let Some(number) = serde_json::Number::from_f64(rounded) {
                        *value = serde_json::Value::Number(number);
                    }
                }
            }
        }
        serde_json::Value::Array(items) => items.iter_mut().for_each(round_numbers),
        serde_json::Value::Object(map) => map.values_mut().for_each(round_numbers),
        _ => {}
    }
}

/// Write the full results as JSON for downstream tooling.
///
/// Numbers carry the same four-decimal rounding as the CSV reports so the
/// two surfaces agree.
pub fn write_results_json(dir: &Path, results: &AnalysisResults) -> EeResult<()> {
    let mut value = serde_json::to_value(results).map_err(|e| EeError::SerializationError {
        reason: e.to_string(),
    })?;
    round_numbers(&mut value);
    let json = serde_json::to_string_pretty(&value).map_err(|e| EeError::SerializationError {
        reason: e.to_string(),
    })?;
    write_text(&dir.join("results.json"), &json)
}

/// Export all reports into `dir` (created if missing).
pub fn export_all(dir: &Path, graph: &ProjectGraph, results: &AnalysisResults) -> EeResult<()> {
    fs::create_dir_all(dir)
        .map_err(|e| EeError::file_error("create_dir", dir.to_string_lossy(), e.to_string()))?;

    write_panel_summary(dir, results)?;
    write_edge_checks(dir, results)?;
    write_path_drops(dir, results)?;
    write_short_circuit(dir, results)?;
    write_tap_checks(dir, results)?;
    write_panel_schedules(dir, graph)?;
    write_one_line(dir, graph)?;
    write_results_json(dir, results)?;
    write_run_meta(dir, graph)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::run_analysis;
    use crate::test_fixtures::sample_graph;
    use std::env;

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let dir = env::temp_dir().join(format!("voltaic_export_{}", name));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_export_all_writes_reports() {
        let dir = temp_dir("all");
        let graph = sample_graph();
        let results = run_analysis(&graph).unwrap();
        export_all(&dir, &graph, &results).unwrap();

        assert!(dir.join("panel_summary.csv").exists());
        assert!(dir.join("edge_checks.csv").exists());
        assert!(dir.join("voltage_drop.csv").exists());
        assert!(dir.join("panel_schedules.csv").exists());
        assert!(dir.join("one_line.json").exists());
        assert!(dir.join("results.json").exists());
        assert!(dir.join("run_meta.json").exists());
        // Short-circuit flag is off and the sample has no taps
        assert!(!dir.join("short_circuit.csv").exists());
        assert!(!dir.join("tap_checks.csv").exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_panel_summary_contents() {
        let dir = temp_dir("summary");
        let graph = sample_graph();
        let results = run_analysis(&graph).unwrap();
        export_all(&dir, &graph, &results).unwrap();

        let csv = fs::read_to_string(dir.join("panel_summary.csv")).unwrap();
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("bus,type,voltage_ll_V"));
        assert!(csv.contains("NEW-SP"));
        assert!(csv.contains("45.0000"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_one_line_payload() {
        let graph = sample_graph();
        let json = one_line_json(&graph).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["nodes"].as_array().unwrap().len(), 3);
        assert_eq!(value["edges"].as_array().unwrap().len(), 2);
        assert_eq!(value["edges"][1]["from"], "P4L4D");
        // Diagram payload carries only topology, not schedules or config
        assert!(value.get("panel_schedules").is_none());
    }

    #[test]
    fn test_results_json_numbers_rounded() {
        fn assert_rounded(value: &serde_json::Value) {
            match value {
                serde_json::Value::Number(n) => {
                    if let Some(f) = n.as_f64() {
                        let rounded = (f * 10_000.0).round() / 10_000.0;
                        assert!((rounded - f).abs() < 1e-9, "unrounded value {}", f);
                    }
                }
                serde_json::Value::Array(items) => items.iter().for_each(assert_rounded),
                serde_json::Value::Object(map) => map.values().for_each(assert_rounded),
                _ => {}
            }
        }

        let dir = temp_dir("rounded");
        let graph = sample_graph();
        let results = run_analysis(&graph).unwrap();
        export_all(&dir, &graph, &results).unwrap();

        let raw = fs::read_to_string(dir.join("results.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_rounded(&value);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_run_meta_contents() {
        let dir = temp_dir("meta");
        let graph = sample_graph();
        let results = run_analysis(&graph).unwrap();
        export_all(&dir, &graph, &results).unwrap();

        let json = fs::read_to_string(dir.join("run_meta.json")).unwrap();
        assert!(json.contains("\"tool\": \"voltaic\""));
        assert!(json.contains("\"nec_year\": 2020"));

        let _ = fs::remove_dir_all(&dir);
    }
}
