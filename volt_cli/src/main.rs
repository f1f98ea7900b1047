//! # Voltaic CLI Application
//!
//! Terminal front-end for the volt_core calculation engine. Loads a
//! project graph from JSON, validates it, runs the enabled analyses,
//! prints a summary, and writes the CSV/JSON reports to an output
//! directory.
//!
//! ## Usage
//!
//! ```text
//! volt_cli <project.json> [out_dir]
//! ```
//!
//! Exit codes: 0 on success, 1 on validation errors, 2 on usage or
//! I/O failure.

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use volt_core::analysis::run_analysis;
use volt_core::export::export_all;
use volt_core::file_io::load_project;
use volt_core::validate::{has_errors, validate_project, Severity};

fn status_icon(ok: bool) -> &'static str {
    if ok {
        "OK"
    } else {
        "FAIL"
    }
}

fn run(project_path: &Path, out_dir: &Path) -> Result<bool, volt_core::EeError> {
    println!("Voltaic - Power Distribution Calculator");
    println!("=======================================");
    println!();

    let graph = load_project(project_path)?;
    println!(
        "Loaded '{}' (NEC {}, {})",
        graph.meta.name, graph.meta.code.nec_year, graph.meta.code.jurisdiction
    );
    println!(
        "  {} nodes, {} edges, {} panel schedules",
        graph.nodes.len(),
        graph.edges.len(),
        graph.panel_schedules.len()
    );
    println!();

    let issues = validate_project(&graph);
    if issues.is_empty() {
        println!("Validation: clean");
    } else {
        println!("Validation: {} finding(s)", issues.len());
        for issue in &issues {
            let tag = match issue.severity {
                Severity::Error => "ERROR",
                Severity::Warning => "WARN ",
                Severity::Info => "INFO ",
            };
            println!("  [{}] {} at {}: {}", tag, issue.code, issue.path, issue.message);
        }
    }
    println!();

    if has_errors(&issues) {
        eprintln!("Validation errors found, analysis skipped.");
        return Ok(false);
    }

    let results = run_analysis(&graph)?;

    println!("═══════════════════════════════════════");
    println!("  ANALYSIS RESULTS");
    println!("═══════════════════════════════════════");
    println!();

    if let Some(rows) = &results.panel_summary {
        println!("Panel Summary:");
        for row in rows {
            let current = row
                .current_a
                .map(|i| format!("{:.1} A", i))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {:<12} {:<16} {:>8.1} kVA design  I = {}",
                row.bus, row.kind, row.kva_design, current
            );
        }
        println!();
    }

    if let Some(vd) = &results.voltage_drop {
        println!("Voltage Drop:");
        for edge in &vd.per_edge {
            match (edge.drop_pct, edge.within_limit) {
                (Some(pct), Some(ok)) => println!(
                    "  {} -> {}: {:.2}% {}",
                    edge.from,
                    edge.to,
                    pct,
                    status_icon(ok)
                ),
                _ => println!("  {} -> {}: no cable data", edge.from, edge.to),
            }
        }
        for path in &vd.per_path {
            println!(
                "  total to {}: {:.2}% {}",
                path.bus,
                path.drop_pct,
                status_icon(path.within_total_limit)
            );
        }
        println!();
    }

    if let Some(faults) = &results.short_circuit {
        println!("Available Fault Current:");
        for row in faults {
            println!(
                "  {:<12} {:>8.2} kA  ({})",
                row.bus, row.available_fault_ka, row.method
            );
        }
        println!();
    }

    if !results.tap_checks.is_empty() {
        println!("Tap Checks (240.21(B)):");
        for tap in &results.tap_checks {
            println!(
                "  {} -> {}: {:.0} ft, {}",
                tap.from,
                tap.to,
                tap.length_ft,
                status_icon(tap.passes)
            );
        }
        println!();
    }

    export_all(out_dir, &graph, &results)?;
    println!("Reports written to {}", out_dir.display());

    Ok(true)
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: volt_cli <project.json> [out_dir]");
        return ExitCode::from(2);
    }

    let project_path = PathBuf::from(&args[1]);
    let out_dir = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("out"));

    match run(&project_path, &out_dir) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::from(2)
        }
    }
}
