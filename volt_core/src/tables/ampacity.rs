//! # Ampacity Tables
//!
//! Base ampacity columns in the shape of NEC 310.16 plus the correction
//! factors that apply to a real installation: ambient temperature, rooftop
//! adder, conductor bundling, and the terminal temperature limit.
//!
//! The placeholder table carries one value set per temperature column
//! (60/75/90 °C) and conductor material; insulation selects the column via
//! its temperature rating rather than keying the table directly.
//!
//! ## Example
//!
//! ```rust
//! use volt_core::network::{Cable, Conductor};
//! use volt_core::tables::ampacity::{ampacity_base, ampacity_adjusted};
//!
//! let base = ampacity_base("#1", Conductor::Cu, 75).unwrap();
//! assert_eq!(base, 130.0);
//!
//! let cable = Cable::new(Conductor::Cu, "#1");
//! let adjusted = ampacity_adjusted(&cable).unwrap();
//! assert_eq!(adjusted, 130.0);
//! ```

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::errors::{EeError, EeResult};
use crate::network::{Cable, Conductor};
use crate::tables::normalize_size;

// Placeholder 310.16-shaped columns: (size, ampacity_A)

static CU_60: &[(&str, f64)] = &[
    ("#14", 15.0), ("#12", 20.0), ("#10", 30.0), ("#8", 40.0), ("#6", 55.0),
    ("#4", 70.0), ("#3", 85.0), ("#2", 95.0), ("#1", 110.0), ("1/0", 125.0),
    ("2/0", 145.0), ("3/0", 165.0), ("4/0", 195.0), ("250", 215.0), ("300", 240.0),
    ("350", 260.0), ("400", 280.0), ("500", 320.0), ("600", 350.0),
];

static CU_75: &[(&str, f64)] = &[
    ("#14", 20.0), ("#12", 25.0), ("#10", 35.0), ("#8", 50.0), ("#6", 65.0),
    ("#4", 85.0), ("#3", 100.0), ("#2", 115.0), ("#1", 130.0), ("1/0", 150.0),
    ("2/0", 175.0), ("3/0", 200.0), ("4/0", 230.0), ("250", 255.0), ("300", 285.0),
    ("350", 310.0), ("400", 335.0), ("500", 380.0), ("600", 420.0),
];

static CU_90: &[(&str, f64)] = &[
    ("#14", 25.0), ("#12", 30.0), ("#10", 40.0), ("#8", 55.0), ("#6", 75.0),
    ("#4", 95.0), ("#3", 110.0), ("#2", 130.0), ("#1", 145.0), ("1/0", 170.0),
    ("2/0", 195.0), ("3/0", 225.0), ("4/0", 260.0), ("250", 290.0), ("300", 320.0),
    ("350", 350.0), ("400", 380.0), ("500", 430.0), ("600", 475.0),
];

static AL_60: &[(&str, f64)] = &[
    ("#12", 15.0), ("#10", 25.0), ("#8", 35.0), ("#6", 40.0), ("#4", 55.0),
    ("#3", 65.0), ("#2", 75.0), ("#1", 85.0), ("1/0", 100.0), ("2/0", 115.0),
    ("3/0", 130.0), ("4/0", 150.0), ("250", 170.0), ("300", 195.0), ("350", 210.0),
    ("400", 225.0), ("500", 260.0), ("600", 285.0),
];

static AL_75: &[(&str, f64)] = &[
    ("#12", 20.0), ("#10", 30.0), ("#8", 40.0), ("#6", 50.0), ("#4", 65.0),
    ("#3", 75.0), ("#2", 90.0), ("#1", 100.0), ("1/0", 120.0), ("2/0", 135.0),
    ("3/0", 155.0), ("4/0", 180.0), ("250", 205.0), ("300", 230.0), ("350", 250.0),
    ("400", 270.0), ("500", 310.0), ("600", 340.0),
];

static AL_90: &[(&str, f64)] = &[
    ("#12", 25.0), ("#10", 35.0), ("#8", 45.0), ("#6", 55.0), ("#4", 75.0),
    ("#3", 85.0), ("#2", 100.0), ("#1", 115.0), ("1/0", 135.0), ("2/0", 150.0),
    ("3/0", 175.0), ("4/0", 205.0), ("250", 230.0), ("300", 260.0), ("350", 280.0),
    ("400", 305.0), ("500", 350.0), ("600", 385.0),
];

/// Column index built once on first use.
static AMPACITY_COLUMNS: Lazy<HashMap<(Conductor, u32), &'static [(&'static str, f64)]>> =
    Lazy::new(|| {
        let mut table: HashMap<(Conductor, u32), &'static [(&'static str, f64)]> = HashMap::new();
        table.insert((Conductor::Cu, 60), CU_60);
        table.insert((Conductor::Cu, 75), CU_75);
        table.insert((Conductor::Cu, 90), CU_90);
        table.insert((Conductor::Al, 60), AL_60);
        table.insert((Conductor::Al, 75), AL_75);
        table.insert((Conductor::Al, 90), AL_90);
        table
    });

/// Bucket an insulation temperature rating into a table column (60/75/90).
pub fn temperature_column(temp_c: u32) -> u32 {
    if temp_c >= 90 {
        90
    } else if temp_c >= 75 {
        75
    } else {
        60
    }
}

/// Base ampacity for a conductor size from the placeholder 310.16 columns.
pub fn ampacity_base(size_awg: &str, conductor: Conductor, temp_c: u32) -> EeResult<f64> {
    let key = |detail: &str| format!("{}/{}/{}C", conductor.label(), detail, temperature_column(temp_c));
    let size = normalize_size(size_awg)
        .ok_or_else(|| EeError::table_lookup("ampacity", key(size_awg)))?;
    let column = AMPACITY_COLUMNS
        .get(&(conductor, temperature_column(temp_c)))
        .ok_or_else(|| EeError::table_lookup("ampacity", key(&size)))?;
    column
        .iter()
        .find(|(s, _)| *s == size)
        .map(|(_, a)| *a)
        .ok_or_else(|| EeError::table_lookup("ampacity", key(&size)))
}

/// Ambient temperature correction factor.
///
/// Simplified curve per temperature column. Conductors within 12 in of a
/// rooftop see a 17 °C adder per the rooftop adjustment.
pub fn ambient_correction_factor(
    temp_c: u32,
    ambient_c: Option<f64>,
    rooftop_height_in: Option<f64>,
) -> f64 {
    let mut ambient = ambient_c.unwrap_or(30.0);
    if matches!(rooftop_height_in, Some(h) if h <= 12.0) {
        ambient += 17.0;
    }
    let curve: &[(f64, f64)] = match temperature_column(temp_c) {
        60 => &[(30.0, 1.0), (35.0, 0.88), (40.0, 0.82), (45.0, 0.71)],
        75 => &[(30.0, 1.0), (35.0, 0.94), (40.0, 0.88), (45.0, 0.82)],
        _ => &[(30.0, 1.0), (35.0, 0.96), (40.0, 0.91), (45.0, 0.87)],
    };
    for (limit, factor) in curve {
        if ambient <= *limit {
            return *factor;
        }
    }
    curve[curve.len() - 1].1
}

/// Bundling adjustment for more than three current-carrying conductors.
pub fn bundling_factor(ccc: u32) -> f64 {
    match ccc {
        0..=3 => 1.0,
        4..=6 => 0.8,
        7..=9 => 0.7,
        _ => 0.5,
    }
}

fn adjusted_for(cable: &Cable, temp_c: u32, terminal_c: u32) -> EeResult<f64> {
    let base = ampacity_base(&cable.size_awg, cable.conductor, temp_c)?;
    let ambient = ambient_correction_factor(temp_c, cable.ambient_c, cable.rooftop_height_in);
    let bundling = bundling_factor(cable.circuit_conductors());

    let terminal_col = temperature_column(terminal_c);
    let terminal_limit = ampacity_base(&cable.size_awg, cable.conductor, terminal_col)?;

    let adjusted = (base * ambient * bundling).min(terminal_limit);
    Ok(adjusted * cable.parallel_sets() as f64)
}

/// Adjusted ampacity for a cable run.
///
/// Applies ambient and bundling corrections to the base ampacity, caps the
/// result at the terminal-temperature column, and multiplies by the number
/// of parallel sets.
pub fn ampacity_adjusted(cable: &Cable) -> EeResult<f64> {
    // Terminations are assumed rated at the cable temperature, capped at 75 °C
    adjusted_for(cable, cable.temp_rating_c, cable.temp_rating_c.min(75))
}

/// Adjusted ampacity evaluated entirely in the 90 °C column.
///
/// Baseline for the 250.122(B) conductor upsizing factor: the ratio of this
/// value to [`ampacity_adjusted`] measures how much derating shrank the run.
pub fn ampacity_at_90c(cable: &Cable) -> EeResult<f64> {
    adjusted_for(cable, 90, 90)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Conductor;

    #[test]
    fn test_temperature_column() {
        assert_eq!(temperature_column(90), 90);
        assert_eq!(temperature_column(105), 90);
        assert_eq!(temperature_column(75), 75);
        assert_eq!(temperature_column(80), 75);
        assert_eq!(temperature_column(60), 60);
        assert_eq!(temperature_column(40), 60);
    }

    #[test]
    fn test_base_lookup() {
        assert_eq!(ampacity_base("#1", Conductor::Cu, 75).unwrap(), 130.0);
        assert_eq!(ampacity_base("4/0", Conductor::Al, 75).unwrap(), 180.0);
        assert_eq!(ampacity_base("250 kcmil", Conductor::Cu, 90).unwrap(), 290.0);
    }

    #[test]
    fn test_base_lookup_miss() {
        let err = ampacity_base("#16", Conductor::Cu, 75).unwrap_err();
        assert_eq!(err.error_code(), "TABLE_LOOKUP");
        // #14 aluminum is not a standard table entry
        assert!(ampacity_base("#14", Conductor::Al, 75).is_err());
    }

    #[test]
    fn test_ampacity_monotonic_in_size() {
        let sizes = ["#3", "#2", "#1", "1/0", "2/0", "3/0", "4/0", "250", "300", "350", "400", "500"];
        let values: Vec<f64> = sizes
            .iter()
            .map(|s| ampacity_base(s, Conductor::Cu, 75).unwrap())
            .collect();
        assert!(values.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_ambient_correction() {
        assert_eq!(ambient_correction_factor(75, Some(30.0), None), 1.0);
        assert_eq!(ambient_correction_factor(75, Some(38.0), None), 0.88);
        assert_eq!(ambient_correction_factor(75, None, None), 1.0);
        // Beyond the curve, the last factor holds
        assert_eq!(ambient_correction_factor(75, Some(50.0), None), 0.82);
    }

    #[test]
    fn test_rooftop_adder() {
        // 30 + 17 = 47 °C effective ambient pushes past the 45 °C bucket
        let with_roof = ambient_correction_factor(75, Some(30.0), Some(6.0));
        let without = ambient_correction_factor(75, Some(30.0), Some(24.0));
        assert!(with_roof < without);
        assert_eq!(without, 1.0);
    }

    #[test]
    fn test_bundling_factor() {
        assert_eq!(bundling_factor(3), 1.0);
        assert_eq!(bundling_factor(4), 0.8);
        assert_eq!(bundling_factor(9), 0.7);
        assert_eq!(bundling_factor(12), 0.5);
    }

    #[test]
    fn test_adjusted_applies_parallel_sets() {
        let mut cable = Cable::new(Conductor::Cu, "#1");
        cable.qty_per_phase = 3;
        // 9 CCCs -> 0.7 bundling; capped at the 75C terminal column (130 A)
        let adjusted = ampacity_adjusted(&cable).unwrap();
        assert_eq!(adjusted, 130.0 * 0.7 * 3.0);
    }

    #[test]
    fn test_at_90c_skips_terminal_cap() {
        let cable = Cable::new(Conductor::Cu, "#1");
        assert_eq!(ampacity_at_90c(&cable).unwrap(), 145.0);
        assert_eq!(ampacity_adjusted(&cable).unwrap(), 130.0);
    }

    #[test]
    fn test_adjusted_terminal_cap() {
        let mut cable = Cable::new(Conductor::Cu, "#1");
        cable.temp_rating_c = 90;
        // 90C base is 145 A but 75C terminations cap at 130 A
        let adjusted = ampacity_adjusted(&cable).unwrap();
        assert_eq!(adjusted, 130.0);
    }
}
