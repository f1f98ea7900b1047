//! # Raceway Fill
//!
//! Conductor outside diameters, EMT internal areas, and minimum trade-size
//! selection at 40 % fill (Chapter 9 style, placeholder values).

use std::f64::consts::PI;

use crate::errors::{EeError, EeResult};
use crate::tables::normalize_size;

// THHN-ish outside diameters in inches
static CONDUCTOR_OD_IN: &[(&str, f64)] = &[
    ("#14", 0.111), ("#12", 0.130), ("#10", 0.164), ("#8", 0.216), ("#6", 0.254),
    ("#4", 0.324), ("#3", 0.352), ("#2", 0.388), ("#1", 0.450), ("1/0", 0.491),
    ("2/0", 0.537), ("3/0", 0.590), ("4/0", 0.642), ("250", 0.711), ("300", 0.766),
    ("350", 0.817), ("400", 0.864), ("500", 0.949), ("600", 1.051),
];

// EMT trade size -> total internal area in square inches, ascending
static EMT_AREA_SQ_IN: &[(f64, f64)] = &[
    (0.5, 0.304),
    (0.75, 0.533),
    (1.0, 0.864),
    (1.25, 1.496),
    (1.5, 2.036),
    (2.0, 3.356),
    (2.5, 5.858),
    (3.0, 8.846),
    (3.5, 11.545),
    (4.0, 14.753),
];

/// Cross-sectional area of one insulated conductor in square inches.
pub fn conductor_area_sq_in(size_awg: &str) -> EeResult<f64> {
    let size = normalize_size(size_awg)
        .ok_or_else(|| EeError::table_lookup("conductor OD", size_awg))?;
    let od = CONDUCTOR_OD_IN
        .iter()
        .find(|(s, _)| *s == size)
        .map(|(_, od)| *od)
        .ok_or_else(|| EeError::table_lookup("conductor OD", size))?;
    let radius = od / 2.0;
    Ok(PI * radius * radius)
}

/// Internal area of an EMT trade size in square inches.
pub fn emt_area_sq_in(trade_size_in: f64) -> EeResult<f64> {
    EMT_AREA_SQ_IN
        .iter()
        .find(|(size, _)| *size == trade_size_in)
        .map(|(_, area)| *area)
        .ok_or_else(|| EeError::table_lookup("EMT area", trade_size_in.to_string()))
}

/// Smallest EMT trade size whose fill fraction holds the given conductors.
///
/// `conductors` is (size, quantity) pairs; `fill_fraction` is typically 0.4
/// for three or more conductors. Returns the largest trade size when nothing
/// fits.
pub fn minimum_raceway_size(conductors: &[(&str, u32)], fill_fraction: f64) -> EeResult<f64> {
    let mut required_area = 0.0;
    for (size, qty) in conductors {
        required_area += conductor_area_sq_in(size)? * *qty as f64;
    }
    for (trade_size, area) in EMT_AREA_SQ_IN {
        if required_area <= area * fill_fraction {
            return Ok(*trade_size);
        }
    }
    Ok(EMT_AREA_SQ_IN[EMT_AREA_SQ_IN.len() - 1].0)
}
