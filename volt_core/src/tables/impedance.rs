//! # Conductor Impedance
//!
//! Resistance per 1000 ft by material and size, reactance per 1000 ft by
//! raceway type, and the voltage-drop building blocks on top of them.
//!
//! Values are placeholder approximations of the published impedance tables.

use crate::errors::{EeError, EeResult};
use crate::network::{Conductor, Raceway};
use crate::tables::normalize_size;

static CU_OHMS_PER_KFT: &[(&str, f64)] = &[
    ("#14", 3.14), ("#12", 1.98), ("#10", 1.24), ("#8", 0.778), ("#6", 0.491),
    ("#4", 0.308), ("#3", 0.245), ("#2", 0.194), ("#1", 0.154), ("1/0", 0.122),
    ("2/0", 0.097), ("3/0", 0.077), ("4/0", 0.061), ("250", 0.052), ("300", 0.043),
    ("350", 0.037), ("400", 0.033), ("500", 0.028), ("600", 0.023),
];

static AL_OHMS_PER_KFT: &[(&str, f64)] = &[
    ("#12", 3.19), ("#10", 1.99), ("#8", 1.26), ("#6", 0.791), ("#4", 0.497),
    ("#3", 0.395), ("#2", 0.313), ("#1", 0.249), ("1/0", 0.197), ("2/0", 0.156),
    ("3/0", 0.124), ("4/0", 0.098), ("250", 0.082), ("300", 0.069), ("350", 0.059),
    ("400", 0.051), ("500", 0.041), ("600", 0.034),
];

/// AC resistance in ohms per 1000 ft for a single conductor.
pub fn resistance_per_kft(conductor: Conductor, size_awg: &str) -> EeResult<f64> {
    let size = normalize_size(size_awg).ok_or_else(|| {
        EeError::table_lookup("resistance", format!("{}/{}", conductor.label(), size_awg))
    })?;
    let table = match conductor {
        Conductor::Cu => CU_OHMS_PER_KFT,
        Conductor::Al => AL_OHMS_PER_KFT,
    };
    table
        .iter()
        .find(|(s, _)| *s == size)
        .map(|(_, r)| *r)
        .ok_or_else(|| {
            EeError::table_lookup("resistance", format!("{}/{}", conductor.label(), size))
        })
}

/// Reactance in ohms per 1000 ft by raceway type.
pub fn reactance_per_kft(raceway: Raceway) -> f64 {
    match raceway {
        Raceway::Emt => 0.085,
        Raceway::Pvc => 0.065,
        Raceway::Rmc => 0.09,
    }
}

/// Total (R, X) in ohms for a conductor run.
///
/// Parallel sets divide the impedance; `qty_per_phase` of 0 is treated as 1.
pub fn conductor_impedance(
    conductor: Conductor,
    size_awg: &str,
    length_ft: f64,
    raceway: Raceway,
    qty_per_phase: u32,
) -> EeResult<(f64, f64)> {
    let qty = qty_per_phase.max(1) as f64;
    let factor = length_ft / 1000.0 / qty;
    let r = resistance_per_kft(conductor, size_awg)? * factor;
    let x = reactance_per_kft(raceway) * factor;
    Ok((r, x))
}

/// Three-phase percent voltage drop for a run carrying `current_a`.
///
/// `%VD = sqrt(3) * I * (R*cos(phi) + X*sin(phi)) / V_LL * 100`
///
/// Returns 0 for a non-positive voltage; the power factor is clamped to
/// [0, 1].
pub fn percent_voltage_drop(
    current_a: f64,
    voltage_ll_v: f64,
    resistance_ohm: f64,
    reactance_ohm: f64,
    pf: f64,
) -> f64 {
    if voltage_ll_v <= 0.0 {
        return 0.0;
    }
    let pf = pf.clamp(0.0, 1.0);
    let sin_phi = (1.0 - pf * pf).max(0.0).sqrt();
    let drop = 3.0_f64.sqrt() * current_a * (resistance_ohm * pf + reactance_ohm * sin_phi);
    drop / voltage_ll_v * 100.0
}
