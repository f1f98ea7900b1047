//! # Equipment Grounding Conductors
//!
//! EGC sizing by OCPD rating (250.122 shape, placeholder values) and the
//! proportional upsizing applied when the phase conductors are upsized for
//! voltage drop.

use crate::errors::{EeError, EeResult};
use crate::network::Conductor;
use crate::tables::{size_index, SIZE_ORDER};

// (ocpd_max_A, cu_size, al_size), ascending by rating
static EGC_TABLE: &[(f64, &str, &str)] = &[
    (15.0, "#14", "#12"),
    (20.0, "#12", "#10"),
    (60.0, "#10", "#8"),
    (100.0, "#8", "#6"),
    (200.0, "#6", "#4"),
    (300.0, "#4", "#2"),
    (400.0, "#3", "#1"),
    (500.0, "#2", "1/0"),
    (600.0, "#1", "2/0"),
    (800.0, "1/0", "3/0"),
    (1000.0, "2/0", "4/0"),
    (1200.0, "3/0", "250"),
    (1600.0, "4/0", "350"),
    (2000.0, "250", "400"),
    (2500.0, "350", "600"),
];

/// Minimum equipment grounding conductor size for an OCPD rating.
///
/// Ratings beyond the table use the largest listed size.
pub fn equipment_ground_size(ocpd_rating_a: f64, conductor: Conductor) -> &'static str {
    for (limit, cu, al) in EGC_TABLE {
        if ocpd_rating_a <= *limit {
            return match conductor {
                Conductor::Cu => cu,
                Conductor::Al => al,
            };
        }
    }
    let (_, cu, al) = EGC_TABLE[EGC_TABLE.len() - 1];
    match conductor {
        Conductor::Cu => cu,
        Conductor::Al => al,
    }
}

/// EGC size when the phase conductors were upsized (e.g., for voltage drop).
///
/// The ground is bumped one position along the size ladder for a modest
/// upsizing factor (> 1.05) and two for a large one (>= 1.35).
pub fn upsized_equipment_ground(
    ocpd_rating_a: f64,
    conductor_upsizing_factor: f64,
    conductor: Conductor,
) -> EeResult<&'static str> {
    let base = equipment_ground_size(ocpd_rating_a, conductor);
    if conductor_upsizing_factor <= 1.05 {
        return Ok(base);
    }
    let idx = size_index(base)
        .ok_or_else(|| EeError::table_lookup("size order", base))?;
    let bump = if conductor_upsizing_factor < 1.35 { 1 } else { 2 };
    Ok(SIZE_ORDER[(idx + bump).min(SIZE_ORDER.len() - 1)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_egc_thresholds() {
        assert_eq!(equipment_ground_size(100.0, Conductor::Cu), "#8");
        assert_eq!(equipment_ground_size(101.0, Conductor::Cu), "#6");
        assert_eq!(equipment_ground_size(100.0, Conductor::Al), "#6");
        assert_eq!(equipment_ground_size(20.0, Conductor::Cu), "#12");
    }

    #[test]
    fn test_egc_beyond_table() {
        assert_eq!(equipment_ground_size(4000.0, Conductor::Cu), "350");
        assert_eq!(equipment_ground_size(4000.0, Conductor::Al), "600");
    }

    #[test]
    fn test_upsizing_bumps() {
        // No meaningful upsizing keeps the base size
        assert_eq!(
            upsized_equipment_ground(100.0, 1.0, Conductor::Cu).unwrap(),
            "#8"
        );
        // Modest upsizing bumps one position
        assert_eq!(
            upsized_equipment_ground(100.0, 1.2, Conductor::Cu).unwrap(),
            "#6"
        );
        // Heavy upsizing bumps two
        assert_eq!(
            upsized_equipment_ground(100.0, 1.5, Conductor::Cu).unwrap(),
            "#4"
        );
    }

    #[test]
    fn test_upsizing_saturates_at_ladder_top() {
        let size = upsized_equipment_ground(2500.0, 2.0, Conductor::Al).unwrap();
        assert_eq!(size, "600");
    }
}
