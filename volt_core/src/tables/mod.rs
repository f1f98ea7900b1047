//! # Conductor Tables
//!
//! Placeholder lookup tables standing in for the licensed NEC data that is
//! deliberately not shipped. Values are representative of the published
//! tables but carry no code authority; swap in licensed data before using
//! results for permit work.
//!
//! ## Submodules
//!
//! - [`ampacity`] - base ampacity columns plus ambient/bundling corrections
//! - [`impedance`] - conductor resistance and raceway reactance per kft
//! - [`raceway`] - conductor areas and EMT fill sizing
//! - [`grounding`] - equipment grounding conductor sizing
//!
//! Failed lookups return [`EeError::TableLookup`](crate::errors::EeError)
//! naming the table and the key that missed.

pub mod ampacity;
pub mod grounding;
pub mod impedance;
pub mod raceway;

/// AWG/kcmil sizes in ascending order of conductor area.
///
/// Used for EGC upsizing and anywhere "one size larger" is meaningful.
pub const SIZE_ORDER: [&str; 19] = [
    "#14", "#12", "#10", "#8", "#6", "#4", "#3", "#2", "#1", "1/0", "2/0", "3/0", "4/0", "250",
    "300", "350", "400", "500", "600",
];

/// Position of a size in [`SIZE_ORDER`], if it is a standard size.
pub fn size_index(size: &str) -> Option<usize> {
    SIZE_ORDER.iter().position(|s| *s == size)
}

/// Normalize a conductor size string to table form.
///
/// Uppercases, strips a "KCMIL" suffix, and accepts `#n` AWG sizes, `n/0`
/// sizes, and bare kcmil numbers. Metric sizes (`mm2`) are not representable
/// in the AWG tables and return `None`.
///
/// # Example
///
/// ```rust
/// use volt_core::tables::normalize_size;
///
/// assert_eq!(normalize_size("250 kcmil").as_deref(), Some("250"));
/// assert_eq!(normalize_size("#1").as_deref(), Some("#1"));
/// assert_eq!(normalize_size("95mm2"), None);
/// ```
pub fn normalize_size(size: &str) -> Option<String> {
    let text = size.trim().to_uppercase();
    let text = text.strip_suffix("KCMIL").unwrap_or(&text).trim().to_string();
    if text.is_empty() || text.ends_with("MM2") {
        return None;
    }
    Some(text)
}
