//! Fixed-point conversion between meters and integer millimeters.
//!
//! All geometry runs on millimeters; meters only appear at the edges.

pub const MM_PER_M: f64 = 1000.0;

/// Rounds a length in meters to the nearest millimeter.
pub fn to_mm(meters: f64) -> i64 {
    (meters * MM_PER_M).round() as i64
}

pub fn to_m(mm: u32) -> f64 {
    mm as f64 / MM_PER_M
}

pub fn to_m_wide(mm: u64) -> f64 {
    mm as f64 / MM_PER_M
}

/// Converts a physical length that must be strictly positive once rounded.
/// Returns the reason on failure so callers can wrap it in their own error.
pub fn positive_mm(meters: f64) -> Result<u32, String> {
    if !meters.is_finite() {
        return Err(format!("{meters} is not a finite length"));
    }
    let mm = to_mm(meters);
    if mm <= 0 {
        return Err(format!("{meters} m rounds to {mm} mm"));
    }
    u32::try_from(mm).map_err(|_| format!("{meters} m is too large"))
}
