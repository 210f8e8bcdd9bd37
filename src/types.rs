use serde::{Deserialize, Deserializer, Serialize};

/// Axis-aligned size in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    pub fn rotated(&self) -> Self {
        Self {
            w: self.h,
            h: self.w,
        }
    }

    pub fn fits_in(&self, other: &Rect) -> bool {
        self.w <= other.w && self.h <= other.h
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

/// One demand line in integer space. `piece` indexes back into the
/// caller's piece list so placements can be traced to their request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Demand {
    pub piece: usize,
    pub rect: Rect,
    pub qty: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub piece: usize,
    pub rect: Rect,
    pub x: u32,
    pub y: u32,
    pub rotated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    OversizedPiece,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::OversizedPiece => write!(f, "OversizedPiece"),
        }
    }
}

/// A demand line that was excluded from placement. `rect` is the
/// requested orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejection {
    pub piece: usize,
    pub rect: Rect,
    pub reason: RejectReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetResult {
    pub placements: Vec<Placement>,
    pub waste_area: u64,
}

impl SheetResult {
    pub fn used_area(&self) -> u64 {
        self.placements.iter().map(|p| p.rect.area()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub sheets: Vec<SheetResult>,
    pub stock: Rect,
    pub rejected: Vec<Rejection>,
}

impl Solution {
    pub fn empty(stock: Rect) -> Self {
        Self {
            sheets: vec![],
            stock,
            rejected: vec![],
        }
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn placed_count(&self) -> usize {
        self.sheets.iter().map(|s| s.placements.len()).sum()
    }

    pub fn total_waste_percent(&self) -> f64 {
        let stock_area = self.stock.area();
        let total_stock_area = stock_area * self.sheets.len() as u64;
        let total_used: u64 = self.sheets.iter().map(SheetResult::used_area).sum();
        if total_stock_area == 0 {
            return 0.0;
        }
        (total_stock_area - total_used) as f64 / total_stock_area as f64 * 100.0
    }
}

/// Accepts `3` as well as `3.0`; rejects fractional or negative numbers.
pub fn deserialize_u32_from_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Number::deserialize(deserializer)?;
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).map_err(serde::de::Error::custom);
    }
    match value.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 => Ok(f as u32),
        _ => Err(serde::de::Error::custom(format!(
            "expected a non-negative integer, got {value}"
        ))),
    }
}
