//! Closed-form stock count for tube and bar materials.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::PieceRequest;
use crate::units::{to_m, to_m_wide};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearBreakdown {
    pub piece_id: String,
    pub unit_length: f64,
    pub quantity: u32,
    pub subtotal_length: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearResult {
    pub total_length: f64,
    pub stock_length: f64,
    pub units_needed: u64,
    pub breakdown: Vec<LinearBreakdown>,
}

/// Sums every piece length and divides by the stock length, rounding up.
/// Lengths are in millimeters so the ceiling is exact.
pub fn calculate(
    material: &str,
    stock_length: u32,
    pieces: &[PieceRequest],
) -> Result<LinearResult> {
    if stock_length == 0 {
        return Err(Error::InvalidMaterial {
            material: material.to_string(),
            reason: "stock length must be positive".to_string(),
        });
    }

    let mut total_mm: u64 = 0;
    let mut breakdown = Vec::with_capacity(pieces.len());
    for piece in pieces {
        let length = piece.length()?;
        if length > stock_length {
            tracing::warn!(
                material,
                piece = %piece.piece_id,
                length_mm = length,
                stock_mm = stock_length,
                "piece is longer than one stock unit"
            );
        }
        let subtotal = length as u64 * piece.quantity as u64;
        total_mm = total_mm
            .checked_add(subtotal)
            .ok_or_else(|| Error::InvalidPiece {
                piece_id: piece.piece_id.clone(),
                reason: "total length overflows".to_string(),
            })?;
        breakdown.push(LinearBreakdown {
            piece_id: piece.piece_id.clone(),
            unit_length: to_m(length),
            quantity: piece.quantity,
            subtotal_length: to_m_wide(subtotal),
        });
    }

    Ok(LinearResult {
        total_length: to_m_wide(total_mm),
        stock_length: to_m(stock_length),
        units_needed: total_mm.div_ceil(stock_length as u64),
        breakdown,
    })
}
