//! Turns an integer [`Solution`] back into physical placement records.

use serde::Serialize;

use crate::model::PieceRequest;
use crate::types::{RejectReason, Solution};
use crate::units::{MM_PER_M, to_m};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedPiece {
    pub piece_id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BinLayout {
    /// `<material>-<binIndex>`
    pub bin_id: String,
    /// 1-based, in creation order.
    pub bin_index: usize,
    pub width: f64,
    pub height: f64,
    /// Square meters covered by pieces.
    pub used_area: f64,
    pub waste_percent: f64,
    pub placements: Vec<PlacedPiece>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedPiece {
    pub piece_id: String,
    pub width: f64,
    pub height: f64,
    pub reason: RejectReason,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackResult {
    pub bins: Vec<BinLayout>,
    pub rejected_pieces: Vec<RejectedPiece>,
    pub bin_count: usize,
    pub waste_percent: f64,
}

impl PackResult {
    pub fn empty() -> Self {
        Self {
            bins: vec![],
            rejected_pieces: vec![],
            bin_count: 0,
            waste_percent: 0.0,
        }
    }
}

/// `pieces` is the list the solver's demand indices point into.
pub fn assemble(material: &str, solution: &Solution, pieces: &[PieceRequest]) -> PackResult {
    let piece_id = |idx: usize| {
        pieces
            .get(idx)
            .map(|p| p.piece_id.clone())
            .unwrap_or_default()
    };
    let stock = solution.stock;
    let stock_area = stock.area();

    let bins = solution
        .sheets
        .iter()
        .enumerate()
        .map(|(i, sheet)| {
            let used = sheet.used_area();
            BinLayout {
                bin_id: format!("{material}-{}", i + 1),
                bin_index: i + 1,
                width: to_m(stock.w),
                height: to_m(stock.h),
                used_area: used as f64 / (MM_PER_M * MM_PER_M),
                waste_percent: if stock_area == 0 {
                    0.0
                } else {
                    sheet.waste_area as f64 / stock_area as f64 * 100.0
                },
                placements: sheet
                    .placements
                    .iter()
                    .map(|p| PlacedPiece {
                        piece_id: piece_id(p.piece),
                        x: to_m(p.x),
                        y: to_m(p.y),
                        width: to_m(p.rect.w),
                        height: to_m(p.rect.h),
                        rotated: p.rotated,
                    })
                    .collect(),
            }
        })
        .collect();

    let rejected_pieces = solution
        .rejected
        .iter()
        .map(|r| RejectedPiece {
            piece_id: piece_id(r.piece),
            width: to_m(r.rect.w),
            height: to_m(r.rect.h),
            reason: r.reason,
        })
        .collect();

    PackResult {
        bins,
        rejected_pieces,
        bin_count: solution.sheet_count(),
        waste_percent: solution.total_waste_percent(),
    }
}
