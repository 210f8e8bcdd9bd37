//! Error types for cut planning.

use thiserror::Error;

/// Result type alias for cut planning operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures that stop a single material's run.
///
/// Oversized pieces are not errors; they are reported per piece in the
/// packing result so callers can still render what fit.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Sheet or stock dimensions are missing, non-finite, or not positive.
    #[error("invalid material '{material}': {reason}")]
    InvalidMaterial { material: String, reason: String },

    /// A grouped material name has no matching material record.
    #[error("no material data for '{material}'")]
    MissingMaterialData { material: String },

    /// A piece has a zero quantity or a non-positive dimension.
    #[error("invalid piece '{piece_id}': {reason}")]
    InvalidPiece { piece_id: String, reason: String },

    /// Blade margin leaves no usable space on the sheet.
    #[error("kerf of {kerf}mm must be smaller than the sheet's short side ({limit}mm)")]
    InvalidKerf { kerf: u32, limit: u32 },

    /// Expanded piece count is over the configured budget.
    #[error("{pieces} pieces exceed the budget of {limit}")]
    BudgetExceeded { pieces: usize, limit: usize },

    /// Wall-clock budget ran out while packing.
    #[error("packing timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },
}

impl Error {
    /// Configuration errors are the caller's fault; budget errors are the
    /// input's size.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::InvalidMaterial { .. }
                | Error::MissingMaterialData { .. }
                | Error::InvalidPiece { .. }
                | Error::InvalidKerf { .. }
        )
    }
}
