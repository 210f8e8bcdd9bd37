//! Physical-unit data model exchanged with callers.
//!
//! Lengths here are meters. [`Material::stock`] is the single place where
//! a material is validated and normalized into millimeters.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{Rect, deserialize_u32_from_number};
use crate::units::positive_mm;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    Sheet,
    Linear,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub name: String,
    pub kind: MaterialKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_length: Option<f64>,
    /// Ignored for linear materials. `false` for grained boards.
    #[serde(default = "default_true")]
    pub allow_rotation: bool,
}

/// A validated material in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stock {
    Sheet { bin: Rect, allow_rotation: bool },
    Linear { length: u32 },
}

impl Material {
    pub fn sheet(name: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            kind: MaterialKind::Sheet,
            sheet_width: Some(width),
            sheet_height: Some(height),
            stock_length: None,
            allow_rotation: true,
        }
    }

    pub fn linear(name: impl Into<String>, length: f64) -> Self {
        Self {
            name: name.into(),
            kind: MaterialKind::Linear,
            sheet_width: None,
            sheet_height: None,
            stock_length: Some(length),
            allow_rotation: true,
        }
    }

    pub fn with_rotation(mut self, allow_rotation: bool) -> Self {
        self.allow_rotation = allow_rotation;
        self
    }

    pub fn stock(&self) -> Result<Stock> {
        match self.kind {
            MaterialKind::Sheet => {
                let w = self.dimension("sheetWidth", self.sheet_width)?;
                let h = self.dimension("sheetHeight", self.sheet_height)?;
                Ok(Stock::Sheet {
                    bin: Rect::new(w, h),
                    allow_rotation: self.allow_rotation,
                })
            }
            MaterialKind::Linear => {
                let length = self.dimension("stockLength", self.stock_length)?;
                Ok(Stock::Linear { length })
            }
        }
    }

    fn dimension(&self, field: &str, value: Option<f64>) -> Result<u32> {
        let invalid = |reason: String| Error::InvalidMaterial {
            material: self.name.clone(),
            reason,
        };
        let meters = value.ok_or_else(|| invalid(format!("{field} is missing")))?;
        positive_mm(meters).map_err(|e| invalid(format!("{field}: {e}")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceRequest {
    pub piece_id: String,
    /// Only meaningful while grouping quotes; a [`PackRequest`] already
    /// names its material.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub material: String,
    /// Linear length for linear materials.
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub quantity: u32,
}

impl PieceRequest {
    pub fn new(piece_id: impl Into<String>, width: f64, height: f64, quantity: u32) -> Self {
        Self {
            piece_id: piece_id.into(),
            material: String::new(),
            width,
            height,
            quantity,
        }
    }

    pub fn linear(piece_id: impl Into<String>, length: f64, quantity: u32) -> Self {
        Self::new(piece_id, length, 0.0, quantity)
    }

    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = material.into();
        self
    }

    /// Requested orientation in millimeters.
    pub fn rect(&self) -> Result<Rect> {
        self.check_quantity()?;
        Ok(Rect::new(
            self.dimension("width", self.width)?,
            self.dimension("height", self.height)?,
        ))
    }

    pub fn length(&self) -> Result<u32> {
        self.check_quantity()?;
        self.dimension("length", self.width)
    }

    fn check_quantity(&self) -> Result<()> {
        if self.quantity == 0 {
            return Err(Error::InvalidPiece {
                piece_id: self.piece_id.clone(),
                reason: "quantity must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    fn dimension(&self, field: &str, meters: f64) -> Result<u32> {
        positive_mm(meters).map_err(|e| Error::InvalidPiece {
            piece_id: self.piece_id.clone(),
            reason: format!("{field}: {e}"),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    #[serde(default)]
    pub name: String,
    pub pieces: Vec<PieceRequest>,
}

/// Everything needed to pack one material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackRequest {
    pub material: Material,
    #[serde(default)]
    pub pieces: Vec<PieceRequest>,
}

/// Materials catalogue plus the quotes whose pieces should be cut from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub materials: Vec<Material>,
    pub quotes: Vec<Quote>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_stock_in_mm() {
        let m = Material::sheet("MDF 18", 1.83, 2.44).with_rotation(false);
        assert_eq!(
            m.stock().unwrap(),
            Stock::Sheet {
                bin: Rect::new(1830, 2440),
                allow_rotation: false
            }
        );
    }

    #[test]
    fn test_invalid_sheet_dimensions() {
        for (w, h) in [(0.0, 2.44), (1.83, -1.0), (f64::NAN, 1.0)] {
            let err = Material::sheet("bad", w, h).stock().unwrap_err();
            assert!(
                matches!(err, Error::InvalidMaterial { ref material, .. } if material == "bad")
            );
        }
    }

    #[test]
    fn test_missing_sheet_dimension() {
        let mut m = Material::sheet("melamina", 1.83, 2.44);
        m.sheet_height = None;
        let err = m.stock().unwrap_err();
        assert!(err.to_string().contains("sheetHeight is missing"));
    }

    #[test]
    fn test_linear_stock_length_must_be_positive() {
        assert_eq!(
            Material::linear("tubo", 6.0).stock().unwrap(),
            Stock::Linear { length: 6000 }
        );
        assert!(matches!(
            Material::linear("tubo", 0.0).stock(),
            Err(Error::InvalidMaterial { .. })
        ));
    }

    #[test]
    fn test_piece_validation() {
        assert_eq!(
            PieceRequest::new("side", 0.6, 0.4, 2).rect().unwrap(),
            Rect::new(600, 400)
        );
        assert!(matches!(
            PieceRequest::new("side", 0.6, 0.4, 0).rect(),
            Err(Error::InvalidPiece { .. })
        ));
        assert!(matches!(
            PieceRequest::new("side", 0.6, 0.0, 1).rect(),
            Err(Error::InvalidPiece { .. })
        ));
        assert_eq!(PieceRequest::linear("leg", 0.75, 4).length().unwrap(), 750);
    }

    #[test]
    fn test_wire_format() {
        let json = r#"{
            "material": {"name": "MDF", "kind": "sheet", "sheetWidth": 1.0, "sheetHeight": 2.0},
            "pieces": [{"pieceId": "shelf", "width": 0.6, "height": 0.4, "quantity": 3.0}]
        }"#;
        let req: PackRequest = serde_json::from_str(json).unwrap();
        assert!(req.material.allow_rotation);
        assert_eq!(req.material.kind, MaterialKind::Sheet);
        assert_eq!(req.pieces[0].quantity, 3);
        assert_eq!(req.pieces[0].piece_id, "shelf");
    }
}
