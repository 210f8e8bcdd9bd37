//! Cutting-stock planning for sheet and linear materials.
//!
//! Pieces requested across quotes are grouped per material, normalized to
//! millimeters and packed onto sheets with a best-area-fit guillotine
//! heuristic. Tube and bar materials get a closed-form stock count.
//!
//! ```no_run
//! use cut_planner::engine::pack_material;
//! use cut_planner::model::{Material, PackRequest, PieceRequest};
//! use cut_planner::solver::PackOptions;
//!
//! let request = PackRequest {
//!     material: Material::sheet("MDF 18", 1.83, 2.44).with_rotation(false),
//!     pieces: vec![PieceRequest::new("side", 0.6, 2.0, 2)],
//! };
//! let outcome = pack_material(&request, &PackOptions::default())?;
//! assert_eq!(outcome.as_sheet().map(|r| r.bin_count), Some(1));
//! # Ok::<(), cut_planner::error::Error>(())
//! ```

pub mod assemble;
pub mod engine;
pub mod error;
pub mod grouping;
pub mod guillotine;
pub mod linear;
pub mod model;
pub mod render;
pub mod solver;
pub mod types;
pub mod units;

pub use engine::{MaterialReport, PackOutcome, pack_batch, pack_material, plan_quotes};
pub use error::{Error, Result};
