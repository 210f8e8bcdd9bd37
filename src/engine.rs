//! Library entry points: one material, a batch of materials, or whole quotes.
//!
//! Materials are independent of each other, so batches are packed on the
//! rayon pool. Results always come back in input order and a failed
//! material never affects its siblings.

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};

use crate::assemble::{PackResult, assemble};
use crate::error::{Error, Result};
use crate::grouping::group_quotes;
use crate::linear::{self, LinearResult};
use crate::model::{Material, PackRequest, PlanRequest, Stock};
use crate::solver::{PackOptions, Solver};
use crate::types::Demand;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PackOutcome {
    Sheet(PackResult),
    Linear(LinearResult),
}

impl PackOutcome {
    pub fn as_sheet(&self) -> Option<&PackResult> {
        match self {
            PackOutcome::Sheet(r) => Some(r),
            PackOutcome::Linear(_) => None,
        }
    }

    pub fn as_linear(&self) -> Option<&LinearResult> {
        match self {
            PackOutcome::Linear(r) => Some(r),
            PackOutcome::Sheet(_) => None,
        }
    }
}

/// Outcome of one material inside a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialReport {
    pub material: String,
    pub outcome: Result<PackOutcome>,
}

impl Serialize for MaterialReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("MaterialReport", 2)?;
        s.serialize_field("material", &self.material)?;
        match &self.outcome {
            Ok(outcome) => s.serialize_field("result", outcome)?,
            Err(e) => s.serialize_field("error", &e.to_string())?,
        }
        s.end()
    }
}

pub fn pack_material(request: &PackRequest, options: &PackOptions) -> Result<PackOutcome> {
    let material = &request.material;
    match material.stock()? {
        Stock::Sheet {
            bin,
            allow_rotation,
        } => {
            if request.pieces.is_empty() {
                return Ok(PackOutcome::Sheet(PackResult::empty()));
            }
            let demands = request
                .pieces
                .iter()
                .enumerate()
                .map(|(piece, p)| {
                    Ok(Demand {
                        piece,
                        rect: p.rect()?,
                        qty: p.quantity,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            let solution = Solver::new(bin, allow_rotation, demands)
                .with_options(*options)
                .solve()?;
            let result = assemble(&material.name, &solution, &request.pieces);
            for r in &result.rejected_pieces {
                tracing::warn!(
                    material = %material.name,
                    piece = %r.piece_id,
                    width = r.width,
                    height = r.height,
                    "piece too large for the sheet"
                );
            }
            Ok(PackOutcome::Sheet(result))
        }
        Stock::Linear { length } => Ok(PackOutcome::Linear(linear::calculate(
            &material.name,
            length,
            &request.pieces,
        )?)),
    }
}

fn report(request: &PackRequest, options: &PackOptions) -> MaterialReport {
    let outcome = pack_material(request, options);
    if let Err(e) = &outcome {
        tracing::warn!(material = %request.material.name, error = %e, "material run failed");
    }
    MaterialReport {
        material: request.material.name.clone(),
        outcome,
    }
}

pub fn pack_batch(requests: &[PackRequest], options: &PackOptions) -> Vec<MaterialReport> {
    let reports: Vec<MaterialReport> = requests.par_iter().map(|r| report(r, options)).collect();
    tracing::info!(
        materials = reports.len(),
        failed = reports.iter().filter(|r| r.outcome.is_err()).count(),
        "packed batch"
    );
    reports
}

/// Groups the quotes' pieces by material and packs each group against the
/// catalogue. Groups naming an unknown material get `MissingMaterialData`.
/// When the catalogue repeats a name, the first record wins.
pub fn plan_quotes(plan: &PlanRequest, options: &PackOptions) -> Vec<MaterialReport> {
    let mut catalogue: IndexMap<&str, &Material> = IndexMap::with_capacity(plan.materials.len());
    for material in &plan.materials {
        catalogue.entry(material.name.as_str()).or_insert(material);
    }

    let jobs: Vec<std::result::Result<PackRequest, String>> = group_quotes(&plan.quotes)
        .into_iter()
        .map(|(name, pieces)| match catalogue.get(name.as_str()) {
            Some(&material) => Ok(PackRequest {
                material: material.clone(),
                pieces,
            }),
            None => Err(name),
        })
        .collect();

    let reports: Vec<MaterialReport> = jobs
        .par_iter()
        .map(|job| match job {
            Ok(request) => report(request, options),
            Err(name) => {
                tracing::warn!(material = %name, "no material data for group");
                MaterialReport {
                    material: name.clone(),
                    outcome: Err(Error::MissingMaterialData {
                        material: name.clone(),
                    }),
                }
            }
        })
        .collect();

    tracing::info!(
        quotes = plan.quotes.len(),
        materials = reports.len(),
        failed = reports.iter().filter(|r| r.outcome.is_err()).count(),
        "planned quotes"
    );
    reports
}
