use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::guillotine::GuillotineBin;
use crate::types::{Demand, RejectReason, Rejection, Rect, SheetResult, Solution};

pub const DEFAULT_MAX_PIECES: usize = 10_000;

/// Per-run knobs that are not part of the material itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackOptions {
    /// Blade margin in mm kept between a piece and the space split off it.
    pub kerf: u32,
    /// Upper bound on expanded pieces; larger runs are refused outright.
    pub max_pieces: Option<usize>,
    pub time_limit: Option<Duration>,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            kerf: 0,
            max_pieces: Some(DEFAULT_MAX_PIECES),
            time_limit: None,
        }
    }
}

/// A single unit to place, already turned to the sheet axes if needed.
#[derive(Debug, Clone, Copy)]
struct Item {
    piece: usize,
    rect: Rect,
    pre_rotated: bool,
}

pub struct Solver {
    stock: Rect,
    allow_rotate: bool,
    options: PackOptions,
    demands: Vec<Demand>,
}

impl Solver {
    pub fn new(stock: Rect, allow_rotate: bool, demands: Vec<Demand>) -> Self {
        Self {
            stock,
            allow_rotate,
            options: PackOptions::default(),
            demands,
        }
    }

    pub fn with_options(mut self, options: PackOptions) -> Self {
        self.options = options;
        self
    }

    /// Packs every demand in input order. Oversized demands are returned in
    /// `Solution::rejected`; only a bad kerf or budget violations fail the run.
    pub fn solve(&self) -> Result<Solution> {
        let short_side = self.stock.w.min(self.stock.h);
        if self.options.kerf >= short_side {
            return Err(Error::InvalidKerf {
                kerf: self.options.kerf,
                limit: short_side,
            });
        }

        let (items, rejected) = self.expand_demands();

        if let Some(limit) = self.options.max_pieces
            && items.len() > limit
        {
            return Err(Error::BudgetExceeded {
                pieces: items.len(),
                limit,
            });
        }

        let bins = self.pack(&items, Instant::now())?;
        tracing::debug!(
            stock = %self.stock,
            pieces = items.len(),
            bins = bins.len(),
            rejected = rejected.len(),
            "packed sheet material"
        );

        let mut solution = self.bins_to_solution(bins);
        solution.rejected = rejected;
        Ok(solution)
    }

    /// Turns a piece so it fits the sheet's fixed axes. This runs whatever
    /// the rotation policy is; `None` means no orientation fits.
    pub fn orient(&self, rect: Rect) -> Option<(Rect, bool)> {
        if rect.fits_in(&self.stock) {
            Some((rect, false))
        } else if rect.rotated().fits_in(&self.stock) {
            Some((rect.rotated(), true))
        } else {
            None
        }
    }

    fn expand_demands(&self) -> (Vec<Item>, Vec<Rejection>) {
        let mut items = Vec::new();
        let mut rejected = Vec::new();
        for d in &self.demands {
            let Some((rect, pre_rotated)) = self.orient(d.rect) else {
                rejected.push(Rejection {
                    piece: d.piece,
                    rect: d.rect,
                    reason: RejectReason::OversizedPiece,
                });
                continue;
            };
            for _ in 0..d.qty {
                items.push(Item {
                    piece: d.piece,
                    rect,
                    pre_rotated,
                });
            }
        }
        (items, rejected)
    }

    /// First bin (in creation order) that can host the item wins; inside a
    /// bin the free rectangle is chosen by best area fit.
    fn pack(&self, items: &[Item], started: Instant) -> Result<Vec<GuillotineBin>> {
        let mut bins: Vec<GuillotineBin> = Vec::new();

        for item in items {
            if let Some(limit) = self.options.time_limit
                && started.elapsed() > limit
            {
                return Err(Error::Timeout {
                    elapsed_ms: started.elapsed().as_millis() as u64,
                });
            }

            // A piece turned to fit the sheet is never turned back
            let allow_rotate = self.allow_rotate && !item.pre_rotated;

            let hosted = bins
                .iter()
                .enumerate()
                .find_map(|(bi, bin)| {
                    bin.find_best(item.rect, allow_rotate).map(|s| (bi, s))
                });

            if let Some((bi, scored)) = hosted {
                bins[bi].place(scored, item.piece, item.rect, item.pre_rotated);
                continue;
            }

            let mut bin = GuillotineBin::new(self.stock, self.options.kerf);
            if let Some(scored) = bin.find_best(item.rect, allow_rotate) {
                bin.place(scored, item.piece, item.rect, item.pre_rotated);
                tracing::trace!(bin = bins.len() + 1, "opened bin");
                bins.push(bin);
            }
        }

        Ok(bins)
    }

    fn bins_to_solution(&self, bins: Vec<GuillotineBin>) -> Solution {
        let stock_area = self.stock.area();
        let sheets = bins
            .into_iter()
            .map(|bin| {
                let used = bin.used_area();
                SheetResult {
                    placements: bin.placements,
                    waste_area: stock_area - used,
                }
            })
            .collect();

        Solution {
            sheets,
            stock: self.stock,
            rejected: vec![],
        }
    }
}
