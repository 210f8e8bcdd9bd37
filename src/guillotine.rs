use crate::types::{Placement, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeRect {
    pub x: u32,
    pub y: u32,
    pub rect: Rect,
}

impl FreeRect {
    fn contains(&self, other: &FreeRect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x + other.rect.w <= self.x + self.rect.w
            && other.y + other.rect.h <= self.y + self.rect.h
    }
}

/// One sheet being filled. Free space is tracked as a list of
/// non-overlapping rectangles; placements are never moved once written.
#[derive(Debug, Clone)]
pub struct GuillotineBin {
    kerf: u32,
    pub free_rects: Vec<FreeRect>,
    pub placements: Vec<Placement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredPlacement {
    pub free_idx: usize,
    pub rotated: bool,
    /// (leftover area, leftover short side), lower is better.
    pub score: (u64, u64),
}

impl GuillotineBin {
    pub fn new(stock: Rect, kerf: u32) -> Self {
        Self {
            kerf,
            free_rects: vec![FreeRect {
                x: 0,
                y: 0,
                rect: stock,
            }],
            placements: Vec::new(),
        }
    }

    pub fn used_area(&self) -> u64 {
        self.placements.iter().map(|p| p.rect.area()).sum()
    }

    /// Best-area-fit over every free rectangle. Earlier free rectangles and
    /// the unrotated orientation win ties.
    pub fn find_best(&self, piece: Rect, allow_rotate: bool) -> Option<ScoredPlacement> {
        let mut best: Option<ScoredPlacement> = None;

        for (idx, free) in self.free_rects.iter().enumerate() {
            let mut consider = |candidate: Rect, rotated: bool| {
                if !candidate.fits_in(&free.rect) {
                    return;
                }
                let score = Self::score(candidate, free.rect);
                if best.is_none_or(|b| score < b.score) {
                    best = Some(ScoredPlacement {
                        free_idx: idx,
                        rotated,
                        score,
                    });
                }
            };
            consider(piece, false);
            if allow_rotate && piece.w != piece.h {
                consider(piece.rotated(), true);
            }
        }

        best
    }

    fn score(piece: Rect, free: Rect) -> (u64, u64) {
        let area_diff = free.area() - piece.area();
        let short_side = std::cmp::min(free.w - piece.w, free.h - piece.h) as u64;
        (area_diff, short_side)
    }

    /// Writes `piece` at the chosen free rectangle's top-left corner.
    /// `pre_rotated` marks pieces that were already turned to fit the
    /// sheet axes before packing.
    pub fn place(
        &mut self,
        scored: ScoredPlacement,
        piece: usize,
        rect: Rect,
        pre_rotated: bool,
    ) -> Placement {
        let free = self.free_rects[scored.free_idx];
        let placed = if scored.rotated { rect.rotated() } else { rect };

        let placement = Placement {
            piece,
            rect: placed,
            x: free.x,
            y: free.y,
            rotated: scored.rotated || pre_rotated,
        };

        self.free_rects.remove(scored.free_idx);
        self.split(free, placed);
        self.placements.push(placement);
        self.merge_free_rects();
        self.prune_contained();

        placement
    }

    fn split(&mut self, free: FreeRect, placed: Rect) {
        // Piece plus blade margin; a remainder exists only when this is
        // strictly smaller than the free side, so the offsets below stay in range
        let used_w = placed.w.saturating_add(self.kerf);
        let used_h = placed.h.saturating_add(self.kerf);
        let right_w = free.rect.w.saturating_sub(used_w);
        let bottom_h = free.rect.h.saturating_sub(used_h);

        if right_w > 0 && bottom_h > 0 {
            // Split along the shorter leftover axis
            if free.rect.w - placed.w < free.rect.h - placed.h {
                // Right strip stays beside the piece, bottom strip spans full width
                self.free_rects.push(FreeRect {
                    x: free.x + used_w,
                    y: free.y,
                    rect: Rect::new(right_w, placed.h),
                });
                self.free_rects.push(FreeRect {
                    x: free.x,
                    y: free.y + used_h,
                    rect: Rect::new(free.rect.w, bottom_h),
                });
            } else {
                // Right strip spans full height, bottom strip stays under the piece
                self.free_rects.push(FreeRect {
                    x: free.x + used_w,
                    y: free.y,
                    rect: Rect::new(right_w, free.rect.h),
                });
                self.free_rects.push(FreeRect {
                    x: free.x,
                    y: free.y + used_h,
                    rect: Rect::new(placed.w, bottom_h),
                });
            }
        } else if right_w > 0 {
            self.free_rects.push(FreeRect {
                x: free.x + used_w,
                y: free.y,
                rect: Rect::new(right_w, free.rect.h),
            });
        } else if bottom_h > 0 {
            self.free_rects.push(FreeRect {
                x: free.x,
                y: free.y + used_h,
                rect: Rect::new(free.rect.w, bottom_h),
            });
        }
    }

    fn merge_free_rects(&mut self) {
        let mut merged = true;
        while merged {
            merged = false;
            'outer: for i in 0..self.free_rects.len() {
                for j in (i + 1)..self.free_rects.len() {
                    if let Some(m) = Self::try_merge(self.free_rects[i], self.free_rects[j]) {
                        self.free_rects[i] = m;
                        self.free_rects.remove(j);
                        merged = true;
                        break 'outer;
                    }
                }
            }
        }
    }

    fn try_merge(a: FreeRect, b: FreeRect) -> Option<FreeRect> {
        // Same row, touching edges
        if a.y == b.y && a.rect.h == b.rect.h {
            if a.x + a.rect.w == b.x {
                return Some(FreeRect {
                    x: a.x,
                    y: a.y,
                    rect: Rect::new(a.rect.w + b.rect.w, a.rect.h),
                });
            }
            if b.x + b.rect.w == a.x {
                return Some(FreeRect {
                    x: b.x,
                    y: b.y,
                    rect: Rect::new(a.rect.w + b.rect.w, a.rect.h),
                });
            }
        }
        // Same column, touching edges
        if a.x == b.x && a.rect.w == b.rect.w {
            if a.y + a.rect.h == b.y {
                return Some(FreeRect {
                    x: a.x,
                    y: a.y,
                    rect: Rect::new(a.rect.w, a.rect.h + b.rect.h),
                });
            }
            if b.y + b.rect.h == a.y {
                return Some(FreeRect {
                    x: b.x,
                    y: b.y,
                    rect: Rect::new(a.rect.w, a.rect.h + b.rect.h),
                });
            }
        }
        None
    }

    /// Drops free rectangles lying entirely inside another one. Of two
    /// identical rectangles the earlier is kept.
    fn prune_contained(&mut self) {
        let mut i = 0;
        while i < self.free_rects.len() {
            let candidate = self.free_rects[i];
            let covered = self
                .free_rects
                .iter()
                .enumerate()
                .any(|(j, other)| {
                    j != i && other.contains(&candidate) && (other != &candidate || j < i)
                });
            if covered {
                self.free_rects.remove(i);
            } else {
                i += 1;
            }
        }
    }
}
