// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement and de-collision searches over an [`Occupancy`] map.
//!
//! - [`place_randomly`]: randomized best-of-N trials for a new child.
//! - [`shift`]: greedy hill-climbing over the 8-neighborhood of a placed child.
//!
//! Both take the random source explicitly so callers can seed them for
//! reproducible layouts. Neither mutates the occupancy map; the caller is
//! responsible for removing the child's own contribution before calling
//! [`shift`] and re-adding it afterwards.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::occupancy::Occupancy;
use crate::types::CellRect;

/// Pick a position for a `width × height` child using up to `trials` random samples.
///
/// Each trial samples `x` from `[0, grid_width - width)` and `y` from
/// `[0, grid_height - height)`; an empty range yields `0`. The first trial with
/// the lowest weight wins and the search stops early on a trial of weight `0`.
///
/// Returns the chosen rectangle and its weight. The size must fit the grid.
pub fn place_randomly<R: Rng>(
    occupancy: &Occupancy,
    width: u32,
    height: u32,
    trials: u32,
    rng: &mut R,
) -> (CellRect, u32) {
    debug_assert!(
        width <= occupancy.width() && height <= occupancy.height(),
        "child {width}×{height} larger than grid"
    );
    let x_range = occupancy.width() - width;
    let y_range = occupancy.height() - height;
    let trial = |rng: &mut R| {
        let rect = CellRect::new(sample(rng, x_range), sample(rng, y_range), width, height);
        (rect, occupancy.weight(&rect))
    };

    let mut best = trial(rng);
    for _ in 1..trials {
        if best.1 == 0 {
            break;
        }
        let candidate = trial(rng);
        if candidate.1 < best.1 {
            best = candidate;
        }
    }
    best
}

fn sample<R: Rng>(rng: &mut R, range: u32) -> u32 {
    if range == 0 {
        0
    } else {
        rng.random_range(0..range)
    }
}

/// Unit-offset neighbors of a rectangle that stay clear of the grid border.
///
/// A step right (down) is generated only while the far edge stays below
/// `grid_width - 1` (`grid_height - 1`); a step left (up) only while the near
/// edge stays above `0` after the step.
#[derive(Clone, Debug)]
pub struct Neighbors {
    rects: [CellRect; 8],
    len: usize,
}

impl Neighbors {
    /// Enumerate the candidates for `rect` in a `grid_width × grid_height` grid.
    ///
    /// Order: right, left, down, up, then the diagonals
    /// `(+1,+1)`, `(-1,+1)`, `(+1,-1)`, `(-1,-1)`.
    pub fn of(rect: &CellRect, grid_width: u32, grid_height: u32) -> Self {
        let right = rect.right() + 1 < grid_width;
        let left = rect.x > 1;
        let down = rect.bottom() + 1 < grid_height;
        let up = rect.y > 1;

        let mut out = Self {
            rects: [CellRect::default(); 8],
            len: 0,
        };
        let (x, y) = (rect.x, rect.y);
        if right {
            out.push(rect.with_origin(x + 1, y));
        }
        if left {
            out.push(rect.with_origin(x - 1, y));
        }
        if down {
            out.push(rect.with_origin(x, y + 1));
        }
        if up {
            out.push(rect.with_origin(x, y - 1));
        }
        if right && down {
            out.push(rect.with_origin(x + 1, y + 1));
        }
        if left && down {
            out.push(rect.with_origin(x - 1, y + 1));
        }
        if right && up {
            out.push(rect.with_origin(x + 1, y - 1));
        }
        if left && up {
            out.push(rect.with_origin(x - 1, y - 1));
        }
        out
    }

    fn push(&mut self, rect: CellRect) {
        self.rects[self.len] = rect;
        self.len += 1;
    }

    /// The candidates as a slice.
    pub fn as_slice(&self) -> &[CellRect] {
        &self.rects[..self.len]
    }

    fn as_mut_slice(&mut self) -> &mut [CellRect] {
        &mut self.rects[..self.len]
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return true if no candidate is in bounds.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Greedily move `rect` one cell at a time while its weight strictly drops.
///
/// At each step the in-bounds neighbors are shuffled and scanned; the lowest
/// weight strictly below the current one is adopted and the search continues
/// from there. Stops when no single step improves.
///
/// `occupancy` must not include `rect`'s own contribution, and `weight` must be
/// `rect`'s weight in it. Returns the final rectangle and weight, which may
/// still be non-zero.
pub fn shift<R: Rng>(
    occupancy: &Occupancy,
    mut rect: CellRect,
    mut weight: u32,
    rng: &mut R,
) -> (CellRect, u32) {
    loop {
        let mut candidates = Neighbors::of(&rect, occupancy.width(), occupancy.height());
        candidates.as_mut_slice().shuffle(rng);

        let mut best = None;
        for candidate in candidates.as_slice() {
            let w = occupancy.weight(candidate);
            if w < weight {
                best = Some(*candidate);
                weight = w;
            }
        }

        match best {
            Some(next) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(?next, weight, "shift step");
                rect = next;
            }
            None => return (rect, weight),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::{RngCore, SeedableRng};

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    #[test]
    fn neighbors_respect_border_margins() {
        // x = 1 cannot step left (x - 1 > 0 fails), far edge 3 < 9 can step right.
        let n = Neighbors::of(&CellRect::new(1, 1, 2, 2), 10, 10);
        assert_eq!(
            n.as_slice(),
            [
                CellRect::new(2, 1, 2, 2),
                CellRect::new(1, 2, 2, 2),
                CellRect::new(2, 2, 2, 2),
            ]
        );
    }

    #[test]
    fn neighbors_interior_has_all_eight() {
        let n = Neighbors::of(&CellRect::new(4, 4, 2, 2), 10, 10);
        assert_eq!(n.len(), 8);
        assert_eq!(n.as_slice()[0], CellRect::new(5, 4, 2, 2));
        assert_eq!(n.as_slice()[7], CellRect::new(3, 3, 2, 2));
    }

    #[test]
    fn neighbors_far_edge_margin() {
        // Far edge at 8 in a 10-wide grid may step to 9, but never reaches 10.
        let n = Neighbors::of(&CellRect::new(6, 4, 2, 1), 10, 10);
        assert!(n.as_slice().contains(&CellRect::new(7, 4, 2, 1)));
        let n = Neighbors::of(&CellRect::new(7, 4, 2, 1), 10, 10);
        assert!(n.as_slice().iter().all(|r| r.x <= 7));
        assert!(n.as_slice().contains(&CellRect::new(6, 4, 2, 1)));
    }

    #[test]
    fn full_grid_child_has_no_neighbors() {
        let occ = Occupancy::new(5, 5);
        let rect = CellRect::new(0, 0, 5, 5);
        assert!(Neighbors::of(&rect, 5, 5).is_empty());
        let (r, w) = shift(&occ, rect, 3, &mut rng());
        assert_eq!(r, rect);
        assert_eq!(w, 3);
    }

    #[test]
    fn shift_walks_out_of_overlap() {
        let mut occ = Occupancy::new(10, 10);
        occ.add(&CellRect::new(0, 0, 4, 4));
        let start = CellRect::new(2, 2, 4, 4);
        let weight = occ.weight(&start);
        assert_eq!(weight, 4);
        let (r, w) = shift(&occ, start, weight, &mut rng());
        // Moving right or down always shrinks the overlap until it reaches zero.
        assert_eq!(w, 0);
        assert_eq!(occ.weight(&r), 0);
        assert!(r.fits_within(10, 10));
    }

    #[test]
    fn shift_keeps_position_without_improvement() {
        let mut occ = Occupancy::new(10, 10);
        occ.add(&CellRect::new(2, 2, 4, 4));
        let start = CellRect::new(0, 0, 4, 4);
        let weight = occ.weight(&start);
        // Every in-bounds step (right, down, diagonal) increases the overlap.
        let (r, w) = shift(&occ, start, weight, &mut rng());
        assert_eq!(r, start);
        assert_eq!(w, weight);
    }

    /// Occupancy with every cell at weight `base` except the listed `(x, y, weight)` cells.
    fn landscape(width: u32, height: u32, base: u16, cells: &[(u32, u32, u16)]) -> Occupancy {
        let mut occ = Occupancy::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let w = cells
                    .iter()
                    .find(|&&(cx, cy, _)| (cx, cy) == (x, y))
                    .map_or(base, |&(_, _, w)| w);
                for _ in 0..w {
                    occ.add(&CellRect::new(x, y, 1, 1));
                }
            }
        }
        occ
    }

    #[test]
    fn shift_prefers_strictly_lighter_over_earlier_improvement() {
        // Around (3, 3): two steps of weight 3 and one diagonal of weight 1.
        let occ = landscape(8, 8, 5, &[(4, 3, 3), (3, 4, 3), (4, 4, 1)]);
        let start = CellRect::new(3, 3, 1, 1);
        for seed in 0..32 {
            let (r, w) = shift(&occ, start, 5, &mut SmallRng::seed_from_u64(seed));
            assert_eq!((r, w), (CellRect::new(4, 4, 1, 1), 1), "seed {seed}");
        }
    }

    #[test]
    fn shift_does_not_chase_ties() {
        let occ = landscape(8, 8, 5, &[(4, 3, 3), (3, 4, 3)]);
        let start = CellRect::new(3, 3, 1, 1);
        for seed in 0..32 {
            let (r, w) = shift(&occ, start, 5, &mut SmallRng::seed_from_u64(seed));
            assert_eq!(w, 3);
            // From either weight-3 cell the other one is a diagonal tie, never taken.
            assert!(
                r == CellRect::new(4, 3, 1, 1) || r == CellRect::new(3, 4, 1, 1),
                "seed {seed}: {r:?}"
            );
        }
    }

    #[test]
    fn random_placement_stops_after_first_free_trial() {
        let occ = Occupancy::new(10, 10);
        let mut many = rng();
        let mut one = many.clone();
        let a = place_randomly(&occ, 2, 2, 20, &mut many);
        let b = place_randomly(&occ, 2, 2, 1, &mut one);
        assert_eq!(a, b);
        // Both sources advanced by exactly one trial.
        assert_eq!(many.next_u64(), one.next_u64());
    }

    #[test]
    fn random_placement_keeps_earliest_of_equal_trials() {
        // Uniform weight: no later trial is strictly better than the first.
        let mut occ = Occupancy::new(10, 10);
        occ.add(&CellRect::new(0, 0, 10, 10));
        let mut many = rng();
        let mut one = many.clone();
        let a = place_randomly(&occ, 3, 3, 20, &mut many);
        let b = place_randomly(&occ, 3, 3, 1, &mut one);
        assert_eq!(a, b);
        assert_eq!(a.1, 9);
        // All twenty trials ran.
        assert_ne!(many.next_u64(), one.next_u64());
    }

    #[test]
    fn random_placement_on_empty_grid_is_free() {
        let occ = Occupancy::new(10, 10);
        let (r, w) = place_randomly(&occ, 2, 3, 20, &mut rng());
        assert_eq!(w, 0);
        assert_eq!((r.width, r.height), (2, 3));
        // Sampling is half-open: the last column/row offset is never drawn.
        assert!(r.x < 8 && r.y < 7);
    }

    #[test]
    fn random_placement_with_exact_fit_uses_origin() {
        let occ = Occupancy::new(4, 6);
        let (r, w) = place_randomly(&occ, 4, 6, 20, &mut rng());
        assert_eq!(r, CellRect::new(0, 0, 4, 6));
        assert_eq!(w, 0);
    }

    #[test]
    fn random_placement_commits_best_even_when_colliding() {
        let mut occ = Occupancy::new(6, 6);
        occ.add(&CellRect::new(0, 0, 6, 6));
        let (r, w) = place_randomly(&occ, 2, 2, 20, &mut rng());
        assert_eq!(w, 4);
        assert!(r.fits_within(6, 6));
    }

    #[test]
    fn random_placement_prefers_lighter_spots() {
        // Everything but the bottom-right quadrant is covered.
        let mut occ = Occupancy::new(4, 4);
        occ.add(&CellRect::new(0, 0, 4, 2));
        occ.add(&CellRect::new(0, 2, 2, 2));
        // A 1×1 child samples x, y in [0, 3); the trial count is large enough
        // that a free cell at (2, 2) is found, and anything found is free.
        let (r, w) = place_randomly(&occ, 1, 1, 10_000, &mut rng());
        assert_eq!(w, 0);
        assert_eq!(r, CellRect::new(2, 2, 1, 1));
    }
}
