// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dense per-cell occupancy counters and the weight evaluator.
//!
//! Every cell holds the number of placed rectangles covering it. The *weight* of a
//! rectangle is the sum of the counters it covers, so a rectangle that overlaps
//! nothing placed has weight `0`.
//!
//! Rectangles must already lie inside the grid. Debug builds assert this.

use alloc::vec;
use alloc::vec::Vec;

use crate::types::CellRect;

/// Dense `width × height` array of occupancy counters.
///
/// Cell `(row, col)` lives at index `col + row * width`.
#[derive(Clone, PartialEq, Eq)]
pub struct Occupancy {
    width: u32,
    height: u32,
    cells: Vec<u16>,
}

impl Occupancy {
    /// Create an all-zero occupancy map.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Self {
        assert!(
            width > 0 && height > 0,
            "occupancy dimensions must be positive, got {width}×{height}"
        );
        Self {
            width,
            height,
            cells: vec![0; width as usize * height as usize],
        }
    }

    /// Width in cells.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in cells.
    pub const fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, row: u32, col: u32) -> usize {
        debug_assert!(
            row < self.height && col < self.width,
            "cell ({row}, {col}) outside {}×{} grid",
            self.width,
            self.height
        );
        col as usize + row as usize * self.width as usize
    }

    /// Counter for a single cell.
    pub fn get(&self, row: u32, col: u32) -> u16 {
        self.cells[self.index(row, col)]
    }

    /// Sum of counters over every cell covered by `rect`.
    pub fn weight(&self, rect: &CellRect) -> u32 {
        debug_assert!(
            rect.fits_within(self.width, self.height),
            "{rect:?} outside {}×{} grid",
            self.width,
            self.height
        );
        let w = self.width as usize;
        let mut total = 0_u32;
        for row in rect.y..rect.bottom() {
            let start = rect.x as usize + row as usize * w;
            let end = start + rect.width as usize;
            total += self.cells[start..end]
                .iter()
                .map(|&c| u32::from(c))
                .sum::<u32>();
        }
        total
    }

    /// Increment every covered counter.
    ///
    /// # Panics
    ///
    /// Panics if a covered counter would exceed `u16::MAX`.
    pub fn add(&mut self, rect: &CellRect) {
        self.apply(rect, |c| {
            *c = c
                .checked_add(1)
                .unwrap_or_else(|| panic!("cell occupancy exceeds {}", u16::MAX));
        });
    }

    /// Decrement every covered counter. Must undo an earlier [`add`](Self::add) of the same rectangle.
    pub fn remove(&mut self, rect: &CellRect) {
        self.apply(rect, |c| {
            debug_assert!(*c > 0, "removing weight from an unoccupied cell");
            *c -= 1;
        });
    }

    fn apply(&mut self, rect: &CellRect, mut f: impl FnMut(&mut u16)) {
        debug_assert!(
            rect.fits_within(self.width, self.height),
            "{rect:?} outside {}×{} grid",
            self.width,
            self.height
        );
        let w = self.width as usize;
        for row in rect.y..rect.bottom() {
            let start = rect.x as usize + row as usize * w;
            let end = start + rect.width as usize;
            self.cells[start..end].iter_mut().for_each(&mut f);
        }
    }

    /// Return true if no cell is occupied.
    pub fn is_clear(&self) -> bool {
        self.cells.iter().all(|&c| c == 0)
    }
}

impl core::fmt::Debug for Occupancy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let occupied = self.cells.iter().filter(|&&c| c > 0).count();
        let max = self.cells.iter().copied().max().unwrap_or(0);
        f.debug_struct("Occupancy")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("occupied_cells", &occupied)
            .field("max_count", &max)
            .finish_non_exhaustive()
    }
}
