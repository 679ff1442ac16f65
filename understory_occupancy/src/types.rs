// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types: cell rectangles, placement requests, and per-child flags.

/// Integer rectangle in grid cells.
///
/// Covers columns `[x, x + width)` and rows `[y, y + height)`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellRect {
    /// Left column.
    pub x: u32,
    /// Top row.
    pub y: u32,
    /// Number of columns covered.
    pub width: u32,
    /// Number of rows covered.
    pub height: u32,
}

impl CellRect {
    /// Create a rectangle from origin and size.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// One past the right-most covered column.
    pub const fn right(&self) -> u32 {
        self.x + self.width
    }

    /// One past the bottom-most covered row.
    pub const fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Return true if the rectangle covers no cells.
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The same rectangle moved to a new origin.
    pub const fn with_origin(self, x: u32, y: u32) -> Self {
        Self { x, y, ..self }
    }

    /// The intersection of two rectangles.
    ///
    /// Disjoint rectangles (including ones that only share an edge) intersect to
    /// an empty rectangle with zero width *and* zero height.
    pub fn intersect(&self, other: &Self) -> Self {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 > x0 && y1 > y0 {
            Self::new(x0, y0, x1 - x0, y1 - y0)
        } else {
            Self::default()
        }
    }

    /// Return true if the rectangle lies fully inside a `grid_width × grid_height` grid.
    pub const fn fits_within(&self, grid_width: u32, grid_height: u32) -> bool {
        self.width <= grid_width
            && self.height <= grid_height
            && self.x <= grid_width - self.width
            && self.y <= grid_height - self.height
    }

    /// Iterate over covered cells as `(row, col)` pairs, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.y..self.bottom()).flat_map(move |row| (self.x..self.right()).map(move |col| (row, col)))
    }
}

/// Where [`Grid::add`](crate::Grid::add) should put a new child.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Placement {
    /// Search for a low-weight position with randomized best-of-N trials.
    #[default]
    Random,
    /// Place the child exactly at this origin; no search is performed.
    At {
        /// Left column.
        x: u32,
        /// Top row.
        y: u32,
    },
}

bitflags::bitflags! {
    /// Per-child state bits tracked by the grid.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ChildFlags: u8 {
        /// The resolver must not reposition this child.
        const LOCKED = 0b0000_0001;
        /// The child is waiting in the collision queue.
        const QUEUED = 0b0000_0010;
    }
}
