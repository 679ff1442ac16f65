// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter helpers for Kurbo geometry.
//!
//! ## Feature
//!
//! Enable with `kurbo`.
//!
//! ## Notes
//!
//! The grid works in whole cells. These helpers map cell rectangles into
//! layout coordinates given the size of one cell, and map pointer positions
//! back to cells.

use kurbo::{Point, Rect, Size};

use crate::types::CellRect;

impl CellRect {
    /// The rectangle in layout coordinates when each cell is `cell_size` large.
    pub fn to_kurbo(&self, cell_size: Size) -> Rect {
        Rect::new(
            f64::from(self.x) * cell_size.width,
            f64::from(self.y) * cell_size.height,
            f64::from(self.right()) * cell_size.width,
            f64::from(self.bottom()) * cell_size.height,
        )
    }
}

impl From<CellRect> for Rect {
    /// Unit cells: one cell is one layout unit.
    fn from(rect: CellRect) -> Self {
        rect.to_kurbo(Size::new(1.0, 1.0))
    }
}

/// The `(row, col)` cell under `pt`, or `None` outside a `grid_width × grid_height` grid.
///
/// Cell sizes must be positive.
pub fn cell_at_point(
    pt: Point,
    cell_size: Size,
    grid_width: u32,
    grid_height: u32,
) -> Option<(u32, u32)> {
    debug_assert!(
        cell_size.width > 0.0 && cell_size.height > 0.0,
        "cell size must be positive"
    );
    if !(pt.x >= 0.0 && pt.y >= 0.0) {
        return None;
    }
    let col = pt.x / cell_size.width;
    let row = pt.y / cell_size.height;
    if col >= f64::from(grid_width) || row >= f64::from(grid_height) {
        return None;
    }
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "both coordinates are non-negative and below a u32 grid dimension"
    )]
    Some((row as u32, col as u32))
}
