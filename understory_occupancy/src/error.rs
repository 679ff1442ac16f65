// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported for API misuse.
//!
//! Residual overlap is never an error; it shows up as queue membership instead.

use crate::types::CellRect;

/// Precondition violations reported by [`Grid`](crate::Grid) operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The child was never added, or has already been removed.
    #[error("child is not placed on this grid")]
    UnknownChild,
    /// The child is already placed on this grid.
    #[error("child is already placed on this grid")]
    DuplicateChild,
    /// A child must cover at least one cell.
    #[error("child size {width}×{height} covers no cells")]
    EmptySize {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// The requested rectangle does not fit inside the grid.
    #[error("{rect:?} does not fit in a {grid_width}×{grid_height} grid")]
    OutOfBounds {
        /// The rejected rectangle.
        rect: CellRect,
        /// Grid width.
        grid_width: u32,
        /// Grid height.
        grid_height: u32,
    },
}
