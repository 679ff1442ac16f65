// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_occupancy --heading-base-level=0

//! Understory Occupancy: weighted cell placement with incremental collision resolution.
//!
//! A [`Grid`] is a fixed `width × height` array of cells onto which rectangular
//! children are placed. Every cell counts how many children cover it, and the
//! *weight* of a rectangle is the sum of those counts.
//!
//! - New children are placed exactly, or with a randomized best-of-N search that
//!   looks for the lightest spot.
//! - Overlaps are tolerated on placement. Colliding children are queued and
//!   spread out later, a small batch per timer tick, by a greedy one-cell-at-a-time
//!   shift search.
//! - Locked children still count as occupied but are never moved.
//!
//! The grid does not own an event loop. It asks a host [`Timer`] for a repeating
//! callback while collisions are pending, and each [`Grid::resolve_tick`]
//! returns the relocations it made as a [`Resolution`] for the host to apply.
//!
//! # Example
//!
//! ```rust
//! use understory_occupancy::{CellRect, Grid, ManualTimer, Placement, TickStatus};
//!
//! let mut grid: Grid<&str, ManualTimer> = Grid::new(10, 10, ManualTimer::new());
//!
//! // Two explicitly placed children overlap on a 2×2 block.
//! grid.add("a", 4, 4, Placement::At { x: 0, y: 0 }, false).unwrap();
//! grid.add("b", 4, 4, Placement::At { x: 2, y: 2 }, false).unwrap();
//! assert_eq!(grid.cell_weight(3, 3), 2);
//! assert!(grid.is_resolving());
//!
//! // The host timer fires; one tick spreads them apart.
//! let tick = grid.resolve_tick();
//! assert_eq!(tick.status, TickStatus::Finished);
//! for moved in &tick.moved {
//!     assert_eq!(grid.rect(moved.child).unwrap(), moved.to);
//! }
//! assert!((0..10).all(|row| (0..10).all(|col| grid.cell_weight(row, col) <= 1)));
//! ```
//!
//! Random placement prefers free space:
//!
//! ```rust
//! use understory_occupancy::{Grid, ManualTimer, Placement};
//!
//! let mut grid: Grid<u32, ManualTimer> = Grid::new(8, 8, ManualTimer::new());
//! let rect = grid.add(1, 3, 2, Placement::Random, false).unwrap();
//! assert!(rect.fits_within(8, 8));
//! assert!(!grid.is_resolving());
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards `std` to dependencies. The crate is always `no_std` + `alloc`.
//! - `tracing`: emit `tracing` events for enqueues, timer changes, and ticks.
//! - `kurbo`: map [`CellRect`] to `kurbo::Rect` via [`adapters::kurbo`].

#![no_std]

extern crate alloc;

pub mod adapters;
pub mod config;
pub mod error;
pub mod grid;
pub mod occupancy;
pub mod search;
pub mod timer;
pub mod types;

pub use config::{GridConfig, GridConfigBuilder};
pub use error::Error;
pub use grid::{ChildMoved, DEFAULT_SEED, Grid, Resolution, TickStatus};
pub use occupancy::Occupancy;
pub use timer::{ManualTimer, Timer};
pub use types::{CellRect, ChildFlags, Placement};
