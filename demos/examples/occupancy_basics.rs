// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement basics: exact and random placement, weights, and the Kurbo mapping.
//!
//! Run:
//! - `cargo run -p understory_demos --example occupancy_basics`

use kurbo::{Point, Size};
use understory_occupancy::adapters::kurbo::cell_at_point;
use understory_occupancy::{CellRect, Grid, ManualTimer, Placement};

fn print_weights(grid: &Grid<&'static str, ManualTimer>) {
    for row in 0..grid.height() {
        let line: String = (0..grid.width())
            .map(|col| match grid.cell_weight(row, col) {
                0 => '.',
                n @ 1..=9 => char::from_digit(u32::from(n), 10).unwrap_or('#'),
                _ => '#',
            })
            .collect();
        println!("  {line}");
    }
}

fn main() {
    let mut grid: Grid<&'static str, ManualTimer> = Grid::new(16, 8, ManualTimer::new());

    // A locked header strip and a few randomly placed cards.
    grid.add("header", 16, 1, Placement::At { x: 0, y: 0 }, true)
        .unwrap();
    for name in ["clock", "weather", "notes", "calendar"] {
        let rect = grid.add(name, 4, 3, Placement::Random, false).unwrap();
        println!("{name:>8} -> {rect:?}");
    }

    println!("== Occupancy ==");
    print_weights(&grid);
    println!(
        "pending collisions: {}, resolving: {}",
        grid.pending_collisions(),
        grid.is_resolving()
    );

    // Map to layout space for a renderer with 24×32 px cells.
    let cell = Size::new(24.0, 32.0);
    for (name, rect) in grid.children() {
        println!("{name:>8} at {:?}", rect.to_kurbo(cell));
    }

    // Hit-test a pointer position back to a cell and its weight.
    let pt = Point::new(100.0, 70.0);
    if let Some((row, col)) = cell_at_point(pt, cell, grid.width(), grid.height()) {
        println!(
            "pointer {pt:?} is over cell ({row}, {col}) with weight {}",
            grid.cell_weight(row, col)
        );
    }

    let probe = CellRect::new(0, 0, 16, 8);
    println!("total weight: {}", grid.weight(&probe).unwrap());
}
