// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drive the collision resolver from a host loop.
//!
//! A pile of children is dropped onto the same spot. The host timer here just
//! remembers the requested interval; the loop sleeps for it and runs one tick
//! at a time until the grid reports that it is done.
//!
//! Run:
//! - `RUST_LOG=understory_occupancy=debug cargo run -p understory_demos --example collision_ticks`

use std::thread::sleep;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing_subscriber::EnvFilter;
use understory_occupancy::{Grid, GridConfig, Placement, Timer};

/// A timer for a loop that sleeps between ticks.
#[derive(Debug, Default)]
struct SleepTimer {
    next: u32,
    interval: Option<Duration>,
}

impl Timer for SleepTimer {
    type Handle = u32;

    fn schedule(&mut self, interval: Duration) -> u32 {
        self.next += 1;
        self.interval = Some(interval);
        self.next
    }

    fn cancel(&mut self, _handle: u32) {
        self.interval = None;
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = GridConfig::builder()
        .max_collisions_per_refresh(4)
        .refresh_interval(Duration::from_millis(20))
        .build();
    let mut grid: Grid<u32, SleepTimer, SmallRng> = Grid::with_rng(
        24,
        12,
        config,
        SleepTimer::default(),
        SmallRng::seed_from_u64(2025),
    );

    for k in 0..10 {
        grid.add(k, 3, 2, Placement::At { x: 10, y: 5 }, false)
            .unwrap();
    }
    println!(
        "dropped 10 children on one spot; {} queued",
        grid.pending_collisions()
    );

    let mut tick = 0;
    while let Some(interval) = grid.timer().interval.filter(|_| grid.is_resolving()) {
        sleep(interval);
        tick += 1;
        let resolution = grid.resolve_tick();
        for moved in &resolution.moved {
            println!(
                "tick {tick}: child {} {:?} -> {:?}",
                moved.child, moved.from, moved.to
            );
        }
        if !resolution.keep_running() {
            break;
        }
    }

    println!("== Final layout after {tick} ticks ==");
    for (k, rect) in grid.children() {
        let weight = grid.weight(&rect).unwrap();
        println!("  child {k}: {rect:?} (weight {weight})");
    }
}
