// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use understory_occupancy::search::{place_randomly, shift};
use understory_occupancy::{CellRect, Grid, GridConfig, ManualTimer, Occupancy, Placement};

/// Tile the grid with `size × size` children, leaving every other tile free.
fn checkerboard(width: u32, height: u32, size: u32) -> Occupancy {
    let mut occ = Occupancy::new(width, height);
    for ty in 0..height / size {
        for tx in 0..width / size {
            if (tx + ty) % 2 == 0 {
                occ.add(&CellRect::new(tx * size, ty * size, size, size));
            }
        }
    }
    occ
}

fn bench_weight(c: &mut Criterion) {
    let mut group = c.benchmark_group("weight");
    for &n in &[32_u32, 128, 512] {
        let occ = checkerboard(n, n, 4);
        let rect = CellRect::new(n / 4, n / 4, n / 2, n / 2);
        group.throughput(Throughput::Elements(u64::from(rect.width * rect.height)));
        group.bench_function(format!("half_grid_n{n}"), |b| {
            b.iter(|| black_box(occ.weight(black_box(&rect))));
        });
    }
    group.finish();
}

fn bench_place_randomly(c: &mut Criterion) {
    let mut group = c.benchmark_group("place_randomly");
    for &trials in &[1_u32, 20, 100] {
        let occ = checkerboard(128, 128, 8);
        group.bench_function(format!("checkerboard_trials{trials}"), |b| {
            let mut rng = SmallRng::seed_from_u64(0xCAFE_F00D);
            b.iter(|| black_box(place_randomly(&occ, 6, 6, trials, &mut rng)));
        });
    }
    group.finish();
}

fn bench_shift(c: &mut Criterion) {
    let mut group = c.benchmark_group("shift");
    // A dense block in the corner; the child walks down the gradient.
    let mut occ = Occupancy::new(128, 128);
    for i in 0..8 {
        occ.add(&CellRect::new(0, 0, 32 + 4 * i, 32 + 4 * i));
    }
    let start = CellRect::new(10, 10, 8, 8);
    let weight = occ.weight(&start);
    group.bench_function("out_of_corner_block", |b| {
        let mut rng = SmallRng::seed_from_u64(0xBADC_0FFE);
        b.iter(|| black_box(shift(&occ, start, weight, &mut rng)));
    });
    group.finish();
}

fn bench_add_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_add");
    for &count in &[64_u32, 256] {
        group.throughput(Throughput::Elements(u64::from(count)));
        group.bench_function(format!("random_n{count}"), |b| {
            b.iter_batched(
                || Grid::<u32, ManualTimer>::with_config(96, 96, GridConfig::default(), ManualTimer::new()),
                |mut grid| {
                    for k in 0..count {
                        let _ = grid.add(k, 4, 3, Placement::Random, false);
                    }
                    black_box(grid.pending_collisions());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_weight,
    bench_place_randomly,
    bench_shift,
    bench_add_random,
);
criterion_main!(benches);
