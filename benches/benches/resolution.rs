// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_occupancy::{Grid, GridConfig, ManualTimer, Placement};

/// Stack `count` children on a handful of origins so nearly all of them collide.
fn piled(width: u32, height: u32, count: u32, config: GridConfig) -> Grid<u32, ManualTimer> {
    let mut grid = Grid::with_config(width, height, config, ManualTimer::new());
    for k in 0..count {
        let x = (k % 4) * (width / 4);
        let y = (k / 4 % 4) * (height / 4);
        let _ = grid.add(k, 3, 3, Placement::At { x, y }, false);
    }
    grid
}

fn bench_single_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_tick");
    for &batch in &[1_u32, 20, 100] {
        let config = GridConfig::builder().max_collisions_per_refresh(batch).build();
        group.throughput(Throughput::Elements(u64::from(batch)));
        group.bench_function(format!("piled_batch{batch}"), |b| {
            b.iter_batched(
                || piled(64, 64, 200, config),
                |mut grid| black_box(grid.resolve_tick().moved.len()),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_all");
    for &count in &[50_u32, 200] {
        group.throughput(Throughput::Elements(u64::from(count)));
        group.bench_function(format!("piled_n{count}"), |b| {
            b.iter_batched(
                || piled(64, 64, count, GridConfig::default()),
                |mut grid| black_box(grid.resolve_all(1_000).len()),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single_tick, bench_drain);
criterion_main!(benches);
