//! Criterion benchmarks for the paste hot path: planning a blueprint against
//! a populated grid, and the sanitizer on large slot arrays.
//!
//! Run with: cargo bench -p schematic

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::{json, Value};

use schematic::aux_record::AuxRecord;
use schematic::blueprint::Blueprint;
use schematic::cell::{CellKind, CellState};
use schematic::geometry::{Cardinal, CellPos};
use schematic::materials::MaterialCatalog;
use schematic::planner::plan;
use schematic::sanitize::sanitize;
use schematic::world::CellGrid;

const BLOCKS: [&str; 4] = ["stone", "oak_planks", "glass", "bricks"];

/// A solid cube of `side`³ cells with mixed blocks and facings.
fn cube(side: i32, rng: &mut ChaCha8Rng) -> Blueprint {
    let mut bp = Blueprint::new("cube", Cardinal::North);
    for y in 0..side {
        for z in 0..side {
            for x in 0..side {
                let block = BLOCKS[rng.gen_range(0..BLOCKS.len())];
                let facing = Cardinal::from_index(rng.gen_range(0..4));
                bp.insert_cell(CellPos::new(x, y, z), CellState::plain(block).facing(facing));
            }
        }
    }
    bp
}

/// Half of the destination already holds cells, so every skip branch runs.
fn cluttered_grid(side: i32, rng: &mut ChaCha8Rng) -> CellGrid {
    let mut grid = CellGrid::default();
    for y in 0..side {
        for z in 0..side {
            for x in 0..side {
                if rng.gen_bool(0.5) {
                    grid.place(CellPos::new(x, y, z), CellState::plain("dirt"));
                }
            }
        }
    }
    grid
}

fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan");
    let catalog = MaterialCatalog::identity();
    for side in [8, 16, 32] {
        let mut rng = ChaCha8Rng::seed_from_u64(side as u64);
        let bp = cube(side, &mut rng);
        let empty = CellGrid::default();
        let cluttered = cluttered_grid(side, &mut rng);

        group.bench_with_input(BenchmarkId::new("empty_grid", side), &side, |b, _| {
            b.iter(|| plan(black_box(&bp), CellPos::ORIGIN, 1, &empty, &catalog))
        });
        group.bench_with_input(BenchmarkId::new("cluttered_grid", side), &side, |b, _| {
            b.iter(|| plan(black_box(&bp), CellPos::ORIGIN, 3, &cluttered, &catalog))
        });
    }
    group.finish();
}

fn bench_sanitize(c: &mut Criterion) {
    let mut group = c.benchmark_group("sanitize");
    for slots in [9usize, 54, 270] {
        let slot_list: Vec<Value> = (0..slots)
            .map(|i| json!({"config": format!("filter{i}"), "stock": i, "mode": "exact"}))
            .collect();
        let raw = AuxRecord::from_value(json!({
            "custom_name": "Storage",
            "slots": slot_list,
            "buffer": {"size": slots, "items": [{"count": 64}]},
            "energy": 100_000
        }))
        .unwrap_or_default();

        group.bench_with_input(BenchmarkId::new("composite", slots), &raw, |b, raw| {
            b.iter(|| sanitize(black_box(raw), &CellKind::Composite))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_plan, bench_sanitize);
criterion_main!(benches);
