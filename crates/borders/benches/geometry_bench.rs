//! Criterion benchmarks for border geometry and the overlay tick.
//!
//! Benchmarks:
//!   - compute for a scattered partitioned tile and an exclusive tile
//!   - refresh of a fully cached window (the common no-op case)
//!   - refresh after one claim change
//!   - one fixed tick of a TestWorld with four observers
//!
//! Run with: cargo bench -p borders --bench geometry_bench --features bench

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use borders::test_harness::TestWorld;
use borders::{BorderCache, BorderGeometryEngine, BorderSettings, FlatTerrain};
use territory::{
    ClaimStore, ColumnIndex, Domain, Key, MemoryRepository, Repository, Role, TileCoord, WorldId,
};
use uuid::Uuid;

fn world() -> WorldId {
    WorldId(Uuid::from_u128(0xBE_4C))
}

fn hilly(_: WorldId, x: i32, z: i32) -> i32 {
    60 + (x * 3 + z * 5).rem_euclid(7)
}

/// A 3x3 block of tiles with every third column of the centre claimed and an
/// exclusive tile to the east.
fn populated_store() -> ClaimStore {
    let owner = Key::parse("bench:town").unwrap_or_else(|e| panic!("{e}"));
    let repository = MemoryRepository::new();
    repository
        .save_domain(&Domain::new(owner.clone(), Role::Outsider, None))
        .unwrap_or_else(|e| panic!("{e}"));
    let claims = ClaimStore::new(Arc::new(repository));
    let centre = TileCoord::new(world(), 0, 0);
    for column in ColumnIndex::all().step_by(3) {
        let _ = claims.annex_column(centre, column, &owner);
    }
    let _ = claims.annex_exclusive(centre.offset(1, 0), &owner);
    claims
}

// ---------------------------------------------------------------------------
// Benchmark: geometry
// ---------------------------------------------------------------------------

fn bench_compute(c: &mut Criterion) {
    let mut group = c.benchmark_group("border_compute");
    group.sample_size(200);

    let claims = populated_store();
    let engine = BorderGeometryEngine::new(24);
    let centre = TileCoord::new(world(), 0, 0);

    group.bench_function("partitioned_tile", |b| {
        b.iter(|| black_box(engine.compute(&claims, black_box(centre), &hilly)));
    });

    group.bench_function("exclusive_tile", |b| {
        b.iter(|| black_box(engine.compute(&claims, black_box(centre.offset(1, 0)), &hilly)));
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: cache refresh
// ---------------------------------------------------------------------------

fn bench_refresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("border_refresh");
    group.sample_size(200);

    let claims = populated_store();
    let centre = TileCoord::new(world(), 0, 0);
    let flat = FlatTerrain(64);

    group.bench_function("cached_window", |b| {
        let mut cache = BorderCache::new(BorderGeometryEngine::new(24), 1);
        cache.refresh([centre], &claims, &flat);
        b.iter(|| black_box(cache.refresh([black_box(centre)], &claims, &flat)));
    });

    group.bench_function("after_claim_change", |b| {
        let mut cache = BorderCache::new(BorderGeometryEngine::new(24), 1);
        cache.refresh([centre], &claims, &flat);
        let owner = Key::parse("bench:town").unwrap_or_else(|e| panic!("{e}"));
        let column = ColumnIndex::new(1, 1).unwrap_or_else(|| panic!("column out of range"));
        b.iter(|| {
            if claims.release_column(centre, column).is_err() {
                let _ = claims.annex_column(centre, column, &owner);
            }
            black_box(cache.refresh([centre], &claims, &flat))
        });
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: overlay tick
// ---------------------------------------------------------------------------

fn bench_overlay_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("border_overlay");
    group.sample_size(50);

    let mut test_world = TestWorld::with_settings(BorderSettings {
        ticks_per_draw: 1,
        ..Default::default()
    })
    .with_domains(&["bench", "bench:town"])
    .with_elevation(hilly);
    let owner = Key::parse("bench:town").unwrap_or_else(|e| panic!("{e}"));
    for x in -2..=2 {
        let tile = test_world.tile(x, 0);
        let _ = test_world.context().claims.annex_exclusive(tile, &owner);
    }
    for x in [-24.0, -8.0, 8.0, 24.0] {
        test_world.spawn_observer(x, 8.0);
    }
    test_world.tick(2);

    group.bench_function("tick_four_observers", |b| {
        b.iter(|| test_world.tick(1));
    });

    group.finish();
}

criterion_group!(benches, bench_compute, bench_refresh, bench_overlay_tick);
criterion_main!(benches);
