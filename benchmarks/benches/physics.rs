//! Collision pipeline benchmarks (criterion - wall-clock time).
//!
//! Run all:    cargo bench --manifest-path benchmarks/Cargo.toml --bench physics
//! Filter:     cargo bench --manifest-path benchmarks/Cargo.toml --bench physics -- broadphase

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use glam::Vec2;
use rein2d::physics::broadphase::broad_phase_for;
use rein2d::physics::narrowphase::{aabb_aabb, circle_aabb, circle_circle, sat};
use rein2d::physics::shape::Shape;
use rein2d::{BroadPhaseMethod, CollisionMethodKind, Rect};
use rein2d_bench::*;

const BROAD_PHASES: [BroadPhaseMethod; 2] =
    [BroadPhaseMethod::QuadTree, BroadPhaseMethod::SpatialGrid];

// ---------------------------------------------------------------------------
// Broadphase
// ---------------------------------------------------------------------------

fn bench_broadphase(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("broadphase/update");
        for &n in &[100, 500, 1000, 2000] {
            let entries = scattered_boxes(n);
            for method in BROAD_PHASES {
                let mut broad_phase = broad_phase_for(method);
                group.bench_with_input(
                    BenchmarkId::new(format!("{method:?}"), n),
                    &entries,
                    |b, entries| {
                        b.iter(|| broad_phase.update(entries));
                    },
                );
            }
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("broadphase/retrieve_all");
        for &n in &[100, 500, 1000, 2000] {
            let entries = scattered_boxes(n);
            for method in BROAD_PHASES {
                let mut broad_phase = broad_phase_for(method);
                broad_phase.update(&entries);
                group.bench_with_input(
                    BenchmarkId::new(format!("{method:?}"), n),
                    &entries,
                    |b, entries| {
                        b.iter(|| {
                            entries
                                .iter()
                                .filter_map(|(_, rect)| broad_phase.retrieve(rect).ok())
                                .map(|ids| ids.len())
                                .sum::<usize>()
                        });
                    },
                );
            }
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("broadphase/stacked");
        for &n in &[50, 200] {
            let entries = stacked_boxes(n);
            let area = Rect::from_center_size(Vec2::ZERO, Vec2::ONE);
            for method in BROAD_PHASES {
                let mut broad_phase = broad_phase_for(method);
                group.bench_with_input(
                    BenchmarkId::new(format!("{method:?}"), n),
                    &entries,
                    |b, entries| {
                        b.iter(|| {
                            broad_phase.update(entries);
                            broad_phase.retrieve(&area)
                        });
                    },
                );
            }
        }
        group.finish();
    }
}

// ---------------------------------------------------------------------------
// Narrowphase
// ---------------------------------------------------------------------------

fn bench_narrowphase(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("narrowphase/circle_circle");
        let Shape::Circle(a) = circle_shape(Vec2::ZERO, 1.0) else {
            unreachable!()
        };
        let Shape::Circle(hit) = circle_shape(Vec2::new(1.5, 0.0), 1.0) else {
            unreachable!()
        };
        let Shape::Circle(miss) = circle_shape(Vec2::new(5.0, 0.0), 1.0) else {
            unreachable!()
        };
        group.bench_function("intersecting", |b| b.iter(|| circle_circle(&a, &hit)));
        group.bench_function("separated", |b| b.iter(|| circle_circle(&a, &miss)));
        group.finish();
    }

    {
        let mut group = c.benchmark_group("narrowphase/aabb");
        let a = Rect::from_center_size(Vec2::ZERO, Vec2::splat(2.0));
        let hit = Rect::from_center_size(Vec2::new(1.5, 0.0), Vec2::splat(2.0));
        let miss = Rect::from_center_size(Vec2::new(5.0, 0.0), Vec2::splat(2.0));
        group.bench_function("box_intersecting", |b| b.iter(|| aabb_aabb(&a, &hit)));
        group.bench_function("box_separated", |b| b.iter(|| aabb_aabb(&a, &miss)));

        let Shape::Circle(circle) = circle_shape(Vec2::new(1.5, 0.0), 1.0) else {
            unreachable!()
        };
        group.bench_function("circle_box", |b| b.iter(|| circle_aabb(&circle, &a, false)));
        group.finish();
    }

    {
        let mut group = c.benchmark_group("narrowphase/sat");
        let a = box_shape(Vec2::ZERO, Vec2::splat(2.0), 0.0);

        let hit = box_shape(Vec2::new(1.5, 0.0), Vec2::splat(2.0), 0.0);
        group.bench_function("box_intersecting", |b| b.iter(|| sat(&a, &hit)));

        let miss = box_shape(Vec2::new(5.0, 0.0), Vec2::splat(2.0), 0.0);
        group.bench_function("box_separated", |b| b.iter(|| sat(&a, &miss)));

        let rotated = box_shape(Vec2::new(1.5, 0.0), Vec2::splat(2.0), 0.785);
        group.bench_function("box_rotated", |b| b.iter(|| sat(&a, &rotated)));

        let inner = box_shape(Vec2::new(0.2, 0.1), Vec2::splat(0.5), 0.0);
        group.bench_function("box_contained", |b| b.iter(|| sat(&inner, &a)));

        let circle = circle_shape(Vec2::new(1.5, 0.5), 1.0);
        group.bench_function("circle_box", |b| b.iter(|| sat(&circle, &a)));
        group.finish();
    }
}

// ---------------------------------------------------------------------------
// Full pipeline
// ---------------------------------------------------------------------------

fn bench_pipeline(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("pipeline/tick");
        group.sample_size(30);
        for &n in &[50, 100, 500, 1000] {
            for method in [CollisionMethodKind::Sat, CollisionMethodKind::Aabb] {
                for broad_phase in BROAD_PHASES {
                    group.bench_with_input(
                        BenchmarkId::new(format!("{method:?}/{broad_phase:?}"), n),
                        &n,
                        |b, &n| {
                            b.iter_batched(
                                || setup_scene(n, method, broad_phase).expect("scene setup"),
                                |(mut world, mut physics)| physics.tick(&mut world),
                                criterion::BatchSize::LargeInput,
                            );
                        },
                    );
                }
            }
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("pipeline/sustained_60ticks");
        group.sample_size(10);
        for &n in &[100, 500] {
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
                b.iter_batched(
                    || {
                        setup_scene(n, CollisionMethodKind::Sat, BroadPhaseMethod::QuadTree)
                            .expect("scene setup")
                    },
                    |(mut world, mut physics)| {
                        for _ in 0..60 {
                            physics.tick(&mut world).expect("tick");
                        }
                    },
                    criterion::BatchSize::LargeInput,
                );
            });
        }
        group.finish();
    }
}

// ---------------------------------------------------------------------------
// Tilemap
// ---------------------------------------------------------------------------

fn bench_tilemap(c: &mut Criterion) {
    let mut group = c.benchmark_group("tilemap/60ticks");
    group.sample_size(10);
    for composite in [true, false] {
        let name = if composite { "composite" } else { "per_tile" };
        group.bench_function(name, |b| {
            b.iter_batched(
                || setup_tilemap_scene(64, 16, 128, composite).expect("tilemap scene setup"),
                |(mut world, mut physics)| {
                    for _ in 0..60 {
                        physics.tick(&mut world).expect("tick");
                    }
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

criterion_group!(
    benches,
    bench_broadphase,
    bench_narrowphase,
    bench_pipeline,
    bench_tilemap,
);
criterion_main!(benches);
