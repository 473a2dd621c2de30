//! Scene builders shared by the benchmarks.

use glam::Vec2;
use rein2d::physics::shape::{Circle, Polygon, Shape, ShapeId};
use rein2d::{
    BallCollider, BoxCollider, BroadPhaseMethod, CollisionMethodKind, GlobalTransform,
    PhysicsConfig, PhysicsWorld, Rect, RigidBody, Tilemap, TilemapCollider, Transform,
};

/// Deterministic pseudo-random sequence in `[0, 1)`.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_f32(&mut self) -> f32 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 40) as f32 / (1u64 << 24) as f32
    }
}

/// `n` bounding boxes of side 1 to 4 scattered over a square sized so that
/// roughly every box has a neighbour.
pub fn scattered_boxes(n: usize) -> Vec<(ShapeId, Rect)> {
    let mut rng = Lcg::new(0x5eed);
    let extent = (n as f32).sqrt() * 4.0;
    (0..n)
        .map(|id| {
            let center = Vec2::new(rng.next_f32() * extent, rng.next_f32() * extent);
            let size = Vec2::new(1.0 + rng.next_f32() * 3.0, 1.0 + rng.next_f32() * 3.0);
            (id, Rect::from_center_size(center, size))
        })
        .collect()
}

/// Same layout as [`scattered_boxes`] but every box lies on one spot.
pub fn stacked_boxes(n: usize) -> Vec<(ShapeId, Rect)> {
    (0..n)
        .map(|id| (id, Rect::from_center_size(Vec2::ZERO, Vec2::ONE)))
        .collect()
}

pub fn box_shape(position: Vec2, size: Vec2, rotation: f32) -> Shape {
    let mut polygon = Polygon::rectangle(size.x, size.y);
    polygon.update(position, Vec2::ONE, rotation);
    Shape::Polygon(polygon)
}

pub fn circle_shape(position: Vec2, radius: f32) -> Shape {
    let mut circle = Circle::new(radius);
    circle.update(position, Vec2::ONE);
    Shape::Circle(circle)
}

/// A static floor with `n` dynamic balls and boxes dropped above it.
pub fn setup_scene(
    n: usize,
    method: CollisionMethodKind,
    broad_phase: BroadPhaseMethod,
) -> anyhow::Result<(hecs::World, PhysicsWorld)> {
    let physics = PhysicsWorld::new(PhysicsConfig {
        collision_method: method,
        broad_phase,
        physics_framerate: 60,
        ..PhysicsConfig::default()
    })?;
    let mut world = hecs::World::new();

    let columns = (n as f32).sqrt().ceil().max(1.0) as usize;
    let width = columns as f32 * 3.0;
    world.spawn((
        Transform::from_position(Vec2::new(width * 0.5, -1.0)),
        GlobalTransform::default(),
        RigidBody::new_static(),
        BoxCollider::new(width + 10.0, 2.0),
    ));

    for i in 0..n {
        let position = Vec2::new((i % columns) as f32 * 3.0, 2.0 + (i / columns) as f32 * 3.0);
        let transform = Transform::from_position(position);
        let body = RigidBody::new_dynamic().with_gravity(9.81);
        if i % 2 == 0 {
            world.spawn((transform, GlobalTransform::default(), body, BallCollider::new(1.2)));
        } else {
            world.spawn((transform, GlobalTransform::default(), body, BoxCollider::new(2.4, 2.4)));
        }
    }

    Ok((world, physics))
}

/// A `columns` x `rows` tilemap with a solid floor and scattered platforms,
/// plus `balls` dynamic balls above it.
pub fn setup_tilemap_scene(
    columns: usize,
    rows: usize,
    balls: usize,
    composite: bool,
) -> anyhow::Result<(hecs::World, PhysicsWorld)> {
    let physics = PhysicsWorld::new(PhysicsConfig {
        physics_framerate: 60,
        ..PhysicsConfig::default()
    })?;
    let mut world = hecs::World::new();

    let mut rng = Lcg::new(42);
    let tiles = (0..columns * rows)
        .map(|i| {
            let row = i / columns;
            if row == rows - 1 || (row > 2 && rng.next_f32() < 0.2) {
                1
            } else {
                0
            }
        })
        .collect();
    world.spawn((
        Transform::default(),
        GlobalTransform::default(),
        RigidBody::new_static(),
        Tilemap::new(columns, 16.0, 16.0, tiles),
        TilemapCollider::new(composite),
    ));

    for i in 0..balls {
        let x = 8.0 + (i % columns) as f32 * 16.0;
        world.spawn((
            Transform::from_position(Vec2::new(x, 32.0 + (i / columns) as f32 * 24.0)),
            GlobalTransform::default(),
            RigidBody::new_dynamic().with_gravity(200.0),
            BallCollider::new(6.0),
        ));
    }

    Ok((world, physics))
}
