//! 2D collision pipeline with fixed-step rigid body correction.
//!
//! # Architecture
//!
//! Every physics tick runs, in order:
//!
//! 1. Propagate transforms
//! 2. Rebuild collider shapes from the resolved transforms
//! 3. Resolve collisions (broad phase, narrow phase, repository)
//! 4. Integrate rigid bodies (gravity, acceleration, velocity)
//! 5. Correct positions of dynamic bodies
//! 6. Propagate transforms again
//!
//! Collisions are found on the positions the tick started from. A body
//! resting on a surface is lifted back by the overlap it started with and
//! its velocity into the surface is cancelled after gravity is applied.
//!
//! The repository is readable through [`PhysicsWorld::collisions`] until the
//! next tick clears it.

pub mod broadphase;
pub mod collider;
pub mod contact;
pub mod method;
pub mod narrowphase;
pub mod repository;
pub mod resolve;
pub mod rigid_body;
pub mod shape;
pub mod tilemap;

use tracing::{debug, trace};

use crate::ecs::systems::transform_system;
use crate::error::{ConfigError, PhysicsError};

use self::broadphase::BroadPhaseMethod;
use self::method::CollisionMethodKind;
use self::repository::CollisionRepository;
use self::resolve::CollisionResolver;

/// Physics tick rates the engine accepts, in Hz.
pub const PHYSICS_FRAMERATES: [u32; 4] = [60, 120, 180, 240];

/// Configuration for the physics simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsConfig {
    /// Narrow-phase method. Default: SAT.
    pub collision_method: CollisionMethodKind,
    /// Broad-phase structure. Default: quad-tree.
    pub broad_phase: BroadPhaseMethod,
    /// Layer pairs allowed to collide. `None` lets every layer collide.
    pub collision_matrix: Option<Vec<(String, String)>>,
    /// Physics ticks per second. One of [`PHYSICS_FRAMERATES`]. Default: 180.
    pub physics_framerate: u32,
    /// Initial global time scale. Default: 1.0.
    pub time_scale: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            collision_method: CollisionMethodKind::default(),
            broad_phase: BroadPhaseMethod::default(),
            collision_matrix: None,
            physics_framerate: 180,
            time_scale: 1.0,
        }
    }
}

impl PhysicsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !PHYSICS_FRAMERATES.contains(&self.physics_framerate) {
            return Err(ConfigError::InvalidPhysicsFramerate(self.physics_framerate));
        }
        Ok(())
    }

    /// Seconds per physics tick.
    pub fn timestep(&self) -> f64 {
        1.0 / f64::from(self.physics_framerate)
    }
}

/// The main physics world. Owns the collision strategies and the repository.
pub struct PhysicsWorld {
    config: PhysicsConfig,
    resolver: CollisionResolver,
    repository: CollisionRepository,
    time_scale: f32,
}

impl PhysicsWorld {
    /// Validate `config` and assemble the configured strategies.
    pub fn new(config: PhysicsConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!(
            method = ?config.collision_method,
            broad_phase = ?config.broad_phase,
            framerate = config.physics_framerate,
            "physics world configured"
        );

        Ok(Self {
            resolver: CollisionResolver::new(&config),
            repository: CollisionRepository::new(),
            time_scale: config.time_scale,
            config,
        })
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Seconds per physics tick, before time scaling.
    pub fn timestep(&self) -> f64 {
        self.config.timestep()
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// A scale of zero or less pauses physics.
    pub fn set_time_scale(&mut self, time_scale: f32) {
        self.time_scale = time_scale;
    }

    /// Collisions resolved by the last tick.
    pub fn collisions(&self) -> &CollisionRepository {
        &self.repository
    }

    /// Run one physics tick. Returns `false` when the tick was skipped
    /// because physics is paused.
    pub fn tick(&mut self, world: &mut hecs::World) -> Result<bool, PhysicsError> {
        if self.time_scale <= 0.0 {
            trace!(time_scale = self.time_scale, "physics paused");
            return Ok(false);
        }
        let dt = self.timestep() as f32 * self.time_scale;

        transform_system(world);
        collider::update_collider_shapes(world);
        self.resolver.resolve(world, &mut self.repository)?;
        rigid_body::integrate_velocities(world, dt);
        rigid_body::correct_positions(world, &self.repository);
        transform_system(world);

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{
        BallCollider, BoxCollider, ColliderSettings, GlobalTransform, RigidBody, Tilemap,
        TilemapCollider, Transform,
    };
    use glam::Vec2;

    fn spawn_ground(world: &mut hecs::World) -> hecs::Entity {
        world.spawn((
            Transform::from_position(Vec2::new(0.0, 20.0)),
            GlobalTransform::default(),
            RigidBody::new_static(),
            BoxCollider::new(40.0, 40.0),
        ))
    }

    fn all_strategies() -> Vec<(CollisionMethodKind, BroadPhaseMethod)> {
        let mut strategies = Vec::new();
        for method in [CollisionMethodKind::Sat, CollisionMethodKind::Aabb] {
            for broad_phase in [BroadPhaseMethod::QuadTree, BroadPhaseMethod::SpatialGrid] {
                strategies.push((method, broad_phase));
            }
        }
        strategies
    }

    #[test]
    fn test_physics_config_default() {
        let config = PhysicsConfig::default();
        assert_eq!(config.collision_method, CollisionMethodKind::Sat);
        assert_eq!(config.broad_phase, BroadPhaseMethod::QuadTree);
        assert!(config.collision_matrix.is_none());
        assert!(config.validate().is_ok());
        assert!((config.timestep() - 1.0 / 180.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_framerate_is_rejected() {
        for framerate in [0, 30, 61, 144, 300] {
            let config = PhysicsConfig {
                physics_framerate: framerate,
                ..PhysicsConfig::default()
            };
            assert_eq!(
                PhysicsWorld::new(config).err(),
                Some(ConfigError::InvalidPhysicsFramerate(framerate))
            );
        }
        for framerate in PHYSICS_FRAMERATES {
            let config = PhysicsConfig {
                physics_framerate: framerate,
                ..PhysicsConfig::default()
            };
            assert!(PhysicsWorld::new(config).is_ok());
        }
    }

    #[test]
    fn test_physics_world_free_fall() {
        let mut world = hecs::World::new();
        let mut physics = PhysicsWorld::new(PhysicsConfig {
            physics_framerate: 60,
            ..PhysicsConfig::default()
        })
        .unwrap();

        let entity = world.spawn((
            Transform::from_position(Vec2::new(0.0, 10.0)),
            GlobalTransform::default(),
            RigidBody::new_dynamic().with_gravity(10.0),
            BallCollider::new(0.5),
        ));

        for _ in 0..60 {
            physics.tick(&mut world).unwrap();
        }

        let global = world.get::<&GlobalTransform>(entity).unwrap();
        assert!((global.position.y - 5.0).abs() < 1e-3, "y = {}", global.position.y);
        assert!(physics.collisions().is_empty());
    }

    #[test]
    fn test_paused_world_does_not_move() {
        let mut world = hecs::World::new();
        let mut physics = PhysicsWorld::new(PhysicsConfig::default()).unwrap();
        let entity = world.spawn((
            Transform::from_position(Vec2::new(0.0, 10.0)),
            GlobalTransform::default(),
            RigidBody::new_dynamic().with_gravity(10.0),
        ));

        physics.set_time_scale(0.0);
        for _ in 0..10 {
            assert!(!physics.tick(&mut world).unwrap());
        }
        assert_eq!(world.get::<&Transform>(entity).unwrap().position.y, 10.0);

        physics.set_time_scale(1.0);
        assert!(physics.tick(&mut world).unwrap());
        assert!(world.get::<&Transform>(entity).unwrap().position.y < 10.0);
    }

    #[test]
    fn test_box_lands_on_ground() {
        let mut world = hecs::World::new();
        let mut physics = PhysicsWorld::new(PhysicsConfig {
            physics_framerate: 120,
            ..PhysicsConfig::default()
        })
        .unwrap();

        spawn_ground(&mut world);
        let crate_box = world.spawn((
            Transform::from_position(Vec2::new(5.0, 50.0)),
            GlobalTransform::default(),
            RigidBody::new_dynamic().with_gravity(20.0),
            BoxCollider::new(10.0, 10.0),
        ));

        for _ in 0..240 {
            physics.tick(&mut world).unwrap();
        }

        let transform = world.get::<&Transform>(crate_box).unwrap();
        let rb = world.get::<&RigidBody>(crate_box).unwrap();
        assert!((transform.position.y - 45.0).abs() < 0.1, "y = {}", transform.position.y);
        assert_eq!(rb.velocity.y, 0.0);
        assert_eq!(physics.collisions().len(), 2);
    }

    #[test]
    fn test_sensor_reports_without_correction() {
        let mut world = hecs::World::new();
        let mut physics = PhysicsWorld::new(PhysicsConfig::default()).unwrap();

        spawn_ground(&mut world);
        let ghost = world.spawn((
            Transform::from_position(Vec2::new(0.0, 30.0)),
            GlobalTransform::default(),
            RigidBody::new_dynamic(),
            BallCollider::new(5.0).with_settings(ColliderSettings::default().sensor()),
        ));

        physics.tick(&mut world).unwrap();

        assert_eq!(physics.collisions().len(), 2);
        assert_eq!(
            world.get::<&Transform>(ghost).unwrap().position,
            Vec2::new(0.0, 30.0)
        );
    }

    #[test]
    fn test_ball_comes_to_rest_on_box() {
        for (method, broad_phase) in all_strategies() {
            let mut world = hecs::World::new();
            let mut physics = PhysicsWorld::new(PhysicsConfig {
                collision_method: method,
                broad_phase,
                physics_framerate: 60,
                ..PhysicsConfig::default()
            })
            .unwrap();

            spawn_ground(&mut world);
            let ball = world.spawn((
                Transform::from_position(Vec2::new(0.0, 70.0)),
                GlobalTransform::default(),
                RigidBody::new_dynamic().with_gravity(10.0),
                BallCollider::new(20.0),
            ));

            for _ in 0..300 {
                physics.tick(&mut world).unwrap();
            }

            let transform = world.get::<&Transform>(ball).unwrap();
            let rb = world.get::<&RigidBody>(ball).unwrap();
            assert!(
                (transform.position.y - 60.0).abs() < 0.01,
                "{method:?}/{broad_phase:?}: y = {}",
                transform.position.y
            );
            assert!(transform.position.x.abs() < 1e-3);
            assert_eq!(rb.velocity.y, 0.0);
        }
    }

    #[test]
    fn test_ball_starting_inside_box_rests_on_top() {
        for (method, broad_phase) in all_strategies() {
            let mut world = hecs::World::new();
            let mut physics = PhysicsWorld::new(PhysicsConfig {
                collision_method: method,
                broad_phase,
                physics_framerate: 60,
                ..PhysicsConfig::default()
            })
            .unwrap();

            // one unit per tick squared at 60 Hz
            spawn_ground(&mut world);
            let ball = world.spawn((
                Transform::from_position(Vec2::new(0.0, 20.0)),
                GlobalTransform::default(),
                RigidBody::new_dynamic().with_gravity(3600.0),
                BallCollider::new(20.0),
            ));

            physics.tick(&mut world).unwrap();
            let y = world.get::<&Transform>(ball).unwrap().position.y;
            assert!(y > 40.0, "{method:?}/{broad_phase:?}: ejected to y = {y}");

            for _ in 0..300 {
                physics.tick(&mut world).unwrap();
                assert_eq!(physics.collisions().len(), 2);
            }

            let transform = world.get::<&Transform>(ball).unwrap();
            let rb = world.get::<&RigidBody>(ball).unwrap();
            assert!(
                (transform.position.y - 60.0).abs() <= 0.5 + 1e-3,
                "{method:?}/{broad_phase:?}: y = {}",
                transform.position.y
            );
            assert!(transform.position.x.abs() < 1e-3);
            assert_eq!(rb.velocity.y, 0.0);
        }
    }

    #[test]
    fn test_ball_lands_on_tilemap() {
        for composite in [true, false] {
            for (method, broad_phase) in all_strategies() {
                let mut world = hecs::World::new();
                let mut physics = PhysicsWorld::new(PhysicsConfig {
                    collision_method: method,
                    broad_phase,
                    physics_framerate: 60,
                    ..PhysicsConfig::default()
                })
                .unwrap();

                // one solid row whose top face lies on y = 0
                world.spawn((
                    Transform::default(),
                    GlobalTransform::default(),
                    RigidBody::new_static(),
                    Tilemap::new(10, 16.0, 16.0, vec![1; 10]),
                    TilemapCollider::new(composite),
                ));
                let ball = world.spawn((
                    Transform::from_position(Vec2::new(85.0, 30.0)),
                    GlobalTransform::default(),
                    RigidBody::new_dynamic().with_gravity(100.0),
                    BallCollider::new(8.0),
                ));

                for _ in 0..120 {
                    physics.tick(&mut world).unwrap();
                }

                // settles within one tick of gravity drop (0.5 * g * dt^2)
                let transform = world.get::<&Transform>(ball).unwrap();
                let rb = world.get::<&RigidBody>(ball).unwrap();
                assert!(
                    (transform.position.y - 8.0).abs() < 0.02,
                    "composite = {composite}, {method:?}/{broad_phase:?}: y = {}",
                    transform.position.y
                );
                assert!((transform.position.x - 85.0).abs() < 1e-3);
                assert_eq!(rb.velocity.y, 0.0);
            }
        }
    }

    #[test]
    fn test_collision_records_are_symmetric_and_repeatable() {
        let mut world = hecs::World::new();
        let mut physics = PhysicsWorld::new(PhysicsConfig::default()).unwrap();

        for i in 0..4 {
            world.spawn((
                Transform::from_position(Vec2::new(i as f32 * 1.5, 0.0)),
                GlobalTransform::default(),
                BallCollider::new(1.0),
            ));
        }

        physics.tick(&mut world).unwrap();
        let first: Vec<_> = physics.collisions().find_all().to_vec();
        // neighbours overlap, everything further apart does not
        assert_eq!(first.len(), 6);
        for collision in &first {
            let mirror = collision.mirrored();
            assert!(first.contains(&mirror));
        }

        physics.tick(&mut world).unwrap();
        let second = physics.collisions().find_all();
        assert_eq!(second.len(), first.len());
        for collision in second {
            assert!(first.iter().any(|c| {
                c.local_entity == collision.local_entity
                    && c.remote_entity == collision.remote_entity
                    && (c.resolution.penetration - collision.resolution.penetration).abs() < 1e-5
                    && (c.resolution.direction - collision.resolution.direction).length() < 1e-5
            }));
        }
    }
}
