//! Game engine module with App trait and game loop.
//!
//! Three clocks drive an [`Engine`]:
//!
//! - render: once per [`Engine::advance`] call, optionally frame capped by
//!   [`run_app`]
//! - game logic: fixed timestep with a substep cap
//! - physics: fixed timestep at the configured physics framerate; every due
//!   tick runs, a slow frame is caught up in a burst
//!
//! All three run on the calling thread, physics first.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::ecs::systems::transform_system;
use crate::error::ConfigError;
use crate::physics::repository::CollisionRepository;
use crate::physics::{PhysicsConfig, PhysicsWorld};

/// Game loop configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Fixed timestep for game logic (seconds). Default: 1/60.
    pub game_timestep: f64,
    /// Maximum game logic substeps per frame. Default: 4.
    pub max_substeps: u32,
    /// Render frame cap used by [`run_app`]. `None` renders as fast as
    /// possible.
    pub max_frame_rate: Option<u32>,
    pub physics: PhysicsConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            game_timestep: 1.0 / 60.0,
            max_substeps: 4,
            max_frame_rate: None,
            physics: PhysicsConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.game_timestep.is_finite() || self.game_timestep <= 0.0 {
            return Err(ConfigError::InvalidTimestep(self.game_timestep));
        }
        self.physics.validate()
    }
}

/// Fixed-interval accumulator clock.
#[derive(Debug, Clone)]
pub struct FixedClock {
    interval: f64,
    accumulator: f64,
    max_ticks: Option<u32>,
}

impl FixedClock {
    pub fn new(interval: f64) -> Result<Self, ConfigError> {
        if !interval.is_finite() || interval <= 0.0 {
            return Err(ConfigError::InvalidTimestep(interval));
        }
        Ok(Self {
            interval,
            accumulator: 0.0,
            max_ticks: None,
        })
    }

    /// Limit the ticks returned per [`advance`](Self::advance). Time beyond
    /// the limit is dropped.
    pub fn with_max_ticks(mut self, max_ticks: u32) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Add `delta_time` seconds and return how many ticks are due.
    pub fn advance(&mut self, delta_time: f64) -> u32 {
        self.accumulator += delta_time;

        let mut ticks = 0u32;
        while self.accumulator >= self.interval && self.max_ticks.map_or(true, |max| ticks < max) {
            self.accumulator -= self.interval;
            ticks += 1;
        }

        // Clamp accumulator to avoid spiral of death
        if let Some(max) = self.max_ticks {
            if self.accumulator > self.interval * f64::from(max) {
                self.accumulator = 0.0;
            }
        }

        ticks
    }
}

/// Timing passed to App callbacks.
#[derive(Debug, Clone, Copy)]
pub struct SystemContext {
    /// Time since last frame (seconds).
    pub delta_time: f64,
    /// Fixed game logic interval (seconds).
    pub fixed_delta_time: f64,
    /// Time since the engine started (seconds).
    pub elapsed_time: f64,
}

/// Trait for ECS-based game applications.
///
/// Implement this trait and pass it to [`run_app`] to run a game
/// with automatic physics scheduling.
pub trait App {
    /// Called once before the first frame. Set up the ECS world.
    fn init(&mut self, world: &mut hecs::World) -> anyhow::Result<()>;

    /// Called at the fixed game logic rate.
    fn update(&mut self, world: &mut hecs::World, ctx: &SystemContext);

    /// Called after every physics tick with its collisions. Optional.
    fn physics_update(
        &mut self,
        _world: &mut hecs::World,
        _collisions: &CollisionRepository,
        _dt: f32,
    ) {
    }

    /// Called once per frame after physics and game logic. Optional.
    fn render(&mut self, _world: &hecs::World, _ctx: &SystemContext) {}

    /// The loop in [`run_app`] stops once this returns false.
    fn running(&self) -> bool {
        true
    }
}

/// ECS world, physics world and the clocks driving them.
pub struct Engine {
    world: hecs::World,
    physics: PhysicsWorld,
    game_clock: FixedClock,
    physics_clock: FixedClock,
    elapsed: f64,
    initialized: bool,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let game_clock = FixedClock::new(config.game_timestep)?.with_max_ticks(config.max_substeps);
        let physics_clock = FixedClock::new(config.physics.timestep())?;

        Ok(Self {
            world: hecs::World::new(),
            physics: PhysicsWorld::new(config.physics)?,
            game_clock,
            physics_clock,
            elapsed: 0.0,
            initialized: false,
        })
    }

    pub fn world(&self) -> &hecs::World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut hecs::World {
        &mut self.world
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.physics
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Advance every clock by `delta_time` seconds and run whatever is due:
    /// physics ticks, then game logic ticks, then one render.
    pub fn advance<A: App>(&mut self, app: &mut A, delta_time: f64) -> anyhow::Result<()> {
        if !self.initialized {
            app.init(&mut self.world)?;
            transform_system(&mut self.world);
            self.initialized = true;
            debug!(entities = self.world.len(), "app initialized");
        }
        self.elapsed += delta_time;

        let physics_ticks = self.physics_clock.advance(delta_time);
        if physics_ticks > 1 {
            debug!(ticks = physics_ticks, "catching up physics");
        }
        let physics_dt = self.physics.timestep() as f32 * self.physics.time_scale();
        for _ in 0..physics_ticks {
            // paused: nothing was resolved this tick
            if !self.physics.tick(&mut self.world)? {
                continue;
            }
            app.physics_update(&mut self.world, self.physics.collisions(), physics_dt);
        }

        let ctx = SystemContext {
            delta_time,
            fixed_delta_time: self.game_clock.interval(),
            elapsed_time: self.elapsed,
        };
        for _ in 0..self.game_clock.advance(delta_time) {
            app.update(&mut self.world, &ctx);
        }
        transform_system(&mut self.world);

        app.render(&self.world, &ctx);
        Ok(())
    }
}

/// Run a game application until [`App::running`] returns false.
///
/// Frame time is measured with a wall clock and fed to [`Engine::advance`].
pub fn run_app<A: App>(config: EngineConfig, mut app: A) -> anyhow::Result<()> {
    let frame_time = config
        .max_frame_rate
        .filter(|fps| *fps > 0)
        .map(|fps| Duration::from_secs_f64(1.0 / f64::from(fps)));
    let mut engine = Engine::new(config)?;

    let mut last = Instant::now();
    while app.running() {
        let now = Instant::now();
        let delta_time = now.duration_since(last).as_secs_f64();
        last = now;

        engine.advance(&mut app, delta_time)?;

        if let Some(frame_time) = frame_time {
            let spent = now.elapsed();
            if spent < frame_time {
                std::thread::sleep(frame_time - spent);
            } else if spent > frame_time * 4 {
                warn!(?spent, "frame took longer than four frame budgets");
            }
        }
    }

    Ok(())
}
