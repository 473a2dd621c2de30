//! Rein 2D Engine
//!
//! A 2D engine built on hecs with a fixed-step collision pipeline.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **math** - Rectangles and rotation helpers
//! 2. **error** - Configuration and pipeline errors
//! 3. **ecs** - hecs ECS integration: transforms, rigid bodies, colliders (feature = "ecs")
//! 4. **physics** - Shapes, broad phase, narrow phase, collision repository and
//!    position correction (feature = "physics")
//! 5. **engine** - Game loop with App trait and independent clocks (feature = "engine")

pub mod error;
pub mod math;

#[cfg(feature = "ecs")]
pub mod ecs;

#[cfg(feature = "engine")]
pub mod engine;

#[cfg(feature = "physics")]
pub mod physics;

pub use error::{ConfigError, PhysicsError};
pub use math::Rect;

#[cfg(feature = "ecs")]
pub use ecs::prelude::*;

#[cfg(feature = "engine")]
pub use engine::{run_app, App, Engine, EngineConfig, FixedClock, SystemContext};

#[cfg(feature = "physics")]
pub use physics::{
    broadphase::BroadPhaseMethod,
    contact::{Collision, Resolution},
    method::CollisionMethodKind,
    repository::{ColliderHandle, ColliderKind, CollisionRepository},
    PhysicsConfig, PhysicsWorld,
};

// Re-export glam and hecs for convenience
pub use glam;
#[cfg(feature = "ecs")]
pub use hecs;
