//! ECS components (transform, rigid body, colliders, tilemap).

#[cfg(feature = "physics")]
pub mod collider;
pub mod physics;
pub mod tilemap;
pub mod transform;

#[cfg(feature = "physics")]
pub use collider::*;
pub use physics::*;
pub use tilemap::*;
pub use transform::*;
