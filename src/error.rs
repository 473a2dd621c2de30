//! Error types.

use thiserror::Error;

/// Rejected engine or physics configuration. Surfaced at startup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Physics framerate outside the supported set.
    #[error("invalid physics framerate {0} Hz (expected one of 60, 120, 180, 240)")]
    InvalidPhysicsFramerate(u32),
    /// A fixed timestep that is zero, negative or not finite.
    #[error("invalid fixed timestep {0}s")]
    InvalidTimestep(f64),
}

/// Invariant violations raised by the collision pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhysicsError {
    /// `retrieve` was called on a broad phase that never received `update`.
    #[error("broad phase queried before it was built")]
    BroadPhaseNotBuilt,
    /// A shape refers to a collider index missing from the repository.
    #[error("shape refers to unregistered collider {0}")]
    UnregisteredCollider(usize),
}
