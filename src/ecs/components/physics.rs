//! Physics components for ECS entities.

use glam::Vec2;

/// Rigid body type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RigidBodyType {
    /// Affected by gravity, acceleration and collisions.
    Dynamic,
    /// Immovable.
    Static,
    /// Moved by its velocity only, but pushes dynamic bodies.
    Kinematic,
}

/// Rigid body component.
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    pub body_type: RigidBodyType,
    /// Units per second.
    pub velocity: Vec2,
    /// Units per second squared, applied every tick.
    pub acceleration: Vec2,
    /// Downward acceleration magnitude in units per second squared.
    pub gravity: f32,
}

impl RigidBody {
    /// Create a new dynamic rigid body with no gravity.
    pub fn new_dynamic() -> Self {
        Self {
            body_type: RigidBodyType::Dynamic,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            gravity: 0.0,
        }
    }

    /// Create a new static rigid body.
    pub fn new_static() -> Self {
        Self {
            body_type: RigidBodyType::Static,
            ..Self::new_dynamic()
        }
    }

    /// Create a new kinematic rigid body.
    pub fn new_kinematic() -> Self {
        Self {
            body_type: RigidBodyType::Kinematic,
            ..Self::new_dynamic()
        }
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_acceleration(mut self, acceleration: Vec2) -> Self {
        self.acceleration = acceleration;
        self
    }

    #[inline]
    pub fn is_dynamic(&self) -> bool {
        self.body_type == RigidBodyType::Dynamic
    }
}
