//! Transform components for ECS entities.

use glam::Vec2;

use crate::math::rotate_polar;

/// Parent-relative transform. Rotation is in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
}

impl Transform {
    /// Create an identity transform.
    pub fn identity() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }

    /// Create a transform from a position.
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Resolved world-space transform. Updated by
/// [`transform_system`](crate::ecs::systems::transform_system).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalTransform {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
}

impl GlobalTransform {
    /// Compose a child's local transform onto this one.
    ///
    /// The child position is scaled by the parent scale and rotated in polar
    /// form; rotations add and scales multiply.
    pub fn mul_transform(&self, local: &Transform) -> Self {
        Self {
            position: self.position + rotate_polar(local.position * self.scale, self.rotation),
            rotation: self.rotation + local.rotation,
            scale: self.scale * local.scale,
        }
    }

    /// Map a world-space displacement into the frame of this transform's
    /// children. `None` when either scale axis is zero.
    pub fn inverse_transform_vector(&self, v: Vec2) -> Option<Vec2> {
        if self.scale.x == 0.0 || self.scale.y == 0.0 {
            return None;
        }
        Some(rotate_polar(v, -self.rotation) / self.scale)
    }
}

impl Default for GlobalTransform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }
}

impl From<Transform> for GlobalTransform {
    fn from(transform: Transform) -> Self {
        Self {
            position: transform.position,
            rotation: transform.rotation,
            scale: transform.scale,
        }
    }
}

/// Reference to a parent entity.
pub struct Parent(pub hecs::Entity);

/// List of child entities.
pub struct Children(pub Vec<hecs::Entity>);
