//! Contact data structures for collision response.

use glam::Vec2;

/// Outcome of a narrow-phase test between shapes A and B.
///
/// `direction` points from A towards B; A separates from B by moving
/// `-direction * penetration`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Unit separation direction. Zero for coincident circle centres.
    pub direction: Vec2,
    /// Overlap depth, never negative.
    pub penetration: f32,
}

impl Resolution {
    /// The same contact seen from B.
    pub fn inverted(&self) -> Self {
        Self {
            direction: -self.direction,
            penetration: self.penetration,
        }
    }

    /// Displacement that moves A out of B.
    pub fn correction(&self) -> Vec2 {
        -self.direction * self.penetration
    }
}

/// A resolved contact seen from one collider.
///
/// Collider fields index the per-tick collider arena of
/// [`CollisionRepository`](super::repository::CollisionRepository).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    pub local_collider: usize,
    pub local_entity: hecs::Entity,
    pub remote_collider: usize,
    pub remote_entity: hecs::Entity,
    pub resolution: Resolution,
}

impl Collision {
    /// The symmetric record seen from the remote collider.
    pub fn mirrored(&self) -> Self {
        Self {
            local_collider: self.remote_collider,
            local_entity: self.remote_entity,
            remote_collider: self.local_collider,
            remote_entity: self.local_entity,
            resolution: self.resolution.inverted(),
        }
    }
}
