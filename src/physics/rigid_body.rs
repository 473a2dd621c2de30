//! Rigid body integration and collision correction.

use std::collections::HashMap;

use glam::Vec2;
use tracing::warn;

use crate::ecs::components::physics::{RigidBody, RigidBodyType};
use crate::ecs::components::transform::{GlobalTransform, Parent, Transform};

use super::repository::CollisionRepository;

/// Advance bodies by `dt` seconds.
///
/// Dynamic bodies accelerate by `acceleration` plus downward `gravity` and
/// move with `x += v*dt + a*dt²/2`. Kinematic bodies move with their velocity
/// only. Static bodies are untouched.
pub fn integrate_velocities(world: &mut hecs::World, dt: f32) {
    for (_, (rb, transform)) in world.query_mut::<(&mut RigidBody, &mut Transform)>() {
        match rb.body_type {
            RigidBodyType::Dynamic => {
                let acceleration = rb.acceleration + Vec2::new(0.0, -rb.gravity);
                transform.position += rb.velocity * dt + 0.5 * acceleration * dt * dt;
                rb.velocity += acceleration * dt;
            }
            RigidBodyType::Kinematic => {
                transform.position += rb.velocity * dt;
            }
            RigidBodyType::Static => {}
        }
    }
}

/// Push dynamic bodies out of whatever they collided with this tick.
///
/// Only collisions between two physics colliders whose entities both carry a
/// [`RigidBody`] count. Against another dynamic body the correction is
/// halved. Each body receives only its single largest correction, then loses
/// any velocity component pointing against it.
///
/// Corrections are resolved in world space. Bodies with a [`Parent`] get
/// theirs mapped into the parent's frame before touching the local position.
pub fn correct_positions(world: &mut hecs::World, repository: &CollisionRepository) {
    let mut corrections: HashMap<hecs::Entity, Vec2> = HashMap::new();

    for collision in repository.find_all() {
        let physics = |index: usize| repository.collider(index).is_some_and(|c| c.physics);
        if !physics(collision.local_collider) || !physics(collision.remote_collider) {
            continue;
        }

        let Ok(local) = world.get::<&RigidBody>(collision.local_entity) else {
            continue;
        };
        if !local.is_dynamic() {
            continue;
        }
        let Ok(remote) = world.get::<&RigidBody>(collision.remote_entity) else {
            continue;
        };

        let mut correction = collision.resolution.correction();
        if remote.is_dynamic() {
            correction *= 0.5;
        }

        let largest = corrections.entry(collision.local_entity).or_insert(Vec2::ZERO);
        if correction.length_squared() > largest.length_squared() {
            *largest = correction;
        }
    }

    for (entity, correction) in corrections {
        let Some(correction) = local_correction(world, entity, correction) else {
            warn!(?entity, "parent has a zero scale axis, skipping correction");
            continue;
        };
        let Ok((rb, transform)) = world.query_one_mut::<(&mut RigidBody, &mut Transform)>(entity)
        else {
            continue;
        };

        transform.position += correction;
        if rb.velocity.x * correction.x < 0.0 {
            rb.velocity.x = 0.0;
        }
        if rb.velocity.y * correction.y < 0.0 {
            rb.velocity.y = 0.0;
        }
    }
}

fn local_correction(world: &hecs::World, entity: hecs::Entity, correction: Vec2) -> Option<Vec2> {
    let Ok(parent) = world.get::<&Parent>(entity) else {
        return Some(correction);
    };
    match world.get::<&GlobalTransform>(parent.0) {
        Ok(global) => global.inverse_transform_vector(correction),
        Err(_) => Some(correction),
    }
}
