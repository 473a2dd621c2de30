//! Transform hierarchy propagation system.

use crate::ecs::components::transform::{Children, GlobalTransform, Parent, Transform};

/// Propagate transforms through the Parent/Children hierarchy.
///
/// Phase 1: Update root entities (no Parent) - GlobalTransform = Transform
/// Phase 2: Recursively propagate through Children hierarchy.
pub fn transform_system(world: &mut hecs::World) {
    let roots: Vec<(hecs::Entity, GlobalTransform)> = world
        .query_mut::<hecs::Without<(&Transform, &mut GlobalTransform), &Parent>>()
        .into_iter()
        .map(|(entity, (transform, global))| {
            *global = GlobalTransform::from(*transform);
            (entity, *global)
        })
        .collect();

    for (entity, global) in roots {
        if world.satisfies::<&Children>(entity).unwrap_or(false) {
            propagate_children(world, entity, global);
        }
    }
}

/// Recursively propagate GlobalTransform to children.
fn propagate_children(world: &mut hecs::World, parent: hecs::Entity, parent_global: GlobalTransform) {
    // Clone to release the borrow.
    let children = match world.get::<&Children>(parent) {
        Ok(c) => c.0.clone(),
        Err(_) => return,
    };

    for child in children {
        let child_global = match world.get::<&Transform>(child) {
            Ok(transform) => parent_global.mul_transform(&transform),
            Err(_) => parent_global,
        };

        if let Ok(mut global) = world.get::<&mut GlobalTransform>(child) {
            *global = child_global;
        }

        if world.satisfies::<&Children>(child).unwrap_or(false) {
            propagate_children(world, child, child_global);
        }
    }
}
