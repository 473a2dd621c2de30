//! Collider shape update systems.

use crate::ecs::components::collider::{
    BallCollider, BoxCollider, Collider, EdgeCollider, PolygonCollider, TilemapCollider,
};
use crate::ecs::components::tilemap::Tilemap;
use crate::ecs::components::transform::GlobalTransform;

/// Rebuild the shapes of every enabled collider from its entity's
/// [`GlobalTransform`]. Tilemap colliders generate their shapes first if
/// needed.
pub fn update_collider_shapes(world: &mut hecs::World) {
    for (_, (collider, tilemap)) in world.query_mut::<(&mut TilemapCollider, &Tilemap)>() {
        if collider.settings.enabled {
            collider.generate(tilemap);
        }
    }

    update_shapes_of::<BallCollider>(world);
    update_shapes_of::<BoxCollider>(world);
    update_shapes_of::<PolygonCollider>(world);
    update_shapes_of::<EdgeCollider>(world);
    update_shapes_of::<TilemapCollider>(world);
}

fn update_shapes_of<C: Collider>(world: &mut hecs::World) {
    for (_, (collider, transform)) in world.query_mut::<(&mut C, &GlobalTransform)>() {
        if collider.settings().enabled {
            collider.update_shapes(transform);
        }
    }
}
