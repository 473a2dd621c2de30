//! Resolve-collision orchestrator.
//!
//! Runs once per physics tick: gathers the shapes of every enabled collider,
//! rebuilds the broad phase, tests candidate pairs with the configured
//! collision method and persists the results in both directions.

use std::collections::HashSet;

use tracing::trace;

use crate::ecs::components::collider::{
    BallCollider, BoxCollider, Collider, EdgeCollider, PolygonCollider, TilemapCollider,
};
use crate::error::PhysicsError;
use crate::math::Rect;

use super::broadphase::{broad_phase_for, BroadPhase};
use super::contact::Collision;
use super::method::{collision_method_for, CollisionMethod};
use super::repository::{ColliderHandle, ColliderInfo, CollisionRepository};
use super::shape::{Shape, ShapeId};
use super::PhysicsConfig;

/// Pairs of layers allowed to collide. Order within a row is irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionMatrix {
    rows: Vec<(String, String)>,
}

impl CollisionMatrix {
    pub fn new<S: Into<String>>(rows: impl IntoIterator<Item = (S, S)>) -> Self {
        Self {
            rows: rows.into_iter().map(|(a, b)| (a.into(), b.into())).collect(),
        }
    }

    pub fn allows(&self, a: &str, b: &str) -> bool {
        self.rows
            .iter()
            .any(|(x, y)| (x == a && y == b) || (x == b && y == a))
    }
}

/// A shape taking part in one resolve pass. Its position in the slice given
/// to [`CollisionResolver::resolve_shapes`] is its [`ShapeId`].
#[derive(Debug, Clone, Copy)]
pub struct ShapeEntry<'a> {
    pub entity: hecs::Entity,
    /// Index of the owning collider in the repository's arena.
    pub collider_index: usize,
    pub shape: &'a Shape,
}

/// Drives broad phase, narrow phase and persistence.
pub struct CollisionResolver {
    method: Box<dyn CollisionMethod>,
    broad_phase: Box<dyn BroadPhase>,
    matrix: Option<CollisionMatrix>,
    resolved: HashSet<(ShapeId, ShapeId)>,
    boxes: Vec<(ShapeId, Rect)>,
}

impl CollisionResolver {
    pub fn new(config: &PhysicsConfig) -> Self {
        Self::with_strategies(
            collision_method_for(config.collision_method),
            broad_phase_for(config.broad_phase),
            config.collision_matrix.as_ref().map(|rows| CollisionMatrix::new(rows.clone())),
        )
    }

    pub fn with_strategies(
        method: Box<dyn CollisionMethod>,
        broad_phase: Box<dyn BroadPhase>,
        matrix: Option<CollisionMatrix>,
    ) -> Self {
        Self {
            method,
            broad_phase,
            matrix,
            resolved: HashSet::new(),
            boxes: Vec::new(),
        }
    }

    /// Rebuild `repository` from the current collider shapes in `world`.
    ///
    /// Shapes must already be up to date for this tick; see
    /// [`update_collider_shapes`](super::collider::update_collider_shapes).
    pub fn resolve(
        &mut self,
        world: &hecs::World,
        repository: &mut CollisionRepository,
    ) -> Result<(), PhysicsError> {
        repository.clear();

        let mut balls = world.query::<&BallCollider>();
        let mut boxes = world.query::<&BoxCollider>();
        let mut polygons = world.query::<&PolygonCollider>();
        let mut edges = world.query::<&EdgeCollider>();
        let mut tilemaps = world.query::<&TilemapCollider>();

        let mut entries = Vec::new();
        gather(balls.iter(), repository, &mut entries);
        gather(boxes.iter(), repository, &mut entries);
        gather(polygons.iter(), repository, &mut entries);
        gather(edges.iter(), repository, &mut entries);
        gather(tilemaps.iter(), repository, &mut entries);

        self.resolve_shapes(&entries, repository)
    }

    /// Resolve an explicit shape list against colliders already registered in
    /// `repository`. Previous collisions are dropped.
    pub fn resolve_shapes(
        &mut self,
        entries: &[ShapeEntry<'_>],
        repository: &mut CollisionRepository,
    ) -> Result<(), PhysicsError> {
        repository.clear_collisions();
        self.resolved.clear();

        self.boxes.clear();
        for (id, entry) in entries.iter().enumerate() {
            if repository.collider(entry.collider_index).is_none() {
                return Err(PhysicsError::UnregisteredCollider(entry.collider_index));
            }
            self.boxes.push((id, entry.shape.bounding_box()));
        }
        self.broad_phase.update(&self.boxes);

        let mut found = Vec::new();
        for (local_id, local) in entries.iter().enumerate() {
            if !local.shape.update_collisions() {
                continue;
            }
            let local_info = collider_info(repository, local.collider_index)?;

            for remote_id in self.broad_phase.retrieve(&self.boxes[local_id].1)? {
                let remote = &entries[remote_id];
                if remote_id == local_id
                    || remote.entity == local.entity
                    || self.resolved.contains(&(local_id, remote_id))
                {
                    continue;
                }

                let remote_info = collider_info(repository, remote.collider_index)?;
                if !self.layers_collide(local_info, remote_info) {
                    continue;
                }

                if let Some(resolution) = self.method.resolve(local.shape, remote.shape) {
                    self.resolved.insert((local_id, remote_id));
                    self.resolved.insert((remote_id, local_id));
                    found.push(Collision {
                        local_collider: local.collider_index,
                        local_entity: local.entity,
                        remote_collider: remote.collider_index,
                        remote_entity: remote.entity,
                        resolution,
                    });
                }
            }
        }

        trace!(
            shapes = entries.len(),
            pairs = found.len(),
            "resolved collisions"
        );
        for collision in found {
            repository.persist(collision);
            repository.persist(collision.mirrored());
        }
        Ok(())
    }

    fn layers_collide(&self, a: &ColliderInfo, b: &ColliderInfo) -> bool {
        if let Some(matrix) = &self.matrix {
            if !matrix.allows(&a.layer, &b.layer) {
                return false;
            }
        }
        !a.ignore_layers.contains(&b.layer) && !b.ignore_layers.contains(&a.layer)
    }
}

fn collider_info(
    repository: &CollisionRepository,
    index: usize,
) -> Result<&ColliderInfo, PhysicsError> {
    repository
        .collider(index)
        .ok_or(PhysicsError::UnregisteredCollider(index))
}

/// Register every enabled collider from a query and append its shapes.
fn gather<'a, C: Collider>(
    colliders: impl Iterator<Item = (hecs::Entity, &'a C)>,
    repository: &mut CollisionRepository,
    entries: &mut Vec<ShapeEntry<'a>>,
) {
    for (entity, collider) in colliders {
        let settings = collider.settings();
        if !settings.enabled || collider.shapes().is_empty() {
            continue;
        }

        let collider_index = repository.register_collider(ColliderInfo {
            handle: ColliderHandle::new(entity, collider.kind()),
            layer: settings.layer.clone(),
            ignore_layers: settings.ignore_layers.clone(),
            physics: settings.physics,
        });
        entries.extend(collider.shapes().iter().map(|shape| ShapeEntry {
            entity,
            collider_index,
            shape,
        }));
    }
}
