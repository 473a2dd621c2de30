//! Per-tick collision store.

use std::collections::HashMap;

use super::contact::Collision;

/// Concrete collider component a shape came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColliderKind {
    Ball,
    Box,
    Polygon,
    Edge,
    Tilemap,
}

/// Identifies a collider component. An entity holds at most one collider of
/// each kind, so `(entity, kind)` is unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle {
    pub entity: hecs::Entity,
    pub kind: ColliderKind,
}

impl ColliderHandle {
    pub fn new(entity: hecs::Entity, kind: ColliderKind) -> Self {
        Self { entity, kind }
    }
}

/// Snapshot of a collider's settings taken when it is registered for a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ColliderInfo {
    pub handle: ColliderHandle,
    pub layer: String,
    pub ignore_layers: Vec<String>,
    /// Participates in rigid-body correction. Trigger-only otherwise.
    pub physics: bool,
}

/// Collider arena plus the collisions resolved between its entries.
///
/// Cleared and repopulated at the start of every physics tick. Every
/// resolved pair is stored twice, once from each side.
#[derive(Debug, Default)]
pub struct CollisionRepository {
    colliders: Vec<ColliderInfo>,
    by_handle: HashMap<ColliderHandle, usize>,
    collisions: Vec<Collision>,
}

impl CollisionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all colliders and collisions from the previous tick.
    pub fn clear(&mut self) {
        self.colliders.clear();
        self.by_handle.clear();
        self.collisions.clear();
    }

    /// Add a collider to this tick's arena and return its index.
    ///
    /// Registering the same handle twice returns the existing index.
    pub fn register_collider(&mut self, info: ColliderInfo) -> usize {
        if let Some(&index) = self.by_handle.get(&info.handle) {
            return index;
        }
        let index = self.colliders.len();
        self.by_handle.insert(info.handle, index);
        self.colliders.push(info);
        index
    }

    /// Drop collisions but keep the registered colliders.
    pub fn clear_collisions(&mut self) {
        self.collisions.clear();
    }

    pub fn persist(&mut self, collision: Collision) {
        self.collisions.push(collision);
    }

    pub fn collider(&self, index: usize) -> Option<&ColliderInfo> {
        self.colliders.get(index)
    }

    pub fn collider_index(&self, handle: ColliderHandle) -> Option<usize> {
        self.by_handle.get(&handle).copied()
    }

    pub fn colliders(&self) -> &[ColliderInfo] {
        &self.colliders
    }

    pub fn find_all(&self) -> &[Collision] {
        &self.collisions
    }

    /// Collisions seen from `handle`. Empty when the collider was not
    /// registered this tick.
    pub fn find_collisions_for_collider(
        &self,
        handle: ColliderHandle,
    ) -> impl Iterator<Item = &Collision> + '_ {
        let index = self.collider_index(handle);
        self.collisions
            .iter()
            .filter(move |c| Some(c.local_collider) == index)
    }

    /// Collisions seen from `handle` whose remote collider is on `layer`.
    pub fn find_collisions_for_collider_and_layer<'a>(
        &'a self,
        handle: ColliderHandle,
        layer: &'a str,
    ) -> impl Iterator<Item = &'a Collision> + 'a {
        self.find_collisions_for_collider(handle).filter(move |c| {
            self.colliders
                .get(c.remote_collider)
                .is_some_and(|info| info.layer == layer)
        })
    }

    /// Collisions whose local side belongs to `entity`, across all of its
    /// colliders.
    pub fn find_collisions_for_entity(
        &self,
        entity: hecs::Entity,
    ) -> impl Iterator<Item = &Collision> + '_ {
        self.collisions
            .iter()
            .filter(move |c| c.local_entity == entity)
    }

    pub fn is_empty(&self) -> bool {
        self.collisions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.collisions.len()
    }
}
