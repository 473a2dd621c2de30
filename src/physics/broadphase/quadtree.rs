//! Region quad-tree over bounding boxes.

use std::collections::HashSet;

use glam::Vec2;

use crate::error::PhysicsError;
use crate::math::Rect;
use crate::physics::shape::ShapeId;

use super::{total_area, BroadPhase};

/// Entries a leaf holds before it splits.
const MAX_ITEMS: usize = 16;
/// Depth limit; leaves at this depth grow without splitting.
const MAX_DEPTH: usize = 8;

#[derive(Debug)]
struct Node {
    bounds: Rect,
    depth: usize,
    /// Indices into `QuadTree::entries`. Empty once the node has split.
    items: Vec<usize>,
    children: Option<Box<[Node; 4]>>,
}

impl Node {
    fn new(bounds: Rect, depth: usize) -> Self {
        Self {
            bounds,
            depth,
            items: Vec::new(),
            children: None,
        }
    }

    /// Insert into this node, or into every child the box overlaps.
    fn insert(&mut self, index: usize, entries: &[(ShapeId, Rect)]) {
        let rect = entries[index].1;

        if let Some(children) = &mut self.children {
            for child in children.iter_mut() {
                if child.bounds.intersects(&rect) {
                    child.insert(index, entries);
                }
            }
            return;
        }

        self.items.push(index);
        if self.items.len() > MAX_ITEMS && self.depth < MAX_DEPTH {
            self.split(entries);
        }
    }

    /// Split into bottom-left, top-left, top-right and bottom-right quadrants
    /// sharing the midpoint, and migrate the current entries into them.
    fn split(&mut self, entries: &[(ShapeId, Rect)]) {
        let min = self.bounds.min;
        let max = self.bounds.max;
        let mid = self.bounds.center();
        let depth = self.depth + 1;

        let mut children = Box::new([
            Node::new(Rect::from_min_max(min, mid), depth),
            Node::new(
                Rect::from_min_max(Vec2::new(min.x, mid.y), Vec2::new(mid.x, max.y)),
                depth,
            ),
            Node::new(Rect::from_min_max(mid, max), depth),
            Node::new(
                Rect::from_min_max(Vec2::new(mid.x, min.y), Vec2::new(max.x, mid.y)),
                depth,
            ),
        ]);

        for index in self.items.drain(..) {
            let rect = entries[index].1;
            for child in children.iter_mut() {
                if child.bounds.intersects(&rect) {
                    child.insert(index, entries);
                }
            }
        }

        self.children = Some(children);
    }

    fn query(
        &self,
        area: &Rect,
        entries: &[(ShapeId, Rect)],
        seen: &mut HashSet<usize>,
        found: &mut Vec<ShapeId>,
    ) {
        if !self.bounds.intersects(area) {
            return;
        }

        match &self.children {
            Some(children) => {
                for child in children.iter() {
                    child.query(area, entries, seen, found);
                }
            }
            None => {
                for &index in &self.items {
                    // a straddling box lives in several leaves
                    if seen.insert(index) && entries[index].1.intersects(area) {
                        found.push(entries[index].0);
                    }
                }
            }
        }
    }
}

/// Quad-tree broad phase.
#[derive(Debug, Default)]
pub struct QuadTree {
    root: Option<Node>,
    entries: Vec<(ShapeId, Rect)>,
    built: bool,
}

impl QuadTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Depth of the deepest node. Zero for an empty or unsplit tree.
    pub fn depth(&self) -> usize {
        fn deepest(node: &Node) -> usize {
            match &node.children {
                Some(children) => children.iter().map(deepest).max().unwrap_or(node.depth),
                None => node.depth,
            }
        }
        self.root.as_ref().map_or(0, deepest)
    }
}

impl BroadPhase for QuadTree {
    fn update(&mut self, entries: &[(ShapeId, Rect)]) {
        self.built = true;
        self.entries.clear();
        self.entries.extend_from_slice(entries);

        self.root = total_area(&self.entries).map(|area| {
            let mut root = Node::new(area, 0);
            for index in 0..self.entries.len() {
                root.insert(index, &self.entries);
            }
            root
        });
    }

    fn retrieve(&self, area: &Rect) -> Result<Vec<ShapeId>, PhysicsError> {
        if !self.built {
            return Err(PhysicsError::BroadPhaseNotBuilt);
        }

        let mut found = Vec::new();
        if let Some(root) = &self.root {
            let mut seen = HashSet::new();
            root.query(area, &self.entries, &mut seen, &mut found);
        }
        Ok(found)
    }
}
