//! Region quadtree rebuilt from scratch every frame.
//!
//! Nodes live in a flat arena; `clear` truncates the arena back to the root,
//! which keeps the allocation around for the next frame.
//!
//! An item is stored in every leaf whose region overlaps its bounds, so an
//! item straddling a split line shows up in several leaves. Queries collect
//! into a set to fold those duplicates.

use bevy::platform::collections::HashSet;
use bevy::prelude::*;
use std::hash::Hash;

pub const DEFAULT_CAPACITY: usize = 4;
pub const DEFAULT_MAX_DEPTH: u32 = 8;

/// Strict overlap of two rectangles. Touching edges do not overlap.
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.min.x < b.max.x && b.min.x < a.max.x && a.min.y < b.max.y && b.min.y < a.max.y
}

/// Overlap that counts shared edges. Used to route items into nodes, so a
/// zero-extent item sitting on a split line lands in every quadrant it touches.
#[inline]
fn touches(a: &Rect, b: &Rect) -> bool {
    a.min.x <= b.max.x && b.min.x <= a.max.x && a.min.y <= b.max.y && b.min.y <= a.max.y
}

#[derive(Debug, Clone)]
struct Node<T> {
    region: Rect,
    depth: u32,
    items: Vec<(T, Rect)>,
    /// NW, NE, SW, SE
    children: Option<[usize; 4]>,
}

impl<T> Node<T> {
    fn leaf(region: Rect, depth: u32) -> Self {
        Self { region, depth, items: Vec::new(), children: None }
    }
}

#[derive(Debug, Clone)]
pub struct Quadtree<T> {
    nodes: Vec<Node<T>>,
    capacity: usize,
    max_depth: u32,
}

impl<T: Copy + Eq + Hash> Quadtree<T> {
    pub fn new(region: Rect) -> Self {
        Self::with_limits(region, DEFAULT_CAPACITY, DEFAULT_MAX_DEPTH)
    }

    pub fn with_limits(region: Rect, capacity: usize, max_depth: u32) -> Self {
        Self {
            nodes: vec![Node::leaf(region, 0)],
            capacity: capacity.max(1),
            max_depth,
        }
    }

    #[inline]
    pub fn region(&self) -> Rect {
        self.nodes[0].region
    }

    /// Drop every node but the root, and empty the root.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        let root = &mut self.nodes[0];
        root.items.clear();
        root.children = None;
    }

    /// Index `item` under `bounds`. Items entirely outside the root region are
    /// rejected and `false` is returned.
    pub fn insert(&mut self, item: T, bounds: Rect) -> bool {
        if !touches(&self.nodes[0].region, &bounds) {
            return false;
        }
        self.insert_at(0, item, bounds);
        true
    }

    fn insert_at(&mut self, idx: usize, item: T, bounds: Rect) {
        if let Some(children) = self.nodes[idx].children {
            for child in children {
                if touches(&self.nodes[child].region, &bounds) {
                    self.insert_at(child, item, bounds);
                }
            }
            return;
        }

        let node = &mut self.nodes[idx];
        node.items.push((item, bounds));
        if node.items.len() > self.capacity && node.depth < self.max_depth {
            self.subdivide(idx);
        }
    }

    fn subdivide(&mut self, idx: usize) {
        let Node { region, depth, .. } = self.nodes[idx];
        let c = region.center();
        let quadrants = [
            Rect::new(region.min.x, region.min.y, c.x, c.y),
            Rect::new(c.x, region.min.y, region.max.x, c.y),
            Rect::new(region.min.x, c.y, c.x, region.max.y),
            Rect::new(c.x, c.y, region.max.x, region.max.y),
        ];

        let first = self.nodes.len();
        self.nodes
            .extend(quadrants.into_iter().map(|q| Node::leaf(q, depth + 1)));
        let children = [first, first + 1, first + 2, first + 3];

        let items = std::mem::take(&mut self.nodes[idx].items);
        self.nodes[idx].children = Some(children);

        for (item, bounds) in items {
            for child in children {
                if touches(&self.nodes[child].region, &bounds) {
                    self.insert_at(child, item, bounds);
                }
            }
        }
    }

    /// Every item whose bounds overlap `region`.
    pub fn query(&self, region: Rect) -> HashSet<T> {
        let mut out = HashSet::default();
        self.query_into(region, &mut out);
        out
    }

    pub fn query_into(&self, region: Rect, out: &mut HashSet<T>) {
        let mut stack = vec![0usize];
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            if !overlaps(&node.region, &region) {
                continue;
            }
            match node.children {
                Some(children) => stack.extend(children),
                None => out.extend(
                    node.items
                        .iter()
                        .filter(|(_, bounds)| overlaps(bounds, &region))
                        .map(|(item, _)| *item),
                ),
            }
        }
    }

    /// Number of nodes, root included.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Deepest level reached so far (root is 0).
    pub fn depth(&self) -> u32 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }
}
