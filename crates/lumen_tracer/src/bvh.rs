//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree of axis-aligned boxes built top-down with a median split.
//! Objects without a bounding box (infinite planes, tubes) cannot be placed
//! in the tree; they are kept in a flat list and tested against every ray.

use crate::{Intersectable, Intersection};
use lumen_math::{Aabb, Interval, Ray};

/// Maximum objects per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 2;

/// BVH node - either a branch with two children or a leaf with objects.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node with at most `LEAF_MAX_SIZE` objects.
    Leaf {
        objects: Vec<Box<dyn Intersectable>>,
        bbox: Aabb,
    },
}

impl BvhNode {
    /// Recursive construction over objects paired with their boxes.
    ///
    /// `objects` is never empty.
    fn build(mut objects: Vec<(Aabb, Box<dyn Intersectable>)>) -> Self {
        let n = objects.len();

        let bbox = objects
            .iter()
            .skip(1)
            .fold(objects[0].0, |acc, (b, _)| acc.union(b));

        if n <= LEAF_MAX_SIZE {
            return BvhNode::Leaf {
                objects: objects.into_iter().map(|(_, o)| o).collect(),
                bbox,
            };
        }

        // Split along the axis where the box centers spread the most
        let centroids: Vec<_> = objects.iter().map(|(b, _)| b.centroid()).collect();
        let axis = Aabb::from_vertices(&centroids)
            .map(|c| c.longest_axis())
            .unwrap_or(0);

        objects.sort_unstable_by(|(a, _), (b, _)| {
            a.centroid()[axis]
                .partial_cmp(&b.centroid()[axis])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let right_objects = objects.split_off(n / 2);
        let left = Self::build(objects);
        let right = Self::build(right_objects);

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox,
        }
    }

    pub fn bbox(&self) -> Aabb {
        match self {
            BvhNode::Leaf { bbox, .. } | BvhNode::Branch { bbox, .. } => *bbox,
        }
    }

    fn collect<'a>(&'a self, ray: &Ray, hits: &mut Vec<Intersection<'a>>) {
        if !self.bbox().hit(ray, Interval::FORWARD) {
            return;
        }
        match self {
            BvhNode::Leaf { objects, .. } => {
                for obj in objects {
                    hits.extend(obj.intersect(ray));
                }
            }
            BvhNode::Branch { left, right, .. } => {
                left.collect(ray, hits);
                right.collect(ray, hits);
            }
        }
    }

    fn node_count(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    fn depth(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// A BVH over bounded objects plus the unbounded objects next to it.
pub struct Bvh {
    root: Option<BvhNode>,
    unbounded: Vec<Box<dyn Intersectable>>,
}

impl Bvh {
    /// Build a hierarchy over `objects`. Pure: consumes its input, no
    /// other state is touched.
    pub fn build(objects: Vec<Box<dyn Intersectable>>) -> Self {
        let total = objects.len();
        let mut bounded = Vec::with_capacity(total);
        let mut unbounded = Vec::new();

        for obj in objects {
            match obj.bounding_box() {
                Some(bbox) => bounded.push((bbox, obj)),
                None => unbounded.push(obj),
            }
        }

        let root = if bounded.is_empty() {
            None
        } else {
            Some(BvhNode::build(bounded))
        };

        let bvh = Self { root, unbounded };
        log::info!(
            "BVH built: {} objects ({} unbounded), {} nodes, depth {}",
            total,
            bvh.unbounded.len(),
            bvh.node_count(),
            bvh.depth()
        );
        bvh
    }

    pub fn root(&self) -> Option<&BvhNode> {
        self.root.as_ref()
    }

    /// Number of tree nodes, leaves included.
    pub fn node_count(&self) -> usize {
        self.root.as_ref().map_or(0, BvhNode::node_count)
    }

    /// Number of levels in the tree; 0 for an empty tree.
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, BvhNode::depth)
    }

    pub fn unbounded_count(&self) -> usize {
        self.unbounded.len()
    }
}

impl Intersectable for Bvh {
    fn intersect<'a>(&'a self, ray: &Ray) -> Vec<Intersection<'a>> {
        let mut hits = Vec::new();
        if let Some(root) = &self.root {
            root.collect(ray, &mut hits);
        }
        for obj in &self.unbounded {
            hits.extend(obj.intersect(ray));
        }
        hits
    }

    fn bounding_box(&self) -> Option<Aabb> {
        if !self.unbounded.is_empty() {
            return None;
        }
        self.root.as_ref().map(BvhNode::bbox)
    }
}
