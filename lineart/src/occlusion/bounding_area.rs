use super::screen_bounds::*;
use super::projected_triangle::*;
use crate::error::*;

use glam::{DVec2};

/// Leaf areas are split when they contain more triangles than this
const MAX_TRIANGLES_PER_AREA: usize = 64;

/// Areas are never split further than this many levels
const MAX_AREA_DEPTH: u32 = 10;

///
/// A node in the bounding area tree
///
#[derive(Clone, Debug)]
struct AreaNode {
    bounds:     ScreenBounds,
    depth:      u32,

    /// Indexes of the child nodes (once this area has been split)
    children:   Option<[u32; 4]>,

    /// Triangles overlapping this area (leaf nodes only)
    triangles:  Vec<u32>,

    /// Triangles whose bounds contain the whole of this area (these are not passed on to the children)
    covering:   Vec<u32>,
}

///
/// Recursive partition of the screen used to find the triangles near an edge
///
/// Each area is split into four when it contains too many triangles. Triangles are stored in every leaf area that their
/// bounds overlap, except that a triangle whose bounds contain a whole area is stored with that area and doesn't count
/// towards splitting it.
///
#[derive(Clone, Debug)]
pub struct BoundingArea {
    nodes: Vec<AreaNode>,
}

impl AreaNode {
    fn leaf(bounds: ScreenBounds, depth: u32) -> AreaNode {
        AreaNode { bounds, depth, children: None, triangles: vec![], covering: vec![] }
    }
}

impl BoundingArea {
    ///
    /// Builds the bounding areas for a set of projected triangles (the index of each triangle is its ID)
    ///
    pub fn build(triangles: &[Option<ProjectedTriangle>]) -> Result<BoundingArea, LineartError> {
        let root_bounds = triangles.iter()
            .flatten()
            .map(|triangle| triangle.bounds)
            .reduce(|a, b| a.union(&b))
            .unwrap_or(ScreenBounds { min: DVec2::ZERO, max: DVec2::ZERO });

        if !root_bounds.is_finite() {
            return Err(LineartError::InvalidSpatialIndex(format!("the projected triangles cover an area that is not finite ({:?})", root_bounds)));
        }

        let mut area = BoundingArea { nodes: vec![AreaNode::leaf(root_bounds, 0)] };

        for (idx, triangle) in triangles.iter().enumerate() {
            if let Some(triangle) = triangle {
                area.insert(0, idx as u32, &triangle.bounds, triangles)?;
            }
        }

        Ok(area)
    }

    ///
    /// Adds a triangle to a node and any of its children that it overlaps
    ///
    fn insert(&mut self, node_idx: u32, triangle_idx: u32, bounds: &ScreenBounds, triangles: &[Option<ProjectedTriangle>]) -> Result<(), LineartError> {
        let node = &mut self.nodes[node_idx as usize];

        if !node.bounds.overlaps(bounds) {
            return Ok(());
        }

        if bounds.contains(&node.bounds) {
            node.covering.push(triangle_idx);
            return Ok(());
        }

        if let Some(children) = node.children {
            for child in children {
                self.insert(child, triangle_idx, bounds, triangles)?;
            }
        } else {
            node.triangles.push(triangle_idx);

            if node.triangles.len() > MAX_TRIANGLES_PER_AREA && node.depth < MAX_AREA_DEPTH {
                self.split(node_idx, triangles)?;
            }
        }

        Ok(())
    }

    ///
    /// Splits a leaf node into four quarters
    ///
    fn split(&mut self, node_idx: u32, triangles: &[Option<ProjectedTriangle>]) -> Result<(), LineartError> {
        try_reserve(&mut self.nodes, 4, "bounding areas")?;

        let node        = &mut self.nodes[node_idx as usize];
        let depth       = node.depth + 1;
        let quarters    = node.bounds.quarters();
        let contents    = std::mem::take(&mut node.triangles);
        let first_child = self.nodes.len() as u32;

        self.nodes.extend(quarters.iter().map(|bounds| AreaNode::leaf(*bounds, depth)));
        self.nodes[node_idx as usize].children = Some([first_child, first_child+1, first_child+2, first_child+3]);

        for triangle_idx in contents {
            if let Some(triangle) = &triangles[triangle_idx as usize] {
                for child in first_child..first_child+4 {
                    let child_node = &mut self.nodes[child as usize];

                    if triangle.bounds.contains(&child_node.bounds) {
                        child_node.covering.push(triangle_idx);
                    } else if child_node.bounds.overlaps(&triangle.bounds) {
                        child_node.triangles.push(triangle_idx);
                    }
                }
            }
        }

        Ok(())
    }

    ///
    /// Returns the triangles whose areas overlap a region of the screen, in ascending order
    ///
    pub fn candidates(&self, bounds: &ScreenBounds) -> Vec<u32> {
        let mut result  = vec![];
        let mut to_scan = vec![0u32];

        while let Some(node_idx) = to_scan.pop() {
            let node = &self.nodes[node_idx as usize];

            if !node.bounds.overlaps(bounds) {
                continue;
            }

            result.extend(node.covering.iter().copied());

            match node.children {
                Some(children)  => to_scan.extend(children),
                None            => result.extend(node.triangles.iter().copied()),
            }
        }

        result.sort_unstable();
        result.dedup();
        result
    }

    ///
    /// The number of areas in the tree
    ///
    pub fn num_areas(&self) -> usize {
        self.nodes.len()
    }
}
