use super::vertex::*;
use super::triangle::*;
use crate::error::*;

use smallvec::*;

use std::collections::{HashMap};

///
/// A polygon being clipped: each vertex with the flags of the edge that leaves it
///
pub (crate) type ClipPolygon = SmallVec<[(VertexIdx, TriangleEdgeFlags); 8]>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum ClipPlane {
    Near,
    Far,
}

///
/// Clips triangles and edges against the near and far planes of a camera
///
/// Vertices created on an edge are shared by everything that clips the same edge, so triangles on either side of a
/// clipped edge stay connected.
///
pub (crate) struct PolygonClipper {
    clip_start:     f64,
    clip_end:       f64,
    cut_vertices:   HashMap<(VertexIdx, VertexIdx, ClipPlane), VertexIdx>,
}

impl PolygonClipper {
    ///
    /// Creates a clipper for a range of view depths
    ///
    pub fn new(clip_start: f64, clip_end: f64) -> PolygonClipper {
        PolygonClipper {
            clip_start:     clip_start,
            clip_end:       clip_end,
            cut_vertices:   HashMap::new(),
        }
    }

    #[inline]
    fn plane_depth(&self, plane: ClipPlane) -> f64 {
        match plane {
            ClipPlane::Near => self.clip_start,
            ClipPlane::Far  => self.clip_end,
        }
    }

    #[inline]
    fn is_inside(&self, plane: ClipPlane, vertex: &SnapshotVertex) -> bool {
        let depth = -vertex.view.z;

        match plane {
            ClipPlane::Near => depth >= self.clip_start,
            ClipPlane::Far  => depth <= self.clip_end,
        }
    }

    ///
    /// True if a vertex is between the near and far planes
    ///
    #[inline]
    pub fn is_visible(&self, vertex: &SnapshotVertex) -> bool {
        self.is_inside(ClipPlane::Near, vertex) && self.is_inside(ClipPlane::Far, vertex)
    }

    ///
    /// Returns the vertex where the edge between two vertices crosses a clipping plane, creating it if needed
    ///
    fn cut_vertex(&mut self, vertices: &mut Vec<SnapshotVertex>, a: VertexIdx, b: VertexIdx, plane: ClipPlane) -> Result<VertexIdx, LineartError> {
        // Always cut from the lower vertex so the result is the same whichever direction the edge is clipped in
        let (from, to)  = if a < b { (a, b) } else { (b, a) };
        let key         = (from, to, plane);

        if let Some(existing) = self.cut_vertices.get(&key) {
            return Ok(*existing);
        }

        let plane_depth = self.plane_depth(plane);
        let from_vertex = &vertices[from.idx()];
        let to_vertex   = &vertices[to.idx()];
        let from_depth  = -from_vertex.view.z;
        let to_depth    = -to_vertex.view.z;
        let t           = ((plane_depth - from_depth) / (to_depth - from_depth)).clamp(0.0, 1.0);

        let mut view    = from_vertex.view.lerp(to_vertex.view, t);
        view.z          = -plane_depth;

        let cut         = SnapshotVertex {
            world:  from_vertex.world.lerp(to_vertex.world, t),
            view:   view,
            source: blend_sources(&from_vertex.source, &to_vertex.source, t),
        };

        try_reserve(vertices, 1, "clipped vertices")?;
        let idx = VertexIdx(vertices.len() as u32);
        vertices.push(cut);
        self.cut_vertices.insert(key, idx);

        Ok(idx)
    }

    ///
    /// Clips a polygon against a single plane
    ///
    fn clip_against(&mut self, vertices: &mut Vec<SnapshotVertex>, polygon: &ClipPolygon, plane: ClipPlane) -> Result<ClipPolygon, LineartError> {
        let mut result = smallvec![];

        for idx in 0..polygon.len() {
            let (current, flags)    = polygon[idx];
            let (next, _)           = polygon[(idx + 1) % polygon.len()];
            let current_inside      = self.is_inside(plane, &vertices[current.idx()]);
            let next_inside         = self.is_inside(plane, &vertices[next.idx()]);

            if current_inside {
                result.push((current, flags));
            }

            if current_inside != next_inside {
                let cut = self.cut_vertex(vertices, current, next, plane)?;

                if current_inside {
                    // Leaving: the next edge runs along the clipping plane
                    result.push((cut, TriangleEdgeFlags::CLIP_BOUNDARY));
                } else {
                    // Entering: the next edge is the rest of the original edge
                    result.push((cut, flags));
                }
            }
        }

        Ok(result)
    }

    ///
    /// Clips a polygon against the near and far planes, returning an empty polygon if it is entirely outside
    ///
    pub fn clip_polygon(&mut self, vertices: &mut Vec<SnapshotVertex>, polygon: ClipPolygon) -> Result<ClipPolygon, LineartError> {
        if polygon.iter().all(|(vertex, _)| self.is_visible(&vertices[vertex.idx()])) {
            return Ok(polygon);
        }

        let polygon = self.clip_against(vertices, &polygon, ClipPlane::Near)?;
        if polygon.len() < 3 { return Ok(smallvec![]); }

        let polygon = self.clip_against(vertices, &polygon, ClipPlane::Far)?;
        if polygon.len() < 3 { return Ok(smallvec![]); }

        Ok(polygon)
    }

    ///
    /// Clips a line against the near and far planes, returning `None` if it is entirely outside
    ///
    pub fn clip_segment(&mut self, vertices: &mut Vec<SnapshotVertex>, segment: [VertexIdx; 2]) -> Result<Option<[VertexIdx; 2]>, LineartError> {
        let mut segment = segment;

        for plane in [ClipPlane::Near, ClipPlane::Far] {
            let start_inside    = self.is_inside(plane, &vertices[segment[0].idx()]);
            let end_inside      = self.is_inside(plane, &vertices[segment[1].idx()]);

            match (start_inside, end_inside) {
                (true, true)    => { }
                (false, false)  => { return Ok(None); }
                (true, false)   => { segment[1] = self.cut_vertex(vertices, segment[0], segment[1], plane)?; }
                (false, true)   => { segment[0] = self.cut_vertex(vertices, segment[0], segment[1], plane)?; }
            }
        }

        Ok(Some(segment))
    }
}
