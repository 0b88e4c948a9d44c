use crate::scene::*;

use std::collections::{HashMap, HashSet};

///
/// A triangle from the triangulation of a source mesh
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PreparedTriangle {
    /// Vertex indexes in the source mesh
    pub vertices:   [u32; 3],

    /// The face in the source mesh that this triangle was made from
    pub face:       u32,

    /// Flags of the source edge for each edge of the triangle (empty for edges inside a polygon)
    pub edge_flags: [SourceEdgeFlags; 3],
}

///
/// The triangulation and edge topology of a source mesh
///
/// This only depends on the mesh itself, so it's shared by every instance of the same mesh.
///
#[derive(Clone, Debug, PartialEq, Default)]
pub struct PreparedMesh {
    pub triangles:  Vec<PreparedTriangle>,

    /// Edges that are not part of any face
    pub wire_edges: Vec<[u32; 2]>,
}

#[inline]
fn edge_key(a: u32, b: u32) -> (u32, u32) {
    if a < b { (a, b) } else { (b, a) }
}

impl PreparedMesh {
    ///
    /// Triangulates the faces of a mesh (as fans) and finds its loose edges
    ///
    pub fn prepare(mesh: &SourceMesh) -> PreparedMesh {
        let num_vertices    = mesh.vertices.len() as u32;
        let edge_flags      = mesh.edges.iter()
            .map(|edge| (edge_key(edge.vertices[0], edge.vertices[1]), edge.flags))
            .collect::<HashMap<_, _>>();
        let flags_for       = |a: u32, b: u32| edge_flags.get(&edge_key(a, b)).copied().unwrap_or_default();

        let mut face_edges  = HashSet::new();
        let mut triangles   = vec![];

        for (face_idx, face) in mesh.faces.iter().enumerate() {
            let vertices = &face.vertices;
            if vertices.len() < 3 || vertices.iter().any(|vertex| *vertex >= num_vertices) {
                continue;
            }

            for (a, b) in vertices.iter().zip(vertices.iter().cycle().skip(1)) {
                face_edges.insert(edge_key(*a, *b));
            }

            // Fan triangulation: the first and last triangles include the polygon edges next to vertex 0
            let last = vertices.len() - 1;
            for idx in 1..last {
                let (v0, v1, v2) = (vertices[0], vertices[idx], vertices[idx+1]);

                triangles.push(PreparedTriangle {
                    vertices:   [v0, v1, v2],
                    face:       face_idx as u32,
                    edge_flags: [
                        if idx == 1 { flags_for(v0, v1) } else { SourceEdgeFlags::empty() },
                        flags_for(v1, v2),
                        if idx+1 == last { flags_for(v2, v0) } else { SourceEdgeFlags::empty() },
                    ],
                });
            }
        }

        let wire_edges = mesh.edges.iter()
            .filter(|edge| edge.vertices.iter().all(|vertex| *vertex < num_vertices))
            .filter(|edge| edge.vertices[0] != edge.vertices[1])
            .filter(|edge| !face_edges.contains(&edge_key(edge.vertices[0], edge.vertices[1])))
            .map(|edge| edge.vertices)
            .collect();

        PreparedMesh { triangles, wire_edges }
    }
}
