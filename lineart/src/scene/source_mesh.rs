use super::material::*;

use bitflags::bitflags;
use glam::{DVec3};
use smallvec::*;

bitflags! {
    ///
    /// Flags that the user can set on the edges of a mesh
    ///
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SourceEdgeFlags: u8 {
        /// The edge is marked for Line Art (produces `EdgeTypes::EDGE_MARK` lines)
        const MARK  = 1 << 0;

        /// The edge is marked sharp (can be a crease between smooth faces)
        const SHARP = 1 << 1;
    }
}

///
/// A polygon in a source mesh
///
#[derive(Clone, Debug, PartialEq)]
pub struct SourceFace {
    /// Indexes of the vertices of the polygon, in counter-clockwise order when viewed from the front
    pub vertices:   SmallVec<[u32; 4]>,

    /// Material slot of the face
    pub material:   u16,

    /// The face is smooth-shaded
    pub smooth:     bool,

    /// The face has a face mark
    pub face_mark:  bool,
}

///
/// An edge of a source mesh with user-set flags
///
/// Edges only need to be listed when they have flags or when they are loose (not part of any face)
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceEdge {
    pub vertices:   [u32; 2],
    pub flags:      SourceEdgeFlags,
}

///
/// A named set of per-vertex weights
///
#[derive(Clone, Debug, PartialEq)]
pub struct VertexGroup {
    pub name:       String,

    /// Weight for each vertex in the mesh (vertices past the end of this list have weight 0)
    pub weights:    Vec<f64>,
}

///
/// A mesh in object space, as supplied by the host
///
/// Meshes are shared between objects using an `Arc`: every object that uses the same `Arc<SourceMesh>` is an instance
/// of the same geometry, and is only triangulated once per computation.
///
#[derive(Clone, Debug, PartialEq, Default)]
pub struct SourceMesh {
    pub vertices:       Vec<DVec3>,
    pub faces:          Vec<SourceFace>,
    pub edges:          Vec<SourceEdge>,
    pub materials:      Vec<LineartMaterial>,
    pub vertex_groups:  Vec<VertexGroup>,
}

impl SourceFace {
    ///
    /// Creates a flat-shaded face using material slot 0
    ///
    pub fn new(vertices: &[u32]) -> SourceFace {
        SourceFace {
            vertices:   vertices.iter().copied().collect(),
            material:   0,
            smooth:     false,
            face_mark:  false,
        }
    }
}

impl VertexGroup {
    ///
    /// The weight of a vertex in this group
    ///
    #[inline]
    pub fn weight(&self, vertex: u32) -> f64 {
        self.weights.get(vertex as usize).copied().unwrap_or(0.0)
    }
}

impl SourceMesh {
    ///
    /// Creates a mesh from a set of vertices and polygons
    ///
    pub fn new(vertices: Vec<DVec3>, faces: Vec<SourceFace>) -> SourceMesh {
        SourceMesh {
            vertices:       vertices,
            faces:          faces,
            edges:          vec![],
            materials:      vec![],
            vertex_groups:  vec![],
        }
    }

    ///
    /// Creates an axis-aligned box with the specified center and size
    ///
    pub fn cuboid(center: DVec3, size: DVec3) -> SourceMesh {
        // Vertex i has its x, y, z offsets in bits 0, 1, 2
        let vertices = (0..8)
            .map(|idx| {
                let offset = DVec3::new((idx & 1) as f64, ((idx >> 1) & 1) as f64, ((idx >> 2) & 1) as f64) - DVec3::splat(0.5);
                center + offset * size
            })
            .collect();

        let faces = vec![
            SourceFace::new(&[0, 2, 3, 1]),
            SourceFace::new(&[4, 5, 7, 6]),
            SourceFace::new(&[0, 1, 5, 4]),
            SourceFace::new(&[2, 6, 7, 3]),
            SourceFace::new(&[0, 4, 6, 2]),
            SourceFace::new(&[1, 3, 7, 5]),
        ];

        SourceMesh::new(vertices, faces)
    }

    ///
    /// Creates a mesh containing a single quad (corners in counter-clockwise order when viewed from the front)
    ///
    pub fn quad(corners: [DVec3; 4]) -> SourceMesh {
        SourceMesh::new(corners.to_vec(), vec![SourceFace::new(&[0, 1, 2, 3])])
    }

    ///
    /// Returns the Line Art material for a material slot
    ///
    pub fn material(&self, slot: u16) -> LineartMaterial {
        self.materials.get(slot as usize).cloned().unwrap_or_default()
    }

    ///
    /// Sets the flags of an edge, adding it to the edge list if needed
    ///
    pub fn set_edge_flags(&mut self, from: u32, to: u32, flags: SourceEdgeFlags) {
        let key = if from < to { [from, to] } else { [to, from] };

        if let Some(edge) = self.edges.iter_mut().find(|edge| edge.vertices == key || edge.vertices == [key[1], key[0]]) {
            edge.flags = flags;
        } else {
            self.edges.push(SourceEdge { vertices: key, flags: flags });
        }
    }

    ///
    /// Adds an edge that is not part of any face
    ///
    pub fn add_loose_edge(&mut self, from: DVec3, to: DVec3) {
        let from_idx    = self.vertices.len() as u32;
        let to_idx      = from_idx + 1;

        self.vertices.push(from);
        self.vertices.push(to);
        self.edges.push(SourceEdge { vertices: [from_idx, to_idx], flags: SourceEdgeFlags::empty() });
    }
}
