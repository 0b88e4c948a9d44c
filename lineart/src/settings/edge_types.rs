use bitflags::bitflags;

bitflags! {
    ///
    /// The kinds of feature line that an edge can be
    ///
    /// An edge can be several kinds at once (for example, both a crease and a material border)
    ///
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    pub struct EdgeTypes: u16 {
        /// Outer boundary where the surface turns away from the camera
        const CONTOUR       = 1 << 0;

        /// The angle between the normals of the two faces exceeds the crease threshold
        const CREASE        = 1 << 1;

        /// The two faces use different materials
        const MATERIAL      = 1 << 2;

        /// The edge was marked by the user
        const EDGE_MARK     = 1 << 3;

        /// The edge belongs to at most one face
        const LOOSE         = 1 << 4;

        /// Line along which two triangles intersect
        const INTERSECTION  = 1 << 5;

        /// The faces on either side of the edge face in different directions relative to the camera
        const SILHOUETTE    = 1 << 6;

        /// The faces on either side of the edge face in different directions relative to the light
        const LIGHT_CONTOUR = 1 << 7;

        /// Outline of the shadow that a light contour casts onto the surface behind it
        const SHADOW        = 1 << 8;
    }
}

impl EdgeTypes {
    ///
    /// The edge types in priority order, used when an edge can only keep one type
    ///
    pub const PRIORITY: [EdgeTypes; 9] = [
        EdgeTypes::CONTOUR,
        EdgeTypes::SILHOUETTE,
        EdgeTypes::CREASE,
        EdgeTypes::MATERIAL,
        EdgeTypes::EDGE_MARK,
        EdgeTypes::INTERSECTION,
        EdgeTypes::LIGHT_CONTOUR,
        EdgeTypes::SHADOW,
        EdgeTypes::LOOSE,
    ];

    ///
    /// Returns the single highest-priority type in this set (or the empty set if there are no types)
    ///
    pub fn highest_priority(self) -> EdgeTypes {
        EdgeTypes::PRIORITY.iter()
            .copied()
            .find(|edge_type| self.contains(*edge_type))
            .unwrap_or(EdgeTypes::empty())
    }
}

impl Default for EdgeTypes {
    fn default() -> Self {
        EdgeTypes::CONTOUR | EdgeTypes::CREASE | EdgeTypes::MATERIAL | EdgeTypes::EDGE_MARK | EdgeTypes::LOOSE | EdgeTypes::INTERSECTION
    }
}
