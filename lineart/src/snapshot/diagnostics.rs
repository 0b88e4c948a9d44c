use log::*;

///
/// Counts of the problems and notable events found while computing feature lines
///
/// None of these stop a computation: the affected geometry is skipped.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Diagnostics {
    /// Triangles with no area or with coordinates that are not finite
    pub degenerate_triangles:   usize,

    /// Triangles with no area on the screen (never used to hide lines)
    pub degenerate_projections: usize,

    /// Triangles that were cut or removed by the near or far clipping planes
    pub clipped_triangles:      usize,

    /// Edges shared by more than two triangles
    pub non_manifold_edges:     usize,

    /// Number of distinct meshes that were triangulated
    pub meshes_prepared:        usize,

    /// Number of mesh objects (including instances) that were loaded
    pub instances_loaded:       usize,
}

impl Diagnostics {
    ///
    /// Writes a summary of these diagnostics to the log
    ///
    pub fn log_summary(&self) {
        debug!("Line art: loaded {} mesh instances using {} meshes, {} triangles clipped", self.instances_loaded, self.meshes_prepared, self.clipped_triangles);

        if self.degenerate_triangles > 0 || self.degenerate_projections > 0 {
            warn!("Line art: skipped {} degenerate triangles and {} triangles with no area on screen", self.degenerate_triangles, self.degenerate_projections);
        }

        if self.non_manifold_edges > 0 {
            debug!("Line art: {} edges are shared by more than two triangles", self.non_manifold_edges);
        }
    }
}
