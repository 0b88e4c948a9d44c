mod screen_bounds;
mod projected_triangle;
mod bounding_area;
mod occlusion_record;
mod solver;
mod light_pass;
mod surface_lookup;
mod silhouette;
mod cast_shadow;

pub use screen_bounds::*;
pub use projected_triangle::*;
pub use bounding_area::*;
pub use occlusion_record::*;
pub use solver::*;
pub use light_pass::*;
pub use surface_lookup::*;
pub use silhouette::*;
pub use cast_shadow::*;
