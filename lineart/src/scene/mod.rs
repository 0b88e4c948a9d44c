mod ids;
mod material;
mod source_mesh;
mod camera;
mod light;
mod scene_object;
mod collection;
mod scene_description;

pub use ids::*;
pub use material::*;
pub use source_mesh::*;
pub use camera::*;
pub use light::*;
pub use scene_object::*;
pub use collection::*;
pub use scene_description::*;
