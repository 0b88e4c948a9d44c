mod view;
mod vertex;
mod triangle;
mod diagnostics;
mod light_snapshot;
mod prepared_mesh;
mod clip;
mod scene_snapshot;
mod loader;

pub use view::*;
pub use vertex::*;
pub use triangle::*;
pub use diagnostics::*;
pub use light_snapshot::*;
pub use prepared_mesh::*;
pub use scene_snapshot::*;
pub use loader::*;
