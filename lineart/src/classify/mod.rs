mod feature_edge;
mod classifier;
mod intersection;

pub use feature_edge::*;
pub use classifier::*;
pub use intersection::*;
