mod chain;
mod segment;
mod endpoint_grid;
mod chainer;
mod refine;

pub use chain::*;
pub use segment::*;
pub use endpoint_grid::*;
pub use chainer::*;
pub use refine::*;
