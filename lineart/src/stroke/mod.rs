mod generated_stroke;
mod stroke_layers;
mod filter;
mod generator;

pub use generated_stroke::*;
pub use stroke_layers::*;
pub use filter::*;
pub use generator::*;
