mod edge_types;
mod mask_filter;
mod lineart_settings;
mod modifier_settings;

pub use edge_types::*;
pub use mask_filter::*;
pub use lineart_settings::*;
pub use modifier_settings::*;
