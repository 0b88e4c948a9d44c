mod modifier_stack;
mod evaluation;
mod bake;

pub use modifier_stack::*;
pub use evaluation::*;
pub use bake::*;
