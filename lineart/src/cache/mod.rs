mod cache_state;
mod cancel_token;
mod cache_entry;
mod cache_table;

pub use cache_state::*;
pub use cancel_token::*;
pub use cache_entry::*;
pub use cache_table::*;
