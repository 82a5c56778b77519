//! Shop application - pages, types and context

mod context;
mod pages;
mod types;

pub use context::*;
pub use pages::*;
pub use types::*;
