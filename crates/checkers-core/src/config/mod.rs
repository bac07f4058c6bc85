//! Configuration system for checkers

mod loader;
mod types;

pub use loader::*;
pub use types::*;
