// particle/mod.rs
// Re-exports for the particle module

mod interaction;
mod types;

pub use interaction::*;
pub use types::*;
