// simulation/mod.rs
// Re-exports and module declarations for simulation submodules

pub mod boundary;
mod clipboard;
pub mod forces;
mod links;
mod selection;
pub mod simulation;
pub mod transformers;

pub use boundary::reflect_off_walls;
pub use simulation::*;
pub use transformers::{InteractionMap, LinkStress, StepContext, Transformer};

#[cfg(test)]
mod tests;
