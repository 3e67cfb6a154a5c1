//! Utility modules

pub mod memory_sink;
pub mod validation;

pub use memory_sink::*;
pub use validation::*;
