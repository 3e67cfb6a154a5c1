//! Concrete input and output formats

pub mod cell_csv;
pub mod expensify;

pub use cell_csv::*;
pub use expensify::*;
