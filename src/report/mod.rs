//! Aggregation and pagination engine: section accumulators, pages and the driver

pub mod daily;
pub mod driver;
pub mod fixed;
pub mod page;
pub mod uplift;

pub use daily::*;
pub use driver::*;
pub use fixed::*;
pub use page::*;
pub use uplift::*;
