//! # Expense Sheets
//!
//! Turns a flat list of dated, categorized expenses into one or more
//! expense report sheets with fixed, capacity-limited sections.
//!
//! ## Features
//!
//! - **Daily merging**: travel expenses on the same date share one row, amounts summed per category
//! - **Fixed slots**: entertainment and miscellaneous expenses keep one row each, in input order
//! - **Pagination**: a full section closes the current sheet and the expense moves to a new one
//! - **Card surcharges**: foreign-currency spending gets a computed conversion charge, filed under "other"
//! - **Boundary traits**: any expense source and any document sink can be plugged in
//!
//! ## Quick Start
//!
//! ```rust
//! use expense_sheets::{Expense, ExpenseCategory, ExpenseReporter, ReportConfig};
//! use expense_sheets::utils::MemorySink;
//! use bigdecimal::BigDecimal;
//! use chrono::NaiveDate;
//!
//! let config = ReportConfig::new("Fred Astaire".to_string());
//! let mut reporter = ExpenseReporter::new(config, MemorySink::new());
//!
//! let taxi = Expense::in_home_currency(
//!     ExpenseCategory::Taxi,
//!     NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
//!     "Airport".to_string(),
//!     BigDecimal::from(42),
//!     "Yellow Cab".to_string(),
//!     "USD".to_string(),
//! );
//!
//! let pages = reporter.run(vec![taxi]).unwrap();
//! assert_eq!(pages.len(), 1);
//! ```

pub mod config;
pub mod formats;
pub mod layout;
pub mod report;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use layout::*;
pub use report::*;
pub use traits::*;
pub use types::*;
