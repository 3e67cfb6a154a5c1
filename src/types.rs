//! Core types and data structures for expense aggregation

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Expense kinds known to the report sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExpenseCategory {
    Breakfast,
    Lunch,
    Dinner,
    Hotel,
    Air,
    Rail,
    CarRental,
    Taxi,
    ParkingToll,
    Phone,
    Other,
    /// Client entertainment, reported one slot per record
    Entertainment,
    /// Non-travel spending, reported one slot per record
    Miscellaneous,
}

impl ExpenseCategory {
    /// Every category, in sheet column order
    pub const ALL: [ExpenseCategory; 13] = [
        ExpenseCategory::Breakfast,
        ExpenseCategory::Lunch,
        ExpenseCategory::Dinner,
        ExpenseCategory::Hotel,
        ExpenseCategory::Air,
        ExpenseCategory::Rail,
        ExpenseCategory::CarRental,
        ExpenseCategory::Taxi,
        ExpenseCategory::ParkingToll,
        ExpenseCategory::Phone,
        ExpenseCategory::Other,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Miscellaneous,
    ];

    /// Returns the report section this category is filed under
    pub fn section(&self) -> Section {
        match self {
            ExpenseCategory::Entertainment => Section::Entertainment,
            ExpenseCategory::Miscellaneous => Section::Miscellaneous,
            ExpenseCategory::Breakfast
            | ExpenseCategory::Lunch
            | ExpenseCategory::Dinner
            | ExpenseCategory::Hotel
            | ExpenseCategory::Air
            | ExpenseCategory::Rail
            | ExpenseCategory::CarRental
            | ExpenseCategory::Taxi
            | ExpenseCategory::ParkingToll
            | ExpenseCategory::Phone
            | ExpenseCategory::Other => Section::Travel,
        }
    }

    /// Short identifier used in logs and exports
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Breakfast => "breakfast",
            ExpenseCategory::Lunch => "lunch",
            ExpenseCategory::Dinner => "dinner",
            ExpenseCategory::Hotel => "hotel",
            ExpenseCategory::Air => "air",
            ExpenseCategory::Rail => "rail",
            ExpenseCategory::CarRental => "carRental",
            ExpenseCategory::Taxi => "taxi",
            ExpenseCategory::ParkingToll => "parkingToll",
            ExpenseCategory::Phone => "phone",
            ExpenseCategory::Other => "other",
            ExpenseCategory::Entertainment => "entertainment",
            ExpenseCategory::Miscellaneous => "miscellaneous",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three fixed regions of a report sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    /// Keyed by date, amounts merged per category
    Travel,
    Entertainment,
    Miscellaneous,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Travel => f.write_str("travel"),
            Section::Entertainment => f.write_str("entertainment"),
            Section::Miscellaneous => f.write_str("miscellaneous"),
        }
    }
}

/// A single normalized expense record
///
/// `amount` is already converted into the home currency. The original
/// currency and amount are kept for the consistency check and for the
/// card surcharge calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub category: ExpenseCategory,
    pub date: NaiveDate,
    /// Free text, may be empty
    pub description: String,
    /// Amount in the home currency
    pub amount: BigDecimal,
    pub merchant: String,
    pub original_currency: String,
    pub original_amount: BigDecimal,
}

impl Expense {
    /// Create a new expense
    pub fn new(
        category: ExpenseCategory,
        date: NaiveDate,
        description: String,
        amount: BigDecimal,
        merchant: String,
        original_currency: String,
        original_amount: BigDecimal,
    ) -> Self {
        Self {
            category,
            date,
            description,
            amount,
            merchant,
            original_currency,
            original_amount,
        }
    }

    /// Create an expense that was paid in the home currency
    pub fn in_home_currency(
        category: ExpenseCategory,
        date: NaiveDate,
        description: String,
        amount: BigDecimal,
        merchant: String,
        currency: String,
    ) -> Self {
        Self::new(
            category,
            date,
            description,
            amount.clone(),
            merchant,
            currency,
            amount,
        )
    }

    /// Returns the section this expense is filed under
    pub fn section(&self) -> Section {
        self.category.section()
    }

    /// Description prefixed with the merchant, or empty when there is no description
    pub fn qualified_description(&self) -> String {
        if self.description.is_empty() {
            String::new()
        } else {
            format!("{}: {}", self.merchant, self.description)
        }
    }
}

/// Errors that can occur while building expense reports
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("{section} section is full ({capacity} entries)")]
    CapacityExceeded { section: Section, capacity: usize },
    #[error("Inconsistent currency: {0}")]
    InconsistentCurrency(String),
    #[error("Internal invariant violated: {0}")]
    InternalInvariant(String),
    #[error("Malformed source record: {0}")]
    MalformedRecord(String),
    #[error("Cannot finalize a report page with no expenses")]
    EmptyPage,
    #[error("No expenses to report")]
    EmptyInput,
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ReportError {
    /// Capacity overflow is the only condition handled by starting a new page
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ReportError::CapacityExceeded { .. })
    }
}

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;
