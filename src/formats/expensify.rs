//! Expensify bulk-export CSV reader
//!
//! Expected header columns: `Timestamp`, `Merchant`, `Amount`, `Category`,
//! `Comment`, `Original Currency`, `Original Amount`. Amounts are printed in
//! the exporting user's locale, so they go through a [`NumberLocale`].

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use csv::ReaderBuilder;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use crate::traits::*;
use crate::types::*;
use crate::utils::validation::validate_non_negative_amount;

/// Timestamp format used by the export
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Export category names and the expense kind each maps to
pub const EXPENSIFY_CATEGORIES: [(&str, ExpenseCategory); 15] = [
    ("Entertainment", ExpenseCategory::Entertainment),
    ("Lodging", ExpenseCategory::Hotel),
    ("Meals - Breakfast", ExpenseCategory::Breakfast),
    ("Meals - Dinner", ExpenseCategory::Dinner),
    ("Meals - Lunch", ExpenseCategory::Lunch),
    ("Miscellaneous (not travel related)", ExpenseCategory::Miscellaneous),
    ("Other (travel related)", ExpenseCategory::Other),
    ("Phone", ExpenseCategory::Phone),
    ("Transport - Air", ExpenseCategory::Air),
    ("Transport - Car Rental", ExpenseCategory::CarRental),
    ("Transport - Fuel", ExpenseCategory::ParkingToll),
    ("Transport - Parking", ExpenseCategory::ParkingToll),
    ("Transport - Rail", ExpenseCategory::Rail),
    ("Transport - Taxi", ExpenseCategory::Taxi),
    ("Transport - Toll", ExpenseCategory::ParkingToll),
];

/// Look up the expense kind for an export category name (exact match)
pub fn map_category(name: &str) -> Option<ExpenseCategory> {
    EXPENSIFY_CATEGORIES
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, category)| *category)
}

/// Decimal and digit-grouping conventions of a locale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberLocale {
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl NumberLocale {
    pub const EN_US: NumberLocale = NumberLocale {
        decimal_separator: '.',
        grouping_separator: ',',
    };

    pub const DE_DE: NumberLocale = NumberLocale {
        decimal_separator: ',',
        grouping_separator: '.',
    };

    pub const FR_FR: NumberLocale = NumberLocale {
        decimal_separator: ',',
        grouping_separator: ' ',
    };

    /// Parse a locale-formatted number such as `1,234.56` or `1.234,56`
    pub fn parse_amount(&self, text: &str) -> ReportResult<BigDecimal> {
        let normalized: String = text
            .trim()
            .chars()
            .filter(|c| *c != self.grouping_separator)
            // French grouping is written with (narrow) no-break spaces too
            .filter(|c| !(self.grouping_separator == ' ' && c.is_whitespace()))
            .map(|c| if c == self.decimal_separator { '.' } else { c })
            .collect();

        BigDecimal::from_str(&normalized)
            .map_err(|_| ReportError::MalformedRecord(format!("Cannot parse amount '{}'", text)))
    }
}

impl Default for NumberLocale {
    fn default() -> Self {
        Self::EN_US
    }
}

impl FromStr for NumberLocale {
    type Err = ReportError;

    /// Accepts POSIX-style names like `en_US` or `de_DE.UTF-8`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let language = s
            .split(['_', '-', '.'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match language.as_str() {
            "en" | "ja" | "zh" | "ko" | "he" | "th" => Ok(Self::EN_US),
            "de" | "es" | "it" | "nl" | "pt" | "da" | "id" | "tr" => Ok(Self::DE_DE),
            "fr" | "sv" | "nb" | "fi" | "pl" | "cs" | "ru" | "uk" => Ok(Self::FR_FR),
            _ => Err(ReportError::Validation(format!("Unsupported locale: {}", s))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ExportRow {
    #[serde(rename = "Timestamp")]
    timestamp: String,
    #[serde(rename = "Merchant")]
    merchant: String,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Comment", default)]
    comment: String,
    #[serde(rename = "Original Currency")]
    original_currency: String,
    #[serde(rename = "Original Amount")]
    original_amount: String,
}

impl ExportRow {
    fn into_expense(self, locale: &NumberLocale) -> ReportResult<Expense> {
        let category = map_category(&self.category).ok_or_else(|| {
            ReportError::MalformedRecord(format!(
                "Category for expense looks wrong: \"{}\"",
                self.category
            ))
        })?;

        let date = NaiveDateTime::parse_from_str(self.timestamp.trim(), TIMESTAMP_FORMAT)
            .map_err(|e| {
                ReportError::MalformedRecord(format!("Bad timestamp '{}': {}", self.timestamp, e))
            })?
            .date();

        let amount = locale.parse_amount(&self.amount)?;
        let original_amount = locale.parse_amount(&self.original_amount)?;
        validate_non_negative_amount(&amount, "Amount")?;
        validate_non_negative_amount(&original_amount, "Original amount")?;

        Ok(Expense::new(
            category,
            date,
            self.comment,
            amount,
            self.merchant,
            self.original_currency.trim().to_string(),
            original_amount,
        ))
    }
}

/// Reads expenses from an Expensify CSV export
pub struct ExpensifyCsv<R: Read> {
    reader: R,
    locale: NumberLocale,
}

impl<R: Read> ExpensifyCsv<R> {
    pub fn new(reader: R, locale: NumberLocale) -> Self {
        Self { reader, locale }
    }
}

impl ExpensifyCsv<File> {
    /// Open an export file
    pub fn open(path: impl AsRef<Path>, locale: NumberLocale) -> ReportResult<Self> {
        Ok(Self::new(File::open(path)?, locale))
    }
}

impl<R: Read> ExpenseSource for ExpensifyCsv<R> {
    fn read_expenses(&mut self) -> ReportResult<Vec<Expense>> {
        let mut rdr = ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(&mut self.reader);

        let mut expenses = Vec::new();
        for (index, row) in rdr.deserialize::<ExportRow>().enumerate() {
            let row = row.map_err(|e| {
                ReportError::MalformedRecord(format!(
                    "Cannot locate fields in export row {}: {}",
                    index + 1,
                    e
                ))
            })?;
            expenses.push(row.into_expense(&self.locale)?);
        }
        Ok(expenses)
    }
}
