//! Card surcharge bookkeeping for foreign-currency expenses

use bigdecimal::{BigDecimal, RoundingMode};
use chrono::NaiveDate;
use tracing::info;

use crate::types::*;

/// Merchant recorded on the synthetic surcharge expense
pub const UPLIFT_MERCHANT: &str = "CC";

/// Round a money amount to cents
pub(crate) fn to_cents(amount: &BigDecimal) -> BigDecimal {
    amount.with_scale_round(2, RoundingMode::HalfUp)
}

/// Running total of currency conversion charges on one page
#[derive(Debug, Clone)]
pub struct CurrencyUplift {
    total: BigDecimal,
    anchor: Option<NaiveDate>,
}

impl CurrencyUplift {
    pub fn new() -> Self {
        Self {
            total: BigDecimal::from(0),
            anchor: None,
        }
    }

    /// Add the surcharge for a foreign expense
    ///
    /// Returns the charge added, if any. Expenses already in the home
    /// currency, or a zero rate, add nothing.
    pub fn apply(
        &mut self,
        expense: &Expense,
        uplift_rate: &BigDecimal,
        home_currency: &str,
    ) -> Option<BigDecimal> {
        if *uplift_rate <= BigDecimal::from(0) || expense.original_currency == home_currency {
            return None;
        }

        let charge = to_cents(&(&expense.amount * uplift_rate));
        self.total += &charge;
        info!(
            "Adding {}{} of currency cost to amount {}{} (orig {}) on {}",
            home_currency,
            charge,
            home_currency,
            to_cents(&expense.amount),
            expense.original_currency,
            expense.date
        );
        Some(charge)
    }

    /// Anchor on `date`, replacing any earlier choice
    pub fn prefer_anchor(&mut self, date: NaiveDate) {
        self.anchor = Some(date);
    }

    /// Anchor on `date` only if nothing has been chosen yet
    pub fn offer_anchor(&mut self, date: NaiveDate) {
        self.anchor.get_or_insert(date);
    }

    pub fn anchor(&self) -> Option<NaiveDate> {
        self.anchor
    }

    pub fn total(&self) -> &BigDecimal {
        &self.total
    }

    /// The synthetic "other" expense carrying the total, if there is one
    pub fn materialize(&self, home_currency: &str) -> Option<Expense> {
        if self.total <= BigDecimal::from(0) {
            return None;
        }
        let date = self.anchor?;
        let total = to_cents(&self.total);

        Some(Expense::in_home_currency(
            ExpenseCategory::Other,
            date,
            format!(
                "{}{} in total currency conversion charges",
                home_currency, total
            ),
            total,
            UPLIFT_MERCHANT.to_string(),
            home_currency.to_string(),
        ))
    }
}

impl Default for CurrencyUplift {
    fn default() -> Self {
        Self::new()
    }
}
