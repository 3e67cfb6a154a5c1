//! Validation utilities

use bigdecimal::BigDecimal;

use crate::report::uplift::to_cents;
use crate::types::*;

/// Validate that a currency code looks like an ISO 4217 code
pub fn validate_currency_code(code: &str) -> ReportResult<()> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ReportError::Validation(format!(
            "Currency must be a 3-letter code such as USD, got '{}'",
            code
        )));
    }
    Ok(())
}

/// Validate that an amount is not negative
pub fn validate_non_negative_amount(amount: &BigDecimal, field: &str) -> ReportResult<()> {
    if *amount < BigDecimal::from(0) {
        return Err(ReportError::MalformedRecord(format!(
            "{} cannot be negative: {}",
            field, amount
        )));
    }
    Ok(())
}

/// Check that the upstream conversion into the home currency actually happened
///
/// Same currency must mean same amount, and a different currency must mean a
/// converted (different) amount.
pub fn validate_currency_consistency(expense: &Expense, home_currency: &str) -> ReportResult<()> {
    let same_currency = expense.original_currency == home_currency;
    let same_amount = expense.amount == expense.original_amount;

    let problem = match (same_currency, same_amount) {
        (true, false) => "match, but amounts",
        (false, true) => "differ, but amounts",
        _ => return Ok(()),
    };

    Err(ReportError::InconsistentCurrency(format!(
        "Check your default currency in the expense export, and compare to the currency \
         you're specifying. Output currency {} and export currency {} {} {} and {} are {}",
        home_currency,
        expense.original_currency,
        problem,
        to_cents(&expense.amount),
        to_cents(&expense.original_amount),
        if same_currency { "different" } else { "the same" },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn expense(currency: &str, amount: &str, original: &str) -> Expense {
        Expense::new(
            ExpenseCategory::Lunch,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            String::new(),
            BigDecimal::from_str(amount).unwrap(),
            "Cafe".to_string(),
            currency.to_string(),
            BigDecimal::from_str(original).unwrap(),
        )
    }

    #[test]
    fn test_consistent_records_pass() {
        assert!(validate_currency_consistency(&expense("USD", "50.00", "50"), "USD").is_ok());
        assert!(validate_currency_consistency(&expense("EUR", "54.10", "50.00"), "USD").is_ok());
    }

    #[test]
    fn test_same_currency_different_amount() {
        let result = validate_currency_consistency(&expense("USD", "50.00", "49.00"), "USD");
        match result {
            Err(ReportError::InconsistentCurrency(message)) => {
                assert!(message.contains("USD and export currency USD match"));
                assert!(message.contains("50.00 and 49.00 are different"));
            }
            other => panic!("expected inconsistent currency, got {:?}", other),
        }
    }

    #[test]
    fn test_different_currency_same_amount() {
        let result = validate_currency_consistency(&expense("GBP", "20.00", "20.00"), "USD");
        assert!(matches!(result, Err(ReportError::InconsistentCurrency(_))));
    }

    #[test]
    fn test_currency_code() {
        assert!(validate_currency_code("EUR").is_ok());
        assert!(validate_currency_code("eur").is_err());
        assert!(validate_currency_code("EURO").is_err());
        assert!(validate_currency_code("").is_err());
    }

    #[test]
    fn test_non_negative_amount() {
        assert!(validate_non_negative_amount(&BigDecimal::from(0), "Amount").is_ok());
        assert!(validate_non_negative_amount(&BigDecimal::from(-1), "Amount").is_err());
    }
}
