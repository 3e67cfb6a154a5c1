//! Run configuration shared by the pagination driver and every report page

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Settings that apply to every page of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Currency all amounts are normalized to, e.g. `USD`
    pub home_currency: String,
    /// Card surcharge on foreign transactions as a fraction (0.03 for 3%)
    pub uplift_rate: BigDecimal,
    /// Name of the person filing the report
    pub reporter_name: String,
    pub business_purpose: String,
    pub department: String,
    /// Date written into the signature field; today when unset
    pub signing_date: Option<NaiveDate>,
}

impl ReportConfig {
    /// Create a configuration with the default currency and no surcharge
    pub fn new(reporter_name: String) -> Self {
        Self {
            reporter_name,
            ..Self::default()
        }
    }

    pub fn with_home_currency(mut self, currency: String) -> Self {
        self.home_currency = currency;
        self
    }

    /// Set the surcharge as a fraction of the converted amount
    pub fn with_uplift_rate(mut self, rate: BigDecimal) -> Self {
        self.uplift_rate = rate;
        self
    }

    /// Set the surcharge from a percentage such as `4.5`
    pub fn with_uplift_percent(self, percent: BigDecimal) -> Self {
        self.with_uplift_rate(percent / BigDecimal::from(100))
    }

    pub fn with_business_purpose(mut self, purpose: String) -> Self {
        self.business_purpose = purpose;
        self
    }

    pub fn with_department(mut self, department: String) -> Self {
        self.department = department;
        self
    }

    pub fn with_signing_date(mut self, date: NaiveDate) -> Self {
        self.signing_date = Some(date);
        self
    }

    /// The signing date, falling back to the local calendar date
    pub fn effective_signing_date(&self) -> NaiveDate {
        self.signing_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// Validate the configuration
    pub fn validate(&self) -> ReportResult<()> {
        crate::utils::validation::validate_currency_code(&self.home_currency)?;

        if self.uplift_rate < BigDecimal::from(0) {
            return Err(ReportError::Validation(format!(
                "Currency uplift cannot be negative: {}",
                self.uplift_rate
            )));
        }

        if self.reporter_name.trim().is_empty() {
            return Err(ReportError::Validation(
                "Reporter name cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            home_currency: "USD".to_string(),
            uplift_rate: BigDecimal::from(0),
            reporter_name: String::new(),
            business_purpose: "Sales".to_string(),
            department: "Sales".to_string(),
            signing_date: None,
        }
    }
}
