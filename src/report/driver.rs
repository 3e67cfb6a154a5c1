//! Pagination driver that spreads an expense list over as many pages as needed

use tracing::{debug, info};

use crate::config::ReportConfig;
use crate::layout::ReportLayout;
use crate::report::ReportPage;
use crate::traits::*;
use crate::types::*;
use crate::utils::validation::validate_currency_consistency;

/// Turns a full expense list into numbered, saved report pages
pub struct ExpenseReporter<S: DocumentSink> {
    config: ReportConfig,
    layout: ReportLayout,
    sink: S,
}

impl<S: DocumentSink> ExpenseReporter<S> {
    /// Create a reporter for the reference layout
    pub fn new(config: ReportConfig, sink: S) -> Self {
        Self::with_layout(config, ReportLayout::v3(), sink)
    }

    pub fn with_layout(config: ReportConfig, layout: ReportLayout, sink: S) -> Self {
        Self {
            config,
            layout,
            sink,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Read every expense from `source` and report them
    pub fn run_source<E: ExpenseSource + ?Sized>(
        &mut self,
        source: &mut E,
    ) -> ReportResult<Vec<OutputTarget>> {
        let expenses = source.read_expenses()?;
        self.run(expenses)
    }

    /// Report `expenses` in order, starting a new page whenever a section fills up
    ///
    /// Returns the targets of the saved pages, numbered from 1. Any error other
    /// than a full section aborts the run.
    pub fn run<I>(&mut self, expenses: I) -> ReportResult<Vec<OutputTarget>>
    where
        I: IntoIterator<Item = Expense>,
    {
        self.config.validate()?;
        self.layout.validate()?;

        let config = &self.config;
        let layout = &self.layout;
        let sink = &mut self.sink;

        let mut saved = Vec::new();
        let mut sequence = 1;
        let mut open_page: Option<ReportPage<'_>> = None;

        for expense in expenses {
            validate_currency_consistency(&expense, &config.home_currency)?;

            let page = open_page
                .get_or_insert_with(|| ReportPage::new(config, layout, OutputTarget::new(sequence)));

            match page.combine(&expense) {
                Ok(()) => {}
                Err(err) if err.is_recoverable() => {
                    debug!("Page {} is full: {}", page.target(), err);
                    if page.is_empty() {
                        return Err(ReportError::InternalInvariant(format!(
                            "empty page {} overflowed on {} expense from {} dated {}",
                            page.target(),
                            expense.category,
                            expense.merchant,
                            expense.date
                        )));
                    }

                    if let Some(full) = open_page.take() {
                        saved.push(full.save(sink)?);
                    }

                    sequence += 1;
                    let mut fresh = ReportPage::new(config, layout, OutputTarget::new(sequence));
                    // One retry only; an empty page that cannot take the
                    // expense never will.
                    fresh.combine(&expense).map_err(|err| {
                        ReportError::InternalInvariant(format!(
                            "{} expense from {} dated {} does not fit on an empty page: {}",
                            expense.category, expense.merchant, expense.date, err
                        ))
                    })?;
                    open_page = Some(fresh);
                }
                Err(err) => return Err(err),
            }
        }

        let last = open_page.ok_or(ReportError::EmptyInput)?;
        saved.push(last.save(sink)?);

        info!("Wrote {} expense report page(s)", saved.len());
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::MemorySink;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn config() -> ReportConfig {
        ReportConfig::new("Fred Astaire".to_string()).with_signing_date(date(31))
    }

    fn travel(d: u32) -> Expense {
        Expense::in_home_currency(
            ExpenseCategory::Taxi,
            date(d),
            String::new(),
            BigDecimal::from(10),
            "Cab".to_string(),
            "USD".to_string(),
        )
    }

    #[test]
    fn test_rollover_on_third_date() {
        let layout = ReportLayout::v3().with_capacities(2, 8, 11).unwrap();
        let mut reporter = ExpenseReporter::with_layout(config(), layout, MemorySink::new());

        let targets = reporter
            .run(vec![travel(1), travel(2), travel(3)])
            .unwrap();

        assert_eq!(targets, vec![OutputTarget::new(1), OutputTarget::new(2)]);
        let pages = reporter.sink().pages();
        let first: Vec<_> = pages[0].travel.iter().map(|d| d.date).collect();
        let second: Vec<_> = pages[1].travel.iter().map(|d| d.date).collect();
        assert_eq!(first, vec![date(1), date(2)]);
        assert_eq!(second, vec![date(3)]);
    }

    #[test]
    fn test_same_date_never_rolls_over() {
        let layout = ReportLayout::v3().with_capacities(1, 8, 11).unwrap();
        let mut reporter = ExpenseReporter::with_layout(config(), layout, MemorySink::new());

        let targets = reporter.run((0..20).map(|_| travel(4))).unwrap();

        assert_eq!(targets.len(), 1);
        let page = &reporter.sink().pages()[0];
        assert_eq!(page.travel[0].amounts[&ExpenseCategory::Taxi], BigDecimal::from(200));
    }

    #[test]
    fn test_empty_input() {
        let mut reporter = ExpenseReporter::new(config(), MemorySink::new());
        assert!(matches!(
            reporter.run(Vec::new()),
            Err(ReportError::EmptyInput)
        ));
        assert!(reporter.sink().pages().is_empty());
    }

    #[test]
    fn test_inconsistent_currency_aborts() {
        let mut reporter = ExpenseReporter::new(config(), MemorySink::new());
        let mut bad = travel(2);
        bad.amount = BigDecimal::from_str("50.00").unwrap();
        bad.original_amount = BigDecimal::from_str("49.00").unwrap();

        let result = reporter.run(vec![travel(1), bad]);
        assert!(matches!(result, Err(ReportError::InconsistentCurrency(_))));
        assert!(reporter.sink().pages().is_empty());
    }

    #[test]
    fn test_expense_that_never_fits() {
        let layout = ReportLayout::v3().with_capacities(8, 0, 11).unwrap();
        let mut reporter = ExpenseReporter::with_layout(config(), layout, MemorySink::new());
        let mut party = travel(1);
        party.category = ExpenseCategory::Entertainment;

        let result = reporter.run(vec![travel(1), party]);
        assert!(matches!(result, Err(ReportError::InternalInvariant(_))));
        // The full page was saved before the retry failed
        assert_eq!(reporter.sink().pages().len(), 1);
    }

    #[test]
    fn test_first_expense_on_zero_capacity_section() {
        let layout = ReportLayout::v3().with_capacities(0, 8, 11).unwrap();
        let mut reporter = ExpenseReporter::with_layout(config(), layout, MemorySink::new());

        let result = reporter.run(vec![travel(1)]);
        assert!(matches!(result, Err(ReportError::InternalInvariant(_))));
        assert!(reporter.sink().pages().is_empty());
    }

    #[test]
    fn test_invalid_config_rejected_before_reading() {
        let mut reporter =
            ExpenseReporter::new(ReportConfig::default(), MemorySink::new());
        assert!(matches!(
            reporter.run(vec![travel(1)]),
            Err(ReportError::Validation(_))
        ));
    }

    #[test]
    fn test_oversized_layout_rejected_before_reading() {
        let mut layout = ReportLayout::v3();
        layout.travel.capacity = 20;
        let mut reporter = ExpenseReporter::with_layout(config(), layout, MemorySink::new());

        assert!(matches!(
            reporter.run(vec![travel(1)]),
            Err(ReportError::Validation(_))
        ));
        assert!(reporter.sink().pages().is_empty());
    }
}
