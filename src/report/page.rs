//! A single capacity-bounded report sheet

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::config::ReportConfig;
use crate::layout::{Cell, ReportLayout};
use crate::report::{CurrencyUplift, DailyExpenseSet, DailyExpenses, FixedExpenseSet};
use crate::traits::*;
use crate::types::*;

/// One report sheet being filled
///
/// Pages only change through [`ReportPage::combine`] and are consumed by
/// [`ReportPage::finalize`] or [`ReportPage::save`].
#[derive(Debug)]
pub struct ReportPage<'a> {
    config: &'a ReportConfig,
    layout: &'a ReportLayout,
    target: OutputTarget,
    travel: DailyExpenseSet,
    entertainment: FixedExpenseSet,
    miscellaneous: FixedExpenseSet,
    uplift: CurrencyUplift,
    date_range: Option<(NaiveDate, NaiveDate)>,
}

impl<'a> ReportPage<'a> {
    /// Create an empty page that will be written to `target`
    pub fn new(config: &'a ReportConfig, layout: &'a ReportLayout, target: OutputTarget) -> Self {
        Self {
            config,
            layout,
            target,
            travel: DailyExpenseSet::new(layout.travel.capacity),
            entertainment: FixedExpenseSet::new(
                Section::Entertainment,
                layout.entertainment.capacity,
            ),
            miscellaneous: FixedExpenseSet::new(
                Section::Miscellaneous,
                layout.miscellaneous.capacity,
            ),
            uplift: CurrencyUplift::new(),
            date_range: None,
        }
    }

    /// Route an expense to its section
    ///
    /// On `CapacityExceeded` nothing on the page has changed.
    pub fn combine(&mut self, expense: &Expense) -> ReportResult<()> {
        match expense.section() {
            Section::Travel => self.combine_travel(expense),
            Section::Entertainment => self.combine_entertainment(expense),
            Section::Miscellaneous => self.combine_miscellaneous(expense),
        }
    }

    // The surcharge is filed in the travel section, so its anchor should be a
    // date that section already holds. Travel dates always win; other
    // sections only provide a fallback.

    fn combine_travel(&mut self, expense: &Expense) -> ReportResult<()> {
        self.travel.combine(expense)?;
        self.add_currency_cost(expense);
        self.uplift.prefer_anchor(expense.date);
        self.extend_date_range(expense.date);
        Ok(())
    }

    fn combine_entertainment(&mut self, expense: &Expense) -> ReportResult<()> {
        self.entertainment.combine(expense)?;
        self.add_currency_cost(expense);
        self.uplift.offer_anchor(expense.date);
        self.extend_date_range(expense.date);
        Ok(())
    }

    fn combine_miscellaneous(&mut self, expense: &Expense) -> ReportResult<()> {
        self.miscellaneous.combine(expense)?;
        self.add_currency_cost(expense);
        self.uplift.offer_anchor(expense.date);
        self.extend_date_range(expense.date);
        Ok(())
    }

    fn add_currency_cost(&mut self, expense: &Expense) {
        self.uplift
            .apply(expense, &self.config.uplift_rate, &self.config.home_currency);
    }

    fn extend_date_range(&mut self, date: NaiveDate) {
        self.date_range = Some(match self.date_range {
            Some((low, high)) => (low.min(date), high.max(date)),
            None => (date, date),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.travel.is_empty() && self.entertainment.is_empty() && self.miscellaneous.is_empty()
    }

    pub fn target(&self) -> &OutputTarget {
        &self.target
    }

    /// Earliest and latest expense dates on the page
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.date_range
    }

    pub fn travel(&self) -> &DailyExpenseSet {
        &self.travel
    }

    pub fn entertainment(&self) -> &FixedExpenseSet {
        &self.entertainment
    }

    pub fn miscellaneous(&self) -> &FixedExpenseSet {
        &self.miscellaneous
    }

    pub fn uplift(&self) -> &CurrencyUplift {
        &self.uplift
    }

    /// Close the page: file the surcharge and render every cell
    pub fn finalize(mut self) -> ReportResult<FinalizedPage> {
        if self.is_empty() {
            return Err(ReportError::EmptyPage);
        }
        let (low, high) = self.date_range.ok_or_else(|| {
            ReportError::InternalInvariant(format!(
                "page {} holds expenses but has no date range",
                self.target
            ))
        })?;

        let home_currency = &self.config.home_currency;
        if let Some(surcharge) = self.uplift.materialize(home_currency) {
            if let Err(err) = self.travel.combine(&surcharge) {
                let diagnostics = self.diagnostics();
                error!("Currency charge did not fit on page {}: {}", self.target, diagnostics);
                return Err(match err {
                    ReportError::CapacityExceeded { .. } => ReportError::InternalInvariant(
                        format!("currency charge overflowed the travel section; {}", diagnostics),
                    ),
                    other => other,
                });
            }
            info!("{}", surcharge.description);
        }

        let layout = self.layout;
        let config = self.config;
        let signing_date = config.effective_signing_date();
        let mut cells: Vec<Cell> = layout.formulas.clone();

        let travel: Vec<DailyExpenses> = self.travel.entries().cloned().collect();
        for (index, day) in travel.iter().enumerate() {
            cells.extend(layout.travel_row(index, day));
        }

        for (index, expense) in self.entertainment.entries().iter().enumerate() {
            if expense.description.is_empty() {
                warn!(
                    "Entertainment expenses MUST have descriptions ({} on {})",
                    expense.merchant, expense.date
                );
            }
            cells.extend(layout.entertainment_row(index, expense, config));
        }

        for (index, expense) in self.miscellaneous.entries().iter().enumerate() {
            if expense.description.is_empty() {
                warn!(
                    "Miscellaneous expenses MUST have descriptions ({} on {})",
                    expense.merchant, expense.date
                );
            }
            cells.extend(layout.miscellaneous_row(index, expense, config));
        }

        cells.extend(layout.header_cells(config, low, high, signing_date));

        Ok(FinalizedPage {
            target: self.target,
            low_date: low,
            high_date: high,
            signing_date,
            currency_charges: self.uplift.total().clone(),
            travel,
            entertainment: self.entertainment.entries().to_vec(),
            miscellaneous: self.miscellaneous.entries().to_vec(),
            cells,
        })
    }

    /// Finalize the page and hand it to the sink
    pub fn save<S: DocumentSink + ?Sized>(self, sink: &mut S) -> ReportResult<OutputTarget> {
        let page = self.finalize()?;
        info!("Saving page {}", page.target);
        sink.write_page(&page)?;
        Ok(page.target)
    }

    fn diagnostics(&self) -> String {
        let anchor = self
            .uplift
            .anchor()
            .map(|date| date.to_string())
            .unwrap_or_else(|| "none".to_string());
        format!(
            "anchor date: {}; travel: [{}]; entertainment: [{}]; miscellaneous: [{}]",
            anchor,
            join_dates(self.travel.dates()),
            join_dates(self.entertainment.entries().iter().map(|e| e.date)),
            join_dates(self.miscellaneous.entries().iter().map(|e| e.date)),
        )
    }
}

fn join_dates(dates: impl IntoIterator<Item = NaiveDate>) -> String {
    dates
        .into_iter()
        .map(|date| date.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Immutable result of finalizing a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizedPage {
    pub target: OutputTarget,
    pub low_date: NaiveDate,
    pub high_date: NaiveDate,
    pub signing_date: NaiveDate,
    /// Surcharge total filed under "other" in the travel section
    pub currency_charges: BigDecimal,
    /// Travel rows by ascending date, surcharge included
    pub travel: Vec<DailyExpenses>,
    pub entertainment: Vec<Expense>,
    pub miscellaneous: Vec<Expense>,
    /// Every value to write, formulas first
    pub cells: Vec<Cell>,
}

impl FinalizedPage {
    /// Sum of every amount on the page
    pub fn total(&self) -> BigDecimal {
        let travel: BigDecimal = self.travel.iter().map(|day| day.total()).sum();
        let entertainment: BigDecimal = self.entertainment.iter().map(|e| &e.amount).sum();
        let miscellaneous: BigDecimal = self.miscellaneous.iter().map(|e| &e.amount).sum();
        travel + entertainment + miscellaneous
    }
}
