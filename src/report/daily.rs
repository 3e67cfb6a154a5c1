//! Travel section accumulator: one row per calendar date

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::types::*;

/// Separator placed between merged descriptions
pub const DESCRIPTION_SEPARATOR: &str = " / ";

/// Merged spending for a single date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyExpenses {
    pub date: NaiveDate,
    /// Merchant-qualified descriptions joined by [`DESCRIPTION_SEPARATOR`]
    pub description: String,
    /// Summed amount per category
    pub amounts: HashMap<ExpenseCategory, BigDecimal>,
}

impl DailyExpenses {
    fn from_expense(expense: &Expense) -> Self {
        let mut amounts = HashMap::new();
        amounts.insert(expense.category, expense.amount.clone());
        Self {
            date: expense.date,
            description: expense.qualified_description(),
            amounts,
        }
    }

    fn merge(&mut self, expense: &Expense) {
        if !expense.description.is_empty() {
            if !self.description.is_empty() {
                self.description.push_str(DESCRIPTION_SEPARATOR);
            }
            self.description.push_str(&expense.qualified_description());
        }

        *self
            .amounts
            .entry(expense.category)
            .or_insert_with(|| BigDecimal::from(0)) += &expense.amount;
    }

    /// Sum over all categories for the day
    pub fn total(&self) -> BigDecimal {
        self.amounts.values().sum()
    }
}

/// Expenses grouped by date, bounded by the number of distinct dates
#[derive(Debug, Clone)]
pub struct DailyExpenseSet {
    capacity: usize,
    days: BTreeMap<NaiveDate, DailyExpenses>,
}

impl DailyExpenseSet {
    /// Create an empty set holding at most `capacity` dates
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            days: BTreeMap::new(),
        }
    }

    /// Merge an expense into its date, or open a new date if there is room
    ///
    /// A new date on a full set fails with `CapacityExceeded` and leaves the
    /// set untouched.
    pub fn combine(&mut self, expense: &Expense) -> ReportResult<()> {
        if let Some(day) = self.days.get_mut(&expense.date) {
            day.merge(expense);
            return Ok(());
        }

        if self.days.len() >= self.capacity {
            return Err(ReportError::CapacityExceeded {
                section: Section::Travel,
                capacity: self.capacity,
            });
        }

        self.days
            .insert(expense.date, DailyExpenses::from_expense(expense));
        Ok(())
    }

    /// Whether the date already has a row
    pub fn contains_date(&self, date: &NaiveDate) -> bool {
        self.days.contains_key(date)
    }

    /// Rows ordered by ascending date
    pub fn entries(&self) -> impl Iterator<Item = &DailyExpenses> {
        self.days.values()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.days.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn expense(category: ExpenseCategory, d: u32, description: &str, amount: &str) -> Expense {
        Expense::in_home_currency(
            category,
            date(d),
            description.to_string(),
            BigDecimal::from_str(amount).unwrap(),
            "Merchant".to_string(),
            "USD".to_string(),
        )
    }

    #[test]
    fn test_same_day_same_category_sums() {
        let mut set = DailyExpenseSet::new(8);
        set.combine(&expense(ExpenseCategory::Taxi, 1, "to hotel", "12.50"))
            .unwrap();
        set.combine(&expense(ExpenseCategory::Taxi, 1, "to office", "7.25"))
            .unwrap();

        assert_eq!(set.len(), 1);
        let day = set.entries().next().unwrap();
        assert_eq!(
            day.amounts[&ExpenseCategory::Taxi],
            BigDecimal::from_str("19.75").unwrap()
        );
        assert_eq!(day.description, "Merchant: to hotel / Merchant: to office");
    }

    #[test]
    fn test_same_day_different_categories_kept_apart() {
        let mut set = DailyExpenseSet::new(8);
        set.combine(&expense(ExpenseCategory::Lunch, 2, "", "15"))
            .unwrap();
        set.combine(&expense(ExpenseCategory::Dinner, 2, "team dinner", "60"))
            .unwrap();

        let day = set.entries().next().unwrap();
        assert_eq!(day.amounts.len(), 2);
        assert_eq!(day.description, "Merchant: team dinner");
        assert_eq!(day.total(), BigDecimal::from(75));
    }

    #[test]
    fn test_empty_description_adds_no_separator() {
        let mut set = DailyExpenseSet::new(8);
        set.combine(&expense(ExpenseCategory::Hotel, 3, "two nights", "300"))
            .unwrap();
        set.combine(&expense(ExpenseCategory::Phone, 3, "", "5"))
            .unwrap();

        assert_eq!(set.entries().next().unwrap().description, "Merchant: two nights");
    }

    #[test]
    fn test_overflow_leaves_set_unchanged() {
        let mut set = DailyExpenseSet::new(2);
        set.combine(&expense(ExpenseCategory::Air, 1, "", "400"))
            .unwrap();
        set.combine(&expense(ExpenseCategory::Air, 2, "", "400"))
            .unwrap();

        let result = set.combine(&expense(ExpenseCategory::Air, 3, "", "400"));
        assert!(matches!(
            result,
            Err(ReportError::CapacityExceeded {
                section: Section::Travel,
                capacity: 2
            })
        ));
        assert_eq!(set.dates(), vec![date(1), date(2)]);

        // Existing dates still merge when full
        set.combine(&expense(ExpenseCategory::Rail, 2, "", "30"))
            .unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_entries_sorted_by_date() {
        let mut set = DailyExpenseSet::new(8);
        for d in [9, 3, 5, 1] {
            set.combine(&expense(ExpenseCategory::Breakfast, d, "", "10"))
                .unwrap();
        }
        let dates: Vec<_> = set.entries().map(|day| day.date).collect();
        assert_eq!(dates, vec![date(1), date(3), date(5), date(9)]);
        assert!(set.contains_date(&date(5)));
        assert!(!set.contains_date(&date(4)));
    }
}
