//! Property tests for the section accumulators and the pagination driver

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use expense_sheets::{
    utils::MemorySink, DailyExpenseSet, Expense, ExpenseCategory, ExpenseReporter,
    FixedExpenseSet, ReportConfig, ReportError, ReportLayout, Section,
};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

fn config() -> ReportConfig {
    ReportConfig::new("Fred Astaire".to_string()).with_signing_date(date(12, 31))
}

// =============================================================================
// Generators
// =============================================================================

fn arb_category() -> impl Strategy<Value = ExpenseCategory> {
    prop::sample::select(ExpenseCategory::ALL.to_vec())
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (1u32..=3, 1u32..=28).prop_map(|(month, day)| date(month, day))
}

/// A home-currency expense with a cent-precision amount
fn arb_expense() -> impl Strategy<Value = Expense> {
    (
        arb_category(),
        arb_date(),
        "[a-z ]{0,12}", // description
        0u64..50_000,   // cents
        0usize..7,      // merchant
    )
        .prop_map(|(category, date, description, cents, merchant)| {
            Expense::in_home_currency(
                category,
                date,
                description,
                BigDecimal::new(cents.into(), 2),
                format!("Merchant {}", merchant),
                "USD".to_string(),
            )
        })
}

fn arb_expenses(max_count: usize) -> impl Strategy<Value = Vec<Expense>> {
    proptest::collection::vec(arb_expense(), 1..=max_count)
}

fn travel_on(date: NaiveDate) -> Expense {
    Expense::in_home_currency(
        ExpenseCategory::Rail,
        date,
        String::new(),
        BigDecimal::from(10),
        "Amtrak".to_string(),
        "USD".to_string(),
    )
}

type TravelTotals = BTreeMap<(NaiveDate, ExpenseCategory), BigDecimal>;

fn add_amounts<'a>(totals: &mut TravelTotals, days: impl Iterator<Item = &'a expense_sheets::DailyExpenses>) {
    for day in days {
        for (category, amount) in &day.amounts {
            *totals
                .entry((day.date, *category))
                .or_insert_with(|| BigDecimal::from(0)) += amount;
        }
    }
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A daily set never holds more dates than its capacity, accepts any
    /// date it already has, and leaves itself untouched on rejection
    #[test]
    fn prop_daily_set_respects_capacity(
        capacity in 1usize..10,
        dates in proptest::collection::vec(arb_date(), 0..40),
    ) {
        let mut set = DailyExpenseSet::new(capacity);

        for date in dates {
            let before = set.dates();
            let result = set.combine(&travel_on(date));

            if before.contains(&date) || before.len() < capacity {
                prop_assert!(result.is_ok());
                prop_assert!(set.contains_date(&date));
            } else {
                let is_capacity_exceeded = matches!(
                    result,
                    Err(ReportError::CapacityExceeded { section: Section::Travel, capacity: c }) if c == capacity
                );
                prop_assert!(is_capacity_exceeded);
                prop_assert_eq!(set.dates(), before);
            }
            prop_assert!(set.len() <= capacity);
        }

        let dates = set.dates();
        prop_assert!(dates.windows(2).all(|pair| pair[0] < pair[1]));
    }

    /// A fixed set keeps the first `capacity` expenses in arrival order and
    /// rejects the rest
    #[test]
    fn prop_fixed_set_keeps_arrival_order(
        capacity in 0usize..12,
        expenses in proptest::collection::vec(arb_expense(), 0..20),
    ) {
        let mut set = FixedExpenseSet::new(Section::Miscellaneous, capacity);

        for (index, expense) in expenses.iter().enumerate() {
            let result = set.combine(expense);
            prop_assert_eq!(result.is_ok(), index < capacity);
        }

        let kept = expenses.len().min(capacity);
        prop_assert_eq!(set.entries(), &expenses[..kept]);
    }

    /// Every record lands on exactly one page: travel amounts per date and
    /// category add up to the single-page totals, and slot sections keep
    /// their order across pages
    #[test]
    fn prop_pagination_is_lossless(
        expenses in arb_expenses(120),
        travel_capacity in 1usize..=8,
        entertainment_capacity in 1usize..=8,
        miscellaneous_capacity in 1usize..=11,
    ) {
        let layout = ReportLayout::v3()
            .with_capacities(travel_capacity, entertainment_capacity, miscellaneous_capacity)
            .unwrap();
        let mut reporter = ExpenseReporter::with_layout(config(), layout, MemorySink::new());
        let targets = reporter.run(expenses.clone()).unwrap();
        let pages = reporter.into_sink().into_pages();
        prop_assert_eq!(pages.len(), targets.len());

        // Same expenses against sections that never fill up
        let mut travel = DailyExpenseSet::new(usize::MAX);
        let mut entertainment = Vec::new();
        let mut miscellaneous = Vec::new();
        for expense in &expenses {
            match expense.section() {
                Section::Travel => travel.combine(expense).unwrap(),
                Section::Entertainment => entertainment.push(expense.clone()),
                Section::Miscellaneous => miscellaneous.push(expense.clone()),
            }
        }

        let mut expected = TravelTotals::new();
        add_amounts(&mut expected, travel.entries());
        let mut actual = TravelTotals::new();
        add_amounts(&mut actual, pages.iter().flat_map(|p| p.travel.iter()));
        prop_assert_eq!(actual, expected);

        let paged_entertainment: Vec<_> = pages
            .iter()
            .flat_map(|p| p.entertainment.iter().cloned())
            .collect();
        let paged_miscellaneous: Vec<_> = pages
            .iter()
            .flat_map(|p| p.miscellaneous.iter().cloned())
            .collect();
        prop_assert_eq!(paged_entertainment, entertainment);
        prop_assert_eq!(paged_miscellaneous, miscellaneous);

        for (index, page) in pages.iter().enumerate() {
            prop_assert_eq!(page.target.sequence, index as u32 + 1);
            prop_assert!(page.travel.len() <= travel_capacity);
            prop_assert!(page.entertainment.len() <= entertainment_capacity);
            prop_assert!(page.miscellaneous.len() <= miscellaneous_capacity);
            prop_assert!(page.low_date <= page.high_date);
        }
    }
}
