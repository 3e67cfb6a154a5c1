//! Slot-per-record sections (entertainment, miscellaneous)

use crate::types::*;

/// Ordered list of individual expenses with a fixed number of slots
///
/// Several entries may share a date; nothing is merged.
#[derive(Debug, Clone)]
pub struct FixedExpenseSet {
    section: Section,
    capacity: usize,
    expenses: Vec<Expense>,
}

impl FixedExpenseSet {
    pub fn new(section: Section, capacity: usize) -> Self {
        Self {
            section,
            capacity,
            expenses: Vec::new(),
        }
    }

    /// Append the expense if a slot is free
    pub fn combine(&mut self, expense: &Expense) -> ReportResult<()> {
        if self.expenses.len() >= self.capacity {
            return Err(ReportError::CapacityExceeded {
                section: self.section,
                capacity: self.capacity,
            });
        }
        self.expenses.push(expense.clone());
        Ok(())
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }
}
