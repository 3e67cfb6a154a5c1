//! Boundary traits for expense input and report output

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::report::FinalizedPage;
use crate::types::*;

/// Source of normalized expenses
///
/// Implementations do the format-specific work (column names, number
/// locales, category names) and hand back records in report order.
pub trait ExpenseSource {
    /// Read every expense; malformed records fail with `MalformedRecord`
    fn read_expenses(&mut self) -> ReportResult<Vec<Expense>>;
}

impl ExpenseSource for Vec<Expense> {
    fn read_expenses(&mut self) -> ReportResult<Vec<Expense>> {
        Ok(std::mem::take(self))
    }
}

/// Destination for finalized report pages
///
/// Each call must fully persist one page; the target is opened and closed
/// inside the call.
pub trait DocumentSink {
    fn write_page(&mut self, page: &FinalizedPage) -> ReportResult<()>;
}

impl<T: DocumentSink + ?Sized> DocumentSink for &mut T {
    fn write_page(&mut self, page: &FinalizedPage) -> ReportResult<()> {
        (**self).write_page(page)
    }
}

/// Sequential identifier of an output document, starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OutputTarget {
    pub sequence: u32,
}

impl OutputTarget {
    pub fn new(sequence: u32) -> Self {
        Self { sequence }
    }

    /// File name `<stem>-<sequence>.<extension>`
    pub fn file_name(&self, stem: &str, extension: &str) -> String {
        format!("{}-{}.{}", stem, self.sequence, extension)
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.sequence)
    }
}
