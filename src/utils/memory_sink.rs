//! In-memory document sink for testing and dry runs

use crate::report::FinalizedPage;
use crate::traits::*;
use crate::types::*;

/// Keeps every finalized page in memory instead of writing files
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pages: Vec<FinalizedPage>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Pages in the order they were saved
    pub fn pages(&self) -> &[FinalizedPage] {
        &self.pages
    }

    pub fn into_pages(self) -> Vec<FinalizedPage> {
        self.pages
    }

    /// Clear all data (useful for testing)
    pub fn clear(&mut self) {
        self.pages.clear();
    }
}

impl DocumentSink for MemorySink {
    fn write_page(&mut self, page: &FinalizedPage) -> ReportResult<()> {
        self.pages.push(page.clone());
        Ok(())
    }
}
