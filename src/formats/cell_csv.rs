//! Cell-list CSV writer: one file per page, one line per written cell
//!
//! Columns: `cell,row,column,kind,value,style`, where `row` and `column` are
//! zero-based indices for tools that do not read `A1` addresses.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::report::FinalizedPage;
use crate::traits::*;
use crate::types::*;

#[derive(Serialize)]
struct CellRow<'a> {
    cell: String,
    row: u32,
    column: u32,
    kind: &'a str,
    value: String,
    style: &'a str,
}

/// Writes each finalized page to `<stem>-<n>.csv`
#[derive(Debug, Clone)]
pub struct CellCsvWriter {
    stem: PathBuf,
    written: Vec<PathBuf>,
}

impl CellCsvWriter {
    pub fn new(stem: impl Into<PathBuf>) -> Self {
        Self {
            stem: stem.into(),
            written: Vec::new(),
        }
    }

    /// Path the page with `target` is written to
    pub fn path_for(&self, target: &OutputTarget) -> PathBuf {
        PathBuf::from(target.file_name(&self.stem.to_string_lossy(), "csv"))
    }

    /// Files written so far, in page order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Write into a temporary file next to `path` and rename it into place,
    /// so a failed write never leaves a truncated page behind
    fn write_file(path: &Path, page: &FinalizedPage) -> ReportResult<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir)?;

        let mut writer = csv::Writer::from_writer(file.as_file_mut());
        for cell in &page.cells {
            let (row, column) = cell.address.zero_based();
            writer.serialize(CellRow {
                cell: cell.address.to_string(),
                row,
                column,
                kind: cell.value.kind(),
                value: cell.value.to_string(),
                style: cell.style.as_str(),
            })?;
        }
        writer.flush()?;
        drop(writer);

        file.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl DocumentSink for CellCsvWriter {
    fn write_page(&mut self, page: &FinalizedPage) -> ReportResult<()> {
        let path = self.path_for(&page.target);
        debug!("Writing {} cells to {}", page.cells.len(), path.display());
        Self::write_file(&path, page)?;
        self.written.push(path);
        Ok(())
    }
}
