//! Report sheet layout: section positions, capacities and cell rendering
//!
//! Everything that depends on the physical shape of the expense form lives
//! here so that a revised form only needs a new [`ReportLayout`].

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::config::ReportConfig;
use crate::report::DailyExpenses;
use crate::types::*;

/// Spreadsheet address in `A1` notation, limited to columns `A` to `Z`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellAddress {
    column: char,
    row: u32,
}

impl CellAddress {
    /// Create an address; `row` is one-based as shown in a spreadsheet
    pub fn new(column: char, row: u32) -> ReportResult<Self> {
        if !column.is_ascii_uppercase() {
            return Err(ReportError::Validation(format!(
                "Cell column must be a single letter A-Z, got '{}'",
                column
            )));
        }
        if row == 0 {
            return Err(ReportError::Validation(
                "Cell rows start at 1".to_string(),
            ));
        }
        Ok(Self { column, row })
    }

    pub fn column(&self) -> char {
        self.column
    }

    pub fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based `(row, column)` indices as used by spreadsheet writers
    pub fn zero_based(&self) -> (u32, u32) {
        (self.row - 1, self.column as u32 - 'A' as u32)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column, self.row)
    }
}

impl FromStr for CellAddress {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let column = chars
            .next()
            .ok_or_else(|| ReportError::Validation("Empty cell address".to_string()))?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ReportError::Validation(format!("Invalid cell address: {}", s)));
        }
        let row: u32 = digits
            .parse()
            .map_err(|_| ReportError::Validation(format!("Invalid cell address: {}", s)))?;
        Self::new(column, row)
    }
}

impl TryFrom<String> for CellAddress {
    type Error = ReportError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CellAddress> for String {
    fn from(address: CellAddress) -> Self {
        address.to_string()
    }
}

/// How a value should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellStyle {
    Text,
    /// Bold, two decimals
    Currency,
}

impl CellStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellStyle::Text => "text",
            CellStyle::Currency => "currency",
        }
    }
}

/// Value written into a cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Text(String),
    Number(BigDecimal),
    /// Formula body without the leading `=`
    Formula(String),
}

impl CellValue {
    pub fn kind(&self) -> &'static str {
        match self {
            CellValue::Text(_) => "text",
            CellValue::Number(_) => "number",
            CellValue::Formula(_) => "formula",
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(text) => f.write_str(text),
            CellValue::Number(number) => write!(f, "{}", number),
            CellValue::Formula(formula) => f.write_str(formula),
        }
    }
}

/// One `(location, value, style)` triple handed to a document sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub address: CellAddress,
    pub value: CellValue,
    pub style: CellStyle,
}

impl Cell {
    pub fn text(address: CellAddress, text: impl Into<String>) -> Self {
        Self {
            address,
            value: CellValue::Text(text.into()),
            style: CellStyle::Text,
        }
    }

    pub fn currency(address: CellAddress, amount: BigDecimal) -> Self {
        Self {
            address,
            value: CellValue::Number(amount),
            style: CellStyle::Currency,
        }
    }

    pub fn formula(address: CellAddress, formula: impl Into<String>) -> Self {
        Self {
            address,
            value: CellValue::Formula(formula.into()),
            style: CellStyle::Currency,
        }
    }
}

/// Position and capacity of one report section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionLayout {
    /// Spreadsheet row of the first entry
    pub first_row: u32,
    /// Rows printed on the form for this section
    pub rows: usize,
    /// Maximum number of rows filled per page, at most `rows`
    pub capacity: usize,
}

impl SectionLayout {
    /// A section whose capacity is every printed row
    pub fn new(first_row: u32, rows: usize) -> Self {
        Self {
            first_row,
            rows,
            capacity: rows,
        }
    }

    /// Row just past the printed section
    pub fn end_row(&self) -> u32 {
        self.first_row + self.rows as u32
    }

    fn validate(&self, name: &str) -> ReportResult<()> {
        if self.first_row == 0 {
            return Err(ReportError::Validation(format!(
                "The {} section cannot start at row 0",
                name
            )));
        }
        if self.capacity > self.rows {
            return Err(ReportError::Validation(format!(
                "The {} section has {} rows on the form, capacity {} does not fit",
                name, self.rows, self.capacity
            )));
        }
        Ok(())
    }

    /// Spreadsheet row for the zero-based entry index
    pub fn row(&self, index: usize) -> u32 {
        self.first_row + index as u32
    }
}

/// Addresses of the header and summary fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderCells {
    pub business_purpose: CellAddress,
    pub name: CellAddress,
    pub department: CellAddress,
    pub period_covered: CellAddress,
    pub currency: CellAddress,
    pub total_caption: CellAddress,
    pub reimbursement_captions: Vec<CellAddress>,
    pub signing_date: CellAddress,
}

/// Complete description of an expense report form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLayout {
    pub travel: SectionLayout,
    pub entertainment: SectionLayout,
    pub miscellaneous: SectionLayout,
    /// Column of each travel-type category
    pub travel_columns: BTreeMap<ExpenseCategory, char>,
    pub header: HeaderCells,
    /// Summary formulas rewritten onto every page
    pub formulas: Vec<Cell>,
}

impl ReportLayout {
    /// The reference form, revision 3
    pub fn v3() -> Self {
        let travel_columns = [
            (ExpenseCategory::Breakfast, 'C'),
            (ExpenseCategory::Lunch, 'D'),
            (ExpenseCategory::Dinner, 'E'),
            (ExpenseCategory::Hotel, 'G'),
            (ExpenseCategory::Air, 'H'),
            (ExpenseCategory::Rail, 'I'),
            (ExpenseCategory::CarRental, 'J'),
            (ExpenseCategory::Taxi, 'K'),
            (ExpenseCategory::ParkingToll, 'L'),
            (ExpenseCategory::Phone, 'M'),
            (ExpenseCategory::Other, 'N'),
        ]
        .into_iter()
        .collect();

        Self {
            travel: SectionLayout::new(6, 8),
            entertainment: SectionLayout::new(18, 8),
            miscellaneous: SectionLayout::new(30, 11),
            travel_columns,
            header: HeaderCells {
                business_purpose: addr('H', 1),
                name: addr('M', 1),
                department: addr('N', 2),
                period_covered: addr('N', 3),
                currency: addr('O', 29),
                total_caption: addr('B', 44),
                reimbursement_captions: vec![addr('E', 44), addr('G', 44)],
                signing_date: addr('E', 48),
            },
            formulas: v3_formulas(),
        }
    }

    /// Same form with different section capacities
    ///
    /// A capacity may shrink a section but never grow it past the rows
    /// the form prints for it.
    pub fn with_capacities(
        mut self,
        travel: usize,
        entertainment: usize,
        miscellaneous: usize,
    ) -> ReportResult<Self> {
        self.travel.capacity = travel;
        self.entertainment.capacity = entertainment;
        self.miscellaneous.capacity = miscellaneous;
        self.validate()?;
        Ok(self)
    }

    /// Check that every section fits its printed rows and that sections
    /// do not overlap
    pub fn validate(&self) -> ReportResult<()> {
        let sections = [
            ("travel", &self.travel),
            ("entertainment", &self.entertainment),
            ("miscellaneous", &self.miscellaneous),
        ];
        for (name, section) in sections {
            section.validate(name)?;
        }
        for pair in sections.windows(2) {
            let (name, upper) = pair[0];
            let (next, lower) = pair[1];
            if upper.end_row() > lower.first_row {
                return Err(ReportError::Validation(format!(
                    "The {} section runs into the {} section at row {}",
                    name, next, lower.first_row
                )));
            }
        }
        Ok(())
    }

    /// Cells for one merged day of travel spending
    pub fn travel_row(&self, index: usize, day: &DailyExpenses) -> Vec<Cell> {
        let row = self.travel.row(index);
        let mut cells = vec![
            Cell::text(addr('A', row), day.date.to_string()),
            Cell::text(addr('B', row), day.description.clone()),
        ];
        for (category, column) in &self.travel_columns {
            if let Some(amount) = day.amounts.get(category) {
                cells.push(Cell::currency(addr(*column, row), amount.clone()));
            }
        }
        cells
    }

    /// Cells for one entertainment slot
    pub fn entertainment_row(&self, index: usize, expense: &Expense, config: &ReportConfig) -> Vec<Cell> {
        let row = self.entertainment.row(index);
        vec![
            Cell::text(addr('A', row), expense.date.to_string()),
            Cell::text(addr('B', row), config.business_purpose.clone()),
            Cell::text(addr('D', row), expense.description.clone()),
            Cell::text(addr('J', row), expense.merchant.clone()),
            Cell::currency(addr('P', row), expense.amount.clone()),
        ]
    }

    /// Cells for one miscellaneous slot
    pub fn miscellaneous_row(&self, index: usize, expense: &Expense, config: &ReportConfig) -> Vec<Cell> {
        let row = self.miscellaneous.row(index);
        vec![
            Cell::text(addr('A', row), expense.date.to_string()),
            Cell::text(
                addr('B', row),
                format!("{}: {}", expense.merchant, expense.description),
            ),
            Cell::text(addr('F', row), config.department.clone()),
            Cell::currency(addr('H', row), expense.amount.clone()),
        ]
    }

    /// Header and summary fields
    pub fn header_cells(
        &self,
        config: &ReportConfig,
        low: NaiveDate,
        high: NaiveDate,
        signing_date: NaiveDate,
    ) -> Vec<Cell> {
        let currency = &config.home_currency;
        let mut cells = vec![
            Cell::text(self.header.currency, currency.clone()),
            Cell::text(
                self.header.total_caption,
                format!("TOTAL EXPENSE {}", currency),
            ),
        ];
        for caption in &self.header.reimbursement_captions {
            cells.push(Cell::text(
                *caption,
                format!("Not Applicable - Reimbursement in {}", currency),
            ));
        }
        cells.extend([
            Cell::text(self.header.business_purpose, config.business_purpose.clone()),
            Cell::text(self.header.name, config.reporter_name.clone()),
            Cell::text(self.header.department, config.department.clone()),
            Cell::text(self.header.period_covered, format!("{} to {}", low, high)),
            Cell::text(self.header.signing_date, signing_date.to_string()),
        ]);
        cells
    }
}

impl Default for ReportLayout {
    fn default() -> Self {
        Self::v3()
    }
}

// Only called with literal letters and positive rows.
fn addr(column: char, row: u32) -> CellAddress {
    CellAddress { column, row }
}

fn column_offset(base: char, offset: u32) -> char {
    char::from(base as u8 + offset as u8)
}

/// Summary formulas of the revision 3 form
fn v3_formulas() -> Vec<Cell> {
    let mut formulas = Vec::new();

    for row in 6..14 {
        formulas.push(Cell::formula(addr('P', row), format!("SUM(G{row}:O{row})")));
        formulas.push(Cell::formula(addr('F', row), format!("SUM(C{row}:E{row})")));
    }
    for column in 'F'..='P' {
        formulas.push(Cell::formula(
            addr(column, 14),
            format!("SUM({column}6:{column}13)"),
        ));
    }
    formulas.push(Cell::formula(addr('P', 26), "SUM(P18:P25)"));
    for column in ['H', 'L', 'O'] {
        formulas.push(Cell::formula(
            addr(column, 41),
            format!("SUM({column}30:{column}40)"),
        ));
    }

    // Summary block pulls the travel column totals
    for row in 30..35 {
        let source = column_offset('F', row - 30);
        formulas.push(Cell::formula(addr('L', row), format!("{source}14")));
    }
    formulas.push(Cell::formula(addr('L', 35), "K14+L14"));
    formulas.push(Cell::formula(addr('L', 36), "M14"));
    formulas.push(Cell::formula(addr('L', 37), "N14+O14"));
    formulas.push(Cell::formula(addr('L', 38), "P26"));
    formulas.push(Cell::formula(addr('L', 39), "P52"));
    formulas.push(Cell::formula(addr('L', 40), "H41"));
    for row in 30..41 {
        formulas.push(Cell::formula(addr('O', row), format!("L{row}*N{row}")));
    }
    formulas.push(Cell::formula(addr('C', 44), "L41"));

    formulas
}
