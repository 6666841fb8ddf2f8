//! Grid sinks the table layout is written to.
//!
//! A [`GridSink`] is any addressable 2D surface. Coordinates are 1-based,
//! like spreadsheet addressing. Two sinks are provided:
//!
//! - [`MemoryGrid`]: keeps cells in memory, used for console output and tests
//! - [`XlsxSink`]: writes cells to a worksheet saved as an `.xlsx` file

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use rust_xlsxwriter::{Workbook, Worksheet};
use serde::{Deserialize, Serialize};

use crate::error::XmlstatError;
use crate::Result;

/// Worksheet name used for spreadsheet output
pub const SHEET_NAME: &str = "XML Data";

/// The content of one grid cell: either text or an integer count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Names, headers, markers and ranges
    Text(String),
    /// Occurrence counts
    Count(u64),
}

impl CellValue {
    /// Create a text cell
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    /// Create a count cell
    pub fn count(value: u64) -> Self {
        CellValue::Count(value)
    }

    /// Text content, if this is a text cell
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            CellValue::Count(_) => None,
        }
    }

    /// Count, if this is a count cell
    pub fn as_count(&self) -> Option<u64> {
        match self {
            CellValue::Count(v) => Some(*v),
            CellValue::Text(_) => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<u64> for CellValue {
    fn from(value: u64) -> Self {
        CellValue::Count(value)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Count(v) => v.to_string(),
        };

        // Respect width and alignment from the formatter
        if let Some(width) = f.width() {
            if f.align() == Some(fmt::Alignment::Right) {
                write!(f, "{:>width$}", s, width = width)
            } else {
                write!(f, "{:<width$}", s, width = width)
            }
        } else {
            write!(f, "{}", s)
        }
    }
}

/// An addressable 2D surface. Rows and columns start at 1.
pub trait GridSink {
    /// Write `value` at (`row`, `column`), replacing any previous content.
    fn set_cell(&mut self, row: u32, column: u32, value: CellValue) -> Result<()>;
}

/// In-memory grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryGrid {
    cells: BTreeMap<(u32, u32), CellValue>,
}

impl MemoryGrid {
    /// Create an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell at (`row`, `column`), if written
    pub fn get(&self, row: u32, column: u32) -> Option<&CellValue> {
        self.cells.get(&(row, column))
    }

    /// Text at (`row`, `column`), if a text cell was written there
    pub fn text(&self, row: u32, column: u32) -> Option<&str> {
        self.get(row, column).and_then(CellValue::as_text)
    }

    /// Count at (`row`, `column`), if a count cell was written there
    pub fn count(&self, row: u32, column: u32) -> Option<u64> {
        self.get(row, column).and_then(CellValue::as_count)
    }

    /// Highest written row, or 0 for an empty grid
    pub fn max_row(&self) -> u32 {
        self.cells.keys().map(|&(row, _)| row).max().unwrap_or(0)
    }

    /// Highest written column, or 0 for an empty grid
    pub fn max_column(&self) -> u32 {
        self.cells.keys().map(|&(_, col)| col).max().unwrap_or(0)
    }

    /// All cells of one column, in row order
    pub fn column(&self, column: u32) -> Vec<(u32, &CellValue)> {
        self.cells
            .iter()
            .filter(|&(&(_, col), _)| col == column)
            .map(|(&(row, _), value)| (row, value))
            .collect()
    }

    /// Number of written cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True when nothing was written
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate cells in (row, column) order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, &CellValue)> {
        self.cells.iter().map(|(&(row, col), value)| (row, col, value))
    }
}

impl GridSink for MemoryGrid {
    fn set_cell(&mut self, row: u32, column: u32, value: CellValue) -> Result<()> {
        if row == 0 || column == 0 {
            return Err(XmlstatError::InvalidCell { row, column });
        }
        self.cells.insert((row, column), value);
        Ok(())
    }
}

/// Spreadsheet sink backed by a single worksheet.
pub struct XlsxSink {
    worksheet: Worksheet,
}

impl XlsxSink {
    /// Create a sink with one worksheet named [`SHEET_NAME`].
    pub fn new() -> Result<Self> {
        let mut worksheet = Worksheet::new();
        worksheet.set_name(SHEET_NAME)?;
        Ok(Self { worksheet })
    }

    /// Save the worksheet as a workbook at `path`.
    pub fn save(mut self, path: impl AsRef<Path>) -> Result<()> {
        self.worksheet.autofit();
        let mut workbook = Workbook::new();
        workbook.push_worksheet(self.worksheet);
        workbook.save(path.as_ref())?;
        Ok(())
    }
}

impl GridSink for XlsxSink {
    fn set_cell(&mut self, row: u32, column: u32, value: CellValue) -> Result<()> {
        // Worksheet cells are 0-based.
        let (Some(r), Some(c)) = (
            row.checked_sub(1),
            column.checked_sub(1).and_then(|c| u16::try_from(c).ok()),
        ) else {
            return Err(XmlstatError::InvalidCell { row, column });
        };

        match value {
            CellValue::Text(s) => {
                self.worksheet.write_string(r, c, s.as_str())?;
            }
            CellValue::Count(n) => {
                self.worksheet.write_number(r, c, n as f64)?;
            }
        }
        Ok(())
    }
}

/// Copy every cell of `grid` into a new workbook saved at `path`.
pub fn save_xlsx(grid: &MemoryGrid, path: impl AsRef<Path>) -> Result<()> {
    let mut sink = XlsxSink::new()?;
    for (row, column, value) in grid.iter() {
        sink.set_cell(row, column, value.clone())?;
    }
    sink.save(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_grid_set_and_get() {
        let mut grid = MemoryGrid::new();
        grid.set_cell(1, 1, "Tag".into()).unwrap();
        grid.set_cell(2, 2, 5u64.into()).unwrap();
        grid.set_cell(2, 2, 6u64.into()).unwrap();

        assert_eq!(grid.text(1, 1), Some("Tag"));
        assert_eq!(grid.count(2, 2), Some(6));
        assert_eq!(grid.text(2, 2), None);
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.max_row(), 2);
        assert_eq!(grid.max_column(), 2);
    }

    #[test]
    fn test_memory_grid_rejects_zero() {
        let mut grid = MemoryGrid::new();
        let err = grid.set_cell(0, 1, "x".into()).unwrap_err();
        assert!(matches!(err, XmlstatError::InvalidCell { row: 0, column: 1 }));
    }

    #[test]
    fn test_memory_grid_column() {
        let mut grid = MemoryGrid::new();
        grid.set_cell(2, 3, "b".into()).unwrap();
        grid.set_cell(1, 3, "a".into()).unwrap();
        grid.set_cell(1, 4, 1u64.into()).unwrap();

        let col: Vec<(u32, String)> = grid
            .column(3)
            .into_iter()
            .map(|(row, v)| (row, v.to_string()))
            .collect();
        assert_eq!(col, vec![(1, "a".to_string()), (2, "b".to_string())]);
    }

    #[test]
    fn test_cell_value_display_alignment() {
        assert_eq!(format!("{:>4}", CellValue::count(7)), "   7");
        assert_eq!(format!("{:<4}|", CellValue::text("ab")), "ab  |");
        assert_eq!(format!("{}", CellValue::text("x")), "x");
    }

    #[test]
    fn test_xlsx_sink_rejects_zero() {
        let mut sink = XlsxSink::new().unwrap();
        assert!(sink.set_cell(1, 0, "x".into()).is_err());
        assert!(sink.set_cell(1, 1, "x".into()).is_ok());
    }

    #[test]
    fn test_save_xlsx_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");

        let mut grid = MemoryGrid::new();
        grid.set_cell(1, 1, "Tag".into()).unwrap();
        grid.set_cell(1, 2, "Count".into()).unwrap();
        grid.set_cell(2, 1, "empty".into()).unwrap();
        grid.set_cell(2, 2, 1u64.into()).unwrap();
        save_xlsx(&grid, &path).unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
    }
}
