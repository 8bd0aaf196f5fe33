//! Excel file writing with streaming support
//!
//! Rows go straight to the ZIP entry as they are written; nothing but the
//! shared strings table is kept in memory.

use crate::error::Result;
use crate::fast_writer::FastWorkbook;
use crate::types::{CellValue, Row};
use std::path::Path;

/// Single-sheet Excel writer
///
/// # Examples
///
/// ```no_run
/// use excelsplit::writer::ExcelWriter;
/// use excelsplit::types::CellValue;
///
/// let mut writer = ExcelWriter::new("output.xlsx").unwrap();
/// writer.write_header(["Name", "Age"]).unwrap();
/// writer.write_row(&[CellValue::from("Alice"), CellValue::Int(30)]).unwrap();
/// writer.save().unwrap();
/// ```
pub struct ExcelWriter {
    inner: FastWorkbook,
    sheet_name: String,
}

impl ExcelWriter {
    /// Create a new Excel writer whose sheet is called `Sheet1`
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_sheet_name(path, "Sheet1")
    }

    /// Create a new Excel writer with a custom sheet name
    pub fn with_sheet_name<P: AsRef<Path>>(path: P, sheet_name: &str) -> Result<Self> {
        Ok(ExcelWriter {
            inner: FastWorkbook::new(path, sheet_name)?,
            sheet_name: sheet_name.to_string(),
        })
    }

    /// Write a row of typed values
    pub fn write_row(&mut self, cells: &[CellValue]) -> Result<()> {
        self.inner.write_row(cells)
    }

    /// Write every row yielded by `rows`, returning how many were written
    pub fn write_rows<I>(&mut self, rows: I) -> Result<usize>
    where
        I: IntoIterator<Item = Row>,
    {
        let mut written = 0;
        for row in rows {
            self.inner.write_row(&row.cells)?;
            written += 1;
        }
        Ok(written)
    }

    /// Write a row of text cells, typically column labels
    pub fn write_header<I, S>(&mut self, headers: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let cells: Vec<CellValue> = headers
            .into_iter()
            .map(|h| CellValue::String(h.as_ref().to_string()))
            .collect();
        self.inner.write_row(&cells)
    }

    /// Name of the sheet being written
    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Number of rows written so far, header included
    pub fn row_count(&self) -> u32 {
        self.inner.row_count()
    }

    /// Save and finalize the workbook
    ///
    /// This closes the ZIP file and ensures all data is written to disk.
    pub fn save(self) -> Result<()> {
        self.inner.close()
    }
}
