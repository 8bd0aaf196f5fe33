//! Excel file reading backed by calamine
//!
//! The whole worksheet range is loaded once; rows are then materialized on
//! demand as typed [`Row`] values.

use crate::error::{ExcelError, Result};
use crate::types::{CellValue, Row};
use calamine::{open_workbook, Data, Range, Reader, Xlsx, XlsxError};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// XLSX reader
pub struct ExcelReader {
    workbook: Xlsx<BufReader<File>>,
}

impl ExcelReader {
    /// Open an XLSX file for reading
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use excelsplit::reader::ExcelReader;
    ///
    /// let reader = ExcelReader::open("data.xlsx").unwrap();
    /// println!("Sheets: {:?}", reader.sheet_names());
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let workbook: Xlsx<_> =
            open_workbook(path).map_err(|e: XlsxError| ExcelError::ReadError(e.to_string()))?;

        Ok(ExcelReader { workbook })
    }

    /// Get list of sheet names in the workbook
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    /// Get the number of sheets in the workbook
    pub fn sheet_count(&self) -> usize {
        self.workbook.sheet_names().len()
    }

    /// Load the first worksheet of the workbook
    pub fn first_worksheet(&mut self) -> Result<Worksheet> {
        let name = self
            .workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ExcelError::SheetNotFound {
                sheet: "index 0".to_string(),
                available: String::new(),
            })?;

        self.worksheet(&name)
    }

    /// Load a worksheet by name
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use excelsplit::reader::ExcelReader;
    ///
    /// let mut reader = ExcelReader::open("data.xlsx").unwrap();
    /// let sheet = reader.worksheet("Sheet1").unwrap();
    /// println!("{} rows", sheet.row_count());
    /// ```
    pub fn worksheet(&mut self, sheet_name: &str) -> Result<Worksheet> {
        let range = self
            .workbook
            .worksheet_range(sheet_name)
            .map_err(|e| match e {
                XlsxError::WorksheetNotFound(_) => ExcelError::SheetNotFound {
                    sheet: sheet_name.to_string(),
                    available: self.sheet_names().join(", "),
                },
                other => ExcelError::from(other),
            })?;

        Ok(Worksheet {
            name: sheet_name.to_string(),
            range,
        })
    }
}

/// A loaded worksheet
///
/// Row and column indexes are absolute sheet positions (0-based), so row 0
/// is always the sheet's first row even when the used range starts lower.
pub struct Worksheet {
    name: String,
    range: Range<Data>,
}

impl Worksheet {
    /// Sheet name as stored in the workbook
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rows up to and including the last row holding data
    pub fn row_count(&self) -> usize {
        self.range.end().map(|(r, _)| r as usize + 1).unwrap_or(0)
    }

    /// Number of columns up to and including the last column holding data
    pub fn column_count(&self) -> usize {
        self.range.end().map(|(_, c)| c as usize + 1).unwrap_or(0)
    }

    /// Read one row at the sheet's used width
    pub fn row(&self, index: usize) -> Row {
        let cells = (0..self.column_count())
            .map(|col| {
                self.range
                    .get_value((index as u32, col as u32))
                    .map(datatype_to_cellvalue)
                    .unwrap_or(CellValue::Empty)
            })
            .collect();

        Row::new(index as u32, cells)
    }

    /// Iterate over a contiguous range of rows
    pub fn rows(&self, rows: std::ops::Range<usize>) -> impl Iterator<Item = Row> + '_ {
        rows.map(move |index| self.row(index))
    }
}

/// Convert calamine Data to our CellValue
fn datatype_to_cellvalue(dt: &Data) -> CellValue {
    match dt {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Float(f) => CellValue::Float(*f),
        Data::Int(i) => CellValue::Int(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(d) if d.is_duration() => CellValue::Duration(d.as_f64()),
        Data::DateTime(d) => CellValue::DateTime(
            d.as_datetime()
                .and_then(datetime_to_serial)
                .unwrap_or_else(|| d.as_f64()),
        ),
        Data::Error(e) => CellValue::Error(e.to_string()),
        Data::DateTimeIso(s) => iso_to_serial(s)
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::String(s.clone())),
        Data::DurationIso(s) => CellValue::String(s.clone()),
    }
}

/// Convert an ISO 8601 date, datetime or time to an Excel serial number
fn iso_to_serial(s: &str) -> Option<f64> {
    let datetime = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        });

    if let Some(dt) = datetime {
        return datetime_to_serial(dt);
    }

    let time = NaiveTime::parse_from_str(s, "%H:%M:%S%.f").ok()?;
    let midnight = NaiveTime::from_hms_opt(0, 0, 0)?;
    let millis = (time - midnight).num_milliseconds();
    Some(millis as f64 / MILLIS_PER_DAY)
}

/// Convert a calendar datetime to a serial number in the 1900 date system
///
/// Excel counts a non-existent 1900-02-29, so serials before 1900-03-01 sit
/// one day below the plain distance from 1899-12-30.
fn datetime_to_serial(dt: NaiveDateTime) -> Option<f64> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let days = (dt - epoch).num_milliseconds() as f64 / MILLIS_PER_DAY;

    Some(if days < 61.0 { days - 1.0 } else { days })
}

const MILLIS_PER_DAY: f64 = 86_400_000.0;
