//! Type definitions for worksheet data

use std::fmt;

/// Cell styles the writer knows how to emit
///
/// The discriminant is the index of the matching `<xf>` entry in the
/// generated `styles.xml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellStyle {
    /// Default style - no formatting
    Default = 0,
    /// Date format (built-in format 14)
    DateDefault = 1,
    /// DateTime format (yyyy-mm-dd hh:mm:ss)
    DateTimestamp = 2,
    /// Elapsed time format ([h]:mm:ss)
    Duration = 3,
}

impl CellStyle {
    /// Get the style index for XML
    pub fn index(&self) -> u32 {
        *self as u32
    }
}

/// Represents a single cell value in an Excel worksheet
///
/// Only values travel between workbooks: formulas are read as their cached
/// result, and formatting other than date/time number formats is dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Empty cell
    Empty,
    /// String value
    String(String),
    /// Integer value
    Int(i64),
    /// Float value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// DateTime value (Excel serial date number)
    DateTime(f64),
    /// Duration value (Excel serial, fractional days)
    Duration(f64),
    /// Error value such as `#DIV/0!`
    Error(String),
}

impl CellValue {
    /// Convert cell value to string
    pub fn as_string(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::String(s) => s.clone(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::DateTime(d) => d.to_string(),
            CellValue::Duration(d) => d.to_string(),
            CellValue::Error(e) => e.clone(),
        }
    }

    /// Check if cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Style the writer applies to this value
    pub fn style(&self) -> CellStyle {
        match self {
            CellValue::DateTime(d) if d.fract() == 0.0 => CellStyle::DateDefault,
            CellValue::DateTime(_) => CellStyle::DateTimestamp,
            CellValue::Duration(_) => CellStyle::Duration,
            _ => CellStyle::Default,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

/// Convert a 0-based column index to its Excel letters (0 -> A, 25 -> Z, 26 -> AA)
pub fn column_letter(col: u32) -> String {
    let mut result = String::new();
    let mut col = col + 1;

    while col > 0 {
        col -= 1;
        result.insert(0, (b'A' + (col % 26) as u8) as char);
        col /= 26;
    }

    result
}

/// Represents a row of cells
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Row index (0-based, position in the source sheet)
    pub index: u32,
    /// Cells in this row
    pub cells: Vec<CellValue>,
}

impl Row {
    /// Create a new row
    pub fn new(index: u32, cells: Vec<CellValue>) -> Self {
        Row { index, cells }
    }

    /// Get cell at column index
    pub fn get(&self, col: usize) -> Option<&CellValue> {
        self.cells.get(col)
    }

    /// Get number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if row holds no value at all
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }

    /// Convert row to vector of strings
    pub fn to_strings(&self) -> Vec<String> {
        self.cells.iter().map(|c| c.as_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(701), "ZZ");
        assert_eq!(column_letter(702), "AAA");
    }

    #[test]
    fn test_date_styles() {
        assert_eq!(CellValue::DateTime(45000.0).style(), CellStyle::DateDefault);
        assert_eq!(CellValue::DateTime(45000.5).style(), CellStyle::DateTimestamp);
        assert_eq!(CellValue::Duration(1.25).style(), CellStyle::Duration);
        assert_eq!(CellValue::Int(3).style(), CellStyle::Default);
    }

    #[test]
    fn test_row_emptiness() {
        let row = Row::new(4, vec![CellValue::Empty, CellValue::Empty]);
        assert!(row.is_empty());
        assert_eq!(row.len(), 2);

        let row = Row::new(4, vec![CellValue::Empty, CellValue::Bool(false)]);
        assert!(!row.is_empty());
        assert_eq!(row.to_strings(), vec!["", "false"]);
    }
}
