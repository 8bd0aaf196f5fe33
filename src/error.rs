//! Error types for excelsplit

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for excelsplit operations
pub type Result<T> = std::result::Result<T, ExcelError>;

/// Main error type for reading, splitting and writing workbooks
#[derive(Error, Debug)]
pub enum ExcelError {
    /// Source path does not exist
    #[error("File '{}' does not exist", .0.display())]
    NotFound(PathBuf),

    /// Source path does not carry the `.xlsx` extension
    #[error("Unsupported format for '{}': only .xlsx files can be split", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Chunk size must hold at least one data row
    #[error("Rows per file must be at least 1, got {0}")]
    InvalidRowsPerFile(usize),

    /// Error occurred while reading Excel file
    #[error("Failed to read Excel file: {0}")]
    ReadError(String),

    /// Error occurred while writing Excel file
    #[error("Failed to write Excel file: {0}")]
    WriteError(String),

    /// Invalid sheet name or sheet not found
    #[error("Sheet '{sheet}' not found. Available sheets: {available}")]
    SheetNotFound { sheet: String, available: String },

    /// IO error wrapper
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Calamine error wrapper
    #[error("Calamine error: {0}")]
    CalamineError(String),
}

impl From<calamine::Error> for ExcelError {
    fn from(err: calamine::Error) -> Self {
        ExcelError::CalamineError(err.to_string())
    }
}

impl From<calamine::XlsxError> for ExcelError {
    fn from(err: calamine::XlsxError) -> Self {
        ExcelError::CalamineError(err.to_string())
    }
}

impl From<zip::result::ZipError> for ExcelError {
    fn from(err: zip::result::ZipError) -> Self {
        ExcelError::WriteError(err.to_string())
    }
}
