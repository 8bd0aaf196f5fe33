//! # excelsplit
//!
//! Split the first worksheet of a large XLSX workbook into several smaller
//! workbooks. Each output keeps the source header as its first row and
//! receives the next run of at most `rows_per_file` data rows.
//!
//! ## Features
//!
//! - **Typed copy**: text, numbers, booleans, dates, durations and error
//!   values are copied by value; dates keep a date number format
//! - **Streaming write**: chunks are written straight into the ZIP container
//! - **Deterministic output**: re-running on the same input rewrites
//!   byte-identical files with the same names
//! - **Typed errors**: missing files, wrong formats and I/O failures come back
//!   as [`ExcelError`] values
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use excelsplit::{SplitOptions, SplitOutcome, Splitter};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let splitter = Splitter::new(SplitOptions::new(1000)?);
//!
//! match splitter.split("merchants.xlsx")? {
//!     SplitOutcome::NotNeeded { total_rows } => {
//!         println!("{} rows fit in one file", total_rows);
//!     }
//!     SplitOutcome::Split { files, .. } => {
//!         for file in files {
//!             println!("{} ({} rows)", file.path.display(), file.data_rows);
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod fast_writer;
pub mod reader;
pub mod splitter;
pub mod types;
pub mod writer;

pub use error::{ExcelError, Result};
pub use reader::{ExcelReader, Worksheet};
pub use splitter::{
    split_file, ChunkFile, SplitEvent, SplitOptions, SplitOutcome, SplitThreshold, Splitter,
    DEFAULT_ROWS_PER_FILE,
};
pub use types::{CellStyle, CellValue, Row};
pub use writer::ExcelWriter;
