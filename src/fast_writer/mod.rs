//! Fast Excel writer optimized for streaming
//!
//! This module produces minimal single-sheet XLSX packages:
//! - Direct XML generation with reusable buffers
//! - Deduplicated shared strings
//! - Deflate-compressed ZIP entries with fixed timestamps

pub mod shared_strings;
pub mod workbook;
pub mod xml_writer;

pub use workbook::FastWorkbook;
