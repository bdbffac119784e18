//! # serde-sheets-xlsx
//!
//! XLSX (Office Open XML) reader and writer for serde-sheets.
//!
//! Two ways in:
//! - [`XlsxPackage`] opens a file lazily and hands out a [`SheetStreamReader`]
//!   per worksheet, which pull-parses the sheet part into
//!   [`SheetToken`](serde_sheets_core::SheetToken)s.
//! - [`XlsxReader`] loads every sheet into a
//!   [`Workbook`](serde_sheets_core::Workbook).
//!
//! [`XlsxWriter`] writes a whole workbook, styles included.

pub mod error;
pub mod package;
pub mod reader;
pub mod shared_strings;
pub mod writer;

mod styles;
mod text;

#[cfg(test)]
mod test_support;

pub use error::{XlsxError, XlsxResult};
pub use package::XlsxPackage;
pub use reader::{ColumnWidth, SheetStreamReader, XlsxReader};
pub use shared_strings::LazySharedStrings;
pub use writer::XlsxWriter;
