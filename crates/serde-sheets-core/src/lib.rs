//! # serde-sheets-core
//!
//! Core workbook model used by the serde-sheets mapper.
//!
//! This crate provides the types shared by the XLSX backend and the mapper:
//! - [`CellValue`] - Represents cell values (numbers, strings, booleans, errors)
//! - [`CellAddress`] - Cell addressing in A1 notation
//! - [`Style`] and [`StylePool`] - Cell formatting
//! - [`Workbook`], [`Worksheet`] - The in-memory document
//! - [`SheetToken`] - The token protocol of streaming sheet readers
//!
//! ## Example
//!
//! ```rust
//! use serde_sheets_core::{CellValue, Workbook};
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//!
//! sheet.set_cell_value_at(0, 0, "Hello").unwrap();
//! sheet.set_cell_value_at(0, 1, 42.0).unwrap();
//!
//! assert_eq!(sheet.get_value_at(0, 1), CellValue::Number(42.0));
//! ```

pub mod cell;
pub mod error;
pub mod style;
pub mod token;
pub mod workbook;
pub mod worksheet;

// Re-exports for convenience
pub use cell::{CellAddress, CellData, CellError, CellValue};
pub use error::{Error, Result};
pub use token::SheetToken;
pub use workbook::{Workbook, WorkbookSettings};
pub use worksheet::Worksheet;

pub use style::{
    Alignment, BorderEdge, BorderLineStyle, BorderStyle, Color, FillStyle, FontStyle,
    FontVerticalAlign, HorizontalAlignment, NumberFormat, PatternType, Protection, Style,
    StylePool, Underline, VerticalAlignment,
};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
