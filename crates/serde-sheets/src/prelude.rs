//! Prelude module - common imports for serde-sheets users
//!
//! ```rust
//! use serde_sheets::prelude::*;
//! ```

pub use crate::{
    // Cell types
    CellAddress,
    CellValue,

    // Schema
    ColumnOptions,
    DataGrid,
    GridOptions,

    // Dates
    ExcelDate,
    ExcelDateTime,

    // Error types
    Error,
    Feature,
    Result,

    // I/O types
    SheetInput,
    SheetOutput,

    // Main types
    SpreadsheetMapper,
    SpreadsheetSchema,
    StylesBuilder,
    Workbook,
    Worksheet,
};
