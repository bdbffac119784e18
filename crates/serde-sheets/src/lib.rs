//! # serde-sheets
//!
//! Map serde records to spreadsheet rows and back.
//!
//! A record type implementing [`DataGrid`] gets a [`SpreadsheetSchema`]: one
//! column per leaf property, in declaration order, with nested structs
//! flattened under `/`-separated pointers such as `inner/b`. The schema
//! drives both directions:
//!
//! - writing lays out a header row at the origin and one data row per record
//! - reading maps every data row below the header back into a record
//!
//! ## Example
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_sheets::prelude::*;
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! impl DataGrid for Point {}
//!
//! let mapper = SpreadsheetMapper::new();
//! let points = vec![Point { x: 1, y: 2 }, Point { x: 3, y: 4 }];
//!
//! let mut sheet = Worksheet::new("Points");
//! mapper.write_values_to_sheet(&mut sheet, &points).unwrap();
//! assert_eq!(sheet.get_value_at(0, 0), CellValue::string("x"));
//!
//! let back: Vec<Point> = mapper.read_values_from_sheet(&sheet).unwrap();
//! assert_eq!(back, points);
//! ```

pub mod date;
pub mod de;
pub mod error;
pub mod features;
pub mod mapper;
pub mod prelude;
pub mod schema;
pub mod ser;
pub mod styles;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use date::{excel_date, excel_datetime, ExcelDate, ExcelDateTime};
pub use de::{SheetInput, SheetLocation};
pub use error::{Error, Result};
pub use features::{Feature, Features};
pub use mapper::{
    Builder, SheetMappingIterator, SpreadsheetMapper, SpreadsheetReader, SpreadsheetWriter,
};
pub use schema::{ColumnOptions, DataGrid, GridOptions, SpreadsheetSchema};
pub use ser::SheetOutput;
pub use styles::StylesBuilder;

// Re-export workbook model types
pub use serde_sheets_core::{CellAddress, CellError, CellValue, Workbook, Worksheet};
pub use serde_sheets_xlsx::{XlsxError, XlsxPackage, XlsxWriter};
