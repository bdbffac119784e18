//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellValue`] - The value stored in a cell
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`CellData`] - A stored cell: value plus style index

mod address;
mod value;

pub use address::CellAddress;
pub use value::{CellError, CellValue};

/// A stored cell
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellData {
    /// Cell value
    pub value: CellValue,
    /// Index into the owning worksheet's style pool (0 = default style)
    pub style_index: u32,
}

impl CellData {
    /// Create a cell with the default style
    pub fn new(value: CellValue) -> Self {
        Self {
            value,
            style_index: 0,
        }
    }
}
