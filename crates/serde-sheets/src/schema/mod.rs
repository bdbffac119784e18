//! Spreadsheet schemas
//!
//! A [`SpreadsheetSchema`] lists the columns of a record type in sheet order
//! and anchors them at an origin cell: the header row sits on the origin row
//! and data starts on the row below.

mod column;
mod generator;
mod options;
mod pointer;
mod resolver;
mod trace;

pub use column::{Column, ColumnType};
pub use generator::SchemaGenerator;
pub use options::{ColumnOptions, DataGrid, GridOptions, OptBool};
pub use pointer::ColumnPointer;
pub use resolver::{AnnotatedNameResolver, ColumnNameResolver, ColumnProperty, NullNameResolver};

use serde_sheets_core::{CellAddress, Worksheet};

use crate::styles::{Styles, StylesBuilder};

/// Schema type name used in messages
pub const SCHEMA_TYPE: &str = "spreadsheet";

/// Columns of a record type anchored at an origin cell
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadsheetSchema {
    columns: Vec<Column>,
    styles_builder: StylesBuilder,
    origin: CellAddress,
}

impl SpreadsheetSchema {
    pub fn new(columns: Vec<Column>, styles_builder: StylesBuilder, origin: CellAddress) -> Self {
        Self {
            columns,
            styles_builder,
            origin,
        }
    }

    pub fn schema_type(&self) -> &'static str {
        SCHEMA_TYPE
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Column> {
        self.columns.iter()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column shown in sheet column `col`
    pub fn column(&self, col: u16) -> Option<&Column> {
        let offset = col.checked_sub(self.origin.col)?;
        self.columns.get(offset as usize)
    }

    pub fn origin(&self) -> CellAddress {
        self.origin
    }

    pub fn origin_row(&self) -> u32 {
        self.origin.row
    }

    pub fn origin_column(&self) -> u16 {
        self.origin.col
    }

    /// First row holding data
    pub fn data_row(&self) -> u32 {
        self.origin.row + 1
    }

    /// Sheet column of the first column matching `pointer`
    pub fn column_index_of(&self, pointer: &ColumnPointer) -> Option<u16> {
        self.columns
            .iter()
            .position(|c| c.matches(pointer))
            .map(|i| self.origin.col + i as u16)
    }

    /// Columns under `filter`; all columns for the empty pointer
    pub fn columns_under(&self, filter: &ColumnPointer) -> Vec<&Column> {
        if filter.is_empty() {
            return self.columns.iter().collect();
        }
        self.columns
            .iter()
            .filter(|c| c.pointer().starts_with(filter))
            .collect()
    }

    pub fn is_in_row_bounds(&self, row: u32) -> bool {
        row >= self.data_row()
    }

    pub fn is_in_column_bounds(&self, col: u16) -> bool {
        let start = self.origin.col as usize;
        let col = col as usize;
        start <= col && col < start + self.columns.len()
    }

    pub fn styles_builder(&self) -> &StylesBuilder {
        &self.styles_builder
    }

    /// Pool the schema's styles into `sheet`
    pub fn build_styles(&self, sheet: &mut Worksheet) -> Styles {
        self.styles_builder.build(sheet)
    }
}

impl<'a> IntoIterator for &'a SpreadsheetSchema {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn schema(origin: CellAddress) -> SpreadsheetSchema {
        let column = |path: &str, array: bool| {
            Column::new(
                ColumnPointer::parse(path),
                ColumnOptions::default(),
                ColumnType::Integer,
                array,
            )
        };
        SpreadsheetSchema::new(
            vec![
                column("a", false),
                column("inner/b", false),
                column("inner/tags/[]", true),
            ],
            StylesBuilder::new(),
            origin,
        )
    }

    #[test]
    fn test_column_lookup() {
        let schema = schema(CellAddress::new(1, 1));
        assert_eq!(schema.data_row(), 2);
        assert!(schema.column(0).is_none());
        assert_eq!(schema.column(1).unwrap().pointer().to_string(), "a");
        assert_eq!(schema.column(3).unwrap().pointer().to_string(), "inner/tags/[]");
        assert!(schema.column(4).is_none());
    }

    #[test]
    fn test_column_index_of() {
        let schema = schema(CellAddress::new(1, 1));
        assert_eq!(schema.column_index_of(&ColumnPointer::parse("inner/b")), Some(2));
        assert_eq!(schema.column_index_of(&ColumnPointer::parse("inner/tags")), Some(3));
        assert_eq!(schema.column_index_of(&ColumnPointer::parse("inner")), None);
    }

    #[test]
    fn test_bounds() {
        let schema = schema(CellAddress::new(1, 1));
        assert!(!schema.is_in_row_bounds(1));
        assert!(schema.is_in_row_bounds(2));
        assert!(!schema.is_in_column_bounds(0));
        assert!(schema.is_in_column_bounds(1));
        assert!(schema.is_in_column_bounds(3));
        assert!(!schema.is_in_column_bounds(4));
    }

    #[test]
    fn test_columns_under() {
        let schema = schema(CellAddress::A1);
        assert_eq!(schema.columns_under(&ColumnPointer::empty()).len(), 3);
        let inner: Vec<String> = schema
            .columns_under(&ColumnPointer::parse("inner"))
            .iter()
            .map(|c| c.pointer().to_string())
            .collect();
        assert_eq!(inner, vec!["inner/b", "inner/tags/[]"]);
    }
}
