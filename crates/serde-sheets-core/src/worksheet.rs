//! Worksheet type

use std::collections::BTreeMap;

use crate::cell::{CellAddress, CellData, CellValue};
use crate::error::{Error, Result};
use crate::style::{Style, StylePool};
use crate::{MAX_COLS, MAX_ROWS};

/// Default column width in characters
pub const DEFAULT_COLUMN_WIDTH: f64 = 8.43;

/// A worksheet (single sheet in a workbook)
///
/// Cells are stored row-major in sorted maps so that rows and cells come out
/// in sheet order, which is what the XLSX writer and the sheet replay reader
/// both need.
#[derive(Debug, Clone)]
pub struct Worksheet {
    /// Sheet name
    name: String,
    /// Cells keyed by row, then column
    rows: BTreeMap<u32, BTreeMap<u16, CellData>>,
    /// Styles referenced by cells
    styles: StylePool,
    /// Column widths in characters
    column_widths: BTreeMap<u16, f64>,
}

impl Worksheet {
    /// Create a new worksheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            rows: BTreeMap::new(),
            styles: StylePool::new(),
            column_widths: BTreeMap::new(),
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    // === Cell Access ===

    /// Get a cell by address string (e.g., "A1")
    pub fn cell(&self, address: &str) -> Result<Option<&CellData>> {
        let addr = CellAddress::parse(address)?;
        Ok(self.cell_at(addr.row, addr.col))
    }

    /// Get a cell by row and column indices
    pub fn cell_at(&self, row: u32, col: u16) -> Option<&CellData> {
        self.rows.get(&row).and_then(|cells| cells.get(&col))
    }

    /// Get cell value by address string
    pub fn get_value(&self, address: &str) -> Result<CellValue> {
        let addr = CellAddress::parse(address)?;
        Ok(self.get_value_at(addr.row, addr.col))
    }

    /// Get cell value by indices
    pub fn get_value_at(&self, row: u32, col: u16) -> CellValue {
        self.cell_at(row, col)
            .map(|c| c.value.clone())
            .unwrap_or(CellValue::Empty)
    }

    /// Get a cell's style index; 0 when the cell does not exist
    pub fn cell_style_index_at(&self, row: u32, col: u16) -> u32 {
        self.cell_at(row, col).map(|c| c.style_index).unwrap_or(0)
    }

    /// Get a style by its index in this worksheet's style pool
    pub fn style_by_index(&self, style_index: u32) -> Option<&Style> {
        self.styles.get(style_index)
    }

    /// Get the non-default style applied to a cell, if any
    pub fn cell_style_at(&self, row: u32, col: u16) -> Option<&Style> {
        match self.cell_style_index_at(row, col) {
            0 => None,
            idx => self.style_by_index(idx),
        }
    }

    /// The worksheet's style pool
    pub fn style_pool(&self) -> &StylePool {
        &self.styles
    }

    // === Cell Modification ===

    /// Set a cell value by address string
    pub fn set_cell_value<V: Into<CellValue>>(&mut self, address: &str, value: V) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_cell_value_at(addr.row, addr.col, value)
    }

    /// Set a cell value by row and column indices, keeping the cell's style
    pub fn set_cell_value_at<V: Into<CellValue>>(
        &mut self,
        row: u32,
        col: u16,
        value: V,
    ) -> Result<()> {
        validate_cell_position(row, col)?;
        self.rows
            .entry(row)
            .or_default()
            .entry(col)
            .or_default()
            .value = value.into();
        Ok(())
    }

    /// Add a style to the pool and return its index
    pub fn add_style(&mut self, style: Style) -> u32 {
        self.styles.get_or_insert(style)
    }

    /// Apply a pooled style to a cell
    pub fn set_cell_style_index_at(&mut self, row: u32, col: u16, style_index: u32) -> Result<()> {
        validate_cell_position(row, col)?;
        if self.styles.get(style_index).is_none() {
            return Err(Error::InvalidStyleIndex(style_index));
        }
        self.rows
            .entry(row)
            .or_default()
            .entry(col)
            .or_default()
            .style_index = style_index;
        Ok(())
    }

    /// Set a cell style by row and column indices
    pub fn set_cell_style_at(&mut self, row: u32, col: u16, style: &Style) -> Result<()> {
        let style_index = self.add_style(style.clone());
        self.set_cell_style_index_at(row, col, style_index)
    }

    /// Clear a cell by indices
    pub fn clear_cell_at(&mut self, row: u32, col: u16) {
        if let Some(cells) = self.rows.get_mut(&row) {
            cells.remove(&col);
            if cells.is_empty() {
                self.rows.remove(&row);
            }
        }
    }

    // === Row/Column Operations ===

    /// Iterate over rows in order, each with its cells in column order
    pub fn rows(&self) -> impl Iterator<Item = (u32, &BTreeMap<u16, CellData>)> {
        self.rows.iter().map(|(row, cells)| (*row, cells))
    }

    /// Index of the first stored row
    pub fn first_row(&self) -> Option<u32> {
        self.rows.keys().next().copied()
    }

    /// Index of the last stored row
    pub fn last_row(&self) -> Option<u32> {
        self.rows.keys().next_back().copied()
    }

    /// Get column width in characters
    pub fn column_width(&self, col: u16) -> f64 {
        self.column_widths
            .get(&col)
            .copied()
            .unwrap_or(DEFAULT_COLUMN_WIDTH)
    }

    /// Set column width in characters
    pub fn set_column_width(&mut self, col: u16, width: f64) {
        self.column_widths.insert(col, width);
    }

    /// Columns with a non-default width
    pub fn custom_column_widths(&self) -> &BTreeMap<u16, f64> {
        &self.column_widths
    }

    /// Get the number of stored cells
    pub fn cell_count(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    /// Check if the worksheet has no cells
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over all stored cells in row-major order
    pub fn iter_cells(&self) -> impl Iterator<Item = (u32, u16, &CellData)> {
        self.rows
            .iter()
            .flat_map(|(row, cells)| cells.iter().map(move |(col, cell)| (*row, *col, cell)))
    }
}

fn validate_cell_position(row: u32, col: u16) -> Result<()> {
    if row >= MAX_ROWS {
        return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
    }
    if col >= MAX_COLS {
        return Err(Error::ColumnOutOfBounds(col as u32, MAX_COLS - 1));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_worksheet() {
        let ws = Worksheet::new("Test");
        assert_eq!(ws.name(), "Test");
        assert!(ws.is_empty());
        assert_eq!(ws.first_row(), None);
    }

    #[test]
    fn test_set_cell_values() {
        let mut ws = Worksheet::new("Test");

        ws.set_cell_value("A1", "Hello").unwrap();
        ws.set_cell_value("B1", 42.0).unwrap();
        ws.set_cell_value_at(2, 0, true).unwrap();

        assert_eq!(ws.get_value("A1").unwrap().as_string(), Some("Hello"));
        assert_eq!(ws.get_value_at(0, 1), CellValue::Number(42.0));
        assert_eq!(ws.get_value_at(2, 0), CellValue::Boolean(true));
        assert_eq!(ws.get_value_at(5, 5), CellValue::Empty);
        assert_eq!(ws.cell_count(), 3);
        assert_eq!(ws.last_row(), Some(2));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut ws = Worksheet::new("Test");
        assert!(ws.set_cell_value_at(MAX_ROWS, 0, 1.0).is_err());
        assert!(ws.set_cell_value_at(0, MAX_COLS, 1.0).is_err());
    }

    #[test]
    fn test_rows_are_sorted() {
        let mut ws = Worksheet::new("Test");
        ws.set_cell_value_at(3, 2, "c").unwrap();
        ws.set_cell_value_at(1, 4, "b").unwrap();
        ws.set_cell_value_at(1, 0, "a").unwrap();

        let cells: Vec<_> = ws.iter_cells().map(|(r, c, _)| (r, c)).collect();
        assert_eq!(cells, vec![(1, 0), (1, 4), (3, 2)]);
    }

    #[test]
    fn test_style_keeps_value() {
        let mut ws = Worksheet::new("Test");
        ws.set_cell_value_at(0, 0, 1.5).unwrap();
        ws.set_cell_style_at(0, 0, &Style::new().bold(true)).unwrap();
        ws.set_cell_value_at(0, 0, 2.5).unwrap();

        assert_eq!(ws.get_value_at(0, 0), CellValue::Number(2.5));
        assert!(ws.cell_style_at(0, 0).unwrap().font.bold);
        assert!(ws.set_cell_style_index_at(0, 0, 99).is_err());
    }

    #[test]
    fn test_column_widths() {
        let mut ws = Worksheet::new("Test");
        assert_eq!(ws.column_width(3), DEFAULT_COLUMN_WIDTH);
        ws.set_column_width(3, 20.0);
        assert_eq!(ws.column_width(3), 20.0);
        assert_eq!(ws.custom_column_widths().len(), 1);
    }

    #[test]
    fn test_clear_cell() {
        let mut ws = Worksheet::new("Test");
        ws.set_cell_value_at(0, 0, "x").unwrap();
        ws.clear_cell_at(0, 0);
        assert!(ws.is_empty());
    }
}
