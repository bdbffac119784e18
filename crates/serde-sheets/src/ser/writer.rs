//! Cell writer backing the generator

use std::collections::BTreeMap;

use ahash::AHashMap;
use log::trace;
use serde_sheets_core::{CellAddress, CellValue, Worksheet};

use crate::error::{Error, Result};
use crate::schema::SpreadsheetSchema;
use crate::styles::Styles;

/// Rows looked at when auto-sizing a column
const AUTO_SIZE_ROWS: u32 = 100;
/// Characters added to the widest text of an auto-sized column
const AUTO_SIZE_PADDING: usize = 2;
/// Widest column Excel accepts
const MAX_COLUMN_WIDTH: usize = 255;

/// Writes cells, styles and column widths into a [`Worksheet`]
#[derive(Debug)]
pub struct SheetWriter<'a> {
    sheet: &'a mut Worksheet,
    schema: Option<SpreadsheetSchema>,
    styles: Styles,
    date_1904: bool,
    reference: CellAddress,
    last_row: Option<u32>,
    /// Text width per column and row, recent rows only
    widths: AHashMap<u16, BTreeMap<u32, usize>>,
}

impl<'a> SheetWriter<'a> {
    pub fn new(sheet: &'a mut Worksheet, date_1904: bool) -> Self {
        Self {
            sheet,
            schema: None,
            styles: Styles::default(),
            date_1904,
            reference: CellAddress::A1,
            last_row: None,
            widths: AHashMap::new(),
        }
    }

    /// Install the schema and pool its styles into the sheet
    pub fn set_schema(&mut self, schema: SpreadsheetSchema) {
        self.styles = schema.build_styles(self.sheet);
        self.schema = Some(schema);
    }

    pub fn schema(&self) -> Result<&SpreadsheetSchema> {
        self.schema.as_ref().ok_or(Error::NoSchema("generate"))
    }

    pub fn has_schema(&self) -> bool {
        self.schema.is_some()
    }

    /// Date system of the workbook the sheet belongs to
    pub fn is_date_1904(&self) -> bool {
        self.date_1904
    }

    pub fn sheet(&self) -> &Worksheet {
        &*self.sheet
    }

    pub fn reference(&self) -> CellAddress {
        self.reference
    }

    pub fn set_reference(&mut self, reference: CellAddress) {
        self.reference = reference;
    }

    /// Last row written to, headers included
    pub fn last_row(&self) -> Option<u32> {
        self.last_row
    }

    /// Write one header cell per column on the origin row
    pub fn write_headers(&mut self) -> Result<()> {
        let schema = self.schema.take().ok_or(Error::NoSchema("generate"))?;
        let row = schema.origin_row();
        let result = schema.iter().try_for_each(|column| {
            let Some(col) = schema.column_index_of(column.pointer()) else {
                return Ok(());
            };
            self.reference = CellAddress::new(row, col);
            self.write_cell(CellValue::String(column.name()), &schema)
        });
        self.schema = Some(schema);
        result
    }

    pub fn write_numeric(&mut self, value: f64) -> Result<()> {
        self.write(CellValue::Number(value))
    }

    pub fn write_string(&mut self, value: &str) -> Result<()> {
        self.write(CellValue::String(value.to_string()))
    }

    pub fn write_boolean(&mut self, value: bool) -> Result<()> {
        self.write(CellValue::Boolean(value))
    }

    pub fn write_blank(&mut self) -> Result<()> {
        self.write(CellValue::Empty)
    }

    fn write(&mut self, value: CellValue) -> Result<()> {
        let schema = self.schema.take().ok_or(Error::NoSchema("generate"))?;
        let result = self.write_cell(value, &schema);
        self.schema = Some(schema);
        result
    }

    fn write_cell(&mut self, value: CellValue, schema: &SpreadsheetSchema) -> Result<()> {
        let CellAddress { row, col } = self.reference;
        trace!("Writing {} cell at {}", value.type_name(), self.reference);

        let width = match &value {
            CellValue::Empty => 0,
            other => other.display_text().chars().count(),
        };
        self.sheet.set_cell_value_at(row, col, value)?;

        if let Some(column) = schema.column(col) {
            let style = if row < schema.data_row() {
                self.styles.header_style(column)
            } else {
                self.styles.style(column)
            };
            if let Some(index) = style {
                self.sheet.set_cell_style_index_at(row, col, index)?;
            }
        }

        self.last_row = Some(self.last_row.map_or(row, |last| last.max(row)));
        self.track_width(row, col, width);
        Ok(())
    }

    fn track_width(&mut self, row: u32, col: u16, width: usize) {
        let rows = self.widths.entry(col).or_default();
        let entry = rows.entry(row).or_insert(0);
        *entry = (*entry).max(width);
        while rows.len() > AUTO_SIZE_ROWS as usize {
            rows.pop_first();
        }
    }

    /// Apply explicit and auto-sized widths to every schema column
    pub fn adjust_column_width(&mut self) -> Result<()> {
        let schema = self.schema()?;
        let mut updates = Vec::with_capacity(schema.len());
        for column in schema {
            let Some(col) = schema.column_index_of(column.pointer()) else {
                continue;
            };
            let options = column.options();
            let width = if options.is_auto_size() {
                let widest = self.widest_recent(col);
                ((widest + AUTO_SIZE_PADDING) as i64)
                    .max(i64::from(options.min_width))
                    .min(i64::from(options.max_width))
            } else {
                i64::from(options.width)
            };
            if width > 0 {
                updates.push((col, width.min(MAX_COLUMN_WIDTH as i64) as f64));
            }
        }
        for (col, width) in updates {
            trace!("Column {} width set to {}", CellAddress::column_to_letters(col), width);
            self.sheet.set_column_width(col, width);
        }
        Ok(())
    }

    fn widest_recent(&self, col: u16) -> usize {
        let Some(last) = self.last_row else {
            return 0;
        };
        let first = last.saturating_sub(AUTO_SIZE_ROWS - 1);
        self.widths
            .get(&col)
            .map(|rows| rows.range(first..=last).map(|(_, w)| *w).max().unwrap_or(0))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, ColumnOptions, ColumnPointer, ColumnType};
    use crate::styles::StylesBuilder;
    use pretty_assertions::assert_eq;

    fn schema(options: ColumnOptions) -> SpreadsheetSchema {
        SpreadsheetSchema::new(
            vec![
                Column::new(
                    ColumnPointer::parse("name"),
                    options,
                    ColumnType::Text,
                    false,
                ),
                Column::new(
                    ColumnPointer::parse("count"),
                    ColumnOptions::named("Count").width(7),
                    ColumnType::Integer,
                    false,
                ),
            ],
            StylesBuilder::simple().cell_style("header", |s| s.font(|f| f.bold())),
            CellAddress::new(1, 1),
        )
    }

    #[test]
    fn test_headers_and_cells() {
        let mut sheet = Worksheet::new("Sheet1");
        let mut writer = SheetWriter::new(&mut sheet, false);
        writer.set_schema(schema(ColumnOptions::named("Name").header_style("header")));
        writer.write_headers().unwrap();
        writer.set_reference(CellAddress::new(2, 1));
        writer.write_string("apple").unwrap();
        writer.set_reference(CellAddress::new(2, 2));
        writer.write_numeric(3.0).unwrap();
        assert_eq!(writer.last_row(), Some(2));

        assert_eq!(sheet.get_value_at(1, 1), CellValue::string("Name"));
        assert_eq!(sheet.get_value_at(1, 2), CellValue::string("Count"));
        assert_eq!(sheet.get_value_at(2, 1), CellValue::string("apple"));
        assert_eq!(sheet.get_value_at(2, 2), CellValue::Number(3.0));
        let header = sheet.cell_style_at(1, 1).unwrap();
        assert!(header.font.bold);
    }

    #[test]
    fn test_adjust_column_width() {
        let mut sheet = Worksheet::new("Sheet1");
        let mut writer = SheetWriter::new(&mut sheet, false);
        writer.set_schema(schema(
            ColumnOptions::new().auto_size(true).max_width(10),
        ));
        writer.write_headers().unwrap();
        writer.set_reference(CellAddress::new(2, 1));
        writer.write_string("abc").unwrap();
        writer.adjust_column_width().unwrap();
        // "name" plus padding
        assert_eq!(sheet.column_width(1), 6.0);
        assert_eq!(sheet.column_width(2), 7.0);

        let mut writer = SheetWriter::new(&mut sheet, false);
        writer.set_schema(schema(
            ColumnOptions::new().auto_size(true).max_width(10),
        ));
        writer.set_reference(CellAddress::new(2, 1));
        writer.write_string("a rather long piece of text").unwrap();
        writer.adjust_column_width().unwrap();
        assert_eq!(sheet.column_width(1), 10.0);
    }

    #[test]
    fn test_zero_max_width_leaves_column_unsized() {
        let mut sheet = Worksheet::new("Sheet1");
        let mut writer = SheetWriter::new(&mut sheet, false);
        writer.set_schema(schema(
            ColumnOptions::new().auto_size(true).max_width(0),
        ));
        writer.set_reference(CellAddress::new(2, 1));
        writer.write_string("abc").unwrap();
        writer.adjust_column_width().unwrap();
        assert!(!sheet.custom_column_widths().contains_key(&1));
        assert_eq!(sheet.column_width(2), 7.0);
    }

    #[test]
    fn test_write_without_schema() {
        let mut sheet = Worksheet::new("Sheet1");
        let mut writer = SheetWriter::new(&mut sheet, false);
        let err = writer.write_boolean(true).unwrap_err();
        assert_eq!(
            err.to_string(),
            "No schema of type 'spreadsheet' set, can not generate"
        );
    }
}
