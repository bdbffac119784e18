//! Row parser over sheet tokens

use log::trace;
use serde_sheets_core::{CellValue, SheetToken};

use super::node::RowNode;
use super::reader::SheetReader;
use super::SheetLocation;
use crate::error::{Error, Result};
use crate::features::{Feature, Features};
use crate::schema::SpreadsheetSchema;

/// A data row; `node` is [`RowNode::Null`] for a blank row kept as null
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub location: SheetLocation,
    pub node: RowNode,
}

/// Turns sheet tokens into row trees
///
/// Rows above the schema's data row and cells outside its columns are
/// skipped. Blank rows are handled according to [`Feature::BreakOnBlankRow`]
/// and [`Feature::BlankRowAsNull`].
#[derive(Debug)]
pub struct SheetParser<R> {
    reader: R,
    schema: Option<SpreadsheetSchema>,
    features: Features,
    location: Option<SheetLocation>,
    done: bool,
}

impl<R: SheetReader> SheetParser<R> {
    pub fn new(reader: R, schema: Option<SpreadsheetSchema>, features: Features) -> Self {
        Self {
            reader,
            schema,
            features,
            location: None,
            done: false,
        }
    }

    pub fn schema(&self) -> Option<&SpreadsheetSchema> {
        self.schema.as_ref()
    }

    pub fn is_date_1904(&self) -> bool {
        self.reader.is_date_1904()
    }

    /// Location of the last token read
    pub fn current_location(&self) -> Option<SheetLocation> {
        self.location
    }

    pub fn is_closed(&self) -> bool {
        self.done || self.reader.is_closed()
    }

    pub fn close(&mut self) {
        self.done = true;
        self.reader.close();
    }

    /// Next data row, `None` at the end of the sheet
    pub fn next_row(&mut self) -> Result<Option<Row>> {
        let Some(schema) = self.schema.as_ref() else {
            return Err(Error::NoSchema("parse"));
        };
        if self.done {
            return Ok(None);
        }

        let mut current: Option<(u32, RowNode, bool)> = None;
        loop {
            let Some(token) = self.reader.next_token()? else {
                self.done = true;
                return Ok(None);
            };
            trace!("Token {:?} at {:?}", token, self.reader.reference());
            match token {
                SheetToken::SheetDataStart => {}
                SheetToken::RowStart => {
                    let Some(row) = self.reader.row() else {
                        continue;
                    };
                    self.location = Some(SheetLocation::row(row));
                    current = schema
                        .is_in_row_bounds(row)
                        .then(|| (row, RowNode::Null, false));
                }
                SheetToken::CellValue => {
                    let Some((row, node, filled)) = current.as_mut() else {
                        continue;
                    };
                    let Some(col) = self.reader.column() else {
                        continue;
                    };
                    let location = SheetLocation::new(*row, Some(col));
                    self.location = Some(location);
                    if !schema.is_in_column_bounds(col) {
                        continue;
                    }
                    let Some(column) = schema.column(col) else {
                        continue;
                    };
                    match self.reader.cell_value() {
                        None | Some(CellValue::Empty) => {}
                        Some(CellValue::Error(error)) => {
                            return Err(Error::UnexpectedCell {
                                value: error.as_str().to_string(),
                                location,
                            });
                        }
                        Some(value) => {
                            node.insert(column.pointer().segments(), value.clone());
                            *filled = true;
                        }
                    }
                }
                SheetToken::RowEnd => {
                    let Some((row, node, filled)) = current.take() else {
                        continue;
                    };
                    let location = SheetLocation::row(row);
                    self.location = Some(location);
                    if filled {
                        return Ok(Some(Row { location, node }));
                    }
                    if self.features.is_enabled(Feature::BreakOnBlankRow) {
                        trace!("Blank {} ends the sheet", location);
                        self.done = true;
                        self.reader.close();
                        return Ok(None);
                    }
                    if self.features.is_enabled(Feature::BlankRowAsNull) {
                        return Ok(Some(Row {
                            location,
                            node: RowNode::Null,
                        }));
                    }
                }
                SheetToken::SheetDataEnd => {
                    self.done = true;
                    return Ok(None);
                }
            }
        }
    }
}
