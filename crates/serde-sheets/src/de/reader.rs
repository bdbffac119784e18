//! Token sources for the parser

use std::collections::btree_map;
use std::collections::BTreeMap;

use serde_sheets_core::{CellAddress, CellData, CellValue, SheetToken, Worksheet};
use serde_sheets_xlsx::SheetStreamReader;

use crate::error::Result;

/// A pull source of [`SheetToken`]s
///
/// After a `CellValue` token the position and value of that cell are
/// available; after `RowStart` only the row is.
pub trait SheetReader {
    fn next_token(&mut self) -> Result<Option<SheetToken>>;

    fn row(&self) -> Option<u32>;

    fn column(&self) -> Option<u16>;

    fn reference(&self) -> Option<CellAddress> {
        Some(CellAddress::new(self.row()?, self.column()?))
    }

    fn cell_value(&self) -> Option<&CellValue>;

    fn is_date_1904(&self) -> bool;

    fn close(&mut self);

    fn is_closed(&self) -> bool;
}

impl SheetReader for SheetStreamReader {
    fn next_token(&mut self) -> Result<Option<SheetToken>> {
        Ok(SheetStreamReader::next_token(self)?)
    }

    fn row(&self) -> Option<u32> {
        SheetStreamReader::row(self)
    }

    fn column(&self) -> Option<u16> {
        SheetStreamReader::column(self)
    }

    fn reference(&self) -> Option<CellAddress> {
        SheetStreamReader::reference(self)
    }

    fn cell_value(&self) -> Option<&CellValue> {
        SheetStreamReader::cell_value(self)
    }

    fn is_date_1904(&self) -> bool {
        SheetStreamReader::is_date_1904(self)
    }

    fn close(&mut self) {
        SheetStreamReader::close(self)
    }

    fn is_closed(&self) -> bool {
        SheetStreamReader::is_closed(self)
    }
}

impl<R: SheetReader + ?Sized> SheetReader for Box<R> {
    fn next_token(&mut self) -> Result<Option<SheetToken>> {
        (**self).next_token()
    }

    fn row(&self) -> Option<u32> {
        (**self).row()
    }

    fn column(&self) -> Option<u16> {
        (**self).column()
    }

    fn reference(&self) -> Option<CellAddress> {
        (**self).reference()
    }

    fn cell_value(&self) -> Option<&CellValue> {
        (**self).cell_value()
    }

    fn is_date_1904(&self) -> bool {
        (**self).is_date_1904()
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    Rows,
    InRow,
    Done,
}

/// Replays an in-memory [`Worksheet`] with the streaming token protocol
pub struct WorksheetReader<'a> {
    rows: Box<dyn Iterator<Item = (u32, &'a BTreeMap<u16, CellData>)> + 'a>,
    cells: Option<btree_map::Iter<'a, u16, CellData>>,
    phase: Phase,
    row: Option<u32>,
    column: Option<u16>,
    value: Option<&'a CellValue>,
    date_1904: bool,
    closed: bool,
}

impl<'a> WorksheetReader<'a> {
    pub fn new(sheet: &'a Worksheet) -> Self {
        Self {
            rows: Box::new(sheet.rows()),
            cells: None,
            phase: Phase::Start,
            row: None,
            column: None,
            value: None,
            date_1904: false,
            closed: false,
        }
    }

    /// Interpret serial dates in the 1904 system
    pub fn with_date_1904(mut self, date_1904: bool) -> Self {
        self.date_1904 = date_1904;
        self
    }
}

impl<'a> SheetReader for WorksheetReader<'a> {
    fn next_token(&mut self) -> Result<Option<SheetToken>> {
        if self.closed {
            return Ok(None);
        }
        let token = match self.phase {
            Phase::Start => {
                self.phase = Phase::Rows;
                SheetToken::SheetDataStart
            }
            Phase::Rows => match self.rows.next() {
                Some((row, cells)) => {
                    self.row = Some(row);
                    self.cells = Some(cells.iter());
                    self.phase = Phase::InRow;
                    SheetToken::RowStart
                }
                None => {
                    self.row = None;
                    self.phase = Phase::Done;
                    SheetToken::SheetDataEnd
                }
            },
            Phase::InRow => match self.cells.as_mut().and_then(Iterator::next) {
                Some((col, cell)) => {
                    self.column = Some(*col);
                    self.value = Some(&cell.value);
                    SheetToken::CellValue
                }
                None => {
                    self.cells = None;
                    self.column = None;
                    self.value = None;
                    self.phase = Phase::Rows;
                    SheetToken::RowEnd
                }
            },
            Phase::Done => return Ok(None),
        };
        Ok(Some(token))
    }

    fn row(&self) -> Option<u32> {
        self.row
    }

    fn column(&self) -> Option<u16> {
        self.column
    }

    fn cell_value(&self) -> Option<&CellValue> {
        self.value
    }

    fn is_date_1904(&self) -> bool {
        self.date_1904
    }

    fn close(&mut self) {
        self.closed = true;
        self.cells = None;
        self.value = None;
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_replays_tokens() {
        let mut sheet = Worksheet::new("Sheet1");
        sheet.set_cell_value_at(0, 0, "a").unwrap();
        sheet.set_cell_value_at(2, 1, 3.0).unwrap();

        let mut reader = WorksheetReader::new(&sheet);
        let mut tokens = Vec::new();
        let mut cells = Vec::new();
        while let Some(token) = reader.next_token().unwrap() {
            if token == SheetToken::CellValue {
                let reference = reader.reference().unwrap().to_string();
                cells.push((reference, reader.cell_value().unwrap().clone()));
            }
            tokens.push(token);
        }

        assert_eq!(
            tokens,
            vec![
                SheetToken::SheetDataStart,
                SheetToken::RowStart,
                SheetToken::CellValue,
                SheetToken::RowEnd,
                SheetToken::RowStart,
                SheetToken::CellValue,
                SheetToken::RowEnd,
                SheetToken::SheetDataEnd,
            ]
        );
        assert_eq!(
            cells,
            vec![
                ("A1".to_string(), CellValue::string("a")),
                ("B3".to_string(), CellValue::Number(3.0)),
            ]
        );
    }

    #[test]
    fn test_close() {
        let sheet = Worksheet::new("Sheet1");
        let mut reader = WorksheetReader::new(&sheet);
        reader.close();
        assert!(reader.is_closed());
        assert_eq!(reader.next_token().unwrap(), None);
    }
}
