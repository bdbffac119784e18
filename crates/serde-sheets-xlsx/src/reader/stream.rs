//! Streaming worksheet reader

use std::io::Cursor;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::package::is_true;
use crate::shared_strings::LazySharedStrings;
use crate::text::decode_excel_escapes;
use serde_sheets_core::{CellAddress, CellError, CellValue, SheetToken};

/// A `<col>` width declaration (columns are 0-based and inclusive)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnWidth {
    pub min: u16,
    pub max: u16,
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    BeforeSheetData,
    InSheetData,
    Done,
}

/// Pull-parser over one worksheet part
///
/// Produces the [`SheetToken`] protocol: `SheetDataStart`, then per row
/// `RowStart`, one `CellValue` per `<c>`, `RowEnd`, and finally
/// `SheetDataEnd`. Position and value accessors describe the most recent
/// token.
pub struct SheetStreamReader {
    name: String,
    reader: Reader<Cursor<Vec<u8>>>,
    shared_strings: LazySharedStrings,
    date_1904: bool,
    buf: Vec<u8>,
    state: State,
    /// Token owed by a self-closing element (`<row/>`, `<sheetData/>`)
    pending: Option<SheetToken>,
    row: Option<u32>,
    column: Option<u16>,
    last_column: Option<u16>,
    cell_value: Option<CellValue>,
    column_widths: Vec<ColumnWidth>,
    closed: bool,
}

impl SheetStreamReader {
    pub(crate) fn new(
        name: String,
        sheet_xml: Vec<u8>,
        shared_strings: LazySharedStrings,
        date_1904: bool,
    ) -> Self {
        let mut reader = Reader::from_reader(Cursor::new(sheet_xml));
        reader.trim_text(false);
        Self {
            name,
            reader,
            shared_strings,
            date_1904,
            buf: Vec::new(),
            state: State::BeforeSheetData,
            pending: None,
            row: None,
            column: None,
            last_column: None,
            cell_value: None,
            column_widths: Vec::new(),
            closed: false,
        }
    }

    /// Name of the sheet being read
    pub fn sheet_name(&self) -> &str {
        &self.name
    }

    /// Whether the workbook uses the 1904 date system
    pub fn is_date_1904(&self) -> bool {
        self.date_1904
    }

    /// Row of the current token; `None` before the first row
    pub fn row(&self) -> Option<u32> {
        self.row
    }

    /// Column of the current cell
    pub fn column(&self) -> Option<u16> {
        self.column
    }

    /// Address of the current cell
    pub fn reference(&self) -> Option<CellAddress> {
        match (self.row, self.column) {
            (Some(row), Some(col)) => Some(CellAddress::new(row, col)),
            _ => None,
        }
    }

    /// Value of the current cell
    pub fn cell_value(&self) -> Option<&CellValue> {
        self.cell_value.as_ref()
    }

    /// Column widths declared before the sheet data
    pub fn column_widths(&self) -> &[ColumnWidth] {
        &self.column_widths
    }

    /// Stop reading; later calls to [`next_token`](Self::next_token) return `None`
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Advance to the next token
    pub fn next_token(&mut self) -> XlsxResult<Option<SheetToken>> {
        if self.closed || self.state == State::Done {
            return Ok(None);
        }

        if let Some(token) = self.pending.take() {
            return Ok(Some(self.apply(token)));
        }

        loop {
            self.buf.clear();
            let event = self.reader.read_event_into(&mut self.buf)?.into_owned();
            match (self.state, event) {
                (State::BeforeSheetData, Event::Start(e)) | (State::BeforeSheetData, Event::Empty(e))
                    if e.local_name().as_ref() == b"col" =>
                {
                    if let Some(width) = parse_col(&e) {
                        self.column_widths.push(width);
                    }
                }
                (State::BeforeSheetData, Event::Start(e))
                    if e.local_name().as_ref() == b"sheetData" =>
                {
                    self.state = State::InSheetData;
                    return Ok(Some(SheetToken::SheetDataStart));
                }
                (State::BeforeSheetData, Event::Empty(e))
                    if e.local_name().as_ref() == b"sheetData" =>
                {
                    self.state = State::InSheetData;
                    self.pending = Some(SheetToken::SheetDataEnd);
                    return Ok(Some(SheetToken::SheetDataStart));
                }
                (State::BeforeSheetData, Event::Eof) => {
                    self.state = State::InSheetData;
                    self.pending = Some(SheetToken::SheetDataEnd);
                    return Ok(Some(SheetToken::SheetDataStart));
                }
                (State::InSheetData, Event::Start(e)) => match e.local_name().as_ref() {
                    b"row" => {
                        let row = self.row_index(&e)?;
                        self.start_row(row);
                        return Ok(Some(SheetToken::RowStart));
                    }
                    b"c" => {
                        let (col, cell_type) = self.cell_attrs(&e)?;
                        let value = self.read_cell_body(cell_type.as_deref())?;
                        return Ok(Some(self.set_cell(col, value)));
                    }
                    _ => {}
                },
                (State::InSheetData, Event::Empty(e)) => match e.local_name().as_ref() {
                    b"row" => {
                        let row = self.row_index(&e)?;
                        self.start_row(row);
                        self.pending = Some(SheetToken::RowEnd);
                        return Ok(Some(SheetToken::RowStart));
                    }
                    b"c" => {
                        let (col, _) = self.cell_attrs(&e)?;
                        return Ok(Some(self.set_cell(col, CellValue::Empty)));
                    }
                    _ => {}
                },
                (State::InSheetData, Event::End(e)) => match e.local_name().as_ref() {
                    b"row" => return Ok(Some(self.apply(SheetToken::RowEnd))),
                    b"sheetData" => return Ok(Some(self.apply(SheetToken::SheetDataEnd))),
                    _ => {}
                },
                (State::InSheetData, Event::Eof) => {
                    return Err(XlsxError::Parse(format!(
                        "unexpected end of sheet '{}' inside sheetData",
                        self.name
                    )))
                }
                _ => {}
            }
        }
    }

    /// Update position state for a token and return it
    fn apply(&mut self, token: SheetToken) -> SheetToken {
        match token {
            SheetToken::RowEnd => {
                self.column = None;
                self.cell_value = None;
            }
            SheetToken::SheetDataEnd => {
                self.state = State::Done;
                self.column = None;
                self.cell_value = None;
            }
            _ => {}
        }
        log::trace!("{:?} at row {:?}", token, self.row);
        token
    }

    fn start_row(&mut self, row: u32) {
        self.row = Some(row);
        self.column = None;
        self.last_column = None;
        self.cell_value = None;
        log::trace!("RowStart at row {}", row);
    }

    fn set_cell(&mut self, col: u16, value: CellValue) -> SheetToken {
        self.column = Some(col);
        self.last_column = Some(col);
        log::trace!("CellValue at {}: {:?}", CellAddress::new(self.row.unwrap_or(0), col), value);
        self.cell_value = Some(value);
        SheetToken::CellValue
    }

    fn row_index(&self, e: &BytesStart<'_>) -> XlsxResult<u32> {
        for attr in e.attributes().flatten() {
            if attr.key.as_ref() == b"r" {
                let value = attr.unescape_value()?;
                let r: u32 = value
                    .parse()
                    .map_err(|_| XlsxError::Parse(format!("Invalid row number: {}", value)))?;
                return r
                    .checked_sub(1)
                    .ok_or_else(|| XlsxError::Parse("Row number must be >= 1".into()));
            }
        }
        Ok(self.row.map_or(0, |row| row + 1))
    }

    fn cell_attrs(&self, e: &BytesStart<'_>) -> XlsxResult<(u16, Option<String>)> {
        let mut col = None;
        let mut cell_type = None;
        for attr in e.attributes().flatten() {
            match attr.key.as_ref() {
                b"r" => {
                    let value = attr.unescape_value()?;
                    let addr = CellAddress::parse(&value).map_err(|err| {
                        XlsxError::Parse(format!("Invalid cell reference '{}': {}", value, err))
                    })?;
                    col = Some(addr.col);
                }
                b"t" => cell_type = Some(attr.unescape_value()?.to_string()),
                _ => {}
            }
        }
        let col = col.unwrap_or_else(|| self.last_column.map_or(0, |c| c + 1));
        Ok((col, cell_type))
    }

    /// Read `<c>` content up to its end tag and decode the value
    fn read_cell_body(&mut self, cell_type: Option<&str>) -> XlsxResult<CellValue> {
        let mut value: Option<String> = None;
        let mut inline = String::new();
        let mut in_v = false;
        let mut in_is = false;
        let mut in_t = false;
        let mut phonetic = 0usize;

        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"v" => {
                        in_v = true;
                        value.get_or_insert_with(String::new);
                    }
                    b"is" => in_is = true,
                    b"rPh" if in_is => phonetic += 1,
                    b"t" if in_is && phonetic == 0 => in_t = true,
                    _ => {}
                },
                Event::End(e) => match e.local_name().as_ref() {
                    b"c" => break,
                    b"v" => in_v = false,
                    b"is" => in_is = false,
                    b"rPh" if phonetic > 0 => phonetic -= 1,
                    b"t" => in_t = false,
                    _ => {}
                },
                Event::Text(e) if in_v || in_t => {
                    let text = e.unescape()?;
                    if in_v {
                        value.get_or_insert_with(String::new).push_str(&text);
                    } else {
                        inline.push_str(&text);
                    }
                }
                Event::Eof => {
                    return Err(XlsxError::Parse(format!(
                        "unexpected end of sheet '{}' inside a cell",
                        self.name
                    )))
                }
                _ => {}
            }
        }

        self.decode_value(cell_type, value, inline)
    }

    fn decode_value(
        &mut self,
        cell_type: Option<&str>,
        value: Option<String>,
        inline: String,
    ) -> XlsxResult<CellValue> {
        let cell_value = match cell_type {
            Some("inlineStr") => CellValue::String(decode_excel_escapes(&inline)),
            _ => {
                let v = match value {
                    Some(v) => v,
                    None => return Ok(CellValue::Empty),
                };
                match cell_type {
                    Some("b") => CellValue::Boolean(is_true(v.trim())),
                    Some("e") => match CellError::from_str(&v) {
                        Some(err) => CellValue::Error(err),
                        None => {
                            log::warn!("unknown error literal '{}' in sheet '{}'", v, self.name);
                            CellValue::String(v)
                        }
                    },
                    Some("s") => {
                        let idx: usize = v.trim().parse().map_err(|_| {
                            XlsxError::Parse(format!("Invalid shared string index: {}", v))
                        })?;
                        CellValue::String(self.shared_strings.get(idx)?.to_string())
                    }
                    Some("str") => CellValue::String(decode_excel_escapes(&v)),
                    None | Some("n") => match v.trim().parse::<f64>() {
                        Ok(n) => CellValue::Number(n),
                        Err(_) => {
                            return Err(XlsxError::Parse(format!(
                                "Invalid numeric cell value: {}",
                                v
                            )))
                        }
                    },
                    Some(other) => {
                        log::warn!("unknown cell type '{}' in sheet '{}'", other, self.name);
                        CellValue::String(v)
                    }
                }
            }
        };
        Ok(cell_value)
    }
}

fn parse_col(e: &BytesStart<'_>) -> Option<ColumnWidth> {
    let mut min = None;
    let mut max = None;
    let mut width = None;
    for attr in e.attributes().flatten() {
        let value = attr.unescape_value().ok()?;
        match attr.key.as_ref() {
            b"min" => min = value.parse::<u16>().ok(),
            b"max" => max = value.parse::<u16>().ok(),
            b"width" => width = value.parse::<f64>().ok(),
            _ => {}
        }
    }
    let min = min?.checked_sub(1)?;
    let max = max.map_or(Some(min), |m| m.checked_sub(1))?;
    Some(ColumnWidth {
        min,
        max,
        width: width?,
    })
}
