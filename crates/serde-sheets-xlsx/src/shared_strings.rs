//! Lazily parsed shared strings table

use std::io::Cursor;

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::text::decode_excel_escapes;

/// Shared strings (`sst`) parsed on demand
///
/// Items are decoded only up to the highest index requested so far, so a
/// sheet that touches the first few strings never pays for the rest of a
/// large table.
pub struct LazySharedStrings {
    reader: Option<Reader<Cursor<Vec<u8>>>>,
    strings: Vec<String>,
    buf: Vec<u8>,
}

impl LazySharedStrings {
    /// Wrap the raw bytes of a shared strings part
    pub fn new(bytes: Vec<u8>) -> Self {
        let mut reader = Reader::from_reader(Cursor::new(bytes));
        reader.trim_text(false);
        Self {
            reader: Some(reader),
            strings: Vec::new(),
            buf: Vec::new(),
        }
    }

    /// A table without items
    pub fn empty() -> Self {
        Self {
            reader: None,
            strings: Vec::new(),
            buf: Vec::new(),
        }
    }

    /// Get the item at `index`, parsing forward as needed
    ///
    /// An index past the end of the table yields an empty string.
    pub fn get(&mut self, index: usize) -> XlsxResult<&str> {
        while self.strings.len() <= index {
            if !self.parse_next()? {
                log::warn!(
                    "shared string index {} out of range ({} item(s))",
                    index,
                    self.strings.len()
                );
                return Ok("");
            }
        }
        Ok(&self.strings[index])
    }

    /// Number of items parsed so far
    pub fn parsed_len(&self) -> usize {
        self.strings.len()
    }

    /// Parse the next `<si>` item; false at end of table
    fn parse_next(&mut self) -> XlsxResult<bool> {
        let reader = match self.reader.as_mut() {
            Some(reader) => reader,
            None => return Ok(false),
        };

        let mut in_si = false;
        let mut in_t = false;
        // Depth inside <rPh> (phonetic runs are not part of the value)
        let mut phonetic = 0usize;
        let mut current = String::new();

        loop {
            self.buf.clear();
            match reader.read_event_into(&mut self.buf) {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current.clear();
                    }
                    b"rPh" if in_si => phonetic += 1,
                    b"t" if in_si && phonetic == 0 => in_t = true,
                    _ => {}
                },
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"si" if in_si => {
                        self.strings.push(decode_excel_escapes(&current));
                        return Ok(true);
                    }
                    b"rPh" if phonetic > 0 => phonetic -= 1,
                    b"t" => in_t = false,
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.local_name().as_ref() == b"si" => {
                    self.strings.push(String::new());
                    return Ok(true);
                }
                Ok(Event::Text(e)) if in_t => {
                    let text = e.unescape().map_err(XlsxError::Xml)?;
                    current.push_str(&text);
                }
                Ok(Event::CData(e)) if in_t => {
                    current.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
                Ok(Event::Eof) => {
                    self.reader = None;
                    return Ok(false);
                }
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="4" uniqueCount="4">
  <si><t>a</t></si>
  <si><r><t>Hello</t></r><r><rPr><b/></rPr><t xml:space="preserve"> World</t></r></si>
  <si><t>Tokyo</t><rPh sb="0" eb="2"><t>トウキョウ</t></rPh></si>
  <si/>
  <si><t>x &amp; y_x000a_z</t></si>
</sst>"#;

    #[test]
    fn test_plain_and_rich_text() {
        let mut sst = LazySharedStrings::new(SST.as_bytes().to_vec());
        assert_eq!(sst.get(0).unwrap(), "a");
        assert_eq!(sst.get(1).unwrap(), "Hello World");
        assert_eq!(sst.get(2).unwrap(), "Tokyo");
        assert_eq!(sst.get(3).unwrap(), "");
        assert_eq!(sst.get(4).unwrap(), "x & y\nz");
    }

    #[test]
    fn test_parses_only_what_is_needed() {
        let mut sst = LazySharedStrings::new(SST.as_bytes().to_vec());
        assert_eq!(sst.get(1).unwrap(), "Hello World");
        assert_eq!(sst.parsed_len(), 2);
        assert_eq!(sst.get(0).unwrap(), "a");
        assert_eq!(sst.parsed_len(), 2);
    }

    #[test]
    fn test_out_of_range_is_empty() {
        let mut sst = LazySharedStrings::new(SST.as_bytes().to_vec());
        assert_eq!(sst.get(42).unwrap(), "");
        assert_eq!(sst.parsed_len(), 5);

        let mut empty = LazySharedStrings::empty();
        assert_eq!(empty.get(0).unwrap(), "");
    }
}
