//! XLSX reader

mod stream;

pub use stream::{ColumnWidth, SheetStreamReader};

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use crate::error::{XlsxError, XlsxResult};
use crate::package::XlsxPackage;
use serde_sheets_core::{SheetToken, Workbook, Worksheet};

/// XLSX file reader
///
/// Loads cell values, sheet names, the date system and custom column widths.
/// Cell styles are not read back.
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    /// Read a workbook from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        let mut package = XlsxPackage::open(reader)?;

        let mut workbook = Workbook::empty();
        workbook.set_date_1904(package.is_date_1904());

        for index in 0..package.sheet_count() {
            let mut sheet_reader = package.sheet_reader_at(index)?;
            let sheet_idx = workbook.add_worksheet_with_name(sheet_reader.sheet_name())?;
            let worksheet = workbook.worksheet_mut(sheet_idx).ok_or_else(|| {
                XlsxError::Parse(format!("worksheet {} missing after insert", sheet_idx))
            })?;
            Self::read_worksheet(&mut sheet_reader, worksheet)?;
        }

        Ok(workbook)
    }

    fn read_worksheet(reader: &mut SheetStreamReader, worksheet: &mut Worksheet) -> XlsxResult<()> {
        while let Some(token) = reader.next_token()? {
            if token != SheetToken::CellValue {
                continue;
            }
            if let (Some(addr), Some(value)) = (reader.reference(), reader.cell_value()) {
                if !value.is_empty() {
                    worksheet.set_cell_value_at(addr.row, addr.col, value.clone())?;
                }
            }
        }

        for width in reader.column_widths() {
            for col in width.min..=width.max {
                worksheet.set_column_width(col, width.width);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::build_package;
    use pretty_assertions::assert_eq;
    use serde_sheets_core::CellValue;
    use std::io::Cursor;

    #[test]
    fn test_read_empty_xlsx() {
        let bytes = build_package(
            r#"<sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets>"#,
            &[("rId1", "worksheets/sheet1.xml", "<sheetData/>")],
            None,
        );
        let workbook = XlsxReader::read(Cursor::new(bytes)).unwrap();

        assert_eq!(workbook.sheet_count(), 1);
        let sheet = workbook.worksheet(0).unwrap();
        assert_eq!(sheet.name(), "Sheet1");
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_read_values_and_widths() {
        let bytes = build_package(
            r#"<workbookPr date1904="true"/><sheets><sheet name="Data" sheetId="1" r:id="rId1"/></sheets>"#,
            &[(
                "rId1",
                "worksheets/sheet1.xml",
                r#"<cols><col min="1" max="2" width="20" customWidth="1"/></cols><sheetData><row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1"><v>3.25</v></c></row><row r="4"><c r="C4" t="b"><v>0</v></c></row></sheetData>"#,
            )],
            Some(r#"<sst><si><t>name</t></si></sst>"#),
        );
        let workbook = XlsxReader::read(Cursor::new(bytes)).unwrap();
        assert!(workbook.is_date_1904());

        let sheet = workbook.worksheet_by_name("data").unwrap();
        assert_eq!(sheet.get_value_at(0, 0), CellValue::string("name"));
        assert_eq!(sheet.get_value_at(0, 1), CellValue::Number(3.25));
        assert_eq!(sheet.get_value_at(3, 2), CellValue::Boolean(false));
        assert_eq!(sheet.column_width(0), 20.0);
        assert_eq!(sheet.column_width(1), 20.0);
        assert_eq!(sheet.custom_column_widths().len(), 2);
    }
}
