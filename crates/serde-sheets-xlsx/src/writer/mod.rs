//! XLSX writer

use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use crate::error::{XlsxError, XlsxResult};
use crate::styles::XlsxStyleTable;
use crate::text::{encode_excel_escapes, escape_xml, needs_space_preserve};
use serde_sheets_core::{CellAddress, CellValue, Workbook, Worksheet};

/// XLSX file writer
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write a workbook to a file path
    pub fn write_file<P: AsRef<Path>>(workbook: &Workbook, path: P) -> XlsxResult<()> {
        let file = File::create(path)?;
        Self::write(workbook, file)
    }

    /// Write a workbook to a writer
    pub fn write<W: Write + Seek>(workbook: &Workbook, writer: W) -> XlsxResult<()> {
        let mut zip = zip::ZipWriter::new(writer);

        let style_table = XlsxStyleTable::build(workbook);

        Self::write_content_types(&mut zip, workbook)?;
        Self::write_root_rels(&mut zip)?;
        Self::write_workbook_xml(&mut zip, workbook)?;
        Self::write_workbook_rels(&mut zip, workbook)?;
        Self::write_styles_xml(&mut zip, &style_table)?;

        for i in 0..workbook.sheet_count() {
            Self::write_worksheet(&mut zip, workbook, i, &style_table)?;
        }

        zip.finish()?;
        log::debug!("wrote xlsx workbook with {} sheet(s)", workbook.sheet_count());
        Ok(())
    }

    fn write_content_types<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        workbook: &Workbook,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("[Content_Types].xml", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
        );

        for i in 0..workbook.sheet_count() {
            content.push_str(&format!(
                r#"
    <Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                i + 1
            ));
        }

        content.push_str("\n</Types>");

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_root_rels<W: Write + Seek>(zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("_rels/.rels", options)?;

        let content = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_workbook_xml<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        workbook: &Workbook,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/workbook.xml", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        );

        if workbook.is_date_1904() {
            content.push_str("\n    <workbookPr date1904=\"1\"/>");
        }

        content.push_str("\n    <sheets>");
        for (i, sheet) in workbook.worksheets().enumerate() {
            content.push_str(&format!(
                r#"
        <sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape_xml(sheet.name()),
                i + 1,
                i + 1
            ));
        }

        content.push_str(
            r#"
    </sheets>
</workbook>"#,
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_workbook_rels<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        workbook: &Workbook,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/_rels/workbook.xml.rels", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );

        for i in 0..workbook.sheet_count() {
            content.push_str(&format!(
                r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                i + 1,
                i + 1
            ));
        }

        let styles_rid = workbook.sheet_count() + 1;
        content.push_str(&format!(
            r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
            styles_rid
        ));

        content.push_str("\n</Relationships>");

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_styles_xml<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        style_table: &XlsxStyleTable,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/styles.xml", options)?;
        let xml = style_table.to_styles_xml();
        zip.write_all(xml.as_bytes())?;
        Ok(())
    }

    fn write_worksheet<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        workbook: &Workbook,
        index: usize,
        style_table: &XlsxStyleTable,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file(format!("xl/worksheets/sheet{}.xml", index + 1), options)?;

        let sheet = workbook
            .worksheet(index)
            .ok_or_else(|| XlsxError::InvalidFormat("Sheet not found".into()))?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        content.push_str(&format!("\n    <dimension ref=\"{}\"/>", dimension_ref(sheet)));

        let widths = sheet.custom_column_widths();
        if !widths.is_empty() {
            content.push_str("\n    <cols>");
            for (col, width) in widths {
                content.push_str(&format!(
                    "\n        <col min=\"{0}\" max=\"{0}\" width=\"{1}\" customWidth=\"1\"/>",
                    col + 1,
                    width
                ));
            }
            content.push_str("\n    </cols>");
        }

        content.push_str("\n    <sheetData>");

        for (row, cells) in sheet.rows() {
            content.push_str(&format!("\n        <row r=\"{}\">", row + 1));

            for (&col, cell) in cells {
                let cell_ref = CellAddress::new(row, col).to_a1_string();

                let xf_id = style_table.xf_id_for(index, cell.style_index);
                let style_attr = if xf_id != 0 {
                    format!(" s=\"{}\"", xf_id)
                } else {
                    String::new()
                };

                match &cell.value {
                    CellValue::Number(n) if n.is_finite() => {
                        content.push_str(&format!(
                            "\n            <c r=\"{}\"{}><v>{}</v></c>",
                            cell_ref, style_attr, n
                        ));
                    }
                    CellValue::Number(n) => {
                        log::warn!("writing non-finite number {} at {} as #NUM!", n, cell_ref);
                        content.push_str(&format!(
                            "\n            <c r=\"{}\"{} t=\"e\"><v>#NUM!</v></c>",
                            cell_ref, style_attr
                        ));
                    }
                    CellValue::String(s) => {
                        let space = if needs_space_preserve(s) {
                            " xml:space=\"preserve\""
                        } else {
                            ""
                        };
                        content.push_str(&format!(
                            "\n            <c r=\"{}\"{} t=\"inlineStr\"><is><t{}>{}</t></is></c>",
                            cell_ref,
                            style_attr,
                            space,
                            escape_xml(&encode_excel_escapes(s))
                        ));
                    }
                    CellValue::Boolean(b) => {
                        content.push_str(&format!(
                            "\n            <c r=\"{}\"{} t=\"b\"><v>{}</v></c>",
                            cell_ref,
                            style_attr,
                            u8::from(*b)
                        ));
                    }
                    CellValue::Error(e) => {
                        content.push_str(&format!(
                            "\n            <c r=\"{}\"{} t=\"e\"><v>{}</v></c>",
                            cell_ref,
                            style_attr,
                            escape_xml(e.as_str())
                        ));
                    }
                    CellValue::Empty => {
                        // Preserve style-only cells
                        if xf_id != 0 {
                            content.push_str(&format!(
                                "\n            <c r=\"{}\"{}/>",
                                cell_ref, style_attr
                            ));
                        }
                    }
                }
            }

            content.push_str("\n        </row>");
        }

        content.push_str("\n    </sheetData>\n</worksheet>");

        zip.write_all(content.as_bytes())?;
        Ok(())
    }
}

/// The used range of a sheet, `A1` when it has no cells
fn dimension_ref(sheet: &Worksheet) -> String {
    let (first_row, last_row) = match (sheet.first_row(), sheet.last_row()) {
        (Some(first), Some(last)) => (first, last),
        _ => return "A1".to_string(),
    };

    let mut first_col = u16::MAX;
    let mut last_col = 0u16;
    for (_, cells) in sheet.rows() {
        if let (Some(first), Some(last)) = (cells.keys().next(), cells.keys().next_back()) {
            first_col = first_col.min(*first);
            last_col = last_col.max(*last);
        }
    }

    let start = CellAddress::new(first_row, first_col);
    let end = CellAddress::new(last_row, last_col);
    if start == end {
        start.to_a1_string()
    } else {
        format!("{}:{}", start, end)
    }
}
