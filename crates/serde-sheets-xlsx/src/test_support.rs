//! In-memory package fixtures for unit tests

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Build a minimal XLSX package
///
/// `workbook_inner` goes inside `<workbook>`; each sheet is
/// `(relationship id, target relative to xl/, content inside <worksheet>)`.
pub(crate) fn build_package(
    workbook_inner: &str,
    sheets: &[(&str, &str, &str)],
    shared_strings: Option<&str>,
) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buf));
        let options = SimpleFileOptions::default();

        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(
            br#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"></Types>"#,
        )
        .unwrap();

        zip.start_file("xl/workbook.xml", options).unwrap();
        zip.write_all(
            format!(
                r#"<?xml version="1.0" encoding="UTF-8"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">{}</workbook>"#,
                workbook_inner
            )
            .as_bytes(),
        )
        .unwrap();

        let mut rels = String::from(
            r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for (rid, target, _) in sheets {
            rels.push_str(&format!(
                r#"<Relationship Id="{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="{}"/>"#,
                rid, target
            ));
        }
        if shared_strings.is_some() {
            rels.push_str(
                r#"<Relationship Id="rIdSst" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>"#,
            );
        }
        rels.push_str("</Relationships>");
        zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
        zip.write_all(rels.as_bytes()).unwrap();

        for (_, target, inner) in sheets {
            zip.start_file(format!("xl/{}", target), options).unwrap();
            zip.write_all(
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">{}</worksheet>"#,
                    inner
                )
                .as_bytes(),
            )
            .unwrap();
        }

        if let Some(sst) = shared_strings {
            zip.start_file("xl/sharedStrings.xml", options).unwrap();
            zip.write_all(sst.as_bytes()).unwrap();
        }

        zip.finish().unwrap();
    }
    buf
}
