//! XLSX package access
//!
//! Opens the zip container, reads `xl/workbook.xml` and its relationships,
//! and hands out streaming readers for individual worksheets.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::reader::SheetStreamReader;
use crate::shared_strings::LazySharedStrings;

const REL_WORKSHEET: &str = "/worksheet";
const REL_SHARED_STRINGS: &str = "/sharedStrings";

/// A worksheet listed in `workbook.xml`
#[derive(Debug, Clone)]
struct SheetEntry {
    name: String,
    path: String,
}

/// An opened XLSX package
pub struct XlsxPackage<R: Read + Seek> {
    archive: zip::ZipArchive<R>,
    sheets: Vec<SheetEntry>,
    shared_strings_path: Option<String>,
    date_1904: bool,
}

impl XlsxPackage<BufReader<File>> {
    /// Open a package from a file path
    pub fn open_file<P: AsRef<Path>>(path: P) -> XlsxResult<Self> {
        let file = File::open(path)?;
        Self::open(BufReader::new(file))
    }
}

impl XlsxPackage<Cursor<Vec<u8>>> {
    /// Open a package held in memory
    pub fn from_bytes(bytes: Vec<u8>) -> XlsxResult<Self> {
        Self::open(Cursor::new(bytes))
    }
}

impl<R: Read + Seek> XlsxPackage<R> {
    /// Open a package from a seekable reader
    pub fn open(reader: R) -> XlsxResult<Self> {
        let mut archive = zip::ZipArchive::new(reader)?;

        // Verify this is an OOXML package
        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let workbook = read_workbook_xml(&mut archive)?;
        let rels = read_workbook_rels(&mut archive)?;

        let mut sheets = Vec::with_capacity(workbook.sheets.len());
        for (name, r_id) in workbook.sheets {
            match rels.worksheets.get(&r_id) {
                Some(path) => sheets.push(SheetEntry {
                    name,
                    path: path.clone(),
                }),
                None => log::warn!("sheet '{}' has no worksheet relationship ({})", name, r_id),
            }
        }

        log::debug!(
            "opened xlsx package: {} sheet(s), date1904={}",
            sheets.len(),
            workbook.date_1904
        );

        Ok(Self {
            archive,
            sheets,
            shared_strings_path: rels.shared_strings,
            date_1904: workbook.date_1904,
        })
    }

    /// Names of all worksheets, in workbook order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Number of worksheets
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Whether the workbook uses the 1904 date system
    pub fn is_date_1904(&self) -> bool {
        self.date_1904
    }

    /// Index of the sheet with the given name, ignoring case
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        let name = name.to_lowercase();
        self.sheets
            .iter()
            .position(|s| s.name.to_lowercase() == name)
    }

    /// Stream the sheet at `index`
    pub fn sheet_reader_at(&mut self, index: usize) -> XlsxResult<SheetStreamReader> {
        let entry = self
            .sheets
            .get(index)
            .cloned()
            .ok_or(XlsxError::SheetIndexOutOfRange {
                index,
                count: self.sheets.len(),
            })?;
        self.open_sheet(&entry)
    }

    /// Stream the sheet with the given name (case-insensitive); `None` when absent
    pub fn sheet_reader_by_name(&mut self, name: &str) -> XlsxResult<Option<SheetStreamReader>> {
        match self.sheet_index(name) {
            Some(index) => self.sheet_reader_at(index).map(Some),
            None => Ok(None),
        }
    }

    fn open_sheet(&mut self, entry: &SheetEntry) -> XlsxResult<SheetStreamReader> {
        log::debug!("opening sheet '{}' at {}", entry.name, entry.path);
        let sheet_xml = self.read_part(&entry.path)?;
        let shared_strings = match self.shared_strings_path.clone() {
            Some(path) => match self.read_part(&path) {
                Ok(bytes) => LazySharedStrings::new(bytes),
                Err(XlsxError::MissingPart(_)) => LazySharedStrings::empty(),
                Err(e) => return Err(e),
            },
            None => LazySharedStrings::empty(),
        };
        Ok(SheetStreamReader::new(
            entry.name.clone(),
            sheet_xml,
            shared_strings,
            self.date_1904,
        ))
    }

    fn read_part(&mut self, path: &str) -> XlsxResult<Vec<u8>> {
        let mut file = self
            .archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;
        let mut bytes = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

/// Contents of `xl/workbook.xml` the reader cares about
pub(crate) struct WorkbookInfo {
    /// (name, relationship id) per sheet
    pub sheets: Vec<(String, String)>,
    pub date_1904: bool,
}

/// Worksheet and shared-string targets from `xl/_rels/workbook.xml.rels`
pub(crate) struct WorkbookRels {
    pub worksheets: HashMap<String, String>,
    pub shared_strings: Option<String>,
}

/// Read workbook.xml to get sheet names, rIds and the date system
pub(crate) fn read_workbook_xml<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
) -> XlsxResult<WorkbookInfo> {
    let file = archive
        .by_name("xl/workbook.xml")
        .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

    let mut xml_reader = Reader::from_reader(BufReader::new(file));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut info = WorkbookInfo {
        sheets: Vec::new(),
        date_1904: false,
    };

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"sheet" => {
                    let mut name = None;
                    let mut r_id = None;

                    for attr in e.attributes().flatten() {
                        let key = attr.key;
                        if key.as_ref() == b"name" {
                            name = attr.unescape_value().ok().map(|s| s.to_string());
                        } else if key.prefix().is_some() && key.local_name().as_ref() == b"id" {
                            r_id = attr.unescape_value().ok().map(|s| s.to_string());
                        }
                    }

                    if let (Some(name), Some(r_id)) = (name, r_id) {
                        info.sheets.push((name, r_id));
                    }
                }
                b"workbookPr" => {
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"date1904" {
                            info.date_1904 = attr
                                .unescape_value()
                                .map(|v| is_true(&v))
                                .unwrap_or(false);
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(info)
}

/// Read workbook.xml.rels to get worksheet and shared-string part paths
pub(crate) fn read_workbook_rels<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
) -> XlsxResult<WorkbookRels> {
    let file = archive
        .by_name("xl/_rels/workbook.xml.rels")
        .map_err(|_| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

    let mut xml_reader = Reader::from_reader(BufReader::new(file));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut rels = WorkbookRels {
        worksheets: HashMap::new(),
        shared_strings: None,
    };

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let mut id = None;
                let mut target = None;
                let mut rel_type = None;

                for attr in e.attributes().flatten() {
                    let value = attr.unescape_value().ok().map(|s| s.to_string());
                    match attr.key.as_ref() {
                        b"Id" => id = value,
                        b"Target" => target = value,
                        b"Type" => rel_type = value,
                        _ => {}
                    }
                }

                if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                    let path = resolve_target(&target);
                    if rel_type.ends_with(REL_WORKSHEET) {
                        rels.worksheets.insert(id, path);
                    } else if rel_type.ends_with(REL_SHARED_STRINGS) {
                        rels.shared_strings = Some(path);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}

/// Targets are relative to `xl/` unless absolute
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{}", target),
    }
}

pub(crate) fn is_true(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
