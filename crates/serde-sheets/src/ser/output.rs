//! Write targets

use std::fmt;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use log::debug;
use serde_sheets_core::Workbook;
use serde_sheets_xlsx::XlsxWriter;

use crate::error::Result;

/// Default name of a written sheet
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

enum Target<'a> {
    File(PathBuf),
    Writer(&'a mut dyn Write),
}

/// Where a workbook is written and which sheet receives the rows
pub struct SheetOutput<'a> {
    target: Target<'a>,
    sheet_name: Option<String>,
}

impl SheetOutput<'static> {
    /// Write to a file, replacing it
    pub fn file<P: AsRef<Path>>(path: P) -> Self {
        Self {
            target: Target::File(path.as_ref().to_path_buf()),
            sheet_name: None,
        }
    }
}

impl<'a> SheetOutput<'a> {
    /// Write the XLSX bytes to a stream
    pub fn writer(writer: &'a mut dyn Write) -> Self {
        Self {
            target: Target::Writer(writer),
            sheet_name: None,
        }
    }

    /// Name the sheet holding the rows
    pub fn named<S: Into<String>>(mut self, name: S) -> Self {
        self.sheet_name = Some(name.into());
        self
    }

    pub fn sheet_name(&self) -> &str {
        self.sheet_name.as_deref().unwrap_or(DEFAULT_SHEET_NAME)
    }

    pub(crate) fn write_workbook(self, workbook: &Workbook) -> Result<()> {
        debug!("Writing workbook to {}", self);
        match self.target {
            Target::File(path) => XlsxWriter::write_file(workbook, path)?,
            Target::Writer(writer) => {
                let mut buffer = Cursor::new(Vec::new());
                XlsxWriter::write(workbook, &mut buffer)?;
                writer.write_all(buffer.get_ref())?;
                writer.flush()?;
            }
        }
        Ok(())
    }
}

impl From<PathBuf> for SheetOutput<'static> {
    fn from(path: PathBuf) -> Self {
        Self::file(path)
    }
}

impl From<&Path> for SheetOutput<'static> {
    fn from(path: &Path) -> Self {
        Self::file(path)
    }
}

impl fmt::Display for SheetOutput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Target::File(path) => write!(f, "file '{}'", path.display())?,
            Target::Writer(_) => write!(f, "stream")?,
        }
        write!(f, ", sheet '{}'", self.sheet_name())
    }
}

impl fmt::Debug for SheetOutput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetOutput")
            .field("target", &self.to_string())
            .field("sheet_name", &self.sheet_name)
            .finish()
    }
}
