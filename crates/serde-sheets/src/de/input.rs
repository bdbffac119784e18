//! Read sources

use std::fmt;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use log::debug;
use serde_sheets_xlsx::{SheetStreamReader, XlsxPackage};

use crate::error::{Error, Result};

#[derive(Clone)]
enum Source {
    File(PathBuf),
    Bytes(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SheetSelector {
    Index(usize),
    Name(String),
}

/// A workbook source and the sheet to read from it
///
/// ```rust,no_run
/// use serde_sheets::SheetInput;
///
/// let by_index = SheetInput::file("report.xlsx").at(1);
/// let by_name = SheetInput::file("report.xlsx").named("Data");
/// # let _ = (by_index, by_name);
/// ```
#[derive(Clone)]
pub struct SheetInput {
    source: Source,
    sheet: SheetSelector,
}

impl SheetInput {
    /// First sheet of a file
    pub fn file<P: AsRef<Path>>(path: P) -> Self {
        Self {
            source: Source::File(path.as_ref().to_path_buf()),
            sheet: SheetSelector::Index(0),
        }
    }

    /// First sheet of an in-memory workbook
    pub fn bytes(bytes: Vec<u8>) -> Self {
        Self {
            source: Source::Bytes(bytes),
            sheet: SheetSelector::Index(0),
        }
    }

    /// Buffer a stream fully
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Self::bytes(bytes))
    }

    /// Select the sheet at `index`
    pub fn at(mut self, index: usize) -> Self {
        self.sheet = SheetSelector::Index(index);
        self
    }

    /// Select the sheet called `name`
    pub fn named<S: Into<String>>(mut self, name: S) -> Self {
        self.sheet = SheetSelector::Name(name.into());
        self
    }

    /// Open the package and position a reader on the selected sheet
    pub fn open(self) -> Result<SheetStreamReader> {
        let description = self.to_string();
        let reader = match self.source {
            Source::File(path) => select(XlsxPackage::open_file(path)?, &self.sheet)?,
            Source::Bytes(bytes) => select(XlsxPackage::from_bytes(bytes)?, &self.sheet)?,
        };
        match reader {
            Some(reader) => {
                debug!("Opened {}", description);
                Ok(reader)
            }
            None => Err(Error::NoSheet(description)),
        }
    }
}

fn select<R: Read + Seek>(
    mut package: XlsxPackage<R>,
    sheet: &SheetSelector,
) -> Result<Option<SheetStreamReader>> {
    Ok(match sheet {
        SheetSelector::Index(index) => Some(package.sheet_reader_at(*index)?),
        SheetSelector::Name(name) => package.sheet_reader_by_name(name)?,
    })
}

impl From<PathBuf> for SheetInput {
    fn from(path: PathBuf) -> Self {
        Self::file(path)
    }
}

impl From<&Path> for SheetInput {
    fn from(path: &Path) -> Self {
        Self::file(path)
    }
}

impl From<Vec<u8>> for SheetInput {
    fn from(bytes: Vec<u8>) -> Self {
        Self::bytes(bytes)
    }
}

impl fmt::Display for SheetInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Source::File(path) => write!(f, "file '{}'", path.display())?,
            Source::Bytes(bytes) => write!(f, "{} bytes", bytes.len())?,
        }
        match &self.sheet {
            SheetSelector::Index(index) => write!(f, ", sheet at index {}", index),
            SheetSelector::Name(name) => write!(f, ", sheet '{}'", name),
        }
    }
}

impl fmt::Debug for SheetInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SheetInput").field(&self.to_string()).finish()
    }
}
