//! Workbook type - the main document structure

use crate::error::{Error, Result};
use crate::worksheet::Worksheet;
use crate::MAX_SHEET_NAME_LEN;

/// A workbook (spreadsheet document)
///
/// A workbook contains worksheets and global settings.
#[derive(Debug)]
pub struct Workbook {
    worksheets: Vec<Worksheet>,
    settings: WorkbookSettings,
}

impl Workbook {
    /// Create a new workbook with one worksheet named "Sheet1"
    pub fn new() -> Self {
        Self {
            worksheets: vec![Worksheet::new("Sheet1")],
            settings: WorkbookSettings::default(),
        }
    }

    /// Create an empty workbook with no worksheets
    pub fn empty() -> Self {
        Self {
            worksheets: Vec::new(),
            settings: WorkbookSettings::default(),
        }
    }

    /// Get the number of worksheets
    pub fn sheet_count(&self) -> usize {
        self.worksheets.len()
    }

    /// Check if the workbook has no worksheets
    pub fn is_empty(&self) -> bool {
        self.worksheets.is_empty()
    }

    /// Get a worksheet by index
    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.worksheets.get(index)
    }

    /// Get a mutable worksheet by index
    pub fn worksheet_mut(&mut self, index: usize) -> Option<&mut Worksheet> {
        self.worksheets.get_mut(index)
    }

    /// Get a worksheet by name, ignoring case
    pub fn worksheet_by_name(&self, name: &str) -> Option<&Worksheet> {
        self.sheet_index(name).map(|i| &self.worksheets[i])
    }

    /// Get a mutable worksheet by name, ignoring case
    pub fn worksheet_by_name_mut(&mut self, name: &str) -> Option<&mut Worksheet> {
        self.sheet_index(name).map(move |i| &mut self.worksheets[i])
    }

    /// Get the index of a worksheet by name, ignoring case
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        let name = name.to_lowercase();
        self.worksheets
            .iter()
            .position(|ws| ws.name().to_lowercase() == name)
    }

    /// Iterate over all worksheets
    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.worksheets.iter()
    }

    /// Add a new worksheet with the next free "SheetN" name
    pub fn add_worksheet(&mut self) -> Result<usize> {
        let name = self.generate_sheet_name();
        self.add_worksheet_with_name(&name)
    }

    /// Add a new worksheet with specified name
    pub fn add_worksheet_with_name(&mut self, name: &str) -> Result<usize> {
        self.validate_sheet_name(name)?;
        self.worksheets.push(Worksheet::new(name));
        Ok(self.worksheets.len() - 1)
    }

    /// Add an existing worksheet to the workbook
    pub fn add_existing_worksheet(&mut self, worksheet: Worksheet) -> Result<usize> {
        self.validate_sheet_name(worksheet.name())?;
        self.worksheets.push(worksheet);
        Ok(self.worksheets.len() - 1)
    }

    /// Get workbook settings
    pub fn settings(&self) -> &WorkbookSettings {
        &self.settings
    }

    /// Get mutable workbook settings
    pub fn settings_mut(&mut self) -> &mut WorkbookSettings {
        &mut self.settings
    }

    /// Whether dates use the 1904 system
    pub fn is_date_1904(&self) -> bool {
        self.settings.date_1904
    }

    /// Switch between the 1900 and 1904 date systems
    pub fn set_date_1904(&mut self, date_1904: bool) {
        self.settings.date_1904 = date_1904;
    }

    fn validate_sheet_name(&self, name: &str) -> Result<()> {
        let invalid = |reason: String| Error::InvalidSheetName {
            name: name.to_string(),
            reason,
        };
        if name.is_empty() {
            return Err(invalid("must not be empty".into()));
        }
        if name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(invalid(format!(
                "longer than {} characters",
                MAX_SHEET_NAME_LEN
            )));
        }
        const INVALID_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];
        if let Some(c) = name.chars().find(|c| INVALID_CHARS.contains(c)) {
            return Err(invalid(format!("contains '{}'", c)));
        }
        if self.sheet_index(name).is_some() {
            return Err(Error::DuplicateSheetName(name.into()));
        }

        Ok(())
    }

    fn generate_sheet_name(&self) -> String {
        let mut n = self.worksheets.len() + 1;
        loop {
            let name = format!("Sheet{}", n);
            if self.sheet_index(&name).is_none() {
                return name;
            }
            n += 1;
        }
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}

/// Workbook-level settings
#[derive(Debug, Clone, Default)]
pub struct WorkbookSettings {
    /// Date system: false = 1900 (Windows), true = 1904 (Mac)
    pub date_1904: bool,
}
