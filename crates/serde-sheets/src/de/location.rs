use std::fmt;

use serde_sheets_core::CellAddress;

/// Zero-based position of a cell or row in a sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SheetLocation {
    pub row: u32,
    pub column: Option<u16>,
}

impl SheetLocation {
    pub fn new(row: u32, column: Option<u16>) -> Self {
        Self { row, column }
    }

    /// Location of a whole row
    pub fn row(row: u32) -> Self {
        Self { row, column: None }
    }
}

impl From<CellAddress> for SheetLocation {
    fn from(address: CellAddress) -> Self {
        Self::new(address.row, Some(address.col))
    }
}

impl fmt::Display for SheetLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column {
            Some(col) => write!(f, "{}", CellAddress::new(self.row, col)),
            None => write!(f, "row {}", self.row + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(SheetLocation::new(2, Some(1)).to_string(), "B3");
        assert_eq!(SheetLocation::row(4).to_string(), "row 5");
    }
}
