//! Sheet token protocol

/// Tokens produced by a streaming sheet reader
///
/// A sheet yields `SheetDataStart`, then for every row `RowStart`, one
/// `CellValue` per stored cell and `RowEnd`, and finally `SheetDataEnd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetToken {
    /// Start of the sheet data
    SheetDataStart,
    /// Start of a row
    RowStart,
    /// A cell; its value and position are available from the reader
    CellValue,
    /// End of a row
    RowEnd,
    /// End of the sheet data
    SheetDataEnd,
}

impl SheetToken {
    /// True for tokens that open a scope
    pub fn is_start(&self) -> bool {
        matches!(self, SheetToken::SheetDataStart | SheetToken::RowStart)
    }

    /// True for tokens that close a scope
    pub fn is_end(&self) -> bool {
        matches!(self, SheetToken::SheetDataEnd | SheetToken::RowEnd)
    }
}
