//! XLSX error types

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur during XLSX reading/writing
#[derive(Debug, Error)]
pub enum XlsxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Invalid file format
    #[error("Invalid XLSX format: {0}")]
    InvalidFormat(String),

    /// Missing required part
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Requested sheet index does not exist
    #[error("Sheet index ({index}) is out of range {}", range_text(*.count))]
    SheetIndexOutOfRange { index: usize, count: usize },

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] serde_sheets_core::Error),
}

fn range_text(count: usize) -> String {
    if count == 0 {
        "(no sheets)".to_string()
    } else {
        format!("(0..{})", count - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_index_message() {
        let err = XlsxError::SheetIndexOutOfRange { index: 1, count: 1 };
        assert_eq!(err.to_string(), "Sheet index (1) is out of range (0..0)");

        let err = XlsxError::SheetIndexOutOfRange { index: 0, count: 0 };
        assert_eq!(err.to_string(), "Sheet index (0) is out of range (no sheets)");
    }
}
