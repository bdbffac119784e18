//! Error types for serde-sheets-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the workbook model
#[derive(Debug, Error)]
pub enum Error {
    /// An A1 reference or column letters could not be parsed
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Row index past the last sheet row
    #[error("Row index {0} out of bounds (max: {1})")]
    RowOutOfBounds(u32, u32),

    /// Column index past the last sheet column
    #[error("Column index {0} out of bounds (max: {1})")]
    ColumnOutOfBounds(u32, u16),

    #[error("Invalid sheet name '{name}': {reason}")]
    InvalidSheetName { name: String, reason: String },

    /// Sheet names are unique ignoring case
    #[error("Sheet name already exists: {0}")]
    DuplicateSheetName(String),

    /// The index does not refer to a pooled style
    #[error("Invalid style index: {0}")]
    InvalidStyleIndex(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = Error::InvalidSheetName {
            name: "a/b".into(),
            reason: "contains '/'".into(),
        };
        assert_eq!(err.to_string(), "Invalid sheet name 'a/b': contains '/'");
        assert_eq!(
            Error::RowOutOfBounds(1_048_576, 1_048_575).to_string(),
            "Row index 1048576 out of bounds (max: 1048575)"
        );
    }
}
