//! Error types for serde-sheets

use std::fmt::Display;

use thiserror::Error;

use crate::de::SheetLocation;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while generating schemas, writing or reading sheets
#[derive(Debug, Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// XLSX package error
    #[error(transparent)]
    Xlsx(#[from] serde_sheets_xlsx::XlsxError),

    /// Workbook model error
    #[error(transparent)]
    Core(#[from] serde_sheets_core::Error),

    /// Message raised by a `Serialize`/`Deserialize` impl
    #[error("{0}")]
    Message(String),

    /// A schema could not be generated for a type
    #[error("Failed to generate schema of type 'spreadsheet' for `{type_name}`, problem: {problem}")]
    InvalidDefinition { type_name: String, problem: String },

    /// A value of an unsupported shape was met
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Generator or parser used before a schema was set
    #[error("No schema of type 'spreadsheet' set, can not {0}")]
    NoSchema(&'static str),

    /// The requested sheet does not exist
    #[error("No sheet for {0}")]
    NoSheet(String),

    /// A collection was written at the root without a row type
    #[error("value type MUST be specified to write a value of a collection or array type")]
    ValueTypeRequired,

    /// Origin address could not be parsed
    #[error("Invalid origin address: {0}")]
    InvalidOrigin(String),

    /// A cell holds a value that can not be mapped
    #[error("Unexpected cell value {value} at {location}")]
    UnexpectedCell {
        value: String,
        location: SheetLocation,
    },

    /// A row could not be mapped to the target type
    #[error("{message} at {location}")]
    Read {
        message: String,
        location: SheetLocation,
    },

    /// A blank row kept as null could not be mapped to the target type
    #[error("{message} at {location}, a blank row read as null")]
    BlankRow {
        message: String,
        location: SheetLocation,
    },
}

impl Error {
    /// Create a message error
    pub fn message<S: Into<String>>(msg: S) -> Self {
        Error::Message(msg.into())
    }

    /// Attach a sheet location to a mapping error
    ///
    /// Only plain messages and unsupported types are relocated; errors that
    /// already carry a position or come from the package are kept.
    pub fn at(self, location: SheetLocation) -> Self {
        match self {
            Error::Message(message) => Error::Read { message, location },
            Error::UnsupportedType(what) => Error::Read {
                message: format!("Unsupported type: {}", what),
                location,
            },
            other => other,
        }
    }

    /// Mark a mapping error as raised by a blank row
    pub(crate) fn in_blank_row(self) -> Self {
        match self {
            Error::Read { message, location } => Error::BlankRow { message, location },
            other => other,
        }
    }

    /// Location of the cell or row the error refers to
    pub fn location(&self) -> Option<SheetLocation> {
        match self {
            Error::UnexpectedCell { location, .. }
            | Error::Read { location, .. }
            | Error::BlankRow { location, .. } => Some(*location),
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            Error::NoSchema("generate").to_string(),
            "No schema of type 'spreadsheet' set, can not generate"
        );
        let err = Error::InvalidDefinition {
            type_name: "Foo".into(),
            problem: "Unsupported type: map".into(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to generate schema of type 'spreadsheet' for `Foo`, problem: Unsupported type: map"
        );
    }

    #[test]
    fn test_at_relocates_messages() {
        let location = SheetLocation::new(2, Some(1));
        let err = Error::message("missing field `a`").at(location);
        assert_eq!(err.to_string(), "missing field `a` at B3");
        assert_eq!(err.location(), Some(location));

        let err = Error::NoSchema("parse").at(location);
        assert!(err.location().is_none());
    }

    #[test]
    fn test_blank_row_errors_name_the_row() {
        let location = SheetLocation::row(6);
        let err = Error::message("missing field `a`").at(location).in_blank_row();
        assert_eq!(
            err.to_string(),
            "missing field `a` at row 7, a blank row read as null"
        );
        assert_eq!(err.location(), Some(location));
    }
}
