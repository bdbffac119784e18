//! Schema columns

use std::fmt;

use super::{ColumnOptions, ColumnPointer};

/// Value type of a column, also the fallback key for style lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Boolean,
    Integer,
    Float,
    Text,
    Date,
    DateTime,
    /// Self-describing values
    Any,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Boolean => "boolean",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Text => "text",
            ColumnType::Date => "date",
            ColumnType::DateTime => "datetime",
            ColumnType::Any => "any",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ColumnType::Integer | ColumnType::Float | ColumnType::Date | ColumnType::DateTime
        )
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One column of a [`SpreadsheetSchema`](super::SpreadsheetSchema)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pointer: ColumnPointer,
    options: ColumnOptions,
    value_type: ColumnType,
    array: bool,
}

impl Column {
    pub fn new(
        pointer: ColumnPointer,
        options: ColumnOptions,
        value_type: ColumnType,
        array: bool,
    ) -> Self {
        Self {
            pointer,
            options,
            value_type,
            array,
        }
    }

    /// Header text
    pub fn name(&self) -> String {
        if self.options.name.is_empty() {
            self.pointer.to_string()
        } else {
            self.options.name.clone()
        }
    }

    pub fn pointer(&self) -> &ColumnPointer {
        &self.pointer
    }

    pub fn options(&self) -> &ColumnOptions {
        &self.options
    }

    pub fn value_type(&self) -> ColumnType {
        self.value_type
    }

    /// True for a column holding a sequence of scalars
    pub fn is_array(&self) -> bool {
        self.array
    }

    /// True for the column's own pointer, and for an array column also for
    /// the pointer of the field holding the sequence
    pub fn matches(&self, pointer: &ColumnPointer) -> bool {
        self.pointer == *pointer || (self.array && self.pointer.parent() == *pointer)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}: {})", self.name(), self.pointer, self.value_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_falls_back_to_pointer() {
        let column = Column::new(
            ColumnPointer::parse("inner/b"),
            ColumnOptions::default(),
            ColumnType::Integer,
            false,
        );
        assert_eq!(column.name(), "inner/b");

        let named = Column::new(
            ColumnPointer::parse("a"),
            ColumnOptions::named("Alpha"),
            ColumnType::Text,
            false,
        );
        assert_eq!(named.name(), "Alpha");
    }

    #[test]
    fn test_array_column_matches_field() {
        let column = Column::new(
            ColumnPointer::parse("tags/[]"),
            ColumnOptions::default(),
            ColumnType::Text,
            true,
        );
        assert!(column.matches(&ColumnPointer::parse("tags/[]")));
        assert!(column.matches(&ColumnPointer::parse("tags")));
        assert!(!column.matches(&ColumnPointer::parse("other")));
    }
}
