//! Cell value types

use std::fmt;

/// Represents the value stored in a cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Empty cell (no value)
    #[default]
    Empty,

    /// Boolean value (TRUE/FALSE)
    Boolean(bool),

    /// Numeric value (all numbers stored as f64, including dates)
    Number(f64),

    /// String value
    String(String),

    /// Error value (#VALUE!, #REF!, etc.)
    Error(CellError),
}

impl CellValue {
    /// Create a new string value
    pub fn string<S: Into<String>>(s: S) -> Self {
        CellValue::String(s.into())
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Check if the cell contains an error
    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error(_))
    }

    /// True for a number without a fractional part
    pub fn has_no_fractional_part(&self) -> bool {
        match self {
            CellValue::Number(n) => n.is_finite() && n.fract() == 0.0,
            _ => false,
        }
    }

    /// Try to get the value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the value as a string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Text of the value under the General number format
    ///
    /// Integral numbers print without a decimal point, booleans as
    /// `TRUE`/`FALSE`, errors as their error literal.
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            CellValue::Number(n) => format_general(*n),
            CellValue::String(s) => s.clone(),
            CellValue::Error(e) => e.as_str().to_string(),
        }
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Empty => "blank",
            CellValue::Boolean(_) => "boolean",
            CellValue::Number(_) => "number",
            CellValue::String(_) => "string",
            CellValue::Error(_) => "error",
        }
    }
}

fn format_general(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text())
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::string(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<CellError> for CellValue {
    fn from(e: CellError) -> Self {
        CellValue::Error(e)
    }
}

/// Excel error values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellError {
    /// #NULL! - Incorrect range operator
    Null,
    /// #DIV/0! - Division by zero
    Div0,
    /// #VALUE! - Wrong type of argument or operand
    Value,
    /// #REF! - Invalid cell reference
    Ref,
    /// #NAME? - Unrecognized formula name
    Name,
    /// #NUM! - Invalid numeric value
    Num,
    /// #N/A - Value not available
    Na,
    /// #GETTING_DATA - External data is loading
    GettingData,
}

impl CellError {
    /// Get the display string for this error
    pub fn as_str(&self) -> &'static str {
        match self {
            CellError::Null => "#NULL!",
            CellError::Div0 => "#DIV/0!",
            CellError::Value => "#VALUE!",
            CellError::Ref => "#REF!",
            CellError::Name => "#NAME?",
            CellError::Num => "#NUM!",
            CellError::Na => "#N/A",
            CellError::GettingData => "#GETTING_DATA",
        }
    }

    /// Parse an error string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "#NULL!" => Some(CellError::Null),
            "#DIV/0!" => Some(CellError::Div0),
            "#VALUE!" => Some(CellError::Value),
            "#REF!" => Some(CellError::Ref),
            "#NAME?" => Some(CellError::Name),
            "#NUM!" => Some(CellError::Num),
            "#N/A" => Some(CellError::Na),
            "#GETTING_DATA" => Some(CellError::GettingData),
            _ => None,
        }
    }

    /// Get the numeric error code (for BIFF format)
    pub fn code(&self) -> u8 {
        match self {
            CellError::Null => 0x00,
            CellError::Div0 => 0x07,
            CellError::Value => 0x0F,
            CellError::Ref => 0x17,
            CellError::Name => 0x1D,
            CellError::Num => 0x24,
            CellError::Na => 0x2A,
            CellError::GettingData => 0x2B,
        }
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_conversions() {
        assert_eq!(CellValue::from(42), CellValue::Number(42.0));
        assert_eq!(CellValue::from(3.5), CellValue::Number(3.5));
        assert_eq!(CellValue::from(true), CellValue::Boolean(true));
        assert_eq!(CellValue::from("hello").as_string(), Some("hello"));
    }

    #[test]
    fn test_fractional_part() {
        assert!(CellValue::Number(2.0).has_no_fractional_part());
        assert!(CellValue::Number(-7.0).has_no_fractional_part());
        assert!(!CellValue::Number(2.5).has_no_fractional_part());
        assert!(!CellValue::Number(f64::NAN).has_no_fractional_part());
        assert!(!CellValue::string("2").has_no_fractional_part());
    }

    #[test]
    fn test_display_text() {
        assert_eq!(CellValue::Number(1.0).display_text(), "1");
        assert_eq!(CellValue::Number(1.25).display_text(), "1.25");
        assert_eq!(CellValue::Boolean(false).display_text(), "FALSE");
        assert_eq!(CellValue::Error(CellError::Na).display_text(), "#N/A");
        assert_eq!(CellValue::Empty.display_text(), "");
    }

    #[test]
    fn test_cell_error_parse() {
        assert_eq!(CellError::from_str("#DIV/0!"), Some(CellError::Div0));
        assert_eq!(CellError::from_str("#n/a"), Some(CellError::Na));
        assert_eq!(CellError::from_str("invalid"), None);
        assert_eq!(CellError::Ref.code(), 0x17);
    }
}
