//! Number format types

/// Number format for cell display
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum NumberFormat {
    /// General format (default)
    #[default]
    General,

    /// Built-in format by ID
    BuiltIn(u32),

    /// Custom format string
    Custom(String),
}

/// Built-in format codes by id
const BUILTIN_FORMATS: &[(u32, &str)] = &[
    (0, "General"),
    (1, "0"),
    (2, "0.00"),
    (3, "#,##0"),
    (4, "#,##0.00"),
    (9, "0%"),
    (10, "0.00%"),
    (11, "0.00E+00"),
    (12, "# ?/?"),
    (13, "# ??/??"),
    (14, "m/d/yy"),
    (15, "d-mmm-yy"),
    (16, "d-mmm"),
    (17, "mmm-yy"),
    (18, "h:mm AM/PM"),
    (19, "h:mm:ss AM/PM"),
    (20, "h:mm"),
    (21, "h:mm:ss"),
    (22, "m/d/yy h:mm"),
    (37, "#,##0 ;(#,##0)"),
    (38, "#,##0 ;[Red](#,##0)"),
    (39, "#,##0.00;(#,##0.00)"),
    (40, "#,##0.00;[Red](#,##0.00)"),
    (45, "mm:ss"),
    (46, "[h]:mm:ss"),
    (47, "mmss.0"),
    (48, "##0.0E+0"),
    (49, "@"),
];

impl NumberFormat {
    /// Build a format from its code, reusing a built-in id when one matches
    pub fn from_code<S: Into<String>>(code: S) -> Self {
        let code = code.into();
        if code.is_empty() || code.eq_ignore_ascii_case("General") {
            return NumberFormat::General;
        }
        match BUILTIN_FORMATS.iter().find(|(_, c)| *c == code) {
            Some((id, _)) => NumberFormat::BuiltIn(*id),
            None => NumberFormat::Custom(code),
        }
    }

    /// Get the format code
    pub fn format_code(&self) -> &str {
        match self {
            NumberFormat::General => "General",
            NumberFormat::BuiltIn(id) => BUILTIN_FORMATS
                .iter()
                .find(|(i, _)| i == id)
                .map(|(_, c)| *c)
                .unwrap_or("General"),
            NumberFormat::Custom(s) => s,
        }
    }

    /// Number format id for a built-in format, `None` for custom codes
    pub fn builtin_id(&self) -> Option<u32> {
        match self {
            NumberFormat::General => Some(0),
            NumberFormat::BuiltIn(id) => Some(*id),
            NumberFormat::Custom(_) => None,
        }
    }

    /// Check if this is a date/time format
    pub fn is_date_format(&self) -> bool {
        match self {
            NumberFormat::BuiltIn(id) => matches!(id, 14..=22 | 45..=47),
            NumberFormat::Custom(s) => {
                let mut in_quotes = false;
                let mut in_brackets = false;
                for c in s.chars() {
                    match c {
                        '"' => in_quotes = !in_quotes,
                        '[' if !in_quotes => in_brackets = true,
                        ']' if !in_quotes => in_brackets = false,
                        'y' | 'Y' | 'm' | 'M' | 'd' | 'D' | 'h' | 'H' | 's' | 'S'
                            if !in_quotes && !in_brackets =>
                        {
                            return true
                        }
                        _ => {}
                    }
                }
                false
            }
            NumberFormat::General => false,
        }
    }
}
