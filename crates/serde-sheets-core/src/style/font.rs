//! Font style types

use super::Color;

/// Font style settings
#[derive(Debug, Clone, PartialEq)]
pub struct FontStyle {
    /// Font family name (e.g., "Calibri", "Arial")
    pub name: String,
    /// Font size in points
    pub size: f64,
    /// Bold
    pub bold: bool,
    /// Italic
    pub italic: bool,
    /// Underline style
    pub underline: Underline,
    /// Strikethrough
    pub strikethrough: bool,
    /// Font color
    pub color: Color,
    /// Superscript/subscript
    pub vertical_align: FontVerticalAlign,
    /// Character set (e.g. 0 = ANSI, 128 = Shift-JIS)
    pub charset: Option<u8>,
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            name: "Calibri".to_string(),
            size: 11.0,
            bold: false,
            italic: false,
            underline: Underline::None,
            strikethrough: false,
            color: Color::Auto,
            vertical_align: FontVerticalAlign::Baseline,
            charset: None,
        }
    }
}

impl std::hash::Hash for FontStyle {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.size.to_bits().hash(state);
        self.bold.hash(state);
        self.italic.hash(state);
        self.underline.hash(state);
        self.strikethrough.hash(state);
        self.color.hash(state);
        self.vertical_align.hash(state);
        self.charset.hash(state);
    }
}

impl Eq for FontStyle {}

/// Underline style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Underline {
    /// No underline
    #[default]
    None,
    /// Single underline
    Single,
    /// Double underline
    Double,
    /// Single accounting underline (extends to cell width)
    SingleAccounting,
    /// Double accounting underline
    DoubleAccounting,
}

impl Underline {
    /// SpreadsheetML attribute value
    pub fn as_str(&self) -> &'static str {
        match self {
            Underline::None => "none",
            Underline::Single => "single",
            Underline::Double => "double",
            Underline::SingleAccounting => "singleAccounting",
            Underline::DoubleAccounting => "doubleAccounting",
        }
    }
}

/// Font vertical alignment (superscript/subscript)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontVerticalAlign {
    /// Normal baseline
    #[default]
    Baseline,
    /// Superscript
    Superscript,
    /// Subscript
    Subscript,
}
