//! Text alignment types

/// Text alignment settings
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Alignment {
    /// Horizontal alignment
    pub horizontal: HorizontalAlignment,
    /// Vertical alignment
    pub vertical: VerticalAlignment,
    /// Wrap text
    pub wrap_text: bool,
    /// Shrink to fit
    pub shrink_to_fit: bool,
    /// Indent level (0-250)
    pub indent: u8,
    /// Text rotation in degrees (-90 to 90, or 255 for vertical)
    pub rotation: i16,
}

impl Alignment {
    /// True when every field has the SpreadsheetML default
    pub fn is_default(&self) -> bool {
        *self == Alignment::default()
    }
}

/// Horizontal alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HorizontalAlignment {
    /// General alignment (text left, numbers right)
    #[default]
    General,
    /// Left aligned
    Left,
    /// Center aligned
    Center,
    /// Right aligned
    Right,
    /// Fill (repeat content to fill cell width)
    Fill,
    /// Justify (stretch to fit width)
    Justify,
    /// Center across selection
    CenterContinuous,
    /// Distributed (like justify, but for East Asian text)
    Distributed,
}

impl HorizontalAlignment {
    /// SpreadsheetML attribute value
    pub fn as_str(&self) -> &'static str {
        match self {
            HorizontalAlignment::General => "general",
            HorizontalAlignment::Left => "left",
            HorizontalAlignment::Center => "center",
            HorizontalAlignment::Right => "right",
            HorizontalAlignment::Fill => "fill",
            HorizontalAlignment::Justify => "justify",
            HorizontalAlignment::CenterContinuous => "centerContinuous",
            HorizontalAlignment::Distributed => "distributed",
        }
    }
}

/// Vertical alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VerticalAlignment {
    /// Top aligned
    Top,
    /// Center aligned
    Center,
    /// Bottom aligned (default)
    #[default]
    Bottom,
    /// Justify
    Justify,
    /// Distributed
    Distributed,
}

impl VerticalAlignment {
    /// SpreadsheetML attribute value
    pub fn as_str(&self) -> &'static str {
        match self {
            VerticalAlignment::Top => "top",
            VerticalAlignment::Center => "center",
            VerticalAlignment::Bottom => "bottom",
            VerticalAlignment::Justify => "justify",
            VerticalAlignment::Distributed => "distributed",
        }
    }
}
