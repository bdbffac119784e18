//! Cell styles
//!
//! A [`Style`] is everything an `xf` record of `styles.xml` can carry. The
//! worksheet pools styles in a [`StylePool`] and cells keep the pool index.

mod alignment;
mod border;
mod color;
mod fill;
mod font;
mod number_format;
mod pool;

pub use alignment::{Alignment, HorizontalAlignment, VerticalAlignment};
pub use border::{BorderEdge, BorderLineStyle, BorderStyle};
pub use color::Color;
pub use fill::{FillStyle, PatternType};
pub use font::{FontStyle, FontVerticalAlign, Underline};
pub use number_format::NumberFormat;
pub use pool::StylePool;

/// Complete cell style
///
/// Styles are deduplicated via [`StylePool`]; cells reference them by index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Style {
    /// Font settings
    pub font: FontStyle,
    /// Fill/background settings
    pub fill: FillStyle,
    /// Border settings
    pub border: BorderStyle,
    /// Text alignment
    pub alignment: Alignment,
    /// Number format
    pub number_format: NumberFormat,
    /// Cell protection
    pub protection: Protection,
    /// Text is shown with a leading apostrophe (forced text)
    pub quote_prefix: bool,
}

impl Style {
    /// Create a new default style
    pub fn new() -> Self {
        Self::default()
    }

    /// Set font to bold
    pub fn bold(mut self, bold: bool) -> Self {
        self.font.bold = bold;
        self
    }

    /// Set font to italic
    pub fn italic(mut self, italic: bool) -> Self {
        self.font.italic = italic;
        self
    }

    /// Set a solid fill color
    pub fn fill_color(mut self, color: Color) -> Self {
        self.fill = FillStyle::solid(color);
        self
    }

    /// Set number format code
    pub fn number_format<S: Into<String>>(mut self, format: S) -> Self {
        self.number_format = NumberFormat::from_code(format);
        self
    }
}

/// Cell protection settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Protection {
    /// Cell is locked (protected when sheet is protected)
    pub locked: bool,
    /// Formula is hidden when sheet is protected
    pub hidden: bool,
}

impl Default for Protection {
    /// Locked and not hidden, as in SpreadsheetML
    fn default() -> Self {
        Self {
            locked: true,
            hidden: false,
        }
    }
}

impl Protection {
    /// Create unlocked protection
    pub fn unlocked() -> Self {
        Self {
            locked: false,
            hidden: false,
        }
    }
}
