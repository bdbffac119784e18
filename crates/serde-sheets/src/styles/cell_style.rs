//! Cell style builder

use serde_sheets_core::{
    Alignment, BorderEdge, BorderLineStyle, BorderStyle, Color, FillStyle, HorizontalAlignment,
    NumberFormat, PatternType, Protection, Style, VerticalAlignment,
};

use super::FontBuilder;

/// Common number format codes
pub struct DataFormat;

impl DataFormat {
    pub const GENERAL: &'static str = "General";
    pub const TEXT: &'static str = "@";
    pub const NUMBER_INT: &'static str = "0";
    pub const NUMBER_FLOAT: &'static str = "0.00";
    pub const NUMBER_INT_WITH_COMMA: &'static str = "#,##0";
    pub const NUMBER_FLOAT_WITH_COMMA: &'static str = "#,##0.00";
    pub const DATE: &'static str = "yyyy-mm-dd";
    pub const DATE_TIME: &'static str = "yyyy-mm-dd hh:mm:ss";
}

/// Named colors of the standard palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum IndexedColor {
    Black = 8,
    White = 9,
    Red = 10,
    BrightGreen = 11,
    Blue = 12,
    Yellow = 13,
    Pink = 14,
    Turquoise = 15,
    DarkRed = 16,
    Green = 17,
    DarkBlue = 18,
    DarkYellow = 19,
    Violet = 20,
    Teal = 21,
    Grey25Percent = 22,
    Grey50Percent = 23,
    CornflowerBlue = 24,
    Maroon = 25,
    LemonChiffon = 26,
    LightTurquoise1 = 27,
    Orchid = 28,
    Coral = 29,
    RoyalBlue = 30,
    LightCornflowerBlue = 31,
    SkyBlue = 40,
    LightTurquoise = 41,
    LightGreen = 42,
    LightYellow = 43,
    PaleBlue = 44,
    Rose = 45,
    Lavender = 46,
    Tan = 47,
    LightBlue = 48,
    Aqua = 49,
    Lime = 50,
    Gold = 51,
    LightOrange = 52,
    Orange = 53,
    BlueGrey = 54,
    Grey40Percent = 55,
    DarkTeal = 56,
    SeaGreen = 57,
    DarkGreen = 58,
    OliveGreen = 59,
    Brown = 60,
    Plum = 61,
    Indigo = 62,
    Grey80Percent = 63,
}

impl IndexedColor {
    /// Palette index
    pub fn index(self) -> u8 {
        self as u8
    }
}

impl From<IndexedColor> for Color {
    /// Resolves to the RGB value of the default palette
    fn from(color: IndexedColor) -> Self {
        let (r, g, b) = Color::Indexed(color.index()).to_rgb();
        Color::rgb(r, g, b)
    }
}

/// Values accepted wherever a color is configured
///
/// `0xRRGGBB` integers, `(r, g, b)` tuples, [`IndexedColor`]s and core
/// [`Color`]s.
pub trait IntoColor {
    fn into_color(self) -> Color;
}

impl IntoColor for u32 {
    fn into_color(self) -> Color {
        Color::from_rgb_int(self)
    }
}

impl IntoColor for (u8, u8, u8) {
    fn into_color(self) -> Color {
        Color::rgb(self.0, self.1, self.2)
    }
}

impl IntoColor for IndexedColor {
    fn into_color(self) -> Color {
        self.into()
    }
}

impl IntoColor for Color {
    fn into_color(self) -> Color {
        self
    }
}

/// Builds one cell style
///
/// Defaults differ from a blank workbook style: content is centered
/// vertically and cells are unlocked.
#[derive(Debug, Clone, PartialEq)]
pub struct CellStyleBuilder {
    data_format: Option<String>,
    hidden: bool,
    locked: bool,
    quote_prefixed: bool,
    alignment: HorizontalAlignment,
    wrap_text: bool,
    vertical_alignment: VerticalAlignment,
    rotation: i16,
    indention: u8,
    border_left: BorderLineStyle,
    border_right: BorderLineStyle,
    border_top: BorderLineStyle,
    border_bottom: BorderLineStyle,
    left_border_color: Option<Color>,
    right_border_color: Option<Color>,
    top_border_color: Option<Color>,
    bottom_border_color: Option<Color>,
    fill_pattern: PatternType,
    fill_foreground_color: Option<Color>,
    fill_background_color: Option<Color>,
    shrink_to_fit: bool,
    font: Option<FontBuilder>,
}

impl Default for CellStyleBuilder {
    fn default() -> Self {
        Self {
            data_format: None,
            hidden: false,
            locked: false,
            quote_prefixed: false,
            alignment: HorizontalAlignment::General,
            wrap_text: false,
            vertical_alignment: VerticalAlignment::Center,
            rotation: 0,
            indention: 0,
            border_left: BorderLineStyle::None,
            border_right: BorderLineStyle::None,
            border_top: BorderLineStyle::None,
            border_bottom: BorderLineStyle::None,
            left_border_color: None,
            right_border_color: None,
            top_border_color: None,
            bottom_border_color: None,
            fill_pattern: PatternType::None,
            fill_foreground_color: None,
            fill_background_color: None,
            shrink_to_fit: false,
            font: None,
        }
    }
}

impl CellStyleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number format code, see [`DataFormat`]
    pub fn data_format<S: Into<String>>(mut self, format: S) -> Self {
        self.data_format = Some(format.into());
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn quote_prefixed(mut self, quote_prefixed: bool) -> Self {
        self.quote_prefixed = quote_prefixed;
        self
    }

    /// Horizontal alignment
    pub fn alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn wrap_text(mut self, wrap_text: bool) -> Self {
        self.wrap_text = wrap_text;
        self
    }

    pub fn vertical_alignment(mut self, alignment: VerticalAlignment) -> Self {
        self.vertical_alignment = alignment;
        self
    }

    /// Text rotation in degrees
    pub fn rotation(mut self, rotation: i16) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn indention(mut self, indention: u8) -> Self {
        self.indention = indention;
        self
    }

    /// Set all four borders
    pub fn border(self, style: BorderLineStyle) -> Self {
        self.border_left(style)
            .border_right(style)
            .border_top(style)
            .border_bottom(style)
    }

    pub fn border_left(mut self, style: BorderLineStyle) -> Self {
        self.border_left = style;
        self
    }

    pub fn border_right(mut self, style: BorderLineStyle) -> Self {
        self.border_right = style;
        self
    }

    pub fn border_top(mut self, style: BorderLineStyle) -> Self {
        self.border_top = style;
        self
    }

    pub fn border_bottom(mut self, style: BorderLineStyle) -> Self {
        self.border_bottom = style;
        self
    }

    /// Set the color of all four borders
    pub fn border_color(self, color: impl IntoColor) -> Self {
        let color = color.into_color();
        self.left_border_color(color)
            .right_border_color(color)
            .top_border_color(color)
            .bottom_border_color(color)
    }

    pub fn left_border_color(mut self, color: impl IntoColor) -> Self {
        self.left_border_color = Some(color.into_color());
        self
    }

    pub fn right_border_color(mut self, color: impl IntoColor) -> Self {
        self.right_border_color = Some(color.into_color());
        self
    }

    pub fn top_border_color(mut self, color: impl IntoColor) -> Self {
        self.top_border_color = Some(color.into_color());
        self
    }

    pub fn bottom_border_color(mut self, color: impl IntoColor) -> Self {
        self.bottom_border_color = Some(color.into_color());
        self
    }

    pub fn fill_pattern(mut self, pattern: PatternType) -> Self {
        self.fill_pattern = pattern;
        self
    }

    pub fn fill_foreground_color(mut self, color: impl IntoColor) -> Self {
        self.fill_foreground_color = Some(color.into_color());
        self
    }

    pub fn fill_background_color(mut self, color: impl IntoColor) -> Self {
        self.fill_background_color = Some(color.into_color());
        self
    }

    pub fn shrink_to_fit(mut self, shrink_to_fit: bool) -> Self {
        self.shrink_to_fit = shrink_to_fit;
        self
    }

    /// Configure the font, starting from the current one or the default
    pub fn font(mut self, f: impl FnOnce(FontBuilder) -> FontBuilder) -> Self {
        let font = self.font.take().unwrap_or_default();
        self.font = Some(f(font));
        self
    }

    pub fn build(&self) -> Style {
        let mut style = Style::new();
        if let Some(font) = &self.font {
            style.font = font.build();
        }
        style.fill = FillStyle::pattern(
            self.fill_pattern,
            self.fill_foreground_color.unwrap_or(Color::Auto),
            self.fill_background_color.unwrap_or(Color::Auto),
        );
        style.border = BorderStyle {
            left: edge(self.border_left, self.left_border_color),
            right: edge(self.border_right, self.right_border_color),
            top: edge(self.border_top, self.top_border_color),
            bottom: edge(self.border_bottom, self.bottom_border_color),
        };
        style.alignment = Alignment {
            horizontal: self.alignment,
            vertical: self.vertical_alignment,
            wrap_text: self.wrap_text,
            shrink_to_fit: self.shrink_to_fit,
            indent: self.indention,
            rotation: self.rotation,
        };
        style.protection = Protection {
            locked: self.locked,
            hidden: self.hidden,
        };
        style.quote_prefix = self.quote_prefixed;
        if let Some(format) = &self.data_format {
            style.number_format = NumberFormat::from_code(format.as_str());
        }
        style
    }
}

fn edge(style: BorderLineStyle, color: Option<Color>) -> BorderEdge {
    BorderEdge::new(style, color.unwrap_or(Color::Auto))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let style = CellStyleBuilder::new().build();
        assert_eq!(style.alignment.vertical, VerticalAlignment::Center);
        assert!(style.fill.is_none());
        assert!(style.border.is_empty());
        assert!(!style.protection.locked);
        assert!(!style.protection.hidden);
        assert_eq!(style.number_format, NumberFormat::General);
    }

    #[test]
    fn test_borders_and_fill() {
        let style = CellStyleBuilder::new()
            .border(BorderLineStyle::Thin)
            .border_color(IndexedColor::Red)
            .bottom_border_color((0, 0, 255))
            .fill_pattern(PatternType::Solid)
            .fill_foreground_color(0xFFFF00)
            .build();
        assert_eq!(style.border.left.style, BorderLineStyle::Thin);
        assert_eq!(style.border.left.color, Color::rgb(255, 0, 0));
        assert_eq!(style.border.bottom.color, Color::rgb(0, 0, 255));
        assert_eq!(style.fill.pattern, PatternType::Solid);
        assert_eq!(style.fill.foreground, Color::rgb(255, 255, 0));
    }

    #[test]
    fn test_data_format_and_font() {
        let style = CellStyleBuilder::new()
            .data_format(DataFormat::NUMBER_FLOAT_WITH_COMMA)
            .font(|f| f.bold())
            .font(|f| f.italic())
            .build();
        assert_eq!(style.number_format.format_code(), "#,##0.00");
        assert!(style.font.bold);
        assert!(style.font.italic);
    }
}
