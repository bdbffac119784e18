//! Font builder

use serde_sheets_core::{Color, FontStyle, FontVerticalAlign, Underline};

use super::IntoColor;

/// Font character sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontCharset {
    Ansi,
    Default,
    Symbol,
    Mac,
    ShiftJis,
    Hangul,
    Johab,
    Gb2312,
    ChineseBig5,
    Greek,
    Turkish,
    Vietnamese,
    Hebrew,
    Arabic,
    Baltic,
    Russian,
    Thai,
    EasternEurope,
    Oem,
}

impl FontCharset {
    /// Charset value stored in the font record
    pub fn value(self) -> u8 {
        match self {
            FontCharset::Ansi => 0,
            FontCharset::Default => 1,
            FontCharset::Symbol => 2,
            FontCharset::Mac => 77,
            FontCharset::ShiftJis => 128,
            FontCharset::Hangul => 129,
            FontCharset::Johab => 130,
            FontCharset::Gb2312 => 134,
            FontCharset::ChineseBig5 => 136,
            FontCharset::Greek => 161,
            FontCharset::Turkish => 162,
            FontCharset::Vietnamese => 163,
            FontCharset::Hebrew => 177,
            FontCharset::Arabic => 178,
            FontCharset::Baltic => 186,
            FontCharset::Russian => 204,
            FontCharset::Thai => 222,
            FontCharset::EasternEurope => 238,
            FontCharset::Oem => 255,
        }
    }
}

/// Builds the font of a cell style
#[derive(Debug, Clone, PartialEq)]
pub struct FontBuilder {
    name: String,
    height: f64,
    italic: bool,
    strikeout: bool,
    type_offset: FontVerticalAlign,
    bold: bool,
    color: Option<Color>,
    underline: Underline,
    charset: FontCharset,
}

impl Default for FontBuilder {
    fn default() -> Self {
        Self {
            name: "Calibri".to_string(),
            height: 11.0,
            italic: false,
            strikeout: false,
            type_offset: FontVerticalAlign::Baseline,
            bold: false,
            color: None,
            underline: Underline::None,
            charset: FontCharset::Ansi,
        }
    }
}

impl FontBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Font size in points
    pub fn height(mut self, points: f64) -> Self {
        self.height = points;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn strikeout(mut self) -> Self {
        self.strikeout = true;
        self
    }

    /// Superscript or subscript
    pub fn type_offset(mut self, offset: FontVerticalAlign) -> Self {
        self.type_offset = offset;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn color(mut self, color: impl IntoColor) -> Self {
        self.color = Some(color.into_color());
        self
    }

    pub fn underline(mut self, underline: Underline) -> Self {
        self.underline = underline;
        self
    }

    pub fn charset(mut self, charset: FontCharset) -> Self {
        self.charset = charset;
        self
    }

    pub fn build(&self) -> FontStyle {
        FontStyle {
            name: self.name.clone(),
            size: self.height,
            bold: self.bold,
            italic: self.italic,
            underline: self.underline,
            strikethrough: self.strikeout,
            color: self.color.unwrap_or(Color::Auto),
            vertical_align: self.type_offset,
            charset: Some(self.charset.value()),
        }
    }
}
