//! Fill/background style types

use super::Color;

/// Pattern fill for the cell background
///
/// A solid fill paints the foreground color; other patterns mix foreground
/// and background.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FillStyle {
    /// Pattern type
    pub pattern: PatternType,
    /// Pattern (foreground) color
    pub foreground: Color,
    /// Background color
    pub background: Color,
}

impl FillStyle {
    /// Create a solid fill with the given color
    pub fn solid(color: Color) -> Self {
        Self {
            pattern: PatternType::Solid,
            foreground: color,
            background: Color::Auto,
        }
    }

    /// Create a pattern fill
    pub fn pattern(pattern: PatternType, foreground: Color, background: Color) -> Self {
        Self {
            pattern,
            foreground,
            background,
        }
    }

    /// Check if this is a "no fill"
    pub fn is_none(&self) -> bool {
        self.pattern == PatternType::None
    }
}

/// Pattern fill types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PatternType {
    /// No pattern
    #[default]
    None,
    /// Solid (100% foreground)
    Solid,
    /// 50% gray
    MediumGray,
    /// 75% gray
    DarkGray,
    /// 25% gray
    LightGray,
    /// Horizontal stripe
    DarkHorizontal,
    /// Vertical stripe
    DarkVertical,
    /// Diagonal stripe (down)
    DarkDown,
    /// Diagonal stripe (up)
    DarkUp,
    /// Grid
    DarkGrid,
    /// Trellis
    DarkTrellis,
    /// Thin horizontal stripe
    LightHorizontal,
    /// Thin vertical stripe
    LightVertical,
    /// Thin diagonal stripe (down)
    LightDown,
    /// Thin diagonal stripe (up)
    LightUp,
    /// Thin grid
    LightGrid,
    /// Thin trellis
    LightTrellis,
    /// 12.5% gray
    Gray125,
    /// 6.25% gray
    Gray0625,
}

impl PatternType {
    /// SpreadsheetML `patternType` value
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternType::None => "none",
            PatternType::Solid => "solid",
            PatternType::MediumGray => "mediumGray",
            PatternType::DarkGray => "darkGray",
            PatternType::LightGray => "lightGray",
            PatternType::DarkHorizontal => "darkHorizontal",
            PatternType::DarkVertical => "darkVertical",
            PatternType::DarkDown => "darkDown",
            PatternType::DarkUp => "darkUp",
            PatternType::DarkGrid => "darkGrid",
            PatternType::DarkTrellis => "darkTrellis",
            PatternType::LightHorizontal => "lightHorizontal",
            PatternType::LightVertical => "lightVertical",
            PatternType::LightDown => "lightDown",
            PatternType::LightUp => "lightUp",
            PatternType::LightGrid => "lightGrid",
            PatternType::LightTrellis => "lightTrellis",
            PatternType::Gray125 => "gray125",
            PatternType::Gray0625 => "gray0625",
        }
    }
}
