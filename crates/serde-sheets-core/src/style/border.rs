//! Border style types

use super::Color;

/// Border style for a cell
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BorderStyle {
    /// Left border
    pub left: BorderEdge,
    /// Right border
    pub right: BorderEdge,
    /// Top border
    pub top: BorderEdge,
    /// Bottom border
    pub bottom: BorderEdge,
}

impl BorderStyle {
    /// Create a new border style with no borders
    pub fn new() -> Self {
        Self::default()
    }

    /// Set all four edges to the same style
    pub fn all(style: BorderLineStyle, color: Color) -> Self {
        let edge = BorderEdge::new(style, color);
        Self {
            left: edge,
            right: edge,
            top: edge,
            bottom: edge,
        }
    }

    /// Check if no edge has a line
    pub fn is_empty(&self) -> bool {
        [self.left, self.right, self.top, self.bottom]
            .iter()
            .all(|edge| edge.style == BorderLineStyle::None)
    }
}

/// A single border edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BorderEdge {
    /// Line style
    pub style: BorderLineStyle,
    /// Line color
    pub color: Color,
}

impl BorderEdge {
    /// Create a new border edge
    pub fn new(style: BorderLineStyle, color: Color) -> Self {
        Self { style, color }
    }

    /// Create a thin black border
    pub fn thin() -> Self {
        Self::new(BorderLineStyle::Thin, Color::BLACK)
    }
}

/// Border line styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderLineStyle {
    /// No border
    #[default]
    None,
    /// Thin line
    Thin,
    /// Medium line
    Medium,
    /// Thick line
    Thick,
    /// Dashed line
    Dashed,
    /// Dotted line
    Dotted,
    /// Double line
    Double,
    /// Hair line (very thin)
    Hair,
    /// Medium dashed
    MediumDashed,
    /// Dash-dot
    DashDot,
    /// Medium dash-dot
    MediumDashDot,
    /// Dash-dot-dot
    DashDotDot,
    /// Medium dash-dot-dot
    MediumDashDotDot,
    /// Slant dash-dot
    SlantDashDot,
}

impl BorderLineStyle {
    /// SpreadsheetML `style` attribute value
    pub fn as_str(&self) -> &'static str {
        match self {
            BorderLineStyle::None => "none",
            BorderLineStyle::Thin => "thin",
            BorderLineStyle::Medium => "medium",
            BorderLineStyle::Thick => "thick",
            BorderLineStyle::Dashed => "dashed",
            BorderLineStyle::Dotted => "dotted",
            BorderLineStyle::Double => "double",
            BorderLineStyle::Hair => "hair",
            BorderLineStyle::MediumDashed => "mediumDashed",
            BorderLineStyle::DashDot => "dashDot",
            BorderLineStyle::MediumDashDot => "mediumDashDot",
            BorderLineStyle::DashDotDot => "dashDotDot",
            BorderLineStyle::MediumDashDotDot => "mediumDashDotDot",
            BorderLineStyle::SlantDashDot => "slantDashDot",
        }
    }
}
