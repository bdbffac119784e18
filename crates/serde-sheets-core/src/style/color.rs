//! Color representation

use std::fmt;

/// Standard 56-entry indexed palette, starting at index 8
const PALETTE: [(u8, u8, u8); 56] = [
    (0, 0, 0),
    (255, 255, 255),
    (255, 0, 0),
    (0, 255, 0),
    (0, 0, 255),
    (255, 255, 0),
    (255, 0, 255),
    (0, 255, 255),
    (128, 0, 0),
    (0, 128, 0),
    (0, 0, 128),
    (128, 128, 0),
    (128, 0, 128),
    (0, 128, 128),
    (192, 192, 192),
    (128, 128, 128),
    (153, 153, 255),
    (153, 51, 102),
    (255, 255, 204),
    (204, 255, 255),
    (102, 0, 102),
    (255, 128, 128),
    (0, 102, 204),
    (204, 204, 255),
    (0, 0, 128),
    (255, 0, 255),
    (255, 255, 0),
    (0, 255, 255),
    (128, 0, 128),
    (128, 0, 0),
    (0, 128, 128),
    (0, 0, 255),
    (0, 204, 255),
    (204, 255, 255),
    (204, 255, 204),
    (255, 255, 153),
    (153, 204, 255),
    (255, 153, 204),
    (204, 153, 255),
    (255, 204, 153),
    (51, 102, 255),
    (51, 204, 204),
    (153, 204, 0),
    (255, 204, 0),
    (255, 153, 0),
    (255, 102, 0),
    (102, 102, 153),
    (150, 150, 150),
    (0, 51, 102),
    (51, 153, 102),
    (0, 51, 0),
    (51, 51, 0),
    (153, 51, 0),
    (153, 51, 102),
    (51, 51, 153),
    (51, 51, 51),
];

/// Color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Automatic/default color
    #[default]
    Auto,

    /// RGB color
    Rgb { r: u8, g: u8, b: u8 },

    /// Indexed color (legacy palette; 8..=63 map to the standard palette)
    Indexed(u8),
}

impl Color {
    /// Create an RGB color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }

    /// Create an RGB color from `0xRRGGBB`
    pub const fn from_rgb_int(rgb: u32) -> Self {
        Color::Rgb {
            r: ((rgb >> 16) & 0xFF) as u8,
            g: ((rgb >> 8) & 0xFF) as u8,
            b: (rgb & 0xFF) as u8,
        }
    }

    /// Convert to ARGB hex string (8 characters, used by XLSX)
    pub fn to_argb_hex(&self) -> String {
        let (r, g, b) = self.to_rgb();
        format!("FF{:02X}{:02X}{:02X}", r, g, b)
    }

    /// Convert to RGB tuple
    pub fn to_rgb(&self) -> (u8, u8, u8) {
        match self {
            Color::Auto => (0, 0, 0),
            Color::Rgb { r, g, b } => (*r, *g, *b),
            Color::Indexed(i) => Self::indexed_to_rgb(*i),
        }
    }

    /// Check if color is automatic/default
    pub fn is_auto(&self) -> bool {
        matches!(self, Color::Auto)
    }

    fn indexed_to_rgb(index: u8) -> (u8, u8, u8) {
        match index {
            0..=7 => PALETTE[index as usize],
            8..=63 => PALETTE[(index - 8) as usize],
            // System foreground / background
            64 => (0, 0, 0),
            _ => (255, 255, 255),
        }
    }

    pub const BLACK: Color = Color::Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color::Rgb {
        r: 255,
        g: 255,
        b: 255,
    };
    pub const RED: Color = Color::Rgb { r: 255, g: 0, b: 0 };
    pub const GREEN: Color = Color::Rgb { r: 0, g: 255, b: 0 };
    pub const BLUE: Color = Color::Rgb { r: 0, g: 0, b: 255 };
    pub const YELLOW: Color = Color::Rgb {
        r: 255,
        g: 255,
        b: 0,
    };
    pub const GRAY: Color = Color::Rgb {
        r: 128,
        g: 128,
        b: 128,
    };
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Auto => write!(f, "auto"),
            Color::Rgb { r, g, b } => write!(f, "#{:02X}{:02X}{:02X}", r, g, b),
            Color::Indexed(i) => write!(f, "indexed({})", i),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgb_int() {
        assert_eq!(Color::from_rgb_int(0xFF0000), Color::RED);
        assert_eq!(Color::from_rgb_int(0x00CCFF), Color::rgb(0, 204, 255));
    }

    #[test]
    fn test_to_argb_hex() {
        assert_eq!(Color::RED.to_argb_hex(), "FFFF0000");
        assert_eq!(Color::Indexed(10).to_argb_hex(), "FFFF0000");
    }

    #[test]
    fn test_indexed_palette() {
        assert_eq!(Color::Indexed(8).to_rgb(), (0, 0, 0));
        assert_eq!(Color::Indexed(22).to_rgb(), (192, 192, 192));
        assert_eq!(Color::Indexed(63).to_rgb(), (51, 51, 51));
    }
}
