//! Style pool for deduplication

use super::Style;
use ahash::AHashMap;

/// Style pool for deduplicating styles
///
/// Cells reference styles by index; index 0 is always the default style.
#[derive(Debug, Clone)]
pub struct StylePool {
    /// All unique styles (index 0 is default)
    styles: Vec<Style>,
    /// Fast lookup for deduplication
    index_map: AHashMap<StyleKey, u32>,
}

/// Key for style lookup (hash-based)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct StyleKey(u64);

impl StyleKey {
    fn from_style(style: &Style) -> Self {
        use std::hash::{Hash, Hasher};
        let mut hasher = ahash::AHasher::default();
        style.hash(&mut hasher);
        StyleKey(hasher.finish())
    }
}

impl StylePool {
    /// Create a new style pool with default style at index 0
    pub fn new() -> Self {
        let mut pool = Self {
            styles: Vec::with_capacity(16),
            index_map: AHashMap::with_capacity(16),
        };

        let default = Style::default();
        pool.index_map.insert(StyleKey::from_style(&default), 0);
        pool.styles.push(default);

        pool
    }

    /// Get or create a style, returning its index
    pub fn get_or_insert(&mut self, style: Style) -> u32 {
        let key = StyleKey::from_style(&style);

        if let Some(&idx) = self.index_map.get(&key) {
            // Hash collision check
            if self.styles[idx as usize] == style {
                return idx;
            }
        }

        let idx = self.styles.len() as u32;
        self.index_map.insert(key, idx);
        self.styles.push(style);
        idx
    }

    /// Get a style by index
    pub fn get(&self, index: u32) -> Option<&Style> {
        self.styles.get(index as usize)
    }

    /// Get the default style (index 0)
    pub fn default_style(&self) -> &Style {
        &self.styles[0]
    }

    /// Get the number of styles, default included
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Check if the pool only has the default style
    pub fn is_empty(&self) -> bool {
        self.styles.len() <= 1
    }

    /// Iterate over all styles with their indices
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Style)> {
        self.styles.iter().enumerate().map(|(i, s)| (i as u32, s))
    }
}

impl Default for StylePool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Color, PatternType};

    #[test]
    fn test_default_style() {
        let pool = StylePool::new();
        assert_eq!(pool.len(), 1);
        assert!(pool.is_empty());
        assert_eq!(pool.get(0), Some(&Style::default()));
    }

    #[test]
    fn test_deduplication() {
        let mut pool = StylePool::new();

        let idx1 = pool.get_or_insert(Style::new().bold(true));
        let idx2 = pool.get_or_insert(Style::new().bold(true));
        let idx3 = pool.get_or_insert(Style::new().italic(true));

        assert_eq!(idx1, idx2);
        assert_ne!(idx1, idx3);
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.get_or_insert(Style::default()), 0);
    }

    #[test]
    fn test_fill_and_format_distinguish_styles() {
        let mut pool = StylePool::new();

        let red = Style::new().fill_color(Color::RED);
        let text = Style::new().number_format("@");
        let a = pool.get_or_insert(red.clone());
        let b = pool.get_or_insert(text);

        assert_ne!(a, b);
        assert_eq!(pool.get(a).unwrap().fill.pattern, PatternType::Solid);
        assert_eq!(pool.get(a), Some(&red));
    }
}
