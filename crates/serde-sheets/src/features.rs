//! Read features

/// Toggles for how sheets are parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// A blank data row maps to a null row instead of being skipped
    BlankRowAsNull,
    /// A blank data row ends the stream
    BreakOnBlankRow,
}

impl Feature {
    /// All features, in mask order
    pub const ALL: [Feature; 2] = [Feature::BlankRowAsNull, Feature::BreakOnBlankRow];

    /// Default state of the feature
    pub fn enabled_by_default(self) -> bool {
        match self {
            Feature::BlankRowAsNull => true,
            Feature::BreakOnBlankRow => false,
        }
    }

    /// Bit of the feature in a [`Features`] set
    pub fn mask(self) -> u32 {
        1 << (self as u32)
    }

    /// Check the feature against raw flags
    pub fn enabled_in(self, flags: u32) -> bool {
        flags & self.mask() != 0
    }
}

/// A set of enabled [`Feature`]s
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Features(u32);

impl Features {
    /// The features that are on by default
    pub fn collect_defaults() -> Self {
        let flags = Feature::ALL
            .iter()
            .filter(|f| f.enabled_by_default())
            .fold(0, |flags, f| flags | f.mask());
        Features(flags)
    }

    /// No feature enabled
    pub fn empty() -> Self {
        Features(0)
    }

    /// Raw flag bits
    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn enable(self, feature: Feature) -> Self {
        Features(self.0 | feature.mask())
    }

    pub fn disable(self, feature: Feature) -> Self {
        Features(self.0 & !feature.mask())
    }

    pub fn configure(self, feature: Feature, state: bool) -> Self {
        if state {
            self.enable(feature)
        } else {
            self.disable(feature)
        }
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        feature.enabled_in(self.0)
    }
}

impl Default for Features {
    fn default() -> Self {
        Self::collect_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let features = Features::default();
        assert!(features.is_enabled(Feature::BlankRowAsNull));
        assert!(!features.is_enabled(Feature::BreakOnBlankRow));
        assert_eq!(features.bits(), 0b01);
    }

    #[test]
    fn test_configure() {
        let features = Features::empty()
            .configure(Feature::BreakOnBlankRow, true)
            .configure(Feature::BlankRowAsNull, false);
        assert_eq!(features.bits(), Feature::BreakOnBlankRow.mask());
        assert_eq!(Feature::BreakOnBlankRow.mask(), 0b10);
        assert!(!features.disable(Feature::BreakOnBlankRow).is_enabled(Feature::BreakOnBlankRow));
    }
}
