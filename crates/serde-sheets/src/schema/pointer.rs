//! Column pointers
//!
//! A [`ColumnPointer`] is the `/`-separated path from a record root to one of
//! its leaf fields, e.g. `inner/b`. Sequences add an `[]` segment and
//! [`ColumnPointer::relativize`] produces `..` segments.

use std::fmt;

const SEPARATOR: char = '/';
const ARRAY: &str = "[]";
const PARENT: &str = "..";

/// Path of a column inside a record
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnPointer {
    segments: Vec<String>,
}

impl ColumnPointer {
    /// The empty pointer (the record root)
    pub fn empty() -> Self {
        Self::default()
    }

    /// The single `[]` segment
    pub fn array() -> Self {
        Self::segment(ARRAY)
    }

    /// The single `..` segment
    pub fn parent_marker() -> Self {
        Self::segment(PARENT)
    }

    /// Parse `a/b/[]`; empty segments are dropped
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path
                .split(SEPARATOR)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    fn segment(name: &str) -> Self {
        Self {
            segments: vec![name.to_string()],
        }
    }

    /// Append one named segment
    pub fn resolve(&self, name: &str) -> Self {
        if name.is_empty() {
            return self.clone();
        }
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self { segments }
    }

    /// Append all segments of `other`
    pub fn resolve_pointer(&self, other: &ColumnPointer) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self { segments }
    }

    /// Append the `[]` segment
    pub fn resolve_array(&self) -> Self {
        self.resolve(ARRAY)
    }

    /// Path leading from `self` to `other`
    ///
    /// The common prefix is dropped, every remaining segment of `self` turns
    /// into `..` and the rest of `other` follows.
    pub fn relativize(&self, other: &ColumnPointer) -> Self {
        let common = self
            .segments
            .iter()
            .zip(other.segments.iter())
            .take_while(|(a, b)| a == b)
            .count();
        let mut segments: Vec<String> = std::iter::repeat(PARENT.to_string())
            .take(self.segments.len() - common)
            .collect();
        segments.extend(other.segments[common..].iter().cloned());
        Self { segments }
    }

    /// Number of segments
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// True for the `..` pointer
    pub fn is_parent(&self) -> bool {
        self.segments.len() == 1 && self.segments[0] == PARENT
    }

    /// True for the `[]` pointer
    pub fn is_array(&self) -> bool {
        self.segments.len() == 1 && self.segments[0] == ARRAY
    }

    /// All segments but the last; empty for depth <= 1
    pub fn parent(&self) -> Self {
        match self.segments.split_last() {
            Some((_, init)) => Self {
                segments: init.to_vec(),
            },
            None => Self::empty(),
        }
    }

    /// First segment
    pub fn head(&self) -> Self {
        match self.segments.first() {
            Some(first) => Self::segment(first),
            None => Self::empty(),
        }
    }

    /// Last segment, or `""` for the empty pointer
    pub fn name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or("")
    }

    /// True if any single segment equals `segment`
    pub fn contains(&self, segment: &ColumnPointer) -> bool {
        self.iter().any(|s| &s == segment)
    }

    /// Segment-wise prefix test
    pub fn starts_with(&self, prefix: &ColumnPointer) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// Iterate single-segment pointers
    pub fn iter(&self) -> impl Iterator<Item = ColumnPointer> + '_ {
        self.segments.iter().map(|s| Self::segment(s))
    }

    /// Raw segment names
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Drop `..` segments against the segments before them
    pub fn normalize(&self) -> Self {
        let mut segments: Vec<String> = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            if segment == PARENT && segments.last().map_or(false, |last| last != PARENT) {
                segments.pop();
            } else {
                segments.push(segment.clone());
            }
        }
        Self { segments }
    }
}

impl fmt::Display for ColumnPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", SEPARATOR)?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl From<&str> for ColumnPointer {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_parse_and_display() {
        let p = ColumnPointer::parse("inner/b");
        assert_eq!(p.depth(), 2);
        assert_eq!(p.to_string(), "inner/b");
        assert_eq!(p.name(), "b");
        assert_eq!(p.head(), ColumnPointer::parse("inner"));
        assert_eq!(ColumnPointer::parse(""), ColumnPointer::empty());
        assert_eq!(ColumnPointer::parse("/a//b/").to_string(), "a/b");
    }

    #[test]
    fn test_markers() {
        assert!(ColumnPointer::parent_marker().is_parent());
        assert!(ColumnPointer::array().is_array());
        assert!(!ColumnPointer::parse("../a").is_parent());
        assert_eq!(
            ColumnPointer::parse("list").resolve_array().to_string(),
            "list/[]"
        );
    }

    #[test]
    fn test_parent() {
        assert_eq!(ColumnPointer::parse("a/b/c").parent().to_string(), "a/b");
        assert!(ColumnPointer::parse("a").parent().is_empty());
        assert!(ColumnPointer::empty().parent().is_empty());
    }

    #[test]
    fn test_relativize() {
        let from = ColumnPointer::parse("a/b");
        let to = ColumnPointer::parse("a/c/d");
        assert_eq!(from.relativize(&to).to_string(), "../c/d");
        assert_eq!(ColumnPointer::empty().relativize(&to), to);
        assert_eq!(to.relativize(&to), ColumnPointer::empty());
    }

    #[test]
    fn test_contains_and_starts_with() {
        let p = ColumnPointer::parse("items/[]/name");
        assert!(p.contains(&ColumnPointer::array()));
        assert!(!p.contains(&ColumnPointer::parse("items/[]")));
        assert!(p.starts_with(&ColumnPointer::parse("items/[]")));
        assert!(!p.starts_with(&ColumnPointer::parse("item")));
        assert!(p.starts_with(&ColumnPointer::empty()));
    }

    #[test]
    fn test_empty_has_no_segments() {
        assert_eq!(ColumnPointer::empty().iter().count(), 0);
        assert_eq!(ColumnPointer::empty().to_string(), "");
    }

    fn pointer() -> impl Strategy<Value = ColumnPointer> {
        prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "[]"]), 0..5)
            .prop_map(|names| ColumnPointer::parse(&names.join("/")))
    }

    proptest! {
        #[test]
        fn prop_relativize_resolves_back(a in pointer(), b in pointer()) {
            let relative = a.relativize(&b);
            prop_assert_eq!(a.resolve_pointer(&relative).normalize(), b);
        }

        #[test]
        fn prop_display_parse(p in pointer()) {
            prop_assert_eq!(ColumnPointer::parse(&p.to_string()), p);
        }
    }
}
