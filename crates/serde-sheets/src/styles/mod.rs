//! Cell styles of generated sheets
//!
//! A [`StylesBuilder`] registers [`CellStyleBuilder`]s under a name or a
//! [`ColumnType`]. When a sheet is written the builders are pooled into the
//! worksheet and the resulting [`Styles`] resolve each column to a style index.
//!
//! ```rust
//! use serde_sheets::styles::{DataFormat, StylesBuilder};
//! use serde_sheets::schema::ColumnType;
//!
//! let styles = StylesBuilder::simple()
//!     .cell_style("header", |s| s.font(|f| f.bold()))
//!     .cell_style_for(ColumnType::Float, |s| s.data_format(DataFormat::NUMBER_FLOAT));
//! assert_eq!(styles.len(), 6);
//! ```

mod cell_style;
mod font;

pub use cell_style::{CellStyleBuilder, DataFormat, IndexedColor, IntoColor};
pub use font::{FontBuilder, FontCharset};

use ahash::AHashMap;
use serde_sheets_core::Worksheet;

use crate::error::{Error, Result};
use crate::schema::{Column, ColumnType};

/// Key a cell style is registered under
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StyleKey {
    Name(String),
    Type(ColumnType),
}

impl From<&str> for StyleKey {
    fn from(name: &str) -> Self {
        StyleKey::Name(name.to_string())
    }
}

impl From<ColumnType> for StyleKey {
    fn from(value_type: ColumnType) -> Self {
        StyleKey::Type(value_type)
    }
}

/// Registry of cell style builders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StylesBuilder {
    builders: Vec<(StyleKey, CellStyleBuilder)>,
}

impl StylesBuilder {
    /// No styles; cells keep the workbook default
    pub fn new() -> Self {
        Self::default()
    }

    /// One number format per value type
    pub fn simple() -> Self {
        Self::new()
            .cell_style_for(ColumnType::Float, |s| {
                s.data_format(DataFormat::NUMBER_FLOAT_WITH_COMMA)
            })
            .cell_style_for(ColumnType::Integer, |s| {
                s.data_format(DataFormat::NUMBER_INT_WITH_COMMA)
            })
            .cell_style_for(ColumnType::Text, |s| s.data_format(DataFormat::TEXT))
            .cell_style_for(ColumnType::DateTime, |s| {
                s.data_format(DataFormat::DATE_TIME)
            })
            .cell_style_for(ColumnType::Date, |s| s.data_format(DataFormat::DATE))
    }

    /// Register a named style
    pub fn cell_style<S: Into<String>>(
        self,
        name: S,
        f: impl FnOnce(CellStyleBuilder) -> CellStyleBuilder,
    ) -> Self {
        self.put(StyleKey::Name(name.into()), f(CellStyleBuilder::new()))
    }

    /// Register the fallback style of a value type
    pub fn cell_style_for(
        self,
        value_type: ColumnType,
        f: impl FnOnce(CellStyleBuilder) -> CellStyleBuilder,
    ) -> Self {
        self.put(StyleKey::Type(value_type), f(CellStyleBuilder::new()))
    }

    /// Register `name` as a copy of the named style `from`, then configure it
    pub fn clone_style<S: Into<String>>(
        self,
        name: S,
        from: &str,
        f: impl FnOnce(CellStyleBuilder) -> CellStyleBuilder,
    ) -> Result<Self> {
        let base = self
            .get(&StyleKey::from(from))
            .cloned()
            .ok_or_else(|| Error::message(format!("No cell style named '{}'", from)))?;
        Ok(self.put(StyleKey::Name(name.into()), f(base)))
    }

    fn put(mut self, key: StyleKey, builder: CellStyleBuilder) -> Self {
        match self.builders.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = builder,
            None => self.builders.push((key, builder)),
        }
        self
    }

    pub fn get(&self, key: &StyleKey) -> Option<&CellStyleBuilder> {
        self.builders
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, builder)| builder)
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }

    /// Pool every style into `sheet`
    pub fn build(&self, sheet: &mut Worksheet) -> Styles {
        let mut indices = AHashMap::with_capacity(self.builders.len());
        for (key, builder) in &self.builders {
            let index = sheet.add_style(builder.build());
            indices.insert(key.clone(), index);
        }
        Styles { indices }
    }
}

/// Style indices pooled into one worksheet
#[derive(Debug, Clone, Default)]
pub struct Styles {
    indices: AHashMap<StyleKey, u32>,
}

impl Styles {
    /// Data cell style of a column
    pub fn style(&self, column: &Column) -> Option<u32> {
        self.lookup(&column.options().style, column.value_type())
    }

    /// Header cell style of a column
    pub fn header_style(&self, column: &Column) -> Option<u32> {
        self.lookup(&column.options().header_style, column.value_type())
    }

    /// Style index registered under `key`
    pub fn get(&self, key: &StyleKey) -> Option<u32> {
        self.indices.get(key).copied()
    }

    fn lookup(&self, name: &str, value_type: ColumnType) -> Option<u32> {
        if !name.is_empty() {
            if let Some(index) = self.indices.get(&StyleKey::from(name)) {
                return Some(*index);
            }
        }
        self.indices.get(&StyleKey::Type(value_type)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnOptions, ColumnPointer};
    use pretty_assertions::assert_eq;

    fn column(options: ColumnOptions, value_type: ColumnType) -> Column {
        Column::new(ColumnPointer::parse("a"), options, value_type, false)
    }

    #[test]
    fn test_simple_formats() {
        let mut sheet = Worksheet::new("Sheet1");
        let styles = StylesBuilder::simple().build(&mut sheet);

        let float = styles.style(&column(ColumnOptions::new(), ColumnType::Float)).unwrap();
        assert_eq!(
            sheet.style_by_index(float).unwrap().number_format.format_code(),
            "#,##0.00"
        );
        let date = styles.style(&column(ColumnOptions::new(), ColumnType::Date)).unwrap();
        assert_eq!(
            sheet.style_by_index(date).unwrap().number_format.format_code(),
            "yyyy-mm-dd"
        );
        assert!(styles
            .style(&column(ColumnOptions::new(), ColumnType::Boolean))
            .is_none());
    }

    #[test]
    fn test_named_style_falls_back_to_type() {
        let mut sheet = Worksheet::new("Sheet1");
        let styles = StylesBuilder::simple()
            .cell_style("money", |s| s.data_format("#,##0.00 \"USD\""))
            .build(&mut sheet);

        let named = column(ColumnOptions::new().style("money"), ColumnType::Float);
        let index = styles.style(&named).unwrap();
        assert_eq!(
            sheet.style_by_index(index).unwrap().number_format.format_code(),
            "#,##0.00 \"USD\""
        );

        let unknown = column(
            ColumnOptions::new().style("missing").header_style("missing"),
            ColumnType::Integer,
        );
        assert_eq!(styles.style(&unknown), styles.get(&ColumnType::Integer.into()));
        assert_eq!(
            styles.header_style(&unknown),
            styles.get(&ColumnType::Integer.into())
        );
    }

    #[test]
    fn test_clone_style() {
        let builder = StylesBuilder::new()
            .cell_style("base", |s| s.data_format(DataFormat::NUMBER_INT))
            .clone_style("bold", "base", |s| s.font(|f| f.bold()))
            .unwrap();
        let bold = builder.get(&StyleKey::from("bold")).unwrap().build();
        assert_eq!(bold.number_format.format_code(), "0");
        assert!(bold.font.bold);

        let err = StylesBuilder::new().clone_style("x", "nope", |s| s).unwrap_err();
        assert_eq!(err.to_string(), "No cell style named 'nope'");
    }

    #[test]
    fn test_cell_style_replaces() {
        let builder = StylesBuilder::new()
            .cell_style("a", |s| s.data_format(DataFormat::TEXT))
            .cell_style("a", |s| s.data_format(DataFormat::DATE));
        assert_eq!(builder.len(), 1);
    }
}
