//! Grid and column options
//!
//! [`GridOptions`] hold defaults for every column of a record type and
//! [`ColumnOptions`] configure one column. A record type supplies both
//! through the [`DataGrid`] trait.

use super::ColumnPointer;

const UNSET_WIDTH: i32 = -1;
const MAX_WIDTH: i32 = 255;

/// A boolean that can be left unset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OptBool {
    #[default]
    Default,
    True,
    False,
}

impl OptBool {
    pub fn is_default(self) -> bool {
        self == OptBool::Default
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            OptBool::Default => None,
            OptBool::True => Some(true),
            OptBool::False => Some(false),
        }
    }
}

impl From<bool> for OptBool {
    fn from(value: bool) -> Self {
        if value {
            OptBool::True
        } else {
            OptBool::False
        }
    }
}

/// Column defaults for a whole record type
///
/// String fields are unset when empty, widths when `-1`, and the maximum
/// width when `255`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridOptions {
    pub column_style: String,
    pub column_header_style: String,
    pub column_width: i32,
    pub auto_size_column: OptBool,
    pub min_column_width: i32,
    pub max_column_width: i32,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            column_style: String::new(),
            column_header_style: String::new(),
            column_width: UNSET_WIDTH,
            auto_size_column: OptBool::Default,
            min_column_width: UNSET_WIDTH,
            max_column_width: MAX_WIDTH,
        }
    }
}

impl GridOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column_style<S: Into<String>>(mut self, style: S) -> Self {
        self.column_style = style.into();
        self
    }

    pub fn column_header_style<S: Into<String>>(mut self, style: S) -> Self {
        self.column_header_style = style.into();
        self
    }

    pub fn column_width(mut self, width: i32) -> Self {
        self.column_width = width;
        self
    }

    pub fn auto_size_column(mut self, auto_size: bool) -> Self {
        self.auto_size_column = auto_size.into();
        self
    }

    pub fn min_column_width(mut self, width: i32) -> Self {
        self.min_column_width = width;
        self
    }

    pub fn max_column_width(mut self, width: i32) -> Self {
        self.max_column_width = width;
        self
    }

    /// True when nothing is configured
    pub fn is_empty(&self) -> bool {
        *self == GridOptions::default()
    }

    /// Fill every unset field from `defaults`
    pub fn with_defaults(&self, defaults: &GridOptions) -> GridOptions {
        if defaults.is_empty() || defaults == self {
            return self.clone();
        }
        GridOptions {
            column_style: or_string(&self.column_style, &defaults.column_style),
            column_header_style: or_string(
                &self.column_header_style,
                &defaults.column_header_style,
            ),
            column_width: or_width(self.column_width, defaults.column_width),
            auto_size_column: or_bool(self.auto_size_column, defaults.auto_size_column),
            min_column_width: or_width(self.min_column_width, defaults.min_column_width),
            max_column_width: or_max(self.max_column_width, defaults.max_column_width),
        }
    }
}

/// Options of a single column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnOptions {
    /// Header text; the pointer is used when empty
    pub name: String,
    /// Named data cell style
    pub style: String,
    /// Named header cell style
    pub header_style: String,
    /// Width in characters, `-1` when unset
    pub width: i32,
    pub auto_size: OptBool,
    pub min_width: i32,
    pub max_width: i32,
}

impl Default for ColumnOptions {
    fn default() -> Self {
        Self {
            name: String::new(),
            style: String::new(),
            header_style: String::new(),
            width: UNSET_WIDTH,
            auto_size: OptBool::Default,
            min_width: UNSET_WIDTH,
            max_width: MAX_WIDTH,
        }
    }
}

impl ColumnOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options carrying only a header name
    pub fn named<S: Into<String>>(name: S) -> Self {
        Self::default().with_name(name)
    }

    /// Replace the name; empty names are ignored
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        let name = name.into();
        if !name.is_empty() {
            self.name = name;
        }
        self
    }

    pub fn style<S: Into<String>>(mut self, style: S) -> Self {
        self.style = style.into();
        self
    }

    pub fn header_style<S: Into<String>>(mut self, style: S) -> Self {
        self.header_style = style.into();
        self
    }

    pub fn width(mut self, width: i32) -> Self {
        self.width = width;
        self
    }

    pub fn auto_size(mut self, auto_size: bool) -> Self {
        self.auto_size = auto_size.into();
        self
    }

    pub fn min_width(mut self, width: i32) -> Self {
        self.min_width = width;
        self
    }

    pub fn max_width(mut self, width: i32) -> Self {
        self.max_width = width;
        self
    }

    /// Fill every unset field from the grid defaults
    pub fn with_defaults(&self, grid: &GridOptions) -> ColumnOptions {
        if grid.is_empty() {
            return self.clone();
        }
        ColumnOptions {
            name: self.name.clone(),
            style: or_string(&self.style, &grid.column_style),
            header_style: or_string(&self.header_style, &grid.column_header_style),
            width: or_width(self.width, grid.column_width),
            auto_size: or_bool(self.auto_size, grid.auto_size_column),
            min_width: or_width(self.min_width, grid.min_column_width),
            max_width: or_max(self.max_width, grid.max_column_width),
        }
    }

    /// Auto-size applies only without an explicit width
    pub fn is_auto_size(&self) -> bool {
        self.width < 0 && self.auto_size == OptBool::True
    }
}

fn or_string(value: &str, default: &str) -> String {
    if value.is_empty() { default } else { value }.to_string()
}

fn or_width(value: i32, default: i32) -> i32 {
    if value == UNSET_WIDTH {
        default
    } else {
        value
    }
}

fn or_max(value: i32, default: i32) -> i32 {
    if value == MAX_WIDTH {
        default
    } else {
        value
    }
}

fn or_bool(value: OptBool, default: OptBool) -> OptBool {
    if value.is_default() {
        default
    } else {
        value
    }
}

/// A record type that maps to sheet rows
///
/// Both methods have empty defaults, so `impl DataGrid for Entry {}` is
/// enough to make `Entry` usable with
/// [`SpreadsheetMapper`](crate::SpreadsheetMapper).
///
/// ```rust
/// use serde_sheets::schema::{ColumnOptions, ColumnPointer, DataGrid, GridOptions};
///
/// struct Entry {
///     id: u32,
///     name: String,
/// }
///
/// impl DataGrid for Entry {
///     fn grid() -> GridOptions {
///         GridOptions::new().auto_size_column(true)
///     }
///
///     fn column(pointer: &ColumnPointer) -> ColumnOptions {
///         match pointer.to_string().as_str() {
///             "id" => ColumnOptions::named("ID").width(6),
///             _ => ColumnOptions::new(),
///         }
///     }
/// }
/// ```
pub trait DataGrid {
    /// Defaults for every column
    fn grid() -> GridOptions {
        GridOptions::default()
    }

    /// Options of the column at `pointer`
    ///
    /// For a sequence of scalars the pointer names the field itself, without
    /// the trailing `[]`.
    fn column(_pointer: &ColumnPointer) -> ColumnOptions {
        ColumnOptions::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_grid_defaults() {
        let grid = GridOptions::default();
        assert!(grid.is_empty());
        assert_eq!(grid.column_width, -1);
        assert_eq!(grid.min_column_width, -1);
        assert_eq!(grid.max_column_width, 255);
    }

    #[test]
    fn test_grid_with_defaults() {
        let own = GridOptions::new().column_style("own");
        let defaults = GridOptions::new()
            .column_style("base")
            .column_header_style("head")
            .max_column_width(40);
        let merged = own.with_defaults(&defaults);
        assert_eq!(merged.column_style, "own");
        assert_eq!(merged.column_header_style, "head");
        assert_eq!(merged.max_column_width, 40);

        assert_eq!(own.with_defaults(&GridOptions::default()), own);
    }

    #[test]
    fn test_column_with_defaults() {
        let grid = GridOptions::new()
            .column_style("data")
            .auto_size_column(true)
            .min_column_width(5);
        let column = ColumnOptions::named("Amount").width(12).with_defaults(&grid);
        assert_eq!(column.name, "Amount");
        assert_eq!(column.style, "data");
        assert_eq!(column.width, 12);
        assert_eq!(column.auto_size, OptBool::True);
        assert_eq!(column.min_width, 5);
        assert!(!column.is_auto_size());

        let auto = ColumnOptions::new().with_defaults(&grid);
        assert!(auto.is_auto_size());
    }

    #[test]
    fn test_with_name_ignores_empty() {
        let column = ColumnOptions::named("a").with_name("");
        assert_eq!(column.name, "a");
    }
}
