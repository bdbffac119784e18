//! The mapper: configuration plus read and write entry points
//!
//! ```rust,no_run
//! use serde::{Deserialize, Serialize};
//! use serde_sheets::{DataGrid, SheetInput, SheetOutput, SpreadsheetMapper};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Entry {
//!     a: i32,
//!     b: String,
//! }
//!
//! impl DataGrid for Entry {}
//!
//! # fn main() -> serde_sheets::Result<()> {
//! let mapper = SpreadsheetMapper::new();
//! let entries = vec![Entry { a: 1, b: "one".into() }];
//! mapper.write_values(SheetOutput::file("entries.xlsx"), &entries)?;
//! let back: Vec<Entry> = mapper.read_values(SheetInput::file("entries.xlsx"))?;
//! # let _ = back;
//! # Ok(())
//! # }
//! ```

mod reader;
mod writer;

pub use reader::{SheetMappingIterator, SpreadsheetReader};
pub use writer::SpreadsheetWriter;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_sheets_core::{CellAddress, Workbook, Worksheet};

use crate::de::SheetInput;
use crate::error::{Error, Result};
use crate::features::{Feature, Features};
use crate::schema::{ColumnNameResolver, DataGrid, SchemaGenerator, SpreadsheetSchema};
use crate::ser::{RootMode, SheetOutput};
use crate::styles::StylesBuilder;

/// Maps [`DataGrid`] records to spreadsheet rows and back
#[derive(Debug, Clone, Default)]
pub struct SpreadsheetMapper {
    features: Features,
    generator: SchemaGenerator,
}

impl SpreadsheetMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> Builder {
        Builder::new(Self::new())
    }

    /// Builder starting from this mapper's configuration
    pub fn rebuild(&self) -> Builder {
        Builder::new(self.clone())
    }

    // === Features ===

    pub fn enable(&mut self, feature: Feature) -> &mut Self {
        self.features = self.features.enable(feature);
        self
    }

    pub fn disable(&mut self, feature: Feature) -> &mut Self {
        self.features = self.features.disable(feature);
        self
    }

    pub fn configure(&mut self, feature: Feature, state: bool) -> &mut Self {
        self.features = self.features.configure(feature, state);
        self
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.features.is_enabled(feature)
    }

    pub fn features(&self) -> Features {
        self.features
    }

    // === Schema generation ===

    /// Anchor tables at an A1 address such as `"B2"`
    pub fn set_origin(&mut self, address: &str) -> Result<&mut Self> {
        let origin =
            CellAddress::parse(address).map_err(|_| Error::InvalidOrigin(address.to_string()))?;
        self.generator = self.generator.with_origin(origin);
        Ok(self)
    }

    /// Anchor tables at a zero-based row and column
    pub fn set_origin_at(&mut self, row: u32, col: u16) -> &mut Self {
        self.generator = self.generator.with_origin(CellAddress::new(row, col));
        self
    }

    pub fn set_styles_builder(&mut self, styles_builder: StylesBuilder) -> &mut Self {
        self.generator = self.generator.with_styles_builder(styles_builder);
        self
    }

    pub fn set_column_name_resolver<R>(&mut self, resolver: R) -> &mut Self
    where
        R: ColumnNameResolver + 'static,
    {
        self.generator = self.generator.with_column_name_resolver(resolver);
        self
    }

    pub fn set_schema_generator(&mut self, generator: SchemaGenerator) -> &mut Self {
        self.generator = generator;
        self
    }

    pub fn schema_generator(&self) -> &SchemaGenerator {
        &self.generator
    }

    /// Schema of `T` under the current configuration
    pub fn sheet_schema_for<T: DataGrid + DeserializeOwned>(&self) -> Result<SpreadsheetSchema> {
        self.generator.generate::<T>()
    }

    // === Facades ===

    /// Reader without a schema
    pub fn reader(&self) -> SpreadsheetReader {
        SpreadsheetReader::new(None, self.features)
    }

    pub fn sheet_reader_for<T: DataGrid + DeserializeOwned>(&self) -> Result<SpreadsheetReader> {
        Ok(SpreadsheetReader::new(
            Some(self.sheet_schema_for::<T>()?),
            self.features,
        ))
    }

    /// Writer without a schema
    pub fn writer(&self) -> SpreadsheetWriter {
        SpreadsheetWriter::new(None)
    }

    pub fn sheet_writer_for<T: DataGrid + DeserializeOwned>(&self) -> Result<SpreadsheetWriter> {
        Ok(SpreadsheetWriter::new(Some(self.sheet_schema_for::<T>()?)))
    }

    // === Reading ===

    /// First data row of the input
    pub fn read_value<T, I>(&self, input: I) -> Result<Option<T>>
    where
        T: DataGrid + DeserializeOwned,
        I: Into<SheetInput>,
    {
        self.sheet_reader_for::<T>()?.read_value(input)
    }

    /// Every data row of the input
    pub fn read_values<T, I>(&self, input: I) -> Result<Vec<T>>
    where
        T: DataGrid + DeserializeOwned,
        I: Into<SheetInput>,
    {
        self.sheet_reader_for::<T>()?.read_values(input)?.read_all()
    }

    pub fn read_value_from_sheet<T>(&self, sheet: &Worksheet) -> Result<Option<T>>
    where
        T: DataGrid + DeserializeOwned,
    {
        self.sheet_reader_for::<T>()?
            .read_values_from_sheet(sheet)
            .next()
            .transpose()
    }

    pub fn read_values_from_sheet<T>(&self, sheet: &Worksheet) -> Result<Vec<T>>
    where
        T: DataGrid + DeserializeOwned,
    {
        self.sheet_reader_for::<T>()?
            .read_values_from_sheet(sheet)
            .read_all()
    }

    // === Writing ===

    /// Write one record as a single data row
    pub fn write_value<'o, T, O>(&self, output: O, value: &T) -> Result<()>
    where
        T: DataGrid + Serialize + DeserializeOwned,
        O: Into<SheetOutput<'o>>,
    {
        self.single_writer::<T>()?.write_value(output, value)
    }

    /// Write one data row per record
    pub fn write_values<'o, T, O>(&self, output: O, values: &[T]) -> Result<()>
    where
        T: DataGrid + Serialize + DeserializeOwned,
        O: Into<SheetOutput<'o>>,
    {
        self.sheet_writer_for::<T>()?.write_value(output, values)
    }

    pub fn write_value_to_sheet<T>(&self, sheet: &mut Worksheet, value: &T) -> Result<()>
    where
        T: DataGrid + Serialize + DeserializeOwned,
    {
        self.single_writer::<T>()?.write_value_to_sheet(sheet, value)
    }

    pub fn write_values_to_sheet<T>(&self, sheet: &mut Worksheet, values: &[T]) -> Result<()>
    where
        T: DataGrid + Serialize + DeserializeOwned,
    {
        self.sheet_writer_for::<T>()?
            .write_value_to_sheet(sheet, values)
    }

    /// Write one record into a sheet of `workbook`, in its date system
    pub fn write_value_to_workbook<T>(
        &self,
        workbook: &mut Workbook,
        sheet_name: &str,
        value: &T,
    ) -> Result<()>
    where
        T: DataGrid + Serialize + DeserializeOwned,
    {
        self.single_writer::<T>()?
            .write_value_to_workbook(workbook, sheet_name, value)
    }

    pub fn write_values_to_workbook<T>(
        &self,
        workbook: &mut Workbook,
        sheet_name: &str,
        values: &[T],
    ) -> Result<()>
    where
        T: DataGrid + Serialize + DeserializeOwned,
    {
        self.sheet_writer_for::<T>()?
            .write_value_to_workbook(workbook, sheet_name, values)
    }

    pub fn write_value_as_bytes<T>(&self, value: &T) -> Result<Vec<u8>>
    where
        T: DataGrid + Serialize + DeserializeOwned,
    {
        self.single_writer::<T>()?.write_value_as_bytes(value)
    }

    pub fn write_values_as_bytes<T>(&self, values: &[T]) -> Result<Vec<u8>>
    where
        T: DataGrid + Serialize + DeserializeOwned,
    {
        self.sheet_writer_for::<T>()?.write_value_as_bytes(values)
    }

    fn single_writer<T: DataGrid + DeserializeOwned>(&self) -> Result<SpreadsheetWriter> {
        Ok(self.sheet_writer_for::<T>()?.with_root_mode(RootMode::Single))
    }
}

/// Fluent configuration of a [`SpreadsheetMapper`]
#[derive(Debug, Clone)]
pub struct Builder {
    mapper: SpreadsheetMapper,
}

impl Builder {
    fn new(mapper: SpreadsheetMapper) -> Self {
        Self { mapper }
    }

    pub fn enable(mut self, feature: Feature) -> Self {
        self.mapper.enable(feature);
        self
    }

    pub fn disable(mut self, feature: Feature) -> Self {
        self.mapper.disable(feature);
        self
    }

    pub fn configure(mut self, feature: Feature, state: bool) -> Self {
        self.mapper.configure(feature, state);
        self
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.mapper.is_enabled(feature)
    }

    /// See [`SpreadsheetMapper::set_origin`]
    pub fn origin(mut self, address: &str) -> Result<Self> {
        self.mapper.set_origin(address)?;
        Ok(self)
    }

    pub fn origin_at(mut self, row: u32, col: u16) -> Self {
        self.mapper.set_origin_at(row, col);
        self
    }

    pub fn styles_builder(mut self, styles_builder: StylesBuilder) -> Self {
        self.mapper.set_styles_builder(styles_builder);
        self
    }

    pub fn column_name_resolver<R>(mut self, resolver: R) -> Self
    where
        R: ColumnNameResolver + 'static,
    {
        self.mapper.set_column_name_resolver(resolver);
        self
    }

    pub fn schema_generator(mut self, generator: SchemaGenerator) -> Self {
        self.mapper.set_schema_generator(generator);
        self
    }

    pub fn build(self) -> SpreadsheetMapper {
        self.mapper
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_features() {
        let mut mapper = SpreadsheetMapper::new();
        assert!(mapper.is_enabled(Feature::BlankRowAsNull));
        assert!(!mapper.is_enabled(Feature::BreakOnBlankRow));
        mapper
            .enable(Feature::BreakOnBlankRow)
            .disable(Feature::BlankRowAsNull);
        assert!(mapper.is_enabled(Feature::BreakOnBlankRow));

        let rebuilt = mapper
            .rebuild()
            .configure(Feature::BlankRowAsNull, true)
            .build();
        assert!(rebuilt.is_enabled(Feature::BlankRowAsNull));
        assert!(rebuilt.is_enabled(Feature::BreakOnBlankRow));
    }

    #[test]
    fn test_origin() {
        let mapper = SpreadsheetMapper::builder().origin("C4").unwrap().build();
        assert_eq!(mapper.schema_generator().origin(), CellAddress::new(3, 2));

        let err = SpreadsheetMapper::new().set_origin("4C").unwrap_err();
        assert_eq!(err.to_string(), "Invalid origin address: 4C");
    }
}
