//! Reader facade

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_sheets_core::Worksheet;

use crate::de::{
    RowDeserializer, RowNode, SheetInput, SheetLocation, SheetParser, SheetReader, WorksheetReader,
};
use crate::error::Result;
use crate::features::Features;
use crate::schema::SpreadsheetSchema;

/// Reads rows of a sheet as values
///
/// Created by [`SpreadsheetMapper::reader`](crate::SpreadsheetMapper::reader)
/// or [`SpreadsheetMapper::sheet_reader_for`](crate::SpreadsheetMapper::sheet_reader_for).
#[derive(Debug, Clone, Default)]
pub struct SpreadsheetReader {
    schema: Option<SpreadsheetSchema>,
    features: Features,
}

impl SpreadsheetReader {
    pub fn new(schema: Option<SpreadsheetSchema>, features: Features) -> Self {
        Self { schema, features }
    }

    pub fn with_schema(&self, schema: SpreadsheetSchema) -> Self {
        Self {
            schema: Some(schema),
            features: self.features,
        }
    }

    pub fn with_features(&self, features: Features) -> Self {
        Self {
            schema: self.schema.clone(),
            features,
        }
    }

    pub fn schema(&self) -> Option<&SpreadsheetSchema> {
        self.schema.as_ref()
    }

    pub fn features(&self) -> Features {
        self.features
    }

    /// First data row of the input, `None` for an empty sheet
    pub fn read_value<T, I>(&self, input: I) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        I: Into<SheetInput>,
    {
        self.read_values(input)?.next().transpose()
    }

    /// Iterate the data rows of the input
    pub fn read_values<T, I>(&self, input: I) -> Result<SheetMappingIterator<'static, T>>
    where
        T: DeserializeOwned,
        I: Into<SheetInput>,
    {
        let reader = input.into().open()?;
        Ok(self.iterate(Box::new(reader)))
    }

    /// Iterate the data rows of an in-memory sheet
    pub fn read_values_from_sheet<'a, T>(&self, sheet: &'a Worksheet) -> SheetMappingIterator<'a, T>
    where
        T: DeserializeOwned,
    {
        self.iterate(Box::new(WorksheetReader::new(sheet)))
    }

    fn iterate<'a, T>(&self, reader: Box<dyn SheetReader + 'a>) -> SheetMappingIterator<'a, T> {
        SheetMappingIterator {
            parser: SheetParser::new(reader, self.schema.clone(), self.features),
            failed: false,
            _marker: PhantomData,
        }
    }
}

/// Iterator over mapped rows
///
/// Yields one `Result` per data row and stops after the first error.
pub struct SheetMappingIterator<'a, T> {
    parser: SheetParser<Box<dyn SheetReader + 'a>>,
    failed: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T: DeserializeOwned> SheetMappingIterator<'a, T> {
    pub fn schema(&self) -> Option<&SpreadsheetSchema> {
        self.parser.schema()
    }

    /// Location of the last cell or row read
    pub fn current_location(&self) -> Option<SheetLocation> {
        self.parser.current_location()
    }

    /// Collect every remaining row
    pub fn read_all(self) -> Result<Vec<T>> {
        self.collect()
    }
}

impl<'a, T: DeserializeOwned> Iterator for SheetMappingIterator<'a, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let row = match self.parser.next_row() {
            Ok(Some(row)) => row,
            Ok(None) => return None,
            Err(e) => {
                self.failed = true;
                self.parser.close();
                return Some(Err(e));
            }
        };
        let blank = matches!(row.node, RowNode::Null);
        let deserializer = RowDeserializer::new(row.node, self.parser.is_date_1904());
        let value = T::deserialize(deserializer).map_err(|e| {
            let e = e.at(row.location);
            if blank {
                e.in_blank_row()
            } else {
                e
            }
        });
        if value.is_err() {
            self.failed = true;
            self.parser.close();
        }
        Some(value)
    }
}

impl<T> fmt::Debug for SheetMappingIterator<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetMappingIterator")
            .field("location", &self.parser.current_location())
            .field("failed", &self.failed)
            .finish_non_exhaustive()
    }
}
