//! Writer facade

use serde::Serialize;
use serde_sheets_core::{Workbook, Worksheet};

use crate::error::{Error, Result};
use crate::schema::SpreadsheetSchema;
use crate::ser::{RootMode, SheetGenerator, SheetOutput, SheetWriter};

/// Writes values as rows of a new sheet
///
/// The value is a record or a sequence of records; headers are written even
/// when the sequence is empty.
#[derive(Debug, Clone, Default)]
pub struct SpreadsheetWriter {
    schema: Option<SpreadsheetSchema>,
    mode: RootMode,
    date_1904: bool,
}

impl SpreadsheetWriter {
    pub fn new(schema: Option<SpreadsheetSchema>) -> Self {
        Self {
            schema,
            ..Self::default()
        }
    }

    pub fn with_schema(&self, schema: SpreadsheetSchema) -> Self {
        Self {
            schema: Some(schema),
            ..self.clone()
        }
    }

    /// Lay the root value out as a single record or as rows
    pub fn with_root_mode(&self, mode: RootMode) -> Self {
        Self {
            mode,
            ..self.clone()
        }
    }

    /// Write dates in the 1904 system
    pub fn with_date_1904(&self, date_1904: bool) -> Self {
        Self {
            date_1904,
            ..self.clone()
        }
    }

    pub fn schema(&self) -> Option<&SpreadsheetSchema> {
        self.schema.as_ref()
    }

    /// Write a workbook holding one sheet to `output`
    pub fn write_value<'o, O, V>(&self, output: O, value: &V) -> Result<()>
    where
        O: Into<SheetOutput<'o>>,
        V: Serialize + ?Sized,
    {
        let output = output.into();
        let mut workbook = Workbook::empty();
        workbook.set_date_1904(self.date_1904);
        let index = workbook.add_worksheet_with_name(output.sheet_name())?;
        let sheet = workbook
            .worksheet_mut(index)
            .ok_or_else(|| Error::NoSheet(output.to_string()))?;
        self.write(sheet, self.date_1904, value)?;
        output.write_workbook(&workbook)
    }

    /// Write into an existing sheet
    ///
    /// A bare sheet carries no date system, so dates follow
    /// [`with_date_1904`](Self::with_date_1904).
    pub fn write_value_to_sheet<V>(&self, sheet: &mut Worksheet, value: &V) -> Result<()>
    where
        V: Serialize + ?Sized,
    {
        self.write(sheet, self.date_1904, value)
    }

    /// Write into the sheet named `sheet_name`, adding it when missing
    ///
    /// Dates follow the workbook's date system.
    pub fn write_value_to_workbook<V>(
        &self,
        workbook: &mut Workbook,
        sheet_name: &str,
        value: &V,
    ) -> Result<()>
    where
        V: Serialize + ?Sized,
    {
        let date_1904 = workbook.is_date_1904();
        let index = match workbook.sheet_index(sheet_name) {
            Some(index) => index,
            None => workbook.add_worksheet_with_name(sheet_name)?,
        };
        let sheet = workbook
            .worksheet_mut(index)
            .ok_or_else(|| Error::NoSheet(sheet_name.to_string()))?;
        self.write(sheet, date_1904, value)
    }

    /// XLSX bytes of a workbook holding one sheet
    pub fn write_value_as_bytes<V>(&self, value: &V) -> Result<Vec<u8>>
    where
        V: Serialize + ?Sized,
    {
        let mut bytes = Vec::new();
        self.write_value(SheetOutput::writer(&mut bytes), value)?;
        Ok(bytes)
    }

    fn write<V>(&self, sheet: &mut Worksheet, date_1904: bool, value: &V) -> Result<()>
    where
        V: Serialize + ?Sized,
    {
        let schema = self.schema.clone().ok_or(Error::NoSchema("generate"))?;
        let mut generator = SheetGenerator::new(SheetWriter::new(sheet, date_1904), self.mode);
        generator.set_schema(schema)?;
        value.serialize(&mut generator)?;
        generator.finish()?;
        Ok(())
    }
}
