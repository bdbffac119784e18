//! serde `Serializer` writing records as sheet rows

use log::trace;
use serde::ser::{self, Impossible, Serialize};

use super::context::SheetStreamContext;
use super::writer::SheetWriter;
use crate::date::{parse_iso, to_excel_serial, EXCEL_DATETIME_TOKEN, EXCEL_DATE_TOKEN};
use crate::error::{Error, Result};
use crate::schema::SpreadsheetSchema;

/// How the root value is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RootMode {
    /// The root is a single record
    Single,
    /// The root is a record or a sequence of records, one per row
    #[default]
    Rows,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateKind {
    Date,
    DateTime,
}

/// Serializer turning values into cells of one worksheet
///
/// A schema must be set before anything is written; it fixes the columns and
/// writes the header row.
#[derive(Debug)]
pub struct SheetGenerator<'a> {
    writer: SheetWriter<'a>,
    mode: RootMode,
    context: Option<SheetStreamContext>,
    date_kind: Option<DateKind>,
}

impl<'a> SheetGenerator<'a> {
    pub fn new(writer: SheetWriter<'a>, mode: RootMode) -> Self {
        Self {
            writer,
            mode,
            context: None,
            date_kind: None,
        }
    }

    /// Install the schema, pool its styles and write the headers
    pub fn set_schema(&mut self, schema: SpreadsheetSchema) -> Result<()> {
        if self.writer.has_schema() {
            return Err(Error::message(
                "Schema of type 'spreadsheet' already set, can not set another one",
            ));
        }
        self.context = Some(SheetStreamContext::new_root(&schema));
        self.writer.set_schema(schema);
        self.writer.write_headers()
    }

    pub fn schema(&self) -> Option<&SpreadsheetSchema> {
        self.writer.schema().ok()
    }

    /// Size the columns and hand back the writer
    pub fn finish(mut self) -> Result<SheetWriter<'a>> {
        self.writer.adjust_column_width()?;
        Ok(self.writer)
    }

    fn context(&mut self) -> Result<&mut SheetStreamContext> {
        self.context.as_mut().ok_or(Error::NoSchema("generate"))
    }

    /// Move to the next value position
    fn begin_value(&mut self) -> Result<()> {
        let schema = self.writer.schema()?;
        let context = self.context.as_mut().ok_or(Error::NoSchema("generate"))?;
        context.write_value(schema);
        Ok(())
    }

    /// Advance, then write through `f` when the position maps to a cell
    fn write_scalar<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut SheetWriter<'a>) -> Result<()>,
    {
        self.date_kind = None;
        self.begin_value()?;
        let context = self.context()?;
        let reference = context.current_reference();
        match reference {
            Some(reference) => {
                trace!("Write at {} ({})", reference, context.current_pointer());
                self.writer.set_reference(reference);
                f(&mut self.writer)
            }
            None => {
                trace!("Skip unmapped value at {}", context.current_pointer());
                Ok(())
            }
        }
    }

    fn write_integer(&mut self, value: i128) -> Result<()> {
        match exact_f64(value) {
            Some(number) => self.write_scalar(|w| w.write_numeric(number)),
            None => {
                let text = value.to_string();
                self.write_scalar(|w| w.write_string(&text))
            }
        }
    }

    fn start_array(&mut self) -> Result<()> {
        let in_root = self.context()?.in_root();
        if in_root && self.mode == RootMode::Single {
            return Err(Error::ValueTypeRequired);
        }
        self.date_kind = None;
        self.begin_value()?;
        self.context()?.push_array();
        Ok(())
    }

    fn start_object(&mut self) -> Result<()> {
        self.date_kind = None;
        self.begin_value()?;
        self.context()?.push_object();
        Ok(())
    }

    fn end_structure(&mut self) -> Result<()> {
        let context = self.context()?;
        trace!("Close {}", context.current_pointer());
        context.pop();
        Ok(())
    }
}

/// `value` as an `f64` when the conversion is exact
fn exact_f64(value: i128) -> Option<f64> {
    let number = value as f64;
    if number.abs() < 1.0e38 && number as i128 == value {
        Some(number)
    } else {
        None
    }
}

fn unsigned(value: u128) -> Option<i128> {
    i128::try_from(value).ok()
}

impl<'g, 'a> ser::Serializer for &'g mut SheetGenerator<'a> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = Compound<'g, 'a>;
    type SerializeTuple = Compound<'g, 'a>;
    type SerializeTupleStruct = Compound<'g, 'a>;
    type SerializeTupleVariant = Impossible<(), Error>;
    type SerializeMap = Compound<'g, 'a>;
    type SerializeStruct = Compound<'g, 'a>;
    type SerializeStructVariant = Impossible<(), Error>;

    fn serialize_bool(self, v: bool) -> Result<()> {
        self.write_scalar(|w| w.write_boolean(v))
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.write_integer(i128::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.write_integer(i128::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.write_integer(i128::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<()> {
        self.write_integer(i128::from(v))
    }

    fn serialize_i128(self, v: i128) -> Result<()> {
        self.write_integer(v)
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.write_integer(i128::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.write_integer(i128::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.write_integer(i128::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<()> {
        self.write_integer(i128::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<()> {
        match unsigned(v) {
            Some(v) => self.write_integer(v),
            None => {
                let text = v.to_string();
                self.write_scalar(|w| w.write_string(&text))
            }
        }
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        self.write_scalar(|w| w.write_numeric(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<()> {
        self.write_scalar(|w| w.write_numeric(v))
    }

    fn serialize_char(self, v: char) -> Result<()> {
        let mut buf = [0u8; 4];
        let text: &str = v.encode_utf8(&mut buf);
        self.write_scalar(|w| w.write_string(text))
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        let serial = match self.date_kind.take() {
            Some(kind) => {
                let date_1904 = self.writer.is_date_1904();
                let serial = parse_iso(v).and_then(|value| to_excel_serial(value, date_1904));
                match (kind, serial) {
                    (DateKind::Date, Some(serial)) => Some(serial.floor()),
                    (DateKind::DateTime, serial) => serial,
                    (DateKind::Date, None) => None,
                }
            }
            None => None,
        };
        match serial {
            Some(serial) => self.write_scalar(|w| w.write_numeric(serial)),
            None => self.write_scalar(|w| w.write_string(v)),
        }
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<()> {
        Err(Error::UnsupportedType("bytes".into()))
    }

    fn serialize_none(self) -> Result<()> {
        self.write_scalar(|w| w.write_blank())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<()> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        self.write_scalar(|w| w.write_blank())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        self.write_scalar(|w| w.write_blank())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<()> {
        self.write_scalar(|w| w.write_string(variant))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<()> {
        let kind = match name {
            EXCEL_DATE_TOKEN => Some(DateKind::Date),
            EXCEL_DATETIME_TOKEN => Some(DateKind::DateTime),
            _ => None,
        };
        if kind.is_some() {
            self.date_kind = kind;
        }
        let result = value.serialize(&mut *self);
        self.date_kind = None;
        result
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _value: &T,
    ) -> Result<()> {
        Err(data_variant(name, variant))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Compound<'g, 'a>> {
        self.start_array()?;
        Ok(Compound { generator: self })
    }

    fn serialize_tuple(self, _len: usize) -> Result<Compound<'g, 'a>> {
        self.start_array()?;
        Ok(Compound { generator: self })
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Compound<'g, 'a>> {
        self.start_array()?;
        Ok(Compound { generator: self })
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(data_variant(name, variant))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Compound<'g, 'a>> {
        self.start_object()?;
        Ok(Compound { generator: self })
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Compound<'g, 'a>> {
        self.start_object()?;
        Ok(Compound { generator: self })
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(data_variant(name, variant))
    }
}

fn data_variant(name: &str, variant: &str) -> Error {
    Error::UnsupportedType(format!("enum variant `{}::{}` with data", name, variant))
}

/// Sequences, tuples, maps and structs in progress
pub struct Compound<'g, 'a> {
    generator: &'g mut SheetGenerator<'a>,
}

impl<'g, 'a> ser::SerializeSeq for Compound<'g, 'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut *self.generator)
    }

    fn end(self) -> Result<()> {
        self.generator.end_structure()
    }
}

impl<'g, 'a> ser::SerializeTuple for Compound<'g, 'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut *self.generator)
    }

    fn end(self) -> Result<()> {
        self.generator.end_structure()
    }
}

impl<'g, 'a> ser::SerializeTupleStruct for Compound<'g, 'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut *self.generator)
    }

    fn end(self) -> Result<()> {
        self.generator.end_structure()
    }
}

impl<'g, 'a> ser::SerializeMap for Compound<'g, 'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
        let name = key.serialize(MapKeySerializer)?;
        self.generator.context()?.set_current_name(&name);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut *self.generator)
    }

    fn end(self) -> Result<()> {
        self.generator.end_structure()
    }
}

impl<'g, 'a> ser::SerializeStruct for Compound<'g, 'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        self.generator.context()?.set_current_name(key);
        value.serialize(&mut *self.generator)
    }

    fn end(self) -> Result<()> {
        self.generator.end_structure()
    }
}

/// Accepts map keys that read as field names
struct MapKeySerializer;

fn key_must_be_a_string() -> Error {
    Error::UnsupportedType("map with non-string keys".into())
}

macro_rules! key_to_string {
    ($($method:ident($ty:ty);)*) => {
        $(
            fn $method(self, v: $ty) -> Result<String> {
                Ok(v.to_string())
            }
        )*
    };
}

impl ser::Serializer for MapKeySerializer {
    type Ok = String;
    type Error = Error;

    type SerializeSeq = Impossible<String, Error>;
    type SerializeTuple = Impossible<String, Error>;
    type SerializeTupleStruct = Impossible<String, Error>;
    type SerializeTupleVariant = Impossible<String, Error>;
    type SerializeMap = Impossible<String, Error>;
    type SerializeStruct = Impossible<String, Error>;
    type SerializeStructVariant = Impossible<String, Error>;

    key_to_string! {
        serialize_bool(bool);
        serialize_i8(i8);
        serialize_i16(i16);
        serialize_i32(i32);
        serialize_i64(i64);
        serialize_u8(u8);
        serialize_u16(u16);
        serialize_u32(u32);
        serialize_u64(u64);
        serialize_char(char);
        serialize_str(&str);
    }

    fn serialize_f32(self, _v: f32) -> Result<String> {
        Err(key_must_be_a_string())
    }

    fn serialize_f64(self, _v: f64) -> Result<String> {
        Err(key_must_be_a_string())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String> {
        Err(key_must_be_a_string())
    }

    fn serialize_none(self) -> Result<String> {
        Err(key_must_be_a_string())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<String> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<String> {
        Err(key_must_be_a_string())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String> {
        Err(key_must_be_a_string())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String> {
        Ok(variant.to_string())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<String> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String> {
        Err(key_must_be_a_string())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(key_must_be_a_string())
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(key_must_be_a_string())
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(key_must_be_a_string())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(key_must_be_a_string())
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(key_must_be_a_string())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(key_must_be_a_string())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(key_must_be_a_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::ExcelDate;
    use crate::schema::{Column, ColumnOptions, ColumnPointer, ColumnType};
    use crate::styles::StylesBuilder;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde::Serialize;
    use serde_sheets_core::{CellAddress, CellValue, Worksheet};
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Inner {
        b: i32,
        c: Option<String>,
    }

    #[derive(Serialize)]
    struct Entry {
        a: f64,
        inner: Inner,
        tags: Vec<String>,
        day: ExcelDate,
    }

    fn schema() -> SpreadsheetSchema {
        let columns = [
            ("a", ColumnType::Float),
            ("inner/b", ColumnType::Integer),
            ("inner/c", ColumnType::Text),
            ("tags/[]", ColumnType::Text),
            ("day", ColumnType::Date),
        ]
        .into_iter()
        .map(|(path, value_type)| {
            let pointer = ColumnPointer::parse(path);
            let array = pointer.name() == "[]";
            Column::new(pointer, ColumnOptions::default(), value_type, array)
        })
        .collect();
        SpreadsheetSchema::new(columns, StylesBuilder::new(), CellAddress::A1)
    }

    fn entry(a: f64, tags: &[&str]) -> Entry {
        Entry {
            a,
            inner: Inner {
                b: 7,
                c: None,
            },
            tags: tags.iter().map(|t| t.to_string()).collect(),
            day: ExcelDate(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()),
        }
    }

    fn row(sheet: &Worksheet, row: u32) -> Vec<CellValue> {
        (0..5).map(|col| sheet.get_value_at(row, col)).collect()
    }

    #[test]
    fn test_write_rows() {
        let mut sheet = Worksheet::new("Sheet1");
        let mut generator = SheetGenerator::new(SheetWriter::new(&mut sheet, false), RootMode::Rows);
        generator.set_schema(schema()).unwrap();
        vec![entry(1.5, &["x", "y"]), entry(2.0, &[])]
            .serialize(&mut generator)
            .unwrap();
        generator.finish().unwrap();

        assert_eq!(
            row(&sheet, 0),
            vec![
                CellValue::string("a"),
                CellValue::string("inner/b"),
                CellValue::string("inner/c"),
                CellValue::string("tags/[]"),
                CellValue::string("day"),
            ]
        );
        assert_eq!(
            row(&sheet, 1),
            vec![
                CellValue::Number(1.5),
                CellValue::Number(7.0),
                CellValue::Empty,
                CellValue::string("x"),
                CellValue::Number(45306.0),
            ]
        );
        assert_eq!(sheet.get_value_at(2, 3), CellValue::string("y"));
        assert_eq!(sheet.get_value_at(2, 0), CellValue::Empty);
        assert_eq!(sheet.get_value_at(3, 0), CellValue::Number(2.0));
    }

    #[test]
    fn test_single_mode_rejects_sequences() {
        let mut sheet = Worksheet::new("Sheet1");
        let mut generator =
            SheetGenerator::new(SheetWriter::new(&mut sheet, false), RootMode::Single);
        generator.set_schema(schema()).unwrap();
        let err = vec![entry(1.0, &[])].serialize(&mut generator).unwrap_err();
        assert_eq!(
            err.to_string(),
            "value type MUST be specified to write a value of a collection or array type"
        );
    }

    #[test]
    fn test_requires_schema() {
        let mut sheet = Worksheet::new("Sheet1");
        let mut generator = SheetGenerator::new(SheetWriter::new(&mut sheet, false), RootMode::Rows);
        let err = entry(1.0, &[]).serialize(&mut generator).unwrap_err();
        assert_eq!(
            err.to_string(),
            "No schema of type 'spreadsheet' set, can not generate"
        );
        generator.set_schema(schema()).unwrap();
        assert!(generator.set_schema(schema()).is_err());
    }

    #[test]
    fn test_maps_and_large_integers() {
        let columns = ["big", "kind"]
            .into_iter()
            .map(|p| {
                Column::new(
                    ColumnPointer::parse(p),
                    ColumnOptions::default(),
                    ColumnType::Any,
                    false,
                )
            })
            .collect();
        let schema = SpreadsheetSchema::new(columns, StylesBuilder::new(), CellAddress::A1);

        #[derive(Serialize)]
        enum Kind {
            Small,
        }
        #[derive(Serialize)]
        struct Record {
            big: u64,
            kind: Kind,
        }

        let mut sheet = Worksheet::new("Sheet1");
        let mut generator = SheetGenerator::new(SheetWriter::new(&mut sheet, false), RootMode::Rows);
        generator.set_schema(schema).unwrap();
        Record {
            big: u64::MAX,
            kind: Kind::Small,
        }
        .serialize(&mut generator)
        .unwrap();
        let mut map = BTreeMap::new();
        map.insert("big", 5u64);
        map.insert("other", 1u64);
        map.serialize(&mut generator).unwrap();
        generator.finish().unwrap();

        assert_eq!(sheet.get_value_at(1, 0), CellValue::string("18446744073709551615"));
        assert_eq!(sheet.get_value_at(1, 1), CellValue::string("Small"));
        assert_eq!(sheet.get_value_at(2, 0), CellValue::Number(5.0));
    }

    #[test]
    fn test_rejects_data_variants() {
        #[derive(Serialize)]
        enum Shape {
            Circle(f64),
        }
        #[derive(Serialize)]
        struct Record {
            big: Shape,
        }
        let columns = vec![Column::new(
            ColumnPointer::parse("big"),
            ColumnOptions::default(),
            ColumnType::Any,
            false,
        )];
        let schema = SpreadsheetSchema::new(columns, StylesBuilder::new(), CellAddress::A1);
        let mut sheet = Worksheet::new("Sheet1");
        let mut generator = SheetGenerator::new(SheetWriter::new(&mut sheet, false), RootMode::Rows);
        generator.set_schema(schema).unwrap();
        let err = Record {
            big: Shape::Circle(1.0),
        }
        .serialize(&mut generator)
        .unwrap_err();
        assert_eq!(err.to_string(), "Unsupported type: enum variant `Shape::Circle` with data");
    }
}
