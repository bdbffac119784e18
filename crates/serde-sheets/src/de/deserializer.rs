//! serde `Deserializer` over a row tree

use serde::de::value::StringDeserializer;
use serde::de::{
    self, DeserializeSeed, Error as _, IntoDeserializer, MapAccess, SeqAccess, Unexpected, Visitor,
};
use serde_sheets_core::CellValue;

use super::node::RowNode;
use crate::date::{
    format_date, format_datetime, from_excel_serial, EXCEL_DATETIME_TOKEN, EXCEL_DATE_TOKEN,
};
use crate::error::{Error, Result};

/// Deserializes one [`RowNode`]
#[derive(Debug, Clone)]
pub struct RowDeserializer {
    node: RowNode,
    date_1904: bool,
}

impl RowDeserializer {
    pub fn new(node: RowNode, date_1904: bool) -> Self {
        Self { node, date_1904 }
    }

    fn unexpected(&self) -> Unexpected<'_> {
        match &self.node {
            RowNode::Null => Unexpected::Unit,
            RowNode::Object(_) => Unexpected::Map,
            RowNode::Array(_) => Unexpected::Seq,
            RowNode::Value(value) => match value {
                CellValue::Empty => Unexpected::Unit,
                CellValue::Boolean(b) => Unexpected::Bool(*b),
                CellValue::Number(n) => Unexpected::Float(*n),
                CellValue::String(s) => Unexpected::Str(s),
                CellValue::Error(e) => Unexpected::Other(e.as_str()),
            },
        }
    }

    fn invalid(&self, expected: &str) -> Error {
        Error::invalid_type(self.unexpected(), &expected)
    }

    fn integer(&self, expected: &str) -> Result<i128> {
        match &self.node {
            RowNode::Value(CellValue::Number(n)) if n.is_finite() && n.fract() == 0.0 => {
                if n.abs() < 1.0e38 {
                    Ok(*n as i128)
                } else {
                    Err(Error::invalid_value(Unexpected::Float(*n), &expected))
                }
            }
            RowNode::Value(CellValue::String(s)) => s
                .trim()
                .parse::<i128>()
                .map_err(|_| Error::invalid_value(Unexpected::Str(s), &expected)),
            _ => Err(self.invalid(expected)),
        }
    }

    fn float(&self) -> Result<f64> {
        match &self.node {
            RowNode::Value(CellValue::Number(n)) => Ok(*n),
            RowNode::Value(CellValue::String(s)) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| Error::invalid_value(Unexpected::Str(s), &"a number")),
            _ => Err(self.invalid("a number")),
        }
    }

    fn text(&self) -> Result<String> {
        match &self.node {
            RowNode::Value(CellValue::Empty) | RowNode::Value(CellValue::Error(_)) => {
                Err(self.invalid("a string"))
            }
            RowNode::Value(value) => Ok(value.display_text()),
            _ => Err(self.invalid("a string")),
        }
    }
}

macro_rules! deserialize_integer {
    ($($method:ident => $visit:ident($ty:ty);)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
                let expected = concat!("an integer of type ", stringify!($ty));
                let value = self.integer(expected)?;
                let value = <$ty>::try_from(value).map_err(|_| {
                    Error::invalid_value(Unexpected::Other("out of range integer"), &expected)
                })?;
                visitor.$visit(value)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for RowDeserializer {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.node {
            RowNode::Null | RowNode::Value(CellValue::Empty) => visitor.visit_unit(),
            RowNode::Value(CellValue::Boolean(b)) => visitor.visit_bool(b),
            RowNode::Value(CellValue::Number(n)) => {
                if n.fract() == 0.0 && n.abs() < 9.0e18 {
                    visitor.visit_i64(n as i64)
                } else {
                    visitor.visit_f64(n)
                }
            }
            RowNode::Value(CellValue::String(s)) => visitor.visit_string(s),
            RowNode::Value(CellValue::Error(e)) => {
                Err(Error::message(format!("Unexpected cell value {}", e.as_str())))
            }
            RowNode::Object(fields) => visitor.visit_map(RowMapAccess::new(fields, self.date_1904)),
            RowNode::Array(items) => visitor.visit_seq(RowSeqAccess::new(items, self.date_1904)),
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match &self.node {
            RowNode::Value(CellValue::Boolean(b)) => visitor.visit_bool(*b),
            RowNode::Value(CellValue::Number(n)) => visitor.visit_bool(*n != 0.0),
            RowNode::Value(CellValue::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => visitor.visit_bool(true),
                "false" => visitor.visit_bool(false),
                _ => Err(Error::invalid_value(Unexpected::Str(s), &"a boolean")),
            },
            _ => Err(self.invalid("a boolean")),
        }
    }

    deserialize_integer! {
        deserialize_i8 => visit_i8(i8);
        deserialize_i16 => visit_i16(i16);
        deserialize_i32 => visit_i32(i32);
        deserialize_i64 => visit_i64(i64);
        deserialize_i128 => visit_i128(i128);
        deserialize_u8 => visit_u8(u8);
        deserialize_u16 => visit_u16(u16);
        deserialize_u32 => visit_u32(u32);
        deserialize_u64 => visit_u64(u64);
        deserialize_u128 => visit_u128(u128);
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f32(self.float()? as f32)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f64(self.float()?)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let text = self.text()?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(Error::invalid_value(Unexpected::Str(&text), &"a single character")),
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_string(self.text()?)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_string(self.text()?)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::UnsupportedType("bytes".into()))
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::UnsupportedType("bytes".into()))
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.node {
            RowNode::Null | RowNode::Value(CellValue::Empty) => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        let is_date = name == EXCEL_DATE_TOKEN;
        if !is_date && name != EXCEL_DATETIME_TOKEN {
            return visitor.visit_newtype_struct(self);
        }
        match &self.node {
            RowNode::Value(CellValue::Number(serial)) => {
                let value = from_excel_serial(*serial, self.date_1904).ok_or_else(|| {
                    Error::invalid_value(Unexpected::Float(*serial), &"an Excel serial date")
                })?;
                let text = if is_date {
                    format_date(value.date())
                } else {
                    format_datetime(value)
                };
                visitor.visit_string(text)
            }
            RowNode::Value(CellValue::String(s)) => visitor.visit_str(s),
            _ => Err(self.invalid("a date")),
        }
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.node {
            RowNode::Array(items) => visitor.visit_seq(RowSeqAccess::new(items, self.date_1904)),
            RowNode::Null | RowNode::Value(CellValue::Empty) => {
                visitor.visit_seq(RowSeqAccess::new(Vec::new(), self.date_1904))
            }
            RowNode::Value(value) => {
                visitor.visit_seq(RowSeqAccess::new(vec![RowNode::Value(value)], self.date_1904))
            }
            RowNode::Object(_) => Err(self.invalid("a sequence")),
        }
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.node {
            RowNode::Object(fields) => visitor.visit_map(RowMapAccess::new(fields, self.date_1904)),
            RowNode::Null => visitor.visit_map(RowMapAccess::new(Vec::new(), self.date_1904)),
            _ => Err(self.invalid("a map")),
        }
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        match &self.node {
            RowNode::Value(CellValue::String(s)) => {
                let variant: StringDeserializer<Error> = s.trim().to_string().into_deserializer();
                visitor.visit_enum(variant)
            }
            _ => Err(self.invalid("a variant name")),
        }
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_string(visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }
}

struct RowMapAccess {
    fields: std::vec::IntoIter<(String, RowNode)>,
    value: Option<RowNode>,
    date_1904: bool,
}

impl RowMapAccess {
    fn new(fields: Vec<(String, RowNode)>, date_1904: bool) -> Self {
        Self {
            fields: fields.into_iter(),
            value: None,
            date_1904,
        }
    }
}

impl<'de> MapAccess<'de> for RowMapAccess {
    type Error = Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        match self.fields.next() {
            Some((name, node)) => {
                self.value = Some(node);
                let key: StringDeserializer<Error> = name.into_deserializer();
                seed.deserialize(key).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        let node = self.value.take().unwrap_or_default();
        seed.deserialize(RowDeserializer::new(node, self.date_1904))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.fields.len())
    }
}

struct RowSeqAccess {
    items: std::vec::IntoIter<RowNode>,
    date_1904: bool,
}

impl RowSeqAccess {
    fn new(items: Vec<RowNode>, date_1904: bool) -> Self {
        Self {
            items: items.into_iter(),
            date_1904,
        }
    }
}

impl<'de> SeqAccess<'de> for RowSeqAccess {
    type Error = Error;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>> {
        match self.items.next() {
            Some(node) => seed
                .deserialize(RowDeserializer::new(node, self.date_1904))
                .map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}
