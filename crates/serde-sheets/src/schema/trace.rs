//! Shape tracing
//!
//! Drives a type's `Deserialize` impl with a deserializer that answers every
//! request with a placeholder value and records where the leaves are. Struct
//! fields become pointer segments and sequences add `[]`.

use serde::de::value::StrDeserializer;
use serde::de::{
    self, DeserializeOwned, DeserializeSeed, EnumAccess, IntoDeserializer, MapAccess, SeqAccess,
    VariantAccess, Visitor,
};

use super::{ColumnPointer, ColumnType};
use crate::date::{EXCEL_DATETIME_TOKEN, EXCEL_DATE_TOKEN};
use crate::error::{Error, Result};

/// Nesting limit for recursive types
const MAX_DEPTH: usize = 64;

const PLACEHOLDER_DATE: &str = "1970-01-01";

/// A leaf found while tracing
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TracedColumn {
    /// Name of the field holding the leaf
    pub name: String,
    /// Leaf pointer; ends with `[]` for a sequence of scalars
    pub pointer: ColumnPointer,
    pub value_type: ColumnType,
}

impl TracedColumn {
    pub fn is_array(&self) -> bool {
        self.pointer.name() == "[]"
    }

    /// Pointer of the field itself, without a trailing `[]`
    pub fn property_pointer(&self) -> ColumnPointer {
        if self.is_array() {
            self.pointer.parent()
        } else {
            self.pointer.clone()
        }
    }
}

/// Trace the leaves of `T` in declaration order
pub(crate) fn trace<T: DeserializeOwned>() -> Result<Vec<TracedColumn>> {
    let mut columns = Vec::new();
    T::deserialize(Tracer {
        columns: &mut columns,
        pointer: ColumnPointer::empty(),
        name: String::new(),
        depth: 0,
    })?;
    Ok(columns)
}

struct Tracer<'t> {
    columns: &'t mut Vec<TracedColumn>,
    pointer: ColumnPointer,
    name: String,
    depth: usize,
}

impl<'t> Tracer<'t> {
    fn is_root(&self) -> bool {
        self.depth == 0
    }

    fn leaf(self, value_type: ColumnType) -> Result<()> {
        if self.is_root() {
            return Err(Error::message("Root type of a schema MUST be a struct"));
        }
        if !self.columns.iter().any(|c| c.pointer == self.pointer) {
            self.columns.push(TracedColumn {
                name: self.name,
                pointer: self.pointer,
                value_type,
            });
        }
        Ok(())
    }

    fn sequence(self, len: usize) -> Result<SeqTracer<'t>> {
        if self.is_root() {
            return Err(Error::message(
                "Root type of a schema can NOT be a Collection or array type",
            ));
        }
        self.check_depth()?;
        Ok(SeqTracer {
            columns: self.columns,
            pointer: self.pointer.resolve_array(),
            name: self.name,
            depth: self.depth + 1,
            remaining: len,
        })
    }

    fn check_depth(&self) -> Result<()> {
        if self.depth >= MAX_DEPTH {
            return Err(Error::message(format!(
                "Recursive type nested deeper than {} levels at '{}'",
                MAX_DEPTH, self.pointer
            )));
        }
        Ok(())
    }
}

macro_rules! trace_leaf {
    ($($method:ident => $value_type:expr, $visit:ident($($value:expr)?);)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
                self.leaf($value_type)?;
                visitor.$visit($($value)?)
            }
        )*
    };
}

impl<'de, 't> de::Deserializer<'de> for Tracer<'t> {
    type Error = Error;

    trace_leaf! {
        deserialize_bool => ColumnType::Boolean, visit_bool(false);
        deserialize_i8 => ColumnType::Integer, visit_i8(0);
        deserialize_i16 => ColumnType::Integer, visit_i16(0);
        deserialize_i32 => ColumnType::Integer, visit_i32(0);
        deserialize_i64 => ColumnType::Integer, visit_i64(0);
        deserialize_i128 => ColumnType::Integer, visit_i128(0);
        deserialize_u8 => ColumnType::Integer, visit_u8(0);
        deserialize_u16 => ColumnType::Integer, visit_u16(0);
        deserialize_u32 => ColumnType::Integer, visit_u32(0);
        deserialize_u64 => ColumnType::Integer, visit_u64(0);
        deserialize_u128 => ColumnType::Integer, visit_u128(0);
        deserialize_f32 => ColumnType::Float, visit_f32(0.0);
        deserialize_f64 => ColumnType::Float, visit_f64(0.0);
        deserialize_char => ColumnType::Text, visit_char(' ');
        deserialize_str => ColumnType::Text, visit_str("");
        deserialize_string => ColumnType::Text, visit_string(String::new());
        deserialize_unit => ColumnType::Any, visit_unit();
        deserialize_any => ColumnType::Any, visit_unit();
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::UnsupportedType("bytes".into()))
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::UnsupportedType("bytes".into()))
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_some(self)
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        self.leaf(ColumnType::Any)?;
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        match name {
            EXCEL_DATE_TOKEN => {
                self.leaf(ColumnType::Date)?;
                visitor.visit_str(PLACEHOLDER_DATE)
            }
            EXCEL_DATETIME_TOKEN => {
                self.leaf(ColumnType::DateTime)?;
                visitor.visit_str(PLACEHOLDER_DATE)
            }
            _ => visitor.visit_newtype_struct(self),
        }
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_seq(self.sequence(1)?)
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        visitor.visit_seq(self.sequence(len)?)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_seq(self.sequence(len)?)
    }

    fn deserialize_map<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::UnsupportedType("map".into()))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        self.check_depth()?;
        visitor.visit_map(StructTracer {
            columns: self.columns,
            pointer: self.pointer,
            depth: self.depth + 1,
            fields: fields.iter(),
            current: None,
        })
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        let first = variants
            .first()
            .copied()
            .ok_or_else(|| Error::UnsupportedType("enum without variants".into()))?;
        self.leaf(ColumnType::Text)?;
        visitor.visit_enum(UnitVariantTracer(first))
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }
}

struct StructTracer<'t> {
    columns: &'t mut Vec<TracedColumn>,
    pointer: ColumnPointer,
    depth: usize,
    fields: std::slice::Iter<'static, &'static str>,
    current: Option<&'static str>,
}

impl<'de, 't> MapAccess<'de> for StructTracer<'t> {
    type Error = Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        match self.fields.next() {
            Some(field) => {
                self.current = Some(field);
                let key: StrDeserializer<'_, Error> = field.into_deserializer();
                seed.deserialize(key).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        let field = self.current.take().unwrap_or_default();
        seed.deserialize(Tracer {
            columns: &mut *self.columns,
            pointer: self.pointer.resolve(field),
            name: field.to_string(),
            depth: self.depth,
        })
    }
}

struct SeqTracer<'t> {
    columns: &'t mut Vec<TracedColumn>,
    pointer: ColumnPointer,
    name: String,
    depth: usize,
    remaining: usize,
}

impl<'de, 't> SeqAccess<'de> for SeqTracer<'t> {
    type Error = Error;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        seed.deserialize(Tracer {
            columns: &mut *self.columns,
            pointer: self.pointer.clone(),
            name: self.name.clone(),
            depth: self.depth,
        })
        .map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

/// Picks the first variant; only unit variants can be traced
struct UnitVariantTracer(&'static str);

impl<'de> EnumAccess<'de> for UnitVariantTracer {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, Self)> {
        let key: StrDeserializer<'_, Error> = self.0.into_deserializer();
        Ok((seed.deserialize(key)?, self))
    }
}

impl<'de> VariantAccess<'de> for UnitVariantTracer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        Ok(())
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, _seed: T) -> Result<T::Value> {
        Err(self.data_variant())
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, _visitor: V) -> Result<V::Value> {
        Err(self.data_variant())
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value> {
        Err(self.data_variant())
    }
}

impl UnitVariantTracer {
    fn data_variant(&self) -> Error {
        Error::UnsupportedType(format!("enum variant `{}` with data", self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::ExcelDate;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use std::collections::HashMap;

    fn paths<T: DeserializeOwned>() -> Vec<(String, ColumnType)> {
        trace::<T>()
            .unwrap()
            .into_iter()
            .map(|c| (c.pointer.to_string(), c.value_type))
            .collect()
    }

    #[derive(Deserialize)]
    #[allow(dead_code)]
    struct Inner {
        b: i32,
        c: Option<String>,
    }

    #[derive(Deserialize)]
    #[allow(dead_code)]
    enum Kind {
        Small,
        Large,
    }

    #[derive(Deserialize)]
    #[allow(dead_code)]
    struct Outer {
        a: f64,
        inner: Inner,
        tags: Vec<String>,
        items: Vec<Inner>,
        kind: Kind,
        day: ExcelDate,
        flag: bool,
    }

    #[test]
    fn test_flattening() {
        assert_eq!(
            paths::<Outer>(),
            vec![
                ("a".to_string(), ColumnType::Float),
                ("inner/b".to_string(), ColumnType::Integer),
                ("inner/c".to_string(), ColumnType::Text),
                ("tags/[]".to_string(), ColumnType::Text),
                ("items/[]/b".to_string(), ColumnType::Integer),
                ("items/[]/c".to_string(), ColumnType::Text),
                ("kind".to_string(), ColumnType::Text),
                ("day".to_string(), ColumnType::Date),
                ("flag".to_string(), ColumnType::Boolean),
            ]
        );
    }

    #[test]
    fn test_array_property_pointer() {
        let columns = trace::<Outer>().unwrap();
        let tags = &columns[3];
        assert!(tags.is_array());
        assert_eq!(tags.name, "tags");
        assert_eq!(tags.property_pointer().to_string(), "tags");
    }

    #[test]
    fn test_tuple_elements_share_a_column() {
        #[derive(Deserialize)]
        #[allow(dead_code)]
        struct Pair {
            pair: (i32, i32),
        }
        assert_eq!(paths::<Pair>(), vec![("pair/[]".to_string(), ColumnType::Integer)]);
    }

    #[test]
    fn test_rejects_maps_and_roots() {
        #[derive(Deserialize)]
        #[allow(dead_code)]
        struct WithMap {
            m: HashMap<String, i32>,
        }
        assert_eq!(
            trace::<WithMap>().unwrap_err().to_string(),
            "Unsupported type: map"
        );
        assert_eq!(
            trace::<Vec<Inner>>().unwrap_err().to_string(),
            "Root type of a schema can NOT be a Collection or array type"
        );
        assert!(trace::<i32>().is_err());
    }

    #[test]
    fn test_recursion_limit() {
        #[derive(Deserialize)]
        #[allow(dead_code)]
        struct Node {
            value: i32,
            next: Option<Box<Node>>,
        }
        let err = trace::<Node>().unwrap_err();
        assert!(err.to_string().starts_with("Recursive type nested deeper than"));
    }
}
