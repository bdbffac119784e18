//! Schema generation from serde types

use std::fmt;
use std::sync::Arc;

use log::debug;
use serde::de::DeserializeOwned;
use serde_sheets_core::CellAddress;

use super::trace::trace;
use super::{
    Column, ColumnNameResolver, ColumnProperty, DataGrid, NullNameResolver, SpreadsheetSchema,
};
use crate::error::{Error, Result};
use crate::styles::StylesBuilder;

/// Builds a [`SpreadsheetSchema`] from a record type
///
/// The type's serde shape is traced through its `Deserialize` impl: fields
/// become columns in declaration order, nested structs are flattened under
/// their field name and sequences add an `[]` segment.
#[derive(Clone)]
pub struct SchemaGenerator {
    origin: CellAddress,
    styles_builder: StylesBuilder,
    resolver: Arc<dyn ColumnNameResolver>,
}

impl Default for SchemaGenerator {
    fn default() -> Self {
        Self {
            origin: CellAddress::A1,
            styles_builder: StylesBuilder::default(),
            resolver: Arc::new(NullNameResolver),
        }
    }
}

impl fmt::Debug for SchemaGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaGenerator")
            .field("origin", &self.origin)
            .field("styles_builder", &self.styles_builder)
            .finish_non_exhaustive()
    }
}

impl SchemaGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_origin(&self, origin: CellAddress) -> Self {
        Self {
            origin,
            ..self.clone()
        }
    }

    pub fn with_styles_builder(&self, styles_builder: StylesBuilder) -> Self {
        Self {
            styles_builder,
            ..self.clone()
        }
    }

    pub fn with_column_name_resolver<R>(&self, resolver: R) -> Self
    where
        R: ColumnNameResolver + 'static,
    {
        Self {
            resolver: Arc::new(resolver),
            ..self.clone()
        }
    }

    pub fn origin(&self) -> CellAddress {
        self.origin
    }

    pub fn styles_builder(&self) -> &StylesBuilder {
        &self.styles_builder
    }

    /// Generate the schema of `T`
    pub fn generate<T: DataGrid + DeserializeOwned>(&self) -> Result<SpreadsheetSchema> {
        let type_name = std::any::type_name::<T>();
        let invalid = |problem: Error| Error::InvalidDefinition {
            type_name: type_name.to_string(),
            problem: problem.to_string(),
        };

        let grid = T::grid();
        let mut columns = Vec::new();
        for traced in trace::<T>().map_err(invalid)? {
            let pointer = traced.property_pointer();
            let property = ColumnProperty {
                name: traced.name.clone(),
                options: T::column(&pointer).with_defaults(&grid),
                pointer,
                value_type: traced.value_type,
            };
            let mut options = property.options.clone();
            if let Some(name) = self.resolver.resolve(&property).map_err(invalid)? {
                options = options.with_name(name);
            }
            let array = traced.is_array();
            let column = Column::new(traced.pointer, options, traced.value_type, array);
            debug!("Generated column {} for {}", column, type_name);
            columns.push(column);
        }

        Ok(SpreadsheetSchema::new(
            columns,
            self.styles_builder.clone(),
            self.origin,
        ))
    }
}
