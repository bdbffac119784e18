//! Column name resolvers

use std::fmt;
use std::marker::PhantomData;

use super::{ColumnOptions, ColumnPointer, ColumnType};
use crate::error::{Error, Result};

/// A leaf field seen by the schema generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnProperty {
    /// Field name as serialized
    pub name: String,
    /// Pointer of the field; sequences of scalars leave out the trailing `[]`
    pub pointer: ColumnPointer,
    pub value_type: ColumnType,
    /// Options from [`DataGrid`](super::DataGrid), grid defaults applied
    pub options: ColumnOptions,
}

/// Chooses header names while a schema is generated
///
/// `Ok(None)` keeps the name from the column options. Closures of type
/// `Fn(&ColumnProperty) -> Option<String>` are resolvers too.
pub trait ColumnNameResolver: Send + Sync {
    fn resolve(&self, property: &ColumnProperty) -> Result<Option<String>>;
}

impl<F> ColumnNameResolver for F
where
    F: Fn(&ColumnProperty) -> Option<String> + Send + Sync,
{
    fn resolve(&self, property: &ColumnProperty) -> Result<Option<String>> {
        Ok(self(property))
    }
}

/// Resolves nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNameResolver;

impl ColumnNameResolver for NullNameResolver {
    fn resolve(&self, _property: &ColumnProperty) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Names columns from a per-field value, failing when a field has none
///
/// `lookup` plays the part of reading an annotation off the field and
/// `mapper` turns the value into the header text.
///
/// ```rust
/// use serde_sheets::schema::{AnnotatedNameResolver, ColumnProperty};
///
/// #[derive(Clone, Copy)]
/// enum Code { A, B }
///
/// let resolver = AnnotatedNameResolver::new(
///     "NameOf",
///     |p: &ColumnProperty| match p.name.as_str() {
///         "a" => Some(Code::A),
///         "b" => Some(Code::B),
///         _ => None,
///     },
///     |code: Code| match code {
///         Code::A => "Code A".to_string(),
///         Code::B => "Code B".to_string(),
///     },
/// );
/// # let _ = resolver;
/// ```
pub struct AnnotatedNameResolver<A, L, M> {
    label: String,
    lookup: L,
    mapper: M,
    _marker: PhantomData<fn() -> A>,
}

impl<A, L, M> AnnotatedNameResolver<A, L, M>
where
    L: Fn(&ColumnProperty) -> Option<A> + Send + Sync,
    M: Fn(A) -> String + Send + Sync,
{
    pub fn new<S: Into<String>>(label: S, lookup: L, mapper: M) -> Self {
        Self {
            label: label.into(),
            lookup,
            mapper,
            _marker: PhantomData,
        }
    }
}

impl<A, L, M> ColumnNameResolver for AnnotatedNameResolver<A, L, M>
where
    L: Fn(&ColumnProperty) -> Option<A> + Send + Sync,
    M: Fn(A) -> String + Send + Sync,
{
    fn resolve(&self, property: &ColumnProperty) -> Result<Option<String>> {
        match (self.lookup)(property) {
            Some(value) => Ok(Some((self.mapper)(value))),
            None => Err(Error::message(format!(
                "Annotation `{}` must not be null for property '{}'",
                self.label, property.name
            ))),
        }
    }
}

impl<A, L, M> fmt::Debug for AnnotatedNameResolver<A, L, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotatedNameResolver")
            .field("label", &self.label)
            .finish()
    }
}
