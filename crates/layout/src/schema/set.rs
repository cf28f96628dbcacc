//! Explicit schema registry.

use indexmap::IndexMap;

use super::Schema;
use crate::LayoutError;

/// A set of schemas keyed by type name, in registration order.
///
/// Serialized as a plain JSON array of schemas, which is also the format of
/// registry files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaSet {
    types: IndexMap<String, Schema>,
}

impl SchemaSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set, validating every schema.
    pub fn from_schemas<I>(schemas: I) -> Result<Self, LayoutError>
    where
        I: IntoIterator<Item = Schema>,
    {
        let mut set = Self::new();
        for schema in schemas {
            set.insert(schema)?;
        }
        Ok(set)
    }

    /// Parses a JSON array of schemas.
    pub fn from_json_str(json: &str) -> Result<Self, LayoutError> {
        let schemas: Vec<Schema> =
            serde_json::from_str(json).map_err(|e| LayoutError::InvalidSchema(e.to_string()))?;
        Self::from_schemas(schemas)
    }

    /// Serializes the set back to its JSON array form.
    pub fn to_json_string_pretty(&self) -> Result<String, LayoutError> {
        let schemas: Vec<&Schema> = self.types.values().collect();
        serde_json::to_string_pretty(&schemas).map_err(|e| LayoutError::InvalidSchema(e.to_string()))
    }

    /// Registers a schema. Type names must be unique.
    pub fn insert(&mut self, schema: Schema) -> Result<(), LayoutError> {
        schema.validate()?;
        if self.types.contains_key(schema.name()) {
            return Err(LayoutError::InvalidSchema(format!(
                "duplicate type `{}`",
                schema.name()
            )));
        }
        self.types.insert(schema.name().to_owned(), schema);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Schema, LayoutError> {
        self.types
            .get(name)
            .ok_or_else(|| LayoutError::UnknownType(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Schema> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
