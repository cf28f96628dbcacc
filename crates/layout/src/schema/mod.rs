//! Struct and tagged-union layouts.
//!
//! A schema is the whole wire contract: field order is the byte order of the
//! encoding, and a variant's position in [`EnumSchema::variants`] is its
//! discriminant byte. Schemas are plain immutable data, built once and passed
//! explicitly to the codec.

mod set;

pub use set::SchemaSet;

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::LayoutError;

/// Largest number of variants a one-byte discriminant can address.
pub const MAX_VARIANTS: usize = u8::MAX as usize + 1;

/// Fixed-width unsigned integer field type. Always encoded little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    U8,
    U16,
    U32,
    U64,
    U128,
}

impl FieldType {
    /// Encoded width in bytes.
    pub const fn width(self) -> usize {
        match self {
            FieldType::U8 => 1,
            FieldType::U16 => 2,
            FieldType::U32 => 4,
            FieldType::U64 => 8,
            FieldType::U128 => 16,
        }
    }

    /// Lowercase name used in registry JSON (`"u8"`..`"u128"`).
    pub const fn name(self) -> &'static str {
        match self {
            FieldType::U8 => "u8",
            FieldType::U16 => "u16",
            FieldType::U32 => "u32",
            FieldType::U64 => "u64",
            FieldType::U128 => "u128",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: FieldType,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// An ordered, fixed list of fields with no padding between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructSchema {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

impl StructSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field after all previously declared ones.
    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.push(FieldDef::new(name, ty));
        self
    }
}

/// A tagged-union variant. `payload` is `None` for tag-only variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantDef {
    pub name: String,
    #[serde(
        rename = "fields",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub payload: Option<Vec<FieldDef>>,
}

impl VariantDef {
    pub fn unit(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: None,
        }
    }

    pub fn with_fields(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.into(),
            payload: Some(fields),
        }
    }

    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }
}

/// An ordered list of variants; the discriminant is the declaration index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumSchema {
    pub name: String,
    pub variants: Vec<VariantDef>,
}

impl EnumSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variants: Vec::new(),
        }
    }

    /// Declares a variant without payload.
    pub fn unit(mut self, name: impl Into<String>) -> Self {
        self.variants.push(VariantDef::unit(name));
        self
    }

    /// Declares a variant carrying the given fields.
    pub fn variant<I, N>(mut self, name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (N, FieldType)>,
        N: Into<String>,
    {
        let fields = fields
            .into_iter()
            .map(|(field, ty)| FieldDef::new(field, ty))
            .collect();
        self.variants.push(VariantDef::with_fields(name, fields));
        self
    }

    /// Discriminant of the variant called `name`.
    pub fn variant_index(&self, name: &str) -> Option<u8> {
        self.variants
            .iter()
            .position(|v| v.name == name)
            .and_then(|i| u8::try_from(i).ok())
    }

    /// Variant declared at discriminant `tag`.
    pub fn variant_at(&self, tag: u8) -> Option<&VariantDef> {
        self.variants.get(tag as usize)
    }

    /// Looks a variant up by name together with its discriminant.
    pub fn find_variant(&self, name: &str) -> Result<(u8, &VariantDef), LayoutError> {
        self.variant_index(name)
            .map(|tag| (tag, &self.variants[tag as usize]))
            .ok_or_else(|| LayoutError::UnknownVariant {
                type_name: self.name.clone(),
                variant: name.to_owned(),
            })
    }
}

/// Any registrable layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Schema {
    Struct(StructSchema),
    Enum(EnumSchema),
}

impl Schema {
    pub fn name(&self) -> &str {
        match self {
            Schema::Struct(s) => &s.name,
            Schema::Enum(e) => &e.name,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Schema::Struct(_) => "struct",
            Schema::Enum(_) => "enum",
        }
    }

    /// Checks the declaration itself: unique field and variant names, and
    /// no more variants than one discriminant byte can tell apart.
    pub fn validate(&self) -> Result<(), LayoutError> {
        match self {
            Schema::Struct(s) => check_fields(&s.name, &s.fields),
            Schema::Enum(e) => {
                if e.variants.len() > MAX_VARIANTS {
                    return Err(LayoutError::InvalidSchema(format!(
                        "enum `{}` declares {} variants, at most {MAX_VARIANTS} fit a one-byte discriminant",
                        e.name,
                        e.variants.len()
                    )));
                }
                let mut seen = HashSet::new();
                for variant in &e.variants {
                    if !seen.insert(variant.name.as_str()) {
                        return Err(LayoutError::InvalidSchema(format!(
                            "duplicate variant `{}` in `{}`",
                            variant.name, e.name
                        )));
                    }
                    if let Some(fields) = &variant.payload {
                        check_fields(&format!("{}::{}", e.name, variant.name), fields)?;
                    }
                }
                Ok(())
            }
        }
    }
}

impl From<StructSchema> for Schema {
    fn from(s: StructSchema) -> Self {
        Schema::Struct(s)
    }
}

impl From<EnumSchema> for Schema {
    fn from(e: EnumSchema) -> Self {
        Schema::Enum(e)
    }
}

fn check_fields(owner: &str, fields: &[FieldDef]) -> Result<(), LayoutError> {
    let mut seen = HashSet::new();
    for field in fields {
        if !seen.insert(field.name.as_str()) {
            return Err(LayoutError::InvalidSchema(format!(
                "duplicate field `{}` in `{owner}`",
                field.name
            )));
        }
    }
    Ok(())
}
