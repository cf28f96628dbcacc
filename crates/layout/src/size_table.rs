//! Exact encoded sizes computed from schemas alone.
//!
//! Every size here must equal the length [`encode`](crate::encode) produces
//! for a value of the same type and variant. Callers use them to allocate
//! storage without building a value first.

use indexmap::IndexMap;

use crate::schema::{EnumSchema, FieldDef, Schema, SchemaSet, VariantDef};
use crate::LayoutError;

/// Width of the tagged-union discriminant.
pub const DISCRIMINANT_SIZE: usize = 1;

/// Sum of field widths.
pub fn fields_size(fields: &[FieldDef]) -> usize {
    fields.iter().map(|f| f.ty.width()).sum()
}

/// Discriminant plus payload width.
pub fn variant_size(variant: &VariantDef) -> usize {
    DISCRIMINANT_SIZE + variant.payload.as_deref().map_or(0, fields_size)
}

/// Largest variant size of an enum; 0 for an enum with no variants.
pub fn max_variant_size(e: &EnumSchema) -> usize {
    e.variants.iter().map(variant_size).max().unwrap_or(0)
}

/// Exact byte length of an encoding of `schema`.
///
/// For enums `variant` selects the variant; with `None` the size of the
/// largest variant is returned. `variant` is ignored for structs.
pub fn size_of(schema: &Schema, variant: Option<&str>) -> Result<usize, LayoutError> {
    match schema {
        Schema::Struct(s) => Ok(fields_size(&s.fields)),
        Schema::Enum(e) => match variant {
            Some(name) => e.find_variant(name).map(|(_, v)| variant_size(v)),
            None => Ok(max_variant_size(e)),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TypeSizes {
    Struct(usize),
    Enum {
        variants: IndexMap<String, usize>,
        max: usize,
    },
}

/// Precomputed sizes for every type and variant of a [`SchemaSet`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeTable {
    types: IndexMap<String, TypeSizes>,
}

impl SizeTable {
    pub fn build(set: &SchemaSet) -> Self {
        let types = set
            .iter()
            .map(|schema| {
                let sizes = match schema {
                    Schema::Struct(s) => TypeSizes::Struct(fields_size(&s.fields)),
                    Schema::Enum(e) => TypeSizes::Enum {
                        variants: e
                            .variants
                            .iter()
                            .map(|v| (v.name.clone(), variant_size(v)))
                            .collect(),
                        max: max_variant_size(e),
                    },
                };
                (schema.name().to_owned(), sizes)
            })
            .collect();
        Self { types }
    }

    /// Same contract as [`size_of`], looked up by type name.
    pub fn size_of(&self, type_name: &str, variant: Option<&str>) -> Result<usize, LayoutError> {
        match self.types.get(type_name) {
            None => Err(LayoutError::UnknownType(type_name.to_owned())),
            Some(TypeSizes::Struct(size)) => Ok(*size),
            Some(TypeSizes::Enum { variants, max }) => match variant {
                None => Ok(*max),
                Some(name) => variants.get(name).copied().ok_or_else(|| {
                    LayoutError::UnknownVariant {
                        type_name: type_name.to_owned(),
                        variant: name.to_owned(),
                    }
                }),
            },
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
