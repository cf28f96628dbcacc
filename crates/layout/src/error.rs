//! Layout codec error type.

use thiserror::Error;

use crate::schema::FieldType;

/// Errors raised by encoding, decoding, sizing and schema registration.
///
/// All of them are terminal for the operation that raised them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("unknown variant `{variant}` for enum `{type_name}`")]
    UnknownVariant { type_name: String, variant: String },
    #[error("unknown discriminant {tag} for enum `{type_name}`")]
    UnknownDiscriminant { type_name: String, tag: u8 },
    #[error("truncated input for `{type_name}`: needed {needed} bytes, {available} available")]
    TruncatedInput {
        type_name: String,
        needed: usize,
        available: usize,
    },
    #[error("missing field `{field}` in `{type_name}`")]
    MissingField { type_name: String, field: String },
    #[error("unknown field `{field}` in `{type_name}`")]
    UnknownField { type_name: String, field: String },
    #[error("field `{field}` of `{type_name}` is declared {expected}, got {found}")]
    FieldTypeMismatch {
        type_name: String,
        field: String,
        expected: FieldType,
        found: FieldType,
    },
    #[error("variant `{variant}` of `{type_name}` carries no payload")]
    UnexpectedPayload { type_name: String, variant: String },
    #[error("variant `{variant}` of `{type_name}` requires a payload")]
    MissingPayload { type_name: String, variant: String },
    #[error("`{type_name}` is a {expected} type")]
    KindMismatch {
        type_name: String,
        expected: &'static str,
    },
    #[error("{remaining} trailing bytes after `{type_name}`")]
    TrailingBytes { type_name: String, remaining: usize },
    #[error("unknown type `{0}`")]
    UnknownType(String),
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
}
