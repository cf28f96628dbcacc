//! Binding Rust types to layouts.
//!
//! Tagged unions are plain Rust enums: the variant set is closed and each
//! variant's discriminant is its index in the type's [`EnumSchema`]. A type
//! implements [`Layout`] by describing its schema and converting to and from
//! the dynamic [`Value`] form; the wire work is done by the generic codec.
//!
//! [`EnumSchema`]: crate::EnumSchema

use crate::codec::{decode, encode};
use crate::schema::Schema;
use crate::size_table::size_of;
use crate::value::Value;
use crate::LayoutError;

pub trait Layout: Sized {
    /// The wire layout of `Self`.
    fn schema() -> Schema;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, LayoutError>;
}

pub fn encode_typed<T: Layout>(value: &T) -> Result<Vec<u8>, LayoutError> {
    encode(&T::schema(), &value.to_value())
}

/// Decodes a `T` from the front of `data`, returning the remainder.
pub fn decode_typed<T: Layout>(data: &[u8]) -> Result<(T, &[u8]), LayoutError> {
    let (value, rest) = decode(&T::schema(), data)?;
    Ok((T::from_value(value)?, rest))
}

pub fn size_of_typed<T: Layout>(variant: Option<&str>) -> Result<usize, LayoutError> {
    size_of(&T::schema(), variant)
}
