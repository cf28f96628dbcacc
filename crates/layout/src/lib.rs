//! Schema-driven fixed-layout binary codec.
//!
//! Values are described by explicit [`Schema`] objects: structs are ordered
//! lists of fixed-width little-endian unsigned integers, enums are tagged
//! unions whose one-byte discriminant is the variant's declaration index.
//! Nothing carries a length prefix and nothing is padded, so the encoded
//! length of every struct and variant is known from the schema alone.
//!
//! # Overview
//!
//! - [`schema`] - struct/enum layouts and the [`SchemaSet`] registry
//! - [`value`] - dynamic values matching a schema
//! - [`codec`] - [`encode`], [`decode`] and their stateful encoder/decoder
//! - [`size_table`] - [`size_of`] and the precomputed [`SizeTable`]
//! - [`typed`] - the [`Layout`] trait binding Rust types to schemas
//! - [`programs`] - layouts of known on-chain programs
//!
//! # Example
//!
//! ```
//! use solwire_layout::{decode, encode, size_of, EnumSchema, EnumValue, FieldType, Schema, StructValue, Value};
//!
//! let schema = Schema::Enum(
//!     EnumSchema::new("Instruction")
//!         .unit("HelloWorld")
//!         .variant("IncrementNumber", [("amount", FieldType::U64)]),
//! );
//! let value = Value::Enum(EnumValue::with_payload(
//!     "IncrementNumber",
//!     StructValue::new().with("amount", 1337u64),
//! ));
//!
//! let bytes = encode(&schema, &value).unwrap();
//! assert_eq!(bytes, vec![0x01, 0x39, 0x05, 0, 0, 0, 0, 0, 0]);
//! assert_eq!(size_of(&schema, Some("IncrementNumber")).unwrap(), bytes.len());
//!
//! let (decoded, rest) = decode(&schema, &bytes).unwrap();
//! assert_eq!(decoded, value);
//! assert!(rest.is_empty());
//! ```

mod error;

pub mod codec;
pub mod programs;
pub mod schema;
pub mod size_table;
pub mod typed;
pub mod value;

pub use codec::{decode, decode_exact, encode, encode_into, LayoutDecoder, LayoutEncoder};
pub use error::LayoutError;
pub use schema::{EnumSchema, FieldDef, FieldType, Schema, SchemaSet, StructSchema, VariantDef};
pub use size_table::{size_of, SizeTable};
pub use typed::{decode_typed, encode_typed, size_of_typed, Layout};
pub use value::{EnumValue, Primitive, PrimitiveType, StructValue, Value};
