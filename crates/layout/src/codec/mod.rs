//! Layout encoder and decoder.
//!
//! Wire format: fixed-width little-endian unsigned integers in declaration
//! order, no padding, no length prefixes. Enums write one discriminant byte
//! (the variant's declaration index) immediately followed by the payload.

mod decode;
mod encode;

pub use decode::{decode, decode_exact, LayoutDecoder};
pub use encode::{encode, encode_into, encoded_len, LayoutEncoder};
