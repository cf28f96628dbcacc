//! Binary buffer utilities for solwire layouts.
//!
//! This crate provides the byte-level primitives the layout codec is built on:
//! a cursor [`Reader`] over borrowed input and a pre-sized [`Writer`] for
//! output. All multi-byte integers are little-endian.
//!
//! # Overview
//!
//! - [`Reader`] - Reads fixed-width integers from a byte slice with cursor tracking
//! - [`Writer`] - Writes fixed-width integers into a single contiguous buffer
//!
//! # Example
//!
//! ```
//! use solwire_buffers::{Reader, Writer};
//!
//! let mut writer = Writer::with_capacity(3);
//! writer.u8(0x01);
//! writer.u16(0x0203);
//! let data = writer.flush();
//! assert_eq!(data, vec![0x01, 0x03, 0x02]);
//!
//! let mut reader = Reader::new(&data);
//! assert_eq!(reader.u8().unwrap(), 0x01);
//! assert_eq!(reader.u16().unwrap(), 0x0203);
//! assert!(reader.remainder().is_empty());
//! ```

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

use thiserror::Error;

/// Error type for buffer operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Attempted to read past the end of the buffer.
    #[error("end of buffer: needed {needed} bytes, {available} available")]
    EndOfBuffer { needed: usize, available: usize },
}
