//! Writer/Reader little-endian roundtrip matrix for the buffers crate.

use solwire_buffers::{BufferError, Reader, Writer};

#[test]
fn roundtrip_unsigned_widths() {
    let mut w = Writer::new();
    w.u8(u8::MAX);
    w.u16(0x0102);
    w.u32(u32::MAX);
    w.u64(0x0102_0304_0506_0708);
    w.u128(u128::MAX - 1);
    let data = w.flush();
    assert_eq!(data.len(), 1 + 2 + 4 + 8 + 16);

    let mut r = Reader::new(&data);
    assert_eq!(r.u8(), Ok(u8::MAX));
    assert_eq!(r.u16(), Ok(0x0102));
    assert_eq!(r.u32(), Ok(u32::MAX));
    assert_eq!(r.u64(), Ok(0x0102_0304_0506_0708));
    assert_eq!(r.u128(), Ok(u128::MAX - 1));
    assert_eq!(r.size(), 0);
}

#[test]
fn little_endian_byte_order() {
    let mut w = Writer::new();
    w.u32(0x0102_0304);
    assert_eq!(w.flush(), vec![0x04, 0x03, 0x02, 0x01]);
}

#[test]
fn truncated_reads_report_needed_and_available() {
    let data = [0u8; 7];
    let mut r = Reader::new(&data);
    assert_eq!(
        r.u64(),
        Err(BufferError::EndOfBuffer {
            needed: 8,
            available: 7
        })
    );
    assert_eq!(r.buf(7).map(<[u8]>::len), Ok(7));
    assert!(matches!(r.peek(), Err(BufferError::EndOfBuffer { .. })));
}

#[test]
fn sequential_records_share_one_buffer() {
    let mut w = Writer::with_capacity(16);
    w.u64(1);
    w.u64(2);
    let data = w.flush();

    let mut r = Reader::new(&data);
    assert_eq!(r.u64(), Ok(1));
    let rest = r.remainder();
    assert_eq!(rest.len(), 8);

    let mut r2 = Reader::new(rest);
    assert_eq!(r2.u64(), Ok(2));
    assert!(r2.remainder().is_empty());
}

#[test]
fn from_slice_clamps_bounds() {
    let data = [1u8, 2, 3];
    let r = Reader::from_slice(&data, 5, 10);
    assert_eq!(r.size(), 0);
    assert!(r.remainder().is_empty());
}
