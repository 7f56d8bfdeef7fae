//! Byte-order selection and fixed-width field packing.
//!
//! Every multi-byte integer in a SARC archive is encoded in the archive's own
//! declared order; there is no native default, so every call site supplies
//! one. On read the order is detected once from the raw bytes of the archive
//! header's byte-order mark, before any other field is decoded.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::error::{Error, Result};

/// Archive byte order. Selected per archive, never per field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Big,
    Little,
}

impl Order {
    /// Detect the order from the raw bytes of the byte-order mark field.
    ///
    /// The mark is written as the value 0xFEFF, so the raw pattern `FF FE`
    /// means the archive is little-endian; anything else is read as
    /// big-endian. The decoded mark is re-validated once the header is
    /// parsed under the detected order.
    pub fn detect(bom: [u8; 2]) -> Order {
        if bom == [0xFF, 0xFE] {
            Order::Little
        } else {
            Order::Big
        }
    }
}

fn bounds(buf: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    let end = offset.checked_add(len).ok_or(Error::TruncatedInput {
        expected: usize::MAX,
        actual: buf.len(),
    })?;
    buf.get(offset..end).ok_or(Error::TruncatedInput {
        expected: end,
        actual: buf.len(),
    })
}

/// Read a u16 at `offset`, bounds-checked.
pub fn read_u16(buf: &[u8], offset: usize, order: Order) -> Result<u16> {
    let bytes = bounds(buf, offset, 2)?;
    Ok(match order {
        Order::Big => BigEndian::read_u16(bytes),
        Order::Little => LittleEndian::read_u16(bytes),
    })
}

/// Read a u32 at `offset`, bounds-checked.
pub fn read_u32(buf: &[u8], offset: usize, order: Order) -> Result<u32> {
    let bytes = bounds(buf, offset, 4)?;
    Ok(match order {
        Order::Big => BigEndian::read_u32(bytes),
        Order::Little => LittleEndian::read_u32(bytes),
    })
}

/// Read a 4-byte signature at `offset`. Signatures are raw bytes and carry
/// no order dependency.
pub fn read_signature(buf: &[u8], offset: usize) -> Result<[u8; 4]> {
    let bytes = bounds(buf, offset, 4)?;
    Ok([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Append a u16 in the given order.
pub fn write_u16(out: &mut Vec<u8>, value: u16, order: Order) {
    let mut bytes = [0u8; 2];
    match order {
        Order::Big => BigEndian::write_u16(&mut bytes, value),
        Order::Little => LittleEndian::write_u16(&mut bytes, value),
    }
    out.extend_from_slice(&bytes);
}

/// Append a u32 in the given order.
pub fn write_u32(out: &mut Vec<u8>, value: u32, order: Order) {
    let mut bytes = [0u8; 4];
    match order {
        Order::Big => BigEndian::write_u32(&mut bytes, value),
        Order::Little => LittleEndian::write_u32(&mut bytes, value),
    }
    out.extend_from_slice(&bytes);
}

/// Append a 4-byte signature verbatim.
pub fn write_signature(out: &mut Vec<u8>, signature: &[u8; 4]) {
    out.extend_from_slice(signature);
}
