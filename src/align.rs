//! Data-region alignment.
//!
//! BFLIM image payloads end in a 0x28-byte footer that declares the memory
//! alignment the image must be loaded at. The builder sniffs the trailing
//! bytes of every payload and inserts zero padding ahead of matching ones so
//! their data-region offset satisfies the declared alignment. This is a
//! content heuristic, not a format field: a payload that fails the tag or
//! length check simply gets no padding, never an error.

use crate::order::{self, Order};

/// Total footer length, measured from the end of the payload.
const FOOTER_LEN: usize = 0x28;
/// Footer tag at `[-0x28, -0x24)`.
const FOOTER_MAGIC: &[u8; 4] = b"FLIM";
/// Relative offset (from the end) of the u32 that must equal the payload's
/// total length for the footer to be trusted.
const FOOTER_SIZE_POS: usize = 0x1C;
/// Relative offset (from the end) of the u16 alignment field.
const FOOTER_ALIGN_POS: usize = 0x8;

/// Round `value` up to the next multiple of `alignment`.
///
/// An alignment of zero is treated as one; a malformed footer must not be
/// able to cause a division by zero.
pub fn align_up(value: usize, alignment: usize) -> usize {
    let alignment = alignment.max(1);
    value.div_ceil(alignment) * alignment
}

/// Zero-padding bytes required before `payload` when the data region is
/// currently `offset` bytes long.
pub fn padding_for(payload: &[u8], offset: usize, order: Order) -> usize {
    match footer_alignment(payload, order) {
        Some(alignment) => align_up(offset, alignment) - offset,
        None => 0,
    }
}

/// Alignment declared by a BFLIM footer, if the payload carries one.
///
/// The footer is trusted only when the tag matches and the embedded total
/// size equals the payload's actual length, both read in the archive's order.
fn footer_alignment(payload: &[u8], order: Order) -> Option<usize> {
    let len = payload.len();
    if len < FOOTER_LEN {
        return None;
    }
    if &payload[len - FOOTER_LEN..len - FOOTER_LEN + 4] != FOOTER_MAGIC {
        return None;
    }
    let declared = order::read_u32(payload, len - FOOTER_SIZE_POS, order).ok()?;
    if declared as usize != len {
        return None;
    }
    let alignment = order::read_u16(payload, len - FOOTER_ALIGN_POS, order).ok()?;
    Some(alignment as usize)
}
