//! Fixed-size header records: archive header, FAT header, FNT header.
//!
//! Each block is self-describing: a 4-byte signature followed by a 16-bit
//! header-size field that must equal the block's fixed structure size.
//! Validation runs immediately after parsing and aborts the whole read on
//! the first mismatch — there is no best-effort parse.
//!
//! # On-disk layout
//! ```text
//! SARC  header_size  bom  file_size  data_offset  version  reserved   (0x14)
//! SFAT  header_size  file_count  hash_key                             (0x0C)
//! SFNT  header_size  reserved                                         (0x08)
//! ```

use crate::error::{Error, Result};
use crate::order::{self, Order};

pub const ARCHIVE_HEADER_SIZE: usize = 0x14;
pub const FAT_HEADER_SIZE: usize = 0x0C;
pub const FNT_HEADER_SIZE: usize = 0x08;

pub const ARCHIVE_SIGNATURE: &[u8; 4] = b"SARC";
pub const FAT_SIGNATURE: &[u8; 4] = b"SFAT";
pub const FNT_SIGNATURE: &[u8; 4] = b"SFNT";

/// The only supported archive version.
pub const ARCHIVE_VERSION: u16 = 0x0100;
/// Byte-order mark value, written in the archive's own order.
pub const BYTE_ORDER_MARK: u16 = 0xFEFF;
/// Hard ceiling on directory entries, fixed by the format.
pub const MAX_FILE_COUNT: usize = 0x3FFF;

/// Shared signature/size validation for all block headers.
fn check_block(
    block: &'static str,
    expected_signature: &[u8; 4],
    signature: [u8; 4],
    expected_size: u16,
    size: u16,
) -> Result<()> {
    if signature != *expected_signature {
        return Err(Error::InvalidSignature {
            block,
            expected: *expected_signature,
            actual: signature,
        });
    }
    if size != expected_size {
        return Err(Error::InvalidHeaderSize {
            block,
            expected: expected_size,
            actual: size,
        });
    }
    Ok(())
}

// ── Archive header ───────────────────────────────────────────────────────────

/// The top-level "SARC" block.
///
/// Only `file_size` and `data_offset` vary between archives; the signature,
/// header size, byte-order mark and version are fixed constants that are
/// validated on read and emitted on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveHeader {
    /// Total archive length in bytes. Written last during a build.
    pub file_size: u32,
    /// Absolute offset where the data region begins.
    pub data_offset: u32,
}

impl ArchiveHeader {
    pub fn parse(buf: &[u8], offset: usize, order: Order) -> Result<ArchiveHeader> {
        let signature = order::read_signature(buf, offset)?;
        let header_size = order::read_u16(buf, offset + 4, order)?;
        check_block(
            "SARC",
            ARCHIVE_SIGNATURE,
            signature,
            ARCHIVE_HEADER_SIZE as u16,
            header_size,
        )?;

        let bom = order::read_u16(buf, offset + 6, order)?;
        if bom != BYTE_ORDER_MARK {
            return Err(Error::InvalidByteOrderMark { actual: bom });
        }

        let file_size = order::read_u32(buf, offset + 8, order)?;
        let data_offset = order::read_u32(buf, offset + 12, order)?;
        let version = order::read_u16(buf, offset + 16, order)?;
        if version != ARCHIVE_VERSION {
            return Err(Error::InvalidVersion {
                expected: ARCHIVE_VERSION,
                actual: version,
            });
        }
        // Trailing 2 bytes are reserved; keep the block's full extent checked.
        order::read_u16(buf, offset + 18, order)?;

        Ok(ArchiveHeader { file_size, data_offset })
    }

    pub fn pack_into(&self, out: &mut Vec<u8>, order: Order) {
        order::write_signature(out, ARCHIVE_SIGNATURE);
        order::write_u16(out, ARCHIVE_HEADER_SIZE as u16, order);
        order::write_u16(out, BYTE_ORDER_MARK, order);
        order::write_u32(out, self.file_size, order);
        order::write_u32(out, self.data_offset, order);
        order::write_u16(out, ARCHIVE_VERSION, order);
        order::write_u16(out, 0, order);
    }
}

// ── FAT header ───────────────────────────────────────────────────────────────

/// The "SFAT" directory block header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FatHeader {
    /// Number of directory entries following this header.
    pub file_count: u16,
    /// Multiplier used to hash every name in this archive.
    pub hash_key: u32,
}

impl FatHeader {
    pub fn parse(buf: &[u8], offset: usize, order: Order) -> Result<FatHeader> {
        let signature = order::read_signature(buf, offset)?;
        let header_size = order::read_u16(buf, offset + 4, order)?;
        check_block(
            "SFAT",
            FAT_SIGNATURE,
            signature,
            FAT_HEADER_SIZE as u16,
            header_size,
        )?;

        let file_count = order::read_u16(buf, offset + 6, order)?;
        if file_count as usize > MAX_FILE_COUNT {
            return Err(Error::EntryCountExceeded {
                actual: file_count as usize,
                max: MAX_FILE_COUNT,
            });
        }
        let hash_key = order::read_u32(buf, offset + 8, order)?;

        Ok(FatHeader { file_count, hash_key })
    }

    pub fn pack_into(&self, out: &mut Vec<u8>, order: Order) {
        order::write_signature(out, FAT_SIGNATURE);
        order::write_u16(out, FAT_HEADER_SIZE as u16, order);
        order::write_u16(out, self.file_count, order);
        order::write_u32(out, self.hash_key, order);
    }
}

// ── FNT header ───────────────────────────────────────────────────────────────

/// The "SFNT" block marking the start of the name table.
///
/// Holds no entry count; names are discovered by walking the offsets
/// recorded in directory entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FntHeader;

impl FntHeader {
    pub fn parse(buf: &[u8], offset: usize, order: Order) -> Result<FntHeader> {
        let signature = order::read_signature(buf, offset)?;
        let header_size = order::read_u16(buf, offset + 4, order)?;
        check_block(
            "SFNT",
            FNT_SIGNATURE,
            signature,
            FNT_HEADER_SIZE as u16,
            header_size,
        )?;
        order::read_u16(buf, offset + 6, order)?;
        Ok(FntHeader)
    }

    pub fn pack_into(&self, out: &mut Vec<u8>, order: Order) {
        order::write_signature(out, FNT_SIGNATURE);
        order::write_u16(out, FNT_HEADER_SIZE as u16, order);
        order::write_u16(out, 0, order);
    }
}
