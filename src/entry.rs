//! Directory entries.
//!
//! Every archived file is described by one fixed 16-byte FAT record. An
//! entry exists in one of two states: parsed out of an existing archive
//! (offsets meaningful) or queued from the filesystem for a build (offsets
//! assigned when the archive is packed). The two states carry different
//! fields, so they are separate variants dispatched explicitly.

use std::path::PathBuf;

use crate::error::Result;
use crate::hash::name_hash;
use crate::order::{self, Order};

/// Fixed on-disk size of one directory record.
pub const ENTRY_SIZE: usize = 0x10;

/// Name-table entries are NUL-padded to this boundary, and name offsets are
/// stored in units of it.
pub const NAME_ALIGNMENT: usize = 4;

/// Tag bit set unconditionally in every archived name offset. Kept verbatim
/// on write; no known reader depends on it being clear.
pub const NAME_OFFSET_TAG: u32 = 1 << 24;

/// One directory record, keyed by the hash of its relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FatEntry {
    /// Parsed from an existing archive.
    Archived {
        hash: u32,
        /// Bit 24 tag | (name-table byte offset / 4) in bits 0-23.
        name_offset: u32,
        /// Start of the payload within the data region.
        data_start: u32,
        /// Exclusive end of the payload within the data region.
        data_end: u32,
    },
    /// Queued for a build from the filesystem.
    Pending {
        hash: u32,
        /// Archive-relative path, forward slashes.
        rel_path: String,
        /// Where to read the payload from at build time.
        source: PathBuf,
    },
}

impl FatEntry {
    /// Parse one archived record at `offset`.
    pub fn parse(buf: &[u8], offset: usize, order: Order) -> Result<FatEntry> {
        Ok(FatEntry::Archived {
            hash: order::read_u32(buf, offset, order)?,
            name_offset: order::read_u32(buf, offset + 4, order)?,
            data_start: order::read_u32(buf, offset + 8, order)?,
            data_end: order::read_u32(buf, offset + 12, order)?,
        })
    }

    /// Queue a filesystem file under an archive-relative path.
    pub fn pending(rel_path: String, source: PathBuf, hash_key: u32) -> FatEntry {
        let hash = name_hash(rel_path.as_bytes(), hash_key);
        FatEntry::Pending { hash, rel_path, source }
    }

    pub fn hash(&self) -> u32 {
        match *self {
            FatEntry::Archived { hash, .. } => hash,
            FatEntry::Pending { hash, .. } => hash,
        }
    }

    /// Pack an archived record. Pending entries are converted to archived
    /// ones by the build before packing.
    pub fn pack_into(&self, out: &mut Vec<u8>, order: Order) {
        match *self {
            FatEntry::Archived { hash, name_offset, data_start, data_end } => {
                order::write_u32(out, hash, order);
                order::write_u32(out, name_offset, order);
                order::write_u32(out, data_start, order);
                order::write_u32(out, data_end, order);
            }
            FatEntry::Pending { .. } => {
                unreachable!("pending entries are resolved before packing");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::hash::DEFAULT_HASH_KEY;

    #[test]
    fn archived_round_trip() {
        let entry = FatEntry::Archived {
            hash: 0x5C89_7AA7,
            name_offset: NAME_OFFSET_TAG | 2,
            data_start: 0x80,
            data_end: 0x183,
        };
        for order in [Order::Big, Order::Little] {
            let mut buf = Vec::new();
            entry.pack_into(&mut buf, order);
            assert_eq!(buf.len(), ENTRY_SIZE);
            assert_eq!(FatEntry::parse(&buf, 0, order).unwrap(), entry);
        }
    }

    #[test]
    fn pending_hashes_relative_path() {
        let entry = FatEntry::pending(
            "a.txt".to_string(),
            PathBuf::from("/tmp/in/a.txt"),
            DEFAULT_HASH_KEY,
        );
        assert_eq!(entry.hash(), 0x5C89_7AA7);
    }

    #[test]
    fn short_record_is_truncated_input() {
        let buf = [0u8; ENTRY_SIZE - 1];
        assert!(matches!(
            FatEntry::parse(&buf, 0, Order::Little),
            Err(Error::TruncatedInput { .. })
        ));
    }
}
