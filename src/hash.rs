//! File-name hashing.
//!
//! The directory indexes entries by a 32-bit hash of the relative path, not
//! by the path itself. The multiplier key is stored in the FAT header, so a
//! reader always hashes lookups with the key the archive was built with;
//! hashing with a different key silently resolves to a wrong or missing
//! entry.

/// Multiplier used by stock archives.
pub const DEFAULT_HASH_KEY: u32 = 0x65;

/// Hash a name with the archive's multiplier key.
///
/// Folds each byte in order as `acc * key + byte`, wrapping at 32 bits,
/// starting from zero.
pub fn name_hash(name: &[u8], key: u32) -> u32 {
    name.iter()
        .fold(0u32, |acc, &b| acc.wrapping_mul(key).wrapping_add(b as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values() {
        assert_eq!(name_hash(b"a.txt", DEFAULT_HASH_KEY), 0x5C89_7AA7);
        assert_eq!(name_hash(b"tex.bflim", DEFAULT_HASH_KEY), 0x4A2D_0709);
        assert_eq!(name_hash(b"", DEFAULT_HASH_KEY), 0);
    }

    #[test]
    fn key_changes_hash_for_non_empty_names() {
        assert_ne!(
            name_hash(b"a.txt", 0x65),
            name_hash(b"a.txt", 0x66),
        );
    }

    #[test]
    fn pure_across_calls() {
        let first = name_hash(b"content/model.bin", 0x65);
        let second = name_hash(b"content/model.bin", 0x65);
        assert_eq!(first, second);
    }
}
