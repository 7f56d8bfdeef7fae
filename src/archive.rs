//! High-level [`Sarc`] API — the primary embedding surface.
//!
//! ```no_run
//! use sharc::{Order, Sarc, DEFAULT_HASH_KEY};
//!
//! // Build
//! let sarc = Sarc::from_dir("assets/", Order::Little, DEFAULT_HASH_KEY)?;
//! let build = sarc.build()?;
//! std::fs::write("out.sarc", &build.bytes)?;
//!
//! // Read
//! let sarc = Sarc::load("out.sarc")?;
//! let (path, data) = sarc.extract_by_name("readme.txt")?;
//! println!("{path}: {} bytes", data.len());
//! # Ok::<(), sharc::Error>(())
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::align;
use crate::entry::{FatEntry, ENTRY_SIZE, NAME_ALIGNMENT, NAME_OFFSET_TAG};
use crate::error::{Error, Result};
use crate::header::{
    ArchiveHeader, FatHeader, FntHeader, ARCHIVE_HEADER_SIZE, FAT_HEADER_SIZE, FNT_HEADER_SIZE,
    MAX_FILE_COUNT,
};
use crate::order::Order;

// ── Build output ─────────────────────────────────────────────────────────────

/// Result of [`Sarc::build`].
#[derive(Debug, Clone)]
pub struct Build {
    /// The complete archive, ready to be written to disk.
    pub bytes: Vec<u8>,
    /// Set when the directory exceeds the format's 0x3FFF entry ceiling.
    /// The archive is still produced, but a strict reader will reject it.
    pub over_capacity: bool,
}

// ── Sarc ─────────────────────────────────────────────────────────────────────

/// An in-memory SARC archive: directory, name table and data region.
///
/// The directory maps name hashes to entries. A hash collision between two
/// names silently keeps the last entry inserted — that is how the format
/// behaves, since nothing on disk distinguishes the colliding names' records.
pub struct Sarc {
    order: Order,
    hash_key: u32,
    entries: BTreeMap<u32, FatEntry>,
    fnt_data: Vec<u8>,
    data: Vec<u8>,
}

impl Sarc {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Start an empty archive for building.
    pub fn new(order: Order, hash_key: u32) -> Sarc {
        Sarc {
            order,
            hash_key,
            entries: BTreeMap::new(),
            fnt_data: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Parse an archive from a complete in-memory buffer.
    ///
    /// The byte order is detected from the raw byte-order-mark bytes before
    /// any field is decoded; every header is then validated in sequence.
    /// Any failure aborts the whole read — no partial archive is returned.
    pub fn read(buf: &[u8]) -> Result<Sarc> {
        if buf.len() < 8 {
            return Err(Error::TruncatedInput { expected: 8, actual: buf.len() });
        }
        let order = Order::detect([buf[6], buf[7]]);

        let header = ArchiveHeader::parse(buf, 0, order)?;
        let mut cursor = ARCHIVE_HEADER_SIZE;

        let fat = FatHeader::parse(buf, cursor, order)?;
        cursor += FAT_HEADER_SIZE;

        let mut entries = BTreeMap::new();
        for _ in 0..fat.file_count {
            let entry = FatEntry::parse(buf, cursor, order)?;
            cursor += ENTRY_SIZE;
            // Last record wins on a duplicated hash.
            entries.insert(entry.hash(), entry);
        }

        FntHeader::parse(buf, cursor, order)?;
        cursor += FNT_HEADER_SIZE;

        let data_offset = header.data_offset as usize;
        if data_offset > buf.len() {
            return Err(Error::TruncatedInput { expected: data_offset, actual: buf.len() });
        }
        if data_offset < cursor {
            return Err(Error::TruncatedInput { expected: cursor, actual: data_offset });
        }

        Ok(Sarc {
            order,
            hash_key: fat.hash_key,
            entries,
            fnt_data: buf[cursor..data_offset].to_vec(),
            data: buf[data_offset..].to_vec(),
        })
    }

    /// Read an archive file from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Sarc> {
        let buf = fs::read(path)?;
        Sarc::read(&buf)
    }

    /// Queue every regular file under `root` for a build, keyed by its
    /// root-relative path with forward-slash separators.
    pub fn from_dir<P: AsRef<Path>>(root: P, order: Order, hash_key: u32) -> Result<Sarc> {
        let root = root.as_ref();
        let mut sarc = Sarc::new(order, hash_key);
        for entry in WalkDir::new(root) {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = entry
                .path()
                .strip_prefix(root)
                .map_err(|e| Error::Io(io::Error::new(io::ErrorKind::InvalidInput, e)))?;
            let rel_path = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            sarc.add_file(rel_path, entry.path().to_path_buf());
        }
        Ok(sarc)
    }

    // ── Building ─────────────────────────────────────────────────────────────

    /// Queue one filesystem file under an archive-relative path.
    ///
    /// A second path hashing to the same value replaces the first entry.
    pub fn add_file(&mut self, rel_path: String, source: PathBuf) {
        let entry = FatEntry::pending(rel_path, source, self.hash_key);
        self.entries.insert(entry.hash(), entry);
    }

    /// Pack the archive into a single byte buffer.
    ///
    /// Entries are processed in ascending hash order, so repeated builds of
    /// the same input set are byte-identical. Each pending entry's payload
    /// is read in full; a read failure aborts the whole build. Name table
    /// and data carried over from a parsed archive are kept as a prefix, so
    /// archived entries' offsets stay valid.
    pub fn build(&self) -> Result<Build> {
        let mut fnt = self.fnt_data.clone();
        let mut data = self.data.clone();
        let mut records = Vec::with_capacity(self.entries.len() * ENTRY_SIZE);

        for entry in self.entries.values() {
            match entry {
                FatEntry::Archived { .. } => entry.pack_into(&mut records, self.order),
                FatEntry::Pending { hash, rel_path, source } => {
                    let payload = fs::read(source).map_err(|e| Error::SourceFileUnreadable {
                        path: source.clone(),
                        source: e,
                    })?;

                    let pad = align::padding_for(&payload, data.len(), self.order);
                    data.resize(data.len() + pad, 0);
                    let data_start = data.len() as u32;
                    data.extend_from_slice(&payload);
                    let data_end = data.len() as u32;

                    let name_offset =
                        ((fnt.len() / NAME_ALIGNMENT) as u32 & 0x00FF_FFFF) | NAME_OFFSET_TAG;
                    fnt.extend_from_slice(rel_path.as_bytes());
                    fnt.push(0);
                    while fnt.len() % NAME_ALIGNMENT != 0 {
                        fnt.push(0);
                    }

                    FatEntry::Archived { hash: *hash, name_offset, data_start, data_end }
                        .pack_into(&mut records, self.order);
                }
            }
        }

        let file_count = self.entries.len();
        let over_capacity = file_count > MAX_FILE_COUNT;

        let mut out = Vec::with_capacity(
            ARCHIVE_HEADER_SIZE
                + FAT_HEADER_SIZE
                + records.len()
                + FNT_HEADER_SIZE
                + fnt.len()
                + data.len(),
        );
        // Placeholder header; file_size and data_offset depend on everything
        // written after them and are patched in below.
        ArchiveHeader { file_size: 0, data_offset: 0 }.pack_into(&mut out, self.order);
        FatHeader { file_count: file_count as u16, hash_key: self.hash_key }
            .pack_into(&mut out, self.order);
        out.extend_from_slice(&records);
        FntHeader.pack_into(&mut out, self.order);
        out.extend_from_slice(&fnt);

        let data_offset = out.len() as u32;
        out.extend_from_slice(&data);
        let file_size = out.len() as u32;

        let mut header = Vec::with_capacity(ARCHIVE_HEADER_SIZE);
        ArchiveHeader { file_size, data_offset }.pack_into(&mut header, self.order);
        out[..ARCHIVE_HEADER_SIZE].copy_from_slice(&header);

        Ok(Build { bytes: out, over_capacity })
    }

    // ── Extraction ───────────────────────────────────────────────────────────

    /// Recover one archived entry by its name hash.
    pub fn extract_by_hash(&self, hash: u32) -> Result<(String, &[u8])> {
        let entry = self
            .entries
            .get(&hash)
            .ok_or_else(|| Error::EntryNotFound(format!("{hash:08X}")))?;
        match *entry {
            FatEntry::Archived { name_offset, data_start, data_end, .. } => {
                let path = self.name_at(name_offset)?;
                let data = self
                    .data
                    .get(data_start as usize..data_end as usize)
                    .ok_or(Error::TruncatedInput {
                        expected: data_end as usize,
                        actual: self.data.len(),
                    })?;
                Ok((path, data))
            }
            // A pending entry has no archived bytes to extract yet.
            FatEntry::Pending { .. } => Err(Error::EntryNotFound(format!("{hash:08X}"))),
        }
    }

    /// Recover one archived entry by name, hashed with the archive's own key.
    pub fn extract_by_name(&self, name: &str) -> Result<(String, &[u8])> {
        let hash = crate::hash::name_hash(name.as_bytes(), self.hash_key);
        if !self.entries.contains_key(&hash) {
            return Err(Error::EntryNotFound(name.to_string()));
        }
        self.extract_by_hash(hash)
    }

    /// Iterate every archived entry in ascending hash order.
    ///
    /// Yields a per-entry `Result`: one corrupt entry does not stop the
    /// extraction of the rest.
    pub fn extract_all(&self) -> impl Iterator<Item = (u32, Result<(String, &[u8])>)> + '_ {
        self.entries
            .iter()
            .filter(|(_, e)| matches!(e, FatEntry::Archived { .. }))
            .map(|(&hash, _)| (hash, self.extract_by_hash(hash)))
    }

    /// Write every extractable entry under `dest`, creating intermediate
    /// directories. Per-entry decode failures are collected and returned;
    /// filesystem write failures are fatal.
    pub fn extract_all_to<P: AsRef<Path>>(&self, dest: P) -> Result<Vec<(u32, Error)>> {
        let dest = dest.as_ref();
        let mut failures = Vec::new();
        for (hash, result) in self.extract_all() {
            match result {
                Ok((path, data)) => {
                    let out_path = dest.join(&path);
                    if let Some(parent) = out_path.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    fs::write(&out_path, data)?;
                }
                Err(e) => failures.push((hash, e)),
            }
        }
        Ok(failures)
    }

    // ── Listing & accessors ──────────────────────────────────────────────────

    /// Iterate `(hash, relative_path)` pairs in ascending hash order,
    /// covering both archived and pending entries.
    pub fn entries(&self) -> impl Iterator<Item = (u32, Result<String>)> + '_ {
        self.entries.iter().map(|(&hash, entry)| {
            let path = match entry {
                FatEntry::Archived { name_offset, .. } => self.name_at(*name_offset),
                FatEntry::Pending { rel_path, .. } => Ok(rel_path.clone()),
            };
            (hash, path)
        })
    }

    /// Look up the raw directory entry for a hash.
    pub fn get(&self, hash: u32) -> Option<&FatEntry> {
        self.entries.get(&hash)
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn hash_key(&self) -> u32 {
        self.hash_key
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ── Internal ─────────────────────────────────────────────────────────────

    /// Read the NUL-terminated name starting at a packed name offset.
    fn name_at(&self, name_offset: u32) -> Result<String> {
        let start = ((name_offset & 0x00FF_FFFF) as usize) * NAME_ALIGNMENT;
        let table = self.fnt_data.get(start..).ok_or(Error::TruncatedInput {
            expected: start,
            actual: self.fnt_data.len(),
        })?;
        let end = table
            .iter()
            .position(|&b| b == 0)
            .ok_or(Error::TruncatedInput {
                expected: self.fnt_data.len() + 1,
                actual: self.fnt_data.len(),
            })?;
        Ok(String::from_utf8_lossy(&table[..end]).into_owned())
    }
}
