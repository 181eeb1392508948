//! Archive container: an ordered collection of named, compressed file
//! entries backed by the container file format.
//!
//! # Container file format
//! A sequence of records, repeated until end of file:
//! ```text
//! [entry name, NUL-terminated]
//! [u32 LE: compressed payload length]
//! [payload: concatenated serialized blocks]
//! ```

use std::fs;
use std::path::Path;

use log::info;

use crate::buffer::Buffer;
use crate::codec;
use crate::error::{BparcError, Result};

/// Minimum width of the name column in a listing.
const MIN_NAME_WIDTH: usize = 20;

/// One named file's raw and compressed representations within an archive.
///
/// Decompressing `compressed` always reproduces `raw` exactly.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Name key, unique within the archive.
    pub name: String,
    /// Uncompressed file contents.
    pub raw: Buffer,
    /// Serialized, compressed representation (the on-disk payload).
    pub compressed: Buffer,
}

/// An ordered collection of [`FileEntry`] values, kept in strictly
/// ascending lexicographic order by name.
#[derive(Debug, Default)]
pub struct Archive {
    entries: Vec<FileEntry>,
}

impl Archive {
    /// Create an empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in sorted order.
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Load an archive from a container file.
    ///
    /// Parses records until the file is exhausted, decompressing each
    /// entry's payload back into its raw bytes. Fails on truncated or
    /// malformed input without returning a partial archive.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut src = Buffer::from_vec(fs::read(path)?);
        let mut archive = Self::new();

        while src.remaining() > 0 {
            let name = read_name(&mut src)?;
            let mut len_bytes = [0u8; 4];
            if !src.read_exact(&mut len_bytes) {
                return Err(BparcError::Corrupt(format!(
                    "entry {name:?}: truncated payload length"
                )));
            }
            let payload_len = u32::from_le_bytes(len_bytes) as usize;
            let payload = src.read_slice(payload_len).ok_or_else(|| {
                BparcError::Corrupt(format!("entry {name:?}: truncated payload"))
            })?;

            let mut compressed = Buffer::new();
            compressed.append_bytes(payload);
            let raw = codec::decompress(&mut compressed)?;
            compressed.rewind();

            archive.insert(FileEntry {
                name,
                raw,
                compressed,
            })?;
        }

        info!(
            "loaded archive {} with {} entries",
            path.display(),
            archive.len()
        );
        Ok(archive)
    }

    /// Add the file at `path` to the archive under its path string as the
    /// entry name, compressing its contents.
    ///
    /// Fails with [`BparcError::DuplicateName`] if the name already exists,
    /// leaving the archive unchanged.
    pub fn add(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let name = path.to_string_lossy().into_owned();
        if self.position(&name).is_ok() {
            return Err(BparcError::DuplicateName(name));
        }
        let raw = Buffer::from_vec(fs::read(path)?);
        let compressed = codec::compress(raw.as_slice());
        self.insert(FileEntry {
            name,
            raw,
            compressed,
        })
    }

    /// Remove the entry named `name`, or fail with
    /// [`BparcError::NotFound`] leaving the archive unchanged.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        let idx = self
            .position(name)
            .map_err(|_| BparcError::NotFound(name.to_string()))?;
        self.entries.remove(idx);
        Ok(())
    }

    /// Write the raw bytes of the entry named `name` verbatim to
    /// `out_path`.
    pub fn extract(&self, name: &str, out_path: impl AsRef<Path>) -> Result<()> {
        let idx = self
            .position(name)
            .map_err(|_| BparcError::NotFound(name.to_string()))?;
        fs::write(out_path, self.entries[idx].raw.as_slice())?;
        Ok(())
    }

    /// Render a listing of every entry in sorted order: the name,
    /// column-aligned to the longest name (minimum width 20), followed by
    /// the raw and compressed byte lengths.
    pub fn report(&self) -> String {
        if self.entries.is_empty() {
            return "Archive is empty\n".to_string();
        }
        let width = self
            .entries
            .iter()
            .map(|e| e.name.len())
            .max()
            .unwrap_or(0)
            .max(MIN_NAME_WIDTH);
        let mut out = format!("{:<width$} {:>8} {:>8}\n", "File", "orig", "comp");
        for entry in &self.entries {
            out.push_str(&format!(
                "{:<width$} {:>8} {:>8}\n",
                entry.name,
                entry.raw.len(),
                entry.compressed.len()
            ));
        }
        out
    }

    /// Save every entry to `path` in the container file format, in sorted
    /// order, overwriting any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut out = Buffer::new();
        for entry in &self.entries {
            out.append_bytes(entry.name.as_bytes());
            out.append_byte(0);
            out.append_bytes(&(entry.compressed.len() as u32).to_le_bytes());
            out.append_bytes(entry.compressed.as_slice());
        }
        fs::write(path, out.as_slice())?;
        info!("saved archive {} with {} entries", path.display(), self.len());
        Ok(())
    }

    /// Binary search by name: `Ok(index)` when present, `Err(insertion
    /// point)` when absent.
    fn position(&self, name: &str) -> std::result::Result<usize, usize> {
        self.entries
            .binary_search_by(|entry| entry.name.as_str().cmp(name))
    }

    /// Insert `entry` at the position that keeps names sorted.
    fn insert(&mut self, entry: FileEntry) -> Result<()> {
        match self.position(&entry.name) {
            Ok(_) => Err(BparcError::DuplicateName(entry.name)),
            Err(idx) => {
                self.entries.insert(idx, entry);
                Ok(())
            }
        }
    }
}

/// Read a NUL-terminated entry name from the cursor of `src`.
fn read_name(src: &mut Buffer) -> Result<String> {
    let mut bytes = Vec::new();
    loop {
        match src.read_byte() {
            Some(0) => break,
            Some(b) => bytes.push(b),
            None => {
                return Err(BparcError::Corrupt("unterminated entry name".into()));
            }
        }
    }
    String::from_utf8(bytes)
        .map_err(|_| BparcError::Corrupt("entry name is not valid UTF-8".into()))
}
