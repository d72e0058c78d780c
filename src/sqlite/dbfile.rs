//! SQLite database file access.
//!
//! Provides [`DbFile`], the entry point for loading a database file for
//! analysis. The entire file is materialized as one immutable byte buffer
//! (heap copy or `mmap(2)`), the magic identifier is checked, and the
//! declared page size is read from the file header. Individual pages can
//! be sliced out by number for classification.
//!
//! `DbFile` holds no decoding logic beyond the file-header contract. It
//! never writes to the source file; the strict read-only guarantee matters
//! for a recovery tool, which must not risk further damaging a corrupted
//! artifact.

use byteorder::{BigEndian, ByteOrder};

use crate::sqlite::constants::*;
use crate::Sq3Error;

enum Buffer {
    Owned(Vec<u8>),
    #[cfg(feature = "cli")]
    Mapped(memmap2::Mmap),
}

impl Buffer {
    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Owned(data) => data,
            #[cfg(feature = "cli")]
            Buffer::Mapped(mmap) => mmap,
        }
    }
}

/// An open database file held as one immutable in-memory buffer.
pub struct DbFile {
    buf: Buffer,
    forced_page_size: Option<u32>,
}

impl DbFile {
    /// Read the whole file into memory.
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Sq3Error> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| Sq3Error::Io(format!("Cannot open {}: {}", path.display(), e)))?;
        Ok(DbFile {
            buf: Buffer::Owned(data),
            forced_page_size: None,
        })
    }

    /// Open the file with memory-mapped I/O.
    ///
    /// The mapping stays backed by the OS page cache, so only accessed
    /// regions fault into physical RAM. Analysis semantics are identical
    /// to [`DbFile::open`].
    ///
    /// # Safety
    ///
    /// The underlying `mmap` call is `unsafe` because the mapped file must
    /// not be modified by another process while the mapping is active. For
    /// offline analysis of a damaged database this holds in practice.
    #[cfg(feature = "cli")]
    pub fn open_mmap<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Sq3Error> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| Sq3Error::Io(format!("Cannot open {}: {}", path.display(), e)))?;
        let mmap = unsafe {
            memmap2::Mmap::map(&file)
                .map_err(|e| Sq3Error::Io(format!("Cannot mmap {}: {}", path.display(), e)))?
        };
        Ok(DbFile {
            buf: Buffer::Mapped(mmap),
            forced_page_size: None,
        })
    }

    /// Wrap an in-memory byte buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// use sq3::sqlite::dbfile::DbFile;
    ///
    /// let db = DbFile::from_bytes(b"SQLite format 3\x00".to_vec());
    /// assert!(db.has_magic());
    /// assert_eq!(db.first_header_offset(), 100);
    /// ```
    pub fn from_bytes(data: Vec<u8>) -> Self {
        DbFile {
            buf: Buffer::Owned(data),
            forced_page_size: None,
        }
    }

    /// Force a specific page size for page arithmetic, bypassing the file
    /// header. Useful for headerless fragments with a known page size.
    pub fn set_page_size(&mut self, page_size: u32) {
        self.forced_page_size = Some(page_size);
    }

    /// The full immutable buffer.
    pub fn as_bytes(&self) -> &[u8] {
        self.buf.as_slice()
    }

    /// File size in bytes.
    pub fn file_size(&self) -> u64 {
        self.as_bytes().len() as u64
    }

    /// Whether the file starts with the magic identifier.
    pub fn has_magic(&self) -> bool {
        self.as_bytes().starts_with(MAGIC)
    }

    /// Declared page size from bytes 16-17 of the file header, raw.
    ///
    /// Only meaningful when the magic identifier is present; a stored
    /// value of 1 denotes 64 KiB.
    pub fn declared_page_size(&self) -> Option<u16> {
        if !self.has_magic() {
            return None;
        }
        let data = self.as_bytes();
        if data.len() < HDR_PAGE_SIZE + 2 {
            return None;
        }
        Some(BigEndian::read_u16(&data[HDR_PAGE_SIZE..]))
    }

    /// Effective page size used for page arithmetic.
    ///
    /// A forced override wins; otherwise the declared value when plausible
    /// (the 64 KiB sentinel resolved), otherwise the 4096-byte default.
    pub fn page_size(&self) -> u32 {
        if let Some(forced) = self.forced_page_size {
            return forced;
        }
        match self.declared_page_size() {
            Some(PAGE_SIZE_64K_SENTINEL) => SIZE_PAGE_MAX,
            Some(ps) if is_plausible_page_size(ps) => u32::from(ps),
            _ => SIZE_PAGE_DEFAULT,
        }
    }

    /// B-tree page header offset of the first page: 100 when the file
    /// header is present, 0 otherwise.
    pub fn first_header_offset(&self) -> usize {
        if self.has_magic() {
            FILE_HEADER_SIZE
        } else {
            0
        }
    }

    /// Number of fixed-size pages, counting a truncated trailing page.
    pub fn page_count(&self) -> u64 {
        self.file_size().div_ceil(u64::from(self.page_size()))
    }

    /// Byte range of page `page_no`, clamped to the end of the file.
    ///
    /// Returns `None` when the page starts at or past EOF.
    pub fn page_slice(&self, page_no: u64) -> Option<&[u8]> {
        let ps = u64::from(self.page_size());
        let start = page_no.checked_mul(ps)?;
        if start >= self.file_size() {
            return None;
        }
        let end = (start + ps).min(self.file_size());
        Some(&self.as_bytes()[start as usize..end as usize])
    }

    /// B-tree header offset within [`DbFile::page_slice`] for `page_no`:
    /// the file header pushes the first page's B-tree header to byte 100.
    pub fn header_offset_for(&self, page_no: u64) -> usize {
        if page_no == 0 {
            self.first_header_offset()
        } else {
            0
        }
    }
}

/// Plausibility check for a declared page size: a power of two of at
/// least 512 (the 64 KiB sentinel is handled separately).
pub fn is_plausible_page_size(ps: u16) -> bool {
    u32::from(ps) >= SIZE_PAGE_MIN && ps.is_power_of_two()
}
