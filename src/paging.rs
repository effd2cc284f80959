//! Refer to datasheet:
//! https://www.onsemi.com/pdf/datasheet/cat24c32-d.pdf
//!
//! Page write (datasheet "Page Write"): the device latches up to one page of
//! data after the 2-byte address. The low address bits roll over inside the
//! page, so bytes sent past the end of a page overwrite its start. Writes
//! must therefore be split at page boundaries.

/// Bytes per page for the CAT24Cxx family.
pub const PAGE_SIZE: usize = 32;

/// Size of the 16-bit internal address register.
pub const ADDRESS_SPACE: usize = 1 << 16;

/// Serializes a linear offset into the address word sent ahead of every
/// transaction, most significant byte first.
pub const fn serialize_address(offset: u16) -> [u8; 2] {
    [(offset >> 8) as u8, offset as u8]
}

/// One bus write: `len` bytes of the caller's data starting at `start`,
/// destined for device offset `address`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Chunk {
    pub address: u16,
    pub start: usize,
    pub len: usize,
}

impl Chunk {
    /// Range of the source slice carried by this chunk.
    pub fn range(&self) -> core::ops::Range<usize> {
        self.start..self.start + self.len
    }
}

/// Splits `len` bytes written at `offset` into transactions that never
/// cross a page boundary.
///
/// The first chunk runs up to the end of the page containing `offset`, every
/// following chunk is at most one page. A page-aligned `offset` yields a
/// full first chunk, exactly like the rest.
///
/// `offset + len` must not exceed [`ADDRESS_SPACE`]; the drivers check it
/// against the device capacity before splitting.
#[derive(Debug, Clone)]
pub struct PageChunks {
    offset: usize,
    len: usize,
    page_size: usize,
    written: usize,
}

impl PageChunks {
    pub(crate) fn new(offset: u16, len: usize, page_size: usize) -> Self {
        debug_assert!(page_size > 0);
        debug_assert!(offset as usize + len <= ADDRESS_SPACE);
        Self {
            offset: offset as usize,
            len,
            page_size,
            written: 0,
        }
    }
}

impl Iterator for PageChunks {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        if self.written >= self.len {
            return None;
        }
        let address = self.offset + self.written;
        let to_boundary = self.page_size - address % self.page_size;
        let len = to_boundary.min(self.len - self.written);
        let chunk = Chunk {
            address: address as u16,
            start: self.written,
            len,
        };
        self.written += len;
        Some(chunk)
    }
}

/// Chunks for writing `len` bytes at `offset` with the family page size.
///
/// `offset + len` must not exceed [`ADDRESS_SPACE`] (0x10000).
pub fn page_chunks(offset: u16, len: usize) -> PageChunks {
    PageChunks::new(offset, len, PAGE_SIZE)
}
