/// SQLite file and page structure constants.
///
/// Offsets and codes follow the SQLite on-disk format documentation
/// (fileformat2): the 100-byte file header, the B-tree page header, and
/// the record (cell) encoding.
// File header
pub const MAGIC: &[u8; 6] = b"SQLite"; // leading bytes of "SQLite format 3\0"
pub const FILE_HEADER_SIZE: usize = 100;
pub const HDR_PAGE_SIZE: usize = 16; // 2 bytes - declared page size, big-endian

// Page sizes
pub const SIZE_PAGE_DEFAULT: u32 = 4096;
pub const SIZE_PAGE_MIN: u32 = 512;
pub const SIZE_PAGE_MAX: u32 = 65536;
// A declared page size of 1 is the on-disk sentinel for 64 KiB (the real
// value does not fit the 16-bit field).
pub const PAGE_SIZE_64K_SENTINEL: u16 = 1;

// B-tree page header (offsets relative to the page header start)
pub const PAGE_TYPE_BYTE: usize = 0; // 1 byte - page type code
pub const PAGE_FIRST_FREEBLOCK: usize = 1; // 2 bytes - first freeblock offset, 0 if none
pub const PAGE_CELL_COUNT: usize = 3; // 2 bytes - number of cells on the page
pub const PAGE_CONTENT_START: usize = 5; // 2 bytes - start of cell content area
pub const PAGE_FRAG_FREE_BYTES: usize = 7; // 1 byte - fragmented free bytes in content area
pub const PAGE_RIGHT_POINTER: usize = 8; // 4 bytes - right-most child (interior pages only)
pub const SIZE_LEAF_PAGE_HEADER: usize = 8;
pub const SIZE_INTERIOR_PAGE_HEADER: usize = 12;

// Page type codes (first byte of the page header)
pub const PAGE_TYPE_INTERIOR_INDEX: u8 = 0x02;
pub const PAGE_TYPE_INTERIOR_TABLE: u8 = 0x05;
pub const PAGE_TYPE_LEAF_INDEX: u8 = 0x0a;
pub const PAGE_TYPE_LEAF_TABLE: u8 = 0x0d;

// Varint encoding
pub const MAX_VARINT_LEN: usize = 9;

// Ceiling on cells parsed per page. Declared cell counts on corrupt pages
// can be arbitrarily large; this bounds report size, not correctness.
pub const MAX_CELLS_REPORTED: usize = 20;
