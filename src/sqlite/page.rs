//! B-tree page classification and cell extraction.
//!
//! Maps the page-type byte at the start of the B-tree page header to a
//! [`PageType`], parses the remaining header fields (cell count, content
//! area start, freeblock bookkeeping), and for table-leaf pages walks the
//! cell-pointer array driving [`parse_cell`] over each pointer.
//!
//! Cell extraction is attempted only for table-leaf pages; interior and
//! index pages stop at classification. Out-of-range cell pointers are
//! reported and skipped, and the number of cells parsed per page is capped
//! at [`MAX_CELLS_REPORTED`] so a corrupted cell count cannot blow up the
//! report.

use byteorder::{BigEndian, ByteOrder};
use serde::Serialize;

use crate::sqlite::cell::{parse_cell, Cell};
use crate::sqlite::constants::*;

/// B-tree page classification from the page-type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PageType {
    /// Index B-tree interior page (0x02).
    InteriorIndex,
    /// Table B-tree interior page (0x05).
    InteriorTable,
    /// Index B-tree leaf page (0x0a).
    LeafIndex,
    /// Table B-tree leaf page (0x0d).
    LeafTable,
    /// Any other type byte.
    Unknown,
}

impl PageType {
    /// Classify a page-type byte.
    ///
    /// # Examples
    ///
    /// ```
    /// use sq3::sqlite::page::PageType;
    ///
    /// assert_eq!(PageType::from_u8(0x0d), PageType::LeafTable);
    /// assert_eq!(PageType::from_u8(0x02), PageType::InteriorIndex);
    /// assert_eq!(PageType::from_u8(0x00), PageType::Unknown);
    /// assert_eq!(PageType::from_u8(0xff), PageType::Unknown);
    /// ```
    pub fn from_u8(value: u8) -> Self {
        match value {
            PAGE_TYPE_INTERIOR_INDEX => PageType::InteriorIndex,
            PAGE_TYPE_INTERIOR_TABLE => PageType::InteriorTable,
            PAGE_TYPE_LEAF_INDEX => PageType::LeafIndex,
            PAGE_TYPE_LEAF_TABLE => PageType::LeafTable,
            _ => PageType::Unknown,
        }
    }

    /// Human-readable name for this page type.
    pub fn name(&self) -> &'static str {
        match self {
            PageType::InteriorIndex => "Interior index",
            PageType::InteriorTable => "Interior table",
            PageType::LeafIndex => "Leaf index",
            PageType::LeafTable => "Leaf table",
            PageType::Unknown => "Unknown",
        }
    }

    /// Short description of what the page holds.
    pub fn description(&self) -> &'static str {
        match self {
            PageType::InteriorIndex => "Index B-tree interior page (keys and child pointers)",
            PageType::InteriorTable => "Table B-tree interior page (rowid keys and child pointers)",
            PageType::LeafIndex => "Index B-tree leaf page (keys only)",
            PageType::LeafTable => "Table B-tree leaf page (complete records)",
            PageType::Unknown => "Not a recognized B-tree page type",
        }
    }

    /// True for table-leaf pages, the only type cells are extracted from.
    pub fn is_leaf_table(&self) -> bool {
        matches!(self, PageType::LeafTable)
    }

    /// True for interior (non-leaf) pages of either B-tree kind.
    pub fn is_interior(&self) -> bool {
        matches!(self, PageType::InteriorIndex | PageType::InteriorTable)
    }
}

/// Parsed B-tree page header (8 bytes on leaf pages, 12 on interior pages).
#[derive(Debug, Clone, Serialize)]
pub struct BtreePageHeader {
    /// Classified page type.
    pub page_type: PageType,
    /// Raw page-type byte, kept for reporting unknown values.
    pub type_byte: u8,
    /// Offset of the first freeblock on the page, 0 if none.
    pub first_freeblock: u16,
    /// Declared number of cells. Meaningful for leaf-table extraction;
    /// reported as-is for other page types.
    pub cell_count: u16,
    /// Start of the cell content area. A stored 0 means 65536.
    pub content_start: u16,
    /// Fragmented free bytes within the content area.
    pub fragmented_free_bytes: u8,
    /// Right-most child page number. Interior pages only.
    pub right_most_pointer: Option<u32>,
}

impl BtreePageHeader {
    /// Parse a B-tree page header at `header_offset` within `data`.
    ///
    /// Returns `None` when fewer than 8 bytes are available; the caller
    /// can still classify the page if the type byte alone is readable.
    pub fn parse(data: &[u8], header_offset: usize) -> Option<Self> {
        let end = header_offset.checked_add(SIZE_LEAF_PAGE_HEADER)?;
        if end > data.len() {
            return None;
        }
        let h = &data[header_offset..];

        let type_byte = h[PAGE_TYPE_BYTE];
        let page_type = PageType::from_u8(type_byte);

        let right_most_pointer = if page_type.is_interior()
            && data.len() >= header_offset + SIZE_INTERIOR_PAGE_HEADER
        {
            Some(BigEndian::read_u32(&h[PAGE_RIGHT_POINTER..]))
        } else {
            None
        };

        Some(BtreePageHeader {
            page_type,
            type_byte,
            first_freeblock: BigEndian::read_u16(&h[PAGE_FIRST_FREEBLOCK..]),
            cell_count: BigEndian::read_u16(&h[PAGE_CELL_COUNT..]),
            content_start: BigEndian::read_u16(&h[PAGE_CONTENT_START..]),
            fragmented_free_bytes: h[PAGE_FRAG_FREE_BYTES],
            right_most_pointer,
        })
    }
}

/// One entry of the cell-pointer array with its parse outcome.
#[derive(Debug, Clone, Serialize)]
pub struct CellSlot {
    /// Position in the cell-pointer array.
    pub index: usize,
    /// The 2-byte pointer value, an offset from the start of the page.
    pub pointer: u16,
    /// Whether the pointer lands inside the buffer.
    pub in_bounds: bool,
    /// The parsed cell, if the pointer was valid and the leading varints
    /// decoded.
    pub cell: Option<Cell>,
}

/// Everything recovered from one page.
#[derive(Debug, Clone, Serialize)]
pub struct PageAnalysis {
    /// Where the B-tree page header was read (100 for the first page of a
    /// file with an intact file header, 0 otherwise).
    pub header_offset: usize,
    /// Raw type byte, absent when the buffer ends before it.
    pub type_byte: Option<u8>,
    /// Page classification ([`PageType::Unknown`] when unreadable).
    pub page_type: PageType,
    /// Full header, when at least 8 bytes were available.
    pub header: Option<BtreePageHeader>,
    /// Cell slots for table-leaf pages, capped at [`MAX_CELLS_REPORTED`].
    pub cells: Vec<CellSlot>,
}

impl PageAnalysis {
    /// Declared cell count, when the header was readable.
    pub fn declared_cell_count(&self) -> Option<u16> {
        self.header.as_ref().map(|h| h.cell_count)
    }

    /// Number of cells that parsed to at least a row id.
    pub fn parsed_cell_count(&self) -> usize {
        self.cells.iter().filter(|s| s.cell.is_some()).count()
    }
}

/// Classify a page and extract its cells.
///
/// `data` is the page region (or the whole file buffer when analyzing the
/// first page, in which case `header_offset` accounts for the 100-byte
/// file header). Cell pointers are resolved relative to the start of
/// `data` and bounds-checked before dereferencing; invalid pointers are
/// kept in the report but not followed.
///
/// # Examples
///
/// ```
/// use sq3::sqlite::page::{analyze_page, PageType};
///
/// let mut page = vec![0u8; 512];
/// page[0] = 0x05; // interior table
/// let analysis = analyze_page(&page, 0);
/// assert_eq!(analysis.page_type, PageType::InteriorTable);
/// assert!(analysis.cells.is_empty());
/// ```
pub fn analyze_page(data: &[u8], header_offset: usize) -> PageAnalysis {
    let type_byte = data.get(header_offset).copied();
    let page_type = match type_byte {
        Some(b) => PageType::from_u8(b),
        None => PageType::Unknown,
    };
    let header = BtreePageHeader::parse(data, header_offset);

    let mut cells = Vec::new();
    if page_type.is_leaf_table() {
        if let Some(h) = &header {
            let array_start = header_offset + SIZE_LEAF_PAGE_HEADER;
            let count = (h.cell_count as usize).min(MAX_CELLS_REPORTED);

            for index in 0..count {
                let ptr_offset = array_start + index * 2;
                let Some(end) = ptr_offset.checked_add(2) else {
                    break;
                };
                if end > data.len() {
                    // Pointer array itself is truncated.
                    break;
                }
                let pointer = BigEndian::read_u16(&data[ptr_offset..]);
                let in_bounds = (pointer as usize) < data.len();
                let cell = if in_bounds {
                    parse_cell(data, pointer as usize)
                } else {
                    None
                };
                cells.push(CellSlot {
                    index,
                    pointer,
                    in_bounds,
                    cell,
                });
            }
        }
    }

    PageAnalysis {
        header_offset,
        type_byte,
        page_type,
        header,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::serial::ColumnValue;

    /// Place `cell` bytes near the end of `page` and record its pointer.
    fn push_cell(page: &mut [u8], next_free: &mut usize, cell: &[u8]) -> u16 {
        *next_free -= cell.len();
        page[*next_free..*next_free + cell.len()].copy_from_slice(cell);
        *next_free as u16
    }

    /// Build a 4096-byte leaf-table page with the given cell images.
    fn build_leaf_table_page(cells: &[Vec<u8>]) -> Vec<u8> {
        let mut page = vec![0u8; 4096];
        page[PAGE_TYPE_BYTE] = PAGE_TYPE_LEAF_TABLE;
        BigEndian::write_u16(&mut page[PAGE_CELL_COUNT..], cells.len() as u16);

        let mut next_free = page.len();
        let mut pointers = Vec::new();
        for cell in cells {
            pointers.push(push_cell(&mut page, &mut next_free, cell));
        }
        BigEndian::write_u16(&mut page[PAGE_CONTENT_START..], next_free as u16);
        for (i, ptr) in pointers.iter().enumerate() {
            let off = SIZE_LEAF_PAGE_HEADER + i * 2;
            BigEndian::write_u16(&mut page[off..], *ptr);
        }
        page
    }

    #[test]
    fn test_page_type_classification() {
        assert_eq!(PageType::from_u8(0x02), PageType::InteriorIndex);
        assert_eq!(PageType::from_u8(0x05), PageType::InteriorTable);
        assert_eq!(PageType::from_u8(0x0a), PageType::LeafIndex);
        assert_eq!(PageType::from_u8(0x0d), PageType::LeafTable);
        assert_eq!(PageType::from_u8(0x00), PageType::Unknown);
        assert_eq!(PageType::from_u8(0x0c), PageType::Unknown);
    }

    #[test]
    fn test_leaf_table_page_two_cells() {
        // Each cell: one INTEGER column and one TEXT column.
        // payload | rowid | header_size=3 | serials 1, 13+2*len | body
        let cell_a = vec![0x06, 0x01, 0x03, 0x01, 0x11, 0x2a, b'h', b'i'];
        let cell_b = vec![0x07, 0x02, 0x03, 0x01, 0x13, 0x07, b'a', b'b', b'c'];
        let page = build_leaf_table_page(&[cell_a, cell_b]);

        let analysis = analyze_page(&page, 0);
        assert_eq!(analysis.page_type, PageType::LeafTable);
        assert_eq!(analysis.declared_cell_count(), Some(2));
        assert_eq!(analysis.parsed_cell_count(), 2);

        let first = analysis.cells[0].cell.as_ref().unwrap();
        assert_eq!(first.row_id, 1);
        assert_eq!(
            first.columns,
            vec![
                Some(ColumnValue::Int(42)),
                Some(ColumnValue::Text("hi".to_string())),
            ]
        );

        let second = analysis.cells[1].cell.as_ref().unwrap();
        assert_eq!(second.row_id, 2);
        assert_eq!(
            second.columns,
            vec![
                Some(ColumnValue::Int(7)),
                Some(ColumnValue::Text("abc".to_string())),
            ]
        );
    }

    #[test]
    fn test_non_leaf_pages_stop_at_classification() {
        for (byte, expected) in [
            (0x02u8, PageType::InteriorIndex),
            (0x05, PageType::InteriorTable),
            (0x0a, PageType::LeafIndex),
        ] {
            let mut page = vec![0u8; 512];
            page[0] = byte;
            BigEndian::write_u16(&mut page[PAGE_CELL_COUNT..], 3);
            let analysis = analyze_page(&page, 0);
            assert_eq!(analysis.page_type, expected);
            assert!(analysis.cells.is_empty());
        }
    }

    #[test]
    fn test_unknown_type_is_not_an_error() {
        let page = vec![0x42u8; 64];
        let analysis = analyze_page(&page, 0);
        assert_eq!(analysis.page_type, PageType::Unknown);
        assert_eq!(analysis.type_byte, Some(0x42));
        assert!(analysis.cells.is_empty());
    }

    #[test]
    fn test_interior_right_most_pointer() {
        let mut page = vec![0u8; 512];
        page[0] = PAGE_TYPE_INTERIOR_TABLE;
        BigEndian::write_u32(&mut page[PAGE_RIGHT_POINTER..], 17);
        let header = BtreePageHeader::parse(&page, 0).unwrap();
        assert_eq!(header.right_most_pointer, Some(17));

        let mut leaf = vec![0u8; 512];
        leaf[0] = PAGE_TYPE_LEAF_TABLE;
        let header = BtreePageHeader::parse(&leaf, 0).unwrap();
        assert_eq!(header.right_most_pointer, None);
    }

    #[test]
    fn test_out_of_range_pointer_skipped() {
        let mut page = vec![0u8; 1024];
        page[PAGE_TYPE_BYTE] = PAGE_TYPE_LEAF_TABLE;
        BigEndian::write_u16(&mut page[PAGE_CELL_COUNT..], 2);
        // First pointer far beyond the page, second valid.
        BigEndian::write_u16(&mut page[SIZE_LEAF_PAGE_HEADER..], 0x7fff);
        let cell = [0x03, 0x0b, 0x01];
        page[1000..1003].copy_from_slice(&cell);
        BigEndian::write_u16(&mut page[SIZE_LEAF_PAGE_HEADER + 2..], 1000);

        let analysis = analyze_page(&page, 0);
        assert_eq!(analysis.cells.len(), 2);
        assert!(!analysis.cells[0].in_bounds);
        assert!(analysis.cells[0].cell.is_none());
        assert!(analysis.cells[1].in_bounds);
        assert_eq!(analysis.cells[1].cell.as_ref().unwrap().row_id, 11);
    }

    #[test]
    fn test_cell_count_capped() {
        let mut page = vec![0u8; 4096];
        page[PAGE_TYPE_BYTE] = PAGE_TYPE_LEAF_TABLE;
        // Implausibly large declared count
        BigEndian::write_u16(&mut page[PAGE_CELL_COUNT..], 60000);
        let analysis = analyze_page(&page, 0);
        assert_eq!(analysis.cells.len(), MAX_CELLS_REPORTED);
        assert_eq!(analysis.declared_cell_count(), Some(60000));
    }

    #[test]
    fn test_truncated_pointer_array() {
        // Page cut off in the middle of the pointer array.
        let mut page = vec![0u8; SIZE_LEAF_PAGE_HEADER + 3];
        page[PAGE_TYPE_BYTE] = PAGE_TYPE_LEAF_TABLE;
        BigEndian::write_u16(&mut page[PAGE_CELL_COUNT..], 4);
        let analysis = analyze_page(&page, 0);
        // Only the first (complete) pointer entry is read.
        assert_eq!(analysis.cells.len(), 1);
    }

    #[test]
    fn test_header_offset_100_for_first_page() {
        let mut data = vec![0u8; 4096];
        data[100] = PAGE_TYPE_LEAF_TABLE;
        BigEndian::write_u16(&mut data[100 + PAGE_CELL_COUNT..], 1);
        let cell = [0x03, 0x2c, 0x01];
        data[2000..2003].copy_from_slice(&cell);
        BigEndian::write_u16(&mut data[100 + SIZE_LEAF_PAGE_HEADER..], 2000);

        let analysis = analyze_page(&data, 100);
        assert_eq!(analysis.page_type, PageType::LeafTable);
        assert_eq!(analysis.cells[0].cell.as_ref().unwrap().row_id, 44);
    }

    #[test]
    fn test_buffer_ending_before_type_byte() {
        let analysis = analyze_page(&[0u8; 50], 100);
        assert_eq!(analysis.type_byte, None);
        assert_eq!(analysis.page_type, PageType::Unknown);
        assert!(analysis.header.is_none());
    }
}
