//! Table-leaf cell (record) parsing.
//!
//! A table-leaf cell is laid out as: payload-size varint, rowid varint,
//! record-header-size varint, serial-type varints until the header is
//! exhausted, then one column body per serial type. The header size counts
//! its own varint, so the header region starts where the header-size
//! varint starts.
//!
//! Parsing is maximally tolerant. A truncated record header keeps the
//! serial types already read; a failed column decode records an absent
//! value and moves on to the next declared column with the body offset
//! unchanged. When a column body is truncated mid-value this can misalign
//! every later column read in the same cell, yielding structurally valid
//! but garbage values. That trade is intentional: for a recovery tool,
//! partial rows beat no rows, and stricter parsing would change which
//! bytes are salvaged.

use serde::Serialize;

use crate::sqlite::serial::{decode_value, ColumnValue, SerialType};
use crate::sqlite::varint::read_varint;

/// One parsed table-leaf cell: a row id plus its column values.
#[derive(Debug, Clone, Serialize)]
pub struct Cell {
    /// Row id from the cell's rowid varint.
    pub row_id: u64,
    /// Declared payload size. Informational only; it does not bound
    /// column decoding.
    pub payload_size: u64,
    /// Declared record-header size in bytes (including its own varint).
    pub header_size: u64,
    /// Serial types read from the record header, in column order.
    pub serial_types: Vec<SerialType>,
    /// One entry per serial type. `None` marks a column whose bytes could
    /// not be decoded; `Some(ColumnValue::Null)` is SQL NULL.
    pub columns: Vec<Option<ColumnValue>>,
}

/// Parse a table-leaf cell starting at `offset`.
///
/// Returns `None` only when the leading varints (payload size, row id,
/// header size) cannot be decoded at all — the minimum needed to make
/// forward progress. Anything recoverable after that point is kept, with
/// gaps represented as absent column values.
///
/// # Examples
///
/// ```
/// use sq3::sqlite::cell::parse_cell;
/// use sq3::sqlite::serial::ColumnValue;
///
/// // payload=5, rowid=7, header [2 bytes: size=2, serial type 1], body 0x2A
/// let data = [0x05, 0x07, 0x02, 0x01, 0x2a];
/// let cell = parse_cell(&data, 0).unwrap();
/// assert_eq!(cell.row_id, 7);
/// assert_eq!(cell.columns, vec![Some(ColumnValue::Int(42))]);
/// ```
pub fn parse_cell(data: &[u8], offset: usize) -> Option<Cell> {
    let (payload_size, pos) = read_varint(data, offset);
    let payload_size = payload_size?;

    let (row_id, pos) = read_varint(data, pos);
    let row_id = row_id?;

    // The header region begins at the header-size varint and spans
    // `header_size` bytes, its own varint included.
    let header_origin = pos;
    let (header_size, serials_start) = read_varint(data, pos);
    let header_size = header_size?;
    let header_end = header_origin.saturating_add(header_size as usize);

    let mut serial_types = Vec::new();
    let mut current = serials_start;
    while current < header_end {
        let (code, next) = read_varint(data, current);
        match code {
            Some(code) => serial_types.push(SerialType::from_code(code)),
            // Truncated header: keep the serial types collected so far.
            None => break,
        }
        current = next;
    }

    let mut columns = Vec::with_capacity(serial_types.len());
    let mut body = header_end;
    for &serial_type in &serial_types {
        let (value, next) = decode_value(serial_type, data, body);
        columns.push(value);
        body = next;
    }

    Some(Cell {
        row_id,
        payload_size,
        header_size,
        serial_types,
        columns,
    })
}
