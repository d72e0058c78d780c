//! Serial-type classification and column value decoding.
//!
//! Each column in a record is stored under a serial-type code taken from
//! the record header. Codes 0-9 are fixed-width (NULL, signed integers of
//! 1/2/3/4/6/8 bytes, an 8-byte float, and the zero-byte constants 0 and
//! 1). Codes >= 12 with even parity are BLOBs of length `(code-12)/2`;
//! codes >= 13 with odd parity are TEXT of length `(code-13)/2`. Codes 10
//! and 11 are reserved and decode to nothing.
//!
//! Decoding never fails hard: insufficient bytes or a reserved code yield
//! an absent value with the offset left unchanged.

use std::fmt;

use byteorder::{BigEndian, ByteOrder};
use serde::Serialize;

use crate::util::hex::format_bytes;

/// A classified serial-type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SerialType {
    /// SQL NULL (code 0, 0 bytes).
    Null,
    /// 8-bit signed integer (code 1).
    Int1,
    /// 16-bit signed integer (code 2).
    Int2,
    /// 24-bit signed integer (code 3).
    Int3,
    /// 32-bit signed integer (code 4).
    Int4,
    /// 48-bit signed integer (code 5).
    Int6,
    /// 64-bit signed integer (code 6).
    Int8,
    /// 64-bit IEEE 754 float (code 7).
    Float8,
    /// Integer constant 0 (code 8, 0 bytes).
    Zero,
    /// Integer constant 1 (code 9, 0 bytes).
    One,
    /// BLOB of the given byte length (even codes >= 12).
    Blob(usize),
    /// TEXT of the given byte length (odd codes >= 13).
    Text(usize),
    /// Reserved or out-of-range code (10, 11).
    Unknown(u64),
}

impl SerialType {
    /// Classify a raw serial-type code.
    ///
    /// # Examples
    ///
    /// ```
    /// use sq3::sqlite::serial::SerialType;
    ///
    /// assert_eq!(SerialType::from_code(0), SerialType::Null);
    /// assert_eq!(SerialType::from_code(1), SerialType::Int1);
    /// assert_eq!(SerialType::from_code(12), SerialType::Blob(0));
    /// assert_eq!(SerialType::from_code(23), SerialType::Text(5));
    /// assert_eq!(SerialType::from_code(10), SerialType::Unknown(10));
    /// ```
    pub fn from_code(code: u64) -> Self {
        match code {
            0 => SerialType::Null,
            1 => SerialType::Int1,
            2 => SerialType::Int2,
            3 => SerialType::Int3,
            4 => SerialType::Int4,
            5 => SerialType::Int6,
            6 => SerialType::Int8,
            7 => SerialType::Float8,
            8 => SerialType::Zero,
            9 => SerialType::One,
            c if c >= 12 && c % 2 == 0 => SerialType::Blob(((c - 12) / 2) as usize),
            c if c >= 13 && c % 2 == 1 => SerialType::Text(((c - 13) / 2) as usize),
            c => SerialType::Unknown(c),
        }
    }

    /// The raw on-disk code for this serial type.
    pub fn code(self) -> u64 {
        match self {
            SerialType::Null => 0,
            SerialType::Int1 => 1,
            SerialType::Int2 => 2,
            SerialType::Int3 => 3,
            SerialType::Int4 => 4,
            SerialType::Int6 => 5,
            SerialType::Int8 => 6,
            SerialType::Float8 => 7,
            SerialType::Zero => 8,
            SerialType::One => 9,
            SerialType::Blob(len) => 12 + 2 * len as u64,
            SerialType::Text(len) => 13 + 2 * len as u64,
            SerialType::Unknown(c) => c,
        }
    }

    /// The number of body bytes this serial type occupies.
    pub fn width(self) -> usize {
        match self {
            SerialType::Null | SerialType::Zero | SerialType::One | SerialType::Unknown(_) => 0,
            SerialType::Int1 => 1,
            SerialType::Int2 => 2,
            SerialType::Int3 => 3,
            SerialType::Int4 => 4,
            SerialType::Int6 => 6,
            SerialType::Int8 | SerialType::Float8 => 8,
            SerialType::Blob(len) | SerialType::Text(len) => len,
        }
    }

    /// Human-readable description used in decode traces.
    pub fn describe(self) -> String {
        match self {
            SerialType::Null => "NULL".to_string(),
            SerialType::Int1 => "8-bit int (1 byte)".to_string(),
            SerialType::Int2 => "16-bit int (2 bytes)".to_string(),
            SerialType::Int3 => "24-bit int (3 bytes)".to_string(),
            SerialType::Int4 => "32-bit int (4 bytes)".to_string(),
            SerialType::Int6 => "48-bit int (6 bytes)".to_string(),
            SerialType::Int8 => "64-bit int (8 bytes)".to_string(),
            SerialType::Float8 => "64-bit float (8 bytes)".to_string(),
            SerialType::Zero => "Integer 0 (0 bytes)".to_string(),
            SerialType::One => "Integer 1 (0 bytes)".to_string(),
            SerialType::Blob(len) => format!("BLOB ({} bytes)", len),
            SerialType::Text(len) => format!("TEXT ({} bytes)", len),
            SerialType::Unknown(c) => format!("Unknown ({})", c),
        }
    }
}

/// A decoded column value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColumnValue {
    /// SQL NULL.
    Null,
    /// Signed integer (any of the 1/2/3/4/6/8-byte widths, or a constant).
    Int(i64),
    /// Double-precision float.
    Float(f64),
    /// Text. Decoded as UTF-8 when valid, otherwise each byte maps to the
    /// Unicode code point of equal value so no information is lost.
    Text(String),
    /// Raw BLOB bytes.
    Blob(Vec<u8>),
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnValue::Null => write!(f, "NULL"),
            ColumnValue::Int(v) => write!(f, "{}", v),
            ColumnValue::Float(v) => write!(f, "{}", v),
            ColumnValue::Text(s) => write!(f, "'{}'", s),
            ColumnValue::Blob(b) => write!(f, "x'{}'", format_bytes(b)),
        }
    }
}

/// Decode one column value from `data` at `offset`.
///
/// Returns the value and the offset of the first byte after it. On
/// insufficient bytes or a reserved serial type, the value is `None` and
/// the returned offset equals the input `offset` (no partial consumption).
///
/// # Examples
///
/// ```
/// use sq3::sqlite::serial::{decode_value, ColumnValue, SerialType};
///
/// let data = [0xff];
/// assert_eq!(
///     decode_value(SerialType::Int1, &data, 0),
///     (Some(ColumnValue::Int(-1)), 1)
/// );
///
/// // NULL consumes nothing, regardless of buffer content
/// assert_eq!(
///     decode_value(SerialType::Null, &data, 0),
///     (Some(ColumnValue::Null), 0)
/// );
/// ```
pub fn decode_value(
    serial_type: SerialType,
    data: &[u8],
    offset: usize,
) -> (Option<ColumnValue>, usize) {
    match serial_type {
        SerialType::Null => (Some(ColumnValue::Null), offset),
        SerialType::Zero => (Some(ColumnValue::Int(0)), offset),
        SerialType::One => (Some(ColumnValue::Int(1)), offset),

        SerialType::Int1 => match take(data, offset, 1) {
            Some(bytes) => (Some(ColumnValue::Int(i64::from(bytes[0] as i8))), offset + 1),
            None => (None, offset),
        },
        SerialType::Int2 => match take(data, offset, 2) {
            Some(bytes) => (
                Some(ColumnValue::Int(i64::from(BigEndian::read_i16(bytes)))),
                offset + 2,
            ),
            None => (None, offset),
        },
        // 24- and 48-bit integers have no native width; sign-extend by hand.
        SerialType::Int3 => match take(data, offset, 3) {
            Some(bytes) => (Some(ColumnValue::Int(read_int_be(bytes))), offset + 3),
            None => (None, offset),
        },
        SerialType::Int4 => match take(data, offset, 4) {
            Some(bytes) => (
                Some(ColumnValue::Int(i64::from(BigEndian::read_i32(bytes)))),
                offset + 4,
            ),
            None => (None, offset),
        },
        SerialType::Int6 => match take(data, offset, 6) {
            Some(bytes) => (Some(ColumnValue::Int(read_int_be(bytes))), offset + 6),
            None => (None, offset),
        },
        SerialType::Int8 => match take(data, offset, 8) {
            Some(bytes) => (
                Some(ColumnValue::Int(BigEndian::read_i64(bytes))),
                offset + 8,
            ),
            None => (None, offset),
        },
        SerialType::Float8 => match take(data, offset, 8) {
            Some(bytes) => (
                Some(ColumnValue::Float(BigEndian::read_f64(bytes))),
                offset + 8,
            ),
            None => (None, offset),
        },

        SerialType::Blob(len) => match take(data, offset, len) {
            Some(bytes) => (Some(ColumnValue::Blob(bytes.to_vec())), offset + len),
            None => (None, offset),
        },
        SerialType::Text(len) => match take(data, offset, len) {
            Some(bytes) => (Some(ColumnValue::Text(decode_text(bytes))), offset + len),
            None => (None, offset),
        },

        SerialType::Unknown(_) => (None, offset),
    }
}

/// Bounds-checked slice of `len` bytes at `offset`.
fn take(data: &[u8], offset: usize, len: usize) -> Option<&[u8]> {
    let end = offset.checked_add(len)?;
    if end > data.len() {
        return None;
    }
    Some(&data[offset..end])
}

/// Big-endian two's-complement read for the 3- and 6-byte widths.
fn read_int_be(bytes: &[u8]) -> i64 {
    let mut value: u64 = 0;
    for &b in bytes {
        value = value << 8 | u64::from(b);
    }
    let bits = bytes.len() * 8;
    if bits < 64 && value & (1 << (bits - 1)) != 0 {
        value |= u64::MAX << bits;
    }
    value as i64
}

/// UTF-8 with a byte-preserving single-byte fallback.
fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}
