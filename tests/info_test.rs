#![cfg(feature = "cli")]
//! Integration tests for `sqlt info`.

use byteorder::{BigEndian, ByteOrder};
use std::io::Write;
use tempfile::NamedTempFile;

use sq3::cli::info::{execute, InfoOptions};

const PAGE_SIZE: usize = 4096;

fn build_cell(row_id: u8, serial_codes: &[u8], body: &[u8]) -> Vec<u8> {
    let header_size = 1 + serial_codes.len() as u8;
    let mut cell = vec![header_size + body.len() as u8, row_id, header_size];
    cell.extend_from_slice(serial_codes);
    cell.extend_from_slice(body);
    cell
}

fn write_leaf_table_page(region: &mut [u8], header_offset: usize, cells: &[Vec<u8>]) {
    region[header_offset] = 0x0d;
    BigEndian::write_u16(&mut region[header_offset + 3..], cells.len() as u16);
    let mut next_free = region.len();
    for (i, cell) in cells.iter().enumerate() {
        next_free -= cell.len();
        region[next_free..next_free + cell.len()].copy_from_slice(cell);
        BigEndian::write_u16(&mut region[header_offset + 8 + i * 2..], next_free as u16);
    }
    BigEndian::write_u16(&mut region[header_offset + 5..], next_free as u16);
}

fn build_valid_db() -> Vec<u8> {
    let mut data = vec![0u8; PAGE_SIZE];
    data[..16].copy_from_slice(b"SQLite format 3\x00");
    BigEndian::write_u16(&mut data[16..], PAGE_SIZE as u16);
    let cell = build_cell(1, &[0x01, 0x11], &[0x2a, b'h', b'i']);
    write_leaf_table_page(&mut data, 100, &[cell]);
    data
}

fn write_db_file(data: &[u8]) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().expect("create temp file");
    tmp.write_all(data).expect("write");
    tmp.flush().expect("flush");
    tmp
}

fn run_info(path: &str, json: bool) -> String {
    colored::control::set_override(false);
    let mut out = Vec::new();
    execute(
        &InfoOptions {
            file: path.to_string(),
            json,
            mmap: false,
        },
        &mut out,
    )
    .expect("info should succeed");
    String::from_utf8(out).expect("utf-8 output")
}

#[test]
fn test_info_on_valid_file() {
    let tmp = write_db_file(&build_valid_db());
    let output = run_info(tmp.path().to_str().unwrap(), false);

    assert!(output.contains("SQLite header: PRESENT"));
    assert!(output.contains("Page size: 4096 bytes"));
    assert!(output.contains("Page type at offset 100: 0x0d (Leaf table)"));
    assert!(output.contains("Number of cells: 1"));
    assert!(output.contains("Parsing first cell (verbose):"));
    assert!(output.contains("Row ID: 1"));
    assert!(output.contains("Serial type: 1 (8-bit int (1 byte))"));
    assert!(output.contains("Serial type: 17 (TEXT (2 bytes))"));
    assert!(output.contains("Column 0: 42"));
    assert!(output.contains("Column 1: 'hi'"));
    assert!(output.contains("Parsed result: row id 1, 2 column(s)"));
}

#[test]
fn test_info_on_headerless_file() {
    let mut data = vec![0u8; 512];
    let cell = build_cell(9, &[0x08], &[]);
    write_leaf_table_page(&mut data, 0, &[cell]);
    let tmp = write_db_file(&data);

    let output = run_info(tmp.path().to_str().unwrap(), false);
    assert!(output.contains("SQLite header: MISSING or CORRUPTED"));
    assert!(output.contains("First 16 bytes: 0d0000000101fc"));
    assert!(output.contains("Page type at offset 0: 0x0d (Leaf table)"));
    assert!(output.contains("Row ID: 9"));
}

#[test]
fn test_info_on_non_leaf_first_page() {
    let mut data = build_valid_db();
    data[100] = 0x05; // interior table
    let tmp = write_db_file(&data);

    let output = run_info(tmp.path().to_str().unwrap(), false);
    assert!(output.contains("Page type at offset 100: 0x05 (Interior table)"));
    assert!(!output.contains("Parsing first cell"));
}

#[test]
fn test_info_on_garbage_page_type() {
    let mut data = build_valid_db();
    data[100] = 0x6f;
    let tmp = write_db_file(&data);

    let output = run_info(tmp.path().to_str().unwrap(), false);
    assert!(output.contains("Page type at offset 100: 0x6f (Unknown)"));
}

#[test]
fn test_info_on_tiny_truncated_file() {
    // 40 bytes of magic-less garbage: every section must still print.
    let tmp = write_db_file(&[0x41u8; 40]);
    let output = run_info(tmp.path().to_str().unwrap(), false);
    assert!(output.contains("Size: 40 bytes"));
    assert!(output.contains("MISSING or CORRUPTED"));
    assert!(output.contains("Page type at offset 0: 0x41 (Unknown)"));
}

#[test]
fn test_info_json_output() {
    let tmp = write_db_file(&build_valid_db());
    let output = run_info(tmp.path().to_str().unwrap(), true);

    let report: serde_json::Value = serde_json::from_str(&output).expect("valid JSON");
    assert_eq!(report["header_present"], true);
    assert_eq!(report["declared_page_size"], 4096);
    assert_eq!(report["page_count"], 1);
    assert_eq!(report["first_page"]["header_offset"], 100);
    let cells = report["first_page"]["cells"].as_array().unwrap();
    assert_eq!(cells.len(), 1);
    assert_eq!(cells[0]["cell"]["row_id"], 1);
}

#[test]
fn test_info_missing_file_fails() {
    colored::control::set_override(false);
    let mut out = Vec::new();
    let result = execute(
        &InfoOptions {
            file: "/nonexistent/file.db".to_string(),
            json: false,
            mmap: false,
        },
        &mut out,
    );
    assert!(result.is_err());
}
