//! Criterion benchmarks for sqlite3-utils core operations.
//!
//! Benchmarks cover:
//! - Varint decoding (1-byte and 9-byte forms)
//! - Cell parsing (parse_cell on a mixed-type record)
//! - Full page analysis (analyze_page on a populated leaf-table page)

use byteorder::{BigEndian, ByteOrder};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use sq3::sqlite::cell::parse_cell;
use sq3::sqlite::page::analyze_page;
use sq3::sqlite::varint::read_varint;

const PAGE_SIZE: usize = 4096;

/// Build a table-leaf cell image from single-byte-varint fields.
fn build_cell(row_id: u8, serial_codes: &[u8], body: &[u8]) -> Vec<u8> {
    let header_size = 1 + serial_codes.len() as u8;
    let mut cell = vec![header_size + body.len() as u8, row_id, header_size];
    cell.extend_from_slice(serial_codes);
    cell.extend_from_slice(body);
    cell
}

/// Build a leaf-table page populated with `n` copies of a mixed-type row.
fn build_leaf_page(n: usize) -> Vec<u8> {
    let mut page = vec![0u8; PAGE_SIZE];
    page[0] = 0x0d;
    BigEndian::write_u16(&mut page[3..], n as u16);

    let mut next_free = PAGE_SIZE;
    for i in 0..n {
        let body: Vec<u8> = {
            let mut b = vec![i as u8];
            b.extend_from_slice(b"payload");
            b
        };
        let cell = build_cell(i as u8 + 1, &[0x01, 0x1b], &body);
        next_free -= cell.len();
        page[next_free..next_free + cell.len()].copy_from_slice(&cell);
        BigEndian::write_u16(&mut page[8 + i * 2..], next_free as u16);
    }
    BigEndian::write_u16(&mut page[5..], next_free as u16);
    page
}

fn bench_varint(c: &mut Criterion) {
    let short = [0x2au8];
    let long = [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01];

    let mut group = c.benchmark_group("varint");
    group.bench_function("decode_1_byte", |b| {
        b.iter(|| read_varint(black_box(&short), 0))
    });
    group.bench_function("decode_9_bytes", |b| {
        b.iter(|| read_varint(black_box(&long), 0))
    });
    group.finish();
}

fn bench_parse_cell(c: &mut Criterion) {
    let cell = build_cell(7, &[0x01, 0x1b], b"\x2apayload");

    c.bench_function("parse_cell_mixed_row", |b| {
        b.iter(|| parse_cell(black_box(&cell), 0))
    });
}

fn bench_analyze_page(c: &mut Criterion) {
    let page = build_leaf_page(16);

    let mut group = c.benchmark_group("page");
    group.throughput(Throughput::Bytes(PAGE_SIZE as u64));
    group.bench_function("analyze_leaf_table_16_cells", |b| {
        b.iter(|| analyze_page(black_box(&page), 0))
    });
    group.finish();
}

criterion_group!(benches, bench_varint, bench_parse_cell, bench_analyze_page);
criterion_main!(benches);
