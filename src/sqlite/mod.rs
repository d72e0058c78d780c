//! SQLite binary format parsing.
//!
//! This module contains types and functions for reading the on-disk
//! structures of SQLite database files: the 100-byte file header, B-tree
//! page headers, cell-pointer arrays, table-leaf cells (records), the
//! varint encoding, and the per-column serial-type encoding.
//!
//! Every decoder in this module is tolerant by construction. The input may
//! be truncated mid-structure or contain arbitrary garbage; decoders report
//! what they could not read as absent values and keep whatever partial
//! structure was recovered. Nothing in this module panics on malformed
//! input or touches the filesystem.
//!
//! Start with [`dbfile::DbFile`] to load a file, then use
//! [`page::analyze_page`] to classify a page and extract its cells.

pub mod cell;
pub mod constants;
pub mod dbfile;
pub mod page;
pub mod serial;
pub mod varint;
