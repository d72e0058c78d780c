//! SQLite file forensic analysis toolkit.
//!
//! The `sqlite3-utils` crate (library name `sq3`) provides Rust types and
//! functions for decoding and inspecting SQLite database files, including
//! files that are truncated or corrupted. The decoder is strictly read-only
//! and never assumes the file is well-formed: every read is bounds-checked,
//! and missing or malformed bytes are reported as absent values instead of
//! aborting the analysis.
//!
//! # CLI Reference
//!
//! Install the `sqlt` binary and use its subcommands to inspect SQLite
//! files from the command line.
//!
//! ## Subcommands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | [`sqlt info`](cli::app::Commands::Info) | Top-level diagnostic report (header, page size, first-page cells) |
//! | [`sqlt cells`](cli::app::Commands::Cells) | Decode table-leaf cells (row ids and column values) from a page |
//! | [`sqlt scan`](cli::app::Commands::Scan) | Classify every page and print a page-type summary |
//! | [`sqlt dump`](cli::app::Commands::Dump) | Hex dump of raw bytes by page number or absolute offset |
//!
//! ## Global options
//!
//! All subcommands accept `--color <auto|always|never>`, `--output <file>`,
//! and `--mmap`. Most subcommands also accept `--json` for machine-readable
//! output.
//!
//! # Library API
//!
//! ## Quick example
//!
//! ```no_run
//! use sq3::sqlite::dbfile::DbFile;
//! use sq3::sqlite::page::analyze_page;
//!
//! // Load the whole file into one immutable buffer
//! let db = DbFile::open("damaged.db").unwrap();
//!
//! // Analyze the first page (header offset 100 when the magic is present)
//! let analysis = analyze_page(db.as_bytes(), db.first_header_offset());
//! println!("Page type: {}", analysis.page_type.name());
//! for slot in &analysis.cells {
//!     if let Some(cell) = &slot.cell {
//!         println!("row {} has {} columns", cell.row_id, cell.columns.len());
//!     }
//! }
//! ```
//!
//! ## Module overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`sqlite::dbfile`] | File I/O, magic detection, declared page size, page slicing |
//! | [`sqlite::varint`] | The 1-9 byte variable-length integer encoding |
//! | [`sqlite::serial`] | Serial-type classification and column value decoding |
//! | [`sqlite::cell`] | Table-leaf cell (record) parsing |
//! | [`sqlite::page`] | B-tree page classification and cell-pointer traversal |
//! | [`sqlite::constants`] | File and page structure constants |
//! | [`util::hex`] | Hex dump formatting |

#[cfg(feature = "cli")]
pub mod cli;
pub mod sqlite;
pub mod util;

use thiserror::Error;

/// Errors returned by `sq3` operations.
///
/// The decoder core never produces these: inside the parsing layer all
/// failure is represented as absent values. `Sq3Error` covers the outer
/// shell only (file access and argument validation), the single class of
/// conditions that aborts a run.
#[derive(Error, Debug)]
pub enum Sq3Error {
    /// An I/O error occurred (file open, read, or write failure).
    #[error("I/O error: {0}")]
    Io(String),

    /// A parse error occurred outside the tolerant decoder core.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An invalid argument was supplied (out-of-range page number, bad offset, etc.).
    #[error("Invalid argument: {0}")]
    Argument(String),
}
