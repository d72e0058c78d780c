//! CLI subcommand implementations for the `sqlt` binary.
//!
//! Argument parsing uses clap derive macros, with the top-level
//! [`app::Cli`] struct and [`app::Commands`] enum defined in [`app`].
//!
//! Each subcommand module follows the same pattern: an `Options` struct
//! holding the parsed arguments and a
//! `pub fn execute(opts, writer) -> Result<(), Sq3Error>` entry point. The
//! `writer: &mut dyn Write` parameter allows output to be captured in
//! tests or redirected to a file via the global `--output` flag.
//!
//! # Subcommands
//!
//! | Command | Module | Purpose |
//! |---------|--------|---------|
//! | `sqlt info` | [`info`] | Top-level diagnostic report of a possibly damaged file |
//! | `sqlt cells` | [`cells`] | Decode table-leaf cells from one page |
//! | `sqlt scan` | [`scan`] | Classify every page and summarize page types |
//! | `sqlt dump` | [`dump`] | Hex dump by page number or absolute offset |
//!
//! # Common patterns
//!
//! - **`--json`** — structured output via `#[derive(Serialize)]` structs
//!   and `serde_json`.
//! - **`--color`** (global) — `auto`, `always`, or `never`.
//! - **`--output` / `-o`** (global) — redirect output to a file.
//! - **`--mmap`** (global) — memory-map the input instead of reading it
//!   into the heap.
//!
//! The `wprintln!` macro wraps `writeln!` to convert `io::Error` into
//! `Sq3Error`.

pub mod app;
pub mod cells;
pub mod dump;
pub mod info;
pub mod scan;

/// Write a line to the given writer, converting io::Error to Sq3Error.
macro_rules! wprintln {
    ($w:expr) => {
        writeln!($w).map_err(|e| $crate::Sq3Error::Io(e.to_string()))
    };
    ($w:expr, $($arg:tt)*) => {
        writeln!($w, $($arg)*).map_err(|e| $crate::Sq3Error::Io(e.to_string()))
    };
}

pub(crate) use wprintln;

use crate::sqlite::dbfile::DbFile;
use crate::Sq3Error;
use indicatif::{ProgressBar, ProgressStyle};

/// Open a database file, selecting mmap or a heap read based on the flag.
pub(crate) fn open_dbfile(path: &str, use_mmap: bool) -> Result<DbFile, Sq3Error> {
    if use_mmap {
        DbFile::open_mmap(path)
    } else {
        DbFile::open(path)
    }
}

/// Create a styled progress bar for iterating over pages.
pub(crate) fn create_progress_bar(count: u64, unit: &str) -> ProgressBar {
    let pb = ProgressBar::new(count);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{eta}})",
                unit
            ))
            .unwrap()
            .progress_chars("#>-"),
    );
    pb
}
