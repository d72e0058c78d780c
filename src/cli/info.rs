use std::io::Write;

use colored::Colorize;
use serde::Serialize;

use crate::cli::cells::write_cell_trace;
use crate::cli::{open_dbfile, wprintln};
use crate::sqlite::dbfile::DbFile;
use crate::sqlite::page::{analyze_page, PageAnalysis};
use crate::util::hex::{format_bytes, format_offset, hex_dump};
use crate::Sq3Error;

/// Options for the info subcommand.
pub struct InfoOptions {
    pub file: String,
    pub json: bool,
    pub mmap: bool,
}

/// JSON-serializable top-level report.
#[derive(Serialize)]
struct InfoReport<'a> {
    file: &'a str,
    file_size: u64,
    header_present: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    declared_page_size: Option<u16>,
    effective_page_size: u32,
    page_count: u64,
    /// First 16 bytes in hex, reported when the magic is absent so the
    /// header can be inspected manually.
    #[serde(skip_serializing_if = "Option::is_none")]
    leading_bytes: Option<String>,
    first_page: &'a PageAnalysis,
}

/// Analyze a possibly damaged database file and print the top-level
/// diagnostic report.
///
/// The report covers the file size, the header-presence verdict (with the
/// first 16 bytes in hex when the magic identifier is absent), the
/// declared page size, a hex dump of the leading 128 bytes, the first
/// page's classification, and — for a table-leaf first page — the cell
/// count, the cell-pointer validity list, and a full decode trace of the
/// first cell.
///
/// Every section degrades gracefully: a truncated or garbage region is
/// reported as such and the remaining sections still print.
pub fn execute(opts: &InfoOptions, writer: &mut dyn Write) -> Result<(), Sq3Error> {
    let db = open_dbfile(&opts.file, opts.mmap)?;
    let data = db.as_bytes();
    let analysis = analyze_page(data, db.first_header_offset());

    if opts.json {
        return execute_json(opts, &db, &analysis, writer);
    }

    wprintln!(writer, "File: {}", opts.file)?;
    wprintln!(writer, "Size: {} bytes", db.file_size())?;
    wprintln!(
        writer,
        "Pages: {} (page size {})",
        db.page_count(),
        db.page_size()
    )?;
    wprintln!(writer)?;

    if db.has_magic() {
        wprintln!(writer, "SQLite header: {}", "PRESENT".green())?;
        match db.declared_page_size() {
            Some(ps) => wprintln!(writer, "Page size: {} bytes", ps)?,
            None => wprintln!(writer, "Page size: {}", "unreadable (truncated header)".red())?,
        }
    } else {
        wprintln!(writer, "SQLite header: {}", "MISSING or CORRUPTED".red())?;
        let lead = &data[..data.len().min(16)];
        wprintln!(writer, "First 16 bytes: {}", format_bytes(lead))?;
    }
    wprintln!(writer)?;

    let lead_len = data.len().min(128);
    if lead_len > 0 {
        wprintln!(writer, "First {} bytes:", lead_len)?;
        wprintln!(writer, "{}", hex_dump(&data[..lead_len], 0))?;
        wprintln!(writer)?;
    }

    write_page_section(writer, data, &analysis)?;

    Ok(())
}

fn execute_json(
    opts: &InfoOptions,
    db: &DbFile,
    analysis: &PageAnalysis,
    writer: &mut dyn Write,
) -> Result<(), Sq3Error> {
    let data = db.as_bytes();
    let leading_bytes = if db.has_magic() {
        None
    } else {
        Some(format_bytes(&data[..data.len().min(16)]))
    };

    let report = InfoReport {
        file: &opts.file,
        file_size: db.file_size(),
        header_present: db.has_magic(),
        declared_page_size: db.declared_page_size(),
        effective_page_size: db.page_size(),
        page_count: db.page_count(),
        leading_bytes,
        first_page: analysis,
    };
    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| Sq3Error::Parse(format!("JSON serialization error: {}", e)))?;
    wprintln!(writer, "{}", json)?;
    Ok(())
}

/// Print the first-page classification, pointer list, and first-cell trace.
fn write_page_section(
    writer: &mut dyn Write,
    data: &[u8],
    analysis: &PageAnalysis,
) -> Result<(), Sq3Error> {
    let Some(type_byte) = analysis.type_byte else {
        wprintln!(
            writer,
            "Page type at offset {}: {}",
            analysis.header_offset,
            "unreadable (file ends before the page header)".red()
        )?;
        return Ok(());
    };

    wprintln!(
        writer,
        "Page type at offset {}: 0x{:02x} ({})",
        analysis.header_offset,
        type_byte,
        analysis.page_type.name()
    )?;

    if !analysis.page_type.is_leaf_table() {
        if let Some(header) = &analysis.header {
            if let Some(right) = header.right_most_pointer {
                wprintln!(writer, "Right-most child page: {}", right)?;
            }
        }
        return Ok(());
    }

    match analysis.declared_cell_count() {
        Some(count) => wprintln!(writer, "Number of cells: {}", count)?,
        None => {
            wprintln!(writer, "Number of cells: {}", "unreadable".red())?;
            return Ok(());
        }
    }

    wprintln!(writer)?;
    wprintln!(writer, "Cell pointers:")?;
    for slot in &analysis.cells {
        let verdict = if slot.in_bounds {
            "valid".to_string()
        } else {
            "INVALID".red().to_string()
        };
        wprintln!(
            writer,
            "  Cell {}: offset {} ({})",
            slot.index,
            format_offset(u64::from(slot.pointer)),
            verdict
        )?;
    }

    if let Some(slot) = analysis.cells.first() {
        if let Some(cell) = &slot.cell {
            wprintln!(writer)?;
            wprintln!(writer, "Parsing first cell (verbose):")?;
            write_cell_trace(writer, data, slot.pointer as usize, cell)?;
            wprintln!(writer)?;
            wprintln!(
                writer,
                "Parsed result: row id {}, {} column(s)",
                cell.row_id,
                cell.columns.len()
            )?;
        }
    }

    Ok(())
}
