use std::io::Write;

use colored::Colorize;

use crate::cli::{open_dbfile, wprintln};
use crate::sqlite::cell::Cell;
use crate::sqlite::page::{analyze_page, CellSlot, PageAnalysis};
use crate::util::hex::{format_offset, hex_dump};
use crate::Sq3Error;

/// Options for the cells subcommand.
pub struct CellsOptions {
    pub file: String,
    pub page: Option<u64>,
    pub limit: Option<usize>,
    pub verbose: bool,
    pub json: bool,
    pub mmap: bool,
}

/// Decode table-leaf cells from one page and print row ids and column
/// values.
///
/// Page 0 is analyzed against the whole buffer with the B-tree header at
/// offset 100 (or 0 when the file header is missing), so cells pointing
/// past the nominal page boundary are still recovered. Later pages are
/// analyzed as fixed-size slices with page-relative cell pointers.
///
/// Non-leaf-table pages report their classification and stop; that is a
/// normal outcome, not an error.
pub fn execute(opts: &CellsOptions, writer: &mut dyn Write) -> Result<(), Sq3Error> {
    let db = open_dbfile(&opts.file, opts.mmap)?;
    let page_no = opts.page.unwrap_or(0);

    let analysis = if page_no == 0 {
        analyze_page(db.as_bytes(), db.first_header_offset())
    } else {
        let slice = db.page_slice(page_no).ok_or_else(|| {
            Sq3Error::Argument(format!(
                "Page {} is beyond the end of the file ({} pages)",
                page_no,
                db.page_count()
            ))
        })?;
        analyze_page(slice, 0)
    };

    let shown = opts.limit.unwrap_or(analysis.cells.len());

    if opts.json {
        return execute_json(&analysis, shown, writer);
    }

    wprintln!(
        writer,
        "Page {} of {}: {}",
        page_no,
        opts.file,
        analysis.page_type.name().bold()
    )?;

    if !analysis.page_type.is_leaf_table() {
        wprintln!(
            writer,
            "Not a table leaf page; no cells to decode ({}).",
            analysis.page_type.description()
        )?;
        return Ok(());
    }

    wprintln!(
        writer,
        "Cells: {} declared, {} decoded",
        analysis
            .declared_cell_count()
            .map_or("?".to_string(), |c| c.to_string()),
        analysis.parsed_cell_count()
    )?;
    wprintln!(writer)?;

    let base = if page_no == 0 {
        db.as_bytes()
    } else {
        db.page_slice(page_no).unwrap_or_default()
    };

    for slot in analysis.cells.iter().take(shown) {
        write_cell_slot(writer, base, slot, opts.verbose)?;
    }

    if shown < analysis.cells.len() {
        wprintln!(
            writer,
            "... {} more cell(s) not shown",
            analysis.cells.len() - shown
        )?;
    }

    Ok(())
}

fn execute_json(
    analysis: &PageAnalysis,
    shown: usize,
    writer: &mut dyn Write,
) -> Result<(), Sq3Error> {
    let slots: Vec<&CellSlot> = analysis.cells.iter().take(shown).collect();
    let json = serde_json::to_string_pretty(&slots)
        .map_err(|e| Sq3Error::Parse(format!("JSON serialization error: {}", e)))?;
    wprintln!(writer, "{}", json)?;
    Ok(())
}

/// Print one cell-pointer slot: outcome line plus column values.
fn write_cell_slot(
    writer: &mut dyn Write,
    data: &[u8],
    slot: &CellSlot,
    verbose: bool,
) -> Result<(), Sq3Error> {
    if !slot.in_bounds {
        wprintln!(
            writer,
            "Cell {} at offset {}: {}",
            slot.index,
            format_offset(u64::from(slot.pointer)),
            "out of range, skipped".red()
        )?;
        return Ok(());
    }

    let Some(cell) = &slot.cell else {
        wprintln!(
            writer,
            "Cell {} at offset {}: {}",
            slot.index,
            format_offset(u64::from(slot.pointer)),
            "could not decode leading varints".red()
        )?;
        return Ok(());
    };

    if verbose {
        write_cell_trace(writer, data, slot.pointer as usize, cell)?;
        return Ok(());
    }

    wprintln!(
        writer,
        "Cell {} at offset {}: row id {}, {} column(s)",
        slot.index,
        format_offset(u64::from(slot.pointer)),
        cell.row_id,
        cell.columns.len()
    )?;
    for (i, (serial_type, value)) in cell.serial_types.iter().zip(&cell.columns).enumerate() {
        match value {
            Some(v) => wprintln!(writer, "  [{}] {}: {}", i, serial_type.describe(), v)?,
            None => wprintln!(
                writer,
                "  [{}] {}: {}",
                i,
                serial_type.describe(),
                "<undecodable>".red()
            )?,
        }
    }
    Ok(())
}

/// Full decode trace of one cell: raw bytes, record varints, serial types,
/// and column values. Also used by `sqlt info` for the first-cell trace.
pub(crate) fn write_cell_trace(
    writer: &mut dyn Write,
    data: &[u8],
    offset: usize,
    cell: &Cell,
) -> Result<(), Sq3Error> {
    wprintln!(
        writer,
        "=== Cell at offset {} ===",
        format_offset(offset as u64)
    )?;

    let dump_end = offset.saturating_add(32).min(data.len());
    if offset < dump_end {
        wprintln!(writer, "{}", hex_dump(&data[offset..dump_end], offset as u64))?;
    }

    wprintln!(writer, "Payload size: {}", cell.payload_size)?;
    wprintln!(writer, "Row ID: {}", cell.row_id)?;
    wprintln!(writer, "Header size: {} bytes", cell.header_size)?;
    for serial_type in &cell.serial_types {
        wprintln!(
            writer,
            "  Serial type: {} ({})",
            serial_type.code(),
            serial_type.describe()
        )?;
    }
    for (i, value) in cell.columns.iter().enumerate() {
        match value {
            Some(v) => wprintln!(writer, "  Column {}: {}", i, v)?,
            None => wprintln!(writer, "  Column {}: {}", i, "<undecodable>".red())?,
        }
    }
    Ok(())
}
