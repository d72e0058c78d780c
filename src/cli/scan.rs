use std::collections::HashMap;
use std::io::Write;

use colored::Colorize;
use serde::Serialize;

use crate::cli::{create_progress_bar, open_dbfile, wprintln};
use crate::sqlite::page::{analyze_page, PageType};
use crate::Sq3Error;

/// Options for the scan subcommand.
pub struct ScanOptions {
    pub file: String,
    pub no_unknown: bool,
    pub page_size: Option<u32>,
    pub json: bool,
    pub mmap: bool,
}

/// JSON-serializable per-page classification.
#[derive(Serialize)]
struct PageJson {
    page_number: u64,
    byte_start: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    type_byte: Option<u8>,
    page_type: PageType,
    page_type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    cell_count: Option<u16>,
}

/// Classify every fixed-size page in the file and print a summary.
///
/// Pages are sliced by the effective page size (declared in the header
/// when plausible, the default otherwise, or the `--page-size` override)
/// and classified individually; the first page's B-tree header sits at
/// byte 100 when the file header is present. Cell counts are shown for
/// table-leaf pages. Garbage and zero-filled pages classify as Unknown
/// rather than stopping the scan.
pub fn execute(opts: &ScanOptions, writer: &mut dyn Write) -> Result<(), Sq3Error> {
    let mut db = open_dbfile(&opts.file, opts.mmap)?;
    if let Some(ps) = opts.page_size {
        if ps == 0 {
            return Err(Sq3Error::Argument("Page size must be nonzero".to_string()));
        }
        db.set_page_size(ps);
    }

    let page_count = db.page_count();

    if opts.json {
        let mut pages = Vec::new();
        for page_no in 0..page_count {
            let Some(slice) = db.page_slice(page_no) else {
                break;
            };
            let analysis = analyze_page(slice, db.header_offset_for(page_no));
            if opts.no_unknown && analysis.page_type == PageType::Unknown {
                continue;
            }
            pages.push(PageJson {
                page_number: page_no,
                byte_start: page_no * u64::from(db.page_size()),
                type_byte: analysis.type_byte,
                page_type: analysis.page_type,
                page_type_name: analysis.page_type.name().to_string(),
                cell_count: if analysis.page_type.is_leaf_table() {
                    analysis.declared_cell_count()
                } else {
                    None
                },
            });
        }
        let json = serde_json::to_string_pretty(&pages)
            .map_err(|e| Sq3Error::Parse(format!("JSON serialization error: {}", e)))?;
        wprintln!(writer, "{}", json)?;
        return Ok(());
    }

    wprintln!(
        writer,
        "Pages in {} ({} pages, page size {}):",
        opts.file,
        page_count,
        db.page_size()
    )?;
    wprintln!(writer, "{}", "-".repeat(50))?;

    let mut type_counts: HashMap<PageType, u64> = HashMap::new();
    let pb = create_progress_bar(page_count, "pages");

    for page_no in 0..page_count {
        pb.inc(1);
        let Some(slice) = db.page_slice(page_no) else {
            break;
        };
        let analysis = analyze_page(slice, db.header_offset_for(page_no));
        *type_counts.entry(analysis.page_type).or_insert(0) += 1;

        if opts.no_unknown && analysis.page_type == PageType::Unknown {
            continue;
        }

        match analysis.type_byte {
            Some(byte) if analysis.page_type.is_leaf_table() => wprintln!(
                writer,
                "Page {}: 0x{:02x} {} ({} cells)",
                page_no,
                byte,
                analysis.page_type.name(),
                analysis
                    .declared_cell_count()
                    .map_or("?".to_string(), |c| c.to_string())
            )?,
            Some(byte) => wprintln!(
                writer,
                "Page {}: 0x{:02x} {}",
                page_no,
                byte,
                analysis.page_type.name()
            )?,
            None => wprintln!(writer, "Page {}: truncated before the page header", page_no)?,
        }
    }

    pb.finish_and_clear();

    wprintln!(writer)?;
    wprintln!(writer, "{}", "Page Type Summary".bold())?;
    let mut sorted_types: Vec<_> = type_counts.iter().collect();
    sorted_types.sort_by(|a, b| b.1.cmp(a.1));
    for (page_type, count) in sorted_types {
        let label = if *count == 1 { "page" } else { "pages" };
        wprintln!(writer, "  {:20} {:>6} {}", page_type.name(), count, label)?;
    }

    Ok(())
}
