use std::io::Write;

use crate::cli::{open_dbfile, wprintln};
use crate::util::hex::hex_dump;
use crate::Sq3Error;

/// Options for the dump subcommand.
pub struct DumpOptions {
    pub file: String,
    pub page: Option<u64>,
    pub offset: Option<u64>,
    pub length: Option<usize>,
    pub raw: bool,
    pub mmap: bool,
}

const DEFAULT_OFFSET_DUMP_LEN: usize = 256;

/// Hex dump raw bytes from the file, by page number or absolute offset.
pub fn execute(opts: &DumpOptions, writer: &mut dyn Write) -> Result<(), Sq3Error> {
    let db = open_dbfile(&opts.file, opts.mmap)?;
    let data = db.as_bytes();

    if let Some(offset) = opts.offset {
        // Absolute offset mode
        if offset >= db.file_size() {
            return Err(Sq3Error::Argument(format!(
                "Offset {} is beyond file size {}",
                offset,
                db.file_size()
            )));
        }
        let start = offset as usize;
        let length = opts.length.unwrap_or(DEFAULT_OFFSET_DUMP_LEN);
        let end = start.saturating_add(length).min(data.len());
        return write_dump(writer, &opts.file, &data[start..end], offset, opts.raw);
    }

    // Page mode
    let page_no = opts.page.unwrap_or(0);
    let slice = db.page_slice(page_no).ok_or_else(|| {
        Sq3Error::Argument(format!(
            "Page {} is beyond the end of the file ({} pages)",
            page_no,
            db.page_count()
        ))
    })?;
    let length = opts.length.unwrap_or(slice.len()).min(slice.len());
    let base_offset = page_no * u64::from(db.page_size());
    write_dump(writer, &opts.file, &slice[..length], base_offset, opts.raw)
}

fn write_dump(
    writer: &mut dyn Write,
    file: &str,
    bytes: &[u8],
    base_offset: u64,
    raw: bool,
) -> Result<(), Sq3Error> {
    if raw {
        return writer
            .write_all(bytes)
            .map_err(|e| Sq3Error::Io(format!("Cannot write output: {}", e)));
    }

    wprintln!(
        writer,
        "Hex dump of {} at offset {} ({} bytes):",
        file,
        base_offset,
        bytes.len()
    )?;
    wprintln!(writer)?;
    wprintln!(writer, "{}", hex_dump(bytes, base_offset))?;
    Ok(())
}
