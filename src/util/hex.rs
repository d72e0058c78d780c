//! Hex dump formatting utilities.
//!
//! Helpers for rendering byte offsets, compact hex strings, and
//! traditional 16-bytes-per-line hex dumps with an ASCII sidebar. Pure
//! formatting; no decoding happens here.

/// Format a byte offset as "decimal (0xhex)".
pub fn format_offset(offset: u64) -> String {
    format!("{} (0x{:x})", offset, offset)
}

/// Format bytes as a compact hex string (e.g., "53514c69").
pub fn format_bytes(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Produce a standard hex dump of `data`, labelling lines starting from
/// `base_offset`.
///
/// Output format (16 bytes per line, two 8-byte groups, non-printable
/// bytes shown as `.`):
/// ```text
/// 00000000  53 51 4c 69 74 65 20 66  6f 72 6d 61 74 20 33 00  |SQLite format 3.|
/// ```
pub fn hex_dump(data: &[u8], base_offset: u64) -> String {
    let mut lines = Vec::with_capacity(data.len().div_ceil(16));

    for (line_no, chunk) in data.chunks(16).enumerate() {
        let offset = base_offset + (line_no * 16) as u64;
        let mut line = format!("{:08x}  ", offset);

        for col in 0..16 {
            if col == 8 {
                line.push(' ');
            }
            match chunk.get(col) {
                Some(byte) => line.push_str(&format!("{:02x} ", byte)),
                None => line.push_str("   "),
            }
        }

        line.push_str(" |");
        for &byte in chunk {
            if byte.is_ascii_graphic() || byte == b' ' {
                line.push(byte as char);
            } else {
                line.push('.');
            }
        }
        for _ in chunk.len()..16 {
            line.push(' ');
        }
        line.push('|');

        lines.push(line);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_offset() {
        assert_eq!(format_offset(0), "0 (0x0)");
        assert_eq!(format_offset(100), "100 (0x64)");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(&[0x53, 0x51, 0x00, 0xff]), "535100ff");
        assert_eq!(format_bytes(&[]), "");
    }

    #[test]
    fn test_hex_dump_full_line() {
        let data: Vec<u8> = (0..16).collect();
        let output = hex_dump(&data, 0);
        assert!(output.starts_with("00000000  "));
        assert!(output.contains("00 01 02 03 04 05 06 07  08 09 0a 0b 0c 0d 0e 0f"));
        assert!(output.ends_with("|................|"));
    }

    #[test]
    fn test_hex_dump_partial_line_pads_ascii_column() {
        let data = b"SQLite";
        let output = hex_dump(data, 0x100);
        assert!(output.starts_with("00000100  "));
        assert!(output.contains("53 51 4c 69 74 65"));
        assert!(output.contains("|SQLite          |"));
    }

    #[test]
    fn test_hex_dump_nonprintable() {
        let output = hex_dump(&[0x00, 0x09, 0x7f, 0x80, 0xff], 0);
        assert!(output.contains("|....."));
    }

    #[test]
    fn test_hex_dump_multiline_offsets() {
        let data = vec![0u8; 40];
        let output = hex_dump(&data, 0);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("00000010  "));
        assert!(lines[2].starts_with("00000020  "));
    }

    #[test]
    fn test_hex_dump_empty() {
        assert_eq!(hex_dump(&[], 0), "");
    }
}
