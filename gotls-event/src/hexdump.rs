//! Annotated hex dumps of captured payloads.

use std::fmt::Write;

/// ANSI escape that starts green foreground text.
pub const COLOR_GREEN: &str = "\x1b[32m";
/// ANSI escape that resets all attributes.
pub const COLOR_RESET: &str = "\x1b[0m";

const ROW: usize = 16;
const GROUP: usize = 8;

/// Render `bytes` as rows of offset, hex and ASCII columns.
///
/// The decimal offset is right-aligned in four columns. Every row starts with `prefix`
/// (normally a color escape). A short final row is padded so the ASCII column stays
/// aligned. The caller appends the matching reset marker when the result is non-empty.
pub fn dump(bytes: &[u8], prefix: &str) -> String {
    let rows = bytes.len().div_ceil(ROW);
    let mut out = String::with_capacity(rows * (prefix.len() + 76));

    for (row, chunk) in bytes.chunks(ROW).enumerate() {
        out.push_str(prefix);
        let _ = write!(out, "{:4}", row * ROW);

        let mut ascii = [b' '; ROW];
        for i in 0..ROW {
            if i % GROUP == 0 {
                out.push(' ');
            }
            match chunk.get(i) {
                Some(&b) => {
                    let _ = write!(out, " {:02X}", b);
                    ascii[i] = if (0x20..=0x7e).contains(&b) { b } else { b'.' };
                }
                None => out.push_str("   "),
            }
        }

        out.push_str("  ");
        // ascii only holds printable bytes, spaces and dots
        out.extend(ascii.iter().map(|&b| b as char));
        out.push('\n');
    }

    out
}
