//! Human-readable hex dump.
//!
//! Each line shows an address column, up to 16 bytes as lowercase hex, and
//! the same bytes as printable ASCII:
//!
//! ```text
//! 0000  30 31 32 33 34 35 36 37 38 39 41 42 43 44 45 46  0123456789ABCDEF
//! ```
//!
//! This is a display helper, not a file format.

use std::fmt::Write;

use crate::store::ByteStore;

/// Bytes rendered per dump line.
pub const BYTES_PER_LINE: usize = 16;

/// Width of the hex column (" xx" per byte).
const HEX_COLUMN_WIDTH: usize = BYTES_PER_LINE * 3;

/// Address column settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DumpOptions {
    /// Minimum number of hex digits in the address column.
    pub address_width: usize,
    /// Added to every displayed address.
    pub address_offset: usize,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            address_width: 4,
            address_offset: 0,
        }
    }
}

/// Printable form of `byte`: itself for 0x20..=0x7e, `.` otherwise.
#[must_use]
pub fn ascii_char(byte: u8) -> char {
    if (0x20..=0x7e).contains(&byte) {
        byte as char
    } else {
        '.'
    }
}

fn hex_digits(mut value: usize) -> usize {
    let mut digits = 0;
    while value > 0 {
        digits += 1;
        value >>= 4;
    }
    digits
}

/// Digits in the address column for a store of `len` bytes.
///
/// Wide enough for the highest displayed address, and never narrower than
/// the configured minimum.
#[must_use]
pub fn address_width(len: usize, options: &DumpOptions) -> usize {
    hex_digits(len.saturating_add(options.address_offset)).max(options.address_width)
}

/// Render `[start, end)` of `store` as dump lines.
///
/// `end` is clamped to the store length; an empty range renders as an empty
/// string.
#[must_use]
pub fn to_readable_string(
    store: &ByteStore<'_>,
    start: usize,
    end: usize,
    options: &DumpOptions,
) -> String {
    let data = store.as_bytes();
    let end = end.min(data.len());
    let width = address_width(data.len(), options);

    let mut out = String::new();
    let mut line_start = start;
    while line_start < end {
        let line_end = line_start.saturating_add(BYTES_PER_LINE).min(end);
        let line = &data[line_start..line_end];

        // Writing into a String cannot fail.
        let mut hex = String::with_capacity(HEX_COLUMN_WIDTH);
        for byte in line {
            let _ = write!(hex, " {byte:02x}");
        }
        let ascii: String = line.iter().map(|&byte| ascii_char(byte)).collect();

        let address = options.address_offset.saturating_add(line_start);
        let _ = writeln!(
            out,
            "{address:0width$x} {hex:<hex_width$}  {ascii:<17}",
            hex_width = HEX_COLUMN_WIDTH
        );
        line_start = line_end;
    }
    out
}
