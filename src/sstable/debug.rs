//! Human-readable dumps of block contents.
//!
//! Diagnostic output only; the format is not stable.

use std::fmt::Write;

use crate::sstable::block::Block;
use crate::sstable::row::{RowCodec, V0RowCodec};

const PREVIEW_LEN: usize = 30;

/// Truncates `data` for display so the result is at most `max_len` bytes.
///
/// Invalid UTF-8 is replaced lossily before measuring. Longer text keeps as
/// many whole characters as fit in `max_len - 3` bytes followed by `"..."`;
/// below 3 bytes there is no room for the ellipsis and the text is clipped.
pub fn truncate(data: &[u8], max_len: usize) -> String {
    let text = String::from_utf8_lossy(data);
    if text.len() <= max_len {
        return text.into_owned();
    }
    if max_len < 3 {
        return text[..floor_char_boundary(&text, max_len)].to_string();
    }
    let keep = floor_char_boundary(&text, max_len - 3);
    format!("{}...", &text[..keep])
}

/// Largest char boundary in `text` that is `<= index`.
fn floor_char_boundary(text: &str, index: usize) -> usize {
    (0..=index.min(text.len()))
        .rev()
        .find(|&i| text.is_char_boundary(i))
        .unwrap_or(0)
}

/// Describes the encoded layout of every entry in `block`.
///
/// Appends a `WARN:` line when the offset table and the rows found by
/// scanning the data section disagree on the number of entries.
pub fn pretty_print(block: &Block) -> String {
    let mut out = String::new();
    let mut iter = block.iter();

    for offset in block.offsets() {
        let entry = match iter.next_entry() {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                let _ = writeln!(
                    out,
                    "WARN: entry at offset {} is unreadable: {}",
                    offset, e
                );
                break;
            }
        };

        let key = &entry.key;
        let _ = writeln!(out, "Offset: {}", offset);
        let _ = writeln!(out, "  uint16({}) - 2 bytes", key.len());
        let _ = writeln!(
            out,
            "  []byte(\"{}\") - {} bytes",
            truncate(key, PREVIEW_LEN),
            key.len()
        );
        match entry.value.as_bytes() {
            Some(v) => {
                let _ = writeln!(out, "  uint32({}) - 4 bytes", v.len());
                let _ = writeln!(
                    out,
                    "  []byte(\"{}\") - {} bytes",
                    truncate(v, PREVIEW_LEN),
                    v.len()
                );
            }
            None => {
                let _ = writeln!(out, "  uint32({}) - 4 bytes (tombstone)", u32::MAX);
            }
        }
    }

    let rows = count_rows(block);
    if rows < block.len() {
        let _ = writeln!(
            out,
            "WARN: there are more offsets than blocks ({} offsets, {} rows)",
            block.len(),
            rows
        );
    } else if rows > block.len() {
        let _ = writeln!(
            out,
            "WARN: there are more blocks than offsets ({} offsets, {} rows)",
            block.len(),
            rows
        );
    }
    out
}

/// Count the rows that decode back to back from the start of the data.
fn count_rows(block: &Block) -> usize {
    let codec = V0RowCodec;
    let data = block.data();
    let mut pos = 0;
    let mut rows = 0;
    while pos < data.len() {
        match codec.decode(&data[pos..]) {
            Ok(row) => {
                pos += codec.encoded_size(&row);
                rows += 1;
            }
            Err(_) => break,
        }
    }
    rows
}
