//! Component D: block encode/decode over a byte stream, given a code table.
//!
//! The decoder ports `internal/huffman/decompressor.go`'s approach exactly:
//! codes are packed to whole bytes with no bit-level realignment across
//! blocks, so recovering them means growing a read buffer one byte at a time
//! between the shortest and longest code length on file, checking an inverse
//! map after each growth.

use std::io::{Read, Write};

use crate::builder::{read_up_to, CodeTable};
use crate::error::HuffmanError;

/// Receives a running byte count as an encode or decode progresses. Kept
/// crate-agnostic (no dependency on the archive container crate) so the
/// container's own progress channel can implement it.
pub trait ProgressSink: Sync {
    fn report(&self, bytes: u64);
}

/// A sink that discards every report.
pub struct NoopProgress;
impl ProgressSink for NoopProgress {
    fn report(&self, _bytes: u64) {}
}

/// Reads `src` in `block_size` chunks, looks each one up in `codes`, and
/// writes the packed code bytes verbatim to `dst`. Returns the number of
/// compressed bytes written.
pub fn encode<R: Read, W: Write>(
    src: &mut R,
    dst: &mut W,
    block_size: usize,
    codes: &CodeTable,
    progress: &dyn ProgressSink,
) -> Result<u64, HuffmanError> {
    let mut buf = vec![0u8; block_size];
    let mut written = 0u64;
    loop {
        let n = read_up_to(src, &mut buf)?;
        if n == 0 {
            break;
        }
        let block = &buf[..n];
        let code = codes
            .get(block)
            .ok_or_else(|| HuffmanError::MissingCode {
                block: block.to_vec(),
            })?;
        dst.write_all(code)?;
        written += code.len() as u64;
        progress.report(written);
    }
    Ok(written)
}

/// Decodes a Huffman-coded stream written by [`encode`] back into its
/// original blocks, writing them verbatim to `dst`. Returns the number of
/// decompressed bytes written.
pub fn decode<R: Read, W: Write>(
    src: &mut R,
    dst: &mut W,
    codes: &CodeTable,
    progress: &dyn ProgressSink,
) -> Result<u64, HuffmanError> {
    let mut inverse: CodeTable = CodeTable::new();
    for (block, code) in codes {
        inverse.insert(code.clone(), block.clone());
    }
    let min_len = codes.values().map(|c| c.len()).min().unwrap_or(1).max(1);
    let max_len = codes.values().map(|c| c.len()).max().unwrap_or(1);

    let mut written = 0u64;
    let mut buf: Vec<u8> = Vec::with_capacity(max_len);
    let mut one = [0u8; 1];

    loop {
        let n = src.read(&mut one)?;
        if n == 0 {
            if buf.is_empty() {
                break;
            }
            return Err(HuffmanError::TruncatedStream);
        }
        buf.push(one[0]);

        if buf.len() < min_len {
            continue;
        }
        if let Some(block) = inverse.get(&buf) {
            dst.write_all(block)?;
            written += block.len() as u64;
            progress.report(written);
            buf.clear();
            continue;
        }
        if buf.len() >= max_len {
            return Err(HuffmanError::UnknownCode {
                bytes: std::mem::take(&mut buf),
            });
        }
    }
    Ok(written)
}
