//! Component C: frequency counting, auto block sizing, and code derivation.

use std::io::Read;
use std::sync::Arc;

use indexmap::IndexMap;
use rayon::prelude::*;

use crate::bitbuffer::BitBuffer;
use crate::error::HuffmanError;
use crate::tree::{build_tree, Node};

/// Block -> occurrence count, keyed in first-seen order. `IndexMap` (rather
/// than `HashMap`) is load-bearing here: the tree built from this map must be
/// reproducible from the same input, and Rust's `HashMap` iteration order is
/// randomized per-process.
pub type FrequencyMap = IndexMap<Vec<u8>, u64>;

/// Block -> packed code bytes, in the same order as the alphabet it was
/// derived from.
pub type CodeTable = IndexMap<Vec<u8>, Vec<u8>>;

/// `B = clamp(floor(sqrt(2 * totalKB)), 1, 65536)`. Mirrors
/// `computeBlockSize` in the source this was distilled from.
pub fn auto_block_size(total_bytes: u64) -> usize {
    let kb = total_bytes as f64 / 1024.0;
    let size = (2.0 * kb).sqrt() as usize;
    size.clamp(1, 65536)
}

/// Counts block frequencies in a single source, reading `block_size` bytes
/// at a time. The final block may be shorter than `block_size`.
pub fn count_frequencies<R: Read>(
    src: &mut R,
    block_size: usize,
) -> Result<FrequencyMap, HuffmanError> {
    let mut freqs = FrequencyMap::new();
    let mut buf = vec![0u8; block_size];
    loop {
        let n = read_up_to(src, &mut buf)?;
        if n == 0 {
            break;
        }
        *freqs.entry(buf[..n].to_vec()).or_insert(0) += 1;
    }
    Ok(freqs)
}

/// Reads up to `buf.len()` bytes, stopping early only at EOF (unlike
/// `Read::read`, which may return short reads for reasons other than EOF).
pub(crate) fn read_up_to<R: Read>(src: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match src.read(&mut buf[total..])? {
            0 => break,
            n => total += n,
        }
    }
    Ok(total)
}

/// Merges per-file frequency maps into one, in file order and then in each
/// map's own first-seen order, so the combined map is deterministic.
pub fn merge_frequencies<I: IntoIterator<Item = FrequencyMap>>(maps: I) -> FrequencyMap {
    let mut combined = FrequencyMap::new();
    for map in maps {
        for (block, count) in map {
            *combined.entry(block).or_insert(0) += count;
        }
    }
    combined
}

pub fn build_huffman_tree(frequencies: &FrequencyMap) -> Result<Arc<Node>, HuffmanError> {
    let root = build_tree(frequencies.iter()).ok_or(HuffmanError::EmptyAlphabet)?;
    tracing::debug!(alphabet_size = frequencies.len(), "huffman tree built");
    Ok(root)
}

/// Walks from `root` to the leaf holding `block`, emitting `1` for a right
/// descent and `0` for a left descent. A single-leaf tree (one-symbol
/// alphabet) has no descent to make, so it is given the explicit one-bit
/// code `[0]` rather than an empty code.
fn derive_code_bits(root: &Node, block: &[u8]) -> Result<Vec<bool>, HuffmanError> {
    if root.is_leaf() {
        return Ok(vec![false]);
    }

    let mut bits = Vec::new();
    let mut node = root;
    loop {
        if node.is_leaf() {
            return Ok(bits);
        }
        if let Some(left) = node.left.as_deref().filter(|n| n.contains(block)) {
            bits.push(false);
            node = left;
            continue;
        }
        if let Some(right) = node.right.as_deref().filter(|n| n.contains(block)) {
            bits.push(true);
            node = right;
            continue;
        }
        return Err(HuffmanError::MissingCode {
            block: block.to_vec(),
        });
    }
}

/// Derives a packed code for every block in `alphabet`, in parallel, against
/// one shared immutable tree.
pub fn derive_code_table(
    root: &Arc<Node>,
    alphabet: &[Vec<u8>],
) -> Result<CodeTable, HuffmanError> {
    let entries: Result<Vec<(Vec<u8>, Vec<u8>)>, HuffmanError> = alphabet
        .par_iter()
        .map(|block| {
            let bits = derive_code_bits(root, block)?;
            let packed: BitBuffer = bits.into_iter().collect();
            Ok((block.clone(), packed.pack()))
        })
        .collect();
    Ok(entries?.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn auto_block_size_matches_worked_examples() {
        assert_eq!(auto_block_size(0), 1);
        assert_eq!(auto_block_size(1), 1);
        assert_eq!(auto_block_size(2048), 2);
    }

    #[test]
    fn auto_block_size_is_clamped_at_the_top() {
        assert_eq!(auto_block_size(u64::MAX), 65536);
    }

    #[test]
    fn counts_blocks_including_a_short_final_block() {
        let mut src = Cursor::new(b"aaab".to_vec());
        let freqs = count_frequencies(&mut src, 2).unwrap();
        assert_eq!(freqs.get(b"aa".as_slice()), Some(&1));
        assert_eq!(freqs.get(b"ab".as_slice()), Some(&1));
    }

    #[test]
    fn derives_prefix_free_codes_for_a_small_alphabet() {
        let mut freqs = FrequencyMap::new();
        freqs.insert(b"a".to_vec(), 5);
        freqs.insert(b"b".to_vec(), 2);
        freqs.insert(b"c".to_vec(), 1);
        let root = build_huffman_tree(&freqs).unwrap();
        let alphabet: Vec<Vec<u8>> = freqs.keys().cloned().collect();
        let table = derive_code_table(&root, &alphabet).unwrap();
        assert_eq!(table.len(), 3);
        let codes: Vec<&Vec<u8>> = table.values().collect();
        for i in 0..codes.len() {
            for j in (i + 1)..codes.len() {
                assert_ne!(codes[i], codes[j]);
            }
        }
    }

    #[test]
    fn single_symbol_alphabet_gets_the_explicit_one_bit_code() {
        let mut freqs = FrequencyMap::new();
        freqs.insert(b"only".to_vec(), 9);
        let root = build_huffman_tree(&freqs).unwrap();
        let table = derive_code_table(&root, &[b"only".to_vec()]).unwrap();
        assert_eq!(table.get(b"only".as_slice()), Some(&vec![0x00]));
    }
}
