//! Component I: the codec plugin contract. `SimpleCodec` covers any codec
//! that just streams bytes through; `FastCodec` additionally predicts a
//! compressed size up front, which is what lets the writer reserve disjoint
//! byte ranges and compress files in parallel. Mirrors
//! `SimpleCompressor`/`FastCompressor` in `internal/compressing/compressing.go`.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use huffman::ProgressSink;
use rayon::prelude::*;

use crate::error::ArchiveError;
use crate::footer::COMPRESSION_TYPE_HUFFMAN;

pub trait SimpleCodec: Send + Sync {
    fn compression_type(&self) -> &'static str;

    fn compress_one(
        &self,
        src: &mut dyn Read,
        dst: &mut dyn Write,
        progress: &dyn ProgressSink,
    ) -> Result<u64, ArchiveError>;

    fn decompress_one(
        &self,
        src: &mut dyn Read,
        dst: &mut dyn Write,
        progress: &dyn ProgressSink,
    ) -> Result<u64, ArchiveError>;
}

pub trait FastCodec: SimpleCodec {
    /// Predicted compressed size of `src`, without writing anything.
    fn predict_size(&self, src: &mut dyn Read) -> Result<u64, ArchiveError>;
}

/// The only codec this repo ships: block-level Huffman coding, prepared once
/// from the full set of input files so every file shares one code table.
pub struct HuffmanCodec {
    block_size: usize,
    code_table: huffman::CodeTable,
}

impl HuffmanCodec {
    /// Counts frequencies across all of `paths` in parallel, merges them,
    /// and derives one shared code table. `block_size` overrides the
    /// auto-computed size when given.
    pub fn prepare(paths: &[PathBuf], block_size: Option<usize>) -> Result<Self, ArchiveError> {
        let total_bytes: u64 = paths
            .iter()
            .map(|p| std::fs::metadata(p).map(|m| m.len()).unwrap_or(0))
            .sum();
        let block_size = block_size.unwrap_or_else(|| huffman::auto_block_size(total_bytes));

        let per_file: Result<Vec<huffman::FrequencyMap>, ArchiveError> = paths
            .par_iter()
            .map(|path| {
                let mut file = File::open(path)?;
                huffman::count_frequencies(&mut file, block_size).map_err(|source| {
                    ArchiveError::CompressionFailed {
                        path: path.display().to_string(),
                        source,
                    }
                })
            })
            .collect();

        let merged = huffman::merge_frequencies(per_file?);
        let root = huffman::build_huffman_tree(&merged).map_err(|source| {
            ArchiveError::CompressionFailed {
                path: "<alphabet>".into(),
                source,
            }
        })?;
        let alphabet: Vec<Vec<u8>> = merged.keys().cloned().collect();
        let code_table = huffman::derive_code_table(&root, &alphabet).map_err(|source| {
            ArchiveError::CompressionFailed {
                path: "<alphabet>".into(),
                source,
            }
        })?;

        tracing::info!(
            block_size,
            alphabet_size = code_table.len(),
            "huffman codec prepared"
        );

        Ok(Self {
            block_size,
            code_table,
        })
    }

    /// Rehydrates a codec from a footer's stored block size and code table,
    /// for decompression.
    pub fn from_table(block_size: u32, code_table: huffman::CodeTable) -> Self {
        Self {
            block_size: block_size as usize,
            code_table,
        }
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn code_table(&self) -> &huffman::CodeTable {
        &self.code_table
    }
}

impl SimpleCodec for HuffmanCodec {
    fn compression_type(&self) -> &'static str {
        COMPRESSION_TYPE_HUFFMAN
    }

    fn compress_one(
        &self,
        src: &mut dyn Read,
        dst: &mut dyn Write,
        progress: &dyn ProgressSink,
    ) -> Result<u64, ArchiveError> {
        huffman::encode(src, dst, self.block_size, &self.code_table, progress).map_err(|source| {
            ArchiveError::CompressionFailed {
                path: "<stream>".into(),
                source,
            }
        })
    }

    fn decompress_one(
        &self,
        src: &mut dyn Read,
        dst: &mut dyn Write,
        progress: &dyn ProgressSink,
    ) -> Result<u64, ArchiveError> {
        huffman::decode(src, dst, &self.code_table, progress).map_err(|source| {
            ArchiveError::DecompressionFailed {
                path: "<stream>".into(),
                source,
            }
        })
    }
}

impl FastCodec for HuffmanCodec {
    fn predict_size(&self, src: &mut dyn Read) -> Result<u64, ArchiveError> {
        let mut buf = vec![0u8; self.block_size];
        let mut total = 0u64;
        loop {
            let n = read_full_or_eof(src, &mut buf)?;
            if n == 0 {
                break;
            }
            let code = self.code_table.get(&buf[..n]).ok_or_else(|| {
                ArchiveError::CompressionFailed {
                    path: "<predict>".into(),
                    source: huffman::HuffmanError::MissingCode {
                        block: buf[..n].to_vec(),
                    },
                }
            })?;
            total += code.len() as u64;
        }
        Ok(total)
    }
}

fn read_full_or_eof(src: &mut dyn Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match src.read(&mut buf[total..])? {
            0 => break,
            n => total += n,
        }
    }
    Ok(total)
}

/// Predicts a compressed size for each path, in parallel.
pub fn predict_sizes(codec: &dyn FastCodec, paths: &[PathBuf]) -> Result<Vec<u64>, ArchiveError> {
    paths
        .par_iter()
        .map(|path| {
            let mut file = File::open(path)?;
            codec.predict_size(&mut file)
        })
        .collect()
}

pub fn display_path(path: &Path) -> String {
    path.display().to_string()
}
