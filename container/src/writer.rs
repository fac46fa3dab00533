//! Component F: the archive writer. Ported from
//! `internal/compressing/compressing.go`'s `fastCompress`/`simpleCompress`.

use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use sha2::{Digest, Sha256};

use crate::codec::{predict_sizes, FastCodec, HuffmanCodec, SimpleCodec};
use crate::error::ArchiveError;
use crate::footer::{self, FileEntry, Footer, HuffmanBody, Metadata, COMPRESSION_TYPE_HUFFMAN};
use crate::path::normalize_paths;
use crate::progress::Progress;

fn checksum_file(path: &Path) -> Result<String, ArchiveError> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Compresses `inputs` into a single `.dedal` archive at `dest`, using the
/// fast path: sizes are predicted up front, `dest` is preallocated, and every
/// file is compressed in parallel straight to its own disjoint byte range.
pub fn compress_files(
    inputs: &[PathBuf],
    dest: &Path,
    block_size: Option<usize>,
    progress: &Progress,
) -> Result<(), ArchiveError> {
    if inputs.is_empty() {
        return Err(ArchiveError::EmptyInput);
    }

    let relative_paths = normalize_paths(inputs)?;
    let checksums: Vec<String> = inputs
        .par_iter()
        .map(|p| checksum_file(p))
        .collect::<Result<_, _>>()?;

    let codec = HuffmanCodec::prepare(inputs, block_size)?;
    let sizes = predict_sizes(&codec, inputs)?;

    let mut offsets = Vec::with_capacity(sizes.len());
    let mut cursor = 0u64;
    for size in &sizes {
        offsets.push(cursor);
        cursor += size;
    }
    let content_len = cursor;

    {
        let file = File::create(dest)?;
        file.set_len(content_len)?;
    }

    inputs
        .par_iter()
        .zip(offsets.iter())
        .zip(sizes.iter())
        .try_for_each(|((src_path, &offset), &expected_size)| -> Result<(), ArchiveError> {
            let mut src = File::open(src_path)?;
            let mut out = OpenOptions::new().write(true).open(dest)?;
            out.seek(SeekFrom::Start(offset))?;
            let written = codec.compress_one(&mut src, &mut out, progress)?;
            debug_assert_eq!(written, expected_size, "size prediction drifted for {src_path:?}");
            tracing::debug!(path = %src_path.display(), written, "compressed file");
            Ok(())
        })?;

    let files = relative_paths
        .into_iter()
        .zip(checksums)
        .zip(offsets)
        .zip(sizes)
        .map(|(((path, checksum), offset), size)| FileEntry {
            path,
            checksum,
            offset,
            size,
        })
        .collect();

    let footer = Footer {
        metadata: Metadata {
            compression_type: COMPRESSION_TYPE_HUFFMAN.into(),
            files,
        },
        body: HuffmanBody {
            block_size: codec.block_size() as u32,
            code_table: codec
                .code_table()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        },
    };

    let mut out = OpenOptions::new().write(true).open(dest)?;
    out.seek(SeekFrom::Start(content_len))?;
    footer::write(&mut out, &footer)?;
    progress.close();

    tracing::info!(dest = %dest.display(), files = footer_file_count(&codec), "archive written");
    Ok(())
}

fn footer_file_count(codec: &HuffmanCodec) -> usize {
    codec.code_table().len()
}

/// Sequential fallback for a codec that cannot predict sizes up front: every
/// file is compressed one after another, appended to `dest` as its final
/// size becomes known. Mirrors `simpleCompress` in the source this was
/// distilled from; unused by the `HuffmanCodec` (which is always a
/// [`FastCodec`]) but kept as the contract's other half.
pub fn simple_compress_files(
    codec: &dyn SimpleCodec,
    inputs: &[PathBuf],
    dest: &Path,
    progress: &Progress,
) -> Result<(), ArchiveError> {
    if inputs.is_empty() {
        return Err(ArchiveError::EmptyInput);
    }

    let relative_paths = normalize_paths(inputs)?;
    let mut out = File::create(dest)?;

    let mut files = Vec::with_capacity(inputs.len());
    let mut cursor = 0u64;
    for (path, rel) in inputs.iter().zip(relative_paths) {
        let checksum = checksum_file(path)?;
        let mut src = File::open(path)?;
        let written = codec.compress_one(&mut src, &mut out, progress)?;
        files.push(FileEntry {
            path: rel,
            checksum,
            offset: cursor,
            size: written,
        });
        cursor += written;
    }

    let footer = Footer {
        metadata: Metadata {
            compression_type: codec.compression_type().to_string(),
            files,
        },
        body: HuffmanBody {
            block_size: 0,
            code_table: Vec::new(),
        },
    };
    footer::write(&mut out, &footer)?;
    progress.close();
    Ok(())
}
