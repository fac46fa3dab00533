//! Component G: the archive reader. Ported from
//! `internal/compressing/decompressing.go`.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::codec::{HuffmanCodec, SimpleCodec};
use crate::error::ArchiveError;
use crate::footer;
use crate::progress::Progress;

/// A bounded view over `[offset, offset + len)` of an already-open file.
struct SectionReader {
    file: File,
    remaining: u64,
}

impl SectionReader {
    fn open(path: &Path, offset: u64, len: u64) -> std::io::Result<Self> {
        let mut file = File::open(path)?;
        file.seek(SeekFrom::Start(offset))?;
        Ok(Self {
            file,
            remaining: len,
        })
    }
}

impl Read for SectionReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.remaining == 0 {
            return Ok(0);
        }
        let cap = (buf.len() as u64).min(self.remaining) as usize;
        let n = self.file.read(&mut buf[..cap])?;
        self.remaining -= n as u64;
        Ok(n)
    }
}

/// Decompresses every file stored in `archive` into `dest_dir`, verifying
/// each one's SHA-256 checksum. A decode failure removes every output file
/// this run has produced so far (including the one in progress) and aborts
/// immediately. A checksum mismatch is different: the mismatched file is
/// *kept* for diagnosis and every other file is still decompressed; the run
/// is reported as failed only once every entry has been processed.
pub fn decompress_archive(
    archive: &Path,
    dest_dir: &Path,
    progress: &Progress,
) -> Result<Vec<PathBuf>, ArchiveError> {
    let mut archive_file = File::open(archive)?;
    let (footer, _content_len) = footer::read(&mut archive_file)?;

    let code_table: huffman::CodeTable = footer.body.code_table.into_iter().collect();
    let codec = HuffmanCodec::from_table(footer.body.block_size, code_table);

    let mut written = Vec::with_capacity(footer.metadata.files.len());
    let mut failure: Option<ArchiveError> = None;

    for entry in &footer.metadata.files {
        let out_path = dest_dir.join(&entry.path);
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut section = SectionReader::open(archive, entry.offset, entry.size)?;
        let mut out = File::create(&out_path)?;
        if let Err(e) = codec.decompress_one(&mut section, &mut out, progress) {
            drop(out);
            for path in written.drain(..) {
                let _ = std::fs::remove_file(&path);
            }
            let _ = std::fs::remove_file(&out_path);
            return Err(match e {
                ArchiveError::DecompressionFailed { source, .. } => {
                    ArchiveError::DecompressionFailed {
                        path: entry.path.clone(),
                        source,
                    }
                }
                other => other,
            });
        }
        out.flush()?;
        drop(out);

        let actual = checksum_file(&out_path)?;
        written.push(out_path);
        if actual != entry.checksum {
            tracing::warn!(path = %entry.path, "checksum mismatch, keeping output for diagnosis");
            failure.get_or_insert(ArchiveError::ChecksumMismatch {
                path: entry.path.clone(),
                expected: entry.checksum.clone(),
                actual,
            });
            continue;
        }

        tracing::debug!(path = %entry.path, "decompressed and verified file");
    }

    progress.close();
    match failure {
        Some(err) => Err(err),
        None => Ok(written),
    }
}

fn checksum_file(path: &Path) -> Result<String, ArchiveError> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Reads only the footer metadata of an archive, for the `metadata`
/// subcommand — no file content is decompressed.
pub fn read_metadata(archive: &Path) -> Result<footer::Metadata, ArchiveError> {
    let mut archive_file = File::open(archive)?;
    let (footer, _content_len) = footer::read(&mut archive_file)?;
    Ok(footer.metadata)
}
