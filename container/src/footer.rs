//! Component E: the self-describing archive footer.
//!
//! Layout, written in order: `[content][metadata record][body record][u64 LE
//! footer size]`. Each record is `[u64 LE length][bincode payload]`, the
//! payload itself encoded with `bincode::config::standard()` (variable-length
//! integers, self-describing), so it needs no schema shared out of band.
//! Mirrors `internal/compressing/footer.go`'s `write`/`read` pair, with
//! `bincode` standing in for Go's type-tagged, varint `encoding/gob` wire
//! format.

use std::io::{Read, Seek, SeekFrom, Write};

use serde::{Deserialize, Serialize};

use crate::error::ArchiveError;

pub const COMPRESSION_TYPE_HUFFMAN: &str = "huffman";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub checksum: String,
    pub offset: u64,
    pub size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub compression_type: String,
    pub files: Vec<FileEntry>,
}

/// The codec-specific payload. Only the huffman codec is implemented, so
/// this isn't generic over a `Body: Any` the way the source it was
/// distilled from is — `compression_type` on [`Metadata`] is still checked
/// against it on read, so an archive claiming an unsupported type is
/// rejected cleanly instead of misparsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HuffmanBody {
    pub block_size: u32,
    pub code_table: Vec<(Vec<u8>, Vec<u8>)>,
}

#[derive(Debug, Clone)]
pub struct Footer {
    pub metadata: Metadata,
    pub body: HuffmanBody,
}

fn write_record<W: Write>(w: &mut W, payload: &[u8]) -> std::io::Result<()> {
    w.write_all(&(payload.len() as u64).to_le_bytes())?;
    w.write_all(payload)?;
    Ok(())
}

fn read_record<R: Read>(r: &mut R) -> Result<Vec<u8>, ArchiveError> {
    let mut len_buf = [0u8; 8];
    r.read_exact(&mut len_buf)
        .map_err(|e| ArchiveError::FooterRead(e.to_string()))?;
    let len = u64::from_le_bytes(len_buf) as usize;
    let mut payload = vec![0u8; len];
    r.read_exact(&mut payload)
        .map_err(|e| ArchiveError::FooterRead(e.to_string()))?;
    Ok(payload)
}

/// Writes the footer to the end of `w`, which must currently be positioned
/// right after the last byte of archive content. Returns the footer's total
/// byte length (records plus the trailing size tag).
pub fn write<W: Write>(w: &mut W, footer: &Footer) -> Result<u64, ArchiveError> {
    let metadata_bytes = bincode::serde::encode_to_vec(&footer.metadata, bincode::config::standard())
        .map_err(|e| ArchiveError::FooterWrite(e.to_string()))?;
    let body_bytes = bincode::serde::encode_to_vec(&footer.body, bincode::config::standard())
        .map_err(|e| ArchiveError::FooterWrite(e.to_string()))?;

    write_record(w, &metadata_bytes)?;
    write_record(w, &body_bytes)?;

    let footer_size = (8 + metadata_bytes.len() + 8 + body_bytes.len()) as u64;
    w.write_all(&footer_size.to_le_bytes())?;
    Ok(footer_size)
}

/// Parses the footer by seeking from the end of `r`. Returns the parsed
/// footer and the byte length of the content section that precedes it.
pub fn read<R: Read + Seek>(r: &mut R) -> Result<(Footer, u64), ArchiveError> {
    let total_len = r.seek(SeekFrom::End(0))?;
    if total_len < 8 {
        return Err(ArchiveError::FooterRead("archive too short".into()));
    }

    r.seek(SeekFrom::End(-8))?;
    let mut size_buf = [0u8; 8];
    r.read_exact(&mut size_buf)
        .map_err(|e| ArchiveError::FooterRead(e.to_string()))?;
    let footer_size = u64::from_le_bytes(size_buf);

    if footer_size + 8 > total_len {
        return Err(ArchiveError::FooterRead(
            "footer size exceeds archive length".into(),
        ));
    }

    r.seek(SeekFrom::End(-(footer_size as i64) - 8))?;
    let metadata_bytes = read_record(r)?;
    let body_bytes = read_record(r)?;

    let (metadata, _): (Metadata, usize) =
        bincode::serde::decode_from_slice(&metadata_bytes, bincode::config::standard())
            .map_err(|e| ArchiveError::FooterRead(e.to_string()))?;
    if metadata.compression_type != COMPRESSION_TYPE_HUFFMAN {
        return Err(ArchiveError::UnsupportedCompressionType(
            metadata.compression_type,
        ));
    }
    let (body, _): (HuffmanBody, usize) =
        bincode::serde::decode_from_slice(&body_bytes, bincode::config::standard())
            .map_err(|e| ArchiveError::FooterRead(e.to_string()))?;

    let content_len = total_len - footer_size - 8;
    Ok((Footer { metadata, body }, content_len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn round_trips_a_footer() {
        let footer = Footer {
            metadata: Metadata {
                compression_type: COMPRESSION_TYPE_HUFFMAN.into(),
                files: vec![FileEntry {
                    path: "a.txt".into(),
                    checksum: "deadbeef".into(),
                    offset: 0,
                    size: 4,
                }],
            },
            body: HuffmanBody {
                block_size: 2,
                code_table: vec![(b"ab".to_vec(), vec![0x00])],
            },
        };

        let mut buf = Vec::new();
        buf.extend_from_slice(b"content");
        write(&mut buf, &footer).unwrap();

        let mut cursor = Cursor::new(buf);
        let (parsed, content_len) = read(&mut cursor).unwrap();
        assert_eq!(content_len, 7);
        assert_eq!(parsed.metadata.files[0].path, "a.txt");
        assert_eq!(parsed.body.block_size, 2);
    }

    #[test]
    fn rejects_an_unsupported_compression_type() {
        let footer = Footer {
            metadata: Metadata {
                compression_type: "gzip".into(),
                files: vec![],
            },
            body: HuffmanBody {
                block_size: 1,
                code_table: vec![],
            },
        };
        let mut buf = Vec::new();
        write(&mut buf, &footer).unwrap();
        let mut cursor = Cursor::new(buf);
        let err = read(&mut cursor).unwrap_err();
        assert!(matches!(err, ArchiveError::UnsupportedCompressionType(_)));
    }
}
