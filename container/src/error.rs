use thiserror::Error;

/// Every failure mode the archive container can produce, from building an
/// archive through reading one back.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("compression failed for {path}: {source}")]
    CompressionFailed {
        path: String,
        #[source]
        source: huffman::HuffmanError,
    },

    #[error("decompression failed for {path}: {source}")]
    DecompressionFailed {
        path: String,
        #[source]
        source: huffman::HuffmanError,
    },

    #[error("could not read archive footer: {0}")]
    FooterRead(String),

    #[error("could not write archive footer: {0}")]
    FooterWrite(String),

    #[error("checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("unsupported compression type {0:?}")]
    UnsupportedCompressionType(String),

    #[error("input files share no common path prefix")]
    NoCommonPrefix,

    #[error("no input files given")]
    EmptyInput,
}
