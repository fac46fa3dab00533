use thiserror::Error;

/// Failures from tree construction, code derivation, or block encode/decode.
#[derive(Debug, Error)]
pub enum HuffmanError {
    #[error("cannot build a tree from an empty frequency map")]
    EmptyAlphabet,

    #[error("no code assigned to block {block:02x?}")]
    MissingCode { block: Vec<u8> },

    #[error("no block matches the code prefix {bytes:02x?}")]
    UnknownCode { bytes: Vec<u8> },

    #[error("compressed stream ended mid-code")]
    TruncatedStream,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
