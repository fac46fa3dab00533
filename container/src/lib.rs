//! The `.dedal` archive container: footer framing, the writer/reader
//! orchestration, path normalization, the codec plugin contract, and the
//! progress channel they all share.

pub mod codec;
pub mod error;
pub mod footer;
pub mod path;
pub mod progress;
pub mod reader;
pub mod writer;

pub use codec::{FastCodec, HuffmanCodec, SimpleCodec};
pub use error::ArchiveError;
pub use footer::{FileEntry, Footer, Metadata};
pub use path::normalize_paths;
pub use progress::Progress;
pub use reader::{decompress_archive, read_metadata};
pub use writer::{compress_files, simple_compress_files};
