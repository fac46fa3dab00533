//! Block-level Huffman coding: frequency counting, tree construction, code
//! derivation, and the byte-granular block codec built on top of them.

pub mod bitbuffer;
pub mod builder;
pub mod codec;
pub mod error;
pub mod tree;

pub use builder::{
    auto_block_size, build_huffman_tree, count_frequencies, derive_code_table,
    merge_frequencies, CodeTable, FrequencyMap,
};
pub use codec::{decode, encode, NoopProgress, ProgressSink};
pub use error::HuffmanError;
pub use tree::Node;
