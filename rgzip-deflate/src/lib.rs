//! # rgzip Deflate
//!
//! Pure Rust DEFLATE decoder (RFC 1951).
//!
//! This crate decodes DEFLATE block streams, the compressed payload inside
//! every gzip member. It is decode-only.
//!
//! ## Features
//!
//! - All three block types
//!   - Stored (uncompressed) blocks
//!   - Fixed Huffman codes
//!   - Dynamic Huffman codes
//! - Canonical Huffman tables with a single-lookup fast path
//! - Back-references up to 32 KB, including overlapping copies
//!
//! ## Example
//!
//! ```rust
//! use rgzip_core::{BitReader, OutputWindow};
//! use rgzip_deflate::Inflater;
//!
//! // A single stored block holding "Hello"
//! let compressed = [0x01, 0x05, 0x00, 0xFA, 0xFF, b'H', b'e', b'l', b'l', b'o'];
//!
//! let mut reader = BitReader::new(&compressed);
//! let mut output = OutputWindow::new();
//! Inflater::new().inflate(&mut reader, &mut output).unwrap();
//! assert_eq!(output.output(), b"Hello");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod huffman;
pub mod inflate;
pub mod tables;

// Re-exports
pub use huffman::HuffmanTable;
pub use inflate::{BlockType, Inflater};
