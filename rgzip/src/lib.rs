//! # rgzip
//!
//! Gzip decompression (RFC 1952 around RFC 1951 DEFLATE) in pure Rust.
//!
//! Given a complete gzip buffer, rgzip produces a newly allocated buffer
//! holding the decompressed bytes. Every member of a multi-member file is
//! decoded and verified (CRC-32 and length) before the output is handed
//! back; any malformed input is reported as an [`RgzipError`] and nothing
//! is returned.
//!
//! - [`decompress`]: one-call decoding with default settings
//! - [`gzip::GzipDecoder`]: header CRC checks, output limits, per-member info
//! - [`ffi`]: the C ABI (`decompress_gzip_to_heap` / `rgzip_free`)
//!
//! ## Example
//!
//! ```rust
//! // Empty member: one fixed-Huffman block holding only end-of-block
//! let gz = [
//!     0x1f, 0x8b, 0x08, 0x00, 0, 0, 0, 0, 0x00, 0x03, // header
//!     0x03, 0x00, // DEFLATE
//!     0, 0, 0, 0, 0, 0, 0, 0, // CRC-32 and ISIZE
//! ];
//!
//! let data = rgzip::decompress(&gz).unwrap();
//! assert!(data.is_empty());
//!
//! let err = rgzip::decompress(&gz[..12]).unwrap_err();
//! assert_eq!(err.kind(), rgzip::ErrorKind::TruncatedInput);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod ffi;
pub mod gzip;

// Re-exports
pub use gzip::{GzipDecoder, GzipHeader, GzipMember};
pub use rgzip_core::error::{ErrorKind, Result, RgzipError};

/// Decompress a complete gzip buffer (all members) with default settings.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>> {
    GzipDecoder::new().decompress(input)
}
