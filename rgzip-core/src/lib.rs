//! # rgzip Core
//!
//! Core components for the rgzip decompressor.
//!
//! This crate provides the building blocks shared by the DEFLATE decoder
//! and the gzip container parser:
//!
//! - [`bitstream`]: Bit-level reading over a borrowed input slice
//! - [`window`]: Growable output buffer doubling as the LZ77 history window
//! - [`crc`]: CRC-32 for the gzip trailer and header checksum
//! - [`error`]: Error taxonomy
//!
//! ## Architecture
//!
//! rgzip is organised as a small layered stack:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L3: Container (rgzip)                                   │
//! │     gzip header/trailer, multi-member, C ABI            │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Codec (rgzip-deflate)                               │
//! │     Huffman tables, DEFLATE block decoder               │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: Primitives (this crate)                             │
//! │     BitReader, OutputWindow, CRC-32, errors             │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use rgzip_core::bitstream::BitReader;
//! use rgzip_core::crc::Crc32;
//!
//! // Read bits from data
//! let data = [0xAB, 0xCD];
//! let mut reader = BitReader::new(&data);
//! let bits = reader.read_bits(12).unwrap();
//! assert_eq!(bits, 0xDAB);
//!
//! // Compute CRC-32
//! let crc = Crc32::compute(b"Hello, World!");
//! assert_eq!(crc, 0xEC4AC3D0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bitstream;
pub mod crc;
pub mod error;
pub mod window;

// Re-exports for convenience
pub use bitstream::BitReader;
pub use crc::Crc32;
pub use error::{ErrorKind, Result, RgzipError};
pub use window::{OutputWindow, WINDOW_SIZE};
