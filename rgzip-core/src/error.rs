//! Error types for rgzip operations.
//!
//! Every failure of a decompression call is reported as one [`RgzipError`]
//! variant. Each variant carries enough context (offsets, expected and
//! computed values) to diagnose a corrupt stream, and [`RgzipError::kind`]
//! collapses it to a fieldless [`ErrorKind`] for callers that only need
//! to tell failures apart.

use thiserror::Error;

/// The main error type for rgzip operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RgzipError {
    /// The member does not start with the gzip magic bytes.
    #[error("Invalid gzip magic: expected [1f, 8b], found {found:02x?}")]
    BadMagic {
        /// Bytes found where the magic was expected.
        found: [u8; 2],
    },

    /// The member uses a compression method other than DEFLATE.
    #[error("Unsupported compression method: {method}")]
    UnsupportedMethod {
        /// The compression method byte.
        method: u8,
    },

    /// Fewer bytes were available than a field or bit read required.
    #[error("Truncated input at byte offset {offset}: {needed} more bits required")]
    TruncatedInput {
        /// Byte offset at which the read was attempted.
        offset: usize,
        /// Number of bits that could not be supplied.
        needed: usize,
    },

    /// A DEFLATE block header carried the reserved block type.
    #[error("Invalid block type {block_type} at byte offset {offset}")]
    InvalidBlockType {
        /// The block type field (always 3 in practice).
        block_type: u8,
        /// Byte offset of the block header.
        offset: usize,
    },

    /// A stored block's NLEN is not the one's complement of LEN.
    #[error("Stored block length mismatch: LEN {len:#06x}, NLEN {nlen:#06x}")]
    StoredLengthMismatch {
        /// The LEN field.
        len: u16,
        /// The NLEN field.
        nlen: u16,
    },

    /// A code length sequence does not describe a usable Huffman code.
    #[error("Invalid Huffman table: {reason}")]
    InvalidHuffmanTable {
        /// What is wrong with the code lengths.
        reason: &'static str,
    },

    /// The input bits do not correspond to any assigned Huffman code.
    #[error("Invalid Huffman code at bit position {bit_position}")]
    InvalidHuffmanCode {
        /// Bit position where decoding gave up.
        bit_position: u64,
    },

    /// A literal/length symbol outside 0-285 was decoded.
    #[error("Invalid literal/length symbol {symbol} at bit position {bit_position}")]
    InvalidLengthSymbol {
        /// The decoded symbol.
        symbol: u16,
        /// Bit position after the symbol.
        bit_position: u64,
    },

    /// A back-reference points before the start of the available history.
    #[error("Invalid back-reference distance {distance}: only {available} bytes available")]
    InvalidBackReference {
        /// The requested distance.
        distance: usize,
        /// Bytes of history the distance may reach.
        available: usize,
    },

    /// The trailer CRC-32 does not match the decompressed data.
    #[error("CRC-32 mismatch: expected {expected:#010x}, computed {computed:#010x}")]
    ChecksumMismatch {
        /// CRC-32 stored in the trailer.
        expected: u32,
        /// CRC-32 of the produced bytes.
        computed: u32,
    },

    /// The trailer ISIZE does not match the decompressed length.
    #[error("Size mismatch: expected {expected} bytes (mod 2^32), produced {computed}")]
    SizeMismatch {
        /// ISIZE stored in the trailer.
        expected: u32,
        /// Produced length modulo 2^32.
        computed: u32,
    },

    /// The header CRC-16 does not match the header bytes.
    #[error("Header CRC mismatch: expected {expected:#06x}, computed {computed:#06x}")]
    HeaderChecksumMismatch {
        /// FHCRC value stored in the header.
        expected: u16,
        /// Low 16 bits of the CRC-32 of the header bytes.
        computed: u16,
    },

    /// The output buffer could not grow.
    #[error("Allocation failure: could not reserve {requested} bytes")]
    AllocationFailure {
        /// Number of additional bytes requested.
        requested: usize,
    },

    /// The output grew past the configured limit.
    #[error("Output exceeds configured limit of {limit} bytes")]
    OutputLimitExceeded {
        /// The configured limit.
        limit: usize,
    },
}

/// Result type alias for rgzip operations.
pub type Result<T> = std::result::Result<T, RgzipError>;

/// Fieldless classification of an [`RgzipError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`RgzipError::BadMagic`].
    BadMagic,
    /// See [`RgzipError::UnsupportedMethod`].
    UnsupportedMethod,
    /// See [`RgzipError::TruncatedInput`].
    TruncatedInput,
    /// See [`RgzipError::InvalidBlockType`].
    InvalidBlockType,
    /// See [`RgzipError::StoredLengthMismatch`].
    StoredLengthMismatch,
    /// See [`RgzipError::InvalidHuffmanTable`].
    InvalidHuffmanTable,
    /// See [`RgzipError::InvalidHuffmanCode`].
    InvalidHuffmanCode,
    /// See [`RgzipError::InvalidLengthSymbol`].
    InvalidLengthSymbol,
    /// See [`RgzipError::InvalidBackReference`].
    InvalidBackReference,
    /// See [`RgzipError::ChecksumMismatch`].
    ChecksumMismatch,
    /// See [`RgzipError::SizeMismatch`].
    SizeMismatch,
    /// See [`RgzipError::HeaderChecksumMismatch`].
    HeaderChecksumMismatch,
    /// See [`RgzipError::AllocationFailure`].
    AllocationFailure,
    /// See [`RgzipError::OutputLimitExceeded`].
    OutputLimitExceeded,
}

impl RgzipError {
    /// Create a bad magic error.
    pub fn bad_magic(found: [u8; 2]) -> Self {
        Self::BadMagic { found }
    }

    /// Create an unsupported method error.
    pub fn unsupported_method(method: u8) -> Self {
        Self::UnsupportedMethod { method }
    }

    /// Create a truncated input error.
    pub fn truncated(offset: usize, needed: usize) -> Self {
        Self::TruncatedInput { offset, needed }
    }

    /// Create an invalid block type error.
    pub fn invalid_block_type(block_type: u8, offset: usize) -> Self {
        Self::InvalidBlockType { block_type, offset }
    }

    /// Create a stored length mismatch error.
    pub fn stored_length_mismatch(len: u16, nlen: u16) -> Self {
        Self::StoredLengthMismatch { len, nlen }
    }

    /// Create an invalid Huffman table error.
    pub fn invalid_table(reason: &'static str) -> Self {
        Self::InvalidHuffmanTable { reason }
    }

    /// Create an invalid Huffman code error.
    pub fn invalid_huffman(bit_position: u64) -> Self {
        Self::InvalidHuffmanCode { bit_position }
    }

    /// Create an invalid literal/length symbol error.
    pub fn invalid_length_symbol(symbol: u16, bit_position: u64) -> Self {
        Self::InvalidLengthSymbol {
            symbol,
            bit_position,
        }
    }

    /// Create an invalid back-reference error.
    pub fn invalid_back_reference(distance: usize, available: usize) -> Self {
        Self::InvalidBackReference {
            distance,
            available,
        }
    }

    /// Create a CRC-32 mismatch error.
    pub fn checksum_mismatch(expected: u32, computed: u32) -> Self {
        Self::ChecksumMismatch { expected, computed }
    }

    /// Create an ISIZE mismatch error.
    pub fn size_mismatch(expected: u32, computed: u32) -> Self {
        Self::SizeMismatch { expected, computed }
    }

    /// Create a header CRC mismatch error.
    pub fn header_checksum_mismatch(expected: u16, computed: u16) -> Self {
        Self::HeaderChecksumMismatch { expected, computed }
    }

    /// Create an allocation failure error.
    pub fn allocation_failure(requested: usize) -> Self {
        Self::AllocationFailure { requested }
    }

    /// Create an output limit error.
    pub fn output_limit(limit: usize) -> Self {
        Self::OutputLimitExceeded { limit }
    }

    /// Classify this error without its context fields.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadMagic { .. } => ErrorKind::BadMagic,
            Self::UnsupportedMethod { .. } => ErrorKind::UnsupportedMethod,
            Self::TruncatedInput { .. } => ErrorKind::TruncatedInput,
            Self::InvalidBlockType { .. } => ErrorKind::InvalidBlockType,
            Self::StoredLengthMismatch { .. } => ErrorKind::StoredLengthMismatch,
            Self::InvalidHuffmanTable { .. } => ErrorKind::InvalidHuffmanTable,
            Self::InvalidHuffmanCode { .. } => ErrorKind::InvalidHuffmanCode,
            Self::InvalidLengthSymbol { .. } => ErrorKind::InvalidLengthSymbol,
            Self::InvalidBackReference { .. } => ErrorKind::InvalidBackReference,
            Self::ChecksumMismatch { .. } => ErrorKind::ChecksumMismatch,
            Self::SizeMismatch { .. } => ErrorKind::SizeMismatch,
            Self::HeaderChecksumMismatch { .. } => ErrorKind::HeaderChecksumMismatch,
            Self::AllocationFailure { .. } => ErrorKind::AllocationFailure,
            Self::OutputLimitExceeded { .. } => ErrorKind::OutputLimitExceeded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RgzipError::bad_magic([0x50, 0x4B]);
        assert!(err.to_string().contains("magic"));
        assert!(err.to_string().contains("50"));

        let err = RgzipError::checksum_mismatch(0x12345678, 0xDEADBEEF);
        assert!(err.to_string().contains("0x12345678"));
        assert!(err.to_string().contains("0xdeadbeef"));

        let err = RgzipError::unsupported_method(7);
        assert!(err.to_string().contains('7'));

        let err = RgzipError::invalid_back_reference(10, 9);
        assert!(err.to_string().contains("only 9 bytes"));
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            RgzipError::truncated(0, 16).kind(),
            ErrorKind::TruncatedInput
        );
        assert_eq!(
            RgzipError::stored_length_mismatch(5, 5).kind(),
            ErrorKind::StoredLengthMismatch
        );
        assert_eq!(
            RgzipError::invalid_length_symbol(286, 40).kind(),
            ErrorKind::InvalidLengthSymbol
        );
        assert_eq!(
            RgzipError::allocation_failure(1 << 40).kind(),
            ErrorKind::AllocationFailure
        );
    }
}
