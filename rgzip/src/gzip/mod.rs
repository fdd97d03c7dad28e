//! GZIP format support (RFC 1952).
//!
//! A gzip file is one or more members, each a header, a DEFLATE stream and
//! an 8-byte trailer. Members are decoded back to back into one output.
//!
//! ## Example
//!
//! ```rust
//! use rgzip::gzip::GzipDecoder;
//!
//! // One member holding "Hello" in a stored block
//! let mut gz = vec![0x1f, 0x8b, 0x08, 0x00, 0, 0, 0, 0, 0x00, 0xff];
//! gz.extend_from_slice(&[0x01, 0x05, 0x00, 0xFA, 0xFF]);
//! gz.extend_from_slice(b"Hello");
//! gz.extend_from_slice(&0xF7D1_8982u32.to_le_bytes());
//! gz.extend_from_slice(&5u32.to_le_bytes());
//!
//! let decoder = GzipDecoder::new().max_output_size(Some(1 << 20));
//! assert_eq!(decoder.decompress(&gz).unwrap(), b"Hello");
//! ```

mod header;
mod member;

pub use header::{CM_DEFLATE, ExtraSubfields, GZIP_MAGIC, GzipHeader, flags};
pub use member::GzipMember;

use rgzip_core::error::Result;
use rgzip_core::{BitReader, OutputWindow};

/// Largest capacity reserved up front from a trailer's ISIZE field.
const SIZE_HINT_CAP: usize = 64 * 1024 * 1024;

/// Upper bound on DEFLATE expansion: one input byte never yields more than
/// this many output bytes.
const MAX_DEFLATE_RATIO: usize = 1032;

/// Configurable gzip decoder.
#[derive(Debug, Clone)]
pub struct GzipDecoder {
    /// Check FHCRC header checksums.
    verify_header_crc: bool,
    /// Refuse to produce more than this many bytes.
    max_output_size: Option<usize>,
    /// Pre-reserve output from the final trailer's ISIZE.
    size_hint: bool,
}

impl GzipDecoder {
    /// Create a decoder with default settings.
    pub fn new() -> Self {
        Self {
            verify_header_crc: false,
            max_output_size: None,
            size_hint: true,
        }
    }

    /// Verify the optional header CRC (FHCRC) of each member.
    pub fn verify_header_crc(mut self, verify: bool) -> Self {
        self.verify_header_crc = verify;
        self
    }

    /// Cap the total decompressed size.
    pub fn max_output_size(mut self, limit: Option<usize>) -> Self {
        self.max_output_size = limit;
        self
    }

    /// Use the last member's ISIZE to size the output allocation.
    pub fn size_hint(mut self, enabled: bool) -> Self {
        self.size_hint = enabled;
        self
    }

    /// Decompress every member of `input` into one buffer.
    pub fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        self.decode(input, |_| {})
    }

    /// Decompress every member, also returning each member's header and ranges.
    pub fn decompress_members(&self, input: &[u8]) -> Result<(Vec<u8>, Vec<GzipMember>)> {
        let mut members = Vec::new();
        let output = self.decode(input, |member| members.push(member))?;
        Ok((output, members))
    }

    fn decode(&self, input: &[u8], mut on_member: impl FnMut(GzipMember)) -> Result<Vec<u8>> {
        let mut reader = BitReader::new(input);
        let mut output = OutputWindow::with_limit(self.max_output_size);

        if self.size_hint {
            let hint = isize_hint(input);
            if output.reserve(hint).is_err() {
                tracing::debug!(hint, "could not pre-reserve output");
            }
        }

        loop {
            let member = member::read_member(&mut reader, &mut output, self.verify_header_crc)?;
            on_member(member);

            // Anything after a trailer must be another member
            if reader.is_at_end() {
                break;
            }
        }

        Ok(output.into_output())
    }
}

impl Default for GzipDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// ISIZE of the final member, clamped to what `input` could possibly expand
/// to and to [`SIZE_HINT_CAP`].
fn isize_hint(input: &[u8]) -> usize {
    match input.len().checked_sub(4) {
        Some(pos) if pos >= 10 => {
            let size = u32::from_le_bytes([
                input[pos],
                input[pos + 1],
                input[pos + 2],
                input[pos + 3],
            ]);
            let reachable = input.len().saturating_mul(MAX_DEFLATE_RATIO);
            (size as usize).min(reachable).min(SIZE_HINT_CAP)
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rgzip_core::{Crc32, ErrorKind, RgzipError};

    fn stored_member(payload: &[u8]) -> Vec<u8> {
        let mut data = vec![0x1f, 0x8b, 0x08, 0x00, 0, 0, 0, 0, 0x00, 0xff];
        data.push(0x01);
        data.extend_from_slice(&(payload.len() as u16).to_le_bytes());
        data.extend_from_slice(&(!(payload.len() as u16)).to_le_bytes());
        data.extend_from_slice(payload);
        data.extend_from_slice(&Crc32::compute(payload).to_le_bytes());
        data.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        data
    }

    #[test]
    fn test_decompress_members() {
        let mut data = stored_member(b"first ");
        data.extend_from_slice(&stored_member(b"second"));

        let (output, members) = GzipDecoder::new().decompress_members(&data).unwrap();
        assert_eq!(output, b"first second");
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].output, 0..6);
        assert_eq!(members[1].output, 6..12);
        assert_eq!(members[1].input.end, data.len());
        assert_eq!(&output[members[1].output.clone()], b"second");
    }

    #[test]
    fn test_output_limit() {
        let data = stored_member(b"0123456789");

        let decoder = GzipDecoder::new().max_output_size(Some(10));
        assert_eq!(decoder.decompress(&data).unwrap().len(), 10);

        let decoder = GzipDecoder::new().max_output_size(Some(9));
        assert_eq!(
            decoder.decompress(&data).unwrap_err(),
            RgzipError::output_limit(9)
        );
    }

    #[test]
    fn test_size_hint_ignores_bogus_isize() {
        let mut data = stored_member(b"abc");
        let len = data.len();
        data[len - 4..].copy_from_slice(&u32::MAX.to_le_bytes());

        // The hint is clamped, and the bad ISIZE is still caught.
        let err = GzipDecoder::new().decompress(&data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SizeMismatch);
        assert_eq!(isize_hint(&data), data.len() * MAX_DEFLATE_RATIO);
    }

    #[test]
    fn test_size_hint_bounded_by_input_length() {
        // Header, empty fixed block, zero CRC, ISIZE = u32::MAX
        let mut data = vec![0x1f, 0x8b, 0x08, 0x00, 0, 0, 0, 0, 0x00, 0xff, 0x03, 0x00];
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&u32::MAX.to_le_bytes());
        assert_eq!(data.len(), 20);

        assert_eq!(isize_hint(&data), 20 * MAX_DEFLATE_RATIO);
        assert!(isize_hint(&data) < SIZE_HINT_CAP);

        let large = vec![0u8; SIZE_HINT_CAP];
        assert_eq!(isize_hint(&large), 0);
        let mut large = large;
        let len = large.len();
        large[len - 4..].copy_from_slice(&u32::MAX.to_le_bytes());
        assert_eq!(isize_hint(&large), SIZE_HINT_CAP);
    }

    #[test]
    fn test_isize_hint_short_input() {
        assert_eq!(isize_hint(&[]), 0);
        assert_eq!(isize_hint(&[1, 2, 3, 4]), 0);
    }

    #[test]
    fn test_header_crc_opt_in() {
        let mut data = vec![0x1f, 0x8b, 0x08, 0x02, 0, 0, 0, 0, 0x00, 0xff];
        let wrong = !(Crc32::compute(&data) as u16);
        data.extend_from_slice(&wrong.to_le_bytes());
        data.extend_from_slice(&[0x03, 0x00]); // empty fixed block
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());

        assert!(GzipDecoder::new().decompress(&data).unwrap().is_empty());
        let err = GzipDecoder::new()
            .verify_header_crc(true)
            .decompress(&data)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::HeaderChecksumMismatch);
    }
}
