//! Decoding of a single gzip member: header, DEFLATE payload, trailer.

use super::header::GzipHeader;
use rgzip_core::error::{Result, RgzipError};
use rgzip_core::{BitReader, Crc32, OutputWindow};
use rgzip_deflate::Inflater;
use std::ops::Range;

/// One decoded gzip member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GzipMember {
    /// The member's parsed header.
    pub header: GzipHeader,
    /// Byte range of the member within the compressed input.
    pub input: Range<usize>,
    /// Byte range of the member's data within the decompressed output.
    pub output: Range<usize>,
    /// CRC-32 of the member's data, as stored in (and checked against) the trailer.
    pub crc: u32,
}

impl GzipMember {
    /// Number of decompressed bytes this member produced.
    pub fn len(&self) -> usize {
        self.output.len()
    }

    /// Check if the member produced no data.
    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }
}

/// Decode the member starting at the reader's position, appending its data
/// to `output`.
pub(crate) fn read_member(
    reader: &mut BitReader<'_>,
    output: &mut OutputWindow,
    verify_header_crc: bool,
) -> Result<GzipMember> {
    let input_start = reader.byte_offset();
    let header = GzipHeader::parse(reader)?;
    if verify_header_crc {
        header.verify_crc()?;
    }

    output.begin_member();
    let output_start = output.len();

    // Checksum each block's output as soon as it is produced
    let mut crc = Crc32::new();
    let mut inflater = Inflater::new();
    while !inflater.is_finished() {
        let before = output.len();
        inflater.inflate_block(reader, output)?;
        crc.update(output.output_since(before));
    }

    // Trailer: CRC-32 and ISIZE, both little-endian
    reader.align_to_byte();
    let expected_crc = reader.read_u32_le()?;
    let expected_size = reader.read_u32_le()?;

    let computed_crc = crc.finalize();
    if computed_crc != expected_crc {
        return Err(RgzipError::checksum_mismatch(expected_crc, computed_crc));
    }

    // ISIZE is the length modulo 2^32
    let produced = output.len() - output_start;
    let computed_size = produced as u32;
    if computed_size != expected_size {
        return Err(RgzipError::size_mismatch(expected_size, computed_size));
    }

    tracing::debug!(
        offset = input_start,
        blocks = inflater.blocks(),
        filename = header.filename.as_deref(),
        produced,
        "decoded gzip member"
    );

    Ok(GzipMember {
        header,
        input: input_start..reader.byte_offset(),
        output: output_start..output.len(),
        crc: computed_crc,
    })
}
