//! GZIP member header parsing (RFC 1952 Section 2.3).

use rgzip_core::error::{Result, RgzipError};
use rgzip_core::{BitReader, Crc32};

/// GZIP magic bytes.
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// GZIP compression method: DEFLATE.
pub const CM_DEFLATE: u8 = 8;

/// GZIP header flags.
pub mod flags {
    /// Text file.
    pub const FTEXT: u8 = 0x01;
    /// Header CRC present.
    pub const FHCRC: u8 = 0x02;
    /// Extra field present.
    pub const FEXTRA: u8 = 0x04;
    /// Original filename present.
    pub const FNAME: u8 = 0x08;
    /// Comment present.
    pub const FCOMMENT: u8 = 0x10;
}

/// Parsed header of one gzip member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GzipHeader {
    /// Compression method (always 8 once parsed).
    pub method: u8,
    /// Flags; reserved bits 5-7 are kept but otherwise ignored.
    pub flags: u8,
    /// Modification time (Unix timestamp, 0 if unknown).
    pub mtime: u32,
    /// Extra flags.
    pub xfl: u8,
    /// Operating system.
    pub os: u8,
    /// Raw extra field (if FEXTRA flag set).
    pub extra: Option<Vec<u8>>,
    /// Original filename (if FNAME flag set).
    pub filename: Option<String>,
    /// Comment (if FCOMMENT flag set).
    pub comment: Option<String>,
    /// Header CRC16 (if FHCRC flag set).
    pub header_crc: Option<u16>,
    /// Header length in bytes, magic through header CRC.
    pub header_len: usize,
    /// Low 16 bits of the CRC-32 over the bytes preceding the header CRC.
    computed_crc: Option<u16>,
}

impl GzipHeader {
    /// Parse a header at the reader's current (byte-aligned) position.
    ///
    /// On success the reader is positioned at the first byte of the
    /// DEFLATE stream.
    pub fn parse(reader: &mut BitReader<'_>) -> Result<Self> {
        reader.align_to_byte();
        let start = reader.byte_offset();

        let magic = reader.read_slice(2)?;
        if magic != GZIP_MAGIC {
            return Err(RgzipError::bad_magic([magic[0], magic[1]]));
        }

        let method = reader.read_u8()?;
        if method != CM_DEFLATE {
            return Err(RgzipError::unsupported_method(method));
        }

        let flags = reader.read_u8()?;
        let mtime = reader.read_u32_le()?;
        let xfl = reader.read_u8()?;
        let os = reader.read_u8()?;

        let mut extra = None;
        let mut filename = None;
        let mut comment = None;
        let mut header_crc = None;
        let mut computed_crc = None;

        // Extra field
        if flags & flags::FEXTRA != 0 {
            let xlen = reader.read_u16_le()? as usize;
            extra = Some(reader.read_slice(xlen)?.to_vec());
        }

        // Filename
        if flags & flags::FNAME != 0 {
            filename = Some(String::from_utf8_lossy(reader.read_until_nul()?).into_owned());
        }

        // Comment
        if flags & flags::FCOMMENT != 0 {
            comment = Some(String::from_utf8_lossy(reader.read_until_nul()?).into_owned());
        }

        // Header CRC
        if flags & flags::FHCRC != 0 {
            let covered = &reader.get_ref()[start..reader.byte_offset()];
            computed_crc = Some(Crc32::compute(covered) as u16);
            header_crc = Some(reader.read_u16_le()?);
        }

        Ok(Self {
            method,
            flags,
            mtime,
            xfl,
            os,
            extra,
            filename,
            comment,
            header_crc,
            header_len: reader.byte_offset() - start,
            computed_crc,
        })
    }

    /// Check the FHCRC field against the header bytes.
    ///
    /// Headers without FHCRC always pass.
    pub fn verify_crc(&self) -> Result<()> {
        match (self.header_crc, self.computed_crc) {
            (Some(expected), Some(computed)) if expected != computed => {
                Err(RgzipError::header_checksum_mismatch(expected, computed))
            }
            _ => Ok(()),
        }
    }

    /// Whether the FTEXT flag is set.
    pub fn is_text(&self) -> bool {
        self.flags & flags::FTEXT != 0
    }

    /// Iterate over the subfields of the extra field.
    ///
    /// Each subfield is a two-byte ID and its data. Iteration stops at the
    /// first subfield whose declared length runs past the extra field.
    pub fn extra_subfields(&self) -> ExtraSubfields<'_> {
        ExtraSubfields {
            data: self.extra.as_deref().unwrap_or_default(),
        }
    }
}

/// Iterator over `(id, data)` subfields of a gzip extra field.
#[derive(Debug, Clone)]
pub struct ExtraSubfields<'a> {
    data: &'a [u8],
}

impl<'a> Iterator for ExtraSubfields<'a> {
    type Item = ([u8; 2], &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.data.len() < 4 {
            return None;
        }

        let id = [self.data[0], self.data[1]];
        let len = u16::from_le_bytes([self.data[2], self.data[3]]) as usize;
        let body = self.data.get(4..4 + len)?;
        self.data = &self.data[4 + len..];
        Some((id, body))
    }
}
