//! Bit-level reading over an in-memory compressed buffer.
//!
//! This module provides [`BitReader`], a cursor over a borrowed byte slice
//! that reads variable-length bit fields (Huffman codes, extra bits) as
//! well as byte-aligned fields (gzip header, stored blocks, trailer).
//!
//! # Bit Ordering
//!
//! DEFLATE uses LSB-first ordering within bytes: bits are consumed starting
//! from the least significant bit of each byte, and multi-bit fields are
//! assembled with the first bit read in the least significant position.
//!
//! # Example
//!
//! ```
//! use rgzip_core::bitstream::BitReader;
//!
//! let data = [0b1100_1101, 0xAA];
//! let mut reader = BitReader::new(&data);
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_bits(5).unwrap(), 0b11001);
//! assert_eq!(reader.read_u8().unwrap(), 0xAA);
//! assert!(reader.is_at_end());
//! ```

use crate::error::{RgzipError, Result};

/// A bit-level reader over a borrowed byte slice.
///
/// `BitReader` keeps a 64-bit lookahead buffer filled from the slice so that
/// reads of up to 32 bits never touch the slice more than once. Reading past
/// the end of the slice is reported as [`RgzipError::TruncatedInput`].
///
/// Byte-aligned reads first discard any partial byte, then return the
/// whole bytes still held in the lookahead buffer to the slice, so aligned
/// and bit-level reads can be mixed freely.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    /// Underlying input.
    data: &'a [u8],
    /// Index of the next byte to load into `buffer`.
    pos: usize,
    /// Bit buffer (LSB-first).
    buffer: u64,
    /// Number of valid bits in buffer.
    bits_in_buffer: u8,
    /// Total bits consumed (for error reporting).
    total_bits_read: u64,
}

impl<'a> BitReader<'a> {
    /// Create a new `BitReader` at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            buffer: 0,
            bits_in_buffer: 0,
            total_bits_read: 0,
        }
    }

    /// Get the underlying input slice.
    pub fn get_ref(&self) -> &'a [u8] {
        self.data
    }

    /// Get the total number of bits consumed so far.
    pub fn bit_position(&self) -> u64 {
        self.total_bits_read
    }

    /// Offset of the byte holding the next unread bit.
    pub fn byte_offset(&self) -> usize {
        self.pos - (self.bits_in_buffer as usize).div_ceil(8)
    }

    /// Number of whole unread bytes, not counting a partially consumed byte.
    pub fn remaining_bytes(&self) -> usize {
        self.data.len() - self.pos + (self.bits_in_buffer / 8) as usize
    }

    /// Check if every bit of the input has been consumed.
    pub fn is_at_end(&self) -> bool {
        self.pos == self.data.len() && self.bits_in_buffer == 0
    }

    /// Ensure at least `count` bits are available in the buffer.
    #[inline]
    fn fill_buffer(&mut self, count: u8) -> Result<()> {
        debug_assert!(count <= 32, "Cannot fill more than 32 bits at once");

        if self.bits_in_buffer >= count {
            return Ok(());
        }

        while self.bits_in_buffer <= 56 && self.pos < self.data.len() {
            self.buffer |= (self.data[self.pos] as u64) << self.bits_in_buffer;
            self.bits_in_buffer += 8;
            self.pos += 1;
        }

        if self.bits_in_buffer < count {
            return Err(RgzipError::truncated(
                self.byte_offset(),
                (count - self.bits_in_buffer) as usize,
            ));
        }

        Ok(())
    }

    /// Read up to 32 bits from the stream.
    ///
    /// # Arguments
    ///
    /// * `count` - Number of bits to read (0-32)
    ///
    /// # Returns
    ///
    /// The bits read as a u32, with the first bit read in the LSB position.
    #[inline]
    pub fn read_bits(&mut self, count: u8) -> Result<u32> {
        if count == 0 {
            return Ok(0);
        }

        self.fill_buffer(count)?;

        let mask = (1u64 << count).wrapping_sub(1);
        let result = (self.buffer & mask) as u32;

        self.buffer >>= count;
        self.bits_in_buffer -= count;
        self.total_bits_read += count as u64;

        Ok(result)
    }

    /// Peek at up to 32 bits without consuming them.
    ///
    /// Fails with [`RgzipError::TruncatedInput`] when fewer than `count`
    /// bits remain; the cursor is left unchanged either way.
    #[inline]
    pub fn peek_bits(&mut self, count: u8) -> Result<u32> {
        if count == 0 {
            return Ok(0);
        }

        self.fill_buffer(count)?;

        let mask = (1u64 << count).wrapping_sub(1);
        Ok((self.buffer & mask) as u32)
    }

    /// Skip a number of bits.
    pub fn skip_bits(&mut self, count: u8) -> Result<()> {
        if count == 0 {
            return Ok(());
        }

        self.fill_buffer(count)?;

        self.buffer >>= count;
        self.bits_in_buffer -= count;
        self.total_bits_read += count as u64;

        Ok(())
    }

    /// Read a single bit.
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_bits(1)? != 0)
    }

    /// Align to the next byte boundary by discarding partial bits.
    ///
    /// Whole bytes already loaded into the lookahead buffer are handed back
    /// to the slice, so the next byte-aligned read starts exactly at
    /// [`byte_offset`](Self::byte_offset).
    pub fn align_to_byte(&mut self) {
        let remainder = self.bits_in_buffer % 8;
        self.total_bits_read += remainder as u64;
        self.pos -= (self.bits_in_buffer / 8) as usize;
        self.buffer = 0;
        self.bits_in_buffer = 0;
    }

    /// Borrow the next `len` bytes after aligning to a byte boundary.
    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8]> {
        self.align_to_byte();

        let available = self.data.len() - self.pos;
        if available < len {
            return Err(RgzipError::truncated(self.pos, (len - available) * 8));
        }

        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        self.total_bits_read += len as u64 * 8;
        Ok(slice)
    }

    /// Skip `len` bytes after aligning to a byte boundary.
    pub fn skip_bytes(&mut self, len: usize) -> Result<()> {
        self.read_slice(len).map(|_| ())
    }

    /// Read an aligned byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_slice(1)?[0])
    }

    /// Read an aligned little-endian 16-bit value.
    pub fn read_u16_le(&mut self) -> Result<u16> {
        let bytes = self.read_slice(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Read an aligned little-endian 32-bit value.
    pub fn read_u32_le(&mut self) -> Result<u32> {
        let bytes = self.read_slice(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read bytes up to a NUL terminator.
    ///
    /// Returns the bytes before the terminator; the terminator itself is
    /// consumed. A missing terminator is a truncated input.
    pub fn read_until_nul(&mut self) -> Result<&'a [u8]> {
        self.align_to_byte();

        let rest = &self.data[self.pos..];
        match rest.iter().position(|&b| b == 0) {
            Some(end) => {
                self.pos += end + 1;
                self.total_bits_read += (end as u64 + 1) * 8;
                Ok(&rest[..end])
            }
            None => Err(RgzipError::truncated(self.data.len(), 8)),
        }
    }
}
