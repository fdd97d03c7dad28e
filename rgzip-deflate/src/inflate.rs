//! DEFLATE decompression (inflate).
//!
//! This module implements the DEFLATE block decoder specified in RFC 1951.
//! It supports all three block types:
//! - Type 0: Stored (uncompressed)
//! - Type 1: Fixed Huffman codes
//! - Type 2: Dynamic Huffman codes
//!
//! The decoder reads from a [`BitReader`] and appends to an
//! [`OutputWindow`]; it owns neither, so a container format can run
//! several DEFLATE streams over one input and one output.

use crate::huffman::{END_OF_BLOCK, HuffmanTable};
use crate::tables::{
    CODE_LENGTH_ORDER, DISTANCE_EXTRA_BITS, LENGTH_EXTRA_BITS, decode_distance, decode_length,
    fixed_distance_table, fixed_litlen_table,
};
use rgzip_core::error::{Result, RgzipError};
use rgzip_core::{BitReader, OutputWindow};

/// The kind of a DEFLATE block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    /// Uncompressed bytes (BTYPE 00).
    Stored,
    /// Fixed Huffman codes (BTYPE 01).
    Fixed,
    /// Dynamic Huffman codes (BTYPE 10).
    Dynamic,
}

/// DEFLATE block decoder.
///
/// Tracks only whether the final block has been seen; everything else lives
/// in the reader and the output window passed to each call.
#[derive(Debug, Default)]
pub struct Inflater {
    /// Whether the block with BFINAL set has been decoded.
    final_block: bool,
    /// Number of blocks decoded so far.
    blocks: usize,
}

impl Inflater {
    /// Create a new DEFLATE decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the final block has been decoded.
    pub fn is_finished(&self) -> bool {
        self.final_block
    }

    /// Number of blocks decoded so far.
    pub fn blocks(&self) -> usize {
        self.blocks
    }

    /// Decode blocks until the final one has been processed.
    pub fn inflate(&mut self, reader: &mut BitReader<'_>, output: &mut OutputWindow) -> Result<()> {
        while !self.final_block {
            self.inflate_block(reader, output)?;
        }
        Ok(())
    }

    /// Decode a single block and report its type.
    pub fn inflate_block(
        &mut self,
        reader: &mut BitReader<'_>,
        output: &mut OutputWindow,
    ) -> Result<BlockType> {
        let header_offset = reader.byte_offset();
        let bfinal = reader.read_bit()?;
        let btype = reader.read_bits(2)? as u8;
        let start = output.len();

        let block_type = match btype {
            0 => {
                self.inflate_stored(reader, output)?;
                BlockType::Stored
            }
            1 => {
                self.inflate_fixed(reader, output)?;
                BlockType::Fixed
            }
            2 => {
                self.inflate_dynamic(reader, output)?;
                BlockType::Dynamic
            }
            _ => return Err(RgzipError::invalid_block_type(btype, header_offset)),
        };

        self.final_block = bfinal;
        self.blocks += 1;

        tracing::trace!(
            ?block_type,
            bfinal,
            offset = header_offset,
            produced = output.len() - start,
            "inflated block"
        );

        Ok(block_type)
    }

    /// Decompress a stored (uncompressed) block.
    fn inflate_stored(&mut self, reader: &mut BitReader<'_>, output: &mut OutputWindow) -> Result<()> {
        reader.align_to_byte();

        let len = reader.read_u16_le()?;
        let nlen = reader.read_u16_le()?;
        if len != !nlen {
            return Err(RgzipError::stored_length_mismatch(len, nlen));
        }

        let bytes = reader.read_slice(len as usize)?;
        output.emit_literals(bytes)
    }

    /// Decompress a block with fixed Huffman codes.
    fn inflate_fixed(&mut self, reader: &mut BitReader<'_>, output: &mut OutputWindow) -> Result<()> {
        let litlen_table = fixed_litlen_table()?;
        let dist_table = fixed_distance_table()?;

        self.inflate_huffman(reader, output, litlen_table, dist_table)
    }

    /// Decompress a block with dynamic Huffman codes.
    fn inflate_dynamic(&mut self, reader: &mut BitReader<'_>, output: &mut OutputWindow) -> Result<()> {
        let (litlen_table, dist_table) = Self::read_dynamic_tables(reader)?;
        self.inflate_huffman(reader, output, &litlen_table, &dist_table)
    }

    /// Read the code length code and the two Huffman tables of a dynamic block.
    fn read_dynamic_tables(reader: &mut BitReader<'_>) -> Result<(HuffmanTable, HuffmanTable)> {
        let hlit = reader.read_bits(5)? as usize + 257; // literal/length codes
        let hdist = reader.read_bits(5)? as usize + 1; // distance codes
        let hclen = reader.read_bits(4)? as usize + 4; // code length codes

        let mut code_length_lengths = [0u8; 19];
        for &symbol in CODE_LENGTH_ORDER.iter().take(hclen) {
            code_length_lengths[symbol] = reader.read_bits(3)? as u8;
        }

        let code_length_table = HuffmanTable::from_code_lengths(&code_length_lengths)?;

        // Literal/length and distance lengths form one run-length coded sequence
        let mut all_lengths = [0u8; 288 + 32];
        let total = hlit + hdist;
        let mut i = 0;

        while i < total {
            let symbol = code_length_table.decode(reader)?;

            let (value, repeat) = match symbol {
                0..=15 => (symbol as u8, 1),
                16 => {
                    // Copy previous length 3-6 times
                    if i == 0 {
                        return Err(RgzipError::invalid_table("repeat with no previous length"));
                    }
                    (all_lengths[i - 1], reader.read_bits(2)? as usize + 3)
                }
                // Repeat zero 3-10 times
                17 => (0, reader.read_bits(3)? as usize + 3),
                // Repeat zero 11-138 times
                18 => (0, reader.read_bits(7)? as usize + 11),
                _ => return Err(RgzipError::invalid_huffman(reader.bit_position())),
            };

            if i + repeat > total {
                return Err(RgzipError::invalid_table("code length repeat overflows"));
            }
            all_lengths[i..i + repeat].fill(value);
            i += repeat;
        }

        let litlen_lengths = &all_lengths[..hlit];
        let dist_lengths = &all_lengths[hlit..total];

        if litlen_lengths[END_OF_BLOCK as usize] == 0 {
            return Err(RgzipError::invalid_table("missing end-of-block code"));
        }

        let litlen_table = HuffmanTable::from_code_lengths(litlen_lengths)?;
        let dist_table = HuffmanTable::from_code_lengths(dist_lengths)?;

        Ok((litlen_table, dist_table))
    }

    /// Decode literal/length and distance symbols until end of block.
    fn inflate_huffman(
        &mut self,
        reader: &mut BitReader<'_>,
        output: &mut OutputWindow,
        litlen_table: &HuffmanTable,
        dist_table: &HuffmanTable,
    ) -> Result<()> {
        loop {
            let symbol = litlen_table.decode(reader)?;

            match symbol {
                0..=255 => output.emit_literal(symbol as u8)?,
                END_OF_BLOCK => return Ok(()),
                257..=285 => {
                    let extra_bits = LENGTH_EXTRA_BITS[(symbol - 257) as usize];
                    let extra = reader.read_bits(extra_bits)? as u16;
                    let length = decode_length(symbol, extra);

                    let dist_symbol = dist_table.decode(reader)?;
                    if dist_symbol >= 30 {
                        // Distance codes 30 and 31 have no meaning
                        return Err(RgzipError::invalid_huffman(reader.bit_position()));
                    }

                    let dist_extra_bits = DISTANCE_EXTRA_BITS[dist_symbol as usize];
                    let dist_extra = reader.read_bits(dist_extra_bits)? as u16;
                    let distance = decode_distance(dist_symbol, dist_extra);

                    output.emit_match(length as usize, distance as usize)?;
                }
                _ => {
                    return Err(RgzipError::invalid_length_symbol(
                        symbol,
                        reader.bit_position(),
                    ));
                }
            }
        }
    }
}
