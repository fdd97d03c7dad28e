//! Canonical Huffman decoding tables for DEFLATE.
//!
//! DEFLATE transmits Huffman codes as a list of per-symbol code lengths.
//! Codes of the same length are assigned consecutive values in symbol
//! order (a canonical code), so the lengths alone determine every code.
//!
//! A [`HuffmanTable`] stores the code as flat arrays rather than a tree:
//!
//! - `counts[len]`: how many symbols use each code length
//! - `symbols`: used symbols sorted by (length, symbol)
//! - `fast_table`: a direct lookup indexed by the next `fast_bits` input
//!   bits (bit-reversed, since Huffman codes are packed MSB-first inside
//!   the LSB-first bit stream)
//!
//! # Alphabets
//!
//! DEFLATE uses three Huffman alphabets:
//! - **Literal/Length**: 0-287 (0-255 literals, 256 EOB, 257-285 lengths)
//! - **Distance**: 0-31 (0-29 in use)
//! - **Code Length**: 0-18 (for encoding dynamic Huffman tables)

use rgzip_core::BitReader;
use rgzip_core::error::{Result, RgzipError};

/// Maximum code length in DEFLATE (15 bits).
pub const MAX_CODE_LENGTH: usize = 15;

/// Largest alphabet a DEFLATE table can describe (literal/length, 0-287).
pub const MAX_SYMBOLS: usize = 288;

/// End of block symbol.
pub const END_OF_BLOCK: u16 = 256;

/// A canonical Huffman decoding table.
#[derive(Debug, Clone)]
pub struct HuffmanTable {
    /// Number of codes of each length; `counts[0]` is unused.
    counts: [u16; MAX_CODE_LENGTH + 1],
    /// Used symbols ordered by code length, then by symbol value.
    symbols: Vec<u16>,
    /// Direct lookup: (symbol, code_length), code_length 0 means "not here".
    fast_table: Vec<(u16, u8)>,
    /// Number of bits indexing `fast_table`.
    fast_bits: u8,
    /// Maximum code length in this table (0 for an empty table).
    max_code_length: u8,
}

impl HuffmanTable {
    /// Number of bits for the fast lookup table.
    const FAST_BITS: u8 = 9;

    /// Build a table from code lengths.
    ///
    /// `code_lengths[i]` is the bit length for symbol `i`; 0 means the symbol
    /// is unused. Over-subscribed lengths (more codes than the code space
    /// holds) are rejected. Incomplete codes are accepted, including the
    /// single-symbol and empty cases; bit patterns left unassigned decode to
    /// [`RgzipError::InvalidHuffmanCode`].
    pub fn from_code_lengths(code_lengths: &[u8]) -> Result<Self> {
        if code_lengths.len() > MAX_SYMBOLS {
            return Err(RgzipError::invalid_table("too many symbols"));
        }

        let mut counts = [0u16; MAX_CODE_LENGTH + 1];
        let mut max_length = 0u8;

        for &len in code_lengths {
            if len as usize > MAX_CODE_LENGTH {
                return Err(RgzipError::invalid_table("code length exceeds 15 bits"));
            }
            if len > 0 {
                counts[len as usize] += 1;
                max_length = max_length.max(len);
            }
        }

        // Kraft check: each length doubles the code space, and every code
        // of that length consumes one slot.
        let mut left: i32 = 1;
        for &count in &counts[1..] {
            left <<= 1;
            left -= count as i32;
            if left < 0 {
                return Err(RgzipError::invalid_table("over-subscribed code lengths"));
            }
        }

        // Offsets of each length's first symbol within `symbols`
        let mut offsets = [0u16; MAX_CODE_LENGTH + 2];
        for len in 1..=MAX_CODE_LENGTH {
            offsets[len + 1] = offsets[len] + counts[len];
        }

        let mut symbols = vec![0u16; offsets[MAX_CODE_LENGTH + 1] as usize];
        for (symbol, &len) in code_lengths.iter().enumerate() {
            if len > 0 {
                let slot = &mut offsets[len as usize];
                symbols[*slot as usize] = symbol as u16;
                *slot += 1;
            }
        }

        let fast_bits = Self::FAST_BITS.min(max_length);
        let fast_table = Self::build_fast_table(&counts, &symbols, fast_bits);

        Ok(Self {
            counts,
            symbols,
            fast_table,
            fast_bits,
            max_code_length: max_length,
        })
    }

    /// Fill the direct lookup table for every code no longer than `fast_bits`.
    fn build_fast_table(counts: &[u16], symbols: &[u16], fast_bits: u8) -> Vec<(u16, u8)> {
        let size = 1usize << fast_bits;
        let mut table = vec![(0u16, 0u8); size];

        let mut code = 0u32;
        let mut index = 0usize;
        for len in 1..=fast_bits {
            for _ in 0..counts[len as usize] {
                let symbol = symbols[index];
                let reversed = Self::reverse_bits(code as u16, len) as usize;

                // Every index whose low `len` bits equal the code matches it
                let mut entry = reversed;
                while entry < size {
                    table[entry] = (symbol, len);
                    entry += 1 << len;
                }

                code += 1;
                index += 1;
            }
            code <<= 1;
        }

        table
    }

    /// Reverse the low `length` bits of a code.
    fn reverse_bits(mut code: u16, length: u8) -> u16 {
        let mut reversed = 0u16;
        for _ in 0..length {
            reversed = (reversed << 1) | (code & 1);
            code >>= 1;
        }
        reversed
    }

    /// Maximum code length in this table (0 if no symbol is used).
    pub fn max_code_length(&self) -> u8 {
        self.max_code_length
    }

    /// Decode a symbol from the bit stream.
    #[inline]
    pub fn decode(&self, reader: &mut BitReader<'_>) -> Result<u16> {
        if self.max_code_length == 0 {
            return Err(RgzipError::invalid_huffman(reader.bit_position()));
        }

        // Near the end of the input fewer than `fast_bits` bits may remain
        // even though a shorter code is still there: fall back to the
        // bit-by-bit walk in that case.
        if let Ok(bits) = reader.peek_bits(self.fast_bits) {
            let (symbol, len) = self.fast_table[bits as usize];
            if len > 0 {
                reader.skip_bits(len)?;
                return Ok(symbol);
            }
        }

        self.decode_slow(reader)
    }

    /// Bit-by-bit canonical decoding, one code length at a time.
    fn decode_slow(&self, reader: &mut BitReader<'_>) -> Result<u16> {
        let mut code = 0i32; // bits read so far, MSB-first
        let mut first = 0i32; // first code of the current length
        let mut index = 0i32; // index of that code's symbol in `symbols`

        for len in 1..=self.max_code_length as usize {
            code |= reader.read_bits(1)? as i32;
            let count = self.counts[len] as i32;

            if code - first < count {
                return Ok(self.symbols[(index + code - first) as usize]);
            }

            index += count;
            first = (first + count) << 1;
            code <<= 1;
        }

        Err(RgzipError::invalid_huffman(reader.bit_position()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rgzip_core::ErrorKind;

    #[test]
    fn test_huffman_table_simple() {
        // Simple code: A=0, B=10, C=11
        // In LSB-first: A=0, B=01 (reversed from 10), C=11 (reversed from 11)
        let lengths = [1u8, 2, 2];
        let table = HuffmanTable::from_code_lengths(&lengths).unwrap();

        // Bits: 0 (A) + 01 (B) + 11 (C) + 0 (A) = 7 bits
        // Packed LSB-first into byte: 0b00011010 = 0x1A
        let data = [0b00011010u8];
        let mut reader = BitReader::new(&data);

        assert_eq!(table.decode(&mut reader).unwrap(), 0); // A
        assert_eq!(table.decode(&mut reader).unwrap(), 1); // B
        assert_eq!(table.decode(&mut reader).unwrap(), 2); // C
        assert_eq!(table.decode(&mut reader).unwrap(), 0); // A
    }

    #[test]
    fn test_rfc1951_example() {
        // RFC 1951 3.2.2: lengths (3, 3, 3, 3, 3, 2, 4, 4) for A-H give
        // F=00, A=010, B=011, C=100, D=101, E=110, G=1110, H=1111.
        let lengths = [3u8, 3, 3, 3, 3, 2, 4, 4];
        let table = HuffmanTable::from_code_lengths(&lengths).unwrap();

        // H (1111), F (00), A (010) packed MSB-first per code, LSB-first overall:
        // stream bits in order: 1 1 1 1 0 0 0 1 0
        let data = [0b1000_1111u8, 0b0000_0000];
        let mut reader = BitReader::new(&data);

        assert_eq!(table.decode(&mut reader).unwrap(), 7); // H
        assert_eq!(table.decode(&mut reader).unwrap(), 5); // F
        assert_eq!(table.decode(&mut reader).unwrap(), 0); // A
    }

    #[test]
    fn test_long_codes_use_slow_path() {
        // One symbol per length 1..=14 plus two of length 15: a complete
        // code whose longest codes exceed the fast table.
        let mut lengths = Vec::new();
        for len in 1..=14u8 {
            lengths.push(len);
        }
        lengths.push(15);
        lengths.push(15);
        let table = HuffmanTable::from_code_lengths(&lengths).unwrap();
        assert_eq!(table.max_code_length(), 15);

        // Symbol 15 is the all-ones code of length 15.
        let data = [0xFF, 0x7F];
        let mut reader = BitReader::new(&data);
        assert_eq!(table.decode(&mut reader).unwrap(), 15);
        assert_eq!(reader.bit_position(), 15);

        // Symbol 10 has length 11: ten ones followed by a zero.
        let data = [0xFF, 0b0000_0011];
        let mut reader = BitReader::new(&data);
        assert_eq!(table.decode(&mut reader).unwrap(), 10);
        assert_eq!(reader.bit_position(), 11);
    }

    #[test]
    fn test_empty_table() {
        let lengths = [0u8; 4];
        let table = HuffmanTable::from_code_lengths(&lengths).unwrap();
        assert_eq!(table.max_code_length(), 0);

        let data = [0xFF];
        let mut reader = BitReader::new(&data);
        assert_eq!(
            table.decode(&mut reader).unwrap_err().kind(),
            ErrorKind::InvalidHuffmanCode
        );
    }

    #[test]
    fn test_single_symbol() {
        let lengths = [0u8, 1, 0, 0];
        let table = HuffmanTable::from_code_lengths(&lengths).unwrap();
        assert_eq!(table.max_code_length(), 1);

        // Code 0 decodes, code 1 is unassigned.
        let data = [0b0000_0010u8];
        let mut reader = BitReader::new(&data);
        assert_eq!(table.decode(&mut reader).unwrap(), 1);
        assert_eq!(
            table.decode(&mut reader).unwrap_err().kind(),
            ErrorKind::InvalidHuffmanCode
        );
    }

    #[test]
    fn test_incomplete_code_accepted() {
        // Two codes of length 2 leave half the code space unused.
        let lengths = [2u8, 2];
        let table = HuffmanTable::from_code_lengths(&lengths).unwrap();

        // 00 -> symbol 0, 01 -> symbol 1, 1x -> invalid
        // Stream bits in order: 0 0 | 0 1 | 1 1
        let data = [0b0011_1000u8];
        let mut reader = BitReader::new(&data);
        assert_eq!(table.decode(&mut reader).unwrap(), 0);
        assert_eq!(table.decode(&mut reader).unwrap(), 1);
        assert_eq!(
            table.decode(&mut reader).unwrap_err().kind(),
            ErrorKind::InvalidHuffmanCode
        );
    }

    #[test]
    fn test_over_subscribed_rejected() {
        let lengths = [1u8, 1, 1];
        let err = HuffmanTable::from_code_lengths(&lengths).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidHuffmanTable);

        let lengths = [2u8, 2, 2, 2, 3];
        assert!(HuffmanTable::from_code_lengths(&lengths).is_err());
    }

    #[test]
    fn test_invalid_lengths_rejected() {
        assert_eq!(
            HuffmanTable::from_code_lengths(&[16]).unwrap_err().kind(),
            ErrorKind::InvalidHuffmanTable
        );
        assert_eq!(
            HuffmanTable::from_code_lengths(&[8u8; MAX_SYMBOLS + 1])
                .unwrap_err()
                .kind(),
            ErrorKind::InvalidHuffmanTable
        );
    }

    #[test]
    fn test_truncated_code() {
        // A 9-bit code cannot be decoded from a single byte.
        let lengths = crate::tables::fixed_litlen_lengths();
        let table = HuffmanTable::from_code_lengths(&lengths).unwrap();

        let data = [0xFF];
        let mut reader = BitReader::new(&data);
        assert_eq!(
            table.decode(&mut reader).unwrap_err().kind(),
            ErrorKind::TruncatedInput
        );
    }

    #[test]
    fn test_reverse_bits() {
        assert_eq!(HuffmanTable::reverse_bits(0b101, 3), 0b101);
        assert_eq!(HuffmanTable::reverse_bits(0b1100, 4), 0b0011);
        assert_eq!(HuffmanTable::reverse_bits(0b10101010, 8), 0b01010101);
    }
}
