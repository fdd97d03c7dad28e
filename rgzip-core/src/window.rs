//! Output buffer and LZ77 sliding window for DEFLATE decompression.
//!
//! DEFLATE back-references reach at most 32 KB into the already produced
//! output. Because the whole output is kept anyway, the window is not a
//! separate ring buffer: it is the tail of the output vector, and a
//! back-reference is a copy between two index ranges of one contiguous
//! allocation.
//!
//! The output may hold several gzip members back to back. Each member
//! starts with an empty history, so [`OutputWindow::begin_member`] moves
//! the window origin to the current end of the output.
//!
//! All growth goes through [`Vec::try_reserve`], so running out of memory
//! is reported as [`RgzipError::AllocationFailure`] instead of aborting.

use crate::error::{RgzipError, Result};

/// Maximum back-reference distance for DEFLATE (32 KB).
pub const WINDOW_SIZE: usize = 32768;

/// Growable output buffer that doubles as the DEFLATE history window.
#[derive(Debug, Default)]
pub struct OutputWindow {
    /// Accumulated output.
    output: Vec<u8>,
    /// Index where the current member's output begins.
    member_start: usize,
    /// Optional cap on the total output length.
    limit: Option<usize>,
}

impl OutputWindow {
    /// Create an empty output window without a size limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty output window that refuses to grow past `limit` bytes.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Reserve capacity for at least `additional` more bytes.
    ///
    /// This is only an allocation hint: it is clamped to the configured
    /// limit and does not count against it.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        let additional = match self.limit {
            Some(limit) => additional.min(limit.saturating_sub(self.output.len())),
            None => additional,
        };
        self.output
            .try_reserve(additional)
            .map_err(|_| RgzipError::allocation_failure(additional))
    }

    /// Make room for `additional` bytes, enforcing the limit.
    #[inline]
    fn ensure(&mut self, additional: usize) -> Result<()> {
        if let Some(limit) = self.limit {
            if additional > limit.saturating_sub(self.output.len()) {
                return Err(RgzipError::output_limit(limit));
            }
        }

        if self.output.capacity() - self.output.len() < additional {
            self.output
                .try_reserve(additional)
                .map_err(|_| RgzipError::allocation_failure(additional))?;
        }

        Ok(())
    }

    /// Start a new member: back-references may no longer reach earlier output.
    pub fn begin_member(&mut self) {
        self.member_start = self.output.len();
    }

    /// Number of history bytes a back-reference may currently reach.
    #[inline]
    pub fn window_len(&self) -> usize {
        (self.output.len() - self.member_start).min(WINDOW_SIZE)
    }

    /// Write a literal byte.
    #[inline]
    pub fn emit_literal(&mut self, byte: u8) -> Result<()> {
        self.ensure(1)?;
        self.output.push(byte);
        Ok(())
    }

    /// Write multiple literal bytes.
    pub fn emit_literals(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure(bytes.len())?;
        self.output.extend_from_slice(bytes);
        Ok(())
    }

    /// Copy `length` bytes starting `distance` bytes back from the end.
    ///
    /// When `distance < length` the source overlaps the bytes being written,
    /// and the result is the same as copying one byte at a time: a distance
    /// of 1 repeats the last byte `length` times.
    pub fn emit_match(&mut self, length: usize, distance: usize) -> Result<()> {
        let available = self.window_len();
        if distance == 0 || distance > available {
            return Err(RgzipError::invalid_back_reference(distance, available));
        }

        self.ensure(length)?;

        let mut src = self.output.len() - distance;
        let mut remaining = length;
        while remaining > 0 {
            let chunk = remaining.min(self.output.len() - src);
            self.output.extend_from_within(src..src + chunk);
            src += chunk;
            remaining -= chunk;
        }

        Ok(())
    }

    /// Get the total output length.
    pub fn len(&self) -> usize {
        self.output.len()
    }

    /// Check if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    /// Index where the current member's output begins.
    pub fn member_start(&self) -> usize {
        self.member_start
    }

    /// Get the output data.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Output produced since `start`.
    pub fn output_since(&self, start: usize) -> &[u8] {
        &self.output[start..]
    }

    /// Consume and return the output data.
    pub fn into_output(self) -> Vec<u8> {
        self.output
    }
}
