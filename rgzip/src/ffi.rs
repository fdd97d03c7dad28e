//! C ABI entry points.
//!
//! ```c
//! void *decompress_gzip_to_heap(const void *buf, int buf_len, int *new_buf_len);
//! void rgzip_free(void *buf, int buf_len);
//! ```
//!
//! The returned buffer comes from `malloc` and is owned by the caller, who
//! releases it with `free` or, equivalently, [`rgzip_free`]. A successful
//! call never returns null, even for empty output. Every failure is
//! reported as a null return; no panic crosses the boundary.

use core::ffi::{c_int, c_void};
use core::ptr;
use rgzip_core::error::Result;
use std::panic;

/// Decompress a gzip buffer into a new `malloc` allocation.
///
/// On success returns the decompressed bytes and stores their count in
/// `*new_buf_len`. On any failure returns null and leaves `*new_buf_len`
/// untouched.
///
/// # Safety
///
/// `buf` must be null or point to `buf_len` readable bytes, and
/// `new_buf_len` must be null or point to a writable `int`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn decompress_gzip_to_heap(
    buf: *const c_void,
    buf_len: c_int,
    new_buf_len: *mut c_int,
) -> *mut c_void {
    if new_buf_len.is_null() {
        return ptr::null_mut();
    }

    let input: &[u8] = if buf.is_null() || buf_len <= 0 {
        &[]
    } else {
        // SAFETY: the caller guarantees `buf_len` readable bytes at `buf`.
        unsafe { core::slice::from_raw_parts(buf.cast::<u8>(), buf_len as usize) }
    };

    let output = match panic::catch_unwind(|| decompress_bounded(input)) {
        Ok(Ok(output)) => output,
        Ok(Err(err)) => {
            tracing::debug!(kind = ?err.kind(), %err, "decompress_gzip_to_heap failed");
            return ptr::null_mut();
        }
        Err(_) => {
            tracing::debug!("decompress_gzip_to_heap panicked");
            return ptr::null_mut();
        }
    };

    // malloc(0) may return null, which would read as failure
    // SAFETY: plain allocation with a non-zero size.
    let raw = unsafe { libc::malloc(output.len().max(1)) };
    if raw.is_null() {
        tracing::debug!(requested = output.len(), "malloc failed for decompressed output");
        return ptr::null_mut();
    }

    // SAFETY: `raw` holds at least `output.len()` bytes and cannot overlap `output`.
    unsafe { ptr::copy_nonoverlapping(output.as_ptr(), raw.cast::<u8>(), output.len()) };
    // SAFETY: checked non-null above; the caller guarantees it is writable.
    unsafe { *new_buf_len = output.len() as c_int };
    raw
}

/// Release a buffer returned by [`decompress_gzip_to_heap`].
///
/// Same as calling `free(buf)`; `buf_len` is accepted for symmetry and
/// ignored. Null pointers are ignored.
///
/// # Safety
///
/// `buf` must be null or a pointer returned by [`decompress_gzip_to_heap`]
/// that has not been freed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rgzip_free(buf: *mut c_void, _buf_len: c_int) {
    // SAFETY: the caller guarantees `buf` came from our `malloc` or is null.
    unsafe { libc::free(buf) };
}

/// Decompress, refusing output that cannot be described by a C `int`.
fn decompress_bounded(input: &[u8]) -> Result<Vec<u8>> {
    crate::GzipDecoder::new()
        .max_output_size(Some(c_int::MAX as usize))
        .decompress(input)
}
