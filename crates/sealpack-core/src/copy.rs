//! Chunked copy with a reusable stack buffer.

use std::io;
use std::io::Read;
use std::io::Write;

use crate::ArchiveError;
use crate::Result;
use crate::error::QuotaResource;

/// Buffer size for streaming entry data (64 KiB).
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Stack-allocated buffer reused across every entry of one operation.
#[derive(Debug)]
pub struct CopyBuffer {
    #[allow(clippy::large_stack_arrays)]
    buf: [u8; COPY_BUFFER_SIZE],
}

impl CopyBuffer {
    /// Creates a zeroed buffer.
    #[inline]
    #[must_use]
    #[allow(clippy::large_stack_arrays)]
    pub fn new() -> Self {
        Self {
            buf: [0u8; COPY_BUFFER_SIZE],
        }
    }

    /// Returns the buffer size in bytes.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        COPY_BUFFER_SIZE
    }

    /// Copies `reader` into `writer`, calling `on_chunk` with each chunk
    /// length after it has been written.
    ///
    /// `on_chunk` may abort the copy by returning an error, which is how
    /// size limits are enforced on actual bytes rather than on headers.
    ///
    /// # Errors
    ///
    /// Returns `Io` on read or write failure, `QuotaExceeded` if the total
    /// overflows `u64`, or whatever `on_chunk` returns.
    pub fn copy<R, W, F>(&mut self, reader: &mut R, writer: &mut W, mut on_chunk: F) -> Result<u64>
    where
        R: Read + ?Sized,
        W: Write + ?Sized,
        F: FnMut(u64) -> Result<()>,
    {
        let mut total: u64 = 0;

        loop {
            let read = match reader.read(&mut self.buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ArchiveError::Io(e)),
            };

            writer.write_all(&self.buf[..read])?;

            total = total
                .checked_add(read as u64)
                .ok_or(ArchiveError::QuotaExceeded {
                    resource: QuotaResource::IntegerOverflow,
                })?;
            on_chunk(read as u64)?;
        }

        Ok(total)
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}
