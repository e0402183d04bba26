//! Byte-consumption accounting over a seekable stream.

use std::io::{Read, Seek, SeekFrom};

/// Wraps a seekable byte stream and tracks how many bytes have been consumed
/// since the start of the chunk, so the chunk reader can tell when it has
/// walked past the last page.
///
/// Absolute seeks resynchronize the counter to `target - start`, keeping the
/// accounting correct when the reader jumps from a detached dictionary page
/// back to the first data page.
pub struct OffsetReader<R> {
    inner: R,
    start: u64,
    consumed: i64,
}

impl<R> OffsetReader<R> {
    /// Bytes consumed since the chunk start.
    pub fn count(&self) -> i64 {
        self.consumed
    }

    /// Current absolute position in the underlying stream.
    pub fn position(&self) -> i64 {
        self.start as i64 + self.consumed
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Seek> OffsetReader<R> {
    /// Seeks the underlying stream to `start` and begins counting from zero.
    pub fn new_at(mut inner: R, start: u64) -> std::io::Result<OffsetReader<R>> {
        inner.seek(SeekFrom::Start(start))?;
        Ok(OffsetReader {
            inner,
            start,
            consumed: 0,
        })
    }

    /// Seeks to an absolute position, resynchronizing the consumption
    /// counter.
    pub fn seek_to(&mut self, pos: u64) -> std::io::Result<()> {
        self.inner.seek(SeekFrom::Start(pos))?;
        self.consumed = pos as i64 - self.start as i64;
        Ok(())
    }
}

impl<R: Read> Read for OffsetReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.consumed += n as i64;
        Ok(n)
    }
}
