//! Reusable byte buffers for rendered units.

use parking_lot::Mutex;
use std::io;
use std::ops::{Deref, DerefMut};

/// Free-list of byte buffers shared by all workers of a run.
///
/// The pool has no capacity ceiling. Buffers are allocated lazily on first demand
/// and come back cleared when their [`PooledBuffer`] handle is dropped.
#[derive(Debug, Default)]
pub struct BufferPool {
    free: Mutex<Vec<Vec<u8>>>,
}

impl BufferPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an empty buffer, reusing a released one when available.
    pub fn acquire(&self) -> PooledBuffer<'_> {
        let buf = self.free.lock().pop().unwrap_or_default();
        debug_assert!(buf.is_empty());
        PooledBuffer { buf, pool: self }
    }

    /// Clears `buf` and puts it back on the free list.
    pub fn release(&self, mut buf: Vec<u8>) {
        buf.clear();
        self.free.lock().push(buf);
    }

    /// Number of buffers currently waiting for reuse.
    pub fn idle(&self) -> usize {
        self.free.lock().len()
    }
}

/// Exclusive handle to a pooled buffer.
///
/// The buffer returns to its pool when the handle is dropped, so release happens on
/// every exit path of a job.
#[derive(Debug)]
pub struct PooledBuffer<'a> {
    buf: Vec<u8>,
    pool: &'a BufferPool,
}

impl Deref for PooledBuffer<'_> {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.buf
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }
}

impl io::Write for PooledBuffer<'_> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.buf));
    }
}
