//! Serialized access to the single output sink.

use log::debug;
use parking_lot::Mutex;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Wraps the output sink so that whole buffers are appended one at a time.
///
/// Each [`SyncWriter::flush`] holds the lock for the full write, so byte
/// sequences from two flushes never interleave.
#[derive(Debug)]
pub struct SyncWriter<W> {
    inner: Mutex<W>,
}

impl SyncWriter<File> {
    /// Creates (or truncates) the file at `path` as the run's sink.
    ///
    /// The file is not wrapped in a `BufWriter`: every flush is already a single
    /// whole-buffer write.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        File::create(path).map(Self::new)
    }
}

impl<W: Write> SyncWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }

    /// Appends the whole of `buf` to the sink and clears it.
    ///
    /// The sink's own buffering is flushed under the same lock, so a failure is
    /// reported to the flush that caused it. The buffer is cleared even when the
    /// write fails, so it is always safe to reuse. A failed flush leaves the lock
    /// usable for the next one.
    ///
    /// # Returns
    /// * `io::Result<usize>` - Number of bytes written
    pub fn flush(&self, buf: &mut Vec<u8>) -> io::Result<usize> {
        let len = buf.len();
        let result = {
            let mut sink = self.inner.lock();
            sink.write_all(buf).and_then(|()| sink.flush())
        };
        buf.clear();
        result?;
        debug!("Flushed {len} bytes");
        Ok(len)
    }

    /// Returns the wrapped sink.
    pub fn into_inner(self) -> W {
        self.inner.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct UnflushableSink(Vec<u8>);

    impl Write for UnflushableSink {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.0.extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
    }

    #[test]
    fn buffered_sink_errors_surface_on_the_failing_flush() {
        let writer = SyncWriter::new(io::BufWriter::new(UnflushableSink(Vec::new())));
        let mut buf = b"package smartmock\n".to_vec();

        let err = writer.flush(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert!(buf.is_empty());
    }

    #[test]
    fn flush_appends_and_clears() {
        let writer = SyncWriter::new(Vec::new());
        let mut buf = b"package smartmock\n".to_vec();

        assert_eq!(writer.flush(&mut buf).unwrap(), 18);
        assert!(buf.is_empty());

        buf.extend_from_slice(b"func Fn0x0() {}\n");
        writer.flush(&mut buf).unwrap();

        assert_eq!(
            writer.into_inner(),
            b"package smartmock\nfunc Fn0x0() {}\n".to_vec()
        );
    }

    #[test]
    fn failed_flush_still_clears_and_releases_the_lock() {
        let writer = SyncWriter::new(FailingSink);
        let mut buf = b"func Fn1x1() {}\n".to_vec();

        let err = writer.flush(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert!(buf.is_empty());

        buf.push(b'x');
        assert!(writer.flush(&mut buf).is_err());
    }
}
