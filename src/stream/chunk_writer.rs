//! Chunked writer over a blocking stream

use std::{
    fmt,
    io::{self, Write},
};

use tracing::{trace, warn};

use crate::{
    error::{Result, SlimError},
    writer::BufferWriter,
};

use super::config::StreamConfig;

/// Buffers writes in one pooled chunk and pushes full chunks to a stream
///
/// Writes longer than the chunk bypass the buffer. Buffered bytes are
/// flushed when the next write would overflow the chunk, on
/// [`flush`](Self::flush), on [`into_inner`](Self::into_inner) and on drop.
/// A flush failure during drop is logged and otherwise ignored.
pub struct StreamChunkWriter<W: Write> {
    /// `None` only after `into_inner` handed the stream back
    stream: Option<W>,
    chunk: BufferWriter<'static, u8>,
    chunk_size: usize,
    /// Bytes pushed to the stream so far
    flushed: u64,
}

impl<W: Write> StreamChunkWriter<W> {
    /// Create a writer with the default 1 MiB chunk
    pub fn new(stream: W) -> Self {
        Self::from_valid_config(stream, &StreamConfig::default())
    }

    /// Create a writer with a custom configuration
    pub fn with_config(stream: W, config: StreamConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(stream, &config))
    }

    fn from_valid_config(stream: W, config: &StreamConfig) -> Self {
        Self {
            stream: Some(stream),
            chunk: BufferWriter::with_capacity(config.chunk_size),
            chunk_size: config.chunk_size,
            flushed: 0,
        }
    }

    /// Get the chunk size
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Bytes buffered but not yet pushed to the stream
    pub fn buffered(&self) -> usize {
        self.chunk.position()
    }

    /// Total bytes accepted so far, buffered or not
    pub fn bytes_written(&self) -> u64 {
        self.flushed + self.chunk.position() as u64
    }

    /// True when `addition` more bytes would overflow the chunk
    pub fn needs_flushing(&self, addition: usize) -> bool {
        addition.saturating_add(self.chunk.position()) > self.chunk_size
    }

    /// Write a run of bytes
    pub fn write(&mut self, bytes: &[u8]) -> Result<()> {
        if self.needs_flushing(bytes.len()) {
            self.flush()?;
        }

        if bytes.len() > self.chunk_size {
            let stream = self.stream_mut()?;
            stream
                .write_all(bytes)
                .map_err(|err| SlimError::from_io(err, "stream write failed"))?;
            self.flushed += bytes.len() as u64;
            trace!(bytes = bytes.len(), "oversize write sent straight to stream");
            return Ok(());
        }

        self.chunk.write(bytes);
        Ok(())
    }

    /// Write a single byte
    pub fn add(&mut self, value: u8) -> Result<()> {
        if self.needs_flushing(1) {
            self.flush()?;
        }

        self.chunk.add(value);
        Ok(())
    }

    /// Get `length` writable bytes in the chunk
    ///
    /// Flushes first if the span does not fit behind the buffered bytes;
    /// fails with `CapacityExceeded` when `length` is larger than the chunk.
    pub fn acquire_span(&mut self, length: usize) -> Result<&mut [u8]> {
        if self.needs_flushing(length) {
            self.flush()?;

            if self.needs_flushing(length) {
                return Err(SlimError::capacity_exceeded(length, self.chunk_size));
            }
        }

        Ok(self.chunk.acquire_span(length, true))
    }

    /// Push buffered bytes to the stream and flush it
    ///
    /// Bytes the stream accepted before a write error are dropped from the
    /// chunk, so a later flush only sends what the stream has not seen.
    pub fn flush(&mut self) -> Result<()> {
        let buffered = self.chunk.position();
        if buffered == 0 {
            return Ok(());
        }

        let Some(stream) = self.stream.as_mut() else {
            return Err(SlimError::invalid_operation("stream already released"));
        };

        let mut sent = 0;
        while sent < buffered {
            let err = match stream.write(&self.chunk.written()[sent..]) {
                Ok(0) => io::Error::new(io::ErrorKind::WriteZero, "stream accepted no bytes"),
                Ok(count) => {
                    sent += count;
                    continue;
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => err,
            };

            self.drain_sent(sent)?;
            return Err(SlimError::from_io(err, "stream write failed"));
        }

        self.chunk.reset();
        self.flushed += buffered as u64;

        stream
            .flush()
            .map_err(|err| SlimError::from_io(err, "stream flush failed"))?;
        trace!(bytes = buffered, "stream chunk flushed");
        Ok(())
    }

    /// Shift the unsent tail of the chunk to its start
    fn drain_sent(&mut self, sent: usize) -> Result<()> {
        if sent == 0 {
            return Ok(());
        }

        let remaining = self.chunk.position() - sent;
        self.chunk.move_within(sent, remaining, 0, false)?;
        self.chunk.set_position(remaining)?;
        self.flushed += sent as u64;
        trace!(sent, remaining, "partial chunk flush");
        Ok(())
    }

    /// Get a reference to the underlying stream
    pub fn get_ref(&self) -> Option<&W> {
        self.stream.as_ref()
    }

    /// Flush and give back the stream
    pub fn into_inner(mut self) -> Result<W> {
        self.flush()?;
        self.stream
            .take()
            .ok_or_else(|| SlimError::invalid_operation("stream already released"))
    }

    fn stream_mut(&mut self) -> Result<&mut W> {
        self.stream
            .as_mut()
            .ok_or_else(|| SlimError::invalid_operation("stream already released"))
    }
}

impl<W: Write> Drop for StreamChunkWriter<W> {
    fn drop(&mut self) {
        if self.stream.is_none() {
            return;
        }

        if let Err(err) = self.flush() {
            warn!(error = %err, buffered = self.chunk.position(), "failed to flush stream chunk on drop");
        }
    }
}

impl<W: Write> fmt::Debug for StreamChunkWriter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamChunkWriter")
            .field("chunk_size", &self.chunk_size)
            .field("buffered", &self.chunk.position())
            .field("flushed", &self.flushed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    /// Records every `write` call so tests can see how bytes were batched
    #[derive(Default)]
    struct Recorder {
        calls: Vec<Vec<u8>>,
        flushes: usize,
    }

    impl Write for Recorder {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.calls.push(buf.to_vec());
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Takes `accept` bytes on the first call, fails the second, then takes everything
    struct Stalling {
        out: Rc<RefCell<Vec<u8>>>,
        accept: usize,
        calls: usize,
    }

    impl Write for Stalling {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.calls += 1;
            match self.calls {
                1 => {
                    let count = self.accept.min(buf.len());
                    self.out.borrow_mut().extend_from_slice(&buf[..count]);
                    Ok(count)
                }
                2 => Err(io::Error::new(io::ErrorKind::BrokenPipe, "stalled")),
                _ => {
                    self.out.borrow_mut().extend_from_slice(buf);
                    Ok(buf.len())
                }
            }
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn writer(chunk_size: usize) -> StreamChunkWriter<Recorder> {
        StreamChunkWriter::with_config(
            Recorder::default(),
            StreamConfig::default().with_chunk_size(chunk_size),
        )
        .unwrap()
    }

    #[test]
    fn test_buffers_until_chunk_full() {
        let mut writer = writer(4);
        writer.write(&[1, 2]).unwrap();
        writer.add(3).unwrap();
        writer.add(4).unwrap();
        assert!(writer.get_ref().unwrap().calls.is_empty());

        writer.add(5).unwrap();
        let recorder = writer.into_inner().unwrap();
        assert_eq!(recorder.calls, vec![vec![1, 2, 3, 4], vec![5]]);
    }

    #[test]
    fn test_oversize_write_bypasses_chunk() {
        let mut writer = writer(4);
        writer.add(1).unwrap();
        writer.write(&[2, 3, 4, 5, 6]).unwrap();
        assert_eq!(writer.buffered(), 0);
        assert_eq!(writer.bytes_written(), 6);

        let recorder = writer.into_inner().unwrap();
        assert_eq!(recorder.calls, vec![vec![1], vec![2, 3, 4, 5, 6]]);
    }

    #[test]
    fn test_acquire_span_flushes_then_fails_when_too_large() {
        let mut writer = writer(4);
        writer.write(&[1, 2, 3]).unwrap();

        writer.acquire_span(2).unwrap().copy_from_slice(&[4, 5]);
        assert_eq!(writer.get_ref().unwrap().calls, vec![vec![1, 2, 3]]);
        assert_eq!(writer.buffered(), 2);

        let err = writer.acquire_span(5).unwrap_err();
        assert!(matches!(err, SlimError::CapacityExceeded { requested: 5, capacity: 4 }));
        assert_eq!(writer.buffered(), 0);
    }

    #[test]
    fn test_flush_on_empty_chunk_is_noop() {
        let mut writer = writer(8);
        writer.flush().unwrap();
        assert_eq!(writer.get_ref().unwrap().flushes, 0);

        writer.add(1).unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.get_ref().unwrap().flushes, 1);
    }

    #[test]
    fn test_drop_flushes() {
        let mut sink = Vec::new();
        {
            let mut writer = StreamChunkWriter::new(&mut sink);
            writer.write(b"hello").unwrap();
        }
        assert_eq!(sink, b"hello");
    }

    #[test]
    fn test_stream_error_surfaces() {
        let mut writer =
            StreamChunkWriter::with_config(Broken, StreamConfig::default().with_chunk_size(2))
                .unwrap();
        writer.write(&[1, 2]).unwrap();

        let err = writer.add(3).unwrap_err();
        assert!(matches!(err, SlimError::Io { .. }));
        // drop logs the repeated failure instead of panicking
    }

    #[test]
    fn test_partial_write_failure_does_not_resend_prefix() {
        let out = Rc::new(RefCell::new(Vec::new()));
        let stream = Stalling {
            out: Rc::clone(&out),
            accept: 2,
            calls: 0,
        };
        {
            let mut writer =
                StreamChunkWriter::with_config(stream, StreamConfig::default().with_chunk_size(8))
                    .unwrap();
            writer.write(&[1, 2, 3, 4]).unwrap();

            let err = writer.flush().unwrap_err();
            assert!(matches!(err, SlimError::Io { .. }));
            assert_eq!(writer.buffered(), 2);
            assert_eq!(writer.bytes_written(), 4);
        }
        assert_eq!(*out.borrow(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_retry_after_partial_failure_sends_tail() {
        let out = Rc::new(RefCell::new(Vec::new()));
        let stream = Stalling {
            out: Rc::clone(&out),
            accept: 3,
            calls: 0,
        };
        let mut writer =
            StreamChunkWriter::with_config(stream, StreamConfig::default().with_chunk_size(8))
                .unwrap();
        writer.write(&[9, 8, 7, 6, 5]).unwrap();
        assert!(writer.flush().is_err());

        writer.flush().unwrap();
        assert_eq!(writer.buffered(), 0);
        drop(writer);
        assert_eq!(*out.borrow(), vec![9, 8, 7, 6, 5]);
    }
}
