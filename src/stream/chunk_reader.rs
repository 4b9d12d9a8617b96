//! Chunked reader over a blocking stream

use std::{
    fmt,
    io::{ErrorKind, Read},
};

use tracing::trace;

use crate::{
    error::{Result, SlimError},
    owner::MemoryOwner,
};

use super::config::StreamConfig;

/// Reads a stream through one pooled chunk
///
/// Spans are served straight from the chunk. When the unread tail is too
/// short, the unread bytes are compacted to the front and the stream is read
/// until enough bytes are buffered. No request may exceed the chunk size.
pub struct StreamChunkReader<R: Read> {
    stream: R,
    chunk: MemoryOwner<u8>,
    /// First unread byte
    start: usize,
    /// One past the last buffered byte
    end: usize,
    /// Bytes handed out so far
    consumed: u64,
}

impl<R: Read> StreamChunkReader<R> {
    /// Create a reader with the default 1 MiB chunk
    pub fn new(stream: R) -> Self {
        Self::from_valid_config(stream, &StreamConfig::default())
    }

    /// Create a reader with a custom configuration
    pub fn with_config(stream: R, config: StreamConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(stream, &config))
    }

    fn from_valid_config(stream: R, config: &StreamConfig) -> Self {
        Self {
            stream,
            chunk: MemoryOwner::uncleared(config.chunk_size),
            start: 0,
            end: 0,
            consumed: 0,
        }
    }

    /// Get the chunk size
    pub fn chunk_size(&self) -> usize {
        self.chunk.len()
    }

    /// Buffered bytes not yet handed out
    pub fn bytes_available(&self) -> usize {
        self.end - self.start
    }

    /// Total bytes handed out since creation
    pub fn bytes_consumed(&self) -> u64 {
        self.consumed
    }

    /// Make sure at least `needed` bytes are buffered
    ///
    /// Fails with `CapacityExceeded` when `needed` is larger than the chunk
    /// and with an end-of-stream error when the stream runs dry first.
    pub fn ensure(&mut self, needed: usize) -> Result<()> {
        let available = self.bytes_available();
        if needed <= available {
            return Ok(());
        }

        let chunk_size = self.chunk.len();
        if needed > chunk_size {
            return Err(SlimError::capacity_exceeded(needed, chunk_size));
        }

        if chunk_size - self.end < needed - available {
            self.chunk.copy_within(self.start..self.end, 0);
            self.start = 0;
            self.end = available;
        }

        while self.bytes_available() < needed {
            let end = self.end;
            match self.stream.read(&mut self.chunk[end..]) {
                Ok(0) => {
                    return Err(SlimError::end_of_stream(needed, self.bytes_available()));
                }
                Ok(read) => {
                    trace!(read, buffered = self.end + read - self.start, "stream chunk refilled");
                    self.end += read;
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(SlimError::from_io(err, "stream read failed")),
            }
        }

        Ok(())
    }

    /// Take the next `length` bytes
    pub fn acquire_span(&mut self, length: usize) -> Result<&[u8]> {
        self.ensure(length)?;

        let start = self.start;
        self.start += length;
        self.consumed += length as u64;
        Ok(&self.chunk[start..start + length])
    }

    /// Take the next byte
    pub fn read_byte(&mut self) -> Result<u8> {
        self.ensure(1)?;

        let value = self.chunk[self.start];
        self.start += 1;
        self.consumed += 1;
        Ok(value)
    }

    /// Get a reference to the underlying stream
    pub fn get_ref(&self) -> &R {
        &self.stream
    }

    /// Give back the stream; buffered but unread bytes are discarded
    pub fn into_inner(self) -> R {
        self.stream
    }
}

impl<R: Read> fmt::Debug for StreamChunkReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamChunkReader")
            .field("chunk_size", &self.chunk.len())
            .field("available", &self.bytes_available())
            .field("consumed", &self.consumed)
            .finish()
    }
}
