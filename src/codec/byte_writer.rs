//! Binary writer over a growable buffer or a stream

use std::{
    fmt,
    io::{self, Write},
};

use crate::{
    error::{Result, SlimError},
    stream::{StreamChunkWriter, StreamConfig},
    writer::BufferWriter,
};

use super::{
    encoding::{self, TextEncoding},
    endian::{self, Unmanaged},
};

/// First growth of a buffer-mode writer that started on a caller slice
pub const DEFAULT_MIN_GROW: usize = 512;

enum Mode<'a, W: Write> {
    Buffer(BufferWriter<'a, u8>),
    Stream(StreamChunkWriter<W>),
}

/// Writes primitives, text and raw bytes
///
/// In buffer mode the bytes land in a [`BufferWriter`] and the cursor is
/// visible through [`position`](Self::position) and
/// [`written`](Self::written). In stream mode they go through a
/// [`StreamChunkWriter`]; buffer-only members then fail with
/// `InvalidOperation`.
///
/// Strings are not length-prefixed; callers communicate lengths themselves.
pub struct ByteWriter<'a, W: Write = io::Sink> {
    mode: Mode<'a, W>,
}

impl<'a> ByteWriter<'a> {
    /// Write into `buffer`, moving to pooled memory when it fills up
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self::from_buffer_writer(BufferWriter::new(buffer).with_min_grow(DEFAULT_MIN_GROW))
    }

    /// Write through an existing buffer writer
    pub fn from_buffer_writer(writer: BufferWriter<'a, u8>) -> Self {
        Self {
            mode: Mode::Buffer(writer),
        }
    }
}

impl ByteWriter<'static> {
    /// Write into a pooled buffer of at least `min_size` bytes
    pub fn with_capacity(min_size: usize) -> Self {
        Self::from_buffer_writer(BufferWriter::with_capacity(min_size))
    }
}

impl<W: Write> ByteWriter<'static, W> {
    /// Write to `stream` through a chunk of `config.chunk_size` bytes
    pub fn from_stream(stream: W, config: StreamConfig) -> Result<Self> {
        Ok(Self {
            mode: Mode::Stream(StreamChunkWriter::with_config(stream, config)?),
        })
    }
}

impl<'a, W: Write> ByteWriter<'a, W> {
    /// True in stream mode
    pub fn is_stream(&self) -> bool {
        matches!(self.mode, Mode::Stream(_))
    }

    /// Write `value` little endian, returning the bytes written
    pub fn write_little_endian<T: Unmanaged>(&mut self, value: T) -> Result<usize> {
        endian::write_little_endian(self.acquire_span(T::SIZE)?, value)
    }

    /// Write `value` big endian, returning the bytes written
    pub fn write_big_endian<T: Unmanaged>(&mut self, value: T) -> Result<usize> {
        endian::ensure_swap_size::<T>()?;
        endian::write_big_endian(self.acquire_span(T::SIZE)?, value)
    }

    /// Write `text` as UTF-8, returning the bytes written
    pub fn write_string(&mut self, text: &str) -> Result<usize> {
        self.write_string_with(text, TextEncoding::Utf8)
    }

    /// Write `text` in `encoding`, returning the bytes written
    pub fn write_string_with(&mut self, text: &str, encoding: TextEncoding) -> Result<usize> {
        encoding.encode_in_pieces(text, |piece| self.write_bytes(piece))
    }

    /// Write UTF-16 code units exactly as they sit in memory
    ///
    /// The result is only readable by a process with the same endianness.
    pub fn write_string_raw(&mut self, units: &[u16]) -> Result<usize> {
        encoding::raw_in_pieces(units, |piece| self.write_bytes(piece))
    }

    /// Write one byte
    pub fn write_byte(&mut self, value: u8) -> Result<()> {
        match &mut self.mode {
            Mode::Buffer(writer) => {
                writer.add(value);
                Ok(())
            }
            Mode::Stream(stream) => stream.add(value),
        }
    }

    /// Write a run of bytes
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        match &mut self.mode {
            Mode::Buffer(writer) => {
                writer.write(bytes);
                Ok(())
            }
            Mode::Stream(stream) => stream.write(bytes),
        }
    }

    /// Overwrite the whole buffer with `value` (buffer mode only)
    pub fn fill(&mut self, value: u8) -> Result<()> {
        self.buffer_mut("fill")?.fill(value);
        Ok(())
    }

    /// Bytes written so far (buffer mode only)
    pub fn written(&self) -> Result<&[u8]> {
        Ok(self.buffer("written")?.written())
    }

    /// Get the cursor (buffer mode only)
    pub fn position(&self) -> Result<usize> {
        Ok(self.buffer("position")?.position())
    }

    /// Move the cursor (buffer mode only)
    pub fn set_position(&mut self, position: usize) -> Result<()> {
        self.buffer_mut("set_position")?.set_position(position)
    }

    /// Push buffered bytes to the stream; no-op in buffer mode
    pub fn flush(&mut self) -> Result<()> {
        match &mut self.mode {
            Mode::Buffer(_) => Ok(()),
            Mode::Stream(stream) => stream.flush(),
        }
    }

    /// Give back the buffer writer (buffer mode only)
    pub fn into_buffer_writer(self) -> Result<BufferWriter<'a, u8>> {
        match self.mode {
            Mode::Buffer(writer) => Ok(writer),
            Mode::Stream(_) => Err(stream_mode_error("into_buffer_writer")),
        }
    }

    /// Flush and give back the stream (stream mode only)
    pub fn into_stream(self) -> Result<W> {
        match self.mode {
            Mode::Stream(stream) => stream.into_inner(),
            Mode::Buffer(_) => Err(SlimError::invalid_operation(
                "into_stream is only available on a stream based ByteWriter",
            )),
        }
    }

    fn acquire_span(&mut self, length: usize) -> Result<&mut [u8]> {
        match &mut self.mode {
            Mode::Buffer(writer) => Ok(writer.acquire_span(length, true)),
            Mode::Stream(stream) => stream.acquire_span(length),
        }
    }

    fn buffer(&self, member: &str) -> Result<&BufferWriter<'a, u8>> {
        match &self.mode {
            Mode::Buffer(writer) => Ok(writer),
            Mode::Stream(_) => Err(stream_mode_error(member)),
        }
    }

    fn buffer_mut(&mut self, member: &str) -> Result<&mut BufferWriter<'a, u8>> {
        match &mut self.mode {
            Mode::Buffer(writer) => Ok(writer),
            Mode::Stream(_) => Err(stream_mode_error(member)),
        }
    }
}

fn stream_mode_error(member: &str) -> SlimError {
    SlimError::invalid_operation(format!("{} is not available on a stream based ByteWriter", member))
}

impl<W: Write> fmt::Debug for ByteWriter<'_, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.mode {
            Mode::Buffer(writer) => f.debug_tuple("ByteWriter").field(writer).finish(),
            Mode::Stream(stream) => f.debug_tuple("ByteWriter").field(stream).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitives_in_buffer_mode() {
        let mut backing = [0u8; 16];
        let mut writer = ByteWriter::new(&mut backing);

        assert_eq!(writer.write_little_endian(0x0102u16).unwrap(), 2);
        assert_eq!(writer.write_big_endian(0x0304u16).unwrap(), 2);
        writer.write_byte(5).unwrap();

        assert_eq!(writer.written().unwrap(), &[2, 1, 3, 4, 5]);
        assert_eq!(writer.position().unwrap(), 5);
    }

    #[test]
    fn test_min_grow_applies_to_first_growth() {
        let mut backing = [0u8; 4];
        let mut writer = ByteWriter::new(&mut backing);
        writer.write_bytes(&[1; 5]).unwrap();

        let inner = writer.into_buffer_writer().unwrap();
        assert_eq!(inner.capacity(), 4 + DEFAULT_MIN_GROW);
    }

    #[test]
    fn test_strings() {
        let mut writer = ByteWriter::with_capacity(8);
        assert_eq!(writer.write_string("hé").unwrap(), 3);
        assert_eq!(writer.write_string_with("A", TextEncoding::Utf16Be).unwrap(), 2);

        let units: Vec<u16> = "z".encode_utf16().collect();
        assert_eq!(writer.write_string_raw(&units).unwrap(), 2);

        let mut expected = vec![b'h', 0xC3, 0xA9, 0, b'A'];
        expected.extend_from_slice(&('z' as u16).to_ne_bytes());
        assert_eq!(writer.written().unwrap(), expected.as_slice());
    }

    #[test]
    fn test_stream_mode_rejects_buffer_members() {
        let mut writer =
            ByteWriter::from_stream(Vec::new(), StreamConfig::default().with_chunk_size(16))
                .unwrap();
        writer.write_little_endian(7u32).unwrap();

        assert!(matches!(writer.position(), Err(SlimError::InvalidOperation { .. })));
        assert!(writer.written().is_err());
        assert!(writer.fill(0).is_err());
        assert!(writer.set_position(0).is_err());

        let bytes = writer.into_stream().unwrap();
        assert_eq!(bytes, vec![7, 0, 0, 0]);
    }

    #[test]
    fn test_stream_mode_value_wider_than_chunk() {
        let mut writer =
            ByteWriter::from_stream(Vec::new(), StreamConfig::default().with_chunk_size(4))
                .unwrap();
        let err = writer.write_little_endian(1u64).unwrap_err();
        assert!(matches!(err, SlimError::CapacityExceeded { .. }));
    }
}
