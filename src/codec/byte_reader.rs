//! Binary reader over a byte slice or a stream

use std::{
    fmt,
    io::{self, Read},
};

use crate::{
    error::{Result, SlimError},
    stream::{StreamChunkReader, StreamConfig},
};

use super::{
    encoding::{RawUtf16, TextEncoding},
    endian::{self, Unmanaged},
};

enum Source<'a, R: Read> {
    Buffer { data: &'a [u8], position: usize },
    Stream(StreamChunkReader<R>),
}

/// Reads what [`ByteWriter`](super::ByteWriter) wrote
///
/// Buffer mode reads from a slice and exposes its cursor; stream mode reads
/// through a [`StreamChunkReader`] and rejects cursor access with
/// `InvalidOperation`. Slices handed out borrow the reader and stay valid
/// until the next read.
pub struct ByteReader<'a, R: Read = io::Empty> {
    source: Source<'a, R>,
}

impl<'a> ByteReader<'a> {
    /// Read from `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            source: Source::Buffer { data, position: 0 },
        }
    }
}

impl<R: Read> ByteReader<'static, R> {
    /// Read from `stream` through a chunk of `config.chunk_size` bytes
    pub fn from_stream(stream: R, config: StreamConfig) -> Result<Self> {
        Ok(Self {
            source: Source::Stream(StreamChunkReader::with_config(stream, config)?),
        })
    }
}

impl<'a, R: Read> ByteReader<'a, R> {
    /// True in stream mode
    pub fn is_stream(&self) -> bool {
        matches!(self.source, Source::Stream(_))
    }

    /// Read a little endian value
    pub fn read_little_endian<T: Unmanaged>(&mut self) -> Result<T> {
        endian::read_little_endian(self.acquire_span(T::SIZE)?)
    }

    /// Read a big endian value
    pub fn read_big_endian<T: Unmanaged>(&mut self) -> Result<T> {
        endian::ensure_swap_size::<T>()?;
        endian::read_big_endian(self.acquire_span(T::SIZE)?)
    }

    /// Read `size` bytes of text in `encoding`
    pub fn read_string(&mut self, size: usize, encoding: TextEncoding) -> Result<String> {
        encoding.decode(self.acquire_span(size)?)
    }

    /// Borrow `size` bytes of UTF-8 text without copying
    pub fn read_str(&mut self, size: usize) -> Result<&str> {
        Ok(std::str::from_utf8(self.acquire_span(size)?)?)
    }

    /// View `size` bytes as native-endian UTF-16 code units without copying
    pub fn read_string_raw(&mut self, size: usize) -> Result<RawUtf16<'_>> {
        if size % 2 != 0 {
            return Err(SlimError::encoding(format!(
                "raw UTF-16 needs an even byte count, got {}",
                size
            )));
        }
        RawUtf16::new(self.acquire_span(size)?)
    }

    /// Read `size` raw bytes into an owned string
    pub fn read_string_raw_to_string(&mut self, size: usize) -> Result<String> {
        self.read_string_raw(size)?.try_to_string()
    }

    /// Borrow the next `length` bytes
    pub fn read_bytes(&mut self, length: usize) -> Result<&[u8]> {
        self.acquire_span(length)
    }

    /// Read one byte
    pub fn read_byte(&mut self) -> Result<u8> {
        match &mut self.source {
            Source::Buffer { data, position } => {
                let value = *data
                    .get(*position)
                    .ok_or_else(|| SlimError::end_of_buffer(1, 0))?;
                *position += 1;
                Ok(value)
            }
            Source::Stream(stream) => stream.read_byte(),
        }
    }

    /// Get the cursor (buffer mode only)
    pub fn position(&self) -> Result<usize> {
        match &self.source {
            Source::Buffer { position, .. } => Ok(*position),
            Source::Stream(_) => Err(stream_mode_error("position")),
        }
    }

    /// Move the cursor anywhere in `[0, len]` (buffer mode only)
    pub fn set_position(&mut self, value: usize) -> Result<()> {
        match &mut self.source {
            Source::Buffer { data, position } => {
                if value > data.len() {
                    return Err(SlimError::out_of_range("position", value, data.len()));
                }
                *position = value;
                Ok(())
            }
            Source::Stream(_) => Err(stream_mode_error("set_position")),
        }
    }

    /// Bytes left after the cursor (buffer mode only)
    pub fn bytes_remaining(&self) -> Result<usize> {
        match &self.source {
            Source::Buffer { data, position } => Ok(data.len() - position),
            Source::Stream(_) => Err(stream_mode_error("bytes_remaining")),
        }
    }

    /// Give back the stream (stream mode only)
    pub fn into_stream(self) -> Result<R> {
        match self.source {
            Source::Stream(stream) => Ok(stream.into_inner()),
            Source::Buffer { .. } => Err(SlimError::invalid_operation(
                "into_stream is only available on a stream based ByteReader",
            )),
        }
    }

    fn acquire_span(&mut self, length: usize) -> Result<&[u8]> {
        match &mut self.source {
            Source::Buffer { data, position } => {
                let available = data.len() - *position;
                if length > available {
                    return Err(SlimError::end_of_buffer(length, available));
                }
                let start = *position;
                *position += length;
                Ok(&data[start..start + length])
            }
            Source::Stream(stream) => stream.acquire_span(length),
        }
    }
}

fn stream_mode_error(member: &str) -> SlimError {
    SlimError::invalid_operation(format!("{} is not available on a stream based ByteReader", member))
}

impl<R: Read> fmt::Debug for ByteReader<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Source::Buffer { data, position } => f
                .debug_struct("ByteReader")
                .field("len", &data.len())
                .field("position", position)
                .finish(),
            Source::Stream(stream) => f.debug_tuple("ByteReader").field(stream).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_buffer_reads_and_cursor() {
        let data = [2u8, 1, 3, 4, b'o', b'k'];
        let mut reader = ByteReader::new(&data);

        assert_eq!(reader.read_little_endian::<u16>().unwrap(), 0x0102);
        assert_eq!(reader.read_big_endian::<u16>().unwrap(), 0x0304);
        assert_eq!(reader.bytes_remaining().unwrap(), 2);
        assert_eq!(reader.read_str(2).unwrap(), "ok");
        assert!(reader.read_byte().unwrap_err().is_end_of_input());

        reader.set_position(4).unwrap();
        assert_eq!(reader.read_byte().unwrap(), b'o');
        assert!(reader.set_position(7).is_err());
    }

    #[test]
    fn test_short_buffer_keeps_cursor() {
        let data = [1u8, 2, 3];
        let mut reader = ByteReader::new(&data);

        assert!(reader.read_little_endian::<u32>().unwrap_err().is_end_of_input());
        assert_eq!(reader.position().unwrap(), 0);
        assert_eq!(reader.read_bytes(3).unwrap(), &[1, 2, 3]);
    }

    #[test]
    fn test_raw_string_needs_even_size() {
        let data = [0u8; 3];
        let mut reader = ByteReader::new(&data);
        assert!(matches!(
            reader.read_string_raw(3),
            Err(SlimError::Encoding { .. })
        ));
    }

    #[test]
    fn test_stream_mode() {
        let mut reader = ByteReader::from_stream(
            Cursor::new(vec![0, 0, 0, 9, b'h', 0, b'i', 0]),
            StreamConfig::default().with_chunk_size(8),
        )
        .unwrap();

        assert_eq!(reader.read_big_endian::<u32>().unwrap(), 9);
        assert_eq!(reader.read_string(4, TextEncoding::Utf16Le).unwrap(), "hi");
        assert!(matches!(reader.position(), Err(SlimError::InvalidOperation { .. })));
        assert!(reader.bytes_remaining().is_err());
        assert!(reader.read_byte().unwrap_err().is_end_of_input());
    }
}
