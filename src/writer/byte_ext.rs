//! Endian-aware reads and writes on a byte [`BufferWriter`]

use crate::{
    codec::endian::{self, Unmanaged},
    error::{Result, SlimError},
};

use super::buffer_writer::BufferWriter;

impl BufferWriter<'_, u8> {
    /// Append `value` little endian, returning the bytes written
    pub fn write_little_endian<T: Unmanaged>(&mut self, value: T) -> Result<usize> {
        endian::write_little_endian(self.acquire_span(T::SIZE, true), value)
    }

    /// Append `value` big endian, returning the bytes written
    pub fn write_big_endian<T: Unmanaged>(&mut self, value: T) -> Result<usize> {
        endian::ensure_swap_size::<T>()?;
        endian::write_big_endian(self.acquire_span(T::SIZE, true), value)
    }

    /// Decode a little endian value at the cursor
    ///
    /// Reads never grow the writer. With `move_position` the cursor moves
    /// past the value.
    pub fn read_little_endian<T: Unmanaged>(&mut self, move_position: bool) -> Result<T> {
        let value = endian::read_little_endian(self.bytes_at_cursor::<T>()?)?;
        self.skip_value::<T>(move_position);
        Ok(value)
    }

    /// Decode a big endian value at the cursor
    pub fn read_big_endian<T: Unmanaged>(&mut self, move_position: bool) -> Result<T> {
        let value = endian::read_big_endian(self.bytes_at_cursor::<T>()?)?;
        self.skip_value::<T>(move_position);
        Ok(value)
    }

    fn bytes_at_cursor<T: Unmanaged>(&self) -> Result<&[u8]> {
        let available = self.capacity() - self.position();
        if available < T::SIZE {
            return Err(SlimError::end_of_buffer(T::SIZE, available));
        }
        Ok(&self.buffer()[self.position()..self.position() + T::SIZE])
    }

    fn skip_value<T: Unmanaged>(&mut self, move_position: bool) {
        if move_position {
            self.advance(T::SIZE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read_back() {
        let mut backing = [0u8; 4];
        let mut writer = BufferWriter::new(&mut backing);

        assert_eq!(writer.write_little_endian(0xABCDu16).unwrap(), 2);
        assert_eq!(writer.write_big_endian(0x0102_0304u32).unwrap(), 4);
        assert_eq!(writer.written(), &[0xCD, 0xAB, 1, 2, 3, 4]);

        writer.set_position(0).unwrap();
        assert_eq!(writer.read_little_endian::<u16>(true).unwrap(), 0xABCD);
        assert_eq!(writer.read_big_endian::<u32>(false).unwrap(), 0x0102_0304);
        assert_eq!(writer.position(), 2);
    }

    #[test]
    fn test_read_past_capacity_fails() {
        let mut backing = [0u8; 4];
        let mut writer = BufferWriter::new(&mut backing);
        writer.advance(2);

        let err = writer.read_little_endian::<u32>(true).unwrap_err();
        assert!(err.is_end_of_input());
        assert_eq!(writer.position(), 2);
        assert!(!writer.is_grown());
    }
}
