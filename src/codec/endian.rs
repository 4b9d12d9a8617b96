//! Fixed-width little/big endian encoding of plain values

use crate::error::{Result, SlimError};

/// Largest value (in bytes) that may be byte-swapped through the stack
/// temporary used for big endian reads
pub const MAX_SWAP_SIZE: usize = 256;

/// A plain, fixed-size value with a defined byte layout
///
/// `write_le`/`read_le` define the little endian form; the big endian form is
/// its byte reversal. Slices passed to the trait methods must hold at least
/// [`Self::SIZE`](Unmanaged::SIZE) bytes; the free functions in this module
/// check that and report errors instead of panicking.
pub trait Unmanaged: Copy {
    /// Encoded size in bytes
    const SIZE: usize;

    /// Encode into `dst[..SIZE]` as little endian
    fn write_le(&self, dst: &mut [u8]);

    /// Decode from `src[..SIZE]` as little endian
    fn read_le(src: &[u8]) -> Self;

    /// Encode into `dst[..SIZE]` as big endian
    fn write_be(&self, dst: &mut [u8]) {
        self.write_le(dst);
        dst[..Self::SIZE].reverse();
    }

    /// Decode from `src[..SIZE]` as big endian
    fn read_be(src: &[u8]) -> Self {
        let mut swap = [0u8; MAX_SWAP_SIZE];
        let swap = &mut swap[..Self::SIZE];
        swap.copy_from_slice(&src[..Self::SIZE]);
        swap.reverse();
        Self::read_le(swap)
    }
}

macro_rules! impl_unmanaged {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Unmanaged for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                #[inline]
                fn write_le(&self, dst: &mut [u8]) {
                    dst[..Self::SIZE].copy_from_slice(&self.to_le_bytes());
                }

                #[inline]
                fn read_le(src: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(&src[..Self::SIZE]);
                    <$ty>::from_le_bytes(raw)
                }

                #[inline]
                fn write_be(&self, dst: &mut [u8]) {
                    dst[..Self::SIZE].copy_from_slice(&self.to_be_bytes());
                }

                #[inline]
                fn read_be(src: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(&src[..Self::SIZE]);
                    <$ty>::from_be_bytes(raw)
                }
            }
        )*
    };
}

impl_unmanaged!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);

/// Reject types too wide for the big endian swap temporary
pub(crate) fn ensure_swap_size<T: Unmanaged>() -> Result<()> {
    if T::SIZE > MAX_SWAP_SIZE {
        return Err(SlimError::out_of_range("size_of::<T>", T::SIZE, MAX_SWAP_SIZE));
    }
    Ok(())
}

fn check_len<T: Unmanaged>(available: usize) -> Result<()> {
    if available < T::SIZE {
        return Err(SlimError::end_of_buffer(T::SIZE, available));
    }
    Ok(())
}

/// Write `value` little endian at the start of `dst`, returning the bytes written
pub fn write_little_endian<T: Unmanaged>(dst: &mut [u8], value: T) -> Result<usize> {
    check_len::<T>(dst.len())?;
    value.write_le(dst);
    Ok(T::SIZE)
}

/// Write `value` big endian at the start of `dst`, returning the bytes written
pub fn write_big_endian<T: Unmanaged>(dst: &mut [u8], value: T) -> Result<usize> {
    ensure_swap_size::<T>()?;
    check_len::<T>(dst.len())?;
    value.write_be(dst);
    Ok(T::SIZE)
}

/// Read a little endian value from the start of `src`
pub fn read_little_endian<T: Unmanaged>(src: &[u8]) -> Result<T> {
    check_len::<T>(src.len())?;
    Ok(T::read_le(src))
}

/// Read a big endian value from the start of `src`
pub fn read_big_endian<T: Unmanaged>(src: &[u8]) -> Result<T> {
    ensure_swap_size::<T>()?;
    check_len::<T>(src.len())?;
    Ok(T::read_be(src))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Wide([u8; 300]);

    impl Unmanaged for Wide {
        const SIZE: usize = 300;

        fn write_le(&self, dst: &mut [u8]) {
            dst[..300].copy_from_slice(&self.0);
        }

        fn read_le(src: &[u8]) -> Self {
            let mut raw = [0u8; 300];
            raw.copy_from_slice(&src[..300]);
            Wide(raw)
        }
    }

    #[test]
    fn test_known_layouts() {
        let mut buf = [0u8; 4];
        write_little_endian(&mut buf, 0x0102_0304u32).unwrap();
        assert_eq!(buf, [4, 3, 2, 1]);

        write_big_endian(&mut buf, 0x0102_0304u32).unwrap();
        assert_eq!(buf, [1, 2, 3, 4]);
        assert_eq!(read_big_endian::<u32>(&buf).unwrap(), 0x0102_0304);
        assert_eq!(read_little_endian::<u32>(&buf).unwrap(), 0x0403_0201);
    }

    #[test]
    fn test_floats_and_signed() {
        let mut buf = [0u8; 8];
        write_big_endian(&mut buf, -2.5f64).unwrap();
        assert_eq!(read_big_endian::<f64>(&buf).unwrap(), -2.5);

        write_little_endian(&mut buf, -7i16).unwrap();
        assert_eq!(read_little_endian::<i16>(&buf).unwrap(), -7);
    }

    #[test]
    fn test_short_buffer_is_end_of_buffer() {
        let mut buf = [0u8; 3];
        let err = write_little_endian(&mut buf, 1u32).unwrap_err();
        assert!(err.is_end_of_input());

        let err = read_big_endian::<u64>(&buf).unwrap_err();
        assert!(err.is_end_of_input());
    }

    #[test]
    fn test_swap_size_limit() {
        let mut buf = vec![0u8; 300];
        let value = Wide([9; 300]);

        assert!(write_little_endian(&mut buf, value).is_ok());
        assert_eq!(read_little_endian::<Wide>(&buf).unwrap(), value);

        let err = write_big_endian(&mut buf, value).unwrap_err();
        assert!(matches!(err, SlimError::OutOfRange { max: 256, .. }));
        assert!(read_big_endian::<Wide>(&buf).is_err());
    }

    #[test]
    fn test_default_big_endian_reverses_little_endian() {
        #[derive(Debug, Clone, Copy, PartialEq)]
        struct Pair(u16, u16);

        impl Unmanaged for Pair {
            const SIZE: usize = 4;

            fn write_le(&self, dst: &mut [u8]) {
                self.0.write_le(&mut dst[..2]);
                self.1.write_le(&mut dst[2..4]);
            }

            fn read_le(src: &[u8]) -> Self {
                Pair(u16::read_le(&src[..2]), u16::read_le(&src[2..4]))
            }
        }

        let mut le = [0u8; 4];
        let mut be = [0u8; 4];
        write_little_endian(&mut le, Pair(0x0102, 0x0304)).unwrap();
        write_big_endian(&mut be, Pair(0x0102, 0x0304)).unwrap();

        le.reverse();
        assert_eq!(le, be);
        assert_eq!(read_big_endian::<Pair>(&be).unwrap(), Pair(0x0102, 0x0304));
    }
}
