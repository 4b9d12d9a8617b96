//! Binary encoding: endianness, text, and the byte reader/writer pair
//!
//! The byte layout is fixed-width little or big endian for [`Unmanaged`]
//! values, UTF-8 (or UTF-16) for text with the length carried by the
//! caller, and native-endian UTF-16 for raw strings.

pub mod byte_reader;
pub mod byte_writer;
pub mod encoding;
pub mod endian;

// Re-export main types
pub use byte_reader::ByteReader;
pub use byte_writer::{ByteWriter, DEFAULT_MIN_GROW};
pub use encoding::{RawUtf16, TextEncoding};
pub use endian::{
    read_big_endian, read_little_endian, write_big_endian, write_little_endian, Unmanaged,
    MAX_SWAP_SIZE,
};
