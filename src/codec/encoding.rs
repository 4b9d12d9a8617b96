//! Text encodings understood by the byte reader and writer

use std::{char::DecodeUtf16, fmt};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SlimError};

/// Byte encoding of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TextEncoding {
    #[default]
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl TextEncoding {
    /// Number of bytes `text` occupies in this encoding
    pub fn byte_count(self, text: &str) -> usize {
        match self {
            TextEncoding::Utf8 => text.len(),
            TextEncoding::Utf16Le | TextEncoding::Utf16Be => text.encode_utf16().count() * 2,
        }
    }

    /// Encode `text`, handing the bytes out in pieces of at most 256
    pub(crate) fn encode_in_pieces<F>(self, text: &str, mut sink: F) -> Result<usize>
    where
        F: FnMut(&[u8]) -> Result<()>,
    {
        let to_bytes: fn(u16) -> [u8; 2] = match self {
            TextEncoding::Utf8 => {
                sink(text.as_bytes())?;
                return Ok(text.len());
            }
            TextEncoding::Utf16Le => u16::to_le_bytes,
            TextEncoding::Utf16Be => u16::to_be_bytes,
        };

        let mut piece = [0u8; 256];
        let mut filled = 0;
        let mut total = 0;
        for unit in text.encode_utf16() {
            piece[filled..filled + 2].copy_from_slice(&to_bytes(unit));
            filled += 2;
            if filled == piece.len() {
                sink(&piece)?;
                total += filled;
                filled = 0;
            }
        }
        if filled > 0 {
            sink(&piece[..filled])?;
            total += filled;
        }
        Ok(total)
    }

    /// Decode `bytes` into an owned string
    pub fn decode(self, bytes: &[u8]) -> Result<String> {
        let from_bytes: fn([u8; 2]) -> u16 = match self {
            TextEncoding::Utf8 => return Ok(std::str::from_utf8(bytes)?.to_owned()),
            TextEncoding::Utf16Le => u16::from_le_bytes,
            TextEncoding::Utf16Be => u16::from_be_bytes,
        };

        if bytes.len() % 2 != 0 {
            return Err(SlimError::encoding(format!(
                "UTF-16 text needs an even byte count, got {}",
                bytes.len()
            )));
        }

        let units = bytes
            .chunks_exact(2)
            .map(|pair| from_bytes([pair[0], pair[1]]));
        char::decode_utf16(units)
            .collect::<std::result::Result<String, _>>()
            .map_err(|err| SlimError::encoding(format!("invalid UTF-16: {}", err)))
    }
}

/// Write UTF-16 code units in native byte order, in pieces of at most 256 bytes
pub(crate) fn raw_in_pieces<F>(units: &[u16], mut sink: F) -> Result<usize>
where
    F: FnMut(&[u8]) -> Result<()>,
{
    let mut piece = [0u8; 256];
    for batch in units.chunks(piece.len() / 2) {
        for (slot, unit) in piece.chunks_exact_mut(2).zip(batch) {
            slot.copy_from_slice(&unit.to_ne_bytes());
        }
        sink(&piece[..batch.len() * 2])?;
    }
    Ok(units.len() * 2)
}

/// UTF-16 code units viewed in place, in native byte order
///
/// Produced by raw string reads. Only meaningful for data written by the
/// same process (or at least the same endianness).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RawUtf16<'a> {
    bytes: &'a [u8],
}

impl<'a> RawUtf16<'a> {
    /// View `bytes` as code units; the length must be even
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        if bytes.len() % 2 != 0 {
            return Err(SlimError::encoding(format!(
                "raw UTF-16 needs an even byte count, got {}",
                bytes.len()
            )));
        }
        Ok(Self { bytes })
    }

    /// Number of code units
    pub fn len(&self) -> usize {
        self.bytes.len() / 2
    }

    /// Check if the view holds no code units
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The underlying bytes
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Code unit at `index`
    pub fn get(&self, index: usize) -> Option<u16> {
        let pair = self.bytes.get(index * 2..index * 2 + 2)?;
        Some(u16::from_ne_bytes([pair[0], pair[1]]))
    }

    /// Iterate the code units
    pub fn units(&self) -> impl Iterator<Item = u16> + 'a {
        self.bytes
            .chunks_exact(2)
            .map(|pair| u16::from_ne_bytes([pair[0], pair[1]]))
    }

    /// Decode lazily, yielding an error per unpaired surrogate
    pub fn chars(&self) -> DecodeUtf16<impl Iterator<Item = u16> + 'a> {
        char::decode_utf16(self.units())
    }

    /// Decode into an owned string
    pub fn try_to_string(&self) -> Result<String> {
        self.chars()
            .collect::<std::result::Result<String, _>>()
            .map_err(|err| SlimError::encoding(format!("invalid UTF-16: {}", err)))
    }

    /// Decode, replacing unpaired surrogates with U+FFFD
    pub fn to_string_lossy(&self) -> String {
        self.chars()
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    }
}

impl fmt::Display for RawUtf16<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.chars() {
            fmt::Write::write_char(f, c.unwrap_or(char::REPLACEMENT_CHARACTER))?;
        }
        Ok(())
    }
}

impl fmt::Debug for RawUtf16<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawUtf16").field(&self.to_string_lossy()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(encoding: TextEncoding, text: &str) -> Vec<u8> {
        let mut out = Vec::new();
        let written = encoding
            .encode_in_pieces(text, |piece| {
                out.extend_from_slice(piece);
                Ok(())
            })
            .unwrap();
        assert_eq!(written, out.len());
        assert_eq!(written, encoding.byte_count(text));
        out
    }

    #[test]
    fn test_utf16_layouts() {
        assert_eq!(collect(TextEncoding::Utf16Le, "Hi"), vec![b'H', 0, b'i', 0]);
        assert_eq!(collect(TextEncoding::Utf16Be, "Hi"), vec![0, b'H', 0, b'i']);
        assert_eq!(collect(TextEncoding::Utf8, "é"), vec![0xC3, 0xA9]);
    }

    #[test]
    fn test_long_text_spans_pieces() {
        let text = "ab€".repeat(200);
        for encoding in [TextEncoding::Utf8, TextEncoding::Utf16Le, TextEncoding::Utf16Be] {
            let bytes = collect(encoding, &text);
            assert_eq!(encoding.decode(&bytes).unwrap(), text);
        }
    }

    #[test]
    fn test_decode_errors() {
        assert!(TextEncoding::Utf8.decode(&[0xFF, 0xFE]).is_err());
        assert!(TextEncoding::Utf16Le.decode(&[0x41]).is_err());
        // lone high surrogate
        assert!(TextEncoding::Utf16Le.decode(&[0x00, 0xD8]).is_err());
    }

    #[test]
    fn test_raw_view() {
        let units: Vec<u16> = "héllo".encode_utf16().collect();
        let mut bytes = Vec::new();
        raw_in_pieces(&units, |piece| {
            bytes.extend_from_slice(piece);
            Ok(())
        })
        .unwrap();

        let raw = RawUtf16::new(&bytes).unwrap();
        assert_eq!(raw.len(), 5);
        assert_eq!(raw.get(1), Some('é' as u16));
        assert_eq!(raw.get(5), None);
        assert_eq!(raw.try_to_string().unwrap(), "héllo");
        assert_eq!(raw.to_string(), "héllo");

        assert!(RawUtf16::new(&bytes[..3]).is_err());
    }

    #[test]
    fn test_raw_lossy() {
        let bytes = 0xD800u16.to_ne_bytes();
        let raw = RawUtf16::new(&bytes).unwrap();
        assert!(raw.try_to_string().is_err());
        assert_eq!(raw.to_string_lossy(), "\u{FFFD}");
    }
}
