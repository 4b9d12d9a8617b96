//! Region ids, handles and headers

use std::fmt;

use crate::codec::Unmanaged;

/// Width of one handle slot in bytes
pub const HANDLE_SIZE: usize = 4;

/// Handle value of a region that has no header yet
pub const EMPTY_HANDLE: u32 = u32::MAX;

/// Width of one encoded [`RegionHeader`] in bytes
pub const HEADER_SIZE: usize = <RegionHeader as Unmanaged>::SIZE;

/// Identifier of a region, handed out sequentially from 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub(crate) u32);

impl RegionId {
    /// Raw id value
    pub fn value(self) -> u32 {
        self.0
    }

    /// Byte offset of this region's handle inside the handle area
    pub(crate) fn handle_offset(self) -> usize {
        self.0 as usize * HANDLE_SIZE
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "region#{}", self.0)
    }
}

/// Where a region's bytes live inside the data area
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegionHeader {
    /// Offset of the first byte, relative to the data area
    pub data_offset: u32,
    /// Number of bytes
    pub data_length: u32,
    /// Number of values appended with `append_value`
    pub count: u32,
}

impl RegionHeader {
    /// One past the last byte, relative to the data area
    pub fn data_end(&self) -> usize {
        self.data_offset as usize + self.data_length as usize
    }
}

impl Unmanaged for RegionHeader {
    const SIZE: usize = 12;

    fn write_le(&self, dst: &mut [u8]) {
        self.data_offset.write_le(&mut dst[0..4]);
        self.data_length.write_le(&mut dst[4..8]);
        self.count.write_le(&mut dst[8..12]);
    }

    fn read_le(src: &[u8]) -> Self {
        Self {
            data_offset: u32::read_le(&src[0..4]),
            data_length: u32::read_le(&src[4..8]),
            count: u32::read_le(&src[8..12]),
        }
    }
}
