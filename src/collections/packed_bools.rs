//! Eight flags in one byte

use serde::{Deserialize, Serialize};

use crate::error::{Result, SlimError};

/// Highest valid bit index
pub const MAX_BIT_INDEX: usize = 7;

/// Up to eight booleans packed into the bits of a single byte
///
/// Bit `i` holds flag `i`; bit 0 is the least significant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackedBools(u8);

impl PackedBools {
    /// Wrap an existing flag byte
    pub fn new(flags: u8) -> Self {
        Self(flags)
    }

    /// Get the underlying byte
    pub fn raw_byte(self) -> u8 {
        self.0
    }

    /// State of flag `index`
    pub fn get(self, index: usize) -> Result<bool> {
        let mask = Self::mask(index)?;
        Ok(self.0 & mask != 0)
    }

    /// Set or clear flag `index`
    pub fn set(&mut self, index: usize, value: bool) -> Result<()> {
        let mask = Self::mask(index)?;
        if value {
            self.0 |= mask;
        } else {
            self.0 &= !mask;
        }
        Ok(())
    }

    /// Number of flags that are set
    pub fn count_set(self) -> u32 {
        self.0.count_ones()
    }

    fn mask(index: usize) -> Result<u8> {
        if index > MAX_BIT_INDEX {
            return Err(SlimError::out_of_range("index", index, MAX_BIT_INDEX));
        }
        Ok(1 << index)
    }
}

impl From<u8> for PackedBools {
    fn from(flags: u8) -> Self {
        Self(flags)
    }
}

impl From<PackedBools> for u8 {
    fn from(packed: PackedBools) -> Self {
        packed.0
    }
}
