//! Fixed-capacity bit-addressable buffer
//!
//! Backs the NANO Base32 conversions: symbols are 5 bits wide and bytes are 8,
//! so both directions go through a flat bitstream addressed one bit at a time.
//! Storage is `ceil(bits / 8)` bytes with bit `i` living in byte `i / 8`.

use crate::error::{Error, Result};

/// A fixed number of independently addressable bits, all zero on creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitBuffer {
    storage: Vec<u8>,
    bits: u64,
}

impl BitBuffer {
    /// Allocate a buffer of exactly `bits` bits
    ///
    /// Fails with [`Error::Allocation`] if the backing storage cannot be reserved.
    pub fn new(bits: u64) -> Result<Self> {
        let bytes = usize::try_from(bits.div_ceil(8)).map_err(|_| Error::Allocation { bits })?;

        let mut storage = Vec::new();
        storage
            .try_reserve_exact(bytes)
            .map_err(|_| Error::Allocation { bits })?;
        storage.resize(bytes, 0);

        Ok(Self { storage, bits })
    }

    /// Number of addressable bits
    #[inline]
    pub fn len(&self) -> u64 {
        self.bits
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Write a single bit. `index` must be below [`len`](Self::len).
    #[inline(always)]
    pub fn set(&mut self, index: u64, value: bool) {
        debug_assert!(index < self.bits, "bit index {index} out of range");
        let (byte, mask) = locate(index);
        if value {
            self.storage[byte] |= mask;
        } else {
            self.storage[byte] &= !mask;
        }
    }

    /// Read a single bit. `index` must be below [`len`](Self::len).
    #[inline(always)]
    pub fn get(&self, index: u64) -> bool {
        debug_assert!(index < self.bits, "bit index {index} out of range");
        let (byte, mask) = locate(index);
        self.storage[byte] & mask != 0
    }

    /// Write the low `width` bits of `value` starting at `offset`, most significant first
    #[inline]
    pub fn write_bits(&mut self, offset: u64, value: u32, width: u32) {
        for k in 0..width {
            let bit = (value >> (width - 1 - k)) & 1;
            self.set(offset + u64::from(k), bit == 1);
        }
    }

    /// Read `width` bits starting at `offset`, the first bit being the most significant
    #[inline]
    pub fn read_bits(&self, offset: u64, width: u32) -> u32 {
        (0..width).fold(0, |acc, k| {
            (acc << 1) | u32::from(self.get(offset + u64::from(k)))
        })
    }
}

#[inline(always)]
fn locate(index: u64) -> (usize, u8) {
    ((index / 8) as usize, 1 << (index % 8))
}
