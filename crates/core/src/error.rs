//! Error type shared by the codec and the PoW search

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("input is empty")]
    EmptyInput,

    #[error("length {len} exceeds the (2**32)-1 limit")]
    LengthOverflow { len: u64 },

    #[error("byte 0x{symbol:02x} at position {position} is not Nano Base32-encoded")]
    InvalidSymbol { symbol: u8, position: usize },

    #[error("input needs to have a size of exactly {expected} bytes, got {actual}")]
    InvalidInputSize { expected: usize, actual: usize },

    #[error("could not allocate a buffer of {bits} bits")]
    Allocation { bits: u64 },
}

pub type Result<T> = core::result::Result<T, Error>;
