//! NANO Base32 and proof-of-work parameters

/// Number of digest evaluations performed by a single `search` call
pub const ITERATION_COUNT: u32 = 250_000;

/// Block identifier size in bytes
pub const HASH_BYTES: usize = 32;

/// Work value (nonce) size in bytes
pub const WORK_BYTES: usize = 8;

/// PoW digest output size in bytes
pub const DIGEST_BYTES: usize = 8;

/// Bits carried by one NANO Base32 symbol
pub const SYMBOL_BITS: u64 = 5;

/// Largest symbol or byte count accepted by the codec ((2^32) - 1)
pub const MAX_LENGTH: u64 = u32::MAX as u64;

/// NANO Base32 alphabet, symbol `k` encodes the 5-bit value `k`
pub const ALPHABET: &[u8; 32] = b"13456789abcdefghijkmnopqrstuwxyz";

/// A 32-byte block identifier
pub type BlockHash = [u8; HASH_BYTES];
