//! # nanolib core primitives
//!
//! The two algorithmic building blocks of a NANO client:
//!
//! - **NANO Base32**: a reversible encoding between bytes and a 32-symbol
//!   alphabet packed at 5 bits per symbol, used for account IDs.
//! - **Proof-of-work search**: a bounded loop looking for a 64-bit nonce whose
//!   BLAKE2b digest against a 32-byte block hash reaches a threshold.
//!
//! Both are pure, single-shot operations with no shared state, so they can be
//! called from any number of threads at once.
//!
//! ## Example
//!
//! ```rust
//! use nanolib_core::{nbase32, work};
//!
//! // Codec round trip
//! let symbols = nbase32::encode(b"\x00").unwrap();
//! assert_eq!(symbols, "11");
//! assert_eq!(nbase32::decode(&symbols).unwrap(), b"\x00");
//!
//! // Bounded PoW search; the result is a candidate until verified
//! let block_hash = [0x11u8; 32];
//! let threshold = 0xff00_0000_0000_0000;
//! let candidate = work::search(&block_hash, 0, threshold).unwrap();
//! if work::meets_threshold(&block_hash, candidate, threshold) {
//!     println!("Found work {candidate:016x}");
//! }
//! ```
//!
//! ## Features
//!
//! - `parallel` (default): [`work::search_batch`] spreads searches over rayon.

pub mod bitbuf;
mod error;
pub mod nbase32;
mod params;
pub mod work;

pub use error::{Error, Result};
pub use params::*;
pub use work::{
    Blake2bDigest, WorkDigest, block_hash_from_slice, meets_threshold, search, search_batch,
    search_with, work_value,
};
