//! Bounded proof-of-work search
//!
//! A work value is valid for a block when the 8-byte BLAKE2b digest of
//! `work (8 bytes, little-endian) || block_hash (32 bytes)`, read as a
//! little-endian `u64`, is greater than or equal to the threshold.
//!
//! [`search`] tries at most [`ITERATION_COUNT`] consecutive nonces after the
//! starting one and returns where it stopped. That value is only a candidate:
//! when the budget runs out it is simply the last nonce tried, so callers
//! confirm it with [`meets_threshold`] before using it.

use blake2::digest::consts::U8;
use blake2::{Blake2b, Digest};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::params::*;

type Blake2b64 = Blake2b<U8>;

/// Digest primitive evaluated once per candidate nonce
///
/// Implementations must be pure: the same `(work, block_hash)` always yields
/// the same value.
pub trait WorkDigest {
    /// Digest of `work || block_hash` interpreted as an unsigned integer
    fn work_value(&self, work: u64, block_hash: &BlockHash) -> u64;
}

/// BLAKE2b with an 8-byte output, the NANO PoW hash
#[derive(Debug, Default, Clone, Copy)]
pub struct Blake2bDigest;

impl WorkDigest for Blake2bDigest {
    #[inline(always)]
    fn work_value(&self, work: u64, block_hash: &BlockHash) -> u64 {
        let mut hasher = Blake2b64::new();
        hasher.update(work.to_le_bytes());
        hasher.update(block_hash);
        let digest = hasher.finalize();

        let mut bytes = [0u8; DIGEST_BYTES];
        bytes.copy_from_slice(&digest);
        u64::from_le_bytes(bytes)
    }
}

/// Check that a block identifier is exactly [`HASH_BYTES`] long
pub fn block_hash_from_slice(block_hash: &[u8]) -> Result<BlockHash> {
    block_hash.try_into().map_err(|_| Error::InvalidInputSize {
        expected: HASH_BYTES,
        actual: block_hash.len(),
    })
}

/// Search for a work value with the NANO digest
///
/// Fails with [`Error::InvalidInputSize`] unless `block_hash` is 32 bytes.
///
/// # Example
///
/// ```rust
/// use nanolib_core::work::search;
///
/// // A zero threshold is met before the first iteration
/// let work = search(&[0u8; 32], 42, 0).unwrap();
/// assert_eq!(work, 42);
/// ```
pub fn search(block_hash: &[u8], start_nonce: u64, threshold: u64) -> Result<u64> {
    let block_hash = block_hash_from_slice(block_hash)?;
    Ok(search_with(&Blake2bDigest, &block_hash, start_nonce, threshold))
}

/// Run the bounded search loop with an arbitrary digest
///
/// Returns the last nonce tried: the first one whose value reached `threshold`,
/// or `start_nonce + ITERATION_COUNT` (wrapping) when the budget ran out.
pub fn search_with<D: WorkDigest + ?Sized>(
    digest: &D,
    block_hash: &BlockHash,
    start_nonce: u64,
    threshold: u64,
) -> u64 {
    let mut work = start_nonce;
    let mut result = 0u64;
    let mut iterations = ITERATION_COUNT;

    while iterations > 0 && result < threshold {
        work = work.wrapping_add(1);
        result = digest.work_value(work, block_hash);
        iterations -= 1;
    }

    if result < threshold {
        log::trace!(
            "search from {start_nonce:#018x} exhausted at {work:#018x} without reaching {threshold:#018x}"
        );
    }

    work
}

/// NANO work value of `work` for `block_hash`
#[inline]
pub fn work_value(block_hash: &BlockHash, work: u64) -> u64 {
    Blake2bDigest.work_value(work, block_hash)
}

/// Check whether `work` reaches `threshold` for `block_hash` (inclusive)
#[inline]
pub fn meets_threshold(block_hash: &BlockHash, work: u64, threshold: u64) -> bool {
    work_value(block_hash, work) >= threshold
}

/// Run one bounded search per start nonce and return the first verified work
///
/// Start nonces should be at least [`ITERATION_COUNT`] apart so the searches
/// cover disjoint ranges. Any verified result may be returned when more than
/// one search succeeds.
#[cfg(feature = "parallel")]
pub fn search_batch<D: WorkDigest + Sync + ?Sized>(
    digest: &D,
    block_hash: &BlockHash,
    start_nonces: &[u64],
    threshold: u64,
) -> Option<u64> {
    start_nonces
        .par_iter()
        .find_map_any(|&nonce| verified_search(digest, block_hash, nonce, threshold))
}

/// Run one bounded search per start nonce (sequential fallback)
#[cfg(not(feature = "parallel"))]
pub fn search_batch<D: WorkDigest + Sync + ?Sized>(
    digest: &D,
    block_hash: &BlockHash,
    start_nonces: &[u64],
    threshold: u64,
) -> Option<u64> {
    start_nonces
        .iter()
        .find_map(|&nonce| verified_search(digest, block_hash, nonce, threshold))
}

#[inline]
fn verified_search<D: WorkDigest + ?Sized>(
    digest: &D,
    block_hash: &BlockHash,
    nonce: u64,
    threshold: u64,
) -> Option<u64> {
    let candidate = search_with(digest, block_hash, nonce, threshold);
    (digest.work_value(candidate, block_hash) >= threshold).then_some(candidate)
}
