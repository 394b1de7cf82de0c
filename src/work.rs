//! Proof-of-work solving and validation
//!
//! [`WorkSolver`] keeps a pool of worker threads. Each round gives every worker
//! its own start nonce, runs one bounded search per worker and keeps the first
//! result that verifies. Rounds repeat until work is found or the configured
//! timeout elapses. The timeout is checked between rounds, so it can be
//! overrun by up to one round of `ITERATION_COUNT` digests per worker.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use rayon::{ThreadPool, ThreadPoolBuilder};
use thiserror::Error;

use crate::algorithm::{self, Blake2bDigest, BlockHash, ITERATION_COUNT, WORK_BYTES};
use crate::config::{ConfigError, SolverConfig};

#[derive(Error, Debug)]
pub enum WorkError {
    #[error("Work has to be a 16-character hexadecimal string")]
    InvalidWork,

    #[error("Block hash has to be a 64-character hexadecimal string")]
    InvalidBlockHash,

    #[error("Threshold has to be a hexadecimal string of 1 to 16 characters")]
    InvalidThreshold,

    #[error("Work doesn't meet the required threshold")]
    BelowThreshold,

    #[error(transparent)]
    Core(#[from] nanolib_core::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("Failed to gather entropy: {0}")]
    Entropy(String),

    #[error("Solver task failed: {0}")]
    Join(String),
}

/// A proof-of-work value
///
/// Displayed as 16 lowercase hexadecimal characters, most significant byte
/// first, the way NANO nodes represent work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Work(pub u64);

impl fmt::Display for Work {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl FromStr for Work {
    type Err = WorkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_work(s)
    }
}

impl From<u64> for Work {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

fn is_hex(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Parse work given as exactly 16 hexadecimal characters (any case)
pub fn parse_work(work: &str) -> Result<Work, WorkError> {
    if work.len() != WORK_BYTES * 2 || !is_hex(work) {
        return Err(WorkError::InvalidWork);
    }
    u64::from_str_radix(work, 16)
        .map(Work)
        .map_err(|_| WorkError::InvalidWork)
}

/// Parse a block hash given as 64 hexadecimal characters
pub fn parse_block_hash(block_hash: &str) -> Result<BlockHash, WorkError> {
    if block_hash.len() % 2 != 0 || !is_hex(block_hash) {
        return Err(WorkError::InvalidBlockHash);
    }
    let bytes = hex::decode(block_hash).map_err(|_| WorkError::InvalidBlockHash)?;
    Ok(algorithm::block_hash_from_slice(&bytes)?)
}

/// Parse a threshold given as up to 16 hexadecimal characters
pub fn parse_threshold(threshold: &str) -> Result<u64, WorkError> {
    let threshold = threshold
        .strip_prefix("0x")
        .or_else(|| threshold.strip_prefix("0X"))
        .unwrap_or(threshold);
    if threshold.is_empty() || threshold.len() > 16 || !is_hex(threshold) {
        return Err(WorkError::InvalidThreshold);
    }
    u64::from_str_radix(threshold, 16).map_err(|_| WorkError::InvalidThreshold)
}

/// Check a work value against a threshold and return its digest value
pub fn validate_work(block_hash: &BlockHash, work: Work, threshold: u64) -> Result<u64, WorkError> {
    let value = algorithm::work_value(block_hash, work.0);
    if value < threshold {
        return Err(WorkError::BelowThreshold);
    }
    Ok(value)
}

/// Multi-threaded work solver
pub struct WorkSolver {
    config: SolverConfig,
    pool: ThreadPool,
}

impl WorkSolver {
    /// Create a solver and its worker pool
    pub fn new(config: SolverConfig) -> Result<Self, WorkError> {
        config.validate()?;

        let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("nanolib-work-{i}"));
        if let Some(threads) = config.threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder.build()?;

        Ok(Self { config, pool })
    }

    /// Number of worker threads
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve the work for a block hash
    ///
    /// Returns `Ok(None)` when the timeout elapses first. Without a timeout
    /// this blocks until work is found.
    pub fn solve(&self, block_hash: &BlockHash, threshold: u64) -> Result<Option<Work>, WorkError> {
        let workers = self.threads();
        let deadline = self.config.timeout().map(|timeout| Instant::now() + timeout);
        let stride = workers as u64 * u64::from(ITERATION_COUNT);
        let mut base = self.config.start_nonce;
        let mut rounds: u64 = 0;

        log::debug!(
            "Solving work for {} with threshold {:016x} on {} threads",
            hex::encode(block_hash),
            threshold,
            workers
        );

        loop {
            let start_nonces = match base {
                Some(base) => partition(base, workers),
                None => random_nonces(workers)?,
            };

            let found = self.pool.install(|| {
                algorithm::search_batch(&Blake2bDigest, block_hash, &start_nonces, threshold)
            });
            rounds += 1;

            if let Some(work) = found {
                log::info!("Found work {:016x} after {} rounds", work, rounds);
                return Ok(Some(Work(work)));
            }

            if let Some(base) = base.as_mut() {
                *base = base.wrapping_add(stride);
            }

            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                log::debug!("Work not found within timeout after {} rounds", rounds);
                return Ok(None);
            }
        }
    }
}

/// Solve work on tokio's blocking pool
///
/// The search is CPU-bound, so it runs off the async executor threads.
pub async fn solve_work_async(
    config: SolverConfig,
    block_hash: BlockHash,
    threshold: u64,
) -> Result<Option<Work>, WorkError> {
    tokio::task::spawn_blocking(move || WorkSolver::new(config)?.solve(&block_hash, threshold))
        .await
        .map_err(|e| WorkError::Join(e.to_string()))?
}

/// Consecutive, non-overlapping search ranges starting at `base`
fn partition(base: u64, workers: usize) -> Vec<u64> {
    (0..workers as u64)
        .map(|i| base.wrapping_add(i * u64::from(ITERATION_COUNT)))
        .collect()
}

fn random_nonces(count: usize) -> Result<Vec<u64>, WorkError> {
    (0..count)
        .map(|_| {
            let mut bytes = [0u8; WORK_BYTES];
            getrandom::getrandom(&mut bytes).map_err(|e| WorkError::Entropy(e.to_string()))?;
            Ok(u64::from_le_bytes(bytes))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::meets_threshold;

    const VALID_BLOCK_HASH: &str =
        "B585D9363B8265CFD5993F30A3D6DE6B5CA5CC7879E0AFA94D13F08B713B9FFD";
    const VALID_WORK: &str = "5b064dcc70b9db0a";

    /// NANO network threshold, used only as a test vector
    const NETWORK_THRESHOLD: u64 = 0xffff_ffc0_0000_0000;

    /// Low threshold so tests solve quickly
    const TEST_THRESHOLD: u64 = 0xfff0_0000_0000_0000;

    fn block_hash() -> BlockHash {
        parse_block_hash(VALID_BLOCK_HASH).unwrap()
    }

    #[test]
    fn test_parse_work() {
        assert!(matches!(parse_work(&"A".repeat(15)), Err(WorkError::InvalidWork)));
        assert!(matches!(parse_work(&"x".repeat(16)), Err(WorkError::InvalidWork)));
        assert!(matches!(parse_work("+fffffffffffffff"), Err(WorkError::InvalidWork)));

        let work = parse_work(&"A".repeat(16)).unwrap();
        assert_eq!(work.to_string(), "a".repeat(16));
        assert_eq!("000000000000002a".parse::<Work>().unwrap(), Work(42));
    }

    #[test]
    fn test_parse_block_hash() {
        assert_eq!(block_hash()[0], 0xB5);
        assert!(matches!(
            parse_block_hash("zz"),
            Err(WorkError::InvalidBlockHash)
        ));
        assert!(matches!(
            parse_block_hash("abcd"),
            Err(WorkError::Core(nanolib_core::Error::InvalidInputSize {
                expected: 32,
                actual: 2
            }))
        ));
    }

    #[test]
    fn test_parse_threshold() {
        assert_eq!(parse_threshold("ffffffc000000000").unwrap(), NETWORK_THRESHOLD);
        assert_eq!(parse_threshold("0x400").unwrap(), 1024);
        assert_eq!(parse_threshold("0X10").unwrap(), 16);
        assert!(matches!(parse_threshold("0x0x10"), Err(WorkError::InvalidThreshold)));
        assert!(matches!(parse_threshold("0x"), Err(WorkError::InvalidThreshold)));
        assert!(matches!(parse_threshold(""), Err(WorkError::InvalidThreshold)));
        assert!(matches!(
            parse_threshold("10000000000000000"),
            Err(WorkError::InvalidThreshold)
        ));
    }

    #[test]
    fn test_validate_work() {
        let hash = block_hash();
        let work = parse_work(VALID_WORK).unwrap();

        assert_eq!(validate_work(&hash, work, NETWORK_THRESHOLD).unwrap(), 0xffff_fffe_b124_9486);
        assert!(matches!(
            validate_work(&hash, parse_work(&"e".repeat(16)).unwrap(), NETWORK_THRESHOLD),
            Err(WorkError::BelowThreshold)
        ));
    }

    #[test]
    fn test_partition_is_disjoint() {
        let starts = partition(u64::MAX, 3);
        assert_eq!(starts.len(), 3);
        assert_eq!(starts[1], u64::from(ITERATION_COUNT) - 1);
        assert_eq!(starts[2] - starts[1], u64::from(ITERATION_COUNT));
    }

    #[test]
    fn test_solve_deterministic_single_thread() {
        let config = SolverConfig {
            threads: Some(1),
            start_nonce: Some(0),
            ..Default::default()
        };
        let solver = WorkSolver::new(config).unwrap();
        assert_eq!(solver.threads(), 1);

        let work = solver.solve(&block_hash(), TEST_THRESHOLD).unwrap();
        assert_eq!(work, Some(Work(3649)));
    }

    #[test]
    fn test_solve_random_start() {
        let solver = WorkSolver::new(SolverConfig {
            threads: Some(2),
            ..Default::default()
        })
        .unwrap();

        let hash = block_hash();
        let work = solver.solve(&hash, TEST_THRESHOLD).unwrap().unwrap();
        assert!(meets_threshold(&hash, work.0, TEST_THRESHOLD));
        assert!(validate_work(&hash, work, TEST_THRESHOLD).is_ok());
    }

    #[test]
    fn test_solve_times_out() {
        let solver = WorkSolver::new(SolverConfig {
            threads: Some(1),
            timeout_ms: Some(1),
            start_nonce: Some(0),
        })
        .unwrap();

        let work = solver.solve(&block_hash(), u64::MAX).unwrap();
        assert_eq!(work, None);
    }

    #[test]
    fn test_zero_threads_rejected() {
        let result = WorkSolver::new(SolverConfig {
            threads: Some(0),
            ..Default::default()
        });
        assert!(matches!(
            result,
            Err(WorkError::Config(ConfigError::InvalidThreads))
        ));
    }

    #[tokio::test]
    async fn test_solve_work_async() {
        let config = SolverConfig {
            threads: Some(1),
            start_nonce: Some(0),
            ..Default::default()
        };

        let work = solve_work_async(config, block_hash(), TEST_THRESHOLD)
            .await
            .unwrap();
        assert_eq!(work, Some(Work(3649)));
    }
}
