//! nanolib
//!
//! NANO client helpers built on two primitives from `nanolib-core`:
//! the NANO Base32 codec and the bounded proof-of-work search.
//!
//! # Features
//!
//! - **Account IDs**: derive and verify `xrb_`/`nano_` account IDs
//! - **Work solving**: multi-threaded solver with optional timeout
//! - **Work validation**: check a work value against a caller-supplied threshold
//! - **Units**: exact conversions between NANO denominations
//!
//! # Example
//!
//! ```rust,no_run
//! use nanolib::work::{parse_block_hash, validate_work, WorkSolver};
//! use nanolib::SolverConfig;
//!
//! let block_hash = parse_block_hash(
//!     "B585D9363B8265CFD5993F30A3D6DE6B5CA5CC7879E0AFA94D13F08B713B9FFD",
//! )?;
//! let threshold = 0xffff_ffc0_0000_0000;
//!
//! let solver = WorkSolver::new(SolverConfig::default())?;
//! if let Some(work) = solver.solve(&block_hash, threshold)? {
//!     validate_work(&block_hash, work, threshold)?;
//!     println!("Work: {}", work);
//! }
//! # Ok::<(), nanolib::work::WorkError>(())
//! ```

// Re-export the core primitives
pub use nanolib_core as algorithm;

pub mod accounts;
pub mod config;
pub mod units;
pub mod work;

// Convenience re-exports
pub use accounts::{account_id_from_public_key, public_key_from_account_id, AccountIdPrefix};
pub use algorithm::{nbase32, search, BlockHash, ITERATION_COUNT};
pub use config::SolverConfig;
pub use units::{convert, NanoDenomination};
pub use work::{solve_work_async, validate_work, Work, WorkSolver};
