//! nanolib CLI
//!
//! Command-line access to the NANO Base32 codec and the proof-of-work search.
//!
//! # Commands
//!
//! - `encode` / `decode` - NANO Base32 conversions
//! - `search` - Run one bounded PoW search
//! - `solve` - Solve work with the multi-threaded solver
//! - `validate` - Check work against a threshold
//! - `account` / `public-key` - Convert between public keys and account IDs
//! - `convert` - Convert amounts between NANO denominations
//! - `benchmark` - Measure the search hashrate

use clap::{Parser, Subcommand};
use std::hint::black_box;
use std::path::{Path, PathBuf};
use std::time::Instant;

use nanolib::accounts::{self, AccountIdPrefix};
use nanolib::algorithm::{self, Blake2bDigest};
use nanolib::config::{default_config_path, SolverConfig};
use nanolib::units::{self, NanoDenomination};
use nanolib::work::{parse_block_hash, parse_threshold, parse_work, validate_work, Work, WorkSolver};
use nanolib::{nbase32, BlockHash, ITERATION_COUNT};

#[derive(Parser)]
#[command(name = "nanolib")]
#[command(version = "0.1.0")]
#[command(about = "NANO Base32 codec and proof-of-work tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Solver config file (default: <config dir>/nanolib/solver.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode hex bytes as NANO Base32
    Encode {
        /// Bytes as a hexadecimal string
        hex: String,
    },

    /// Decode NANO Base32 into hex bytes
    Decode {
        /// NANO Base32 symbols
        symbols: String,
    },

    /// Run a single bounded search and print the candidate
    Search {
        /// Block hash as a 64-character hex string
        #[arg(long)]
        block_hash: String,

        /// Start nonce
        #[arg(long, default_value = "0")]
        nonce: u64,

        /// Threshold as a hex string (e.g. ffffffc000000000)
        #[arg(long)]
        threshold: String,
    },

    /// Solve the work for a block hash
    Solve {
        /// Block hash as a 64-character hex string
        #[arg(long)]
        block_hash: String,

        /// Threshold as a hex string (e.g. ffffffc000000000)
        #[arg(long)]
        threshold: String,

        /// Number of threads to use (default: number of CPU cores)
        #[arg(short, long)]
        threads: Option<usize>,

        /// Give up after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Deterministic start nonce instead of random ones
        #[arg(long)]
        start_nonce: Option<u64>,
    },

    /// Check that work meets a threshold
    Validate {
        /// Block hash as a 64-character hex string
        #[arg(long)]
        block_hash: String,

        /// Work as a 16-character hex string
        #[arg(long)]
        work: String,

        /// Threshold as a hex string
        #[arg(long)]
        threshold: String,
    },

    /// Derive the account ID of a public key
    Account {
        /// Public key as a 64-character hex string
        #[arg(long)]
        public_key: String,

        /// Account ID prefix (xrb or nano)
        #[arg(long, default_value = "xrb")]
        prefix: String,
    },

    /// Extract the public key of an account ID
    PublicKey {
        /// Account ID
        account: String,
    },

    /// Convert an amount between denominations
    Convert {
        /// Decimal amount
        amount: String,

        /// Source denomination (raw, unano, millinano, nano, knano, Mnano, Gnano)
        #[arg(long, default_value = "Mnano")]
        from: String,

        /// Target denomination
        #[arg(long, default_value = "raw")]
        to: String,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of full searches to run
        #[arg(short, long, default_value = "4")]
        count: u32,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    let result = match cli.command {
        Commands::Encode { hex } => cmd_encode(&hex),
        Commands::Decode { symbols } => cmd_decode(&symbols),
        Commands::Search {
            block_hash,
            nonce,
            threshold,
        } => cmd_search(&block_hash, nonce, &threshold),
        Commands::Solve {
            block_hash,
            threshold,
            threads,
            timeout_ms,
            start_nonce,
        } => build_solver_config(cli.config.as_deref(), threads, timeout_ms, start_nonce)
            .and_then(|config| cmd_solve(&block_hash, &threshold, config)),
        Commands::Validate {
            block_hash,
            work,
            threshold,
        } => cmd_validate(&block_hash, &work, &threshold),
        Commands::Account { public_key, prefix } => cmd_account(&public_key, &prefix),
        Commands::PublicKey { account } => cmd_public_key(&account),
        Commands::Convert { amount, from, to } => cmd_convert(&amount, &from, &to),
        Commands::Benchmark { count } => cmd_benchmark(count),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Build solver config from the config file and CLI args
fn build_solver_config(
    path: Option<&Path>,
    threads: Option<usize>,
    timeout_ms: Option<u64>,
    start_nonce: Option<u64>,
) -> anyhow::Result<SolverConfig> {
    let mut config = match path {
        Some(path) => SolverConfig::load_from_file(path)?,
        None => {
            let default_path = default_config_path();
            if default_path.exists() {
                SolverConfig::load_from_file(&default_path)?
            } else {
                SolverConfig::default()
            }
        }
    };

    if threads.is_some() {
        config.threads = threads;
    }
    if timeout_ms.is_some() {
        config.timeout_ms = timeout_ms;
    }
    if start_nonce.is_some() {
        config.start_nonce = start_nonce;
    }
    config.validate()?;

    Ok(config)
}

fn cmd_encode(hex_bytes: &str) -> anyhow::Result<()> {
    let bytes = hex::decode(hex_bytes)?;
    println!("{}", nbase32::encode(&bytes)?);
    Ok(())
}

fn cmd_decode(symbols: &str) -> anyhow::Result<()> {
    let bytes = nbase32::decode(symbols)?;
    println!("{}", hex::encode(bytes));
    Ok(())
}

fn cmd_search(block_hash: &str, nonce: u64, threshold: &str) -> anyhow::Result<()> {
    let block_hash = parse_block_hash(block_hash)?;
    let threshold = parse_threshold(threshold)?;

    let start = Instant::now();
    let candidate = algorithm::search(&block_hash, nonce, threshold)?;
    let elapsed = start.elapsed();

    let value = algorithm::work_value(&block_hash, candidate);
    println!("Candidate: {}", Work(candidate));
    println!("Value:     {:016x}", value);
    println!("Valid:     {}", value >= threshold);
    println!("Time:      {:.3}s", elapsed.as_secs_f64());

    Ok(())
}

fn cmd_solve(block_hash: &str, threshold: &str, config: SolverConfig) -> anyhow::Result<()> {
    let block_hash = parse_block_hash(block_hash)?;
    let threshold = parse_threshold(threshold)?;
    let solver = WorkSolver::new(config)?;

    println!("Solving work...");
    println!("Block hash: {}", hex::encode(block_hash));
    println!("Threshold:  {:016x}", threshold);
    println!("Threads:    {}", solver.threads());

    let start = Instant::now();
    let result = solver.solve(&block_hash, threshold)?;
    let elapsed = start.elapsed();

    match result {
        Some(work) => {
            let value = validate_work(&block_hash, work, threshold)?;
            println!("\nFound valid work!");
            println!("  Work:  {}", work);
            println!("  Value: {:016x}", value);
            println!("  Time:  {:.2}s", elapsed.as_secs_f64());
        }
        None => {
            anyhow::bail!(
                "Work not found within {:.2}s, try a longer --timeout-ms",
                elapsed.as_secs_f64()
            );
        }
    }

    Ok(())
}

fn cmd_validate(block_hash: &str, work: &str, threshold: &str) -> anyhow::Result<()> {
    let block_hash = parse_block_hash(block_hash)?;
    let work = parse_work(work)?;
    let threshold = parse_threshold(threshold)?;

    let value = validate_work(&block_hash, work, threshold)?;
    println!("Work {} is valid (value {:016x})", work, value);

    Ok(())
}

fn cmd_account(public_key: &str, prefix: &str) -> anyhow::Result<()> {
    let public_key = accounts::parse_public_key(public_key)?;
    let prefix: AccountIdPrefix = prefix.parse()?;

    println!("{}", accounts::account_id_from_public_key(&public_key, prefix)?);
    Ok(())
}

fn cmd_public_key(account: &str) -> anyhow::Result<()> {
    let public_key = accounts::public_key_from_account_id(account)?;
    println!("{}", hex::encode(public_key));
    Ok(())
}

fn cmd_convert(amount: &str, from: &str, to: &str) -> anyhow::Result<()> {
    let source: NanoDenomination = from.parse()?;
    let target: NanoDenomination = to.parse()?;

    println!("{} {}", units::convert(amount, source, target)?, target);
    Ok(())
}

fn cmd_benchmark(count: u32) -> anyhow::Result<()> {
    println!("Running benchmark with {} searches...", count);

    let start = Instant::now();
    let hashes = run_exhausted_searches(&[0x5Au8; 32], count);
    let elapsed = start.elapsed();
    let hashrate = hashes as f64 / elapsed.as_secs_f64();

    println!("\nResults:");
    println!("  Total hashes: {}", hashes);
    println!("  Time elapsed: {:.2}s", elapsed.as_secs_f64());
    println!("  Hashrate: {:.2} H/s", hashrate);
    println!("  CPU cores: {}", num_cpus::get());
    println!(
        "  Estimated with all cores: {:.2} H/s",
        hashrate * num_cpus::get() as f64
    );

    Ok(())
}

/// Run `count` searches that never reach their threshold, returning the number of digests
fn run_exhausted_searches(block_hash: &BlockHash, count: u32) -> u64 {
    let mut hashes = 0u64;

    for i in 0..count {
        // Unreachable threshold, every search runs its full budget
        let nonce = u64::from(i) * u64::from(ITERATION_COUNT);
        let last = black_box(algorithm::search_with(
            &Blake2bDigest,
            black_box(block_hash),
            nonce,
            u64::MAX,
        ));
        hashes += last.wrapping_sub(nonce);
    }

    hashes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausted_searches_count_every_digest() {
        assert_eq!(run_exhausted_searches(&[0x5Au8; 32], 0), 0);
        assert_eq!(
            run_exhausted_searches(&[0x5Au8; 32], 2),
            2 * u64::from(ITERATION_COUNT)
        );
    }
}
