//! NANO account IDs
//!
//! An account ID is a prefix followed by 60 NANO Base32 symbols:
//!
//! ```text
//! xrb_ || nbase32(public_key) || nbase32(reverse(blake2b_40(public_key)))
//!         52 symbols             8 symbols
//! ```

use std::fmt;
use std::str::FromStr;

use blake2::digest::consts::U5;
use blake2::{Blake2b, Digest};
use thiserror::Error;

use crate::algorithm::nbase32;

/// Public key size in bytes
pub const PUBLIC_KEY_BYTES: usize = 32;

/// Account checksum size in bytes
const CHECKSUM_BYTES: usize = 5;

/// Symbols following the prefix
const ACCOUNT_SYMBOLS: usize = 60;

/// A public key of 256 bits encodes with 4 padding bits, so the first symbol is 1 or 3
const FIRST_SYMBOLS: [u8; 2] = [b'1', b'3'];

pub type PublicKey = [u8; PUBLIC_KEY_BYTES];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("Invalid NANO address")]
    InvalidAccount,

    #[error("Invalid checksum")]
    InvalidChecksum,

    #[error("Account ID prefix has to be one of: xrb_, nano_")]
    InvalidPrefix,

    #[error("Account public key must be a 64-character hexadecimal string")]
    InvalidPublicKey,

    #[error(transparent)]
    Encoding(#[from] nanolib_core::Error),
}

/// Prefixes used for NANO account IDs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccountIdPrefix {
    /// Recognized universally
    #[default]
    Xrb,
    /// Newer prefix, may not be supported by all endpoints
    Nano,
}

impl AccountIdPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Xrb => "xrb_",
            Self::Nano => "nano_",
        }
    }
}

impl fmt::Display for AccountIdPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountIdPrefix {
    type Err = AccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().trim_end_matches('_') {
            "xrb" => Ok(Self::Xrb),
            "nano" => Ok(Self::Nano),
            _ => Err(AccountError::InvalidPrefix),
        }
    }
}

/// Parse a public key given as 64 hexadecimal characters
pub fn parse_public_key(public_key: &str) -> Result<PublicKey, AccountError> {
    if public_key.len() != PUBLIC_KEY_BYTES * 2 {
        return Err(AccountError::InvalidPublicKey);
    }

    let mut key = [0u8; PUBLIC_KEY_BYTES];
    hex::decode_to_slice(public_key, &mut key).map_err(|_| AccountError::InvalidPublicKey)?;
    Ok(key)
}

/// Derive the account ID of a public key
///
/// # Example
///
/// ```rust
/// use nanolib::accounts::{account_id_from_public_key, AccountIdPrefix};
///
/// let account = account_id_from_public_key(&[0u8; 32], AccountIdPrefix::Xrb).unwrap();
/// assert_eq!(
///     account,
///     "xrb_1111111111111111111111111111111111111111111111111111hifc8npp"
/// );
/// ```
pub fn account_id_from_public_key(
    public_key: &PublicKey,
    prefix: AccountIdPrefix,
) -> Result<String, AccountError> {
    let key_symbols = nbase32::encode(public_key)?;
    let checksum_symbols = nbase32::encode(&checksum(public_key))?;

    Ok(format!("{prefix}{key_symbols}{checksum_symbols}"))
}

/// Extract and verify the public key of an account ID
pub fn public_key_from_account_id(account_id: &str) -> Result<PublicKey, AccountError> {
    let (prefix, rest) = account_id
        .split_once('_')
        .ok_or(AccountError::InvalidAccount)?;

    if prefix != "xrb" && prefix != "nano" {
        return Err(AccountError::InvalidAccount);
    }
    if rest.len() != ACCOUNT_SYMBOLS || !FIRST_SYMBOLS.contains(&rest.as_bytes()[0]) {
        return Err(AccountError::InvalidAccount);
    }

    let bytes = nbase32::decode(rest).map_err(|_| AccountError::InvalidAccount)?;
    let (key_bytes, account_checksum) = bytes.split_at(PUBLIC_KEY_BYTES);

    let mut public_key = [0u8; PUBLIC_KEY_BYTES];
    public_key.copy_from_slice(key_bytes);

    if checksum(&public_key) != account_checksum {
        return Err(AccountError::InvalidChecksum);
    }

    Ok(public_key)
}

/// Check whether an account ID is well-formed and has a valid checksum
pub fn is_account_id_valid(account_id: &str) -> bool {
    public_key_from_account_id(account_id).is_ok()
}

/// Byte-reversed 5-byte BLAKE2b digest of the public key
fn checksum(public_key: &PublicKey) -> [u8; CHECKSUM_BYTES] {
    let digest = Blake2b::<U5>::digest(public_key);

    let mut checksum = [0u8; CHECKSUM_BYTES];
    checksum.copy_from_slice(&digest);
    checksum.reverse();
    checksum
}
