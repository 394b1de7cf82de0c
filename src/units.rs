//! NANO denominations
//!
//! Amounts are kept as integer `raw` values (`u128`, so the coin cap of
//! 2^128 - 1 raw is `u128::MAX`). Other denominations are decimal strings and
//! every conversion is exact: an amount more precise than one raw is rejected
//! instead of rounded.
//!
//! | Denomination | raw |
//! |---|---|
//! | `raw` | 1 |
//! | `unano` | 10^18 |
//! | `millinano` | 10^21 |
//! | `nano` | 10^24 |
//! | `knano` | 10^27 |
//! | `Mnano` (NANO) | 10^30 |
//! | `Gnano` | 10^33 |
//!
//! `nano` and `NANO` are different units, so denomination names are case-sensitive.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Highest amount that can exist, in raw
pub const NANO_RAW_CAP: u128 = u128::MAX;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitsError {
    #[error("Amount has to be a non-negative decimal number")]
    InvalidAmount,

    #[error("Unknown denomination: {0}")]
    InvalidDenomination(String),

    #[error("Amount is higher than the NANO coin supply")]
    AboveCap,

    #[error("Amount is more precise than a single raw")]
    Inexact,
}

/// Denominations used in NANO
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NanoDenomination {
    Raw,
    MicroNano,
    MilliNano,
    Nano,
    KiloNano,
    MegaNano,
    GigaNano,
}

impl NanoDenomination {
    pub const ALL: [NanoDenomination; 7] = [
        Self::Raw,
        Self::MicroNano,
        Self::MilliNano,
        Self::Nano,
        Self::KiloNano,
        Self::MegaNano,
        Self::GigaNano,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::MicroNano => "unano",
            Self::MilliNano => "millinano",
            Self::Nano => "nano",
            Self::KiloNano => "knano",
            Self::MegaNano => "Mnano",
            Self::GigaNano => "Gnano",
        }
    }

    /// Power of ten of one unit in raw
    pub fn exponent(&self) -> u32 {
        match self {
            Self::Raw => 0,
            Self::MicroNano => 18,
            Self::MilliNano => 21,
            Self::Nano => 24,
            Self::KiloNano => 27,
            Self::MegaNano => 30,
            Self::GigaNano => 33,
        }
    }

    /// One unit in raw
    pub fn raw_amount(&self) -> u128 {
        10u128.pow(self.exponent())
    }
}

impl fmt::Display for NanoDenomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NanoDenomination {
    type Err = UnitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|denomination| denomination.as_str() == s)
            .ok_or_else(|| UnitsError::InvalidDenomination(s.to_string()))
    }
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a decimal amount in `source` units into raw
pub fn to_raw(amount: &str, source: NanoDenomination) -> Result<u128, UnitsError> {
    let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(UnitsError::InvalidAmount);
    }

    let exponent = source.exponent();
    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > exponent as usize {
        return Err(UnitsError::Inexact);
    }

    // Digits are validated, so a parse failure can only be an overflow
    let whole: u128 = match whole {
        "" => 0,
        digits => digits.parse().map_err(|_| UnitsError::AboveCap)?,
    };
    let fraction_raw: u128 = match fraction {
        "" => 0,
        digits => {
            let value: u128 = digits.parse().map_err(|_| UnitsError::InvalidAmount)?;
            value * 10u128.pow(exponent - digits.len() as u32)
        }
    };

    whole
        .checked_mul(source.raw_amount())
        .and_then(|raw| raw.checked_add(fraction_raw))
        .ok_or(UnitsError::AboveCap)
}

/// Format a raw amount in `target` units, without trailing zeros
pub fn from_raw(raw: u128, target: NanoDenomination) -> String {
    let exponent = target.exponent() as usize;
    if exponent == 0 {
        return raw.to_string();
    }

    let digits = format!("{:0>width$}", raw, width = exponent + 1);
    let (whole, fraction) = digits.split_at(digits.len() - exponent);
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    }
}

/// Convert an amount from one denomination to another
///
/// # Example
///
/// ```rust
/// use nanolib::units::{convert, NanoDenomination};
///
/// let nano = convert("1.5", NanoDenomination::MegaNano, NanoDenomination::Nano).unwrap();
/// assert_eq!(nano, "1500000");
/// ```
pub fn convert(
    amount: &str,
    source: NanoDenomination,
    target: NanoDenomination,
) -> Result<String, UnitsError> {
    Ok(from_raw(to_raw(amount, source)?, target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use NanoDenomination::*;

    /// Round trip between raw and another denomination
    fn check_pair(raw: &str, target: NanoDenomination, expected: &str) {
        assert_eq!(convert(raw, Raw, target).unwrap(), expected);
        assert_eq!(convert(expected, target, Raw).unwrap(), raw);
    }

    #[test]
    fn test_knano_conversions() {
        check_pair("123456789", KiloNano, "0.000000000000000000123456789");
        check_pair("1", KiloNano, "0.000000000000000000000000001");
    }

    #[test]
    fn test_mnano_conversions() {
        check_pair("123456789", MegaNano, "0.000000000000000000000123456789");
        check_pair("1", MegaNano, "0.000000000000000000000000000001");
    }

    #[test]
    fn test_nano_conversions() {
        check_pair("123456789", Nano, "0.000000000000000123456789");
        check_pair("1", Nano, "0.000000000000000000000001");
    }

    #[test]
    fn test_millinano_meganano_conversions() {
        for (millinano, meganano) in [("10000", "0.00001"), ("123456", "0.000123456")] {
            assert_eq!(convert(millinano, MilliNano, MegaNano).unwrap(), meganano);
            assert_eq!(convert(meganano, MegaNano, MilliNano).unwrap(), millinano);

            let source: NanoDenomination = "millinano".parse().unwrap();
            let target: NanoDenomination = "Mnano".parse().unwrap();
            assert_eq!(convert(millinano, source, target).unwrap(), meganano);
        }
    }

    #[test]
    fn test_max_nano_value() {
        assert_eq!(
            convert("340282366.920938463463374607431768211456", MegaNano, Raw),
            Err(UnitsError::AboveCap)
        );
        assert_eq!(
            convert("340282366920938463463374607431768211456", Raw, MegaNano),
            Err(UnitsError::AboveCap)
        );

        assert_eq!(
            to_raw("340282366.920938463463374607431768211455", MegaNano).unwrap(),
            NANO_RAW_CAP
        );
        assert_eq!(
            from_raw(NANO_RAW_CAP, MegaNano),
            "340282366.920938463463374607431768211455"
        );
        assert_eq!(convert("1000000", GigaNano, Raw), Err(UnitsError::AboveCap));
    }

    #[test]
    fn test_inexact_conversion() {
        assert_eq!(
            convert("340282366.9209384634633746074317682114506", Raw, MegaNano),
            Err(UnitsError::Inexact)
        );
        assert_eq!(to_raw("0.5", Raw), Err(UnitsError::Inexact));
        assert_eq!(to_raw("1.000", Raw).unwrap(), 1);
    }

    #[test]
    fn test_invalid_amounts() {
        for amount in ["", ".", "-1", "+1", "1.5.0", "1e5", "abc", " 1"] {
            assert_eq!(to_raw(amount, Nano), Err(UnitsError::InvalidAmount), "{amount:?}");
        }
        assert_eq!(to_raw(".5", Nano).unwrap(), 5 * 10u128.pow(23));
        assert_eq!(to_raw("2.", Nano).unwrap(), 2 * 10u128.pow(24));
    }

    #[test]
    fn test_denomination_names() {
        for denomination in NanoDenomination::ALL {
            assert_eq!(denomination.as_str().parse::<NanoDenomination>().unwrap(), denomination);
            assert_eq!(denomination.raw_amount(), 10u128.pow(denomination.exponent()));
        }
        // nano and NANO are different units
        assert_eq!(
            "NANO".parse::<NanoDenomination>(),
            Err(UnitsError::InvalidDenomination("NANO".to_string()))
        );
    }

    #[test]
    fn test_from_raw_trims_zeros() {
        assert_eq!(from_raw(0, MegaNano), "0");
        assert_eq!(from_raw(10u128.pow(30), MegaNano), "1");
        assert_eq!(from_raw(25 * 10u128.pow(29), MegaNano), "2.5");
        assert_eq!(from_raw(1000, Raw), "1000");
    }
}
