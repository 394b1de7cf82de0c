//! NANO Base32 conversions
//!
//! Bytes are packed into 5-bit symbols drawn from [`ALPHABET`], which leaves out
//! the visually ambiguous `0`, `2`, `l` and `v`.
//!
//! ## Padding
//!
//! Encoding left-pads the bitstream with `5 - (bits % 5)` zero bits, so there is
//! always at least one padding bit and a whole zero symbol when the byte count is a
//! multiple of five. In that case the leading zero symbol is dropped again, so the
//! output length is always `ceil(bytes * 8 / 5)`. Account IDs depend on this exact
//! length: the 5-byte checksum encodes to 8 symbols, not 9.
//!
//! Decoding skips the `(symbols * 5) % 8` leading bits that do not fill a byte.
//! Those bits are expected to be zero but are not checked.

use crate::bitbuf::BitBuffer;
use crate::error::{Error, Result};
use crate::params::{ALPHABET, MAX_LENGTH, SYMBOL_BITS};

/// Marks bytes outside the alphabet in [`DECODE_TABLE`]
const INVALID: u8 = 0xFF;

/// Symbol byte -> 5-bit value, [`INVALID`] for bytes outside the alphabet
static DECODE_TABLE: [u8; 256] = build_decode_table();

const fn build_decode_table() -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut value = 0;
    while value < ALPHABET.len() {
        table[ALPHABET[value] as usize] = value as u8;
        value += 1;
    }
    table
}

/// Whether `symbol` belongs to the NANO Base32 alphabet
#[inline(always)]
pub fn is_valid_symbol(symbol: u8) -> bool {
    DECODE_TABLE[symbol as usize] != INVALID
}

/// Number of symbols produced by encoding `bytes` bytes
#[inline]
pub const fn encoded_len(bytes: u64) -> u64 {
    (bytes * 8).div_ceil(SYMBOL_BITS)
}

/// Number of bytes produced by decoding `symbols` symbols
#[inline]
pub const fn decoded_len(symbols: u64) -> u64 {
    symbols * SYMBOL_BITS / 8
}

/// Reject empty inputs and lengths over the (2^32)-1 ceiling
pub(crate) fn check_length(len: u64) -> Result<u64> {
    match len {
        0 => Err(Error::EmptyInput),
        len if len > MAX_LENGTH => Err(Error::LengthOverflow { len }),
        len => Ok(len),
    }
}

/// Decode NANO Base32 symbols into bytes
///
/// Fails on the first byte outside the alphabet without producing any output.
///
/// # Example
///
/// ```rust
/// use nanolib_core::nbase32;
///
/// let bytes = nbase32::decode("b6af1a5b").unwrap();
/// assert_eq!(bytes, [0x49, 0x10, 0xd0, 0x20, 0x69]);
/// ```
pub fn decode(symbols: impl AsRef<[u8]>) -> Result<Vec<u8>> {
    let symbols = symbols.as_ref();
    let count = check_length(symbols.len() as u64)?;

    let total_bits = count * SYMBOL_BITS;
    let mut buffer = BitBuffer::new(total_bits)?;

    for (position, &symbol) in symbols.iter().enumerate() {
        let value = DECODE_TABLE[symbol as usize];
        if value == INVALID {
            return Err(Error::InvalidSymbol { symbol, position });
        }
        buffer.write_bits(position as u64 * SYMBOL_BITS, u32::from(value), SYMBOL_BITS as u32);
    }

    let leftover = total_bits % 8;
    let mut bytes = Vec::with_capacity(decoded_len(count) as usize);
    for offset in (leftover..total_bits).step_by(8) {
        bytes.push(buffer.read_bits(offset, 8) as u8);
    }

    Ok(bytes)
}

/// Encode bytes as NANO Base32 symbols
///
/// # Example
///
/// ```rust
/// use nanolib_core::nbase32;
///
/// let symbols = nbase32::encode(&[0x49, 0x10, 0xd0, 0x20, 0x69]).unwrap();
/// assert_eq!(symbols, "b6af1a5b");
/// ```
pub fn encode(bytes: &[u8]) -> Result<String> {
    let byte_count = check_length(bytes.len() as u64)?;
    let symbol_count = encoded_len(byte_count);
    if symbol_count > MAX_LENGTH {
        return Err(Error::LengthOverflow { len: symbol_count });
    }

    let data_bits = byte_count * 8;
    let leftover = SYMBOL_BITS - data_bits % SYMBOL_BITS;
    let total_bits = data_bits + leftover;
    let mut buffer = BitBuffer::new(total_bits)?;

    for (index, &byte) in bytes.iter().enumerate() {
        buffer.write_bits(leftover + index as u64 * 8, u32::from(byte), 8);
    }

    // A whole padding symbol was emitted exactly when the length is a multiple of 8
    let skip = u64::from(symbol_count % 8 == 0);

    let mut symbols = String::with_capacity(symbol_count as usize);
    for index in skip..skip + symbol_count {
        let value = buffer.read_bits(index * SYMBOL_BITS, SYMBOL_BITS as u32);
        symbols.push(char::from(ALPHABET[value as usize]));
    }

    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_table_is_bijective() {
        for (value, &symbol) in ALPHABET.iter().enumerate() {
            assert_eq!(DECODE_TABLE[symbol as usize] as usize, value);
        }
        let valid = (0..=255u8).filter(|&b| is_valid_symbol(b)).count();
        assert_eq!(valid, 32);
    }

    #[test]
    fn test_ambiguous_glyphs_rejected() {
        for symbol in [b'0', b'2', b'l', b'v', b'A', b'_', b' '] {
            assert!(!is_valid_symbol(symbol), "{} accepted", symbol as char);
        }
    }

    #[test]
    fn test_length_helpers() {
        assert_eq!(encoded_len(1), 2);
        assert_eq!(encoded_len(5), 8);
        assert_eq!(encoded_len(32), 52);
        assert_eq!(decoded_len(2), 1);
        assert_eq!(decoded_len(60), 37);
    }

    #[test]
    fn test_check_length_limits() {
        assert_eq!(check_length(0), Err(Error::EmptyInput));
        assert_eq!(check_length(MAX_LENGTH), Ok(MAX_LENGTH));
        assert_eq!(
            check_length(MAX_LENGTH + 1),
            Err(Error::LengthOverflow {
                len: MAX_LENGTH + 1
            })
        );
    }

    #[test]
    fn test_padding_symbol_dropped() {
        // 5 bytes = 40 bits, a full zero symbol is prepended then removed
        assert_eq!(encode(&[0u8; 5]).unwrap(), "11111111");
        assert_eq!(encode(&[0xFF; 5]).unwrap(), "zzzzzzzz");
    }

    #[test]
    fn test_nonzero_padding_bits_ignored() {
        // "9z" carries 2 zero padding bits, "hz" and "zz" set them
        assert_eq!(decode("9z").unwrap(), [0xFF]);
        assert_eq!(decode("hz").unwrap(), [0xFF]);
        assert_eq!(decode("zz").unwrap(), [0xFF]);
        assert_eq!(encode(&decode("hz").unwrap()).unwrap(), "9z");
    }
}
