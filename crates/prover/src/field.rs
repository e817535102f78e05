//! Text form of field elements.
//!
//! Parsing accepts `0x`/`0X` hex, `0b` binary, `0o` octal or plain decimal,
//! with `_` separators anywhere in the digits. Output is always lowercase
//! `0x` hex without leading zeros.

use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;
use num_traits::Num;

use crate::error::{ProverError, Result};

/// Parse a field literal, rejecting values at or above the modulus.
pub fn parse_field<F: PrimeField>(literal: &str) -> Result<F> {
    let malformed = || ProverError::malformed("field element", literal);

    let trimmed = literal.trim();
    let (radix, digits) = split_radix(trimmed);
    let digits: String = digits.chars().filter(|c| *c != '_').collect();
    if digits.is_empty() || digits.starts_with('+') {
        return Err(malformed());
    }

    let value = BigUint::from_str_radix(&digits, radix).map_err(|_| malformed())?;
    biguint_to_field(&value).ok_or_else(malformed)
}

fn split_radix(literal: &str) -> (u32, &str) {
    let prefixes = [("0x", 16), ("0X", 16), ("0b", 2), ("0B", 2), ("0o", 8), ("0O", 8)];
    prefixes
        .iter()
        .find_map(|(prefix, radix)| literal.strip_prefix(prefix).map(|rest| (*radix, rest)))
        .unwrap_or((10, literal))
}

/// `Some` iff `value` is a canonical element of `F`.
pub(crate) fn biguint_to_field<F: PrimeField>(value: &BigUint) -> Option<F> {
    let modulus = BigUint::from_bytes_le(&F::MODULUS.to_bytes_le());
    if value >= &modulus {
        return None;
    }
    Some(F::from_le_bytes_mod_order(&value.to_bytes_le()))
}

pub(crate) fn field_to_biguint<F: PrimeField>(value: &F) -> BigUint {
    BigUint::from_bytes_le(&value.into_bigint().to_bytes_le())
}

/// Lowercase `0x` hex, e.g. `0x0`, `0x1f`.
pub fn field_to_hex<F: PrimeField>(value: &F) -> String {
    format!("0x{}", field_to_biguint(value).to_str_radix(16))
}

pub(crate) fn parse_fields<F: PrimeField>(literals: &[String]) -> Result<Vec<F>> {
    literals.iter().map(|l| parse_field(l)).collect()
}

pub(crate) fn fields_to_hex<F: PrimeField>(values: &[F]) -> Vec<String> {
    values.iter().map(field_to_hex).collect()
}
