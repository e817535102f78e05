//! Range and ordering gadgets.
//!
//! In ZK circuits all arithmetic happens in a finite field, so "less than"
//! has no native meaning: `5 - 10` wraps around to a huge positive number.
//! These gadgets give values a bounded integer interpretation before they
//! are compared.

use std::cmp::Ordering;

use ark_ff::PrimeField;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::SynthesisError;

/// Decompose `value` into bits and require it to fit in `num_bits` bits.
///
/// Returns the low `num_bits` bits, least significant first. If the value is
/// `>= 2^num_bits` the constraint system is unsatisfiable.
pub fn to_bits_in_range<F: PrimeField>(
    value: &FpVar<F>,
    num_bits: usize,
) -> Result<Vec<Boolean<F>>, SynthesisError> {
    let mut bits = value.to_bits_le()?;
    if num_bits > bits.len() {
        return Err(SynthesisError::Unsatisfiable);
    }

    for bit in &bits[num_bits..] {
        bit.enforce_equal(&Boolean::FALSE)?;
    }

    bits.truncate(num_bits);
    Ok(bits)
}

/// Enforce that a field element fits in `num_bits` bits.
pub fn enforce_range<F: PrimeField>(value: &FpVar<F>, num_bits: usize) -> Result<(), SynthesisError> {
    to_bits_in_range(value, num_bits).map(|_| ())
}

/// Enforce `lower < value < higher` as integers.
///
/// Delegates to arkworks' comparison gadget, which also constrains all three
/// operands to be at most `(p - 1) / 2`.
pub fn enforce_strictly_between<F: PrimeField>(
    value: &FpVar<F>,
    lower: &FpVar<F>,
    higher: &FpVar<F>,
) -> Result<(), SynthesisError> {
    lower.enforce_cmp(value, Ordering::Less, false)?;
    value.enforce_cmp(higher, Ordering::Less, false)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_relations::r1cs::ConstraintSystem;
    use std::ops::Neg;

    fn witness(cs: &ark_relations::r1cs::ConstraintSystemRef<Fr>, v: Fr) -> FpVar<Fr> {
        FpVar::new_witness(cs.clone(), || Ok(v)).unwrap()
    }

    #[test]
    fn test_range_check_valid() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let value = witness(&cs, Fr::from(u32::MAX as u64));

        let bits = to_bits_in_range(&value, 32).unwrap();

        assert_eq!(bits.len(), 32);
        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn test_range_check_exceeds() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let value = witness(&cs, Fr::from(1u64 << 32));

        enforce_range(&value, 32).unwrap();

        assert!(!cs.is_satisfied().unwrap());
    }

    #[test]
    fn test_range_check_wrapped_value() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        // p - 5
        let value = witness(&cs, Fr::from(5u64).neg());

        enforce_range(&value, 64).unwrap();

        assert!(!cs.is_satisfied().unwrap());
    }

    #[test]
    fn test_zero_bits_requires_zero() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let value = witness(&cs, Fr::from(0u64));
        assert!(to_bits_in_range(&value, 0).unwrap().is_empty());
        assert!(cs.is_satisfied().unwrap());

        let cs = ConstraintSystem::<Fr>::new_ref();
        let value = witness(&cs, Fr::from(1u64));
        enforce_range(&value, 0).unwrap();
        assert!(!cs.is_satisfied().unwrap());
    }

    fn between_satisfied(value: u64, lower: u64, higher: u64) -> bool {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let v = witness(&cs, Fr::from(value));
        let l = witness(&cs, Fr::from(lower));
        let h = witness(&cs, Fr::from(higher));
        enforce_strictly_between(&v, &l, &h).unwrap();
        cs.is_satisfied().unwrap()
    }

    #[test]
    fn test_strictly_between() {
        assert!(between_satisfied(50, 10, 100));
        assert!(between_satisfied(11, 10, 12));
    }

    #[test]
    fn test_strictly_between_boundaries() {
        assert!(!between_satisfied(10, 10, 100));
        assert!(!between_satisfied(100, 10, 100));
        assert!(!between_satisfied(5, 10, 100));
        assert!(!between_satisfied(500, 10, 100));
    }

    #[test]
    fn test_strictly_between_rejects_large_operands() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let v = witness(&cs, Fr::from(50u64));
        let l = witness(&cs, Fr::from(1u64).neg());
        let h = witness(&cs, Fr::from(100u64));
        enforce_strictly_between(&v, &l, &h).unwrap();
        assert!(!cs.is_satisfied().unwrap());
    }
}
