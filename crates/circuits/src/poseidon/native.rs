//! Native Poseidon compression (outside circuits).

use ark_bn254::Fr;
use ark_crypto_primitives::sponge::poseidon::PoseidonSponge;
use ark_crypto_primitives::sponge::CryptographicSponge;

use super::config::poseidon_config;

/// `Hash2(left, right)`: absorb both inputs in order, squeeze one element.
pub fn hash_two(left: Fr, right: Fr) -> Fr {
    let mut sponge = PoseidonSponge::new(poseidon_config());
    sponge.absorb(&left);
    sponge.absorb(&right);
    sponge.squeeze_field_elements(1)[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::MontFp;

    #[test]
    fn test_known_answers() {
        let expected: Fr =
            MontFp!("7142104613055408817911962100316808866448378443474503659992478482890339429929");
        assert_eq!(hash_two(Fr::from(1u64), Fr::from(2u64)), expected);

        let expected: Fr =
            MontFp!("8885954456466675435427211897928272918585230207077541337262544326002472295813");
        assert_eq!(hash_two(Fr::from(0u64), Fr::from(0u64)), expected);
    }

    #[test]
    fn test_hash_deterministic() {
        let a = Fr::from(42u64);
        let b = Fr::from(123u64);
        assert_eq!(hash_two(a, b), hash_two(a, b));
    }

    #[test]
    fn test_hash_is_ordered() {
        let a = Fr::from(1u64);
        let b = Fr::from(2u64);
        assert_ne!(hash_two(a, b), hash_two(b, a));
    }

    #[test]
    fn test_hash_different_inputs() {
        let h1 = hash_two(Fr::from(1u64), Fr::from(2u64));
        let h2 = hash_two(Fr::from(1u64), Fr::from(3u64));
        assert_ne!(h1, h2);
    }
}
