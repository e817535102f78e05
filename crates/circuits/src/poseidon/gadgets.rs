//! Poseidon R1CS gadget for in-circuit hashing.

use ark_bn254::Fr;
use ark_crypto_primitives::sponge::constraints::CryptographicSpongeVar;
use ark_crypto_primitives::sponge::poseidon::constraints::PoseidonSpongeVar;
use ark_r1cs_std::fields::fp::FpVar;
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

use super::config::poseidon_config;

/// In-circuit `Hash2(left, right)`, matching [`super::hash_two`].
pub fn hash_two_var(
    cs: ConstraintSystemRef<Fr>,
    left: &FpVar<Fr>,
    right: &FpVar<Fr>,
) -> Result<FpVar<Fr>, SynthesisError> {
    let mut sponge = PoseidonSpongeVar::new(cs, poseidon_config());
    sponge.absorb(left)?;
    sponge.absorb(right)?;
    let mut squeezed = sponge.squeeze_field_elements(1)?;
    squeezed.pop().ok_or(SynthesisError::Unsatisfiable)
}
