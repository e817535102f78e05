//! Poseidon parameters for the BN254 scalar field.

use std::sync::OnceLock;

use ark_bn254::Fr;
use ark_crypto_primitives::sponge::poseidon::{find_poseidon_ark_and_mds, PoseidonConfig};
use ark_ff::PrimeField;

/// Number of full rounds (beginning + end)
const FULL_ROUNDS: usize = 8;

/// Number of partial rounds
const PARTIAL_ROUNDS: usize = 57;

/// S-box exponent
const ALPHA: u64 = 5;

const RATE: usize = 2;
const CAPACITY: usize = 1;
const WIDTH: usize = RATE + CAPACITY;

static CONFIG: OnceLock<PoseidonConfig<Fr>> = OnceLock::new();

/// Shared Poseidon configuration: rate 2, capacity 1, x^5 S-box,
/// 8 full and 57 partial rounds.
///
/// Round constants and the MDS matrix come from the reference Grain LFSR
/// generator, with no matrices skipped. Built once per process; native hashing
/// and the in-circuit gadget both read from here.
pub fn poseidon_config() -> &'static PoseidonConfig<Fr> {
    CONFIG.get_or_init(|| {
        let (ark, mds) = find_poseidon_ark_and_mds::<Fr>(
            Fr::MODULUS_BIT_SIZE as u64,
            RATE,
            FULL_ROUNDS as u64,
            PARTIAL_ROUNDS as u64,
            0,
        );

        PoseidonConfig::new(FULL_ROUNDS, PARTIAL_ROUNDS, ALPHA, mds, ark, RATE, CAPACITY)
    })
}
