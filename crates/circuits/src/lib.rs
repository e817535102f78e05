//! ZK circuits for batched UTXO Merkle proofs.
//!
//! This crate provides circuits for:
//! - `InclusionCircuit`: Prove N leaves are committed under N roots
//! - `NonInclusionCircuit`: Prove N values fall strictly inside committed
//!   ranges, so none of them is a member of the set
//! - `CombinedCircuit`: Both of the above in one proof
//!
//! plus the Poseidon `Hash2` primitive and a native Merkle tree that build
//! the witnesses.

pub mod combined;
pub mod inclusion;
pub mod merkle;
pub mod non_inclusion;
pub mod poseidon;
pub mod range_check;


pub use combined::CombinedCircuit;
pub use inclusion::{inclusion_public_inputs, InclusionCircuit, InclusionWitness};
pub use merkle::{MerkleError, MerkleProof, MerkleTree, MAX_TREE_DEPTH};
pub use non_inclusion::{
    non_inclusion_public_inputs, range_leaf_hash, NonInclusionCircuit, NonInclusionWitness,
};
pub use poseidon::{hash_two, poseidon_config};

use ark_bn254::Fr;

/// Common type aliases
pub type ConstraintF = Fr;
