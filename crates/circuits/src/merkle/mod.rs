//! Merkle path verification for batched UTXO proofs.
//!
//! The in-circuit side is the single-level conditional hash step and the
//! fold from a leaf to a root. The native side mirrors it with proofs and an
//! append-friendly tree used to build witnesses.

mod error;
mod gadgets;
mod proof;
mod tree;


pub use error::MerkleError;
pub use gadgets::{compute_root_from_path, merkle_path_step_var, MerklePathVar};
pub use proof::{merkle_path_step, pack_directions, unpack_directions, MerkleProof};
pub use tree::MerkleTree;

/// Path indices are `u32`, so no tree may be deeper than this.
pub const MAX_TREE_DEPTH: usize = 32;
