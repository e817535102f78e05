//! Native Merkle proofs.

use ark_bn254::Fr;

use super::error::MerkleError;
use super::MAX_TREE_DEPTH;
use crate::poseidon::hash_two;

/// Single native path step: `Hash2(sibling, current)` when `direction` is 1,
/// `Hash2(current, sibling)` when it is 0. Any other direction is rejected.
pub fn merkle_path_step(direction: u8, current: Fr, sibling: Fr) -> Result<Fr, MerkleError> {
    match direction {
        0 => Ok(hash_two(current, sibling)),
        1 => Ok(hash_two(sibling, current)),
        other => Err(MerkleError::InvalidDirection(other)),
    }
}

/// Split a packed path index into `depth` directions, leaf level first.
///
/// Fails if the index has bits set above `depth`.
pub fn unpack_directions(path_index: u32, depth: usize) -> Result<Vec<bool>, MerkleError> {
    if depth > MAX_TREE_DEPTH {
        return Err(MerkleError::DepthTooLarge(depth));
    }
    if depth < MAX_TREE_DEPTH && (path_index as u64) >> depth != 0 {
        return Err(MerkleError::IndexOutOfRange {
            index: path_index as u64,
            depth,
        });
    }
    Ok((0..depth).map(|level| (path_index >> level) & 1 == 1).collect())
}

/// Inverse of [`unpack_directions`].
pub fn pack_directions(directions: &[bool]) -> Result<u32, MerkleError> {
    if directions.len() > MAX_TREE_DEPTH {
        return Err(MerkleError::DepthTooLarge(directions.len()));
    }
    Ok(directions
        .iter()
        .enumerate()
        .fold(0u32, |acc, (level, &is_right)| acc | ((is_right as u32) << level)))
}

/// A Merkle proof: sibling hashes from the leaf level up and the direction
/// taken at each level (`true` = current node is the right child).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleProof {
    path: Vec<Fr>,
    indices: Vec<bool>,
}

impl MerkleProof {
    pub fn new(path: Vec<Fr>, indices: Vec<bool>) -> Result<Self, MerkleError> {
        if path.len() != indices.len() {
            return Err(MerkleError::PathLengthMismatch {
                path: path.len(),
                directions: indices.len(),
            });
        }
        if path.len() > MAX_TREE_DEPTH {
            return Err(MerkleError::DepthTooLarge(path.len()));
        }
        Ok(Self { path, indices })
    }

    /// Build a proof from the packed form used in prover parameters.
    pub fn from_path_index(path_index: u32, path: Vec<Fr>) -> Result<Self, MerkleError> {
        let indices = unpack_directions(path_index, path.len())?;
        Ok(Self { path, indices })
    }

    pub fn path(&self) -> &[Fr] {
        &self.path
    }

    pub fn indices(&self) -> &[bool] {
        &self.indices
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Directions packed into a `u32`, leaf level in bit 0.
    pub fn path_index(&self) -> u32 {
        self.indices
            .iter()
            .enumerate()
            .fold(0u32, |acc, (level, &is_right)| acc | ((is_right as u32) << level))
    }

    /// Fold `leaf` up the path.
    pub fn compute_root(&self, leaf: Fr) -> Fr {
        self.path
            .iter()
            .zip(self.indices.iter())
            .fold(leaf, |current, (sibling, &is_right)| {
                if is_right {
                    hash_two(*sibling, current)
                } else {
                    hash_two(current, *sibling)
                }
            })
    }

    pub fn verify(&self, leaf: Fr, root: Fr) -> bool {
        self.compute_root(leaf) == root
    }
}
