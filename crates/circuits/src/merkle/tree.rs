//! Native append-friendly Merkle tree.
//!
//! Only nodes that differ from an empty subtree are stored, keyed by index
//! within their level, so memory grows with the populated leaves times the
//! depth. Everything else is an empty subtree whose hash is precomputed per
//! level. This keeps deep trees (depth 26 and up) cheap, including sparse
//! updates far to the right of the populated prefix.

use std::collections::HashMap;

use ark_bn254::Fr;
use ark_ff::Zero;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::error::MerkleError;
use super::proof::MerkleProof;
use super::MAX_TREE_DEPTH;
use crate::poseidon::hash_two;

#[derive(Clone, Debug)]
pub struct MerkleTree {
    depth: usize,

    /// `levels[0]` are the leaves, `levels[depth]` holds at most the root.
    levels: Vec<HashMap<u64, Fr>>,

    /// `defaults[l]` is the root of an empty subtree of height `l`.
    defaults: Vec<Fr>,

    /// One past the highest leaf index ever set.
    next_index: u64,
}

impl MerkleTree {
    /// Create an empty tree; every leaf is zero.
    pub fn new(depth: usize) -> Result<Self, MerkleError> {
        if depth > MAX_TREE_DEPTH {
            return Err(MerkleError::DepthTooLarge(depth));
        }

        let mut defaults = Vec::with_capacity(depth + 1);
        let mut current = Fr::zero();
        defaults.push(current);
        for _ in 0..depth {
            current = hash_two(current, current);
            defaults.push(current);
        }

        Ok(Self {
            depth,
            levels: vec![HashMap::new(); depth + 1],
            defaults,
            next_index: 0,
        })
    }

    /// Build a tree whose first `leaves.len()` leaves are `leaves`.
    ///
    /// With the `parallel` feature each level is hashed in parallel.
    pub fn from_leaves(depth: usize, leaves: &[Fr]) -> Result<Self, MerkleError> {
        let mut tree = Self::new(depth)?;
        if leaves.len() as u64 > tree.capacity() {
            return Err(MerkleError::TooManyLeaves {
                leaves: leaves.len(),
                depth,
            });
        }

        let mut nodes = leaves.to_vec();
        for level in 0..=depth {
            let parents = if level < depth {
                hash_level(&nodes, tree.defaults[level])
            } else {
                Vec::new()
            };
            tree.levels[level] = nodes
                .into_iter()
                .enumerate()
                .map(|(index, hash)| (index as u64, hash))
                .collect();
            nodes = parents;
        }
        tree.next_index = leaves.len() as u64;

        Ok(tree)
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of leaf slots, `2^depth`.
    pub fn capacity(&self) -> u64 {
        1u64 << self.depth
    }

    /// One past the highest populated leaf index; `append` writes here.
    pub fn len(&self) -> u64 {
        self.next_index
    }

    pub fn is_empty(&self) -> bool {
        self.next_index == 0
    }

    pub fn root(&self) -> Fr {
        self.node(self.depth, 0)
    }

    /// Leaf at `index`, zero for unpopulated slots.
    pub fn leaf(&self, index: u64) -> Result<Fr, MerkleError> {
        self.check_index(index)?;
        Ok(self.node(0, index))
    }

    /// Append a leaf after the last populated one, returning its index.
    pub fn append(&mut self, leaf: Fr) -> Result<u64, MerkleError> {
        let index = self.len();
        self.update(index, leaf)?;
        Ok(index)
    }

    /// Set the leaf at `index` and rehash its path. Returns the new root.
    pub fn update(&mut self, index: u64, leaf: Fr) -> Result<Fr, MerkleError> {
        self.check_index(index)?;

        let mut current_index = index;
        let mut current_hash = leaf;
        self.levels[0].insert(current_index, current_hash);

        for level in 0..self.depth {
            let sibling = self.node(level, current_index ^ 1);
            current_hash = if current_index & 1 == 0 {
                hash_two(current_hash, sibling)
            } else {
                hash_two(sibling, current_hash)
            };
            current_index >>= 1;
            self.levels[level + 1].insert(current_index, current_hash);
        }

        self.next_index = self.next_index.max(index + 1);
        Ok(current_hash)
    }

    /// Merkle proof for the leaf at `index`.
    pub fn proof(&self, index: u64) -> Result<MerkleProof, MerkleError> {
        self.check_index(index)?;

        let mut path = Vec::with_capacity(self.depth);
        let mut indices = Vec::with_capacity(self.depth);
        let mut current_index = index;
        for level in 0..self.depth {
            path.push(self.node(level, current_index ^ 1));
            indices.push(current_index & 1 == 1);
            current_index >>= 1;
        }

        MerkleProof::new(path, indices)
    }

    /// Total number of stored nodes across all levels.
    pub fn stored_nodes(&self) -> usize {
        self.levels.iter().map(HashMap::len).sum()
    }

    fn check_index(&self, index: u64) -> Result<(), MerkleError> {
        if index >= self.capacity() {
            return Err(MerkleError::IndexOutOfRange {
                index,
                depth: self.depth,
            });
        }
        Ok(())
    }

    fn node(&self, level: usize, index: u64) -> Fr {
        self.levels[level]
            .get(&index)
            .copied()
            .unwrap_or(self.defaults[level])
    }
}

/// Hash one level into its parents; a missing right child is `default`.
#[cfg(feature = "parallel")]
fn hash_level(nodes: &[Fr], default: Fr) -> Vec<Fr> {
    nodes
        .par_chunks(2)
        .map(|pair| hash_two(pair[0], pair.get(1).copied().unwrap_or(default)))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn hash_level(nodes: &[Fr], default: Fr) -> Vec<Fr> {
    nodes
        .chunks(2)
        .map(|pair| hash_two(pair[0], pair.get(1).copied().unwrap_or(default)))
        .collect()
}
