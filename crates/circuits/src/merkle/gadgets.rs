//! In-circuit Merkle path gadgets.
//!
//! Everything here is branchless: the direction at each level is a
//! `Boolean` and the child order is chosen with `select`, so the same
//! constraints are emitted whatever the witness is.

use ark_bn254::Fr;
use ark_r1cs_std::{boolean::Boolean, fields::fp::FpVar, prelude::*};
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

use crate::poseidon::hash_two_var;
use crate::range_check::to_bits_in_range;

/// Circuit variables for one Merkle path.
#[derive(Clone)]
pub struct MerklePathVar {
    /// Packed path index as a field element.
    index: FpVar<Fr>,

    /// Sibling hashes, leaf level first.
    elements: Vec<FpVar<Fr>>,

    /// Low `depth` bits of `index`; `true` = current node is the right child.
    directions: Vec<Boolean<Fr>>,
}

impl MerklePathVar {
    /// Allocate a path as private witnesses.
    ///
    /// The directions are not free witnesses: they are the bit decomposition
    /// of `path_index`, and every bit above `path_elements.len()` is forced
    /// to zero.
    pub fn new_witness(
        cs: ConstraintSystemRef<Fr>,
        path_index: u32,
        path_elements: &[Fr],
    ) -> Result<Self, SynthesisError> {
        let index = FpVar::new_witness(cs.clone(), || Ok(Fr::from(path_index)))?;

        let elements = path_elements
            .iter()
            .map(|h| FpVar::new_witness(cs.clone(), || Ok(*h)))
            .collect::<Result<Vec<_>, _>>()?;

        let directions = to_bits_in_range(&index, elements.len())?;

        Ok(Self {
            index,
            elements,
            directions,
        })
    }

    pub fn index(&self) -> &FpVar<Fr> {
        &self.index
    }

    pub fn elements(&self) -> &[FpVar<Fr>] {
        &self.elements
    }

    pub fn directions(&self) -> &[Boolean<Fr>] {
        &self.directions
    }

    pub fn depth(&self) -> usize {
        self.elements.len()
    }
}

/// One level of the path: `Hash2(left, right)` where
/// `(left, right) = direction ? (sibling, current) : (current, sibling)`.
pub fn merkle_path_step_var(
    cs: ConstraintSystemRef<Fr>,
    direction: &Boolean<Fr>,
    current: &FpVar<Fr>,
    sibling: &FpVar<Fr>,
) -> Result<FpVar<Fr>, SynthesisError> {
    let left = direction.select(sibling, current)?;
    let right = direction.select(current, sibling)?;
    hash_two_var(cs, &left, &right)
}

/// Fold `leaf` through every level of `path`, returning the computed root.
///
/// A zero-depth path returns the leaf itself.
pub fn compute_root_from_path(
    cs: ConstraintSystemRef<Fr>,
    leaf: &FpVar<Fr>,
    path: &MerklePathVar,
) -> Result<FpVar<Fr>, SynthesisError> {
    let mut current = leaf.clone();

    for (sibling, direction) in path.elements.iter().zip(path.directions.iter()) {
        current = merkle_path_step_var(cs.clone(), direction, &current, sibling)?;
    }

    Ok(current)
}
