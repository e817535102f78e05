//! Batched Merkle inclusion circuit.
//!
//! Proves that each of `number_of_utxos` leaves is committed under its own
//! root, every tree having the same depth.
//!
//! Public inputs: all roots, then all leaves.
//! Private inputs: per UTXO, the packed path index and the sibling hashes.

use ark_bn254::Fr;
use ark_ff::Zero;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use crate::merkle::{compute_root_from_path, MerklePathVar};

/// Witness for one UTXO.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InclusionWitness {
    pub root: Fr,
    pub leaf: Fr,
    pub path_index: u32,
    pub path_elements: Vec<Fr>,
}

impl InclusionWitness {
    fn empty(tree_depth: usize) -> Self {
        Self {
            root: Fr::zero(),
            leaf: Fr::zero(),
            path_index: 0,
            path_elements: vec![Fr::zero(); tree_depth],
        }
    }
}

#[derive(Clone, Debug)]
pub struct InclusionCircuit {
    pub tree_depth: usize,
    pub witnesses: Vec<InclusionWitness>,
}

impl InclusionCircuit {
    /// Circuit of the given shape filled with zeros, for key generation and
    /// constraint counting.
    pub fn empty(tree_depth: usize, number_of_utxos: usize) -> Self {
        Self {
            tree_depth,
            witnesses: vec![InclusionWitness::empty(tree_depth); number_of_utxos],
        }
    }

    pub fn new(tree_depth: usize, witnesses: Vec<InclusionWitness>) -> Self {
        Self {
            tree_depth,
            witnesses,
        }
    }

    pub fn number_of_utxos(&self) -> usize {
        self.witnesses.len()
    }

    /// Public inputs in allocation order.
    pub fn public_inputs(&self) -> Vec<Fr> {
        let roots: Vec<Fr> = self.witnesses.iter().map(|w| w.root).collect();
        let leaves: Vec<Fr> = self.witnesses.iter().map(|w| w.leaf).collect();
        inclusion_public_inputs(&roots, &leaves)
    }
}

/// Public input vector for an inclusion proof: roots followed by leaves.
pub fn inclusion_public_inputs(roots: &[Fr], leaves: &[Fr]) -> Vec<Fr> {
    roots.iter().chain(leaves.iter()).copied().collect()
}

impl ConstraintSynthesizer<Fr> for InclusionCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        if self
            .witnesses
            .iter()
            .any(|w| w.path_elements.len() != self.tree_depth)
        {
            return Err(SynthesisError::Unsatisfiable);
        }

        // === Public inputs ===
        let roots = self
            .witnesses
            .iter()
            .map(|w| FpVar::new_input(cs.clone(), || Ok(w.root)))
            .collect::<Result<Vec<_>, _>>()?;
        let leaves = self
            .witnesses
            .iter()
            .map(|w| FpVar::new_input(cs.clone(), || Ok(w.leaf)))
            .collect::<Result<Vec<_>, _>>()?;

        // === One independent membership check per UTXO ===
        for ((witness, root), leaf) in self.witnesses.iter().zip(&roots).zip(&leaves) {
            let path = MerklePathVar::new_witness(cs.clone(), witness.path_index, &witness.path_elements)?;
            let computed_root = compute_root_from_path(cs.clone(), leaf, &path)?;
            computed_root.enforce_equal(root)?;
        }

        Ok(())
    }
}
