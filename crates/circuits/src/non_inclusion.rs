//! Batched Merkle non-inclusion circuit.
//!
//! The tree stores range leaves `Hash2(lower, higher)`, one per gap between
//! consecutive members of an ordered set. A value is absent from the set iff
//! it falls strictly inside one of those gaps, so for each UTXO the circuit
//! proves:
//!
//! 1. `lower < value < higher` (as integers, operands at most `(p - 1) / 2`)
//! 2. the range leaf `Hash2(lower, higher)` sits at `leaf_index`
//! 3. the leaf hashes up to the public root
//!
//! Public inputs: all roots, then all values.

use ark_bn254::Fr;
use ark_ff::Zero;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use crate::merkle::{compute_root_from_path, MerklePathVar};
use crate::poseidon::{hash_two, hash_two_var};
use crate::range_check::enforce_strictly_between;

/// Native leaf for the range `(lower, higher)`.
pub fn range_leaf_hash(lower: Fr, higher: Fr) -> Fr {
    hash_two(lower, higher)
}

/// Witness for one UTXO.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NonInclusionWitness {
    pub root: Fr,
    pub value: Fr,
    pub lower_range_value: Fr,
    pub higher_range_value: Fr,
    pub leaf_index: u32,
    pub path_index: u32,
    pub path_elements: Vec<Fr>,
}

impl NonInclusionWitness {
    /// Zero witness. Note `0 < 0 < 0` does not hold, so an empty circuit is
    /// only good for key generation, never for proving.
    fn empty(tree_depth: usize) -> Self {
        Self {
            root: Fr::zero(),
            value: Fr::zero(),
            lower_range_value: Fr::zero(),
            higher_range_value: Fr::zero(),
            leaf_index: 0,
            path_index: 0,
            path_elements: vec![Fr::zero(); tree_depth],
        }
    }
}

#[derive(Clone, Debug)]
pub struct NonInclusionCircuit {
    pub tree_depth: usize,
    pub witnesses: Vec<NonInclusionWitness>,
}

impl NonInclusionCircuit {
    pub fn empty(tree_depth: usize, number_of_utxos: usize) -> Self {
        Self {
            tree_depth,
            witnesses: vec![NonInclusionWitness::empty(tree_depth); number_of_utxos],
        }
    }

    pub fn new(tree_depth: usize, witnesses: Vec<NonInclusionWitness>) -> Self {
        Self {
            tree_depth,
            witnesses,
        }
    }

    pub fn number_of_utxos(&self) -> usize {
        self.witnesses.len()
    }

    pub fn public_inputs(&self) -> Vec<Fr> {
        let roots: Vec<Fr> = self.witnesses.iter().map(|w| w.root).collect();
        let values: Vec<Fr> = self.witnesses.iter().map(|w| w.value).collect();
        non_inclusion_public_inputs(&roots, &values)
    }
}

/// Public input vector for a non-inclusion proof: roots followed by values.
pub fn non_inclusion_public_inputs(roots: &[Fr], values: &[Fr]) -> Vec<Fr> {
    roots.iter().chain(values.iter()).copied().collect()
}

impl ConstraintSynthesizer<Fr> for NonInclusionCircuit {
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
        let values = self
            .witnesses
            .iter()
            .map(|w| FpVar::new_input(cs.clone(), || Ok(w.value)))
            .collect::<Result<Vec<_>, _>>()?;

        for ((witness, root), value) in self.witnesses.iter().zip(&roots).zip(&values) {
            // === Private inputs ===
            let lower = FpVar::new_witness(cs.clone(), || Ok(witness.lower_range_value))?;
            let higher = FpVar::new_witness(cs.clone(), || Ok(witness.higher_range_value))?;
            let leaf_index = FpVar::new_witness(cs.clone(), || Ok(Fr::from(witness.leaf_index)))?;
            let path = MerklePathVar::new_witness(cs.clone(), witness.path_index, &witness.path_elements)?;

            // === Constraint 1: value lies strictly inside the range ===
            enforce_strictly_between(value, &lower, &higher)?;

            // === Constraint 2: the range leaf is at the claimed position ===
            let leaf = hash_two_var(cs.clone(), &lower, &higher)?;
            leaf_index.enforce_equal(path.index())?;

            // === Constraint 3: the leaf is committed under the root ===
            let computed_root = compute_root_from_path(cs.clone(), &leaf, &path)?;
            computed_root.enforce_equal(root)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merkle::MerkleTree;
    use ark_relations::r1cs::ConstraintSystem;

    /// Range tree over the gaps of the ordered set {10, 20, 30}.
    fn range_tree() -> (MerkleTree, Vec<(u64, u64)>) {
        let ranges = vec![(0, 10), (10, 20), (20, 30)];
        let leaves: Vec<Fr> = ranges
            .iter()
            .map(|&(lo, hi)| range_leaf_hash(Fr::from(lo), Fr::from(hi)))
            .collect();
        (MerkleTree::from_leaves(2, &leaves).unwrap(), ranges)
    }

    fn witness(tree: &MerkleTree, ranges: &[(u64, u64)], index: usize, value: u64) -> NonInclusionWitness {
        let proof = tree.proof(index as u64).unwrap();
        NonInclusionWitness {
            root: tree.root(),
            value: Fr::from(value),
            lower_range_value: Fr::from(ranges[index].0),
            higher_range_value: Fr::from(ranges[index].1),
            leaf_index: index as u32,
            path_index: proof.path_index(),
            path_elements: proof.path().to_vec(),
        }
    }

    fn is_satisfied(circuit: NonInclusionCircuit) -> bool {
        let cs = ConstraintSystem::<Fr>::new_ref();
        circuit.generate_constraints(cs.clone()).unwrap();
        cs.is_satisfied().unwrap()
    }

    #[test]
    fn test_value_inside_range() {
        let (tree, ranges) = range_tree();
        let circuit = NonInclusionCircuit::new(2, vec![witness(&tree, &ranges, 1, 15)]);
        assert!(is_satisfied(circuit));
    }

    #[test]
    fn test_value_on_range_endpoint_fails() {
        let (tree, ranges) = range_tree();
        for value in [10, 20] {
            let circuit = NonInclusionCircuit::new(2, vec![witness(&tree, &ranges, 1, value)]);
            assert!(!is_satisfied(circuit), "value {value} is a member");
        }
    }

    #[test]
    fn test_value_outside_range_fails() {
        let (tree, ranges) = range_tree();
        let circuit = NonInclusionCircuit::new(2, vec![witness(&tree, &ranges, 0, 25)]);
        assert!(!is_satisfied(circuit));
    }

    #[test]
    fn test_leaf_index_must_match_path() {
        let (tree, ranges) = range_tree();
        let mut w = witness(&tree, &ranges, 2, 25);
        w.leaf_index = 1;
        assert!(!is_satisfied(NonInclusionCircuit::new(2, vec![w])));
    }

    #[test]
    fn test_forged_range_fails() {
        let (tree, ranges) = range_tree();
        // Widen the gap so a member falls inside it.
        let mut w = witness(&tree, &ranges, 1, 20);
        w.higher_range_value = Fr::from(30u64);
        assert!(!is_satisfied(NonInclusionCircuit::new(2, vec![w])));
    }

    #[test]
    fn test_batch() {
        let (tree, ranges) = range_tree();
        let circuit = NonInclusionCircuit::new(
            2,
            vec![
                witness(&tree, &ranges, 0, 3),
                witness(&tree, &ranges, 2, 29),
            ],
        );
        assert_eq!(
            circuit.public_inputs(),
            vec![tree.root(), tree.root(), Fr::from(3u64), Fr::from(29u64)]
        );
        assert!(is_satisfied(circuit));
    }

    #[test]
    fn test_empty_circuit_synthesizes() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        NonInclusionCircuit::empty(3, 2)
            .generate_constraints(cs.clone())
            .unwrap();

        // Constant one plus two roots and two values.
        assert_eq!(cs.num_instance_variables(), 5);
        assert!(!cs.is_satisfied().unwrap());
    }
}
