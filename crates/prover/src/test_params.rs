//! Valid parameter sets for any shape, built from real trees.
//!
//! Used by tests, by `circuit-stats --time` and by anyone smoke-testing a
//! freshly generated key.

use ark_bn254::Fr;
use utxo_circuits::{range_leaf_hash, MerkleTree};

use crate::error::Result;
use crate::params::{CombinedParameters, InclusionParameters, NonInclusionParameters};

/// Leaves spaced out so the gaps between consecutive members are wide.
const MEMBER_SPACING: u64 = 1_000;

/// `number_of_utxos` inclusion proofs against a single tree of `tree_depth`.
///
/// When the batch is larger than the tree, leaves are reused.
pub fn inclusion_test_params(tree_depth: u32, number_of_utxos: u32) -> Result<InclusionParameters> {
    let tree_depth = tree_depth as usize;
    let capacity = leaf_capacity(tree_depth);
    let populated = (number_of_utxos as u64).clamp(1, capacity);

    let leaves: Vec<Fr> = (1..=populated)
        .map(|i| Fr::from(i * MEMBER_SPACING + 7))
        .collect();
    let tree = MerkleTree::from_leaves(tree_depth, &leaves)?;

    let mut params = InclusionParameters {
        roots: Vec::new(),
        in_path_indices: Vec::new(),
        in_path_elements: Vec::new(),
        leaves: Vec::new(),
    };
    for utxo in 0..number_of_utxos as u64 {
        let index = utxo % populated;
        let proof = tree.proof(index)?;
        params.roots.push(tree.root());
        params.leaves.push(tree.leaf(index)?);
        params.in_path_indices.push(proof.path_index());
        params.in_path_elements.push(proof.path().to_vec());
    }
    Ok(params)
}

/// `number_of_utxos` non-inclusion proofs against a range tree whose leaves
/// cover the gaps `(k * 1000, (k + 1) * 1000)`. Each value sits in the upper
/// half of its gap.
pub fn non_inclusion_test_params(
    tree_depth: u32,
    number_of_utxos: u32,
) -> Result<NonInclusionParameters> {
    let tree_depth = tree_depth as usize;
    let capacity = leaf_capacity(tree_depth);
    let populated = (number_of_utxos as u64).clamp(1, capacity);

    let range = |k: u64| (k * MEMBER_SPACING, (k + 1) * MEMBER_SPACING);
    let leaves: Vec<Fr> = (0..populated)
        .map(|k| {
            let (lower, higher) = range(k);
            range_leaf_hash(Fr::from(lower), Fr::from(higher))
        })
        .collect();
    let tree = MerkleTree::from_leaves(tree_depth, &leaves)?;

    let mut params = NonInclusionParameters {
        roots: Vec::new(),
        values: Vec::new(),
        leaf_lower_range_values: Vec::new(),
        leaf_higher_range_values: Vec::new(),
        leaf_indices: Vec::new(),
        in_path_indices: Vec::new(),
        in_path_elements: Vec::new(),
    };
    for utxo in 0..number_of_utxos as u64 {
        let index = utxo % populated;
        let (lower, higher) = range(index);
        let proof = tree.proof(index)?;

        params.roots.push(tree.root());
        params.values.push(Fr::from(lower + MEMBER_SPACING / 2 + utxo % (MEMBER_SPACING / 2)));
        params.leaf_lower_range_values.push(Fr::from(lower));
        params.leaf_higher_range_values.push(Fr::from(higher));
        params.leaf_indices.push(proof.path_index());
        params.in_path_indices.push(proof.path_index());
        params.in_path_elements.push(proof.path().to_vec());
    }
    Ok(params)
}

pub fn combined_test_params(
    inclusion_tree_depth: u32,
    inclusion_number_of_utxos: u32,
    non_inclusion_tree_depth: u32,
    non_inclusion_number_of_utxos: u32,
) -> Result<CombinedParameters> {
    Ok(CombinedParameters {
        inclusion: inclusion_test_params(inclusion_tree_depth, inclusion_number_of_utxos)?,
        non_inclusion: non_inclusion_test_params(
            non_inclusion_tree_depth,
            non_inclusion_number_of_utxos,
        )?,
    })
}

fn leaf_capacity(tree_depth: usize) -> u64 {
    1u64.checked_shl(tree_depth as u32).unwrap_or(u64::MAX)
}
