//! Inclusion and non-inclusion in a single proof.
//!
//! The two halves share no variables; their depths and batch sizes are
//! independent. Public inputs are the inclusion inputs followed by the
//! non-inclusion inputs.

use ark_bn254::Fr;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use crate::inclusion::InclusionCircuit;
use crate::non_inclusion::NonInclusionCircuit;

#[derive(Clone, Debug)]
pub struct CombinedCircuit {
    pub inclusion: InclusionCircuit,
    pub non_inclusion: NonInclusionCircuit,
}

impl CombinedCircuit {
    pub fn empty(
        inclusion_tree_depth: usize,
        inclusion_number_of_utxos: usize,
        non_inclusion_tree_depth: usize,
        non_inclusion_number_of_utxos: usize,
    ) -> Self {
        Self {
            inclusion: InclusionCircuit::empty(inclusion_tree_depth, inclusion_number_of_utxos),
            non_inclusion: NonInclusionCircuit::empty(
                non_inclusion_tree_depth,
                non_inclusion_number_of_utxos,
            ),
        }
    }

    pub fn new(inclusion: InclusionCircuit, non_inclusion: NonInclusionCircuit) -> Self {
        Self {
            inclusion,
            non_inclusion,
        }
    }

    pub fn public_inputs(&self) -> Vec<Fr> {
        let mut inputs = self.inclusion.public_inputs();
        inputs.extend(self.non_inclusion.public_inputs());
        inputs
    }
}

impl ConstraintSynthesizer<Fr> for CombinedCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        self.inclusion.generate_constraints(cs.clone())?;
        self.non_inclusion.generate_constraints(cs)
    }
}
