//! Proof verification.
//!
//! `Ok(false)` means the proof was checked and rejected; `Err` means it could
//! not be checked at all.

use std::time::Instant;

use ark_bn254::{Bn254, Fr};
use ark_groth16::Groth16;
use ark_snark::SNARK;
use utxo_circuits::{inclusion_public_inputs, non_inclusion_public_inputs};

use crate::error::{ProverError, Result};
use crate::observer::ProverEvent;
use crate::proof::Proof;
use crate::setup::ProvingSystem;
use crate::shape::CircuitType;

impl ProvingSystem {
    pub fn verify_inclusion(&self, roots: &[Fr], leaves: &[Fr], proof: &Proof) -> Result<bool> {
        let shape = self.shape();
        ensure_count("inclusion roots", shape.inclusion_number_of_utxos, roots.len())?;
        ensure_count("inclusion leaves", shape.inclusion_number_of_utxos, leaves.len())?;
        // A combined system cannot verify half a proof.
        ensure_count("non-inclusion roots", shape.non_inclusion_number_of_utxos, 0)?;

        self.verify_public_inputs(
            CircuitType::Inclusion,
            &inclusion_public_inputs(roots, leaves),
            proof,
        )
    }

    pub fn verify_non_inclusion(&self, roots: &[Fr], values: &[Fr], proof: &Proof) -> Result<bool> {
        let shape = self.shape();
        ensure_count("inclusion roots", shape.inclusion_number_of_utxos, 0)?;
        ensure_count("non-inclusion roots", shape.non_inclusion_number_of_utxos, roots.len())?;
        ensure_count("non-inclusion values", shape.non_inclusion_number_of_utxos, values.len())?;

        self.verify_public_inputs(
            CircuitType::NonInclusion,
            &non_inclusion_public_inputs(roots, values),
            proof,
        )
    }

    pub fn verify_combined(
        &self,
        inclusion_roots: &[Fr],
        inclusion_leaves: &[Fr],
        non_inclusion_roots: &[Fr],
        non_inclusion_values: &[Fr],
        proof: &Proof,
    ) -> Result<bool> {
        let shape = self.shape();
        ensure_count("inclusion roots", shape.inclusion_number_of_utxos, inclusion_roots.len())?;
        ensure_count("inclusion leaves", shape.inclusion_number_of_utxos, inclusion_leaves.len())?;
        ensure_count(
            "non-inclusion roots",
            shape.non_inclusion_number_of_utxos,
            non_inclusion_roots.len(),
        )?;
        ensure_count(
            "non-inclusion values",
            shape.non_inclusion_number_of_utxos,
            non_inclusion_values.len(),
        )?;

        let mut public_inputs = inclusion_public_inputs(inclusion_roots, inclusion_leaves);
        public_inputs.extend(non_inclusion_public_inputs(
            non_inclusion_roots,
            non_inclusion_values,
        ));
        self.verify_public_inputs(CircuitType::Combined, &public_inputs, proof)
    }

    fn verify_public_inputs(
        &self,
        circuit_type: CircuitType,
        public_inputs: &[Fr],
        proof: &Proof,
    ) -> Result<bool> {
        let start = Instant::now();
        let accepted =
            Groth16::<Bn254>::verify_with_processed_vk(&self.prepared_vk, public_inputs, proof.as_groth16())
                .map_err(|e| ProverError::VerificationFailure(e.to_string()))?;

        self.observer().on_event(&ProverEvent::ProofVerified {
            circuit_type,
            accepted,
            elapsed: start.elapsed(),
        });
        Ok(accepted)
    }
}

fn ensure_count(what: &str, expected: u32, actual: usize) -> Result<()> {
    if expected as usize != actual {
        return Err(ProverError::shape(what, expected as usize, actual));
    }
    Ok(())
}
