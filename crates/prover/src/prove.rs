//! Proof generation.

use std::time::Instant;

use ark_bn254::{Bn254, Fr};
use ark_groth16::Groth16;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystem};
use ark_snark::SNARK;
use ark_std::rand::{rngs::StdRng, SeedableRng};

use crate::error::{ProverError, Result};
use crate::observer::ProverEvent;
use crate::params::{CombinedParameters, InclusionParameters, NonInclusionParameters};
use crate::proof::Proof;
use crate::setup::ProvingSystem;
use crate::shape::{CircuitType, ShapedCircuit};

impl ProvingSystem {
    pub fn prove_inclusion(&self, params: &InclusionParameters) -> Result<Proof> {
        self.shape().ensure_matches(&params.shape()?)?;
        self.prove_circuit(
            CircuitType::Inclusion,
            ShapedCircuit::Inclusion(params.to_circuit()),
        )
    }

    pub fn prove_non_inclusion(&self, params: &NonInclusionParameters) -> Result<Proof> {
        self.shape().ensure_matches(&params.shape()?)?;
        self.prove_circuit(
            CircuitType::NonInclusion,
            ShapedCircuit::NonInclusion(params.to_circuit()),
        )
    }

    pub fn prove_combined(&self, params: &CombinedParameters) -> Result<Proof> {
        self.shape().ensure_matches(&params.shape()?)?;
        self.prove_circuit(
            CircuitType::Combined,
            ShapedCircuit::Combined(params.to_circuit()),
        )
    }

    /// Check the witness, then run the Groth16 prover with a fresh RNG.
    fn prove_circuit(&self, circuit_type: CircuitType, circuit: ShapedCircuit) -> Result<Proof> {
        let start = Instant::now();

        let result = check_witness(circuit.clone()).and_then(|()| {
            let mut rng = StdRng::from_entropy();
            Groth16::<Bn254>::prove(&self.proving_key, circuit, &mut rng)
                .map_err(|e| ProverError::ProvingFailure(e.to_string()))
        });

        match result {
            Ok(proof) => {
                self.observer().on_event(&ProverEvent::ProofGenerated {
                    circuit_type,
                    elapsed: start.elapsed(),
                });
                Ok(Proof::new(proof))
            }
            Err(err) => {
                self.observer().on_event(&ProverEvent::ProvingFailed {
                    circuit_type,
                    reason: err.to_string(),
                });
                Err(err)
            }
        }
    }
}

/// Groth16 will happily produce a proof for an unsatisfied witness, so the
/// constraint system is checked first.
fn check_witness(circuit: ShapedCircuit) -> Result<()> {
    let cs = ConstraintSystem::<Fr>::new_ref();
    circuit
        .generate_constraints(cs.clone())
        .map_err(|e| ProverError::ProvingFailure(e.to_string()))?;

    let satisfied = cs
        .is_satisfied()
        .map_err(|e| ProverError::ProvingFailure(e.to_string()))?;
    if !satisfied {
        let location = cs
            .which_is_unsatisfied()
            .ok()
            .flatten()
            .unwrap_or_else(|| "unknown constraint".to_string());
        return Err(ProverError::ProvingFailure(format!(
            "witness does not satisfy the circuit ({location})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::observer::testing::RecordingObserver;
    use crate::observer::NoopObserver;
    use crate::setup::{setup_inclusion_with, setup_non_inclusion_with};
    use crate::test_params::{inclusion_test_params, non_inclusion_test_params};

    #[test]
    fn test_prove_inclusion_depth_two() {
        let mut rng = StdRng::seed_from_u64(42);
        let system = setup_inclusion_with(2, 1, &mut rng, Arc::new(NoopObserver)).unwrap();
        let params = inclusion_test_params(2, 1).unwrap();

        assert!(system.prove_inclusion(&params).is_ok());

        let mut wrong_root = params;
        wrong_root.roots[0] += Fr::from(1u64);
        assert!(matches!(
            system.prove_inclusion(&wrong_root),
            Err(ProverError::ProvingFailure(_))
        ));
    }

    #[test]
    fn test_shape_checked_before_proving() {
        let observer = Arc::new(RecordingObserver::default());
        let mut rng = StdRng::seed_from_u64(42);
        let system = setup_inclusion_with(2, 2, &mut rng, observer.clone()).unwrap();

        let one_utxo = inclusion_test_params(2, 1).unwrap();
        assert!(matches!(
            system.prove_inclusion(&one_utxo),
            Err(ProverError::ShapeMismatch { expected: 2, actual: 1, .. })
        ));

        let deeper = inclusion_test_params(3, 2).unwrap();
        assert!(matches!(
            system.prove_inclusion(&deeper),
            Err(ProverError::ShapeMismatch { expected: 2, actual: 3, .. })
        ));

        // Shape errors never reach the prover.
        assert!(!observer
            .events()
            .iter()
            .any(|e| matches!(e, ProverEvent::ProvingFailed { .. })));
    }

    #[test]
    fn test_wrong_circuit_type_is_shape_mismatch() {
        let mut rng = StdRng::seed_from_u64(42);
        let system = setup_non_inclusion_with(2, 1, &mut rng, Arc::new(NoopObserver)).unwrap();
        let params = inclusion_test_params(2, 1).unwrap();

        assert!(matches!(
            system.prove_inclusion(&params),
            Err(ProverError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_non_inclusion_endpoint_fails_to_prove() {
        let mut rng = StdRng::seed_from_u64(42);
        let system = setup_non_inclusion_with(2, 1, &mut rng, Arc::new(NoopObserver)).unwrap();

        let params = non_inclusion_test_params(2, 1).unwrap();
        assert!(system.prove_non_inclusion(&params).is_ok());

        let mut on_lower = params.clone();
        on_lower.values[0] = on_lower.leaf_lower_range_values[0];
        assert!(matches!(
            system.prove_non_inclusion(&on_lower),
            Err(ProverError::ProvingFailure(_))
        ));

        let mut on_higher = params;
        on_higher.values[0] = on_higher.leaf_higher_range_values[0];
        assert!(matches!(
            system.prove_non_inclusion(&on_higher),
            Err(ProverError::ProvingFailure(_))
        ));
    }
}
