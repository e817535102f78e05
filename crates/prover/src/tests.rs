//! End-to-end flows across setup, JSON, proving and verification.

use std::sync::Arc;
use std::thread;

use ark_bn254::Fr;
use ark_std::rand::{rngs::StdRng, SeedableRng};

use crate::observer::testing::RecordingObserver;
use crate::observer::NoopObserver;
use crate::test_params::{combined_test_params, inclusion_test_params, non_inclusion_test_params};
use crate::{
    setup_combined_with, setup_inclusion_with, setup_non_inclusion_with, CircuitShape,
    CombinedParameters, InclusionParameters, NonInclusionParameters, Proof, ProverError,
    ProverEvent,
};

#[test]
fn test_inclusion_through_json() {
    let mut rng = StdRng::seed_from_u64(42);
    let system = setup_inclusion_with(2, 1, &mut rng, Arc::new(NoopObserver)).unwrap();

    // Parameters arrive as JSON, the proof leaves as JSON.
    let json = inclusion_test_params(2, 1).unwrap().to_json().unwrap();
    let params = InclusionParameters::from_json(&json).unwrap();
    let proof_json = system.prove_inclusion(&params).unwrap().to_json().unwrap();

    let proof = Proof::from_json(&proof_json).unwrap();
    assert!(system
        .verify_inclusion(&params.roots, &params.leaves, &proof)
        .unwrap());

    // The raw wire form carries the same proof.
    let raw = proof.to_raw_bytes();
    assert_eq!(Proof::from_raw_bytes(&raw).unwrap(), proof);
}

#[test]
fn test_depth_two_root_plus_one() {
    let mut rng = StdRng::seed_from_u64(1);
    let system = setup_inclusion_with(2, 1, &mut rng, Arc::new(NoopObserver)).unwrap();
    let params = inclusion_test_params(2, 1).unwrap();
    let proof = system.prove_inclusion(&params).unwrap();

    let shifted = vec![params.roots[0] + Fr::from(1u64)];
    assert!(!system
        .verify_inclusion(&shifted, &params.leaves, &proof)
        .unwrap());

    let mut bad_params = params;
    bad_params.roots = shifted;
    assert!(matches!(
        system.prove_inclusion(&bad_params),
        Err(ProverError::ProvingFailure(_))
    ));
}

#[test]
fn test_non_inclusion_through_json() {
    let mut rng = StdRng::seed_from_u64(2);
    let system = setup_non_inclusion_with(3, 2, &mut rng, Arc::new(NoopObserver)).unwrap();

    let json = non_inclusion_test_params(3, 2).unwrap().to_json().unwrap();
    let params = NonInclusionParameters::from_json(&json).unwrap();
    let proof = system.prove_non_inclusion(&params).unwrap();

    assert!(system
        .verify_non_inclusion(&params.roots, &params.values, &proof)
        .unwrap());
}

#[test]
fn test_combined_through_json() {
    let mut rng = StdRng::seed_from_u64(3);
    let shape = CircuitShape::combined(2, 2, 2, 1);
    let system = setup_combined_with(shape, &mut rng, Arc::new(NoopObserver)).unwrap();

    let json = combined_test_params(2, 2, 2, 1).unwrap().to_json().unwrap();
    let params = CombinedParameters::from_json(&json).unwrap();
    let proof = system.prove_combined(&params).unwrap();

    assert!(system
        .verify_combined(
            &params.inclusion.roots,
            &params.inclusion.leaves,
            &params.non_inclusion.roots,
            &params.non_inclusion.values,
            &proof,
        )
        .unwrap());

    // Halves cannot be verified on their own against a combined system.
    assert!(matches!(
        system.verify_inclusion(&params.inclusion.roots, &params.inclusion.leaves, &proof),
        Err(ProverError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_concurrent_prove_and_verify() {
    let mut rng = StdRng::seed_from_u64(4);
    let system = setup_inclusion_with(3, 1, &mut rng, Arc::new(NoopObserver)).unwrap();
    let params = inclusion_test_params(3, 1).unwrap();

    thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    let proof = system.prove_inclusion(&params).unwrap();
                    system
                        .verify_inclusion(&params.roots, &params.leaves, &proof)
                        .unwrap()
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
    });
}

#[test]
fn test_observer_sees_prove_and_verify() {
    let observer = Arc::new(RecordingObserver::default());
    let mut rng = StdRng::seed_from_u64(5);
    let system = setup_inclusion_with(1, 1, &mut rng, observer.clone()).unwrap();
    let params = inclusion_test_params(1, 1).unwrap();

    let proof = system.prove_inclusion(&params).unwrap();
    system
        .verify_inclusion(&params.roots, &params.leaves, &proof)
        .unwrap();

    let events = observer.events();
    assert!(events
        .iter()
        .any(|e| matches!(e, ProverEvent::ProofGenerated { .. })));
    assert!(events
        .iter()
        .any(|e| matches!(e, ProverEvent::ProofVerified { accepted: true, .. })));
}
