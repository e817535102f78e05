//! Groth16 proving system for batched UTXO Merkle proofs.
//!
//! This crate provides utilities for:
//! - Trusted setup per circuit shape, or import of existing keys
//! - Proof generation from JSON-compatible parameters
//! - Verification against roots, leaves and values
//! - Binary persistence of a whole proving system
//!
//! ```no_run
//! use utxo_prover::{setup_inclusion, test_params::inclusion_test_params};
//!
//! let system = setup_inclusion(26, 1)?;
//! let params = inclusion_test_params(26, 1)?;
//! let proof = system.prove_inclusion(&params)?;
//! assert!(system.verify_inclusion(&params.roots, &params.leaves, &proof)?);
//! # Ok::<(), utxo_prover::ProverError>(())
//! ```

pub mod artifact;
pub mod config;
pub mod error;
pub mod field;
pub mod observer;
pub mod params;
pub mod proof;
pub mod prove;
pub mod setup;
pub mod shape;
pub mod test_params;
pub mod verify;

#[cfg(test)]
mod tests;

pub use artifact::export_verifying_key;
pub use config::ProverConfig;
pub use error::{ProverError, Result};
pub use field::{field_to_hex, parse_field};
pub use observer::{NoopObserver, ProverEvent, ProverObserver, TracingObserver};
pub use params::{CombinedParameters, InclusionParameters, NonInclusionParameters};
pub use proof::{Proof, ProofJson};
pub use setup::{
    import_combined, import_inclusion, import_non_inclusion, setup_combined, setup_combined_with,
    setup_inclusion, setup_inclusion_with, setup_non_inclusion, setup_non_inclusion_with,
    ProvingSystem,
};
pub use shape::{compile, CircuitShape, CircuitType, CompiledCircuit};

use ark_bn254::Fr;

/// Common field type for all operations
pub type ConstraintF = Fr;
