//! Trusted setup and key import.
//!
//! A `ProvingSystem` owns the keys for exactly one circuit shape together
//! with the compiled summary of that circuit. It is built once and then
//! shared read-only by any number of provers and verifiers.

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use ark_bn254::Bn254;
use ark_groth16::{Groth16, PreparedVerifyingKey, ProvingKey, VerifyingKey};
use ark_snark::SNARK;
use ark_std::rand::{rngs::StdRng, SeedableRng};
use rand::{CryptoRng, RngCore};

use crate::artifact::read_key_file;
use crate::error::{ProverError, Result};
use crate::observer::{ProverEvent, ProverObserver, TracingObserver};
use crate::shape::{compile, CircuitShape, CircuitType, CompiledCircuit};

pub struct ProvingSystem {
    pub(crate) compiled: CompiledCircuit,
    pub(crate) proving_key: ProvingKey<Bn254>,
    pub(crate) prepared_vk: PreparedVerifyingKey<Bn254>,
    pub(crate) observer: Arc<dyn ProverObserver>,
}

impl fmt::Debug for ProvingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvingSystem")
            .field("compiled", &self.compiled)
            .finish_non_exhaustive()
    }
}

pub(crate) fn default_observer() -> Arc<dyn ProverObserver> {
    Arc::new(TracingObserver)
}

impl ProvingSystem {
    /// Compile `shape` and run a fresh circuit-specific setup.
    pub fn setup(shape: CircuitShape) -> Result<Self> {
        let mut rng = StdRng::from_entropy();
        Self::setup_with(shape, &mut rng, default_observer())
    }

    /// As [`ProvingSystem::setup`] with a caller-supplied RNG and observer.
    /// A seeded RNG gives reproducible keys.
    pub fn setup_with<R: RngCore + CryptoRng>(
        shape: CircuitShape,
        rng: &mut R,
        observer: Arc<dyn ProverObserver>,
    ) -> Result<Self> {
        observer.on_event(&ProverEvent::SetupStarted { shape });
        let start = Instant::now();

        let compiled = compile(shape)?;
        let circuit = shape.empty_circuit()?;
        let (pk, vk) = Groth16::<Bn254>::circuit_specific_setup(circuit, rng)
            .map_err(|e| ProverError::KeySetupFailure(e.to_string()))?;

        let system = Self::from_parts(compiled, pk, vk, observer)?;
        system.observer.on_event(&ProverEvent::SetupFinished {
            shape,
            num_constraints: compiled.num_constraints,
            elapsed: start.elapsed(),
        });
        Ok(system)
    }

    /// Recompile `shape` and load a proving key and a verifying key, each a
    /// standalone compressed canonical file.
    pub fn import(shape: CircuitShape, pk_path: &Path, vk_path: &Path) -> Result<Self> {
        Self::import_with(shape, pk_path, vk_path, default_observer())
    }

    pub fn import_with(
        shape: CircuitShape,
        pk_path: &Path,
        vk_path: &Path,
        observer: Arc<dyn ProverObserver>,
    ) -> Result<Self> {
        let start = Instant::now();

        let compiled = compile(shape)?;
        let pk: ProvingKey<Bn254> = read_key_file(pk_path, "proving key", observer.as_ref())?;
        let vk: VerifyingKey<Bn254> = read_key_file(vk_path, "verifying key", observer.as_ref())?;

        let system = Self::from_parts(compiled, pk, vk, observer)?;
        system.observer.on_event(&ProverEvent::KeysImported {
            shape,
            elapsed: start.elapsed(),
        });
        Ok(system)
    }

    /// Assemble a system, checking the keys belong together and fit the
    /// compiled circuit.
    pub(crate) fn from_parts(
        compiled: CompiledCircuit,
        proving_key: ProvingKey<Bn254>,
        verifying_key: VerifyingKey<Bn254>,
        observer: Arc<dyn ProverObserver>,
    ) -> Result<Self> {
        if proving_key.vk != verifying_key {
            return Err(ProverError::malformed(
                "verifying key",
                "does not match the proving key",
            ));
        }

        let expected_inputs = compiled.num_instance_variables as usize;
        if verifying_key.gamma_abc_g1.len() != expected_inputs {
            return Err(ProverError::shape(
                "verifying key public inputs",
                expected_inputs,
                verifying_key.gamma_abc_g1.len(),
            ));
        }

        let prepared_vk = Groth16::<Bn254>::process_vk(&verifying_key)
            .map_err(|e| ProverError::KeySetupFailure(e.to_string()))?;

        Ok(Self {
            compiled,
            proving_key,
            prepared_vk,
            observer,
        })
    }

    /// Replace the observer, e.g. to silence a system read from disk.
    pub fn with_observer(mut self, observer: Arc<dyn ProverObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn shape(&self) -> CircuitShape {
        self.compiled.shape
    }

    pub fn circuit_type(&self) -> Result<CircuitType> {
        self.compiled.shape.circuit_type()
    }

    pub fn compiled(&self) -> &CompiledCircuit {
        &self.compiled
    }

    pub fn proving_key(&self) -> &ProvingKey<Bn254> {
        &self.proving_key
    }

    pub fn verifying_key(&self) -> &VerifyingKey<Bn254> {
        &self.prepared_vk.vk
    }

    pub(crate) fn observer(&self) -> &dyn ProverObserver {
        self.observer.as_ref()
    }
}

pub fn setup_inclusion(tree_depth: u32, number_of_utxos: u32) -> Result<ProvingSystem> {
    ProvingSystem::setup(CircuitShape::inclusion(tree_depth, number_of_utxos))
}

pub fn setup_non_inclusion(tree_depth: u32, number_of_utxos: u32) -> Result<ProvingSystem> {
    ProvingSystem::setup(CircuitShape::non_inclusion(tree_depth, number_of_utxos))
}

pub fn setup_combined(
    inclusion_tree_depth: u32,
    inclusion_number_of_utxos: u32,
    non_inclusion_tree_depth: u32,
    non_inclusion_number_of_utxos: u32,
) -> Result<ProvingSystem> {
    ProvingSystem::setup(CircuitShape::combined(
        inclusion_tree_depth,
        inclusion_number_of_utxos,
        non_inclusion_tree_depth,
        non_inclusion_number_of_utxos,
    ))
}

pub fn setup_inclusion_with<R: RngCore + CryptoRng>(
    tree_depth: u32,
    number_of_utxos: u32,
    rng: &mut R,
    observer: Arc<dyn ProverObserver>,
) -> Result<ProvingSystem> {
    ProvingSystem::setup_with(
        CircuitShape::inclusion(tree_depth, number_of_utxos),
        rng,
        observer,
    )
}

pub fn setup_non_inclusion_with<R: RngCore + CryptoRng>(
    tree_depth: u32,
    number_of_utxos: u32,
    rng: &mut R,
    observer: Arc<dyn ProverObserver>,
) -> Result<ProvingSystem> {
    ProvingSystem::setup_with(
        CircuitShape::non_inclusion(tree_depth, number_of_utxos),
        rng,
        observer,
    )
}

pub fn setup_combined_with<R: RngCore + CryptoRng>(
    shape: CircuitShape,
    rng: &mut R,
    observer: Arc<dyn ProverObserver>,
) -> Result<ProvingSystem> {
    if shape.circuit_type()? != CircuitType::Combined {
        return Err(ProverError::CompilationFailure(format!(
            "{shape} is not a combined shape"
        )));
    }
    ProvingSystem::setup_with(shape, rng, observer)
}

pub fn import_inclusion(
    pk_path: &Path,
    vk_path: &Path,
    tree_depth: u32,
    number_of_utxos: u32,
) -> Result<ProvingSystem> {
    ProvingSystem::import(
        CircuitShape::inclusion(tree_depth, number_of_utxos),
        pk_path,
        vk_path,
    )
}

pub fn import_non_inclusion(
    pk_path: &Path,
    vk_path: &Path,
    tree_depth: u32,
    number_of_utxos: u32,
) -> Result<ProvingSystem> {
    ProvingSystem::import(
        CircuitShape::non_inclusion(tree_depth, number_of_utxos),
        pk_path,
        vk_path,
    )
}

pub fn import_combined(
    pk_path: &Path,
    vk_path: &Path,
    inclusion_tree_depth: u32,
    inclusion_number_of_utxos: u32,
    non_inclusion_tree_depth: u32,
    non_inclusion_number_of_utxos: u32,
) -> Result<ProvingSystem> {
    ProvingSystem::import(
        CircuitShape::combined(
            inclusion_tree_depth,
            inclusion_number_of_utxos,
            non_inclusion_tree_depth,
            non_inclusion_number_of_utxos,
        ),
        pk_path,
        vk_path,
    )
}
