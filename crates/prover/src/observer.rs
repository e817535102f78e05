//! Observability hooks.
//!
//! The library never installs a global logger. A `ProvingSystem` carries an
//! observer and reports each notable step to it; the default forwards to
//! `tracing`, and binaries decide whether a subscriber is installed.

use std::time::Duration;

use crate::shape::{CircuitShape, CircuitType};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProverEvent {
    SetupStarted {
        shape: CircuitShape,
    },
    SetupFinished {
        shape: CircuitShape,
        num_constraints: u64,
        elapsed: Duration,
    },
    KeysImported {
        shape: CircuitShape,
        elapsed: Duration,
    },
    ProofGenerated {
        circuit_type: CircuitType,
        elapsed: Duration,
    },
    ProvingFailed {
        circuit_type: CircuitType,
        reason: String,
    },
    ProofVerified {
        circuit_type: CircuitType,
        accepted: bool,
        elapsed: Duration,
    },
    ArtifactWritten {
        what: &'static str,
        bytes: u64,
    },
    ArtifactRead {
        what: &'static str,
        bytes: u64,
    },
}

pub trait ProverObserver: Send + Sync {
    fn on_event(&self, event: &ProverEvent);
}

/// Emits every event as a structured `tracing` record.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl ProverObserver for TracingObserver {
    fn on_event(&self, event: &ProverEvent) {
        match event {
            ProverEvent::SetupStarted { shape } => {
                tracing::info!(%shape, "Running circuit setup");
            }
            ProverEvent::SetupFinished {
                shape,
                num_constraints,
                elapsed,
            } => {
                tracing::info!(%shape, num_constraints, ?elapsed, "Circuit setup finished");
            }
            ProverEvent::KeysImported { shape, elapsed } => {
                tracing::info!(%shape, ?elapsed, "Imported proving and verifying keys");
            }
            ProverEvent::ProofGenerated {
                circuit_type,
                elapsed,
            } => {
                tracing::info!(%circuit_type, ?elapsed, "Proof generated");
            }
            ProverEvent::ProvingFailed {
                circuit_type,
                reason,
            } => {
                tracing::warn!(%circuit_type, %reason, "Proof generation failed");
            }
            ProverEvent::ProofVerified {
                circuit_type,
                accepted,
                elapsed,
            } => {
                tracing::debug!(%circuit_type, accepted, ?elapsed, "Proof verified");
            }
            ProverEvent::ArtifactWritten { what, bytes } => {
                tracing::debug!(what, bytes, "Wrote artifact");
            }
            ProverEvent::ArtifactRead { what, bytes } => {
                tracing::debug!(what, bytes, "Read artifact");
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl ProverObserver for NoopObserver {
    fn on_event(&self, _event: &ProverEvent) {}
}
