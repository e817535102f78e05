//! Error taxonomy for the proving system.

use ark_relations::r1cs::SynthesisError;
use ark_serialize::SerializationError;
use thiserror::Error;
use utxo_circuits::MerkleError;

#[derive(Error, Debug)]
pub enum ProverError {
    /// Inputs disagree with the circuit shape. Caller-correctable.
    #[error("Shape mismatch for {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    #[error("Malformed {what}: {literal:?}")]
    MalformedInput { what: String, literal: String },

    #[error("Circuit compilation failed: {0}")]
    CompilationFailure(String),

    #[error("Key setup failed: {0}")]
    KeySetupFailure(String),

    #[error("Proof generation failed: {0}")]
    ProvingFailure(String),

    #[error("Verification failed: {0}")]
    VerificationFailure(String),

    #[error("{context} failed after {bytes} bytes: {source}")]
    Io {
        context: String,
        bytes: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid Merkle data: {0}")]
    Merkle(#[from] MerkleError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProverError>;

impl ProverError {
    pub(crate) fn shape(what: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            what: what.into(),
            expected,
            actual,
        }
    }

    pub(crate) fn malformed(what: impl Into<String>, literal: impl Into<String>) -> Self {
        Self::MalformedInput {
            what: what.into(),
            literal: literal.into(),
        }
    }

    pub(crate) fn io(context: impl Into<String>, bytes: u64, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            bytes,
            source,
        }
    }

    /// Map a deserialization error: I/O problems (including truncation) stay
    /// I/O errors, anything else means the bytes themselves are bad.
    pub(crate) fn from_deserialization(
        what: &str,
        bytes: u64,
        error: SerializationError,
    ) -> Self {
        match error {
            SerializationError::IoError(source) => Self::io(format!("Reading {what}"), bytes, source),
            other => Self::malformed(what, other.to_string()),
        }
    }

    pub(crate) fn from_serialization(what: &str, bytes: u64, error: SerializationError) -> Self {
        let source = match error {
            SerializationError::IoError(source) => source,
            other => std::io::Error::new(std::io::ErrorKind::InvalidData, other.to_string()),
        };
        Self::io(format!("Writing {what}"), bytes, source)
    }

    pub(crate) fn compilation(error: SynthesisError) -> Self {
        Self::CompilationFailure(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let err = ProverError::shape("inclusion roots", 2, 3);
        assert_eq!(
            err.to_string(),
            "Shape mismatch for inclusion roots: expected 2, got 3"
        );

        let err = ProverError::malformed("field element", "0xzz");
        assert!(err.to_string().contains("\"0xzz\""));
    }

    #[test]
    fn test_truncated_read_is_io() {
        let eof = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let err = ProverError::from_deserialization("proving key", 17, SerializationError::IoError(eof));
        assert!(matches!(err, ProverError::Io { bytes: 17, .. }));

        let err = ProverError::from_deserialization("proving key", 17, SerializationError::InvalidData);
        assert!(matches!(err, ProverError::MalformedInput { .. }));
    }
}
