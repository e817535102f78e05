//! Where proving-system files live and what they are called.

use std::env;
use std::path::PathBuf;

use crate::error::Result;
use crate::setup::ProvingSystem;
use crate::shape::{CircuitShape, CircuitType};

pub const KEYS_DIR_ENV: &str = "PROVER_KEYS_DIR";
pub const DEFAULT_KEYS_DIR: &str = "./proving-keys";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProverConfig {
    pub keys_dir: PathBuf,
}

impl Default for ProverConfig {
    fn default() -> Self {
        Self {
            keys_dir: PathBuf::from(DEFAULT_KEYS_DIR),
        }
    }
}

impl ProverConfig {
    pub fn new(keys_dir: impl Into<PathBuf>) -> Self {
        Self {
            keys_dir: keys_dir.into(),
        }
    }

    /// Default config, with `keys_dir` overridden by `PROVER_KEYS_DIR` when
    /// set and non-empty.
    pub fn from_env() -> Self {
        match env::var_os(KEYS_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Self::new(dir),
            _ => Self::default(),
        }
    }

    /// Path of the full proving-system file for `shape`.
    pub fn key_path(&self, shape: &CircuitShape) -> Result<PathBuf> {
        Ok(self.keys_dir.join(format!("{}.key", key_file_stem(shape)?)))
    }

    /// Path of the exported verifying key for `shape`.
    pub fn verifying_key_path(&self, shape: &CircuitShape) -> Result<PathBuf> {
        Ok(self.keys_dir.join(format!("{}.vkey", key_file_stem(shape)?)))
    }

    pub fn load_system(&self, shape: &CircuitShape) -> Result<ProvingSystem> {
        let system = ProvingSystem::read_from_file(&self.key_path(shape)?)?;
        shape.ensure_matches(&system.shape())?;
        Ok(system)
    }
}

/// `inclusion_26_1`, `non-inclusion_26_2`, `combined_26_1_26_1`.
pub fn key_file_stem(shape: &CircuitShape) -> Result<String> {
    let stem = match shape.circuit_type()? {
        CircuitType::Inclusion => format!(
            "inclusion_{}_{}",
            shape.inclusion_tree_depth, shape.inclusion_number_of_utxos
        ),
        CircuitType::NonInclusion => format!(
            "non-inclusion_{}_{}",
            shape.non_inclusion_tree_depth, shape.non_inclusion_number_of_utxos
        ),
        CircuitType::Combined => format!(
            "combined_{}_{}_{}_{}",
            shape.inclusion_tree_depth,
            shape.inclusion_number_of_utxos,
            shape.non_inclusion_tree_depth,
            shape.non_inclusion_number_of_utxos
        ),
    };
    Ok(stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_key_file_names() {
        let config = ProverConfig::new("/keys");

        assert_eq!(
            config.key_path(&CircuitShape::inclusion(26, 1)).unwrap(),
            Path::new("/keys/inclusion_26_1.key")
        );
        assert_eq!(
            config.key_path(&CircuitShape::non_inclusion(26, 2)).unwrap(),
            Path::new("/keys/non-inclusion_26_2.key")
        );
        assert_eq!(
            config
                .verifying_key_path(&CircuitShape::combined(26, 1, 26, 2))
                .unwrap(),
            Path::new("/keys/combined_26_1_26_2.vkey")
        );
        assert!(config.key_path(&CircuitShape::default()).is_err());
    }

    #[test]
    fn test_default_dir() {
        assert_eq!(ProverConfig::default().keys_dir, Path::new(DEFAULT_KEYS_DIR));
    }
}
