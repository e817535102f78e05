//! Circuit shapes and compilation.
//!
//! A shape fixes everything the constraint system depends on: the depth of
//! each tree and how many UTXOs are batched in each half. Keys are only valid
//! for the exact shape they were generated for.

use std::fmt;

use ark_bn254::Fr;
use ark_relations::r1cs::{
    ConstraintSynthesizer, ConstraintSystem, ConstraintSystemRef, OptimizationGoal, SynthesisError,
    SynthesisMode,
};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use utxo_circuits::{CombinedCircuit, InclusionCircuit, NonInclusionCircuit, MAX_TREE_DEPTH};

// Bare `Result` must stay std's here: the canonical derives expand to it.
use crate::error::{self, ProverError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CircuitType {
    Inclusion,
    NonInclusion,
    Combined,
}

impl fmt::Display for CircuitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CircuitType::Inclusion => "inclusion",
            CircuitType::NonInclusion => "non-inclusion",
            CircuitType::Combined => "combined",
        };
        f.write_str(name)
    }
}

/// Depth and batch size of each half. An absent half is all zeros.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, CanonicalSerialize, CanonicalDeserialize,
)]
pub struct CircuitShape {
    pub inclusion_tree_depth: u32,
    pub inclusion_number_of_utxos: u32,
    pub non_inclusion_tree_depth: u32,
    pub non_inclusion_number_of_utxos: u32,
}

impl CircuitShape {
    pub const fn inclusion(tree_depth: u32, number_of_utxos: u32) -> Self {
        Self::combined(tree_depth, number_of_utxos, 0, 0)
    }

    pub const fn non_inclusion(tree_depth: u32, number_of_utxos: u32) -> Self {
        Self::combined(0, 0, tree_depth, number_of_utxos)
    }

    pub const fn combined(
        inclusion_tree_depth: u32,
        inclusion_number_of_utxos: u32,
        non_inclusion_tree_depth: u32,
        non_inclusion_number_of_utxos: u32,
    ) -> Self {
        Self {
            inclusion_tree_depth,
            inclusion_number_of_utxos,
            non_inclusion_tree_depth,
            non_inclusion_number_of_utxos,
        }
    }

    /// Which circuit this shape describes, or `CompilationFailure` if it is
    /// inconsistent.
    pub fn circuit_type(&self) -> error::Result<CircuitType> {
        for depth in [self.inclusion_tree_depth, self.non_inclusion_tree_depth] {
            if depth as usize > MAX_TREE_DEPTH {
                return Err(ProverError::CompilationFailure(format!(
                    "tree depth {depth} exceeds the maximum of {MAX_TREE_DEPTH}"
                )));
            }
        }

        let has_inclusion = self.inclusion_number_of_utxos > 0;
        let has_non_inclusion = self.non_inclusion_number_of_utxos > 0;
        if !has_inclusion && self.inclusion_tree_depth != 0 {
            return Err(ProverError::CompilationFailure(
                "inclusion tree depth set without any inclusion UTXOs".into(),
            ));
        }
        if !has_non_inclusion && self.non_inclusion_tree_depth != 0 {
            return Err(ProverError::CompilationFailure(
                "non-inclusion tree depth set without any non-inclusion UTXOs".into(),
            ));
        }

        match (has_inclusion, has_non_inclusion) {
            (true, false) => Ok(CircuitType::Inclusion),
            (false, true) => Ok(CircuitType::NonInclusion),
            (true, true) => Ok(CircuitType::Combined),
            (false, false) => Err(ProverError::CompilationFailure(
                "circuit must batch at least one UTXO".into(),
            )),
        }
    }

    /// Number of public inputs, not counting the constant one.
    pub fn num_public_inputs(&self) -> usize {
        2 * self.inclusion_number_of_utxos as usize + 2 * self.non_inclusion_number_of_utxos as usize
    }

    /// Compare against `other` field by field, reporting the first
    /// difference as a `ShapeMismatch` (`self` is the expected side).
    pub fn ensure_matches(&self, other: &CircuitShape) -> error::Result<()> {
        let fields = [
            ("inclusion tree depth", self.inclusion_tree_depth, other.inclusion_tree_depth),
            ("inclusion number of UTXOs", self.inclusion_number_of_utxos, other.inclusion_number_of_utxos),
            ("non-inclusion tree depth", self.non_inclusion_tree_depth, other.non_inclusion_tree_depth),
            (
                "non-inclusion number of UTXOs",
                self.non_inclusion_number_of_utxos,
                other.non_inclusion_number_of_utxos,
            ),
        ];

        match fields.iter().find(|(_, expected, actual)| expected != actual) {
            Some((what, expected, actual)) => {
                Err(ProverError::shape(*what, *expected as usize, *actual as usize))
            }
            None => Ok(()),
        }
    }

    /// The witness-free circuit for this shape, used for key generation.
    pub fn empty_circuit(&self) -> error::Result<ShapedCircuit> {
        let circuit = match self.circuit_type()? {
            CircuitType::Inclusion => ShapedCircuit::Inclusion(InclusionCircuit::empty(
                self.inclusion_tree_depth as usize,
                self.inclusion_number_of_utxos as usize,
            )),
            CircuitType::NonInclusion => ShapedCircuit::NonInclusion(NonInclusionCircuit::empty(
                self.non_inclusion_tree_depth as usize,
                self.non_inclusion_number_of_utxos as usize,
            )),
            CircuitType::Combined => ShapedCircuit::Combined(CombinedCircuit::empty(
                self.inclusion_tree_depth as usize,
                self.inclusion_number_of_utxos as usize,
                self.non_inclusion_tree_depth as usize,
                self.non_inclusion_number_of_utxos as usize,
            )),
        };
        Ok(circuit)
    }
}

impl fmt::Display for CircuitShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "inclusion {}x{}, non-inclusion {}x{}",
            self.inclusion_tree_depth,
            self.inclusion_number_of_utxos,
            self.non_inclusion_tree_depth,
            self.non_inclusion_number_of_utxos
        )
    }
}

/// Any of the three circuits behind one synthesizer.
#[derive(Clone, Debug)]
pub enum ShapedCircuit {
    Inclusion(InclusionCircuit),
    NonInclusion(NonInclusionCircuit),
    Combined(CombinedCircuit),
}

impl ShapedCircuit {
    pub fn public_inputs(&self) -> Vec<Fr> {
        match self {
            ShapedCircuit::Inclusion(c) => c.public_inputs(),
            ShapedCircuit::NonInclusion(c) => c.public_inputs(),
            ShapedCircuit::Combined(c) => c.public_inputs(),
        }
    }
}

impl ConstraintSynthesizer<Fr> for ShapedCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        match self {
            ShapedCircuit::Inclusion(c) => c.generate_constraints(cs),
            ShapedCircuit::NonInclusion(c) => c.generate_constraints(cs),
            ShapedCircuit::Combined(c) => c.generate_constraints(cs),
        }
    }
}

/// Summary of a compiled constraint system.
///
/// Persisted next to the keys; on load the shape is recompiled and the
/// summaries must agree, which catches keys paired with a different circuit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct CompiledCircuit {
    pub shape: CircuitShape,
    pub num_constraints: u64,
    /// Includes the constant one.
    pub num_instance_variables: u64,
    pub num_witness_variables: u64,
}

/// Synthesize the empty circuit for `shape` in setup mode and record its size.
pub fn compile(shape: CircuitShape) -> error::Result<CompiledCircuit> {
    let circuit = shape.empty_circuit()?;

    let cs = ConstraintSystem::<Fr>::new_ref();
    cs.set_optimization_goal(OptimizationGoal::Constraints);
    cs.set_mode(SynthesisMode::Setup);
    circuit
        .generate_constraints(cs.clone())
        .map_err(ProverError::compilation)?;
    cs.finalize();

    Ok(CompiledCircuit {
        shape,
        num_constraints: cs.num_constraints() as u64,
        num_instance_variables: cs.num_instance_variables() as u64,
        num_witness_variables: cs.num_witness_variables() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circuit_type_from_shape() {
        assert_eq!(
            CircuitShape::inclusion(26, 1).circuit_type().unwrap(),
            CircuitType::Inclusion
        );
        assert_eq!(
            CircuitShape::non_inclusion(26, 2).circuit_type().unwrap(),
            CircuitType::NonInclusion
        );
        assert_eq!(
            CircuitShape::combined(26, 1, 26, 1).circuit_type().unwrap(),
            CircuitType::Combined
        );
        // Zero depth is allowed: the leaf is the root.
        assert!(CircuitShape::inclusion(0, 1).circuit_type().is_ok());
    }

    #[test]
    fn test_inconsistent_shapes_fail_compilation() {
        for shape in [
            CircuitShape::default(),
            CircuitShape::inclusion(4, 0),
            CircuitShape::inclusion(33, 1),
            CircuitShape::combined(4, 1, 3, 0),
        ] {
            assert!(
                matches!(compile(shape), Err(ProverError::CompilationFailure(_))),
                "{shape}"
            );
        }
    }

    #[test]
    fn test_compile_counts_public_inputs() {
        let shape = CircuitShape::combined(2, 2, 3, 1);
        let compiled = compile(shape).unwrap();

        assert_eq!(compiled.shape, shape);
        assert_eq!(
            compiled.num_instance_variables as usize,
            shape.num_public_inputs() + 1
        );
        assert!(compiled.num_constraints > 0);
    }

    #[test]
    fn test_compile_is_deterministic() {
        let shape = CircuitShape::non_inclusion(3, 2);
        assert_eq!(compile(shape).unwrap(), compile(shape).unwrap());
    }

    #[test]
    fn test_shape_and_summary_canonical_bytes() {
        let compiled = compile(CircuitShape::combined(2, 1, 3, 2)).unwrap();

        let mut bytes = Vec::new();
        compiled.serialize_compressed(&mut bytes).unwrap();
        assert_eq!(bytes.len(), compiled.compressed_size());
        // Four u32 shape words, then three u64 counts.
        assert_eq!(bytes.len(), 4 * 4 + 3 * 8);

        let decoded = CompiledCircuit::deserialize_compressed(bytes.as_slice()).unwrap();
        assert_eq!(decoded, compiled);

        let shape = CircuitShape::deserialize_compressed(&bytes[..16]).unwrap();
        assert_eq!(shape, compiled.shape);
    }

    #[test]
    fn test_ensure_matches_reports_first_difference() {
        let expected = CircuitShape::inclusion(26, 2);
        let err = expected
            .ensure_matches(&CircuitShape::inclusion(26, 3))
            .unwrap_err();
        assert!(matches!(
            err,
            ProverError::ShapeMismatch { expected: 2, actual: 3, ref what } if what == "inclusion number of UTXOs"
        ));
        assert!(expected.ensure_matches(&expected).is_ok());
    }
}
