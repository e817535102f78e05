//! Prover parameters and their JSON form.
//!
//! Each parameter type carries the whole batch, one entry per UTXO in every
//! array. JSON field names are camelCase and every field element is a string
//! literal (see [`crate::field`]); decoding goes through a mirror struct of
//! strings so a bad literal surfaces as `MalformedInput` naming it.

use ark_bn254::Fr;
use serde::{Deserialize, Serialize};
use utxo_circuits::{
    CombinedCircuit, InclusionCircuit, InclusionWitness, NonInclusionCircuit, NonInclusionWitness,
};

use crate::error::{ProverError, Result};
use crate::field::{fields_to_hex, parse_fields};
use crate::shape::CircuitShape;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "InclusionParametersJson", into = "InclusionParametersJson")]
pub struct InclusionParameters {
    pub roots: Vec<Fr>,
    pub in_path_indices: Vec<u32>,
    pub in_path_elements: Vec<Vec<Fr>>,
    pub leaves: Vec<Fr>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InclusionParametersJson {
    pub roots: Vec<String>,
    pub in_path_indices: Vec<u32>,
    pub in_path_elements: Vec<Vec<String>>,
    pub leaves: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NonInclusionParametersJson", into = "NonInclusionParametersJson")]
pub struct NonInclusionParameters {
    pub roots: Vec<Fr>,
    pub values: Vec<Fr>,
    pub leaf_lower_range_values: Vec<Fr>,
    pub leaf_higher_range_values: Vec<Fr>,
    pub leaf_indices: Vec<u32>,
    pub in_path_indices: Vec<u32>,
    pub in_path_elements: Vec<Vec<Fr>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonInclusionParametersJson {
    pub roots: Vec<String>,
    pub values: Vec<String>,
    pub leaf_lower_range_values: Vec<String>,
    pub leaf_higher_range_values: Vec<String>,
    pub leaf_indices: Vec<u32>,
    pub in_path_indices: Vec<u32>,
    pub in_path_elements: Vec<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedParameters {
    pub inclusion: InclusionParameters,
    pub non_inclusion: NonInclusionParameters,
}

/// Tree depth implied by a batch of paths: the length of the first row, or
/// zero for an empty batch.
fn tree_depth_of<T>(rows: &[Vec<T>]) -> usize {
    rows.first().map_or(0, Vec::len)
}

fn ensure_len(what: &str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(ProverError::shape(what, expected, actual));
    }
    Ok(())
}

fn ensure_rows(what: &str, rows: &[Vec<Fr>], depth: usize) -> Result<()> {
    rows.iter()
        .try_for_each(|row| ensure_len(what, depth, row.len()))
}

fn to_u32(what: &str, value: usize) -> Result<u32> {
    u32::try_from(value).map_err(|_| ProverError::shape(what, u32::MAX as usize, value))
}

impl InclusionParameters {
    pub fn number_of_utxos(&self) -> usize {
        self.roots.len()
    }

    pub fn tree_depth(&self) -> usize {
        tree_depth_of(&self.in_path_elements)
    }

    /// Every array must have one entry per root and every path the same
    /// length.
    pub fn validate(&self) -> Result<()> {
        let n = self.number_of_utxos();
        ensure_len("inclusion path indices", n, self.in_path_indices.len())?;
        ensure_len("inclusion path elements", n, self.in_path_elements.len())?;
        ensure_len("inclusion leaves", n, self.leaves.len())?;
        ensure_rows("inclusion path length", &self.in_path_elements, self.tree_depth())
    }

    pub fn shape(&self) -> Result<CircuitShape> {
        self.validate()?;
        Ok(CircuitShape::inclusion(
            to_u32("inclusion tree depth", self.tree_depth())?,
            to_u32("inclusion number of UTXOs", self.number_of_utxos())?,
        ))
    }

    pub fn to_circuit(&self) -> InclusionCircuit {
        let witnesses = self
            .roots
            .iter()
            .zip(&self.leaves)
            .zip(self.in_path_indices.iter().zip(&self.in_path_elements))
            .map(|((root, leaf), (path_index, path_elements))| InclusionWitness {
                root: *root,
                leaf: *leaf,
                path_index: *path_index,
                path_elements: path_elements.clone(),
            })
            .collect();
        InclusionCircuit::new(self.tree_depth(), witnesses)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let mirror: InclusionParametersJson = serde_json::from_str(json)?;
        mirror.try_into()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl TryFrom<InclusionParametersJson> for InclusionParameters {
    type Error = ProverError;

    fn try_from(json: InclusionParametersJson) -> Result<Self> {
        Ok(Self {
            roots: parse_fields(&json.roots)?,
            in_path_indices: json.in_path_indices,
            in_path_elements: json
                .in_path_elements
                .iter()
                .map(|row| parse_fields(row))
                .collect::<Result<_>>()?,
            leaves: parse_fields(&json.leaves)?,
        })
    }
}

impl From<InclusionParameters> for InclusionParametersJson {
    fn from(params: InclusionParameters) -> Self {
        Self {
            roots: fields_to_hex(&params.roots),
            in_path_indices: params.in_path_indices,
            in_path_elements: params
                .in_path_elements
                .iter()
                .map(|row| fields_to_hex(row))
                .collect(),
            leaves: fields_to_hex(&params.leaves),
        }
    }
}

impl NonInclusionParameters {
    pub fn number_of_utxos(&self) -> usize {
        self.roots.len()
    }

    pub fn tree_depth(&self) -> usize {
        tree_depth_of(&self.in_path_elements)
    }

    pub fn validate(&self) -> Result<()> {
        let n = self.number_of_utxos();
        ensure_len("non-inclusion values", n, self.values.len())?;
        ensure_len("non-inclusion lower range values", n, self.leaf_lower_range_values.len())?;
        ensure_len("non-inclusion higher range values", n, self.leaf_higher_range_values.len())?;
        ensure_len("non-inclusion leaf indices", n, self.leaf_indices.len())?;
        ensure_len("non-inclusion path indices", n, self.in_path_indices.len())?;
        ensure_len("non-inclusion path elements", n, self.in_path_elements.len())?;
        ensure_rows("non-inclusion path length", &self.in_path_elements, self.tree_depth())
    }

    pub fn shape(&self) -> Result<CircuitShape> {
        self.validate()?;
        Ok(CircuitShape::non_inclusion(
            to_u32("non-inclusion tree depth", self.tree_depth())?,
            to_u32("non-inclusion number of UTXOs", self.number_of_utxos())?,
        ))
    }

    pub fn to_circuit(&self) -> NonInclusionCircuit {
        let witnesses = (0..self.number_of_utxos())
            .map(|i| NonInclusionWitness {
                root: self.roots[i],
                value: self.values[i],
                lower_range_value: self.leaf_lower_range_values[i],
                higher_range_value: self.leaf_higher_range_values[i],
                leaf_index: self.leaf_indices[i],
                path_index: self.in_path_indices[i],
                path_elements: self.in_path_elements[i].clone(),
            })
            .collect();
        NonInclusionCircuit::new(self.tree_depth(), witnesses)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let mirror: NonInclusionParametersJson = serde_json::from_str(json)?;
        mirror.try_into()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl TryFrom<NonInclusionParametersJson> for NonInclusionParameters {
    type Error = ProverError;

    fn try_from(json: NonInclusionParametersJson) -> Result<Self> {
        Ok(Self {
            roots: parse_fields(&json.roots)?,
            values: parse_fields(&json.values)?,
            leaf_lower_range_values: parse_fields(&json.leaf_lower_range_values)?,
            leaf_higher_range_values: parse_fields(&json.leaf_higher_range_values)?,
            leaf_indices: json.leaf_indices,
            in_path_indices: json.in_path_indices,
            in_path_elements: json
                .in_path_elements
                .iter()
                .map(|row| parse_fields(row))
                .collect::<Result<_>>()?,
        })
    }
}

impl From<NonInclusionParameters> for NonInclusionParametersJson {
    fn from(params: NonInclusionParameters) -> Self {
        Self {
            roots: fields_to_hex(&params.roots),
            values: fields_to_hex(&params.values),
            leaf_lower_range_values: fields_to_hex(&params.leaf_lower_range_values),
            leaf_higher_range_values: fields_to_hex(&params.leaf_higher_range_values),
            leaf_indices: params.leaf_indices,
            in_path_indices: params.in_path_indices,
            in_path_elements: params
                .in_path_elements
                .iter()
                .map(|row| fields_to_hex(row))
                .collect(),
        }
    }
}

impl CombinedParameters {
    pub fn validate(&self) -> Result<()> {
        self.inclusion.validate()?;
        self.non_inclusion.validate()
    }

    pub fn shape(&self) -> Result<CircuitShape> {
        let inclusion = self.inclusion.shape()?;
        let non_inclusion = self.non_inclusion.shape()?;
        Ok(CircuitShape::combined(
            inclusion.inclusion_tree_depth,
            inclusion.inclusion_number_of_utxos,
            non_inclusion.non_inclusion_tree_depth,
            non_inclusion.non_inclusion_number_of_utxos,
        ))
    }

    pub fn to_circuit(&self) -> CombinedCircuit {
        CombinedCircuit::new(self.inclusion.to_circuit(), self.non_inclusion.to_circuit())
    }

    /// Decodes both halves through their string mirrors so that field
    /// literal errors stay `MalformedInput`.
    pub fn from_json(json: &str) -> Result<Self> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Mirror {
            inclusion: InclusionParametersJson,
            non_inclusion: NonInclusionParametersJson,
        }

        let mirror: Mirror = serde_json::from_str(json)?;
        Ok(Self {
            inclusion: mirror.inclusion.try_into()?,
            non_inclusion: mirror.non_inclusion.try_into()?,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
