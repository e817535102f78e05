//! Groth16 proof encodings.
//!
//! The wire form is eight 32-byte big-endian limbs,
//! `A.x, A.y, B.x.c1, B.x.c0, B.y.c1, B.y.c0, C.x, C.y`, which downstream
//! verifiers consume either raw or as JSON:
//!
//! ```json
//! {"ar": [A.x, A.y], "bs": [[B.x.c1, B.x.c0], [B.y.c1, B.y.c0]], "krs": [C.x, C.y]}
//! ```
//!
//! The point at infinity is encoded as all-zero limbs.

use ark_bn254::{Bn254, Fq, Fq2, G1Affine, G2Affine};
use ark_ff::{BigInteger, PrimeField};
use ark_groth16::Proof as Groth16Proof;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::error::{ProverError, Result};
use crate::field::{biguint_to_field, field_to_hex};

pub const LIMB_SIZE: usize = 32;
pub const RAW_PROOF_SIZE: usize = 8 * LIMB_SIZE;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProofJson", into = "ProofJson")]
pub struct Proof(Groth16Proof<Bn254>);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofJson {
    pub ar: [String; 2],
    pub bs: [[String; 2]; 2],
    pub krs: [String; 2],
}

impl Proof {
    pub fn new(inner: Groth16Proof<Bn254>) -> Self {
        Self(inner)
    }

    pub fn as_groth16(&self) -> &Groth16Proof<Bn254> {
        &self.0
    }

    pub fn into_groth16(self) -> Groth16Proof<Bn254> {
        self.0
    }

    /// The 256-byte wire buffer.
    pub fn to_raw_bytes(&self) -> [u8; RAW_PROOF_SIZE] {
        let mut raw = [0u8; RAW_PROOF_SIZE];
        for (chunk, limb) in raw.chunks_exact_mut(LIMB_SIZE).zip(self.limbs()) {
            chunk.copy_from_slice(&fq_to_be_bytes(&limb));
        }
        raw
    }

    /// Decode the wire buffer, rejecting non-canonical coordinates and points
    /// that are off the curve or outside the prime-order subgroup.
    pub fn from_raw_bytes(raw: &[u8]) -> Result<Self> {
        if raw.len() != RAW_PROOF_SIZE {
            return Err(ProverError::shape("raw proof bytes", RAW_PROOF_SIZE, raw.len()));
        }

        let limbs = raw
            .chunks_exact(LIMB_SIZE)
            .map(|chunk| {
                biguint_to_field::<Fq>(&BigUint::from_bytes_be(chunk))
                    .ok_or_else(|| ProverError::malformed("proof coordinate", hex::encode(chunk)))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_limbs(&limbs)
    }

    /// Compressed canonical encoding, as used for proofs stored next to keys.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.0
            .serialize_compressed(&mut bytes)
            .map_err(|e| ProverError::from_serialization("proof", bytes.len() as u64, e))?;
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Groth16Proof::deserialize_compressed(bytes)
            .map(Self)
            .map_err(|e| ProverError::malformed("proof", e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let mirror: ProofJson = serde_json::from_str(json)?;
        mirror.try_into()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn limbs(&self) -> [Fq; 8] {
        let (ax, ay) = g1_coordinates(&self.0.a);
        let (bx, by) = g2_coordinates(&self.0.b);
        let (cx, cy) = g1_coordinates(&self.0.c);
        [ax, ay, bx.c1, bx.c0, by.c1, by.c0, cx, cy]
    }

    fn from_limbs(limbs: &[Fq]) -> Result<Self> {
        let [ax, ay, bx1, bx0, by1, by0, cx, cy] = limbs else {
            return Err(ProverError::shape("proof limbs", 8, limbs.len()));
        };

        Ok(Self(Groth16Proof {
            a: g1_from_coordinates(*ax, *ay, "proof point A")?,
            b: g2_from_coordinates(Fq2::new(*bx0, *bx1), Fq2::new(*by0, *by1))?,
            c: g1_from_coordinates(*cx, *cy, "proof point C")?,
        }))
    }
}

impl From<Groth16Proof<Bn254>> for Proof {
    fn from(inner: Groth16Proof<Bn254>) -> Self {
        Self(inner)
    }
}

impl TryFrom<ProofJson> for Proof {
    type Error = ProverError;

    fn try_from(json: ProofJson) -> Result<Self> {
        let ProofJson { ar, bs, krs } = json;
        let [[bx1, bx0], [by1, by0]] = bs;
        let literals: [&str; 8] = [&ar[0], &ar[1], &bx1, &bx0, &by1, &by0, &krs[0], &krs[1]];

        let limbs = literals
            .iter()
            .map(|literal| parse_limb(literal))
            .collect::<Result<Vec<_>>>()?;

        Self::from_limbs(&limbs)
    }
}

impl From<Proof> for ProofJson {
    fn from(proof: Proof) -> Self {
        let [ax, ay, bx1, bx0, by1, by0, cx, cy] = proof.limbs().map(|limb| field_to_hex(&limb));
        Self {
            ar: [ax, ay],
            bs: [[bx1, bx0], [by1, by0]],
            krs: [cx, cy],
        }
    }
}

/// A limb is hex of at most 32 bytes, with or without `0x`, and must be a
/// canonical base field element.
fn parse_limb(literal: &str) -> Result<Fq> {
    let malformed = || ProverError::malformed("proof coordinate", literal);

    let digits = literal
        .strip_prefix("0x")
        .or_else(|| literal.strip_prefix("0X"))
        .unwrap_or(literal);
    if digits.is_empty() || digits.len() > 2 * LIMB_SIZE {
        return Err(malformed());
    }

    let value = BigUint::parse_bytes(digits.as_bytes(), 16).ok_or_else(malformed)?;
    biguint_to_field(&value).ok_or_else(malformed)
}

fn fq_to_be_bytes(value: &Fq) -> [u8; LIMB_SIZE] {
    let bytes = value.into_bigint().to_bytes_be();
    let mut limb = [0u8; LIMB_SIZE];
    limb[LIMB_SIZE - bytes.len()..].copy_from_slice(&bytes);
    limb
}

fn g1_coordinates(point: &G1Affine) -> (Fq, Fq) {
    if point.infinity {
        (Fq::from(0u64), Fq::from(0u64))
    } else {
        (point.x, point.y)
    }
}

fn g2_coordinates(point: &G2Affine) -> (Fq2, Fq2) {
    if point.infinity {
        (Fq2::from(0u64), Fq2::from(0u64))
    } else {
        (point.x, point.y)
    }
}

fn g1_from_coordinates(x: Fq, y: Fq, what: &str) -> Result<G1Affine> {
    let zero = Fq::from(0u64);
    if x == zero && y == zero {
        return Ok(G1Affine::identity());
    }

    let point = G1Affine::new_unchecked(x, y);
    if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(ProverError::malformed(what, format!("({x}, {y})")));
    }
    Ok(point)
}

fn g2_from_coordinates(x: Fq2, y: Fq2) -> Result<G2Affine> {
    let zero = Fq2::from(0u64);
    if x == zero && y == zero {
        return Ok(G2Affine::identity());
    }

    let point = G2Affine::new_unchecked(x, y);
    if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(ProverError::malformed("proof point B", format!("({x}, {y})")));
    }
    Ok(point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::{G1Projective, G2Projective};
    use ark_std::UniformRand;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    fn random_proof(seed: u64) -> Proof {
        let mut rng = StdRng::seed_from_u64(seed);
        Proof(Groth16Proof {
            a: G1Projective::rand(&mut rng).into(),
            b: G2Projective::rand(&mut rng).into(),
            c: G1Projective::rand(&mut rng).into(),
        })
    }

    #[test]
    fn test_raw_layout() {
        let proof = random_proof(1);
        let raw = proof.to_raw_bytes();

        assert_eq!(&raw[..32], &fq_to_be_bytes(&proof.0.a.x));
        assert_eq!(&raw[64..96], &fq_to_be_bytes(&proof.0.b.x.c1));
        assert_eq!(&raw[96..128], &fq_to_be_bytes(&proof.0.b.x.c0));
        assert_eq!(&raw[224..], &fq_to_be_bytes(&proof.0.c.y));
        assert_eq!(Proof::from_raw_bytes(&raw).unwrap(), proof);
    }

    #[test]
    fn test_json_matches_raw_limbs() {
        let proof = random_proof(2);
        let raw = proof.to_raw_bytes();
        let json: ProofJson = proof.clone().into();

        let limb_hex = |i: usize| {
            let value = BigUint::from_bytes_be(&raw[i * LIMB_SIZE..(i + 1) * LIMB_SIZE]);
            format!("0x{}", value.to_str_radix(16))
        };
        assert_eq!(json.ar, [limb_hex(0), limb_hex(1)]);
        assert_eq!(json.bs, [[limb_hex(2), limb_hex(3)], [limb_hex(4), limb_hex(5)]]);
        assert_eq!(json.krs, [limb_hex(6), limb_hex(7)]);

        let text = proof.to_json().unwrap();
        assert_eq!(Proof::from_json(&text).unwrap(), proof);
    }

    #[test]
    fn test_json_accepts_zero_padded_limbs() {
        let proof = random_proof(3);
        let raw = proof.to_raw_bytes();
        let padded: Vec<String> = raw
            .chunks_exact(LIMB_SIZE)
            .map(|c| format!("0x{}", hex::encode(c)))
            .collect();
        let json = ProofJson {
            ar: [padded[0].clone(), padded[1].clone()],
            bs: [
                [padded[2].clone(), padded[3].clone()],
                [padded[4].clone(), padded[5].clone()],
            ],
            krs: [padded[6].clone(), padded[7].clone()],
        };

        assert_eq!(Proof::try_from(json).unwrap(), proof);
    }

    #[test]
    fn test_point_at_infinity() {
        let proof = Proof(Groth16Proof {
            a: G1Affine::identity(),
            b: G2Affine::identity(),
            c: G1Affine::identity(),
        });

        assert_eq!(proof.to_raw_bytes(), [0u8; RAW_PROOF_SIZE]);
        assert_eq!(Proof::from_raw_bytes(&[0u8; RAW_PROOF_SIZE]).unwrap(), proof);
    }

    #[test]
    fn test_rejects_off_curve_point() {
        let mut raw = random_proof(4).to_raw_bytes();
        raw[31] ^= 1;
        assert!(matches!(
            Proof::from_raw_bytes(&raw),
            Err(ProverError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_rejects_non_canonical_coordinate() {
        let mut raw = random_proof(5).to_raw_bytes();
        raw[..32].copy_from_slice(&[0xff; 32]);
        assert!(matches!(
            Proof::from_raw_bytes(&raw),
            Err(ProverError::MalformedInput { what, .. }) if what == "proof coordinate"
        ));
        assert!(matches!(
            Proof::from_raw_bytes(&raw[..255]),
            Err(ProverError::ShapeMismatch { expected: 256, actual: 255, .. })
        ));
    }

    #[test]
    fn test_compressed_round_trip() {
        let proof = random_proof(6);
        let bytes = proof.to_bytes().unwrap();
        assert_eq!(Proof::from_bytes(&bytes).unwrap(), proof);
        assert!(Proof::from_bytes(&bytes[1..]).is_err());
    }
}
