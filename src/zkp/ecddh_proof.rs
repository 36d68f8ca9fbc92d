//! ECDDHProof: a Chaum-Pedersen proof of equal discrete logs across two
//! bases — `A = g^x` and `B = h^x` for the same secret `x`, without
//! revealing `x`. Used in round 7's Type-7 check to bind a party's `S_i`
//! (computed as `R^sigma_i`) to the witness `sigma_i` it also used elsewhere,
//! the curve-only analogue of [`super::proof_bob::ProofBobWc`]'s
//! Paillier-to-curve binding.
//!
//! A two-base Σ-protocol: the same shape as the witness-checked Pedersen
//! proof in [`super::t_proof`], specialized to two curve points instead of
//! a curve point and a Paillier ciphertext.

use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};

use crate::curve::{Point, Scalar};
use crate::tools::hashing::Chain;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EcddhProof {
    a: Point,
    b: Point,
    z: Scalar,
}

impl EcddhProof {
    /// Proves `point_a = base_a^x` and `point_b = base_b^x` for the same `x`.
    pub fn prove(
        base_a: Point,
        point_a: Point,
        base_b: Point,
        point_b: Point,
        x: Scalar,
        rng: &mut impl CryptoRngCore,
    ) -> Self {
        let k = Scalar::random(rng);
        let a = base_a * k;
        let b = base_b * k;
        let e = challenge(&base_a, &point_a, &base_b, &point_b, &a, &b);
        let z = k + e * x;
        Self { a, b, z }
    }

    pub fn verify(
        &self,
        base_a: Point,
        point_a: Point,
        base_b: Point,
        point_b: Point,
    ) -> bool {
        let e = challenge(&base_a, &point_a, &base_b, &point_b, &self.a, &self.b);
        let lhs_a = base_a * self.z == self.a + point_a * e;
        let lhs_b = base_b * self.z == self.b + point_b * e;
        lhs_a && lhs_b
    }
}

fn challenge(base_a: &Point, point_a: &Point, base_b: &Point, point_b: &Point, a: &Point, b: &Point) -> Scalar {
    Chain::new("gg20-presign/ecddh-proof")
        .chain(base_a)
        .chain(point_a)
        .chain(base_b)
        .chain(point_b)
        .chain(a)
        .chain(b)
        .finalize_to_scalar()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn ecddh_roundtrip() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let x = Scalar::random(&mut rng);
        let base_a = Point::generator();
        let base_b = Point::mul_by_generator(&Scalar::random(&mut rng));
        let point_a = base_a * x;
        let point_b = base_b * x;
        let proof = EcddhProof::prove(base_a, point_a, base_b, point_b, x, &mut rng);
        assert!(proof.verify(base_a, point_a, base_b, point_b));
    }

    #[test]
    fn ecddh_rejects_mismatched_exponents() {
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        let x = Scalar::random(&mut rng);
        let y = Scalar::random(&mut rng);
        let base_a = Point::generator();
        let base_b = Point::mul_by_generator(&Scalar::random(&mut rng));
        let point_a = base_a * x;
        let point_b = base_b * y;
        let proof = EcddhProof::prove(base_a, point_a, base_b, point_b, x, &mut rng);
        assert!(!proof.verify(base_a, point_a, base_b, point_b));
    }
}
