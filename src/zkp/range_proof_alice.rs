//! RangeProofAlice: proves that a Paillier ciphertext encrypts a value in
//! the expected range `[0, q)` without revealing it, so a peer accepting an
//! MtA "Alice" ciphertext (`cA_i` broadcast-once, then paired with a
//! per-peer range proof) can be sure it does not hide an out-of-range value
//! that would bias the resulting additive share.
//!
//! Structured as a `prove`/`verify` pair over an explicit statement/witness,
//! matching this crate's other proof types.

use crypto_bigint::NonZero;
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};

use crate::paillier::keys::{Modulus, PaillierPublicKey, WideModulus};
use crate::tools::hashing::Chain;
use crate::zkp::aux::{mod_pow, random_unit, AuxiliaryRsaParams};

/// `pk` and `aux` are public; `plaintext`/`randomness` are the witness
/// behind `ciphertext = pk.encrypt_with_randomness(plaintext, randomness)`.
pub struct RangeProofAliceStatement<'a> {
    pub pk: &'a PaillierPublicKey,
    pub aux: &'a AuxiliaryRsaParams,
    pub ciphertext: &'a WideModulus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeProofAlice {
    z: Modulus,
    u: WideModulus,
    w: Modulus,
    s: Modulus,
    s1: Modulus,
    s2: Modulus,
}

impl RangeProofAlice {
    pub fn prove(
        statement: &RangeProofAliceStatement,
        plaintext: &Modulus,
        randomness: &Modulus,
        rng: &mut impl CryptoRngCore,
    ) -> Self {
        let n_tilde_nz = NonZero::new(statement.aux.n_tilde).expect("n_tilde nonzero");
        let n_nz = NonZero::new(*statement.pk.modulus()).expect("n nonzero");

        let alpha = random_unit(&n_tilde_nz, rng);
        let beta = random_unit(&n_nz, rng);
        let rho = random_unit(&n_tilde_nz, rng);
        let gamma = random_unit(&n_tilde_nz, rng);

        let z = statement.aux.commit(plaintext, &rho);
        let u = statement
            .pk
            .encrypt_with_randomness(&reduce_to_modulus(&alpha, &n_nz), &beta);
        let w = mod_pow(&statement.aux.h1, &alpha, &n_tilde_nz)
            .mul_mod(&mod_pow(&statement.aux.h2, &gamma, &n_tilde_nz), &n_tilde_nz);

        let e = challenge(statement.ciphertext, &z, &u, &w);

        let s = mod_pow(randomness, &e, &n_nz).mul_mod(&beta, &n_nz);
        let s1 = alpha.wrapping_add(&e.checked_mul(plaintext).unwrap_or(Modulus::ZERO));
        let s2 = gamma.wrapping_add(&e.checked_mul(&rho).unwrap_or(Modulus::ZERO));

        Self { z, u, w, s, s1, s2 }
    }

    pub fn verify(&self, statement: &RangeProofAliceStatement) -> bool {
        let e = challenge(statement.ciphertext, &self.z, &self.u, &self.w);
        let n_nz = NonZero::new(*statement.pk.modulus()).expect("n nonzero");
        let n_tilde_nz = NonZero::new(statement.aux.n_tilde).expect("n_tilde nonzero");

        let ciphertext_lhs = statement
            .pk
            .encrypt_with_randomness(&reduce_to_modulus(&self.s1, &n_nz), &self.s);
        let ciphertext_rhs = statement
            .pk
            .add(&statement.pk.mul_scalar(statement.ciphertext, &e), &self.u);
        let ciphertext_consistent = ciphertext_lhs == ciphertext_rhs;

        let commitment_lhs = statement.aux.commit(&self.s1, &self.s2);
        let commitment_rhs = mod_pow(&self.z, &e, &n_tilde_nz).mul_mod(&self.w, &n_tilde_nz);

        ciphertext_consistent && commitment_lhs == commitment_rhs
    }
}

fn reduce_to_modulus(x: &Modulus, n: &NonZero<Modulus>) -> Modulus {
    *x % *n
}

fn challenge(c: &WideModulus, z: &Modulus, u: &WideModulus, w: &Modulus) -> Modulus {
    let digest = Chain::new("gg20-presign/range-proof-alice")
        .chain_bytes(&c.to_be_bytes())
        .chain_bytes(&z.to_be_bytes())
        .chain_bytes(&u.to_be_bytes())
        .chain_bytes(&w.to_be_bytes())
        .finalize_to_bytes();
    Modulus::from_be_slice(&{
        let mut padded = [0u8; 256];
        padded[224..].copy_from_slice(&digest);
        padded
    })
}
