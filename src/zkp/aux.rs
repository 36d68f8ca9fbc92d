//! Auxiliary RSA parameters `(N̄, h1, h2)` shared by every range-style proof
//! in this module (RangeProofAlice, ProofBob/ProofBobWC, PDLwSlack). Each
//! party generates its own `N̄` (a safe-prime RSA modulus, independent of
//! its Paillier modulus) plus two generators of the same order, and
//! publishes them alongside its Paillier public key as the `{N̄_j, h1_j,
//! h2_j}` entry of its key material.

use crypto_bigint::{NonZero, RandomMod};
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};

use crate::paillier::keys::{Modulus, Prime};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxiliaryRsaParams {
    pub n_tilde: Modulus,
    pub h1: Modulus,
    pub h2: Modulus,
}

impl AuxiliaryRsaParams {
    pub fn generate(rng: &mut impl CryptoRngCore) -> Self {
        use crypto_primes::RandomPrimeWithRng;
        let p = Prime::safe_prime_with_rng(rng, Prime::BITS);
        let q = Prime::safe_prime_with_rng(rng, Prime::BITS);
        let n_tilde = widen_mul(&p, &q);
        let n_tilde_nz = NonZero::new(n_tilde).expect("n_tilde nonzero");
        let h1 = random_unit(&n_tilde_nz, rng);
        // h2 = h1^alpha for a random, immediately-discarded alpha, so h2's
        // relation to h1 is unknown to any verifier.
        let alpha = random_unit(&n_tilde_nz, rng);
        let h2 = mod_pow(&h1, &alpha, &n_tilde_nz);
        Self { n_tilde, h1, h2 }
    }

    pub fn commit(&self, x: &Modulus, r: &Modulus) -> Modulus {
        let n_tilde_nz = NonZero::new(self.n_tilde).expect("n_tilde nonzero");
        let a = mod_pow(&self.h1, x, &n_tilde_nz);
        let b = mod_pow(&self.h2, r, &n_tilde_nz);
        a.mul_mod(&b, &n_tilde_nz)
    }
}

pub(crate) fn mod_pow(base: &Modulus, exp: &Modulus, modulus: &NonZero<Modulus>) -> Modulus {
    let mut result = Modulus::ONE;
    let base = *base % *modulus;
    for byte in exp.to_be_bytes() {
        for bit_idx in (0..8).rev() {
            result = result.mul_mod(&result, modulus);
            if (byte >> bit_idx) & 1 == 1 {
                result = result.mul_mod(&base, modulus);
            }
        }
    }
    result
}

pub(crate) fn random_unit(modulus: &NonZero<Modulus>, rng: &mut impl CryptoRngCore) -> Modulus {
    loop {
        let candidate = Modulus::random_mod(rng, modulus);
        if candidate != Modulus::ZERO {
            return candidate;
        }
    }
}

fn widen_mul(p: &Prime, q: &Prime) -> Modulus {
    let mut p_bytes = [0u8; 256];
    p_bytes[128..].copy_from_slice(&p.to_be_bytes());
    let p_wide = Modulus::from_be_slice(&p_bytes);
    let mut q_bytes = [0u8; 256];
    q_bytes[128..].copy_from_slice(&q.to_be_bytes());
    let q_wide = Modulus::from_be_slice(&q_bytes);
    p_wide.wrapping_mul(&q_wide)
}
