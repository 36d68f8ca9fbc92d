//! A Paillier ciphertext together with its public key, with homomorphic
//! operators layered on top of the raw modular arithmetic in `keys.rs`.

use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};

use super::keys::{Modulus, PaillierPublicKey, WideModulus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ciphertext {
    value: WideModulus,
}

impl Ciphertext {
    pub fn encrypt(pk: &PaillierPublicKey, m: &Modulus, rng: &mut impl CryptoRngCore) -> (Self, Modulus) {
        let r = random_unit(pk.modulus(), rng);
        (Self::encrypt_with_randomness(pk, m, &r), r)
    }

    pub fn encrypt_with_randomness(pk: &PaillierPublicKey, m: &Modulus, r: &Modulus) -> Self {
        Self {
            value: pk.encrypt_with_randomness(m, r),
        }
    }

    pub fn value(&self) -> &WideModulus {
        &self.value
    }

    pub fn homomorphic_add(&self, pk: &PaillierPublicKey, other: &Self) -> Self {
        Self {
            value: pk.add(&self.value, &other.value),
        }
    }

    pub fn homomorphic_mul_scalar(&self, pk: &PaillierPublicKey, k: &Modulus) -> Self {
        Self {
            value: pk.mul_scalar(&self.value, k),
        }
    }
}

/// Samples a uniformly random element of `Z_n^*` by rejection sampling.
pub fn random_unit(n: &Modulus, rng: &mut impl CryptoRngCore) -> Modulus {
    use crypto_bigint::{NonZero, RandomMod};
    let n_nz = NonZero::new(*n).expect("modulus is nonzero");
    loop {
        let candidate = Modulus::random_mod(rng, &n_nz);
        if candidate != Modulus::ZERO {
            return candidate;
        }
    }
}
