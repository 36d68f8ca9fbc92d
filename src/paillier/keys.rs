//! Paillier key generation and the textbook encrypt/decrypt primitives.
//!
//! Standalone public/secret key types (rather than free functions) over
//! concrete 1024/2048/4096-bit moduli — see DESIGN.md for why this crate
//! hard-codes sizes instead of carrying a generic modulus-size parameter.

use crypto_bigint::{CheckedSub, Gcd, NonZero, U1024, U2048, U4096};
use crypto_primes::RandomPrimeWithRng;
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// One of the two RSA primes backing a Paillier modulus.
pub type Prime = U1024;
/// The Paillier modulus `n = p*q`.
pub type Modulus = U2048;
/// `n^2`, the ciphertext group's modulus.
pub type WideModulus = U4096;

fn widen(x: &Modulus) -> WideModulus {
    let mut bytes = [0u8; 512];
    bytes[256..].copy_from_slice(&x.to_be_bytes());
    WideModulus::from_be_slice(&bytes)
}

fn narrow(x: &WideModulus) -> Modulus {
    let bytes = x.to_be_bytes();
    Modulus::from_be_slice(&bytes[256..])
}

fn mod_pow_wide(base: &WideModulus, exp: &Modulus, modulus: &NonZero<WideModulus>) -> WideModulus {
    let mut result = WideModulus::ONE;
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

/// The public half of a Paillier keypair: `n`, and `n^2` cached for
/// ciphertext-space arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaillierPublicKey {
    n: Modulus,
    n2: WideModulus,
}

impl PaillierPublicKey {
    pub fn modulus(&self) -> &Modulus {
        &self.n
    }

    pub fn modulus_squared(&self) -> &WideModulus {
        &self.n2
    }

    /// `(1 + m*n) * r^n mod n^2`, the textbook Paillier encryption with
    /// generator `g = n+1`.
    pub fn encrypt_with_randomness(&self, m: &Modulus, r: &Modulus) -> WideModulus {
        let n2 = NonZero::new(self.n2).expect("n^2 is nonzero");
        let gm = widen(&self.n).mul_mod(&widen(m), &n2).wrapping_add(&WideModulus::ONE);
        let r_wide = widen(r);
        let rn = mod_pow_wide(&r_wide, &self.n, &n2);
        gm.mul_mod(&rn, &n2)
    }

    /// Homomorphic addition of two ciphertexts: multiplication mod `n^2`.
    pub fn add(&self, c1: &WideModulus, c2: &WideModulus) -> WideModulus {
        let n2 = NonZero::new(self.n2).expect("n^2 is nonzero");
        c1.mul_mod(c2, &n2)
    }

    /// Homomorphic scalar multiplication: modular exponentiation by `k`.
    pub fn mul_scalar(&self, c: &WideModulus, k: &Modulus) -> WideModulus {
        let n2 = NonZero::new(self.n2).expect("n^2 is nonzero");
        mod_pow_wide(c, k, &n2)
    }
}

/// The secret half of a Paillier keypair.
#[derive(Debug, Clone, Zeroize)]
#[zeroize(drop)]
pub struct PaillierSecretKey {
    p: Prime,
    q: Prime,
    #[zeroize(skip)]
    public: PaillierPublicKey,
    lambda: Modulus,
    mu: Modulus,
}

impl PaillierSecretKey {
    /// Generates a fresh keypair from two random 1024-bit safe primes, per
    /// GG20's recommended Paillier parameter size (2048-bit modulus).
    pub fn random(rng: &mut impl CryptoRngCore) -> Self {
        loop {
            let p = Prime::safe_prime_with_rng(rng, Prime::BITS);
            let q = Prime::safe_prime_with_rng(rng, Prime::BITS);
            if p == q {
                continue;
            }
            if let Some(sk) = Self::from_primes(p, q) {
                return sk;
            }
        }
    }

    fn from_primes(p: Prime, q: Prime) -> Option<Self> {
        let n = widen_mul(&p, &q);
        let n2 = widen(&n);
        let public = PaillierPublicKey { n, n2 };

        let one = Modulus::ONE;
        let p_minus_1 = narrow(&widen(&p)).checked_sub(&one).into_option()?;
        let q_minus_1 = narrow(&widen(&q)).checked_sub(&one).into_option()?;
        // lambda = lcm(p-1, q-1) = (p-1)(q-1) / gcd(p-1, q-1)
        let gcd = p_minus_1.gcd(&q_minus_1);
        let gcd = NonZero::new(gcd).into_option()?;
        let lambda = p_minus_1.checked_mul(&q_minus_1).into_option()?.checked_div(&gcd).into_option()?;

        let n2_nz = NonZero::new(n2).into_option()?;
        let u = mod_pow_wide(&widen(&n).wrapping_add(&WideModulus::ONE), &lambda, &n2_nz);
        let l_u = l_function(&u, &n);
        let n_nz = NonZero::new(n).into_option()?;
        let mu = l_u.inv_mod(&n_nz.into()).into_option()?;

        Some(Self {
            p,
            q,
            public,
            lambda,
            mu,
        })
    }

    pub fn public_key(&self) -> &PaillierPublicKey {
        &self.public
    }

    /// `L(c^lambda mod n^2) * mu mod n`.
    pub fn decrypt(&self, c: &WideModulus) -> Modulus {
        let n2 = NonZero::new(self.public.n2).expect("n^2 is nonzero");
        let u = mod_pow_wide(c, &self.lambda, &n2);
        let l_u = l_function(&u, &self.public.n);
        let n_nz = NonZero::new(self.public.n).expect("n is nonzero");
        l_u.mul_mod(&self.mu, &n_nz)
    }
}

/// `L(x) = (x - 1) / n`, Paillier's linearization function.
fn l_function(x: &WideModulus, n: &Modulus) -> Modulus {
    let x_minus_1 = x.wrapping_sub(&WideModulus::ONE);
    let n_wide = widen(n);
    let n_wide_nz = NonZero::new(n_wide).expect("n nonzero");
    narrow(&x_minus_1.checked_div(&n_wide_nz).expect("n divides L's argument by construction"))
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
