//! ProofBob / ProofBobWC: Bob's half of an MtA exchange.
//!
//! Bob receives Alice's ciphertext `cA = Enc(a; rA)` and replies with
//! `c1 = cA^b * Enc(beta; s) mod n_A^2` (so Alice can decrypt
//! `alpha = a*b + beta`). `ProofBob` attests `c1` is well-formed w.r.t. a
//! known `b`; `ProofBobWC` ("with check") additionally binds `b` to a public
//! point `B = g^b`, used in round 3's witnessed MtA for `w_i` and in round 6
//! for `sigma_i`.
//!
//! A peer verifies the appropriate variant before folding the recovered
//! `alpha`/`mu` share into its own `delta_i`/`sigma_i` accumulator.

use crypto_bigint::NonZero;
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};

use crate::curve::{Point, Scalar};
use crate::paillier::keys::{Modulus, PaillierPublicKey, WideModulus};
use crate::tools::hashing::Chain;
use crate::zkp::aux::{mod_pow, random_unit, AuxiliaryRsaParams};

pub struct ProofBobStatement<'a> {
    pub pk_alice: &'a PaillierPublicKey,
    pub aux: &'a AuxiliaryRsaParams,
    pub c_a: &'a WideModulus,
    pub c1: &'a WideModulus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofBob {
    z: Modulus,
    z_prime: Modulus,
    t: Modulus,
    v: WideModulus,
    w: Modulus,
    s: Modulus,
    s1: Modulus,
    s2: Modulus,
    t1: Modulus,
    t2: Modulus,
}

impl ProofBob {
    #[allow(clippy::too_many_arguments)]
    pub fn prove(
        statement: &ProofBobStatement,
        b: &Modulus,
        beta: &Modulus,
        s_rand: &Modulus,
        rng: &mut impl CryptoRngCore,
    ) -> Self {
        let n_nz = NonZero::new(*statement.pk_alice.modulus()).expect("n nonzero");
        let n_tilde_nz = NonZero::new(statement.aux.n_tilde).expect("n_tilde nonzero");

        let alpha = random_unit(&n_nz, rng);
        let mu = random_unit(&n_nz, rng);
        let gamma = random_unit(&n_tilde_nz, rng);
        let rho = random_unit(&n_tilde_nz, rng);
        let rho_prime = random_unit(&n_tilde_nz, rng);
        let sigma = random_unit(&n_tilde_nz, rng);
        let tau = random_unit(&n_tilde_nz, rng);

        let z = statement.aux.commit(b, &rho);
        let z_prime = statement.aux.commit(&alpha, &rho_prime);
        let t = statement.aux.commit(beta, &sigma);
        let v = statement.pk_alice.add(
            &statement.pk_alice.mul_scalar(statement.c_a, &alpha),
            &statement.pk_alice.encrypt_with_randomness(&reduce_to_modulus(&gamma, &n_nz), &mu),
        );
        let w = statement.aux.commit(&gamma, &tau);

        let e = challenge(statement.c_a, statement.c1, &z, &z_prime, &t, &v, &w);

        let s = mod_pow(s_rand, &e, &n_nz).mul_mod(&mu, &n_nz);
        let s1 = alpha.wrapping_add(&e.checked_mul(b).unwrap_or(Modulus::ZERO));
        let s2 = rho_prime.wrapping_add(&e.checked_mul(&rho).unwrap_or(Modulus::ZERO));
        let t1 = gamma.wrapping_add(&e.checked_mul(beta).unwrap_or(Modulus::ZERO));
        let t2 = tau.wrapping_add(&e.checked_mul(&sigma).unwrap_or(Modulus::ZERO));

        Self {
            z,
            z_prime,
            t,
            v,
            w,
            s,
            s1,
            s2,
            t1,
            t2,
        }
    }

    pub fn verify(&self, statement: &ProofBobStatement) -> bool {
        let e = challenge(
            statement.c_a,
            statement.c1,
            &self.z,
            &self.z_prime,
            &self.t,
            &self.v,
            &self.w,
        );
        let n_nz = NonZero::new(*statement.pk_alice.modulus()).expect("n nonzero");
        let n_tilde_nz = NonZero::new(statement.aux.n_tilde).expect("n_tilde nonzero");

        let pedersen_lhs = statement.aux.commit(&self.s1, &self.s2);
        let pedersen_rhs = mod_pow(&self.z, &e, &n_tilde_nz).mul_mod(&self.z_prime, &n_tilde_nz);
        let pedersen_consistent = pedersen_lhs == pedersen_rhs;

        let ciphertext_lhs = statement.pk_alice.add(
            &statement.pk_alice.mul_scalar(statement.c_a, &self.s1),
            &statement
                .pk_alice
                .encrypt_with_randomness(&reduce_to_modulus(&self.t1, &n_nz), &self.s),
        );
        let ciphertext_rhs = statement.pk_alice.add(&statement.pk_alice.mul_scalar(statement.c1, &e), &self.v);
        let ciphertext_consistent = ciphertext_lhs == ciphertext_rhs;

        pedersen_consistent && ciphertext_consistent
    }
}

fn reduce_to_modulus(x: &Modulus, n: &NonZero<Modulus>) -> Modulus {
    *x % *n
}

/// [`ProofBob`] plus a binding of the witness `b` to a public point
/// `target = base^b`, so the recipient can check the MtA exchange was
/// performed against the same `b` that appears elsewhere as a public
/// commitment (e.g. `W_i` in round 3, `S_i` in round 6). Shares the same
/// first-move `alpha` between the Paillier-side and curve-side responses
/// (`s1` answers both `z_prime`/`v` *and* `u = base^alpha`), which is what
/// actually binds the two worlds together — a proof that used independent
/// randomness for each half would verify without the witnesses matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofBobWc {
    z: Modulus,
    z_prime: Modulus,
    t: Modulus,
    v: WideModulus,
    w: Modulus,
    u: Point,
    s: Modulus,
    s1: Modulus,
    s2: Modulus,
    t1: Modulus,
    t2: Modulus,
}

impl ProofBobWc {
    #[allow(clippy::too_many_arguments)]
    pub fn prove(
        statement: &ProofBobStatement,
        base: Point,
        b: &Modulus,
        beta: &Modulus,
        s_rand: &Modulus,
        rng: &mut impl CryptoRngCore,
    ) -> Self {
        let n_nz = NonZero::new(*statement.pk_alice.modulus()).expect("n nonzero");
        let n_tilde_nz = NonZero::new(statement.aux.n_tilde).expect("n_tilde nonzero");

        let alpha = random_unit(&n_nz, rng);
        let mu = random_unit(&n_nz, rng);
        let gamma = random_unit(&n_tilde_nz, rng);
        let rho = random_unit(&n_tilde_nz, rng);
        let rho_prime = random_unit(&n_tilde_nz, rng);
        let sigma = random_unit(&n_tilde_nz, rng);
        let tau = random_unit(&n_tilde_nz, rng);

        let z = statement.aux.commit(b, &rho);
        let z_prime = statement.aux.commit(&alpha, &rho_prime);
        let t = statement.aux.commit(beta, &sigma);
        let v = statement.pk_alice.add(
            &statement.pk_alice.mul_scalar(statement.c_a, &alpha),
            &statement
                .pk_alice
                .encrypt_with_randomness(&reduce_to_modulus(&gamma, &n_nz), &mu),
        );
        let w = statement.aux.commit(&gamma, &tau);
        let alpha_scalar = Scalar::from_wide_bytes_mod_q(&alpha.to_be_bytes());
        let u = base * alpha_scalar;

        let e = challenge_wc(statement.c_a, statement.c1, &z, &z_prime, &t, &v, &w, &u);

        let s = mod_pow(s_rand, &e, &n_nz).mul_mod(&mu, &n_nz);
        let s1 = alpha.wrapping_add(&e.checked_mul(b).unwrap_or(Modulus::ZERO));
        let s2 = rho_prime.wrapping_add(&e.checked_mul(&rho).unwrap_or(Modulus::ZERO));
        let t1 = gamma.wrapping_add(&e.checked_mul(beta).unwrap_or(Modulus::ZERO));
        let t2 = tau.wrapping_add(&e.checked_mul(&sigma).unwrap_or(Modulus::ZERO));

        Self {
            z,
            z_prime,
            t,
            v,
            w,
            u,
            s,
            s1,
            s2,
            t1,
            t2,
        }
    }

    pub fn verify(&self, statement: &ProofBobStatement, base: Point, target: Point) -> bool {
        let e = challenge_wc(
            statement.c_a,
            statement.c1,
            &self.z,
            &self.z_prime,
            &self.t,
            &self.v,
            &self.w,
            &self.u,
        );
        let n_nz = NonZero::new(*statement.pk_alice.modulus()).expect("n nonzero");
        let n_tilde_nz = NonZero::new(statement.aux.n_tilde).expect("n_tilde nonzero");

        let paillier_lhs = statement.aux.commit(&self.s1, &self.s2);
        let paillier_rhs = mod_pow(&self.z, &e, &n_tilde_nz).mul_mod(&self.z_prime, &n_tilde_nz);
        let paillier_consistent = paillier_lhs == paillier_rhs;

        let ciphertext_lhs = statement.pk_alice.add(
            &statement.pk_alice.mul_scalar(statement.c_a, &self.s1),
            &statement
                .pk_alice
                .encrypt_with_randomness(&reduce_to_modulus(&self.t1, &n_nz), &self.s),
        );
        let ciphertext_rhs = statement.pk_alice.add(&statement.pk_alice.mul_scalar(statement.c1, &e), &self.v);
        let ciphertext_consistent = ciphertext_lhs == ciphertext_rhs;

        let s1_scalar = Scalar::from_wide_bytes_mod_q(&self.s1.to_be_bytes());
        let e_scalar = Scalar::from_wide_bytes_mod_q(&e.to_be_bytes());
        let curve_consistent = base * s1_scalar == self.u + target * e_scalar;

        paillier_consistent && ciphertext_consistent && curve_consistent
    }
}

#[allow(clippy::too_many_arguments)]
fn challenge_wc(
    c_a: &WideModulus,
    c1: &WideModulus,
    z: &Modulus,
    z_prime: &Modulus,
    t: &Modulus,
    v: &WideModulus,
    w: &Modulus,
    u: &Point,
) -> Modulus {
    let digest = Chain::new("gg20-presign/proof-bob-wc")
        .chain_bytes(&c_a.to_be_bytes())
        .chain_bytes(&c1.to_be_bytes())
        .chain_bytes(&z.to_be_bytes())
        .chain_bytes(&z_prime.to_be_bytes())
        .chain_bytes(&t.to_be_bytes())
        .chain_bytes(&v.to_be_bytes())
        .chain_bytes(&w.to_be_bytes())
        .chain(u)
        .finalize_to_bytes();
    Modulus::from_be_slice(&{
        let mut padded = [0u8; 256];
        padded[224..].copy_from_slice(&digest);
        padded
    })
}

fn challenge(
    c_a: &WideModulus,
    c1: &WideModulus,
    z: &Modulus,
    z_prime: &Modulus,
    t: &Modulus,
    v: &WideModulus,
    w: &Modulus,
) -> Modulus {
    let digest = Chain::new("gg20-presign/proof-bob")
        .chain_bytes(&c_a.to_be_bytes())
        .chain_bytes(&c1.to_be_bytes())
        .chain_bytes(&z.to_be_bytes())
        .chain_bytes(&z_prime.to_be_bytes())
        .chain_bytes(&t.to_be_bytes())
        .chain_bytes(&v.to_be_bytes())
        .chain_bytes(&w.to_be_bytes())
        .finalize_to_bytes();
    Modulus::from_be_slice(&{
        let mut padded = [0u8; 256];
        padded[224..].copy_from_slice(&digest);
        padded
    })
}
