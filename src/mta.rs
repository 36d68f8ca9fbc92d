//! Multiplicative-to-additive (MtA) conversion.
//!
//! Converts a multiplicative relationship `a * b` held across two parties
//! into additive shares `alpha + beta = a * b`, using Alice's Paillier
//! ciphertext of `a` and Bob's homomorphic response. Presign uses this
//! twice per peer pair per round: once for `k_i * gamma_j` (round 2,
//! feeding `delta_i`) and once for `k_i * w_j` (round 2's witnessed variant,
//! feeding `sigma_i`).

use rand_core::CryptoRngCore;

use crate::curve::{Point, Scalar};
use crate::paillier::keys::{Modulus, PaillierPublicKey, PaillierSecretKey};
use crate::paillier::ciphertext::random_unit;
use crate::zkp::aux::AuxiliaryRsaParams;
use crate::zkp::proof_bob::{ProofBob, ProofBobStatement, ProofBobWc};

pub(crate) fn scalar_to_modulus(s: Scalar) -> Modulus {
    Modulus::from_be_slice(&{
        let mut padded = [0u8; 256];
        padded[224..].copy_from_slice(&s.to_bytes());
        padded
    })
}

pub(crate) fn modulus_to_scalar(m: &Modulus) -> Scalar {
    let bytes = m.to_be_bytes();
    Scalar::from_digest_bytes(&bytes[224..].try_into().unwrap())
}

// Alice's first move (encrypt `k_i`, prove it small) is built directly in
// `presign::round1::Round1::new`/`start` rather than through a helper here:
// round 1 encrypts `k_i` once but proves it once per peer, each time against
// that peer's own auxiliary modulus, so there is no single (ciphertext,
// proof) pair this module could hand back as a unit.

/// Bob's response to an `AliceInit`: samples `beta`, folds `a*b + beta` into
/// a new ciphertext `alice` can decrypt, and proves the response well-formed.
pub struct BobResponse {
    pub c1: crate::paillier::Ciphertext,
    pub proof: ProofBob,
    pub beta: Scalar,
    b_mod: Modulus,
    beta_prime: Modulus,
    s_rand: Modulus,
}

pub fn bob_mid(
    pk_alice: &PaillierPublicKey,
    aux_alice: &AuxiliaryRsaParams,
    alice_ciphertext: &crate::paillier::Ciphertext,
    b: Scalar,
    rng: &mut impl CryptoRngCore,
) -> BobResponse {
    let b_mod = scalar_to_modulus(b);
    let beta_prime = random_unit(pk_alice.modulus(), rng);
    let s_rand = random_unit(pk_alice.modulus(), rng);

    let c_ab = alice_ciphertext.homomorphic_mul_scalar(pk_alice, &b_mod);
    let enc_beta_prime = crate::paillier::Ciphertext::encrypt_with_randomness(pk_alice, &beta_prime, &s_rand);
    let c1 = c_ab.homomorphic_add(pk_alice, &enc_beta_prime);

    // beta = -beta' mod q, so that alpha + beta = a*b once Alice decrypts.
    let beta = -modulus_to_scalar(&beta_prime);

    let statement = ProofBobStatement {
        pk_alice,
        aux: aux_alice,
        c_a: alice_ciphertext.value(),
        c1: c1.value(),
    };
    let proof = ProofBob::prove(&statement, &b_mod, &beta_prime, &s_rand, rng);

    BobResponse {
        c1,
        proof,
        beta,
        b_mod,
        beta_prime,
        s_rand,
    }
}

/// Like [`bob_mid`] but additionally proves `b` corresponds to a public
/// point `target = base^b`, as required when the witness is `w_j` (round 2,
/// `base = g`, `target = W_j`) or `sigma_j` (round 6, `base = R`,
/// `target = S_j`), not an ephemeral value known only to Bob.
///
/// Reuses the exact Paillier-side randomness `bob_mid` would have drawn, so
/// that the single [`ProofBobWc`] is the only proof sent (no separate plain
/// `ProofBob` alongside it) while still covering the same ciphertext `c1`.
pub fn bob_mid_wc(
    pk_alice: &PaillierPublicKey,
    aux_alice: &AuxiliaryRsaParams,
    alice_ciphertext: &crate::paillier::Ciphertext,
    b: Scalar,
    base: Point,
    rng: &mut impl CryptoRngCore,
) -> (BobResponse, ProofBobWc) {
    let response = bob_mid(pk_alice, aux_alice, alice_ciphertext, b, rng);
    let statement = ProofBobStatement {
        pk_alice,
        aux: aux_alice,
        c_a: alice_ciphertext.value(),
        c1: response.c1.value(),
    };
    let proof_wc = ProofBobWc::prove(
        &statement,
        base,
        &response.b_mod,
        &response.beta_prime,
        &response.s_rand,
        rng,
    );
    (response, proof_wc)
}

/// Alice's final step: decrypt Bob's response to recover her additive share
/// `alpha`, such that `alpha + beta = a * b mod q`.
pub fn alice_end(sk_alice: &PaillierSecretKey, c1: &crate::paillier::Ciphertext) -> Scalar {
    let plaintext = sk_alice.decrypt(c1.value());
    modulus_to_scalar(&plaintext)
}
