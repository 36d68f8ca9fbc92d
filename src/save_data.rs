//! Persisted key material and presignature output.
//!
//! Struct-of-vecs keyed by party index rather than one struct per party,
//! since the harness always needs "this party's own value" plus "every
//! peer's public value" together.

use secrecy::{ExposeSecret, SecretBox};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::curve::{Point, Scalar};
use crate::paillier::keys::{PaillierPublicKey, PaillierSecretKey};
use crate::tools::collections::PartyIdx;
use crate::zkp::AuxiliaryRsaParams;

/// Key material produced by (out-of-scope) distributed key generation and
/// consumed as presign's input.
#[derive(Clone)]
pub struct LocalSaveData {
    pub own_idx: PartyIdx,
    pub threshold: usize,
    /// Each party's Shamir evaluation point, sorted, indexed by `PartyIdx`.
    pub evaluation_points: Vec<Scalar>,
    /// This party's additive secret share `x_i`.
    pub secret_share: SecretBox<Scalar>,
    pub paillier_sk: PaillierSecretKey,
    /// Every party's Paillier public key, including this party's own.
    pub paillier_pks: Vec<PaillierPublicKey>,
    pub aux_params: Vec<AuxiliaryRsaParams>,
    /// Public commitments `X_j = g^{x_j}` for every party.
    pub public_shares: Vec<Point>,
    /// The joint public key `Y`.
    pub public_key: Point,
}

impl LocalSaveData {
    pub fn num_parties(&self) -> usize {
        self.evaluation_points.len()
    }

    pub fn own_paillier_pk(&self) -> &PaillierPublicKey {
        &self.paillier_pks[self.own_idx.as_usize()]
    }

    pub fn own_aux_params(&self) -> &AuxiliaryRsaParams {
        &self.aux_params[self.own_idx.as_usize()]
    }

    /// `W_j = X_j^{lambda_j} = g^{x_j * lambda_j}` for every party `j`
    /// taking part in this run. Public: derivable from each party's
    /// published `X_j` and the (public) evaluation points, so every party
    /// can compute every `W_j` without learning anyone's `w_j`.
    pub fn all_public_w(&self) -> Vec<Point> {
        let signers: Vec<PartyIdx> = (0..self.num_parties()).map(PartyIdx::from_usize).collect();
        (0..self.num_parties())
            .map(|j| {
                let lambda_j = self.lagrange_coefficient_for(PartyIdx::from_usize(j), &signers);
                self.public_shares[j] * lambda_j
            })
            .collect()
    }

    /// This party's own `w_i = x_i * lambda_i`.
    pub fn own_w(&self) -> Scalar {
        let signers: Vec<PartyIdx> = (0..self.num_parties()).map(PartyIdx::from_usize).collect();
        let lambda_i = self.lagrange_coefficient_for(self.own_idx, &signers);
        *self.secret_share.expose_secret() * lambda_i
    }

    /// The Lagrange coefficient of this party's evaluation point at `x=0`
    /// over the given signing subset.
    pub fn lagrange_coefficient(&self, signers: &[PartyIdx]) -> Scalar {
        self.lagrange_coefficient_for(self.own_idx, signers)
    }

    /// The Lagrange coefficient of party `idx`'s evaluation point at `x=0`
    /// over the given signing subset. Public: evaluation points are known
    /// to everyone, so any party can compute any other party's coefficient.
    pub fn lagrange_coefficient_for(&self, idx: PartyIdx, signers: &[PartyIdx]) -> Scalar {
        let own_point = self.evaluation_points[idx.as_usize()];
        let mut num = scalar_one();
        let mut den = scalar_one();
        for &j in signers {
            if j == idx {
                continue;
            }
            let point_j = self.evaluation_points[j.as_usize()];
            num = num * point_j;
            den = den * (point_j - own_point);
        }
        num * den.invert().expect("distinct evaluation points are never equal")
    }
}

/// Builds `n` consistent [`LocalSaveData`] values for a `t`-of-`n` key, as
/// if produced by (out-of-scope) distributed key generation run centrally.
///
/// Used throughout this crate's presign/signing tests in place of a real
/// DKG run. Not a substitute for DKG in production: every party's secret
/// share passes through this single process.
pub fn centralized_keygen(
    n: usize,
    threshold: usize,
    rng: &mut impl rand_core::CryptoRngCore,
) -> Vec<LocalSaveData> {
    assert!(threshold < n, "threshold must leave room for at least one more signer");

    // Random evaluation points and a degree-`threshold` polynomial whose
    // constant term is the secret key `x`.
    let evaluation_points: Vec<Scalar> = (0..n).map(|_| Scalar::random(rng)).collect();
    let poly: Vec<Scalar> = (0..=threshold).map(|_| Scalar::random(rng)).collect();
    let eval = |point: Scalar| -> Scalar {
        let mut acc = Scalar::zero();
        for coeff in poly.iter().rev() {
            acc = acc * point + *coeff;
        }
        acc
    };
    let secret_key = poly[0];
    let public_key = Point::mul_by_generator(&secret_key);

    let secret_shares: Vec<Scalar> = evaluation_points.iter().map(|&p| eval(p)).collect();
    let public_shares: Vec<Point> = secret_shares
        .iter()
        .map(Point::mul_by_generator)
        .collect();

    let paillier_sks: Vec<PaillierSecretKey> = (0..n)
        .map(|_| PaillierSecretKey::random(rng))
        .collect();
    let paillier_pks: Vec<PaillierPublicKey> = paillier_sks
        .iter()
        .map(|sk| sk.public_key().clone())
        .collect();
    let aux_params: Vec<AuxiliaryRsaParams> = (0..n)
        .map(|_| AuxiliaryRsaParams::generate(rng))
        .collect();

    paillier_sks
        .into_iter()
        .enumerate()
        .map(|(i, paillier_sk)| LocalSaveData {
            own_idx: PartyIdx::from_usize(i),
            threshold,
            evaluation_points: evaluation_points.clone(),
            secret_share: SecretBox::new(Box::new(secret_shares[i])),
            paillier_sk,
            paillier_pks: paillier_pks.clone(),
            aux_params: aux_params.clone(),
            public_shares: public_shares.clone(),
            public_key,
        })
        .collect()
}

fn scalar_one() -> Scalar {
    Scalar::from_bytes(&{
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        bytes
    })
    .expect("1 is a valid scalar")
}

/// This party's completed presignature, ready to be combined with a message
/// digest by the online-sign round.
///
/// `big_r_bar_j` and `big_s_j` are the identifiable-abort witnesses `{R̄_j}`
/// and `{S_j}`: kept in the output so a later dispute can be re-litigated
/// without re-running presign, even though the happy path (online-sign)
/// only needs `r_sigma_i`/`k_i`/`big_r`.
#[derive(Clone, Serialize, Deserialize, Zeroize)]
#[zeroize(drop)]
pub struct LocalPresignData {
    /// `r·sigma_i`, already multiplied by the nonce's x-coordinate so the
    /// online-sign round only needs `m·k_i + rsigma_i`.
    pub r_sigma_i: Scalar,
    pub k_i: Scalar,
    #[zeroize(skip)]
    pub big_r: Point,
    /// `R̄_j = R^{k_j}` for every party `j`, keyed by `PartyIdx`.
    #[zeroize(skip)]
    pub big_r_bar_j: Vec<Point>,
    /// `S_j = R^{sigma_j}` for every party `j`; `Π_j S_j` must equal
    /// `public_key` for a valid presignature.
    #[zeroize(skip)]
    pub big_s_j: Vec<Point>,
    #[zeroize(skip)]
    pub public_key: Point,
    /// Number of other parties this presignature was produced with
    /// (`n - 1`), carried for parity with the original `T` field.
    pub t: usize,
}
