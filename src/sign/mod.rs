//! Online sign: the one-round GG20 phase that binds a presignature to a
//! message digest.
//!
//! This is the smallest of the two phases and the natural consumer of
//! presign's output, so it is implemented here directly rather than treated
//! as an external collaborator: a `Context` built from a presignature and a
//! message, a single round computing a local share of `s`, and a finalize
//! step that sums the shares and recovers a signature.

use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};

use crate::curve::{RecoverableSignature, Scalar};
use crate::error::{Error, MyFault, TheirFault};
use crate::save_data::LocalPresignData;
use crate::tools::collections::{PartyIdx, PeerMap};
use crate::tools::wire::ValidateBasic;

/// The only message online-sign exchanges: each party's share of the
/// aggregate `s`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Round1Message {
    pub s_i: Scalar,
}

impl ValidateBasic for Round1Message {
    fn validate_basic(&self) -> bool {
        true
    }
}

/// Drives one party through online-sign. Construct with [`SignParty::new`],
/// broadcast [`SignParty::start`]'s output, fold every peer's
/// [`Round1Message`] in with [`SignParty::receive`], then call
/// [`SignParty::finalize`] once [`SignParty::is_complete`] holds.
pub struct SignParty {
    presign: LocalPresignData,
    message: Scalar,
    s_i: Scalar,
    s_from: PeerMap<Scalar>,
}

impl SignParty {
    /// `presign` is this party's own completed presignature; `message` is
    /// the digest to sign, already reduced mod the curve order.
    pub fn new(
        own_idx: PartyIdx,
        num_parties: usize,
        presign: LocalPresignData,
        message: Scalar,
    ) -> Self {
        // s_i = m*k_i + r*sigma_i; the presignature already stores r*sigma_i
        // as `r_sigma_i`, so this is the full local share in one step.
        let s_i = message * presign.k_i + presign.r_sigma_i;
        Self {
            presign,
            message,
            s_i,
            s_from: PeerMap::new(num_parties, own_idx),
        }
    }

    pub fn start(&self) -> Round1Message {
        Round1Message { s_i: self.s_i }
    }

    pub fn receive(&mut self, from: PartyIdx, msg: Round1Message) -> Result<(), Error> {
        if !msg.validate_basic() {
            return Err(Error::their_fault(
                1,
                from,
                TheirFault::InvalidMessage {
                    from,
                    reason: "online-sign message failed basic shape validation",
                },
            ));
        }
        self.s_from.insert(from, msg.s_i);
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.s_from.is_complete()
    }

    /// Sums every party's `s_i`, low-S normalizes, and verifies the result
    /// under the joint public key before returning it. A non-verifying
    /// aggregate is an internal bug (every round-2..7 proof already bound
    /// `k_i`/`sigma_i` to consistent public commitments), not a named-party
    /// fault.
    pub fn finalize(self) -> Result<RecoverableSignature, Error> {
        let mut s = self.s_i;
        for (_, s_j) in self.s_from.iter_filled() {
            s = s + *s_j;
        }
        let r = self
            .presign
            .big_r
            .x_as_scalar()
            .expect("presign round 7 never finalizes with an identity R");

        RecoverableSignature::recover(r, s, self.presign.public_key, self.message).ok_or_else(|| {
            Error::my_fault(
                1,
                MyFault::Internal(
                    "aggregated online-sign share does not verify under the joint public key",
                ),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    use super::*;
    use crate::curve::Point;
    use crate::save_data::LocalPresignData;
    use crate::tools::collections::PartyIdx;

    /// Builds a consistent set of `n` presignatures directly (bypassing the
    /// seven-round protocol) purely to exercise online-sign's aggregation
    /// math in isolation; presign's own loopback test
    /// (`tests/loopback.rs`) is what actually exercises round 1-7.
    fn fake_presignatures(n: usize, rng: &mut ChaCha20Rng) -> (Point, Vec<LocalPresignData>) {
        let k: Vec<Scalar> = (0..n).map(|_| Scalar::random(rng)).collect();
        let sigma: Vec<Scalar> = (0..n).map(|_| Scalar::random(rng)).collect();

        let mut sum_k = Scalar::zero();
        for &k_i in &k {
            sum_k = sum_k + k_i;
        }
        let big_r = Point::mul_by_generator(&sum_k.invert().unwrap());
        let r = big_r.x_as_scalar().unwrap();

        let mut sum_sigma = Scalar::zero();
        for &s in &sigma {
            sum_sigma = sum_sigma + s;
        }
        let public_key = big_r * sum_sigma;

        let big_s_j: Vec<Point> = sigma.iter().map(|&s| big_r * s).collect();
        let big_r_bar_j: Vec<Point> = k.iter().map(|&k_i| big_r * k_i).collect();

        let datas = (0..n)
            .map(|i| LocalPresignData {
                r_sigma_i: r * sigma[i],
                k_i: k[i],
                big_r,
                big_r_bar_j: big_r_bar_j.clone(),
                big_s_j: big_s_j.clone(),
                public_key,
                t: n - 1,
            })
            .collect();
        (public_key, datas)
    }

    #[test]
    fn aggregates_and_verifies() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let n = 4;
        let (public_key, presigns) = fake_presignatures(n, &mut rng);
        let message = Scalar::random(&mut rng);

        let mut parties: Vec<SignParty> = presigns
            .into_iter()
            .enumerate()
            .map(|(i, data)| SignParty::new(PartyIdx::from_usize(i), n, data, message))
            .collect();

        let shares: Vec<Round1Message> = parties.iter().map(|p| p.start()).collect();

        for (i, party) in parties.iter_mut().enumerate() {
            for (j, share) in shares.iter().enumerate() {
                if i != j {
                    party
                        .receive(PartyIdx::from_usize(j), *share)
                        .expect("well-formed share");
                }
            }
        }

        let mut signatures = Vec::new();
        for party in parties {
            assert!(party.is_complete());
            signatures.push(party.finalize().expect("aggregate verifies under Y"));
        }

        let first = signatures[0];
        for sig in &signatures[1..] {
            assert_eq!(sig.r.to_bytes(), first.r.to_bytes());
            assert_eq!(sig.s.to_bytes(), first.s.to_bytes());
            assert_eq!(sig.recovery_id, first.recovery_id);
        }

        let (k256_sig, rec_id) = first.to_backend();
        use k256::ecdsa::signature::hazmat::PrehashVerifier;
        use k256::ecdsa::VerifyingKey;
        let vkey = VerifyingKey::from_affine(public_key.to_affine()).unwrap();
        vkey.verify_prehash(&message.to_bytes(), &k256_sig).unwrap();
        let recovered =
            VerifyingKey::recover_from_prehash(&message.to_bytes(), &k256_sig, rec_id).unwrap();
        assert_eq!(recovered, vkey);
    }
}
