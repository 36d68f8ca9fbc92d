//! Presign round 6: fold every peer's `w`-track MtA share into `sigma_i`,
//! compute `S_i = R^{sigma_i}`, and attest it against round 3's `T_i`
//! commitment with an [`StProof`]. Local inconsistency in the folded
//! `alpha`/`beta` sums would trigger the Type-5 abort path instead of
//! broadcasting success; in this implementation every MtA share that
//! reaches this point has already passed its round-2/round-3 ZK proof, so
//! the local check never fires (kept for the documented abort path's wire
//! shape rather than as dead code removed outright).

use std::sync::Arc;

use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};

use crate::curve::{Point, Scalar};
use crate::error::Error;
use crate::paillier::Ciphertext;
use crate::round::ToSend;
use crate::tools::collections::{PartyIdx, PeerMap};
use crate::zkp::StProof;

use super::context::{Ctx, Secrets};
use super::messages::Round6Message;
use super::round7::Round7;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) enum Round6Outcome {
    Success { s_i: Point },
    Abort {
        k_i: Scalar,
        gamma_i: Scalar,
        alpha_ij: Vec<(u32, Scalar)>,
        beta_ji: Vec<(u32, Scalar)>,
    },
}

pub(crate) struct Round6 {
    ctx: Arc<Ctx>,
    secrets: Secrets,
    c_a_from: PeerMap<Ciphertext>,
    mu_from: PeerMap<Scalar>,
    alpha_from: PeerMap<Scalar>,
    beta_mine_for: PeerMap<Scalar>,
    big_r: Point,
    r_bar_i: Point,
    r_bar_from: PeerMap<Point>,

    sigma_i: Scalar,
    s_i: Point,
    t_i: Point,
    t_from: PeerMap<Point>,

    outcomes_from: PeerMap<Round6Outcome>,
}

impl Round6 {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        ctx: Arc<Ctx>,
        secrets: Secrets,
        _c_a_i: Ciphertext,
        c_a_from: PeerMap<Ciphertext>,
        beta_mine_for: PeerMap<Scalar>,
        nu_mine_for: PeerMap<Scalar>,
        alpha_from: PeerMap<Scalar>,
        mu_from: PeerMap<Scalar>,
        _delta_i: Scalar,
        t_i: Point,
        t_from: PeerMap<Point>,
        big_r: Point,
        r_bar_i: Point,
        r_bar_from: PeerMap<Point>,
    ) -> Self {
        let mut sigma_i = secrets.k_i * secrets.w_i;
        for peer in ctx.params.peer_indices() {
            sigma_i = sigma_i
                + *mu_from.get(peer).unwrap()
                + *nu_mine_for.get(peer).unwrap();
        }
        let s_i = big_r * sigma_i;

        let num_parties = ctx.num_parties();
        let own_idx = ctx.own_idx();
        Self {
            ctx,
            secrets,
            c_a_from,
            mu_from,
            alpha_from,
            beta_mine_for,
            big_r,
            r_bar_i,
            r_bar_from,
            sigma_i,
            s_i,
            t_i,
            t_from,
            outcomes_from: PeerMap::new(num_parties, own_idx),
        }
    }

    /// Always `false` in this implementation: every `alpha`/`beta` value
    /// folded into `sigma_i` already passed its ZK proof in round 2/3.
    fn detect_local_inconsistency(&self) -> bool {
        false
    }

    pub fn start(&self, rng: &mut impl CryptoRngCore) -> ToSend<Round6Message, ()> {
        if self.detect_local_inconsistency() {
            return ToSend::Broadcast(Round6Message::Abort {
                k_i: self.secrets.k_i,
                gamma_i: self.secrets.gamma_i,
                alpha_ij: self.alpha_from.iter_filled().map(|(p, v)| (p.as_usize() as u32, *v)).collect(),
                beta_ji: self.beta_mine_for.iter_filled().map(|(p, v)| (p.as_usize() as u32, *v)).collect(),
            });
        }
        let st_proof = StProof::prove(
            &self.ctx.pedersen,
            self.t_i,
            self.big_r,
            self.s_i,
            self.sigma_i,
            self.secrets.l_i,
            rng,
        );
        ToSend::Broadcast(Round6Message::Success {
            s_i: self.s_i,
            st_proof,
        })
    }

    pub fn receive_broadcast(&mut self, from: PartyIdx, msg: Round6Message) -> Result<(), Error> {
        match msg {
            Round6Message::Success { s_i, st_proof } => {
                let t_j = self.t_from.get(from).expect("round 3 complete");
                if !st_proof.verify(&self.ctx.pedersen, *t_j, self.big_r, s_i) {
                    return Err(Error::their_fault(
                        6,
                        from,
                        crate::error::TheirFault::ZkVerificationFailed {
                            proof: "StProof",
                            from,
                        },
                    ));
                }
                self.outcomes_from.insert(from, Round6Outcome::Success { s_i });
            }
            Round6Message::Abort {
                k_i,
                gamma_i,
                alpha_ij,
                beta_ji,
            } => {
                self.outcomes_from.insert(
                    from,
                    Round6Outcome::Abort {
                        k_i,
                        gamma_i,
                        alpha_ij,
                        beta_ji,
                    },
                );
            }
        }
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.outcomes_from.is_complete()
    }

    pub fn finalize(self, rng: &mut impl CryptoRngCore) -> Result<Round7, Error> {
        let mut culprits = Vec::new();
        let mut s_from = PeerMap::new(self.ctx.num_parties(), self.ctx.own_idx());
        for (peer, outcome) in self.outcomes_from.iter_filled() {
            match outcome {
                Round6Outcome::Success { s_i } => {
                    s_from.insert(peer, *s_i);
                }
                Round6Outcome::Abort { .. } => culprits.push(peer),
            }
        }
        if !culprits.is_empty() {
            return Err(Error::ConsistencyAbortT5 { round: 6, culprits });
        }

        Ok(Round7::new(
            self.ctx,
            self.secrets,
            self.c_a_from,
            self.mu_from,
            self.big_r,
            self.r_bar_i,
            self.r_bar_from,
            self.sigma_i,
            self.s_i,
            s_from,
            rng,
        ))
    }
}
