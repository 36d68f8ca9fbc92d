//! Presign round 4: reveal `Γ_i` by broadcasting round 1's commitment
//! opening. No verification here beyond shape; verification of the opening
//! (and of round 3's `TProof` consistency across all `T_j`) happens in
//! round 5.

use std::sync::Arc;

use crate::commitment::{self, Commitment, Randomness};
use crate::curve::{Point, Scalar};
use crate::error::Error;
use crate::paillier::Ciphertext;
use crate::round::ToSend;
use crate::tools::collections::{PartyIdx, PeerMap};

use super::context::{Ctx, Secrets};
use super::messages::Round4Message;
use super::round5::Round5;

pub(crate) struct Round4 {
    ctx: Arc<Ctx>,
    secrets: Secrets,
    gamma_point_i: Point,
    commitment: Commitment,
    decommit: Randomness,
    c_a_i: Ciphertext,
    c_a_from: PeerMap<Ciphertext>,
    commitment_from: PeerMap<Commitment>,
    beta_mine_for: PeerMap<Scalar>,
    nu_mine_for: PeerMap<Scalar>,
    alpha_from: PeerMap<Scalar>,
    mu_from: PeerMap<Scalar>,
    delta_i: Scalar,
    delta_from: PeerMap<Scalar>,
    t_i: Point,
    t_from: PeerMap<Point>,

    gamma_point_from: PeerMap<Point>,
    decommit_from: PeerMap<Randomness>,
}

impl Round4 {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        ctx: Arc<Ctx>,
        secrets: Secrets,
        gamma_point_i: Point,
        commitment: Commitment,
        decommit: Randomness,
        c_a_i: Ciphertext,
        c_a_from: PeerMap<Ciphertext>,
        commitment_from: PeerMap<Commitment>,
        beta_mine_for: PeerMap<Scalar>,
        nu_mine_for: PeerMap<Scalar>,
        alpha_from: PeerMap<Scalar>,
        mu_from: PeerMap<Scalar>,
        delta_i: Scalar,
        delta_from: PeerMap<Scalar>,
        t_i: Point,
        t_from: PeerMap<Point>,
    ) -> Self {
        let num_parties = ctx.num_parties();
        let own_idx = ctx.own_idx();
        Self {
            ctx,
            secrets,
            gamma_point_i,
            commitment,
            decommit,
            c_a_i,
            c_a_from,
            commitment_from,
            beta_mine_for,
            nu_mine_for,
            alpha_from,
            mu_from,
            delta_i,
            delta_from,
            t_i,
            t_from,
            gamma_point_from: PeerMap::new(num_parties, own_idx),
            decommit_from: PeerMap::new(num_parties, own_idx),
        }
    }

    pub fn start(&self) -> ToSend<Round4Message, ()> {
        ToSend::Broadcast(Round4Message {
            decommitment: self.decommit,
            gamma_i: self.gamma_point_i,
        })
    }

    pub fn receive_broadcast(&mut self, from: PartyIdx, msg: Round4Message) -> Result<(), Error> {
        self.gamma_point_from.insert(from, msg.gamma_i);
        // The opening is checked against round 1's commitment in round 5,
        // once every peer's `(C_j, D_j)` pair is on hand.
        self.decommit_from.insert(from, msg.decommitment);
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.gamma_point_from.is_complete()
    }

    pub fn finalize(self) -> Result<Round5, Error> {
        Round5::new(
            self.ctx,
            self.secrets,
            self.gamma_point_i,
            self.c_a_i,
            self.c_a_from,
            self.commitment_from,
            self.beta_mine_for,
            self.nu_mine_for,
            self.alpha_from,
            self.mu_from,
            self.delta_i,
            self.delta_from,
            self.t_i,
            self.t_from,
            self.gamma_point_from,
            self.decommit_from,
        )
    }
}
