//! Presign round 2: for every peer, answer their round-1 MtA ciphertext as
//! Bob twice — once with witness `gamma_i` (feeding `delta_i`) and once
//! with witness `w_i` bound to the public point `W_i` (feeding `sigma_i`).

use std::sync::Arc;

use rand_core::CryptoRngCore;

use crate::commitment::{Commitment, Randomness};
use crate::curve::{Point, Scalar};
use crate::error::Error;
use crate::mta;
use crate::paillier::Ciphertext;
use crate::round::ToSend;
use crate::tools::collections::{PartyIdx, PeerMap};
use crate::zkp::{ProofBob, ProofBobWc};

use super::context::{Ctx, Secrets};
use super::messages::Round2Message;
use super::round3::Round3;

pub(crate) struct Round2 {
    ctx: Arc<Ctx>,
    secrets: Secrets,
    gamma_point_i: Point,
    commitment: Commitment,
    decommit: Randomness,
    c_a_i: Ciphertext,
    c_a_from: PeerMap<Ciphertext>,
    commitment_from: PeerMap<Commitment>,

    /// My Bob-side additive shares, one pair per peer `j` (gamma-track,
    /// w-track), computed while answering `j`'s round-1 ciphertext.
    beta_mine_for: PeerMap<Scalar>,
    nu_mine_for: PeerMap<Scalar>,

    /// Peers' Bob responses to *my* round-1 ciphertext, collected this
    /// round.
    c1_from: PeerMap<Ciphertext>,
    c2_from: PeerMap<Ciphertext>,
    proof_bob_from: PeerMap<ProofBob>,
    proof_bob_wc_from: PeerMap<ProofBobWc>,
}

impl Round2 {
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
        _rng: &mut impl CryptoRngCore,
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
            beta_mine_for: PeerMap::new(num_parties, own_idx),
            nu_mine_for: PeerMap::new(num_parties, own_idx),
            c1_from: PeerMap::new(num_parties, own_idx),
            c2_from: PeerMap::new(num_parties, own_idx),
            proof_bob_from: PeerMap::new(num_parties, own_idx),
            proof_bob_wc_from: PeerMap::new(num_parties, own_idx),
        }
    }

    /// For every peer, compute the two Bob responses to their round-1
    /// ciphertext and emit a direct message carrying both. `ProofBob` and
    /// `ProofBobWc` are built using *the recipient's* auxiliary modulus,
    /// mirroring round 1's P2P range proof: the recipient is the one who
    /// verifies (in their own round 3), so the statement must be built
    /// against the aux parameters they will check it with.
    pub fn start(&mut self, rng: &mut impl CryptoRngCore) -> ToSend<(), Round2Message> {
        let own_big_w = self.ctx.own_big_w();
        let mut direct = PeerMap::new(self.ctx.num_parties(), self.ctx.own_idx());
        for peer in self.ctx.params.peer_indices() {
            let peer_pk = self.ctx.save_data.paillier_pks[peer.as_usize()].clone();
            let peer_aux = self.ctx.save_data.aux_params[peer.as_usize()].clone();
            let peer_ciphertext = self
                .c_a_from
                .get(peer)
                .expect("round 1 completed before round 2 starts")
                .clone();

            let response = mta::bob_mid(
                &peer_pk,
                &peer_aux,
                &peer_ciphertext,
                self.secrets.gamma_i,
                rng,
            );
            let (wc_response, proof_wc) = mta::bob_mid_wc(
                &peer_pk,
                &peer_aux,
                &peer_ciphertext,
                self.secrets.w_i,
                own_big_w,
                rng,
            );

            self.beta_mine_for.insert(peer, response.beta);
            self.nu_mine_for.insert(peer, wc_response.beta);

            direct.insert(
                peer,
                Round2Message {
                    c1: response.c1,
                    c2: wc_response.c1,
                    proof_bob: response.proof,
                    proof_bob_wc: proof_wc,
                },
            );
        }
        ToSend::Direct(direct)
    }

    pub fn receive_direct(&mut self, from: PartyIdx, msg: Round2Message) -> Result<(), Error> {
        self.c1_from.insert(from, msg.c1);
        self.c2_from.insert(from, msg.c2);
        self.proof_bob_from.insert(from, msg.proof_bob);
        self.proof_bob_wc_from.insert(from, msg.proof_bob_wc);
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.c1_from.is_complete()
            && self.c2_from.is_complete()
            && self.proof_bob_from.is_complete()
            && self.proof_bob_wc_from.is_complete()
    }

    pub fn finalize(self, rng: &mut impl CryptoRngCore) -> Result<Round3, Error> {
        Round3::check_round2_proofs(
            &self.ctx,
            &self.c_a_i,
            &self.c1_from,
            &self.c2_from,
            &self.proof_bob_from,
            &self.proof_bob_wc_from,
        )?;
        Ok(Round3::new(
            self.ctx,
            self.secrets,
            self.gamma_point_i,
            self.commitment,
            self.decommit,
            self.c_a_i,
            self.c_a_from,
            self.commitment_from,
            self.beta_mine_for,
            self.nu_mine_for,
            self.c1_from,
            self.c2_from,
            rng,
        ))
    }
}
