//! Presign round 5: open round 1's nonce commitments, derive the joint
//! nonce point `R = (Σ_j Γ_j)^{δ⁻¹}`, and attest that our own Paillier
//! ciphertext `cA_i` is consistent with `R^{k_i}`.

use std::sync::Arc;

use rand_core::CryptoRngCore;

use crate::commitment;
use crate::curve::{Point, Scalar};
use crate::error::{Error, MyFault, TheirFault};
use crate::mta::scalar_to_modulus;
use crate::paillier::Ciphertext;
use crate::round::ToSend;
use crate::tools::collections::{PartyIdx, PeerMap};
use crate::zkp::pdl_with_slack::{PdlWithSlackProof, PdlWithSlackStatement};

use super::context::{Ctx, Secrets};
use super::messages::Round5Message;
use super::round6::Round6;

pub(crate) struct Round5 {
    ctx: Arc<Ctx>,
    secrets: Secrets,
    c_a_i: Ciphertext,
    c_a_from: PeerMap<Ciphertext>,
    beta_mine_for: PeerMap<Scalar>,
    nu_mine_for: PeerMap<Scalar>,
    alpha_from: PeerMap<Scalar>,
    mu_from: PeerMap<Scalar>,
    delta_i: Scalar,
    t_i: Point,
    t_from: PeerMap<Point>,

    big_r: Point,
    r_bar_i: Point,

    r_bar_from: PeerMap<Point>,
}

impl Round5 {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        ctx: Arc<Ctx>,
        secrets: Secrets,
        gamma_point_i: Point,
        c_a_i: Ciphertext,
        c_a_from: PeerMap<Ciphertext>,
        commitment_from: PeerMap<crate::commitment::Commitment>,
        beta_mine_for: PeerMap<Scalar>,
        nu_mine_for: PeerMap<Scalar>,
        alpha_from: PeerMap<Scalar>,
        mu_from: PeerMap<Scalar>,
        delta_i: Scalar,
        delta_from: PeerMap<Scalar>,
        t_i: Point,
        t_from: PeerMap<Point>,
        gamma_point_from: PeerMap<Point>,
        decommit_from: PeerMap<crate::commitment::Randomness>,
    ) -> Result<Self, Error> {
        let mut delta = delta_i;
        let mut big_gamma = gamma_point_i;
        for peer in ctx.params.peer_indices() {
            let commitment = commitment_from.get(peer).expect("round 1 complete");
            let gamma_j = *gamma_point_from.get(peer).expect("round 4 complete");
            let decommit = decommit_from.get(peer).expect("round 4 complete");
            if !commitment::open(commitment, &[&gamma_j], decommit) {
                return Err(Error::their_fault(
                    5,
                    peer,
                    TheirFault::CommitmentMismatch { from: peer },
                ));
            }
            big_gamma = big_gamma + gamma_j;
            delta = delta + *delta_from.get(peer).expect("round 3 complete");
        }

        let delta_inv = delta.invert().ok_or_else(|| {
            Error::my_fault(5, MyFault::Internal("delta summed to zero, cannot invert"))
        })?;
        let big_r = big_gamma * delta_inv;
        let r_bar_i = big_r * secrets.k_i;

        let num_parties = ctx.num_parties();
        let own_idx = ctx.own_idx();
        Ok(Self {
            ctx,
            secrets,
            c_a_i,
            c_a_from,
            beta_mine_for,
            nu_mine_for,
            alpha_from,
            mu_from,
            delta_i,
            t_i,
            t_from,
            big_r,
            r_bar_i,
            r_bar_from: PeerMap::new(num_parties, own_idx),
        })
    }

    /// Builds the PDLwSlack proof using our own auxiliary modulus: since this
    /// message is broadcast to every peer at once, there is no single
    /// verifier-chosen modulus to build against, so (unlike the P2P round-1
    /// range proof) the discloser's own aux parameters serve the role,
    /// mirrored on the verifying side in [`Self::receive_broadcast`].
    pub fn start(&self, rng: &mut impl CryptoRngCore) -> ToSend<Round5Message, ()> {
        let own_pk = self.ctx.save_data.own_paillier_pk();
        let own_aux = self.ctx.save_data.own_aux_params();
        let k_i_mod = scalar_to_modulus(self.secrets.k_i);
        let statement = PdlWithSlackStatement {
            pk: own_pk,
            aux: own_aux,
            ciphertext: self.c_a_i.value(),
            point: self.r_bar_i,
        };
        let pdl_proof = PdlWithSlackProof::prove(
            &statement,
            &k_i_mod,
            self.secrets.k_i,
            &self.secrets.r_a_i,
            rng,
        );
        ToSend::Broadcast(Round5Message {
            r_bar_i: self.r_bar_i,
            pdl_proof,
        })
    }

    pub fn receive_broadcast(&mut self, from: PartyIdx, msg: Round5Message) -> Result<(), Error> {
        let peer_pk = &self.ctx.save_data.paillier_pks[from.as_usize()];
        let peer_aux = &self.ctx.save_data.aux_params[from.as_usize()];
        let peer_c_a = self.c_a_from.get(from).expect("round 1 complete");
        let statement = PdlWithSlackStatement {
            pk: peer_pk,
            aux: peer_aux,
            ciphertext: peer_c_a.value(),
            point: msg.r_bar_i,
        };
        if !msg.pdl_proof.verify(&statement) {
            return Err(Error::their_fault(
                5,
                from,
                TheirFault::ZkVerificationFailed {
                    proof: "PdlWithSlack",
                    from,
                },
            ));
        }
        self.r_bar_from.insert(from, msg.r_bar_i);
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.r_bar_from.is_complete()
    }

    pub fn finalize(self) -> Round6 {
        Round6::new(
            self.ctx,
            self.secrets,
            self.c_a_i,
            self.c_a_from,
            self.beta_mine_for,
            self.nu_mine_for,
            self.alpha_from,
            self.mu_from,
            self.delta_i,
            self.t_i,
            self.t_from,
            self.big_r,
            self.r_bar_i,
            self.r_bar_from,
        )
    }
}
