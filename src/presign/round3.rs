//! Presign round 3: verify every peer's MtA response, recover our additive
//! shares, fold them into the Phase-3 scalar `delta_i`, and broadcast a
//! Pedersen commitment to it.

use std::sync::Arc;

use rand_core::CryptoRngCore;
use rayon::prelude::*;

use crate::commitment::{Commitment, Randomness};
use crate::curve::{Point, Scalar};
use crate::error::{Error, TheirFault};
use crate::mta;
use crate::paillier::Ciphertext;
use crate::round::ToSend;
use crate::tools::collections::{PartyIdx, PeerMap};
use crate::zkp::proof_bob::ProofBobStatement;
use crate::zkp::{ProofBob, ProofBobWc, TProof};

use super::context::{Ctx, Secrets};
use super::messages::Round3Message;
use super::round4::Round4;

pub(crate) struct Round3 {
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

    /// `alpha_ij`/`mu_ij` recovered by decrypting peers' round-2 responses.
    alpha_from: PeerMap<Scalar>,
    mu_from: PeerMap<Scalar>,

    delta_i: Scalar,
    t_i: Point,

    delta_from: PeerMap<Scalar>,
    t_from: PeerMap<Point>,
    t_proof_from: PeerMap<TProof>,
}

impl Round3 {
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
        c1_from: PeerMap<Ciphertext>,
        c2_from: PeerMap<Ciphertext>,
        _rng: &mut impl CryptoRngCore,
    ) -> Self {
        let num_parties = ctx.num_parties();
        let own_idx = ctx.own_idx();

        // `Round3::check_round2_proofs` must already have been called by
        // the harness (mod.rs) before this constructor runs; only
        // decryption happens here.
        let mut alpha_from = PeerMap::new(num_parties, own_idx);
        let mut mu_from = PeerMap::new(num_parties, own_idx);

        for peer in ctx.params.peer_indices() {
            let c1 = c1_from.get(peer).expect("round 2 complete");
            let c2 = c2_from.get(peer).expect("round 2 complete");
            alpha_from.insert(peer, mta::alice_end(&ctx.save_data.paillier_sk, c1));
            mu_from.insert(peer, mta::alice_end(&ctx.save_data.paillier_sk, c2));
        }

        let mut delta_i = secrets.k_i * secrets.gamma_i;
        for peer in ctx.params.peer_indices() {
            delta_i = delta_i
                + *alpha_from.get(peer).unwrap()
                + *beta_mine_for.get(peer).unwrap();
        }

        let t_i = ctx.pedersen.commit(delta_i, secrets.l_i);

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
            t_i,
            delta_from: PeerMap::new(num_parties, own_idx),
            t_from: PeerMap::new(num_parties, own_idx),
            t_proof_from: PeerMap::new(num_parties, own_idx),
        }
    }

    /// Checks every peer's round-2 proofs against our ciphertext, returning
    /// the culprit if any fails. Called by `Round2::finalize` before it
    /// constructs this round.
    pub(super) fn check_round2_proofs(
        ctx: &Ctx,
        c_a_i: &Ciphertext,
        c1_from: &PeerMap<Ciphertext>,
        c2_from: &PeerMap<Ciphertext>,
        proof_bob_from: &PeerMap<ProofBob>,
        proof_bob_wc_from: &PeerMap<ProofBobWc>,
    ) -> Result<(), Error> {
        let own_aux = ctx.save_data.own_aux_params();
        let own_pk = ctx.save_data.own_paillier_pk();
        let peers: Vec<PartyIdx> = ctx.params.peer_indices().collect();
        peers.into_par_iter().try_for_each(|peer| -> Result<(), Error> {
            let c1 = c1_from.get(peer).expect("round 2 complete");
            let c2 = c2_from.get(peer).expect("round 2 complete");
            let proof_bob = proof_bob_from.get(peer).expect("round 2 complete");
            let proof_bob_wc = proof_bob_wc_from.get(peer).expect("round 2 complete");

            let statement = ProofBobStatement {
                pk_alice: own_pk,
                aux: own_aux,
                c_a: c_a_i.value(),
                c1: c1.value(),
            };
            if !proof_bob.verify(&statement) {
                return Err(Error::their_fault(
                    2,
                    peer,
                    TheirFault::ZkVerificationFailed {
                        proof: "ProofBob",
                        from: peer,
                    },
                ));
            }
            let statement_wc = ProofBobStatement {
                pk_alice: own_pk,
                aux: own_aux,
                c_a: c_a_i.value(),
                c1: c2.value(),
            };
            // `peer` built this proof as Bob, proving their own `w_peer`
            // against their own `W_peer` (round 2's `own_big_w` at the
            // sender), not ours — see round2.rs.
            let peer_big_w = ctx.big_w[peer.as_usize()];
            if !proof_bob_wc.verify(&statement_wc, Point::generator(), peer_big_w) {
                return Err(Error::their_fault(
                    2,
                    peer,
                    TheirFault::ZkVerificationFailed {
                        proof: "ProofBobWc",
                        from: peer,
                    },
                ));
            }
            Ok(())
        })
    }

    pub fn start(&self, rng: &mut impl CryptoRngCore) -> ToSend<Round3Message, ()> {
        let t_proof = TProof::prove(&self.ctx.pedersen, self.t_i, self.delta_i, self.secrets.l_i, rng);
        ToSend::Broadcast(Round3Message {
            delta_i: self.delta_i,
            t_i: self.t_i,
            t_proof,
        })
    }

    pub fn receive_broadcast(&mut self, from: PartyIdx, msg: Round3Message) -> Result<(), Error> {
        if !msg.t_proof.verify(&self.ctx.pedersen, msg.t_i) {
            return Err(Error::their_fault(
                3,
                from,
                TheirFault::ZkVerificationFailed {
                    proof: "TProof",
                    from,
                },
            ));
        }
        self.delta_from.insert(from, msg.delta_i);
        self.t_from.insert(from, msg.t_i);
        self.t_proof_from.insert(from, msg.t_proof);
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.delta_from.is_complete() && self.t_from.is_complete()
    }

    pub fn finalize(self) -> Round4 {
        Round4::new(
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
            self.alpha_from,
            self.mu_from,
            self.delta_i,
            self.delta_from,
            self.t_i,
            self.t_from,
        )
    }
}
