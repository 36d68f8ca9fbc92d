//! Presign round 1: commit to a fresh nonce share `Γ_i`, encrypt `k_i` under
//! our own Paillier key, and hand every peer a range proof (built with
//! *their* auxiliary modulus, since they are the verifier) that the
//! ciphertext is well-formed.

use std::sync::Arc;

use rand_core::CryptoRngCore;

use crate::commitment::{self, Commitment, Randomness};
use crate::curve::Point;
use crate::error::{Error, TheirFault};
use crate::paillier::Ciphertext;
use crate::round::ToSend;
use crate::tools::collections::{PartyIdx, PeerMap};
use crate::zkp::range_proof_alice::{RangeProofAlice, RangeProofAliceStatement};

use super::context::{Ctx, Secrets};
use super::messages::{Round1Message1, Round1Message2};
use super::round2::Round2;

pub(crate) struct Round1 {
    ctx: Arc<Ctx>,
    secrets: Secrets,
    gamma_point_i: Point,
    commitment: Commitment,
    decommit: Randomness,
    c_a_i: Ciphertext,
    c_a_from: PeerMap<Ciphertext>,
    commitment_from: PeerMap<Commitment>,
}

impl Round1 {
    pub fn new(ctx: Arc<Ctx>, rng: &mut impl CryptoRngCore) -> Self {
        let mut secrets = Secrets::fresh(&ctx, rng);
        let gamma_point_i = Point::mul_by_generator(&secrets.gamma_i);
        let (commitment, decommit) = commitment::commit(&[&gamma_point_i], rng);

        let own_pk = ctx.save_data.own_paillier_pk();
        let k_i_mod = super::scalar_to_modulus(secrets.k_i);
        let (c_a_i, r_a_i) = Ciphertext::encrypt(own_pk, &k_i_mod, rng);
        secrets.r_a_i = r_a_i;

        let num_parties = ctx.num_parties();
        let own_idx = ctx.own_idx();
        Self {
            ctx,
            secrets,
            gamma_point_i,
            commitment,
            decommit,
            c_a_i,
            c_a_from: PeerMap::new(num_parties, own_idx),
            commitment_from: PeerMap::new(num_parties, own_idx),
        }
    }

    pub fn start(
        &self,
        rng: &mut impl CryptoRngCore,
    ) -> ToSend<Round1Message2, Round1Message1> {
        let own_pk = ctx_own_pk(&self.ctx);
        let k_i_mod = super::scalar_to_modulus(self.secrets.k_i);
        let mut direct = PeerMap::new(self.ctx.num_parties(), self.ctx.own_idx());
        for peer in self.ctx.params.peer_indices() {
            let peer_aux = &self.ctx.save_data.aux_params[peer.as_usize()];
            let statement = RangeProofAliceStatement {
                pk: own_pk,
                aux: peer_aux,
                ciphertext: self.c_a_i.value(),
            };
            let proof = RangeProofAlice::prove(&statement, &k_i_mod, &self.secrets.r_a_i, rng);
            direct.insert(
                peer,
                Round1Message1 {
                    c_a: self.c_a_i.clone(),
                    range_proof: proof,
                },
            );
        }
        ToSend::Both {
            broadcast: Round1Message2 {
                commitment: self.commitment,
            },
            direct,
        }
    }

    pub fn receive_broadcast(
        &mut self,
        from: PartyIdx,
        msg: Round1Message2,
    ) -> Result<(), Error> {
        self.commitment_from.insert(from, msg.commitment);
        Ok(())
    }

    /// Verifies the range proof peer `from` built for *us* (using our own
    /// auxiliary modulus, since we are the verifier of this proof) and
    /// records their MtA ciphertext for round 2.
    pub fn receive_direct(&mut self, from: PartyIdx, msg: Round1Message1) -> Result<(), Error> {
        let own_aux = self.ctx.save_data.own_aux_params();
        let peer_pk = &self.ctx.save_data.paillier_pks[from.as_usize()];
        let statement = RangeProofAliceStatement {
            pk: peer_pk,
            aux: own_aux,
            ciphertext: msg.c_a.value(),
        };
        if !msg.range_proof.verify(&statement) {
            return Err(Error::their_fault(
                1,
                from,
                TheirFault::ZkVerificationFailed {
                    proof: "RangeProofAlice",
                    from,
                },
            ));
        }
        self.c_a_from.insert(from, msg.c_a);
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.c_a_from.is_complete() && self.commitment_from.is_complete()
    }

    pub fn finalize(self, rng: &mut impl CryptoRngCore) -> Round2 {
        Round2::new(
            self.ctx,
            self.secrets,
            self.gamma_point_i,
            self.commitment,
            self.decommit,
            self.c_a_i,
            self.c_a_from,
            self.commitment_from,
            rng,
        )
    }
}

fn ctx_own_pk(ctx: &Ctx) -> &crate::paillier::PaillierPublicKey {
    ctx.save_data.own_paillier_pk()
}
