//! Presign round 7: the final `Π S_j == Y` check and, on failure, Type-7
//! identifiable abort.
//!
//! The happy path sends nothing — every party already holds every other
//! party's `S_j` from round 6 and reaches the same conclusion locally. On
//! mismatch, every party instead broadcasts a [`Round7AbortMessage`]
//! disclosing `k_i`, the Paillier randomness behind its round-1 ciphertext,
//! and `g^{sigma_i}` bound to its round-6 `S_i` by an [`EcddhProof`]. Three
//! independently-checkable facts narrow down the culprit(s):
//!
//! 1. self-consistency: the `EcddhProof` ties the disclosed `g^{sigma_i}` to
//!    the `S_i` actually broadcast in round 6 (catches a corrupted `S_i`
//!    directly, without needing any other party's data).
//! 2. re-encryption: `k_i`/`k_rand_i` must reproduce the exact ciphertext
//!    broadcast to every peer in round 1 (`cA_i` is cloned identically to
//!    all recipients, so any peer can check this for any other peer).
//! 3. reconstruction: `sigma_i = k_i*w_i + Σ_{j≠i}(mu_ij + nu_ji)` is a sum
//!    over every other party, not a single-party identity, so there is no
//!    shortcut through `Y^{k_i}` alone. Every other party's disclosed
//!    `mu_ij`/`mu_ji` plus the public `{W_j}` let any verifier rebuild
//!    `g^{nu_ji} = W_j^{k_i} - g^{mu_ji}` and from there `g^{sigma_i}` itself,
//!    then compare against the disclosed `g^{sigma_i}` — see
//!    [`Round7::reconstruct_g_sigma`].

use std::sync::Arc;

use rand_core::CryptoRngCore;

use crate::curve::{Point, Scalar};
use crate::error::{Error, TheirFault};
use crate::mta::scalar_to_modulus;
use crate::paillier::Ciphertext;
use crate::round::ToSend;
use crate::save_data::LocalPresignData;
use crate::tools::collections::{PartyIdx, PeerMap};
use crate::zkp::EcddhProof;

use super::context::{Ctx, Secrets};
use super::messages::Round7AbortMessage;

pub(crate) struct Round7 {
    ctx: Arc<Ctx>,
    secrets: Secrets,
    c_a_from: PeerMap<Ciphertext>,
    mu_from: PeerMap<Scalar>,
    big_r: Point,
    r_bar_i: Point,
    r_bar_from: PeerMap<Point>,
    sigma_i: Scalar,
    s_i: Point,
    s_from: PeerMap<Point>,

    abort: bool,
    abort_from: PeerMap<Round7AbortMessage>,
}

impl Round7 {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        ctx: Arc<Ctx>,
        secrets: Secrets,
        c_a_from: PeerMap<Ciphertext>,
        mu_from: PeerMap<Scalar>,
        big_r: Point,
        r_bar_i: Point,
        r_bar_from: PeerMap<Point>,
        sigma_i: Scalar,
        s_i: Point,
        s_from: PeerMap<Point>,
        _rng: &mut impl CryptoRngCore,
    ) -> Self {
        let mut product = s_i;
        for (_, s_j) in s_from.iter_filled() {
            product = product + *s_j;
        }
        let abort = product != ctx.save_data.public_key;

        let num_parties = ctx.num_parties();
        let own_idx = ctx.own_idx();
        Self {
            ctx,
            secrets,
            c_a_from,
            mu_from,
            big_r,
            r_bar_i,
            r_bar_from,
            sigma_i,
            s_i,
            s_from,
            abort,
            abort_from: PeerMap::new(num_parties, own_idx),
        }
    }

    /// `None` on the happy path: nothing to send, every party concludes the
    /// same thing locally from round 6's broadcasts.
    pub fn start(&self, rng: &mut impl CryptoRngCore) -> Option<ToSend<Round7AbortMessage, ()>> {
        if !self.abort {
            return None;
        }
        let g_sigma_i = Point::mul_by_generator(&self.sigma_i);
        let ecddh_proof = EcddhProof::prove(
            Point::generator(),
            g_sigma_i,
            self.big_r,
            self.s_i,
            self.sigma_i,
            rng,
        );
        let mu_ij = self
            .mu_from
            .iter_filled()
            .map(|(p, v)| (p.as_usize() as u32, *v))
            .collect();
        Some(ToSend::Broadcast(Round7AbortMessage {
            k_i: self.secrets.k_i,
            k_rand_i: self.secrets.r_a_i,
            mu_ij,
            g_sigma_i,
            ecddh_proof,
        }))
    }

    pub fn needs_broadcast(&self) -> bool {
        self.abort
    }

    pub fn receive_broadcast(
        &mut self,
        from: PartyIdx,
        msg: Round7AbortMessage,
    ) -> Result<(), Error> {
        self.abort_from.insert(from, msg);
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        if self.abort {
            self.abort_from.is_complete()
        } else {
            true
        }
    }

    pub fn finalize(mut self) -> Result<LocalPresignData, Error> {
        if self.abort {
            let culprits = self.identify();
            return Err(Error::ConsistencyAbortT7 { round: 7, culprits });
        }

        let r = self
            .big_r
            .x_as_scalar()
            .expect("R is never the identity once round 5 completes");
        let r_sigma_i = r * self.sigma_i;

        let num_parties = self.ctx.num_parties();
        let mut big_r_bar_j = vec![Point::identity(); num_parties];
        let mut big_s_j = vec![Point::identity(); num_parties];
        big_r_bar_j[self.ctx.own_idx().as_usize()] = self.r_bar_i;
        big_s_j[self.ctx.own_idx().as_usize()] = self.s_i;
        for (peer, r_bar_j) in self.r_bar_from.iter_filled() {
            big_r_bar_j[peer.as_usize()] = *r_bar_j;
        }
        for (peer, s_j) in self.s_from.iter_filled() {
            big_s_j[peer.as_usize()] = *s_j;
        }

        let k_i = self.secrets.k_i;
        self.secrets.wipe();

        Ok(LocalPresignData {
            r_sigma_i,
            k_i,
            big_r: self.big_r,
            big_r_bar_j,
            big_s_j,
            public_key: self.ctx.save_data.public_key,
            t: num_parties - 1,
        })
    }

    /// Names every peer whose disclosure fails self-consistency,
    /// re-encryption, or reconstruction of `g^{sigma_j}` from the disclosed
    /// `mu_ij` maps and the public `{W_j}`.
    fn identify(&self) -> Vec<PartyIdx> {
        let mut culprits = Vec::new();
        for (peer, msg) in self.abort_from.iter_filled() {
            let s_peer = self.s_from.get(peer).expect("round 6 complete");
            let self_consistent =
                msg.ecddh_proof
                    .verify(Point::generator(), msg.g_sigma_i, self.big_r, *s_peer);

            let peer_pk = &self.ctx.save_data.paillier_pks[peer.as_usize()];
            let reencrypted =
                Ciphertext::encrypt_with_randomness(peer_pk, &scalar_to_modulus(msg.k_i), &msg.k_rand_i);
            let observed_c_a = self.c_a_from.get(peer).expect("round 1 complete");
            let reencryption_matches = reencrypted.value() == observed_c_a.value();

            let reconstructed = self.reconstruct_g_sigma(peer, msg.k_i);
            let identity_holds = msg.g_sigma_i == reconstructed;

            if !self_consistent || !reencryption_matches || !identity_holds {
                culprits.push(peer);
            }
        }
        culprits
    }

    /// Rebuilds `g^{sigma_target}` from `target`'s own disclosed `k_target`
    /// plus every other party's disclosed `mu` maps, per the MtA law
    /// `sigma_target = k_target*w_target + Σ_{j≠target}(mu_{target,j} +
    /// nu_{j,target})` with `g^{nu_{j,target}} = W_j^{k_target} -
    /// g^{mu_{j,target}}`. Used by [`Self::identify`] to check a disclosure
    /// against every other party's, not just `target`'s own claim.
    fn reconstruct_g_sigma(&self, target: PartyIdx, k_target: Scalar) -> Point {
        let mut acc = self.ctx.big_w[target.as_usize()] * k_target;
        for i in 0..self.ctx.num_parties() {
            let peer = PartyIdx::from_usize(i);
            if peer == target {
                continue;
            }
            let mu_target_peer = self.mu_value(target, peer);
            let mu_peer_target = self.mu_value(peer, target);
            let g_nu_peer_target =
                self.ctx.big_w[peer.as_usize()] * k_target - Point::mul_by_generator(&mu_peer_target);
            acc = acc + Point::mul_by_generator(&mu_target_peer) + g_nu_peer_target;
        }
        acc
    }

    /// Looks up `discloser`'s own disclosed `mu` map at index `at`: `mu_from`
    /// for this party's own disclosure, the matching `abort_from` entry's
    /// `mu_ij` for anyone else's.
    fn mu_value(&self, discloser: PartyIdx, at: PartyIdx) -> Scalar {
        if discloser == self.ctx.own_idx() {
            return *self.mu_from.get(at).expect("own mu recovered from every peer by round 6");
        }
        let msg = self
            .abort_from
            .get(discloser)
            .expect("round 7 abort is symmetric: every party broadcasts a disclosure");
        msg.mu_ij
            .iter()
            .find(|(idx, _)| PartyIdx::from_usize(*idx as usize) == at)
            .map(|(_, v)| *v)
            .expect("discloser's mu map covers every peer")
    }
}
