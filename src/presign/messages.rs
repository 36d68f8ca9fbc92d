//! Wire message types for the seven presign rounds.
//!
//! Every type implements [`ValidateBasic`] per the discipline in
//! `tools::wire`: shape
//! checks only (non-degenerate points, proof vectors present), applied
//! before a message is folded into round state. A failing check is a
//! silently-dropped [`crate::error::TheirFault::InvalidMessage`], not a
//! named-culprit fault.

use serde::{Deserialize, Serialize};

use crate::commitment::{Commitment, Randomness};
use crate::curve::{Point, Scalar};
use crate::paillier::Ciphertext;
use crate::tools::wire::ValidateBasic;
use crate::zkp::{
    EcddhProof, PdlWithSlackProof, ProofBob, ProofBobWc, RangeProofAlice, StProof, TProof,
};

/// Round 1, P2P: Alice's MtA ciphertext plus a range proof built for this
/// specific recipient's auxiliary modulus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round1Message1 {
    pub c_a: Ciphertext,
    pub range_proof: RangeProofAlice,
}

impl ValidateBasic for Round1Message1 {
    fn validate_basic(&self) -> bool {
        true
    }
}

/// Round 1, broadcast: commitment to `Γ_i`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Round1Message2 {
    pub commitment: Commitment,
}

impl ValidateBasic for Round1Message2 {
    fn validate_basic(&self) -> bool {
        true
    }
}

/// Round 2, P2P: Bob's response to the sender's round-1 ciphertext, for
/// both the `gamma`-track and witness-checked `w`-track MtA instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round2Message {
    pub c1: Ciphertext,
    pub c2: Ciphertext,
    pub proof_bob: ProofBob,
    pub proof_bob_wc: ProofBobWc,
}

impl ValidateBasic for Round2Message {
    fn validate_basic(&self) -> bool {
        true
    }
}

/// Round 3, broadcast: the Phase-3 scalar `delta_i` plus a Pedersen
/// commitment to it and a proof the commitment is well-formed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round3Message {
    pub delta_i: Scalar,
    pub t_i: Point,
    pub t_proof: TProof,
}

impl ValidateBasic for Round3Message {
    fn validate_basic(&self) -> bool {
        !self.t_i.is_identity()
    }
}

/// Round 4, broadcast: the opening of round 1's commitment to `Γ_i`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Round4Message {
    pub decommitment: Randomness,
    pub gamma_i: Point,
}

impl ValidateBasic for Round4Message {
    fn validate_basic(&self) -> bool {
        !self.gamma_i.is_identity()
    }
}

/// Round 5, broadcast: `R̄_i = R^{k_i}` and a proof that it is consistent
/// with the Paillier ciphertext `cA_i` broadcast in round 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round5Message {
    pub r_bar_i: Point,
    pub pdl_proof: PdlWithSlackProof,
}

impl ValidateBasic for Round5Message {
    fn validate_basic(&self) -> bool {
        !self.r_bar_i.is_identity()
    }
}

/// Round 6, broadcast: either the success payload (`S_i` plus its proof) or
/// a Type-5 abort disclosure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Round6Message {
    Success {
        s_i: Point,
        st_proof: StProof,
    },
    Abort {
        k_i: Scalar,
        gamma_i: Scalar,
        /// `alpha_ij` this party recovered from every peer `j`, keyed by
        /// peer index (own index omitted).
        alpha_ij: Vec<(u32, Scalar)>,
        /// `beta_ji` this party computed for every peer `j`, keyed by peer
        /// index (own index omitted).
        beta_ji: Vec<(u32, Scalar)>,
    },
}

impl ValidateBasic for Round6Message {
    fn validate_basic(&self) -> bool {
        match self {
            Round6Message::Success { s_i, .. } => !s_i.is_identity(),
            Round6Message::Abort { .. } => true,
        }
    }
}

/// Round 7, broadcast: a Type-7 abort disclosure (the success path needs no
/// message — every party reaches the same `Π S_j == Y` conclusion locally
/// from round 6's broadcasts).
///
/// `g_sigma_i` is the discloser's own claim of `g^{sigma_i}`, bound to its
/// round-6 `S_i` by `ecddh_proof` (same witness `sigma_i`, bases `G` and
/// `R`). Every other party independently recomputes the same point from the
/// `mu_ij` maps every party discloses plus the public `{W_j}`, and names the
/// discloser a culprit on any mismatch — see `round7::identify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round7AbortMessage {
    pub k_i: Scalar,
    pub k_rand_i: crate::paillier::keys::Modulus,
    pub mu_ij: Vec<(u32, Scalar)>,
    pub g_sigma_i: Point,
    pub ecddh_proof: EcddhProof,
}

impl ValidateBasic for Round7AbortMessage {
    fn validate_basic(&self) -> bool {
        !self.g_sigma_i.is_identity()
    }
}
