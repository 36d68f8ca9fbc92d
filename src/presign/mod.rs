//! The presign party harness: drives a single party through the seven
//! presign rounds' Start/Update/NextRound shape.
//!
//! Each round is its own concrete struct (see `round.rs`'s doc comment for
//! why a single generic `Round` trait doesn't fit GG20's rounds); this
//! module wraps them in one tagged enum, [`PresignRound`], and
//! [`PresignParty`] dispatches incoming wire messages to whichever round is
//! current. `PresignMessage` is the transport envelope every round's
//! distinct message type is wrapped into, with `PresignParty::receive`
//! rejecting anything that doesn't match the round in progress.

mod context;
mod messages;
mod round1;
mod round2;
mod round3;
mod round4;
mod round5;
mod round6;
mod round7;

pub use messages::{
    Round1Message1, Round1Message2, Round2Message, Round3Message, Round4Message, Round5Message,
    Round6Message, Round7AbortMessage,
};

pub(crate) use crate::mta::scalar_to_modulus;

use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};

use crate::error::{Error, TheirFault};
use crate::params::Parameters;
use crate::save_data::{LocalPresignData, LocalSaveData};
use crate::tools::collections::PartyIdx;
use crate::tools::wire::ValidateBasic;

use round1::Round1;
use round2::Round2;
use round3::Round3;
use round4::Round4;
use round5::Round5;
use round6::Round6;
use round7::Round7;

/// Envelope every round's message is wrapped in for transport. Round number
/// is implicit in the variant, so [`PresignParty::receive`] can reject a
/// message that doesn't belong to the round currently in progress without
/// needing a separate tag field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PresignMessage {
    Round1Broadcast(Round1Message2),
    Round1Direct(Round1Message1),
    Round2Direct(Round2Message),
    Round3Broadcast(Round3Message),
    Round4Broadcast(Round4Message),
    Round5Broadcast(Round5Message),
    Round6Broadcast(Round6Message),
    Round7Broadcast(Round7AbortMessage),
}

impl ValidateBasic for PresignMessage {
    fn validate_basic(&self) -> bool {
        match self {
            PresignMessage::Round1Broadcast(m) => m.validate_basic(),
            PresignMessage::Round1Direct(m) => m.validate_basic(),
            PresignMessage::Round2Direct(m) => m.validate_basic(),
            PresignMessage::Round3Broadcast(m) => m.validate_basic(),
            PresignMessage::Round4Broadcast(m) => m.validate_basic(),
            PresignMessage::Round5Broadcast(m) => m.validate_basic(),
            PresignMessage::Round6Broadcast(m) => m.validate_basic(),
            PresignMessage::Round7Broadcast(m) => m.validate_basic(),
        }
    }
}

/// Something a round wants sent this turn, already addressed.
pub enum Outgoing {
    Broadcast(PresignMessage),
    Direct(PartyIdx, PresignMessage),
}

enum PresignRound {
    R1(Round1),
    R2(Round2),
    R3(Round3),
    R4(Round4),
    R5(Round5),
    R6(Round6),
    R7(Round7),
    Done,
}

impl PresignRound {
    fn number(&self) -> u8 {
        match self {
            PresignRound::R1(_) => 1,
            PresignRound::R2(_) => 2,
            PresignRound::R3(_) => 3,
            PresignRound::R4(_) => 4,
            PresignRound::R5(_) => 5,
            PresignRound::R6(_) => 6,
            PresignRound::R7(_) => 7,
            PresignRound::Done => 8,
        }
    }
}

/// Drives one party through presign. Construct with [`PresignParty::new`],
/// call [`PresignParty::start`] once to get round 1's outgoing messages,
/// then alternate [`PresignParty::receive`] (as peer messages arrive) with
/// [`PresignParty::advance`] (once [`PresignParty::is_complete`] says the
/// current round has heard from every peer) until [`PresignParty::advance`]
/// returns the finished [`LocalPresignData`].
pub struct PresignParty {
    round: PresignRound,
}

impl PresignParty {
    pub fn new(
        params: Parameters,
        save_data: LocalSaveData,
        rng: &mut impl CryptoRngCore,
    ) -> Result<Self, Error> {
        let ctx = Ctx::new(params, save_data)?;
        Ok(Self {
            round: PresignRound::R1(Round1::new(ctx, rng)),
        })
    }

    /// Produces round 1's outgoing messages: the broadcast commitment plus
    /// one direct range-proof message per peer.
    pub fn start(&self, rng: &mut impl CryptoRngCore) -> Vec<Outgoing> {
        match &self.round {
            PresignRound::R1(r) => to_send_messages(r.start(rng), PresignMessage::Round1Broadcast, PresignMessage::Round1Direct),
            _ => Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        match &self.round {
            PresignRound::R1(r) => r.is_complete(),
            PresignRound::R2(r) => r.is_complete(),
            PresignRound::R3(r) => r.is_complete(),
            PresignRound::R4(r) => r.is_complete(),
            PresignRound::R5(r) => r.is_complete(),
            PresignRound::R6(r) => r.is_complete(),
            PresignRound::R7(r) => r.is_complete(),
            PresignRound::Done => true,
        }
    }

    /// Folds one peer's message into the round in progress. Rejects a
    /// message tagged for any round other than the one currently active.
    pub fn receive(&mut self, from: PartyIdx, msg: PresignMessage) -> Result<(), Error> {
        if !msg.validate_basic() {
            return Err(Error::their_fault(
                self.round.number(),
                from,
                TheirFault::InvalidMessage {
                    from,
                    reason: "message failed basic shape validation",
                },
            ));
        }
        match (&mut self.round, msg) {
            (PresignRound::R1(r), PresignMessage::Round1Broadcast(m)) => r.receive_broadcast(from, m),
            (PresignRound::R1(r), PresignMessage::Round1Direct(m)) => r.receive_direct(from, m),
            (PresignRound::R2(r), PresignMessage::Round2Direct(m)) => r.receive_direct(from, m),
            (PresignRound::R3(r), PresignMessage::Round3Broadcast(m)) => r.receive_broadcast(from, m),
            (PresignRound::R4(r), PresignMessage::Round4Broadcast(m)) => r.receive_broadcast(from, m),
            (PresignRound::R5(r), PresignMessage::Round5Broadcast(m)) => r.receive_broadcast(from, m),
            (PresignRound::R6(r), PresignMessage::Round6Broadcast(m)) => r.receive_broadcast(from, m),
            (PresignRound::R7(r), PresignMessage::Round7Broadcast(m)) => r.receive_broadcast(from, m),
            (round, _) => Err(Error::their_fault(
                round.number(),
                from,
                TheirFault::InvalidMessage {
                    from,
                    reason: "message does not belong to the round in progress",
                },
            )),
        }
    }

    /// Once [`Self::is_complete`] holds, finalizes the round in progress and
    /// starts the next one, returning its outgoing messages. Returns
    /// `Ok(Some(data))` once round 7 finalizes successfully; `Ok(None)` at
    /// every earlier round.
    pub fn advance(
        &mut self,
        rng: &mut impl CryptoRngCore,
    ) -> Result<(Vec<Outgoing>, Option<LocalPresignData>), Error> {
        let round = std::mem::replace(&mut self.round, PresignRound::Done);
        let (next_round, outgoing, done) = match round {
            PresignRound::R1(r) => {
                let mut r2 = r.finalize(rng);
                let out = to_send_messages(r2.start(rng), |()| unreachable!(), PresignMessage::Round2Direct);
                (PresignRound::R2(r2), out, None)
            }
            PresignRound::R2(r) => {
                let r3 = r.finalize(rng)?;
                let out = to_send_messages(r3.start(rng), PresignMessage::Round3Broadcast, |()| unreachable!());
                (PresignRound::R3(r3), out, None)
            }
            PresignRound::R3(r) => {
                let r4 = r.finalize();
                let out = to_send_messages(r4.start(), PresignMessage::Round4Broadcast, |()| unreachable!());
                (PresignRound::R4(r4), out, None)
            }
            PresignRound::R4(r) => {
                let r5 = r.finalize()?;
                let out = to_send_messages(r5.start(rng), PresignMessage::Round5Broadcast, |()| unreachable!());
                (PresignRound::R5(r5), out, None)
            }
            PresignRound::R5(r) => {
                let r6 = r.finalize();
                let out = to_send_messages(r6.start(rng), PresignMessage::Round6Broadcast, |()| unreachable!());
                (PresignRound::R6(r6), out, None)
            }
            PresignRound::R6(r) => {
                let r7 = r.finalize(rng)?;
                let out = match r7.start(rng) {
                    Some(to_send) => to_send_messages(to_send, PresignMessage::Round7Broadcast, |()| unreachable!()),
                    None => Vec::new(),
                };
                (PresignRound::R7(r7), out, None)
            }
            PresignRound::R7(r) => {
                let data = r.finalize()?;
                (PresignRound::Done, Vec::new(), Some(data))
            }
            PresignRound::Done => (PresignRound::Done, Vec::new(), None),
        };
        self.round = next_round;
        Ok((outgoing, done))
    }
}

/// Round 7 may have nothing to send (the happy path), so the harness needs
/// to know whether to wait for peers' round-7 broadcasts at all.
impl PresignParty {
    pub fn awaiting_round7_disclosures(&self) -> bool {
        matches!(&self.round, PresignRound::R7(r) if r.needs_broadcast())
    }
}

fn to_send_messages<B, D>(
    to_send: crate::round::ToSend<B, D>,
    wrap_broadcast: impl Fn(B) -> PresignMessage,
    wrap_direct: impl Fn(D) -> PresignMessage,
) -> Vec<Outgoing> {
    match to_send {
        crate::round::ToSend::Broadcast(b) => vec![Outgoing::Broadcast(wrap_broadcast(b))],
        crate::round::ToSend::Direct(peer_map) => peer_map
            .into_filled()
            .into_iter()
            .map(|(peer, d)| Outgoing::Direct(peer, wrap_direct(d)))
            .collect(),
        crate::round::ToSend::Both { broadcast, direct } => {
            let mut out = vec![Outgoing::Broadcast(wrap_broadcast(broadcast))];
            out.extend(
                direct
                    .into_filled()
                    .into_iter()
                    .map(|(peer, d)| Outgoing::Direct(peer, wrap_direct(d))),
            );
            out
        }
    }
}
