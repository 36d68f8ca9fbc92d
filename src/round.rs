//! Shared shape for what a round wants to send.
//!
//! An earlier draft tried to force every presign round through a single
//! generic `Round` trait with one associated message type. That shape
//! doesn't fit GG20's rounds: round 1 both broadcasts a commitment *and*
//! sends a distinct per-peer range proof, round 6 branches between a
//! `Success` and an `Abort` payload, and the payload a round needs to
//! finalize differs per round. Forcing that through one associated-type
//! trait bought indirection without saving code, so each round here is
//! instead a concrete struct with its own
//! `start`/`receive_*`/`is_complete`/`finalize` methods, and
//! [`PresignParty`] (`src/presign/mod.rs`) dispatches over a tagged
//! `PresignRound` enum instead of interface-style dynamic dispatch.

/// What a round wants to send this turn: a broadcast payload and/or a
/// distinct direct message per peer.
pub enum ToSend<B, D> {
    Broadcast(B),
    Direct(crate::tools::collections::PeerMap<D>),
    Both {
        broadcast: B,
        direct: crate::tools::collections::PeerMap<D>,
    },
}
