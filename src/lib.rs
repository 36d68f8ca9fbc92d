//! Threshold ECDSA (GG20) presignature and online-signing engine over
//! secp256k1.
//!
//! A set of `n` parties, each holding a Shamir share of a secret signing
//! key, cooperate over a synchronous multi-round protocol to produce an
//! ECDSA signature such that any `t+1` of them can sign while no coalition
//! of `t` or fewer learns the secret key. Signing is split into two phases:
//!
//! - [`presign`]: message-independent, 7 rounds plus finalization. Consumes
//!   a [`save_data::LocalSaveData`] key share and produces a
//!   [`save_data::LocalPresignData`] presignature.
//! - [`sign`]: 1 round plus finalization, binding a presignature to a
//!   message digest and producing a [`curve::RecoverableSignature`].
//!
//! Distributed key generation, the transport layer that moves wire bytes
//! between parties, and any CLI/fixture-loading layer are external
//! collaborators; this crate's entry points are [`presign::PresignParty`]
//! and [`sign::SignParty`], driven by whatever harness owns the network
//! connection.

pub mod commitment;
pub mod curve;
pub mod error;
pub(crate) mod mta;
pub mod paillier;
pub mod params;
pub mod presign;
pub(crate) mod round;
pub mod save_data;
pub mod sign;
pub(crate) mod tools;
pub mod zkp;

pub use error::Error;
pub use params::{CurveParams, Parameters};
pub use presign::{Outgoing, PresignMessage, PresignParty};
pub use save_data::{LocalPresignData, LocalSaveData};
pub use sign::SignParty;
pub use tools::collections::PartyIdx;
