//! Error hierarchy for the presign and sign engines.
//!
//! Every fallible operation either fails for local reasons (`MyFault`, no
//! named culprit) or because a specific peer misbehaved (`TheirFault`,
//! carrying the offending party's index). The round-level [`Error`] wraps
//! either kind with the task name and round number it occurred in, so
//! callers always get a (task, round, victim, culprits) shape back.

use displaydoc::Display;

use crate::tools::collections::PartyIdx;

/// Reasons a round fails independent of any peer's behavior.
#[derive(Debug, Display)]
pub enum MyFault {
    /// round was started twice
    AlreadyStarted,
    /// threshold {threshold} is incompatible with {num_parties} parties
    ParameterError { threshold: usize, num_parties: usize },
    /// a Paillier operation failed: {0}
    PaillierOpFailed(&'static str),
    /// internal consistency check failed: {0}
    Internal(&'static str),
}

/// Reasons a round fails attributable to a specific remote party.
#[derive(Debug, Display)]
pub enum TheirFault {
    /// message from party {from} failed basic validation: {reason}
    InvalidMessage { from: PartyIdx, reason: &'static str },
    /// {proof} from party {from} failed to verify
    ZkVerificationFailed { proof: &'static str, from: PartyIdx },
    /// commitment opened by party {from} does not match what was committed
    CommitmentMismatch { from: PartyIdx },
}

/// A round-level error, carrying the task and round it occurred in.
#[derive(Debug, Display)]
pub enum Error {
    /// presign round {round}: {fault}
    MyFault { round: u8, fault: MyFault },
    /// presign round {round}: culprit party {culprit}, fault: {fault}
    TheirFault {
        round: u8,
        culprit: PartyIdx,
        fault: TheirFault,
    },
    /// identifiable abort (type 5) at round {round}, culprits: {culprits:?}
    ConsistencyAbortT5 { round: u8, culprits: Vec<PartyIdx> },
    /// identifiable abort (type 7) at round {round}, culprits: {culprits:?}
    ConsistencyAbortT7 { round: u8, culprits: Vec<PartyIdx> },
}

impl Error {
    pub fn my_fault(round: u8, fault: MyFault) -> Self {
        Self::MyFault { round, fault }
    }

    pub fn their_fault(round: u8, culprit: PartyIdx, fault: TheirFault) -> Self {
        Self::TheirFault {
            round,
            culprit,
            fault,
        }
    }
}

impl std::error::Error for Error {}
impl std::error::Error for MyFault {}
impl std::error::Error for TheirFault {}

pub type Result<T> = core::result::Result<T, Error>;
