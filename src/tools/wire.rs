//! Wire encoding and the `ValidateBasic` discipline applied at `Store` time.
//!
//! Every received message runs through `ValidateBasic` before it is folded
//! into round state. `bincode` (`serde` feature enabled) handles the actual
//! wire encoding; `ValidateBasic` is a small trait every message type
//! implements directly rather than a generated proto-style method.

use serde::{de::DeserializeOwned, Serialize};

/// Non-cryptographic shape checks a received message must pass before it is
/// even considered by a round's verification logic: non-degenerate points,
/// in-range scalars, right-shaped proof vectors. Failing this is
/// [`crate::error::TheirFault::InvalidMessage`] — silently discarded, not a
/// named-culprit fault.
pub trait ValidateBasic {
    fn validate_basic(&self) -> bool;
}

/// Encodes a message for the wire. Infallible for the well-formed, `Sized`
/// message types this crate defines.
pub fn marshal<T: Serialize>(value: &T) -> Vec<u8> {
    bincode::serde::encode_to_vec(value, bincode::config::standard())
        .expect("message types are always serializable")
}

/// Decodes a message from the wire, returning `None` on any schema
/// violation (malformed bytes, wrong variant tag, trailing data).
pub fn unmarshal<T: DeserializeOwned>(bytes: &[u8]) -> Option<T> {
    bincode::serde::decode_from_slice(bytes, bincode::config::standard())
        .ok()
        .map(|(value, _)| value)
}
