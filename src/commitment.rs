//! Hash commitment scheme used to commit to Γ_i in round 1 and reveal it in
//! round 4, preventing a late party from biasing the nonce point by
//! choosing its Γ_i after seeing everyone else's.

use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};

use crate::tools::hashing::{Chain, Hashable};

/// A 32-byte decommitment blinding value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Randomness([u8; 32]);

impl Randomness {
    pub fn random(rng: &mut impl CryptoRngCore) -> Self {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }
}

/// The commitment half, safe to broadcast immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment([u8; 32]);

/// Commits to an arbitrary sequence of hashable values, returning the
/// commitment to broadcast now and the randomness to reveal later.
pub fn commit(
    values: &[&dyn Hashable],
    rng: &mut impl CryptoRngCore,
) -> (Commitment, Randomness) {
    let randomness = Randomness::random(rng);
    (hash(values, &randomness), randomness)
}

fn hash(values: &[&dyn Hashable], randomness: &Randomness) -> Commitment {
    let mut chain = Chain::new("gg20-presign/commitment");
    for value in values {
        chain = chain.chain_bytes(&value.to_hashable_bytes());
    }
    chain = chain.chain_bytes(&randomness.0);
    Commitment(chain.finalize_to_bytes())
}

/// Checks that `randomness` opens `commitment` to `values`.
pub fn open(commitment: &Commitment, values: &[&dyn Hashable], randomness: &Randomness) -> bool {
    &hash(values, randomness) == commitment
}
