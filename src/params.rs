//! Run parameters threaded explicitly through every round.
//!
//! Curve selection is carried as an explicit value alongside the party
//! context rather than resolved through a global registry, so nothing in a
//! round's behavior depends on process-wide init-time state.

use crate::tools::collections::PartyIdx;

/// Curve-specific constants. A single variant today (secp256k1 only), but
/// kept as an explicit value rather than a global so a second curve could
/// be added without touching round logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveParams {
    name: &'static str,
}

impl CurveParams {
    pub fn secp256k1() -> Self {
        Self { name: "secp256k1" }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Identifies this run: which party this process is, how many parties are
/// cooperating, and the threshold the signing key was generated for.
#[derive(Debug, Clone)]
pub struct Parameters {
    /// Stable IDs of every participating party, in evaluation-point order
    /// (`party_ids[i]` belongs to `PartyIdx(i)`).
    pub party_ids: Vec<String>,
    pub own_idx: PartyIdx,
    pub threshold: usize,
    pub curve: CurveParams,
}

impl Parameters {
    pub fn num_parties(&self) -> usize {
        self.party_ids.len()
    }

    pub fn own_id(&self) -> &str {
        &self.party_ids[self.own_idx.as_usize()]
    }

    /// Every party index other than our own, in order.
    pub fn peer_indices(&self) -> impl Iterator<Item = PartyIdx> + '_ {
        let own = self.own_idx;
        (0..self.num_parties())
            .map(PartyIdx::from_usize)
            .filter(move |idx| *idx != own)
    }

    pub fn all_indices(&self) -> impl Iterator<Item = PartyIdx> {
        (0..self.num_parties()).map(PartyIdx::from_usize)
    }
}
