//! Per-peer slot storage.
//!
//! `PeerMap` is a fixed-size, index-addressed collection with "own slot"
//! excluded, used to track per-sender round messages without a
//! `Vec<Option<T>>` (and its associated "did I check every slot" bookkeeping)
//! at every call site.

use core::fmt;
use serde::{Deserialize, Serialize};

/// A party's position in the sorted-by-evaluation-point party list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PartyIdx(u32);

impl PartyIdx {
    pub fn from_usize(idx: usize) -> Self {
        Self(idx as u32)
    }

    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PartyIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A value present (or absent, while being collected) for every party index
/// other than `own_idx`.
#[derive(Debug, Clone)]
pub struct PeerMap<T> {
    own_idx: PartyIdx,
    slots: Vec<Option<T>>,
}

impl<T> PeerMap<T> {
    pub fn new(num_parties: usize, own_idx: PartyIdx) -> Self {
        let mut slots = Vec::with_capacity(num_parties);
        slots.resize_with(num_parties, || None);
        Self { own_idx, slots }
    }

    pub fn own_idx(&self) -> PartyIdx {
        self.own_idx
    }

    pub fn num_parties(&self) -> usize {
        self.slots.len()
    }

    pub fn insert(&mut self, idx: PartyIdx, value: T) {
        debug_assert!(idx != self.own_idx, "own slot is never written through insert");
        self.slots[idx.as_usize()] = Some(value);
    }

    pub fn get(&self, idx: PartyIdx) -> Option<&T> {
        self.slots[idx.as_usize()].as_ref()
    }

    /// True once every slot except `own_idx` holds a value.
    pub fn is_complete(&self) -> bool {
        self.slots
            .iter()
            .enumerate()
            .all(|(i, v)| i == self.own_idx.as_usize() || v.is_some())
    }

    pub fn other_indices(&self) -> impl Iterator<Item = PartyIdx> + '_ {
        let own = self.own_idx;
        (0..self.slots.len())
            .map(PartyIdx::from_usize)
            .filter(move |idx| *idx != own)
    }

    /// Iterates `(index, value)` over the filled peer slots, panicking if
    /// any non-own slot is still empty. Callers should check
    /// [`Self::is_complete`] first.
    pub fn iter_filled(&self) -> impl Iterator<Item = (PartyIdx, &T)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, v)| {
            v.as_ref().map(|value| (PartyIdx::from_usize(i), value))
        })
    }

    pub fn into_filled(self) -> Vec<(PartyIdx, T)> {
        self.slots
            .into_iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|value| (PartyIdx::from_usize(i), value)))
            .collect()
    }
}
