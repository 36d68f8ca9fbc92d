//! Fiat-Shamir transcript hashing.
//!
//! A `Chain`/`Hashable` pair wrapping `sha2::Sha256` directly: this crate's
//! Σ-protocols are all single-challenge, so a fixed-output digest is enough
//! — no need for an XOF that can stretch to an arbitrary challenge length.

use digest::Digest;
use sha2::Sha256;

use crate::curve::Scalar;

/// A running hash with domain separation, built by chaining `chain`/`chain_bytes`
/// calls before finalizing into a challenge scalar.
pub struct Chain(Sha256);

impl Chain {
    pub fn new(domain: &'static str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain.as_bytes());
        Self(hasher)
    }

    pub fn chain_bytes(mut self, bytes: &[u8]) -> Self {
        self.0.update((bytes.len() as u64).to_be_bytes());
        self.0.update(bytes);
        self
    }

    pub fn chain(self, value: &impl Hashable) -> Self {
        let bytes = value.to_hashable_bytes();
        self.chain_bytes(&bytes)
    }

    pub fn finalize_to_scalar(self) -> Scalar {
        let digest: [u8; 32] = self.0.finalize().into();
        Scalar::from_digest_bytes(&digest)
    }

    pub fn finalize_to_bytes(self) -> [u8; 32] {
        self.0.finalize().into()
    }
}

/// Something that can be folded into a Fiat-Shamir transcript.
pub trait Hashable {
    fn to_hashable_bytes(&self) -> Vec<u8>;
}

impl Hashable for crate::curve::Point {
    fn to_hashable_bytes(&self) -> Vec<u8> {
        use k256::elliptic_curve::sec1::ToEncodedPoint;
        self.to_affine().to_encoded_point(true).as_bytes().to_vec()
    }
}

impl Hashable for crate::curve::Scalar {
    fn to_hashable_bytes(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }
}

impl Hashable for [u8] {
    fn to_hashable_bytes(&self) -> Vec<u8> {
        self.to_vec()
    }
}
