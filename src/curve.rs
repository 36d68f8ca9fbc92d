//! secp256k1 scalar and point wrappers.
//!
//! Thin newtypes over `k256` so the rest of the crate never names
//! `k256::ProjectivePoint` / `k256::Scalar` directly, keeping curve
//! arithmetic centralized behind one module rather than spreading `k256`
//! types through every protocol file.

use k256::elliptic_curve::bigint::Encoding;
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::Field;
use k256::{AffinePoint, ProjectivePoint, Scalar as K256Scalar, U256};
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// A scalar mod the secp256k1 group order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Zeroize)]
pub struct Scalar(K256Scalar);

impl Scalar {
    pub fn zero() -> Self {
        Self(K256Scalar::ZERO)
    }

    pub fn random(rng: &mut impl CryptoRngCore) -> Self {
        Self(K256Scalar::random(rng))
    }

    /// Reduces a 32-byte message digest to a scalar, as ECDSA does.
    pub fn from_digest_bytes(bytes: &[u8; 32]) -> Self {
        Self(K256Scalar::reduce(U256::from_be_bytes(*bytes)))
    }

    pub fn invert(&self) -> Option<Self> {
        Option::from(self.0.invert()).map(Self)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes().into()
    }

    pub fn from_bytes(bytes: &[u8; 32]) -> Option<Self> {
        Option::from(K256Scalar::from_repr((*bytes).into())).map(Self)
    }

    /// Reduces an arbitrary-length big-endian integer mod the curve order,
    /// by Horner's method over 32-byte chunks (each chunk already reduced
    /// mod q by [`Self::from_digest_bytes`]). Used to pull a curve-side
    /// exponent out of a Paillier-sized (2048-bit) ZK-proof response, e.g.
    /// `ProofBobWc`'s `s1`, whose value is a plain unbounded integer and
    /// must be reduced mod q before it can serve as a scalar multiplier —
    /// truncating to the low 256 bits instead would silently break the
    /// proof's soundness.
    pub fn from_wide_bytes_mod_q(bytes: &[u8]) -> Self {
        let two_pow_256 = {
            let mut acc = Self::one();
            for _ in 0..256 {
                acc = acc + acc;
            }
            acc
        };
        let mut acc = Self::zero();
        for chunk in bytes.chunks(32) {
            let mut padded = [0u8; 32];
            padded[32 - chunk.len()..].copy_from_slice(chunk);
            acc = acc * two_pow_256 + Self::from_digest_bytes(&padded);
        }
        acc
    }

    pub fn one() -> Self {
        Self(K256Scalar::ONE)
    }

    /// The underlying big-endian integer representation, for use in
    /// Paillier / ZK-proof arithmetic that works mod N rather than mod q.
    pub fn as_uint(&self) -> U256 {
        U256::from_be_bytes(self.to_bytes())
    }

    pub(crate) fn inner(&self) -> K256Scalar {
        self.0
    }

    pub(crate) fn from_inner(inner: K256Scalar) -> Self {
        Self(inner)
    }
}

impl core::ops::Add for Scalar {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl core::ops::Sub for Scalar {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl core::ops::Mul for Scalar {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self(self.0 * rhs.0)
    }
}

impl core::ops::Neg for Scalar {
    type Output = Self;
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Serialize for Scalar {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_bytes().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = <[u8; 32]>::deserialize(deserializer)?;
        Self::from_bytes(&bytes).ok_or_else(|| serde::de::Error::custom("scalar out of range"))
    }
}

/// A point on secp256k1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point(ProjectivePoint);

impl Point {
    pub fn identity() -> Self {
        Self(ProjectivePoint::IDENTITY)
    }

    pub fn generator() -> Self {
        Self(ProjectivePoint::GENERATOR)
    }

    pub fn mul_by_generator(scalar: &Scalar) -> Self {
        Self(ProjectivePoint::GENERATOR * scalar.inner())
    }

    pub fn is_identity(&self) -> bool {
        self.0 == ProjectivePoint::IDENTITY
    }

    /// The x-coordinate reduced mod the curve order, as ECDSA's `r` is
    /// derived from the nonce point.
    pub fn x_as_scalar(&self) -> Option<Scalar> {
        if self.is_identity() {
            return None;
        }
        let encoded = self.0.to_affine().to_encoded_point(false);
        let x_bytes: [u8; 32] = encoded.x()?.as_slice().try_into().ok()?;
        Some(Scalar(K256Scalar::reduce(U256::from_be_bytes(x_bytes))))
    }

    pub fn to_affine(&self) -> AffinePoint {
        self.0.to_affine()
    }

    pub(crate) fn inner(&self) -> ProjectivePoint {
        self.0
    }
}

impl core::ops::Add for Point {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl core::ops::Mul<Scalar> for Point {
    type Output = Self;
    fn mul(self, rhs: Scalar) -> Self {
        Self(self.0 * rhs.inner())
    }
}

impl core::ops::Sub for Point {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl core::ops::Neg for Point {
    type Output = Self;
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Serialize for Point {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = self.0.to_affine().to_encoded_point(true);
        serde_bytes_slice(encoded.as_bytes(), serializer)
    }
}

impl<'de> Deserialize<'de> for Point {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = Vec::<u8>::deserialize(deserializer)?;
        let affine =
            AffinePoint::from_encoded_point(&k256::EncodedPoint::from_bytes(&bytes).map_err(
                |_| serde::de::Error::custom("invalid encoded point"),
            )?);
        let affine: Option<AffinePoint> = affine.into();
        affine
            .map(|a| Self(ProjectivePoint::from(a)))
            .ok_or_else(|| serde::de::Error::custom("point not on curve"))
    }
}

fn serde_bytes_slice<S: serde::Serializer>(
    bytes: &[u8],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_bytes(bytes)
}

/// A signature in (r, s, recovery_id) form, post low-S normalization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RecoverableSignature {
    pub r: Scalar,
    pub s: Scalar,
    pub recovery_id: u8,
}

impl RecoverableSignature {
    /// Builds a low-S-normalized, recoverable signature from an aggregated
    /// `(r, s)` pair and verifies it under `public_key` before handing it
    /// back. `message` is the digest already reduced mod the curve order,
    /// per online-sign's input contract.
    ///
    /// `None` means the aggregate does not verify: every `s_i` share already
    /// passed its own round's proofs, so this is a last-mile correctness
    /// check rather than a named-culprit fault.
    pub fn recover(r: Scalar, s: Scalar, public_key: Point, message: Scalar) -> Option<Self> {
        use k256::ecdsa::signature::hazmat::PrehashVerifier;
        use k256::ecdsa::{RecoveryId, Signature as K256Signature, VerifyingKey};

        let verifying_key = VerifyingKey::from_affine(public_key.to_affine()).ok()?;
        let sig = K256Signature::from_scalars(r.inner(), s.inner()).ok()?;
        let sig = sig.normalize_s().unwrap_or(sig);
        let prehash = message.to_bytes();

        let recovery_id = RecoveryId::trial_recovery_from_prehash(&verifying_key, &prehash, &sig).ok()?;
        verifying_key.verify_prehash(&prehash, &sig).ok()?;

        Some(Self {
            r: Scalar::from_inner(*sig.r()),
            s: Scalar::from_inner(*sig.s()),
            recovery_id: recovery_id.to_byte(),
        })
    }

    /// Recovers the k256 (signature, recovery id) pair for interop with
    /// code that expects the `ecdsa`/`k256` wire types directly (e.g. a
    /// transport layer or a library-verification test).
    pub fn to_backend(&self) -> (k256::ecdsa::Signature, k256::ecdsa::RecoveryId) {
        use k256::ecdsa::{RecoveryId, Signature as K256Signature};
        let sig = K256Signature::from_scalars(self.r.inner(), self.s.inner())
            .expect("r, s were already valid nonzero scalars when this signature was built");
        let recovery_id = RecoveryId::from_byte(self.recovery_id)
            .expect("recovery_id was already validated when this signature was built");
        (sig, recovery_id)
    }
}
