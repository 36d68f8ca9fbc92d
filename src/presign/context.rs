//! Shared read-only context and the per-run secret scalars, kept as two
//! separate types instead of one cyclic party/round/tempdata graph: `Ctx`
//! is immutable and freely shared (`Arc`) across the round chain and across
//! round 3's rayon-parallelized proof-verification fan-out; `Secrets` is
//! owned exclusively by the round chain and is zeroized once presign
//! finishes successfully.

use std::sync::Arc;

use rand_core::CryptoRngCore;
use zeroize::Zeroize;

use crate::curve::{Point, Scalar};
use crate::error::{Error, MyFault};
use crate::params::Parameters;
use crate::paillier::keys::Modulus;
use crate::save_data::LocalSaveData;
use crate::tools::collections::PartyIdx;
use crate::zkp::PedersenParams;

/// Everything every round needs to read but nothing mutates: the party's
/// saved key material, the run's parameters, the derived Pedersen
/// parameters, and every party's (public) `W_j = g^{w_j}`.
pub(crate) struct Ctx {
    pub params: Parameters,
    pub save_data: LocalSaveData,
    pub pedersen: PedersenParams,
    pub big_w: Vec<Point>,
}

impl Ctx {
    pub fn new(params: Parameters, save_data: LocalSaveData) -> Result<Arc<Self>, Error> {
        let num_parties = params.num_parties();
        if num_parties != save_data.num_parties() {
            return Err(Error::my_fault(
                1,
                MyFault::ParameterError {
                    threshold: params.threshold,
                    num_parties,
                },
            ));
        }
        if num_parties < params.threshold + 1 {
            return Err(Error::my_fault(
                1,
                MyFault::ParameterError {
                    threshold: params.threshold,
                    num_parties,
                },
            ));
        }
        let big_w = save_data.all_public_w();
        let pedersen = PedersenParams::derive();
        Ok(Arc::new(Self {
            params,
            save_data,
            pedersen,
            big_w,
        }))
    }

    pub fn own_idx(&self) -> PartyIdx {
        self.params.own_idx
    }

    pub fn num_parties(&self) -> usize {
        self.params.num_parties()
    }

    pub fn own_big_w(&self) -> Point {
        self.big_w[self.own_idx().as_usize()]
    }
}

/// Presign-local secret scalars. Zeroized on drop; explicitly wiped
/// (replaced with a fresh zeroed value) once round 7 succeeds.
#[derive(Zeroize)]
#[zeroize(drop)]
pub(crate) struct Secrets {
    pub gamma_i: Scalar,
    pub k_i: Scalar,
    pub w_i: Scalar,
    pub l_i: Scalar,
    pub r_a_i: Modulus,
}

impl Secrets {
    pub fn fresh(ctx: &Ctx, rng: &mut impl CryptoRngCore) -> Self {
        Self {
            gamma_i: Scalar::random(rng),
            k_i: Scalar::random(rng),
            w_i: ctx.save_data.own_w(),
            l_i: Scalar::random(rng),
            r_a_i: Modulus::ZERO,
        }
    }

    /// Overwrites every secret scalar with zero, per the round-7-success
    /// wipe policy. Leaves the value in a valid but useless state; the
    /// struct is dropped immediately afterward in every success path.
    pub fn wipe(&mut self) {
        self.gamma_i.zeroize();
        self.k_i.zeroize();
        self.w_i.zeroize();
        self.l_i.zeroize();
        self.r_a_i.zeroize();
    }
}
