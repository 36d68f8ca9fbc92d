pub mod aux;
pub mod ecddh_proof;
pub mod pdl_with_slack;
pub mod proof_bob;
pub mod range_proof_alice;
pub mod t_proof;

pub use aux::AuxiliaryRsaParams;
pub use ecddh_proof::EcddhProof;
pub use pdl_with_slack::PdlWithSlackProof;
pub use proof_bob::{ProofBob, ProofBobWc};
pub use range_proof_alice::RangeProofAlice;
pub use t_proof::{PedersenParams, StProof, TProof};
