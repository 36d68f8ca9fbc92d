pub mod ciphertext;
pub mod keys;

pub use ciphertext::Ciphertext;
pub use keys::{PaillierPublicKey, PaillierSecretKey};
