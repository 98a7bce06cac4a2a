mod engine;
mod reader;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use engine::{decrypt, encrypt, unlock, Format};
pub use pgp::composed::{SignedPublicKey, SignedSecretKey};
pub use reader::{read_public_key, read_secret_key};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("cannot open key file: {0}")]
    Open(#[source] std::io::Error),

    #[error("not an armored OpenPGP key: {0}")]
    Parse(#[source] pgp::errors::Error),

    #[error("cannot unlock secret key: {0}")]
    Locked(#[source] pgp::errors::Error),

    #[error("key has no encryption-capable key material")]
    NoEncryptionKey,

    #[error("{0}")]
    Encrypt(#[source] pgp::errors::Error),

    #[error("{0}")]
    Decrypt(#[source] pgp::errors::Error),

    #[error("decrypted message has no literal data")]
    EmptyMessage,
}
