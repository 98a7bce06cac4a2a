use std::path::PathBuf;

use gpg_crypto::CryptoError;
use gpg_keyserver::Error as KeyServerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported operation: configure a public key path, or both a key id and a keyserver")]
    UnsupportedConfiguration,

    #[error("no private key path configured")]
    MissingPrivateKey,

    #[error("failed to read key {path:?}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: CryptoError,
    },

    #[error("{context}: {source}")]
    Keyserver {
        context: &'static str,
        #[source]
        source: KeyServerError,
    },

    #[error("no key found for {key_id}")]
    KeyNotFound { key_id: String },

    #[error("expected one key for {key_id}, keyserver returned {count}")]
    AmbiguousKey { key_id: String, count: usize },

    #[error("failed to decrypt private key: {0}")]
    Passphrase(#[source] CryptoError),

    #[error("failed to {operation}: {source}")]
    Crypto {
        operation: &'static str,
        #[source]
        source: CryptoError,
    },
}

impl Error {
    pub(crate) fn keyserver(context: &'static str) -> impl FnOnce(KeyServerError) -> Error {
        move |source| Error::Keyserver { context, source }
    }

    pub(crate) fn crypto(operation: &'static str) -> impl FnOnce(CryptoError) -> Error {
        move |source| Error::Crypto { operation, source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
