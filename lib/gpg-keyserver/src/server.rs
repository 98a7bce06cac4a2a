use std::time::Duration;

use pgp::composed::SignedPublicKey;
use thiserror::Error;

use crate::{Address, KeyId};

#[derive(Debug, Error, Eq, PartialEq)]
pub enum Error {
    #[error("invalid keyserver address {0:?}")]
    InvalidAddress(String),

    #[error("invalid key id {0:?}")]
    InvalidKeyId(String),

    #[error("could not build client: {0}")]
    Client(String),

    #[error("request failed: {0}")]
    Network(String),

    #[error("keyserver answered with status {0}")]
    Status(u16),

    #[error("response does not hold a public key: {0}")]
    MalformedResponse(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Client settings. The default applies no timeout and the HTTP library's
/// own user agent.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Options {
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

pub trait KeyServer {
    /// Every key the server holds for `key_id`. An unknown id yields an
    /// empty list rather than an error.
    fn get_keys_by_id(&self, key_id: &KeyId) -> Result<Vec<SignedPublicKey>>;
}

/// Creates keyserver clients on demand.
pub trait Connector: Send + Sync {
    fn connect(&self, address: &Address, options: &Options) -> Result<Box<dyn KeyServer>>;
}
