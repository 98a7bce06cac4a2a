mod error;
mod service;
mod source;

#[cfg(test)]
mod mocks;

pub use error::{Error, Result};
pub use gpg_crypto::Format;
pub use gpg_keyserver::{Connector, KeyServer, Options};
pub use service::Gpg;
pub use source::KeySource;

/**
 * A provider able to encrypt and decrypt opaque byte buffers.
 */
pub trait Crypt {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>>;

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>>;
}
