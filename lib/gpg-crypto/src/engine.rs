use std::io::Cursor;

use log::debug;
use pgp::{
    composed::{SignedPublicKey, SignedSecretKey},
    crypto::sym::SymmetricKeyAlgorithm,
    ser::Serialize,
    types::{KeyTrait, SecretKeyTrait},
    Deserializable, Message,
};

use crate::CryptoError;

const SESSION_CIPHER: SymmetricKeyAlgorithm = SymmetricKeyAlgorithm::AES128;
const ARMOR_PREFIX: &[u8] = b"-----BEGIN PGP";

/// Output encoding of an encrypted message.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Format {
    Binary,
    Armored,
}

impl Default for Format {
    fn default() -> Self {
        Format::Binary
    }
}

/// Encrypts `plaintext` to `recipient` under a fresh session key.
///
/// The recipient's encryption subkeys are used when it has any, otherwise
/// the primary key, provided its algorithm can encrypt.
pub fn encrypt(
    plaintext: &[u8],
    recipient: &SignedPublicKey,
    format: Format,
) -> Result<Vec<u8>, CryptoError> {
    let message = Message::new_literal_bytes("", plaintext);
    let mut rng = rand::thread_rng();

    let subkeys: Vec<_> = recipient
        .public_subkeys
        .iter()
        .map(|k| &k.key)
        .filter(|k| k.is_encryption_key())
        .collect();

    let encrypted = if !subkeys.is_empty() {
        debug!("Encrypting {} bytes to {} subkey(s)", plaintext.len(), subkeys.len());
        message.encrypt_to_keys(&mut rng, SESSION_CIPHER, &subkeys[..])
    } else if recipient.primary_key.is_encryption_key() {
        debug!("Encrypting {} bytes to primary key", plaintext.len());
        message.encrypt_to_keys(&mut rng, SESSION_CIPHER, &[&recipient.primary_key])
    } else {
        return Err(CryptoError::NoEncryptionKey);
    }
    .map_err(CryptoError::Encrypt)?;

    match format {
        Format::Binary => encrypted.to_bytes().map_err(CryptoError::Encrypt),
        Format::Armored => encrypted
            .to_armored_string(Default::default())
            .map(String::into_bytes)
            .map_err(CryptoError::Encrypt),
    }
}

/// Decrypts a binary or armored message with `key` and returns its literal
/// body. Signatures are not checked.
pub fn decrypt(
    ciphertext: &[u8],
    key: &SignedSecretKey,
    passphrase: &str,
) -> Result<Vec<u8>, CryptoError> {
    let message = if is_armored(ciphertext) {
        Message::from_armor_single(Cursor::new(ciphertext)).map(|(m, _)| m)
    } else {
        Message::from_bytes(Cursor::new(ciphertext))
    }
    .map_err(CryptoError::Decrypt)?;

    let pw = passphrase.to_owned();
    let (mut decrypter, _key_ids) = message
        .decrypt(move || pw, &[key])
        .map_err(CryptoError::Decrypt)?;

    decrypter
        .next()
        .ok_or(CryptoError::EmptyMessage)?
        .map_err(CryptoError::Decrypt)?
        .get_content()
        .map_err(CryptoError::Decrypt)?
        .ok_or(CryptoError::EmptyMessage)
}

/// Checks `passphrase` against the primary key and every secret subkey.
/// Keys stored in the clear accept any passphrase.
pub fn unlock(key: &SignedSecretKey, passphrase: &str) -> Result<(), CryptoError> {
    key.primary_key
        .unlock(|| passphrase.to_owned(), |_| Ok(()))
        .map_err(CryptoError::Locked)?;

    for subkey in key.secret_subkeys.iter() {
        subkey
            .key
            .unlock(|| passphrase.to_owned(), |_| Ok(()))
            .map_err(CryptoError::Locked)?;
    }

    Ok(())
}

fn is_armored(buf: &[u8]) -> bool {
    buf.iter()
        .position(|b| !b.is_ascii_whitespace())
        .map_or(false, |start| buf[start..].starts_with(ARMOR_PREFIX))
}
