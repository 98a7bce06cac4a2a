use std::{fs::File, path::Path};

use log::debug;
use pgp::{
    composed::{SignedPublicKey, SignedSecretKey},
    Deserializable,
};

use crate::CryptoError;

pub fn read_public_key(path: &Path) -> Result<SignedPublicKey, CryptoError> {
    debug!("Reading public key from {:?}", path);
    read_entity(path)
}

pub fn read_secret_key(path: &Path) -> Result<SignedSecretKey, CryptoError> {
    debug!("Reading secret key from {:?}", path);
    read_entity(path)
}

/// Decodes the single armored key held in `path`.
fn read_entity<K: Deserializable>(path: &Path) -> Result<K, CryptoError> {
    let f = File::open(path).map_err(CryptoError::Open)?;
    let (key, _headers) = K::from_armor_single(f).map_err(CryptoError::Parse)?;
    Ok(key)
}
