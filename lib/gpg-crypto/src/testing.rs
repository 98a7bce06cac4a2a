//! Key generation for tests.

use std::path::{Path, PathBuf};

use pgp::{
    composed::{
        KeyType, SecretKeyParamsBuilder, SignedPublicKey, SignedSecretKey, SubkeyParamsBuilder,
    },
    types::{KeyTrait, SecretKeyTrait},
};

pub struct KeyPair {
    pub secret: SignedSecretKey,
    pub public: SignedPublicKey,
}

impl KeyPair {
    /// Upper-case hex fingerprint of the primary key.
    pub fn fingerprint(&self) -> String {
        hex_fingerprint(&self.public.primary_key)
    }

    /// Writes both halves as armored files into `dir` and returns the
    /// `(public, secret)` paths.
    pub fn write_to(&self, dir: &Path) -> (PathBuf, PathBuf) {
        let public_path = dir.join("public.asc");
        let secret_path = dir.join("secret.asc");

        let public = self
            .public
            .to_armored_string(Default::default())
            .expect("armor public key");
        let secret = self
            .secret
            .to_armored_string(Default::default())
            .expect("armor secret key");

        std::fs::write(&public_path, public).expect("write public key");
        std::fs::write(&secret_path, secret).expect("write secret key");

        (public_path, secret_path)
    }
}

pub fn hex_fingerprint(key: &impl KeyTrait) -> String {
    key.fingerprint().iter().map(|b| format!("{:02X}", b)).collect()
}

/// An EdDSA signing key with a Curve25519 encryption subkey. An empty
/// passphrase leaves the secret material unprotected.
pub fn generate(user_id: &str, passphrase: &str) -> KeyPair {
    let protection = if passphrase.is_empty() {
        None
    } else {
        Some(passphrase.to_owned())
    };

    let subkey = SubkeyParamsBuilder::default()
        .key_type(KeyType::ECDH)
        .can_encrypt(true)
        .passphrase(protection.clone())
        .build()
        .expect("subkey params");

    let params = SecretKeyParamsBuilder::default()
        .key_type(KeyType::EdDSA)
        .can_create_certificates(true)
        .can_sign(true)
        .primary_user_id(user_id.into())
        .passphrase(protection)
        .subkeys(vec![subkey])
        .build()
        .expect("key params");

    let pw = passphrase.to_owned();
    let secret = params
        .generate()
        .expect("generate key")
        .sign(|| pw.clone())
        .expect("self-sign secret key");
    let public = secret
        .public_key()
        .sign(&secret, || pw.clone())
        .expect("sign public key");

    KeyPair { secret, public }
}
