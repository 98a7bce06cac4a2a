use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use gpg_crypto::{Format, SignedPublicKey};
use gpg_hkp::HkpConnector;
use gpg_keyserver::{Address, Connector, KeyId, Options};
use log::{debug, info, warn};

use crate::{Crypt, Error, KeySource, Result};

/**
 * OpenPGP encryption against either a local public key file or a key
 * looked up on a keyserver, and decryption with a local private key.
 *
 * Key material is read fresh on every call.
 */
pub struct Gpg {
    public_key_path: Option<PathBuf>,
    private_key_path: Option<PathBuf>,
    passphrase: Option<String>,
    key_id: Option<String>,
    key_server: Option<String>,
    format: Format,
    options: Options,
    connector: Arc<dyn Connector>,
}

impl fmt::Debug for Gpg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Gpg")
            .field("public_key_path", &self.public_key_path)
            .field("private_key_path", &self.private_key_path)
            .field("key_id", &self.key_id)
            .field("key_server", &self.key_server)
            .field("format", &self.format)
            .finish()
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}

fn non_empty_path(p: Option<PathBuf>) -> Option<PathBuf> {
    p.filter(|p| !p.as_os_str().is_empty())
}

impl Gpg {
    pub fn new(
        public_key_path: Option<PathBuf>,
        private_key_path: Option<PathBuf>,
        passphrase: Option<String>,
        key_id: Option<String>,
        key_server: Option<String>,
    ) -> Gpg {
        Gpg {
            public_key_path: non_empty_path(public_key_path),
            private_key_path: non_empty_path(private_key_path),
            passphrase,
            key_id: non_empty(key_id),
            key_server: non_empty(key_server),
            format: Format::default(),
            options: Options::default(),
            connector: Arc::new(HkpConnector),
        }
    }

    /// Emit ASCII-armored ciphertext instead of binary packets.
    pub fn with_armor(mut self, armor: bool) -> Gpg {
        self.format = if armor { Format::Armored } else { Format::Binary };
        self
    }

    pub fn with_options(mut self, options: Options) -> Gpg {
        self.options = options;
        self
    }

    pub fn with_connector(mut self, connector: Arc<dyn Connector>) -> Gpg {
        self.connector = connector;
        self
    }

    pub fn key_source(&self) -> Option<KeySource> {
        KeySource::select(
            self.public_key_path.as_deref(),
            self.key_id.as_deref(),
            self.key_server.as_deref(),
        )
    }

    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        match self.key_source() {
            Some(KeySource::LocalFile(path)) => self.encrypt_with_key(plaintext, &path),
            Some(KeySource::Remote { key_id, server }) => {
                self.encrypt_with_key_server(plaintext, &key_id, &server)
            }
            None => Err(Error::UnsupportedConfiguration),
        }
    }

    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let path = self
            .private_key_path
            .as_deref()
            .ok_or(Error::MissingPrivateKey)?;

        let key = gpg_crypto::read_secret_key(path).map_err(|source| Error::KeyRead {
            path: path.to_owned(),
            source,
        })?;

        let passphrase = self.passphrase.as_deref().unwrap_or_default();
        gpg_crypto::unlock(&key, passphrase).map_err(Error::Passphrase)?;

        debug!("Decrypting {}-byte message", ciphertext.len());
        gpg_crypto::decrypt(ciphertext, &key, passphrase).map_err(Error::crypto("decrypt"))
    }

    fn encrypt_with_key(&self, plaintext: &[u8], path: &Path) -> Result<Vec<u8>> {
        let key = gpg_crypto::read_public_key(path).map_err(|source| Error::KeyRead {
            path: path.to_owned(),
            source,
        })?;

        self.encrypt_to(plaintext, &key)
    }

    fn encrypt_with_key_server(
        &self,
        plaintext: &[u8],
        key_id: &str,
        server: &str,
    ) -> Result<Vec<u8>> {
        let address =
            Address::parse(server).map_err(Error::keyserver("failed to parse keyserver"))?;
        let key_id = KeyId::parse(key_id).map_err(Error::keyserver("failed to parse key"))?;

        let client = self
            .connector
            .connect(&address, &self.options)
            .map_err(Error::keyserver("failed to create keyserver client"))?;

        info!("Fetching key {} from {}", key_id, address);
        let mut keys = client
            .get_keys_by_id(&key_id)
            .map_err(Error::keyserver("failed to get key"))?;

        let fetched = keys.len();
        keys.retain(|key| key_id.matches(key));
        if keys.len() < fetched {
            warn!(
                "Ignoring {} key(s) from {} not matching {}",
                fetched - keys.len(),
                address,
                key_id
            );
        }

        if keys.len() > 1 {
            return Err(Error::AmbiguousKey {
                key_id: key_id.into_string(),
                count: keys.len(),
            });
        }

        let key = keys.pop().ok_or_else(|| Error::KeyNotFound {
            key_id: key_id.into_string(),
        })?;

        self.encrypt_to(plaintext, &key)
    }

    fn encrypt_to(&self, plaintext: &[u8], key: &SignedPublicKey) -> Result<Vec<u8>> {
        debug!("Encrypting {} bytes as {:?}", plaintext.len(), self.format);
        gpg_crypto::encrypt(plaintext, key, self.format).map_err(Error::crypto("encrypt"))
    }
}

impl Crypt for Gpg {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        Gpg::encrypt(self, plaintext)
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        Gpg::decrypt(self, ciphertext)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::mocks::{StaticConnector, UnreachableConnector};
    use gpg_crypto::testing::{self, KeyPair};
    use gpg_keyserver::Error as KeyServerError;
    use tempfile::TempDir;

    const PLAINTEXT: &[u8] = b"the quick brown fox";
    const PASSPHRASE: &str = "s3cret passphrase";
    const KEY_ID: &str = "0x1234ABCD5678EF90";
    const KEY_SERVER: &str = "hkps://keys.example.org";

    struct Fixture {
        _dir: TempDir,
        pair: KeyPair,
        public_path: PathBuf,
        secret_path: PathBuf,
        key_id: String,
    }

    fn fixture(passphrase: &str) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let pair = testing::generate("Alice <alice@example.com>", passphrase);
        let (public_path, secret_path) = pair.write_to(dir.path());
        let key_id = pair.fingerprint()[24..].to_string();
        Fixture {
            _dir: dir,
            pair,
            public_path,
            secret_path,
            key_id,
        }
    }

    fn local(f: &Fixture, passphrase: &str) -> Gpg {
        Gpg::new(
            Some(f.public_path.clone()),
            Some(f.secret_path.clone()),
            Some(passphrase.to_string()),
            None,
            None,
        )
    }

    fn remote(f: &Fixture, connector: Arc<dyn Connector>) -> Gpg {
        remote_by_id(f, &format!("0x{}", f.key_id), connector)
    }

    fn remote_by_id(f: &Fixture, key_id: &str, connector: Arc<dyn Connector>) -> Gpg {
        Gpg::new(
            None,
            Some(f.secret_path.clone()),
            Some(PASSPHRASE.to_string()),
            Some(key_id.to_string()),
            Some(KEY_SERVER.to_string()),
        )
        .with_connector(connector)
    }

    #[test]
    fn round_trip_with_local_key() {
        let f = fixture(PASSPHRASE);
        let gpg = local(&f, PASSPHRASE);

        let ciphertext = gpg.encrypt(PLAINTEXT).unwrap();
        assert_ne!(&ciphertext[..], PLAINTEXT);
        assert_eq!(gpg.decrypt(&ciphertext).unwrap(), PLAINTEXT);
    }

    #[test]
    fn round_trip_armored() {
        let f = fixture("");
        let gpg = local(&f, "").with_armor(true);

        let ciphertext = gpg.encrypt(PLAINTEXT).unwrap();
        assert!(ciphertext.starts_with(b"-----BEGIN PGP MESSAGE-----"));
        assert_eq!(gpg.decrypt(&ciphertext).unwrap(), PLAINTEXT);
    }

    #[test]
    fn round_trip_through_crypt_trait() {
        let f = fixture(PASSPHRASE);
        let crypt: Box<dyn Crypt> = Box::new(local(&f, PASSPHRASE));

        let ciphertext = crypt.encrypt(PLAINTEXT).unwrap();
        assert_eq!(crypt.decrypt(&ciphertext).unwrap(), PLAINTEXT);
    }

    #[test]
    fn round_trip_with_keyserver() {
        let f = fixture(PASSPHRASE);
        let connector = Arc::new(StaticConnector::new(vec![f.pair.public.clone()]));
        let lookups = connector.lookups.clone();
        let gpg = remote(&f, connector);

        let ciphertext = gpg.encrypt(PLAINTEXT).unwrap();
        assert_eq!(gpg.decrypt(&ciphertext).unwrap(), PLAINTEXT);

        assert_eq!(
            *lookups.lock().unwrap(),
            vec![("https://keys.example.org".to_string(), f.key_id.clone())]
        );
    }

    #[test]
    fn keyserver_lookup_by_fingerprint_or_subkey_id() {
        let f = fixture(PASSPHRASE);
        let subkey = testing::hex_fingerprint(&f.pair.public.public_subkeys[0].key);
        let short_id = format!("0x{}", &f.key_id[8..]);

        for key_id in &[f.pair.fingerprint(), subkey[24..].to_string(), short_id] {
            let connector = Arc::new(StaticConnector::new(vec![f.pair.public.clone()]));
            let gpg = remote_by_id(&f, key_id, connector);

            let ciphertext = gpg.encrypt(PLAINTEXT).unwrap();
            assert_eq!(gpg.decrypt(&ciphertext).unwrap(), PLAINTEXT);
        }
    }

    #[test]
    fn keyserver_key_with_other_id_is_ignored() {
        let f = fixture(PASSPHRASE);
        let gpg = remote_by_id(
            &f,
            "0xDEADBEEF",
            Arc::new(StaticConnector::new(vec![f.pair.public.clone()])),
        );

        match gpg.encrypt(PLAINTEXT) {
            Err(Error::KeyNotFound { key_id }) => assert_eq!(key_id, "DEADBEEF"),
            other => panic!("unexpected result: {:?}", other),
        }

        let mallory = testing::generate("Mallory <mallory@example.com>", "");
        let gpg = remote(&f, Arc::new(StaticConnector::new(vec![mallory.public])));
        assert!(matches!(
            gpg.encrypt(PLAINTEXT),
            Err(Error::KeyNotFound { .. })
        ));
    }

    #[test]
    fn local_key_preferred_over_keyserver() {
        let f = fixture("");
        let connector = Arc::new(StaticConnector::new(Vec::new()));
        let lookups = connector.lookups.clone();
        let gpg = Gpg::new(
            Some(f.public_path.clone()),
            Some(f.secret_path.clone()),
            None,
            Some(KEY_ID.to_string()),
            Some(KEY_SERVER.to_string()),
        )
        .with_connector(connector);

        let ciphertext = gpg.encrypt(PLAINTEXT).unwrap();
        assert_eq!(gpg.decrypt(&ciphertext).unwrap(), PLAINTEXT);
        assert!(lookups.lock().unwrap().is_empty());
    }

    #[test]
    fn no_key_source_is_unsupported() {
        let gpg = Gpg::new(None, None, None, None, None);
        assert!(matches!(
            gpg.encrypt(PLAINTEXT),
            Err(Error::UnsupportedConfiguration)
        ));

        let gpg = Gpg::new(None, None, None, Some(KEY_ID.to_string()), None);
        assert!(matches!(
            gpg.encrypt(PLAINTEXT),
            Err(Error::UnsupportedConfiguration)
        ));

        let gpg = Gpg::new(
            Some(PathBuf::new()),
            None,
            None,
            Some(String::new()),
            Some(KEY_SERVER.to_string()),
        );
        assert!(matches!(
            gpg.encrypt(PLAINTEXT),
            Err(Error::UnsupportedConfiguration)
        ));
    }

    #[test]
    fn wrong_passphrase_fails() {
        let f = fixture(PASSPHRASE);
        let ciphertext = local(&f, PASSPHRASE).encrypt(PLAINTEXT).unwrap();

        let result = local(&f, "not the passphrase").decrypt(&ciphertext);
        assert!(matches!(result, Err(Error::Passphrase(_))));
    }

    #[test]
    fn missing_passphrase_fails() {
        let f = fixture(PASSPHRASE);
        let ciphertext = local(&f, PASSPHRASE).encrypt(PLAINTEXT).unwrap();

        let gpg = Gpg::new(None, Some(f.secret_path.clone()), None, None, None);
        assert!(matches!(gpg.decrypt(&ciphertext), Err(Error::Passphrase(_))));
    }

    #[test]
    fn keyserver_without_keys() {
        let f = fixture(PASSPHRASE);
        let gpg = remote(&f, Arc::new(StaticConnector::new(Vec::new())));

        match gpg.encrypt(PLAINTEXT) {
            Err(Error::KeyNotFound { key_id }) => assert_eq!(key_id, f.key_id),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn keyserver_with_several_keys() {
        let f = fixture(PASSPHRASE);
        let other = testing::generate("Bob <bob@example.com>", "");
        let keys = vec![f.pair.public.clone(), other.public, f.pair.public.clone()];
        let gpg = remote(&f, Arc::new(StaticConnector::new(keys)));

        match gpg.encrypt(PLAINTEXT) {
            Err(Error::AmbiguousKey { count, .. }) => assert_eq!(count, 2),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn keyserver_failure_is_wrapped() {
        let f = fixture(PASSPHRASE);
        let gpg = remote(&f, Arc::new(UnreachableConnector));

        match gpg.encrypt(PLAINTEXT) {
            Err(Error::Keyserver { context, source }) => {
                assert_eq!(context, "failed to get key");
                assert_eq!(
                    source,
                    KeyServerError::Network("connection refused".to_string())
                );
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn invalid_key_id_and_server() {
        let f = fixture(PASSPHRASE);
        let connector: Arc<dyn Connector> = Arc::new(StaticConnector::new(Vec::new()));

        let gpg = Gpg::new(
            None,
            None,
            None,
            Some("not-a-key".to_string()),
            Some(KEY_SERVER.to_string()),
        )
        .with_connector(connector.clone());
        assert!(matches!(
            gpg.encrypt(PLAINTEXT),
            Err(Error::Keyserver { context: "failed to parse key", .. })
        ));

        let gpg = Gpg::new(
            None,
            Some(f.secret_path.clone()),
            None,
            Some(KEY_ID.to_string()),
            Some("gopher://keys.example.org".to_string()),
        )
        .with_connector(connector);
        assert!(matches!(
            gpg.encrypt(PLAINTEXT),
            Err(Error::Keyserver { context: "failed to parse keyserver", .. })
        ));
    }

    #[test]
    fn foreign_ciphertext_is_rejected() {
        let alice = fixture("");
        let bob = fixture("");

        let ciphertext = local(&alice, "").encrypt(PLAINTEXT).unwrap();
        let result = local(&bob, "").decrypt(&ciphertext);

        assert!(matches!(
            result,
            Err(Error::Crypto { operation: "decrypt", .. })
        ));
    }

    #[test]
    fn decrypt_needs_private_key() {
        let f = fixture("");
        let ciphertext = local(&f, "").encrypt(PLAINTEXT).unwrap();

        let gpg = Gpg::new(Some(f.public_path.clone()), None, None, None, None);
        assert!(matches!(gpg.decrypt(&ciphertext), Err(Error::MissingPrivateKey)));
    }

    #[test]
    fn unreadable_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.asc");

        let gpg = Gpg::new(Some(missing.clone()), Some(missing.clone()), None, None, None);

        match gpg.encrypt(PLAINTEXT) {
            Err(Error::KeyRead { path, .. }) => assert_eq!(path, missing),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(matches!(gpg.decrypt(b"anything"), Err(Error::KeyRead { .. })));
    }

    #[test]
    fn debug_output_hides_passphrase() {
        let gpg = Gpg::new(None, None, Some(PASSPHRASE.to_string()), None, None);
        assert!(!format!("{:?}", gpg).contains(PASSPHRASE));
    }
}
