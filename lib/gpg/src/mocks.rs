use std::sync::{Arc, Mutex};

use gpg_crypto::SignedPublicKey;
use gpg_keyserver::{Address, Connector, Error, KeyId, KeyServer, Options, Result};

/// Serves a fixed key list for every lookup and remembers what was asked.
pub struct StaticConnector {
    keys: Vec<SignedPublicKey>,
    pub lookups: Arc<Mutex<Vec<(String, String)>>>,
}

impl StaticConnector {
    pub fn new(keys: Vec<SignedPublicKey>) -> StaticConnector {
        StaticConnector {
            keys,
            lookups: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

struct StaticKeyServer {
    address: Address,
    keys: Vec<SignedPublicKey>,
    lookups: Arc<Mutex<Vec<(String, String)>>>,
}

impl Connector for StaticConnector {
    fn connect(&self, address: &Address, _options: &Options) -> Result<Box<dyn KeyServer>> {
        Ok(Box::new(StaticKeyServer {
            address: address.clone(),
            keys: self.keys.clone(),
            lookups: self.lookups.clone(),
        }))
    }
}

impl KeyServer for StaticKeyServer {
    fn get_keys_by_id(&self, key_id: &KeyId) -> Result<Vec<SignedPublicKey>> {
        self.lookups
            .lock()
            .unwrap()
            .push((self.address.to_string(), key_id.to_string()));
        Ok(self.keys.clone())
    }
}

/// Fails every lookup as if the network were down.
pub struct UnreachableConnector;

struct UnreachableKeyServer;

impl Connector for UnreachableConnector {
    fn connect(&self, _address: &Address, _options: &Options) -> Result<Box<dyn KeyServer>> {
        Ok(Box::new(UnreachableKeyServer))
    }
}

impl KeyServer for UnreachableKeyServer {
    fn get_keys_by_id(&self, _key_id: &KeyId) -> Result<Vec<SignedPublicKey>> {
        Err(Error::Network("connection refused".to_string()))
    }
}
