use std::io::Cursor;

use gpg_keyserver::{
    Address, Connector, Error as KeyServerError, KeyId, KeyServer, Options,
    Result as KeyServerResult,
};
use log::{debug, error};
use pgp::{composed::SignedPublicKey, Deserializable};
use reqwest::{blocking, StatusCode};

const LOOKUP_PATH: &str = "/pks/lookup";

/// A blocking HKP client bound to one keyserver.
pub struct Client {
    base_url: String,
    http: blocking::Client,
}

impl Client {
    pub fn new(address: &Address, options: &Options) -> KeyServerResult<Client> {
        let mut builder = blocking::Client::builder();
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(agent) = options.user_agent.as_deref() {
            builder = builder.user_agent(agent);
        }

        let http = builder
            .build()
            .map_err(|e| KeyServerError::Client(e.to_string()))?;

        Ok(Client {
            base_url: address.base_url(),
            http,
        })
    }

    pub fn lookup_url(&self, key_id: &KeyId) -> String {
        format!(
            "{}{}?op=get&options=mr&search={}",
            self.base_url,
            LOOKUP_PATH,
            key_id.search_term()
        )
    }
}

fn translate_request_err(err: reqwest::Error) -> KeyServerError {
    if err.is_timeout() || err.is_connect() || err.is_body() {
        return KeyServerError::Network(err.to_string());
    }

    match err.status() {
        Some(status) => KeyServerError::Status(status.as_u16()),
        None => {
            error!("Unexpected error: {:?}", err);
            KeyServerError::Network(err.to_string())
        }
    }
}

/// Parses a lookup response body. Servers may answer with several armored
/// keys for one id, and some answer an unknown id with an empty body.
pub fn parse_keys(body: &[u8]) -> KeyServerResult<Vec<SignedPublicKey>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let (keys, _headers) = SignedPublicKey::from_armor_many(Cursor::new(body))
        .map_err(|e| KeyServerError::MalformedResponse(e.to_string()))?;

    keys.collect::<Result<Vec<_>, _>>()
        .map_err(|e| KeyServerError::MalformedResponse(e.to_string()))
}

impl KeyServer for Client {
    fn get_keys_by_id(&self, key_id: &KeyId) -> KeyServerResult<Vec<SignedPublicKey>> {
        let url = self.lookup_url(key_id);
        debug!("Fetching keys from {}", url);

        let response = self.http.get(&url).send().map_err(translate_request_err)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("No keys found for {}", key_id);
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(KeyServerError::Status(status.as_u16()));
        }

        let body = response.bytes().map_err(translate_request_err)?;
        debug!("Parsing {}-byte response", body.len());

        parse_keys(&body)
    }
}

/// Connects to keyservers over HKP.
#[derive(Debug, Clone, Copy, Default)]
pub struct HkpConnector;

impl Connector for HkpConnector {
    fn connect(
        &self,
        address: &Address,
        options: &Options,
    ) -> KeyServerResult<Box<dyn KeyServer>> {
        Ok(Box::new(Client::new(address, options)?))
    }
}
