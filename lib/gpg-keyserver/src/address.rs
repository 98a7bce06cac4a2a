use std::fmt;

use crate::Error;

/// Default port of plain `hkp://` keyservers.
pub const HKP_PORT: u16 = 11371;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

/**
 * A keyserver location, normalised down to the scheme, host and port used
 * to reach it.
 */
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Address {
    scheme: Scheme,
    host: String,
    port: Option<u16>,
}

impl Address {
    /// Accepts `hkp://`, `hkps://`, `http://` and `https://` addresses as
    /// well as a bare `host[:port]`, which is treated as `hkps`.
    pub fn parse(s: &str) -> Result<Address, Error> {
        let invalid = || Error::InvalidAddress(s.to_owned());
        let text = s.trim();

        let (scheme, default_port, rest) = match text.split_once("://") {
            Some((scheme, rest)) => match scheme.to_ascii_lowercase().as_str() {
                "hkp" => (Scheme::Http, Some(HKP_PORT), rest),
                "http" => (Scheme::Http, None, rest),
                "hkps" | "https" => (Scheme::Https, None, rest),
                _ => return Err(invalid()),
            },
            None => (Scheme::Https, None, text),
        };

        // anything after the authority is ignored
        let authority = rest.split('/').next().unwrap_or_default();

        let (host, port) = match authority.split_once(':') {
            Some((host, port)) => (host, Some(port.parse::<u16>().map_err(|_| invalid())?)),
            None => (authority, default_port),
        };

        let valid_host = !host.is_empty()
            && host
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
        if !valid_host {
            return Err(invalid());
        }

        Ok(Address {
            scheme,
            host: host.to_ascii_lowercase(),
            port,
        })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn base_url(&self) -> String {
        match self.port {
            Some(port) => format!("{}://{}:{}", self.scheme.as_str(), self.host, port),
            None => format!("{}://{}", self.scheme.as_str(), self.host),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_url())
    }
}
