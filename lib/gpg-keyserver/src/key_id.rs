use std::{convert::TryFrom, fmt, iter};

use pgp::{composed::SignedPublicKey, types::KeyTrait};

use crate::Error;

// short id, long id and v4 fingerprint, in hex digits
const VALID_LENGTHS: [usize; 3] = [8, 16, 40];

/// An OpenPGP key identifier, stored as upper-case hex without a `0x`
/// prefix.
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Clone, Hash)]
pub struct KeyId(String);

impl KeyId {
    pub fn parse(s: &str) -> Result<KeyId, Error> {
        KeyId::try_from(s)
    }

    pub fn as_str(&self) -> &str {
        let KeyId(ref s) = self;
        s.as_str()
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_fingerprint(&self) -> bool {
        self.0.len() == 40
    }

    /// Whether `key` is the key this id names, by its primary key or any of
    /// its subkeys.
    pub fn matches(&self, key: &SignedPublicKey) -> bool {
        iter::once(key.primary_key.fingerprint())
            .chain(key.public_subkeys.iter().map(|k| k.key.fingerprint()))
            .any(|fp| self.matches_fingerprint(&hex::encode_upper(fp)))
    }

    // v4 key ids are the low 64 bits of the fingerprint
    fn matches_fingerprint(&self, fingerprint: &str) -> bool {
        if self.is_fingerprint() {
            fingerprint == self.0
        } else {
            fingerprint.ends_with(&self.0)
        }
    }

    /// The form HKP servers expect in the `search` parameter.
    pub fn search_term(&self) -> String {
        format!("0x{}", self.0)
    }
}

impl<'a> TryFrom<&'a str> for KeyId {
    type Error = Error;

    fn try_from(s: &'a str) -> Result<KeyId, Error> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if !VALID_LENGTHS.contains(&digits.len()) {
            return Err(Error::InvalidKeyId(s.to_owned()));
        }

        hex::decode(digits)
            .map(|_| KeyId(digits.to_ascii_uppercase()))
            .map_err(|_| Error::InvalidKeyId(s.to_owned()))
    }
}

impl TryFrom<String> for KeyId {
    type Error = Error;

    fn try_from(s: String) -> Result<KeyId, Error> {
        KeyId::try_from(s.as_str())
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let KeyId(s) = self;
        f.write_str(s)
    }
}
