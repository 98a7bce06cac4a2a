use std::path::{Path, PathBuf};

/// Where the recipient's public key comes from.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum KeySource {
    LocalFile(PathBuf),
    Remote { key_id: String, server: String },
}

impl KeySource {
    /// A configured public key file takes precedence over a keyserver
    /// lookup; a lookup needs both the key id and the server.
    pub fn select(
        public_key_path: Option<&Path>,
        key_id: Option<&str>,
        key_server: Option<&str>,
    ) -> Option<KeySource> {
        if let Some(path) = public_key_path.filter(|p| !p.as_os_str().is_empty()) {
            return Some(KeySource::LocalFile(path.to_owned()));
        }

        let key_id = key_id.filter(|s| !s.is_empty())?;
        let server = key_server.filter(|s| !s.is_empty())?;
        Some(KeySource::Remote {
            key_id: key_id.to_owned(),
            server: server.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_file_wins() {
        let source = KeySource::select(
            Some(Path::new("/keys/public.asc")),
            Some("0xDEADBEEF"),
            Some("hkps://keys.openpgp.org"),
        );
        assert_eq!(
            source,
            Some(KeySource::LocalFile(PathBuf::from("/keys/public.asc")))
        );
    }

    #[test]
    fn remote_needs_id_and_server() {
        assert_eq!(
            KeySource::select(None, Some("0xDEADBEEF"), Some("keys.openpgp.org")),
            Some(KeySource::Remote {
                key_id: "0xDEADBEEF".to_string(),
                server: "keys.openpgp.org".to_string(),
            })
        );
        assert_eq!(KeySource::select(None, Some("0xDEADBEEF"), None), None);
        assert_eq!(KeySource::select(None, None, Some("keys.openpgp.org")), None);
    }

    #[test]
    fn empty_values_are_unset() {
        assert_eq!(KeySource::select(Some(Path::new("")), Some(""), Some("")), None);
        assert_eq!(
            KeySource::select(Some(Path::new("")), Some("0xDEADBEEF"), Some("keys.openpgp.org")),
            Some(KeySource::Remote {
                key_id: "0xDEADBEEF".to_string(),
                server: "keys.openpgp.org".to_string(),
            })
        );
    }
}
