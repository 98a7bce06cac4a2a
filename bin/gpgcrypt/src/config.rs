use gpg::{Gpg, Options};
use log::{debug, error};
use serde::Deserialize;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::{Args, Command};

#[derive(Debug, Deserialize, Eq, PartialEq, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub public_key_path: Option<PathBuf>,
    pub private_key_path: Option<PathBuf>,
    pub passphrase: Option<String>,
    pub key_id: Option<String>,
    pub keyserver: Option<String>,
    pub armor: bool,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug)]
pub enum ConfigErr {
    File(io::Error),
    Format(String),
}

pub fn load(filename: &Path) -> Result<Config, ConfigErr> {
    debug!("Loading config from {:?}", filename);
    let mut f = File::open(filename).map_err(ConfigErr::File)?;
    let mut content = String::new();

    f.read_to_string(&mut content).map_err(ConfigErr::File)?;

    parse(&content)
}

fn parse(text: &str) -> Result<Config, ConfigErr> {
    debug!("Parsing config content");

    toml::from_str::<Config>(text).map_err(|e| {
        error!("Parsing error: {}", e);
        ConfigErr::Format(e.to_string())
    })
}

impl Config {
    /// Values given on the command line replace those from the file.
    pub fn with_overrides(self, args: &Args) -> Config {
        Config {
            public_key_path: args.public_key.clone().or(self.public_key_path),
            private_key_path: args.private_key.clone().or(self.private_key_path),
            passphrase: args.passphrase.clone().or(self.passphrase),
            key_id: args.key_id.clone().or(self.key_id),
            keyserver: args.keyserver.clone().or(self.keyserver),
            armor: self.armor
                || matches!(&args.cmd, Some(Command::Encrypt(opts)) if opts.armor),
            ..self
        }
    }

    pub fn into_service(self) -> Gpg {
        let options = Options {
            timeout: self.timeout_secs.map(Duration::from_secs),
            user_agent: Some(format!("gpgcrypt/{}", env!("CARGO_PKG_VERSION"))),
        };

        Gpg::new(
            self.public_key_path,
            self.private_key_path,
            self.passphrase,
            self.key_id,
            self.keyserver,
        )
        .with_armor(self.armor)
        .with_options(options)
    }
}
