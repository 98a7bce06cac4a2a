use gumdrop::Options;
use std::path::PathBuf;

#[derive(Debug, Options)]
pub enum Command {
    #[options(help = "Encrypt a message to the configured public key")]
    Encrypt(EncryptOpts),

    #[options(help = "Decrypt a message with the configured private key")]
    Decrypt(DecryptOpts),
}

#[derive(Debug, Options)]
pub struct EncryptOpts {
    #[options(help = "Print help message and exit")]
    pub help: bool,

    #[options(help = "Write ASCII-armored output")]
    pub armor: bool,

    #[options(help = "Read plaintext from FILE instead of stdin", meta = "FILE")]
    pub input: Option<PathBuf>,

    #[options(help = "Write ciphertext to FILE instead of stdout", meta = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Options)]
pub struct DecryptOpts {
    #[options(help = "Print help message and exit")]
    pub help: bool,

    #[options(help = "Read ciphertext from FILE instead of stdin", meta = "FILE")]
    pub input: Option<PathBuf>,

    #[options(help = "Write plaintext to FILE instead of stdout", meta = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Options)]
pub struct Args {
    #[options(help = "Use config file", meta = "FILE")]
    pub config_file: Option<PathBuf>,

    #[options(help = "Be more verbose")]
    pub verbose: bool,

    #[options(help = "Print help message and exit")]
    help: bool,

    #[options(no_short, help = "Armored public key to encrypt to", meta = "FILE")]
    pub public_key: Option<PathBuf>,

    #[options(no_short, help = "Armored private key to decrypt with", meta = "FILE")]
    pub private_key: Option<PathBuf>,

    #[options(no_short, help = "Private key passphrase", meta = "PWD")]
    pub passphrase: Option<String>,

    #[options(help = "Id of the key to fetch from the keyserver", meta = "ID")]
    pub key_id: Option<String>,

    #[options(no_short, help = "Keyserver to fetch the key from", meta = "URL")]
    pub keyserver: Option<String>,

    #[options(command)]
    pub cmd: Option<Command>,
}
