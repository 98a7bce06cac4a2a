use crate::cli::EncryptOpts;
use gpg::Gpg;
use log::{error, info};

use super::{read_input, write_output};

pub fn encrypt(gpg: &Gpg, opts: EncryptOpts) -> Result<(), ()> {
    let plaintext = read_input(opts.input.as_deref())?;
    let ciphertext = gpg.encrypt(&plaintext).map_err(|e| {
        error!("Encryption failed: {}", e);
    })?;

    info!("Encrypted {} bytes", plaintext.len());
    write_output(opts.output.as_deref(), &ciphertext)
}
