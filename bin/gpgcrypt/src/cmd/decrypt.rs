use crate::cli::DecryptOpts;
use gpg::Gpg;
use log::{error, info};

use super::{read_input, write_output};

pub fn decrypt(gpg: &Gpg, opts: DecryptOpts) -> Result<(), ()> {
    let ciphertext = read_input(opts.input.as_deref())?;
    let plaintext = gpg.decrypt(&ciphertext).map_err(|e| {
        error!("Decryption failed: {}", e);
    })?;

    info!("Decrypted {} bytes", plaintext.len());
    write_output(opts.output.as_deref(), &plaintext)
}
