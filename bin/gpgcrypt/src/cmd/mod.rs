mod decrypt;
mod encrypt;

pub use decrypt::decrypt;
pub use encrypt::encrypt;

use log::error;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

/// Reads all of `path`, or stdin when no path is given.
fn read_input(path: Option<&Path>) -> Result<Vec<u8>, ()> {
    let result = match path {
        Some(p) => fs::read(p),
        None => {
            let mut buf = Vec::new();
            io::stdin().lock().read_to_end(&mut buf).map(|_| buf)
        }
    };

    result.map_err(|e| {
        error!("Reading input failed: {}", e);
    })
}

fn write_output(path: Option<&Path>, data: &[u8]) -> Result<(), ()> {
    let result = match path {
        Some(p) => fs::write(p, data),
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(data).and_then(|_| handle.flush())
        }
    };

    result.map_err(|e| {
        error!("Writing output failed: {}", e);
    })
}
