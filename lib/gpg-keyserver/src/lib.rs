// traits and types for abstracting away keyserver access

mod address;
mod key_id;
mod server;

pub use address::{Address, Scheme, HKP_PORT};

pub use key_id::KeyId;

pub use server::{
    Connector,
    Error,
    KeyServer,
    Options,
    Result,
};
