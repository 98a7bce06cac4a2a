mod cli;
mod cmd;
mod config;

use std::process::exit;

use gumdrop::Options;
use log::{debug, error, LevelFilter};
use simple_logger::SimpleLogger;

use cli::{Args, Command};
use config::Config;

fn main() {
    let args = Args::parse_args_default_or_exit();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("Logger setup failed: {}", e);
        exit(1)
    }

    let cfg = match args.config_file.as_deref() {
        Some(path) => match config::load(path) {
            Ok(cfg) => cfg,
            Err(msg) => {
                error!("Config load failed: {:?}", msg);
                exit(1)
            }
        },
        None => Config::default(),
    };

    let gpg = cfg.with_overrides(&args).into_service();
    debug!("{:?}", gpg);

    let result = match args.cmd {
        Some(Command::Encrypt(opts)) => cmd::encrypt(&gpg, opts),
        Some(Command::Decrypt(opts)) => cmd::decrypt(&gpg, opts),
        None => {
            error!("No command given, see --help");
            Err(())
        }
    };

    if result.is_err() {
        exit(1)
    }
}
