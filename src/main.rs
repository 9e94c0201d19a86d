use std::path::Path;
use std::process::ExitCode;

use sphere_reveal::{AppConfig, init_logging, run};
use tracing::error;

fn main() -> ExitCode {
    init_logging();

    let config = match std::env::args().nth(1) {
        Some(path) => match AppConfig::load(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => AppConfig::default(),
    };

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
