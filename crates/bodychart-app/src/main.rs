//! Headless body chart session driver.

mod args;
mod error;
mod script;
mod session;

use args::{Args, USAGE};
use error::AppError;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(AppError::Help) => {
            println!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            return ExitCode::from(2);
        }
    };

    log::info!("Starting body chart session");
    match session::run(&args) {
        Ok(image) => {
            log::info!("Session finished ({}x{}, {} bytes)", image.width, image.height, image.png.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
