mod commands;
pub mod core;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub use crate::commands::{install_modpack, ConsoleObserver, InstallArgs};

pub fn run() -> ExitCode {
    let args = InstallArgs::parse();

    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,modpack_installer_lib=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Modpack installer starting...");

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Error while starting tokio runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };
    match runtime.block_on(install_modpack(args)) {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
