//! The `orrery` binary: a sun, an orbiting planet, and a meteor fired from
//! the camera.

use std::process::ExitCode;

use clap::Parser;
use orrery_app::{AppError, PlatformDirs, load_scene, run};
use orrery_config::{CliArgs, Config};
use tracing::{error, info};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let dirs = match PlatformDirs::resolve_and_create() {
        Ok(dirs) => dirs,
        Err(e) => {
            eprintln!("Failed to initialize platform directories: {e}");
            return ExitCode::FAILURE;
        }
    };
    let config_dir = args.config.clone().unwrap_or_else(|| dirs.config_dir.clone());

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    orrery_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    info!(
        "Orrery starting: {}x{} '{}', config in {}",
        config.window.width,
        config.window.height,
        config.window.title,
        config_dir.display()
    );

    match start(config) {
        Ok(()) => {
            info!("Orrery exited normally");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn start(config: Config) -> Result<(), AppError> {
    config.simulation.validate()?;
    let scene = load_scene(&config.assets)?;
    run(config, scene)
}
