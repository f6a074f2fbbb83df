//! vcsm CLI Binary
//!
//! Command-line interface for the vcsm snapshot and rollback engine.

use clap::Parser;
use std::process;
use tracing::{error, info};
use vcsm::cli::{map_error, Cli, RunContext};
use vcsm::config::{ConfigLoader, VcsmConfig};
use vcsm::error::VcsError;
use vcsm::logging::{init_logging, LoggingConfig};

fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };

    let logging_config = build_logging_config(&cli, &config);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!(command = ?cli.command, "vcsm starting");

    let context = match RunContext::new(&cli.workspace, config) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error opening workspace: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            info!("Command completed successfully");
            println!("{}", output);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    }
}

/// Load configuration from `--config` when given, otherwise from the standard sources.
fn load_config(cli: &Cli) -> Result<VcsmConfig, VcsError> {
    let config = match cli.config {
        Some(ref path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load(&cli.workspace)?,
    };
    Ok(config)
}

/// Fold CLI logging flags over the loaded configuration.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli, config: &VcsmConfig) -> LoggingConfig {
    let mut logging = config.logging.clone();

    if cli.verbose {
        logging.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        logging.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        logging.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        logging.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        logging.file = Some(file.clone());
    }

    logging
}
