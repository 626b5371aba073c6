//! lsbsign CLI
//!
//! Command-line interface for signing and verifying audio files.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::debug;

use lsbsign::cli::{commands, Cli, Commands};
use lsbsign::config::SignerConfig;
use lsbsign::SignerError;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match SignerConfig::resolve(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: failed to load config: {}", e);
            return ExitCode::from(2);
        }
    };

    let filter = if cli.verbose {
        "debug".to_string()
    } else {
        config.log_filter.clone().unwrap_or_else(|| "info".to_string())
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(filter)).init();

    debug!("lsbsign v{}", env!("CARGO_PKG_VERSION"));

    match handle_command(cli.command, &config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if let Some(signer_error) = e.downcast_ref::<SignerError>() {
                for suggestion in signer_error.recovery_suggestions() {
                    eprintln!("  - {}", suggestion);
                }
            }
            ExitCode::from(2)
        }
    }
}

/// Run a command. `Ok(false)` means a verification failed.
fn handle_command(cmd: Commands, config: &SignerConfig) -> anyhow::Result<bool> {
    match cmd {
        Commands::Keys {
            signing_key,
            verifying_key,
        } => {
            commands::generate_keys(signing_key.as_deref(), verifying_key.as_deref())
                .context("key generation failed")?;
            Ok(true)
        }
        Commands::Sign {
            input,
            output,
            signing_key,
            raw,
        } => {
            commands::sign(
                &input,
                output.as_deref(),
                signing_key.as_deref(),
                &raw.to_format()?,
                config,
            )
            .with_context(|| format!("signing {} failed", input.display()))?;
            Ok(true)
        }
        Commands::Verify {
            input,
            verifying_key,
            json,
            raw,
        } => Ok(commands::verify(
            &input,
            verifying_key.as_deref(),
            json,
            &raw.to_format()?,
            config,
        )
        .with_context(|| format!("verifying {} failed", input.display()))?),
        Commands::Embed {
            input,
            output,
            message,
            raw,
        } => {
            commands::embed(&input, &output, &message, &raw.to_format()?)
                .with_context(|| format!("embedding into {} failed", input.display()))?;
            Ok(true)
        }
        Commands::Extract { input, raw } => {
            commands::extract(&input, &raw.to_format()?)
                .with_context(|| format!("extracting from {} failed", input.display()))?;
            Ok(true)
        }
        Commands::Inspect { input, raw } => {
            commands::inspect(&input, &raw.to_format()?)
                .with_context(|| format!("inspecting {} failed", input.display()))?;
            Ok(true)
        }
    }
}
