//! Medtrail CLI - a local host for the medtrail audit trail.
//!
//! Each invocation is one call into the trail: the command line supplies
//! the caller identities, the host supplies the block time and storage.
//!
//! Exit status: `0` on success, `1` when the trail returned an error code,
//! `2` when the host itself failed, e.g. bad config or storage.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use medtrail_config::Config;

mod commands;
mod config_bridge;
mod host;
mod output;
mod theme;

use commands::{config, count, fetch, record};
use host::Host;
use output::OutputFormat;
use theme::Theme;

/// Medtrail - access-controlled audit trail for healthcare records
#[derive(Parser)]
#[command(name = "medtrail")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to an additional configuration file
    #[arg(short, long, global = true, env = "MEDTRAIL_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append an event
    Record(record::RecordArgs),

    /// Read an event back (administrator only)
    Fetch(fetch::FetchArgs),

    /// Print the number of recorded events
    Count,

    /// View and check configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the resolved configuration with the layer that set each value
    Show {
        /// Only show this section (access, storage, logging)
        #[arg(long)]
        section: Option<String>,
    },
    /// Check that the configuration loads and validates
    Validate,
    /// List loaded files and environment fallbacks
    Paths,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("{}", Theme::error(&format!("{e:#}")));
            ExitCode::from(2)
        },
    }
}

/// Run one command. `Ok(false)` means the trail answered with an error code.
async fn run(cli: Cli) -> Result<bool> {
    let resolved = Config::load(cli.config.as_deref())?;

    let log_config = config_bridge::log_config(&resolved.config.logging, cli.verbose)?;
    if let Err(e) = medtrail_telemetry::setup_logging(&log_config) {
        eprintln!("{}", Theme::error(&format!("Failed to initialize logging: {e}")));
    }

    match cli.command {
        Commands::Config { command } => {
            match command {
                ConfigCommands::Show { section } => {
                    config::show_config(&resolved, cli.format, section.as_deref())?;
                },
                ConfigCommands::Validate => config::validate_config(&resolved),
                ConfigCommands::Paths => config::show_paths(&resolved),
            }
            Ok(true)
        },
        Commands::Record(args) => {
            let mut host = Host::open(&resolved.config).await?;
            let ok = record::run(&mut host, args, cli.format).await;
            host.close().await?;
            ok
        },
        Commands::Fetch(args) => {
            let host = Host::open(&resolved.config).await?;
            let ok = fetch::run(&host, args, cli.format).await;
            host.close().await?;
            ok
        },
        Commands::Count => {
            let host = Host::open(&resolved.config).await?;
            count::run(&host, cli.format)?;
            host.close().await?;
            Ok(true)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_record() {
        let cli = Cli::try_parse_from([
            "medtrail",
            "--format",
            "json",
            "record",
            "REGISTER_PATIENT",
            "PATIENT123",
            "ST2JHG361ZXG51QTKY2NQCVBPPRRE2KZB1HR05NNC",
            "--sender",
            "ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG",
            "--contract-caller",
            ".patient-identity",
            "--time",
            "1617984000",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        let Commands::Record(args) = cli.command else {
            panic!("expected record");
        };
        assert_eq!(args.event_type, "REGISTER_PATIENT");
        assert_eq!(args.contract_caller.unwrap().as_str(), ".patient-identity");
        assert_eq!(args.time, Some(1_617_984_000));
        assert!(args.detail.is_none());
    }

    #[test]
    fn test_invalid_principal_rejected_at_parse() {
        let result = Cli::try_parse_from(["medtrail", "fetch", "0", "--sender", ""]);
        assert!(result.is_err());
    }
}
