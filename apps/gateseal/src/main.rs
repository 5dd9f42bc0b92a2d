//! # GateSeal Binary
//!
//! clap entry point for the deployment and verification tooling.

use clap::{Parser, Subcommand};
use gateseal::cli::{
    self, cmd_check_factory, cmd_check_gate_seal_from_env, cmd_create_gate_seal_from_env,
    cmd_deploy_factory_from_env, system_now,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser)]
#[command(name = "gateseal", about = "GateSeal deployment and verification tooling")]
struct Cli {
    /// Root directory for the local store and deployment records.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Network name scoping the deployment record paths.
    #[arg(long, default_value = "local")]
    network: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy the blueprint and factory from compiled bytecode.
    /// Reads DEPLOYER from the environment.
    DeployFactory {
        /// Hex-encoded compiled GateSeal bytecode.
        #[arg(long)]
        bytecode: PathBuf,
    },

    /// Create a GateSeal via the factory. Reads FACTORY,
    /// SEALING_COMMITTEE, SEAL_DURATION_SECONDS, SEALABLES,
    /// EXPIRY_TIMESTAMP and DEPLOYER from the environment.
    CreateGateSeal,

    /// Verify the factory record and blueprint, then simulate a flow.
    CheckFactory,

    /// Verify a GateSeal record and simulate the seal flow.
    /// Reads GATE_SEAL from the environment.
    CheckGateSeal,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Cli::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Cli) -> Result<(), cli::CliError> {
    let now = system_now()?;
    match &args.command {
        Commands::DeployFactory { bytecode } => {
            cmd_deploy_factory_from_env(&args.root, &args.network, bytecode)?;
        }
        Commands::CreateGateSeal => {
            cmd_create_gate_seal_from_env(&args.root, &args.network, now)?;
        }
        Commands::CheckFactory => {
            cmd_check_factory(&args.root, &args.network, now)?;
        }
        Commands::CheckGateSeal => {
            cmd_check_gate_seal_from_env(&args.root, &args.network, now)?;
        }
    }
    Ok(())
}
