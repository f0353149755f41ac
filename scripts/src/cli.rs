//! Definitions of CLI arguments and commands for the deploy scripts

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::{
    backend::DeployBackend,
    commands::{deploy_all, deploy_contract},
    constants::{DEFAULT_DEPLOYMENTS_PATH, DEFAULT_RPC_URL},
    errors::ScriptError,
    types::Contract,
};

/// The CLI for the deploy scripts
#[derive(Parser)]
pub struct Cli {
    /// Private key of the deployer
    // TODO: Better key management
    #[arg(short, long, env = "PKEY")]
    pub priv_key: String,

    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Path to the `deployments.json` file in which deployed contract
    /// addresses are recorded
    #[arg(short, long, default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub deployments_path: PathBuf,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The subcommands of the deploy scripts
#[derive(Subcommand)]
pub enum Command {
    /// Deploy all of the contracts in migration order
    DeployAll,
    /// Deploy a single contract
    Deploy(DeployArgs),
}

impl Command {
    /// Run the command against the given deployment backend
    pub async fn run(
        self,
        backend: &impl DeployBackend,
        deployments_path: &Path,
    ) -> Result<(), ScriptError> {
        match self {
            Command::DeployAll => deploy_all(backend, deployments_path).await,
            Command::Deploy(args) => deploy_contract(args, backend, deployments_path).await,
        }
    }
}

/// Deploy a single contract
#[derive(Args)]
pub struct DeployArgs {
    /// The contract to deploy
    #[arg(short, long)]
    pub contract: Contract,

    /// The address of the value token to construct the value feed against,
    /// in hex.
    ///
    /// If omitted, the address recorded in the deployments file is used.
    /// Only meaningful when deploying the value feed.
    #[arg(long)]
    pub value_token: Option<String>,
}
