use clap::Parser;
use scripts::{backend::RpcBackend, cli::Cli, errors::ScriptError, utils::setup_client};

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    let Cli {
        priv_key,
        rpc_url,
        command,
        deployments_path,
    } = Cli::parse();

    tracing_subscriber::fmt().pretty().init();

    let client = setup_client(&priv_key, &rpc_url)?;
    let backend = RpcBackend::new(client);

    command.run(&backend, &deployments_path).await
}
