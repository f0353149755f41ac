//! Implementations of the deploy scripts' commands

use std::{path::Path, str::FromStr};

use alloy_primitives::Address;
use alloy_sol_types::SolCall;
use tracing::info;

use crate::{
    backend::DeployBackend,
    cli::DeployArgs,
    errors::ScriptError,
    plan::{execute_plan, DeployPlan, PlanOutcome},
    solidity::valueTokenCall,
    types::{ConstructorArg, Contract},
    utils::{read_deployed_address, write_deployed_address},
};

/// Deploy all of the contracts in migration order, recording their addresses
/// in the deployments file.
///
/// Confirmed deployments are recorded even when the run partially fails, so
/// that a later `deploy` invocation can pick up where this one left off.
pub async fn deploy_all(
    backend: &impl DeployBackend,
    deployments_path: &Path,
) -> Result<(), ScriptError> {
    let plan = DeployPlan::migration();
    let outcome = execute_plan(&plan, backend).await;

    record_deployments(&outcome, deployments_path)?;

    if let (Some(feed_address), Some(token_address)) = (
        outcome.address_of(Contract::ValueFeed),
        outcome.address_of(Contract::ValueToken),
    ) {
        verify_feed_wiring(backend, feed_address, token_address).await?;
    }

    summarize(&outcome)
}

/// Deploy a single contract, recording its address in the deployments file.
///
/// The value feed's constructor argument is taken from the `--value-token`
/// flag if given, otherwise from the deployments file.
pub async fn deploy_contract(
    args: DeployArgs,
    backend: &impl DeployBackend,
    deployments_path: &Path,
) -> Result<(), ScriptError> {
    let mut token_address = None;
    let ctor_args = match args.contract {
        Contract::TestToken | Contract::ValueToken => vec![],
        Contract::ValueFeed => {
            let address = resolve_value_token(&args, deployments_path)?;
            token_address = Some(address);
            vec![ConstructorArg::Address(address)]
        }
    };

    let plan = DeployPlan::single(args.contract, ctor_args)?;
    let outcome = execute_plan(&plan, backend).await;

    record_deployments(&outcome, deployments_path)?;

    if let (Some(feed_address), Some(token_address)) =
        (outcome.address_of(Contract::ValueFeed), token_address)
    {
        verify_feed_wiring(backend, feed_address, token_address).await?;
    }

    summarize(&outcome)
}

/// Resolve the value token address for a value feed deployment, from the
/// `--value-token` flag or from the deployments file
fn resolve_value_token(
    args: &DeployArgs,
    deployments_path: &Path,
) -> Result<Address, ScriptError> {
    if let Some(address) = &args.value_token {
        return Address::from_str(address)
            .map_err(|e| ScriptError::CalldataConstruction(e.to_string()));
    }

    read_deployed_address(deployments_path, Contract::ValueToken)?.ok_or_else(|| {
        ScriptError::DependencyNotReady(format!(
            "no {} address in {}, deploy it first or pass --value-token",
            Contract::ValueToken,
            deployments_path.display(),
        ))
    })
}

/// Record every confirmed deployment of the outcome in the deployments file
fn record_deployments(
    outcome: &PlanOutcome,
    deployments_path: &Path,
) -> Result<(), ScriptError> {
    for deployed in outcome.deployed() {
        write_deployed_address(deployments_path, deployed.contract, deployed.address)?;
    }

    Ok(())
}

/// Read the value token address out of the deployed value feed and check it
/// against the address the feed was constructed with
async fn verify_feed_wiring(
    backend: &impl DeployBackend,
    feed_address: Address,
    token_address: Address,
) -> Result<(), ScriptError> {
    let calldata = valueTokenCall {}.abi_encode();
    let returndata = backend.call(feed_address, calldata.into()).await?;

    let wired_address = valueTokenCall::abi_decode_returns(&returndata, true)
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
        ._0;

    if wired_address != token_address {
        return Err(ScriptError::ContractInteraction(format!(
            "value feed points at {wired_address:#x}, expected {token_address:#x}",
        )));
    }

    info!("Value feed wiring verified: valueToken() = {wired_address:#x}");
    Ok(())
}

/// Convert a partially or wholly failed outcome into an error naming every
/// failed and skipped step
fn summarize(outcome: &PlanOutcome) -> Result<(), ScriptError> {
    let failures = outcome.failures();
    let skipped = outcome.skipped();
    if failures.is_empty() && skipped.is_empty() {
        return Ok(());
    }

    let mut parts: Vec<String> = failures
        .into_iter()
        .map(|(contract, e)| format!("{}: {}", contract, e))
        .collect();
    parts.extend(
        skipped
            .into_iter()
            .map(|(contract, dep)| format!("{}: skipped, {} was not deployed", contract, dep)),
    );

    Err(ScriptError::ContractDeployment(parts.join("; ")))
}
