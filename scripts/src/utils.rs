//! Utilities for the deploy scripts

use std::{collections::BTreeMap, fs, path::Path, str::FromStr};

use alloy::{
    providers::{DynProvider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use alloy_dyn_abi::DynSolValue;
use alloy_json_abi::JsonAbi;
use alloy_primitives::{Address, Bytes};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    constants::{
        DEPLOYMENTS_KEY, TEST_TOKEN_ABI, TEST_TOKEN_BYTECODE, TEST_TOKEN_CONTRACT_KEY,
        VALUE_FEED_ABI, VALUE_FEED_BYTECODE, VALUE_FEED_CONTRACT_KEY, VALUE_TOKEN_ABI,
        VALUE_TOKEN_BYTECODE, VALUE_TOKEN_CONTRACT_KEY,
    },
    errors::ScriptError,
    types::{Artifact, Contract},
};

/// The shape of the `deployments.json` file
#[derive(Deserialize)]
struct DeploymentsFile {
    /// The deployed contract addresses, keyed by contract name
    #[serde(default)]
    deployments: BTreeMap<String, String>,
}

/// Sets up the RPC client with which to deploy and call contracts,
/// signing transactions with the given private key.
///
/// Nonce management is left to the provider.
pub fn setup_client(priv_key: &str, rpc_url: &str) -> Result<DynProvider, ScriptError> {
    let url =
        Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let signer = PrivateKeySigner::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    let provider = ProviderBuilder::new()
        .wallet(signer)
        .with_simple_nonce_management()
        .connect_http(url);

    Ok(DynProvider::new(provider))
}

/// Load the compilation artifact of the given contract
pub fn load_artifact(contract: Contract) -> Result<Artifact, ScriptError> {
    let (abi_str, bytecode_hex) = match contract {
        Contract::TestToken => (TEST_TOKEN_ABI, TEST_TOKEN_BYTECODE),
        Contract::ValueToken => (VALUE_TOKEN_ABI, VALUE_TOKEN_BYTECODE),
        Contract::ValueFeed => (VALUE_FEED_ABI, VALUE_FEED_BYTECODE),
    };

    let abi: JsonAbi =
        serde_json::from_str(abi_str).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;
    let bytecode = hex::decode(bytecode_hex.trim())
        .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

    Ok(Artifact {
        abi,
        bytecode: bytecode.into(),
    })
}

/// Construct the creation code for a deployment of the given artifact:
/// the contract bytecode followed by the ABI-encoded constructor arguments
pub fn build_init_code(artifact: &Artifact, args: &[DynSolValue]) -> Result<Bytes, ScriptError> {
    let num_ctor_inputs = artifact
        .abi
        .constructor
        .as_ref()
        .map(|ctor| ctor.inputs.len())
        .unwrap_or(0);

    if num_ctor_inputs != args.len() {
        return Err(ScriptError::CalldataConstruction(format!(
            "constructor takes {} arguments, got {}",
            num_ctor_inputs,
            args.len(),
        )));
    }

    let mut init_code = artifact.bytecode.to_vec();
    if !args.is_empty() {
        init_code.extend(DynSolValue::Tuple(args.to_vec()).abi_encode_params());
    }

    Ok(init_code.into())
}

/// The key under which the given contract's address is recorded in the
/// `deployments.json` file
pub fn get_contract_key(contract: Contract) -> &'static str {
    match contract {
        Contract::TestToken => TEST_TOKEN_CONTRACT_KEY,
        Contract::ValueToken => VALUE_TOKEN_CONTRACT_KEY,
        Contract::ValueFeed => VALUE_FEED_CONTRACT_KEY,
    }
}

/// Read the given contract's address from the deployments file, if one
/// has been recorded
pub fn read_deployed_address(
    file_path: &Path,
    contract: Contract,
) -> Result<Option<Address>, ScriptError> {
    if !file_path.exists() {
        return Ok(None);
    }

    let file_contents =
        fs::read_to_string(file_path).map_err(|e| ScriptError::ReadDeployments(e.to_string()))?;
    let parsed: DeploymentsFile = serde_json::from_str(&file_contents)
        .map_err(|e| ScriptError::ReadDeployments(e.to_string()))?;

    parsed
        .deployments
        .get(get_contract_key(contract))
        .map(|addr| {
            Address::from_str(addr).map_err(|e| ScriptError::ReadDeployments(e.to_string()))
        })
        .transpose()
}

/// Write the given contract's deployed address to the deployments file.
///
/// The file is mutated in place: entries for other contracts and any
/// unrelated content it carries are left untouched.
pub fn write_deployed_address(
    file_path: &Path,
    contract: Contract,
    address: Address,
) -> Result<(), ScriptError> {
    // If the file doesn't exist, create it
    if !file_path.exists() {
        fs::write(file_path, "{}").map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
    }

    let file_contents =
        fs::read_to_string(file_path).map_err(|e| ScriptError::ReadDeployments(e.to_string()))?;
    let mut parsed_json: Value = serde_json::from_str(&file_contents)
        .map_err(|e| ScriptError::ReadDeployments(e.to_string()))?;

    parsed_json[DEPLOYMENTS_KEY][get_contract_key(contract)] =
        Value::String(format!("{address:#x}"));

    let file_contents = serde_json::to_string_pretty(&parsed_json)
        .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
    fs::write(file_path, file_contents).map_err(|e| ScriptError::WriteDeployments(e.to_string()))
}
