//! The deployment backend through which the deploy scripts reach the network

use std::time::Duration;

use alloy::{
    network::TransactionBuilder,
    providers::{DynProvider, Provider},
    rpc::types::TransactionRequest,
};
use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use tokio::time::sleep;
use tracing::trace;

use crate::{
    constants::{RECEIPT_RETRY_ATTEMPTS, RECEIPT_RETRY_DELAY_MS},
    errors::ScriptError,
    types::{Contract, PendingDeploy},
};

/// The interface through which the deploy scripts submit contract deployments
/// and read contract state.
///
/// The backend owns the transaction mechanics: signing, nonce assignment, gas,
/// and inclusion. The scripts only sequence deployments on top of it.
#[async_trait]
pub trait DeployBackend: Send + Sync {
    /// Submit a deployment transaction carrying the given creation code,
    /// returning a handle on the pending deployment
    async fn submit_deploy(
        &self,
        contract: Contract,
        init_code: Bytes,
    ) -> Result<PendingDeploy, ScriptError>;

    /// Wait until the given pending deployment is confirmed, returning the
    /// address of the deployed contract.
    ///
    /// Fails if the deployment transaction reverted or no receipt could
    /// be found.
    async fn await_deployed(&self, pending: &PendingDeploy) -> Result<Address, ScriptError>;

    /// Make a read-only call to a deployed contract, returning the raw
    /// returndata
    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes, ScriptError>;
}

/// A [`DeployBackend`] backed by a JSON-RPC provider
pub struct RpcBackend {
    /// The underlying RPC provider, holding the deployer's wallet
    provider: DynProvider,
}

impl RpcBackend {
    /// Construct a new RPC backend on top of the given provider
    pub fn new(provider: DynProvider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl DeployBackend for RpcBackend {
    async fn submit_deploy(
        &self,
        contract: Contract,
        init_code: Bytes,
    ) -> Result<PendingDeploy, ScriptError> {
        let tx = TransactionRequest::default().with_deploy_code(init_code);
        let pending_tx = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

        let tx_hash = *pending_tx.tx_hash();
        trace!("{} deployment transaction submitted: {:#x}", contract, tx_hash);

        Ok(PendingDeploy { contract, tx_hash })
    }

    async fn await_deployed(&self, pending: &PendingDeploy) -> Result<Address, ScriptError> {
        // The current version of alloy has issues watching the pending
        // transaction directly, so we poll for the receipt instead
        let mut remaining_attempts = RECEIPT_RETRY_ATTEMPTS;
        while remaining_attempts > 0 {
            let maybe_receipt = self
                .provider
                .get_transaction_receipt(pending.tx_hash)
                .await
                .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

            match maybe_receipt {
                Some(receipt) => {
                    trace!("Receipt for {:#x}: {:?}", pending.tx_hash, receipt);

                    if !receipt.status() {
                        return Err(ScriptError::ContractDeployment(format!(
                            "deployment transaction {:#x} reverted",
                            pending.tx_hash,
                        )));
                    }

                    return receipt.contract_address.ok_or_else(|| {
                        ScriptError::ContractDeployment(format!(
                            "no contract address in receipt for {:#x}",
                            pending.tx_hash,
                        ))
                    });
                }
                None => {
                    sleep(Duration::from_millis(RECEIPT_RETRY_DELAY_MS)).await;
                    remaining_attempts -= 1;
                }
            }
        }

        Err(ScriptError::ContractDeployment(format!(
            "no receipt found for {:#x} after {} attempts",
            pending.tx_hash, RECEIPT_RETRY_ATTEMPTS,
        )))
    }

    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes, ScriptError> {
        let tx = TransactionRequest::default().with_to(to).with_input(calldata);
        self.provider
            .call(&tx)
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))
    }
}
