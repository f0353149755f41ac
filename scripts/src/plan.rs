//! Deploy plans: ordered contract deployments and their execution

use std::collections::HashMap;

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::Address;
use tracing::{debug, info, warn};

use crate::{
    backend::DeployBackend,
    errors::ScriptError,
    types::{ConstructorArg, Contract, DeployedContract, PendingDeploy},
    utils::{build_init_code, load_artifact},
};

// --------------
// | Plan Types |
// --------------

/// A single step of a deploy plan: a contract along with its constructor
/// arguments
#[derive(Clone, Debug)]
pub struct DeployStep {
    /// The contract to deploy
    pub contract: Contract,
    /// The constructor arguments to deploy the contract with
    pub args: Vec<ConstructorArg>,
}

/// An ordered list of contract deployments.
///
/// A contract may appear at most once in a plan, and a step may only
/// depend on the address of a contract deployed earlier in the plan.
/// Both rules are checked on construction, so a `DeployPlan` in hand is
/// always executable.
#[derive(Clone, Debug)]
pub struct DeployPlan {
    /// The steps of the plan, in submission order
    steps: Vec<DeployStep>,
}

impl DeployPlan {
    /// Construct a plan from the given steps, checking the ordering rules
    pub fn new(steps: Vec<DeployStep>) -> Result<Self, ScriptError> {
        let mut deployed_earlier: Vec<Contract> = Vec::new();
        for step in &steps {
            if deployed_earlier.contains(&step.contract) {
                return Err(ScriptError::InvalidPlan(format!(
                    "{} appears in the plan more than once",
                    step.contract,
                )));
            }

            for arg in &step.args {
                if let ConstructorArg::AddressOf(dep) = arg {
                    if !deployed_earlier.contains(dep) {
                        return Err(ScriptError::InvalidPlan(format!(
                            "{} depends on {}, which is not deployed earlier in the plan",
                            step.contract, dep,
                        )));
                    }
                }
            }

            deployed_earlier.push(step.contract);
        }

        Ok(Self { steps })
    }

    /// The migration plan: deploy both tokens, then the value feed pointed
    /// at the value token
    pub fn migration() -> Self {
        // Constructed directly, the fixed sequence below upholds the
        // ordering rules checked in `new`
        Self {
            steps: vec![
                DeployStep {
                    contract: Contract::TestToken,
                    args: vec![],
                },
                DeployStep {
                    contract: Contract::ValueToken,
                    args: vec![],
                },
                DeployStep {
                    contract: Contract::ValueFeed,
                    args: vec![ConstructorArg::AddressOf(Contract::ValueToken)],
                },
            ],
        }
    }

    /// Construct a plan deploying a single contract
    pub fn single(contract: Contract, args: Vec<ConstructorArg>) -> Result<Self, ScriptError> {
        Self::new(vec![DeployStep { contract, args }])
    }

    /// The steps of the plan, in submission order
    pub fn steps(&self) -> &[DeployStep] {
        &self.steps
    }
}

/// The terminal status of a single step of a deploy plan
#[derive(Clone, Debug)]
pub enum StepStatus {
    /// The contract was deployed and its deployment confirmed
    Deployed(DeployedContract),
    /// The deployment was attempted and failed
    Failed(ScriptError),
    /// The step was never attempted because the given contract it depends
    /// on was not deployed
    Skipped(Contract),
}

/// The result of a single step of a deploy plan
#[derive(Clone, Debug)]
pub struct StepResult {
    /// The contract the step deploys
    pub contract: Contract,
    /// The terminal status of the step
    pub status: StepStatus,
}

/// The per-step results of executing a deploy plan
#[derive(Clone, Debug)]
pub struct PlanOutcome {
    /// The results of each step, in plan order
    steps: Vec<StepResult>,
}

impl PlanOutcome {
    /// The results of each step, in plan order
    pub fn steps(&self) -> &[StepResult] {
        &self.steps
    }

    /// Whether every step of the plan confirmed a deployment
    pub fn is_success(&self) -> bool {
        self.steps
            .iter()
            .all(|step| matches!(step.status, StepStatus::Deployed(_)))
    }

    /// The confirmed deployments, in plan order
    pub fn deployed(&self) -> Vec<DeployedContract> {
        self.steps
            .iter()
            .filter_map(|step| match &step.status {
                StepStatus::Deployed(deployed) => Some(*deployed),
                _ => None,
            })
            .collect()
    }

    /// The failed steps along with their errors, in plan order
    pub fn failures(&self) -> Vec<(Contract, ScriptError)> {
        self.steps
            .iter()
            .filter_map(|step| match &step.status {
                StepStatus::Failed(e) => Some((step.contract, e.clone())),
                _ => None,
            })
            .collect()
    }

    /// The skipped steps along with the dependency that blocked each one,
    /// in plan order
    pub fn skipped(&self) -> Vec<(Contract, Contract)> {
        self.steps
            .iter()
            .filter_map(|step| match &step.status {
                StepStatus::Skipped(dep) => Some((step.contract, *dep)),
                _ => None,
            })
            .collect()
    }

    /// The confirmed address of the given contract, if it was deployed
    pub fn address_of(&self, contract: Contract) -> Option<Address> {
        self.steps.iter().find_map(|step| match &step.status {
            StepStatus::Deployed(deployed) if deployed.contract == contract => {
                Some(deployed.address)
            }
            _ => None,
        })
    }
}

// -------------
// | Execution |
// -------------

/// Execute the given plan against the given backend, returning the terminal
/// status of every step.
///
/// Steps are submitted in plan order without waiting on one another; a step
/// whose constructor needs the address of an earlier contract waits for that
/// contract's confirmation first. A failed step fails alone: steps that
/// depend on it are skipped, and independent steps proceed regardless.
pub async fn execute_plan(plan: &DeployPlan, backend: &impl DeployBackend) -> PlanOutcome {
    let mut pending: HashMap<Contract, PendingDeploy> = HashMap::new();
    let mut done: HashMap<Contract, StepStatus> = HashMap::new();

    for step in plan.steps() {
        let args = match resolve_args(step, backend, &mut pending, &mut done).await {
            Ok(args) => args,
            Err(dep) => {
                warn!("Skipping {} deployment: {} was not deployed", step.contract, dep);
                done.insert(step.contract, StepStatus::Skipped(dep));
                continue;
            }
        };

        match submit_step(step.contract, &args, backend).await {
            Ok(pending_deploy) => {
                pending.insert(step.contract, pending_deploy);
            }
            Err(e) => {
                warn!("{} deployment failed: {}", step.contract, e);
                done.insert(step.contract, StepStatus::Failed(e));
            }
        }
    }

    // Wait out the deployments no later step forced a wait on
    for step in plan.steps() {
        if let Some(pending_deploy) = pending.remove(&step.contract) {
            confirm_deploy(pending_deploy, backend, &mut done).await;
        }
    }

    let steps = plan
        .steps()
        .iter()
        .map(|step| StepResult {
            contract: step.contract,
            status: done.remove(&step.contract).unwrap_or_else(|| {
                StepStatus::Failed(ScriptError::ContractDeployment(
                    "step was never attempted".to_string(),
                ))
            }),
        })
        .collect();

    PlanOutcome { steps }
}

/// Resolve a step's constructor arguments to concrete values, waiting on the
/// confirmation of any dependency that is still pending.
///
/// Errors with the blocking dependency if one was not deployed.
async fn resolve_args(
    step: &DeployStep,
    backend: &impl DeployBackend,
    pending: &mut HashMap<Contract, PendingDeploy>,
    done: &mut HashMap<Contract, StepStatus>,
) -> Result<Vec<DynSolValue>, Contract> {
    let mut resolved = Vec::with_capacity(step.args.len());
    for arg in &step.args {
        match arg {
            ConstructorArg::Address(address) => resolved.push(DynSolValue::Address(*address)),
            ConstructorArg::Uint(value) => resolved.push(DynSolValue::Uint(*value, 256)),
            ConstructorArg::AddressOf(dep) => {
                // The first step to need a still-pending dependency waits
                // for its confirmation here
                if let Some(pending_deploy) = pending.remove(dep) {
                    confirm_deploy(pending_deploy, backend, done).await;
                }

                match done.get(dep) {
                    Some(StepStatus::Deployed(deployed)) => {
                        resolved.push(DynSolValue::Address(deployed.address))
                    }
                    _ => return Err(*dep),
                }
            }
        }
    }

    Ok(resolved)
}

/// Build the creation code for a step and submit it through the backend
async fn submit_step(
    contract: Contract,
    args: &[DynSolValue],
    backend: &impl DeployBackend,
) -> Result<PendingDeploy, ScriptError> {
    let artifact = load_artifact(contract)?;
    let init_code = build_init_code(&artifact, args)?;

    debug!("Deploying {} contract...", contract);
    backend.submit_deploy(contract, init_code).await
}

/// Wait for the confirmation of a pending deployment, recording the terminal
/// status of its step
async fn confirm_deploy(
    pending_deploy: PendingDeploy,
    backend: &impl DeployBackend,
    done: &mut HashMap<Contract, StepStatus>,
) {
    let contract = pending_deploy.contract;
    match backend.await_deployed(&pending_deploy).await {
        Ok(address) => {
            info!(
                "{} contract successfully deployed!\n\
                Contract address: {:#x}\n\
                Transaction hash: {:#x}\n",
                contract, address, pending_deploy.tx_hash,
            );
            done.insert(
                contract,
                StepStatus::Deployed(DeployedContract {
                    contract,
                    address,
                    tx_hash: pending_deploy.tx_hash,
                }),
            );
        }
        Err(e) => {
            warn!("{} deployment failed: {}", contract, e);
            done.insert(contract, StepStatus::Failed(e));
        }
    }
}
