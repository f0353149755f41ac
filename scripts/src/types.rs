//! Type definitions used throughout the deploy scripts

use std::fmt::{self, Display};

use alloy_json_abi::JsonAbi;
use alloy_primitives::{Address, Bytes, TxHash, U256};
use clap::ValueEnum;

/// The contracts the deploy scripts know how to deploy
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Contract {
    /// The test token contract, a mintable ERC20 used for testing
    TestToken,
    /// The value token contract, the ERC20 the value feed reports on
    ValueToken,
    /// The value feed contract, constructed against the value token's address
    ValueFeed,
}

impl Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contract::TestToken => write!(f, "test-token"),
            Contract::ValueToken => write!(f, "value-token"),
            Contract::ValueFeed => write!(f, "value-feed"),
        }
    }
}

/// A single constructor argument for a contract deployment
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConstructorArg {
    /// A literal address argument
    Address(Address),
    /// A literal unsigned integer argument
    Uint(U256),
    /// The address of another contract in the plan, resolved once that
    /// contract's deployment has confirmed
    AddressOf(Contract),
}

/// A compiled Solidity artifact: the contract's ABI along with its creation bytecode
#[derive(Clone, Debug)]
pub struct Artifact {
    /// The parsed contract ABI
    pub abi: JsonAbi,
    /// The contract's creation bytecode
    pub bytecode: Bytes,
}

/// A handle on a submitted but not yet confirmed contract deployment
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PendingDeploy {
    /// The contract being deployed
    pub contract: Contract,
    /// The hash of the deployment transaction
    pub tx_hash: TxHash,
}

/// A record of a confirmed contract deployment
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DeployedContract {
    /// The contract that was deployed
    pub contract: Contract,
    /// The address at which the contract was deployed
    pub address: Address,
    /// The hash of the deployment transaction
    pub tx_hash: TxHash,
}
