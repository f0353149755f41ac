//! Constants used in the deploy scripts

/// The ABI of the TestToken contract
///
/// Compiled from `contracts/TestToken.sol` with solc v0.8.19
pub const TEST_TOKEN_ABI: &str = include_str!("../artifacts/TestToken.abi");

/// The bytecode of the TestToken contract
///
/// Compiled from `contracts/TestToken.sol` with solc v0.8.19
pub const TEST_TOKEN_BYTECODE: &str = include_str!("../artifacts/TestToken.bin");

/// The ABI of the ValueToken contract
///
/// Compiled from `contracts/ValueToken.sol` with solc v0.8.19
pub const VALUE_TOKEN_ABI: &str = include_str!("../artifacts/ValueToken.abi");

/// The bytecode of the ValueToken contract
///
/// Compiled from `contracts/ValueToken.sol` with solc v0.8.19
pub const VALUE_TOKEN_BYTECODE: &str = include_str!("../artifacts/ValueToken.bin");

/// The ABI of the ValueFeed contract
///
/// Compiled from `contracts/ValueFeed.sol` with solc v0.8.19
pub const VALUE_FEED_ABI: &str = include_str!("../artifacts/ValueFeed.abi");

/// The bytecode of the ValueFeed contract
///
/// Compiled from `contracts/ValueFeed.sol` with solc v0.8.19
pub const VALUE_FEED_BYTECODE: &str = include_str!("../artifacts/ValueFeed.bin");

/// The key in the `deployments.json` file under which the deployed
/// contract addresses are recorded
pub const DEPLOYMENTS_KEY: &str = "deployments";

/// The TestToken contract key in the `deployments.json` file
pub const TEST_TOKEN_CONTRACT_KEY: &str = "TestToken";

/// The ValueToken contract key in the `deployments.json` file
pub const VALUE_TOKEN_CONTRACT_KEY: &str = "ValueToken";

/// The ValueFeed contract key in the `deployments.json` file
pub const VALUE_FEED_CONTRACT_KEY: &str = "ValueFeed";

/// The number of times to poll for a deployment transaction's receipt
/// before giving up
pub const RECEIPT_RETRY_ATTEMPTS: usize = 30;

/// The delay between receipt polls, in milliseconds
pub const RECEIPT_RETRY_DELAY_MS: u64 = 500;

/// The default network RPC URL, pointing at a local devnet node
pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

/// The default path of the `deployments.json` file
pub const DEFAULT_DEPLOYMENTS_PATH: &str = "deployments.json";
