use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{Address, U256};
use eyre::Result;
use scripts::{
    errors::ScriptError,
    plan::{execute_plan, DeployPlan, DeployStep},
    types::{ConstructorArg, Contract},
    utils::load_artifact,
};
use tests::{
    mock::{BackendEvent, MockBackend},
    utils::{run_migration, setup_logging},
};

#[tokio::test]
async fn test_migration_deploys_all_contracts() -> Result<()> {
    let backend = MockBackend::new();
    let outcome = run_migration(&backend).await;

    assert!(outcome.is_success());

    // Each contract is submitted exactly once and lands at the address
    // the backend assigned, with results reported in plan order
    let contracts = [Contract::TestToken, Contract::ValueToken, Contract::ValueFeed];
    for (step, contract) in outcome.steps().iter().zip(contracts) {
        assert_eq!(step.contract, contract);
        assert_eq!(backend.submit_count(contract), 1);
        assert_eq!(
            outcome.address_of(contract),
            Some(backend.address_for(contract))
        );
    }

    Ok(())
}

#[tokio::test]
async fn test_value_feed_submitted_after_value_token_confirms() -> Result<()> {
    let backend = MockBackend::new();
    run_migration(&backend).await;

    let token_confirmed = backend
        .position(BackendEvent::Confirmed(Contract::ValueToken))
        .unwrap();
    let feed_submitted = backend
        .position(BackendEvent::Submitted(Contract::ValueFeed))
        .unwrap();
    assert!(token_confirmed < feed_submitted);

    // Both token submissions go out before anything is awaited: only the
    // feed's dependency edge forces a wait
    let test_token_submitted = backend
        .position(BackendEvent::Submitted(Contract::TestToken))
        .unwrap();
    let value_token_submitted = backend
        .position(BackendEvent::Submitted(Contract::ValueToken))
        .unwrap();
    assert!(test_token_submitted < token_confirmed);
    assert!(value_token_submitted < token_confirmed);

    Ok(())
}

#[tokio::test]
async fn test_value_feed_receives_value_token_address() -> Result<()> {
    let token_address = Address::repeat_byte(0xaa);
    let backend = MockBackend::new().with_address(Contract::ValueToken, token_address);
    let outcome = run_migration(&backend).await;

    assert!(outcome.is_success());

    // The feed's creation code is the artifact bytecode with the token's
    // address ABI-encoded after it
    let init_code = backend.init_code(Contract::ValueFeed).unwrap();
    let bytecode = load_artifact(Contract::ValueFeed)?.bytecode;
    assert_eq!(&init_code[..bytecode.len()], &bytecode[..]);

    let ctor_arg = DynSolType::Address.abi_decode_params(&init_code[bytecode.len()..])?;
    assert_eq!(ctor_arg, DynSolValue::Address(token_address));

    Ok(())
}

#[tokio::test]
async fn test_value_token_rejection_skips_value_feed() -> Result<()> {
    let backend = MockBackend::new().fail_submit(Contract::ValueToken);
    let outcome = run_migration(&backend).await;

    assert!(!outcome.is_success());

    // The feed is never submitted, and the run reports exactly one failure,
    // attributed to the token
    assert_eq!(backend.submit_count(Contract::ValueFeed), 0);
    let failures = outcome.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, Contract::ValueToken);
    assert_eq!(
        outcome.skipped(),
        vec![(Contract::ValueFeed, Contract::ValueToken)]
    );

    // The test token is unaffected
    assert_eq!(
        outcome.address_of(Contract::TestToken),
        Some(backend.address_for(Contract::TestToken))
    );

    Ok(())
}

#[tokio::test]
async fn test_value_token_revert_skips_value_feed() -> Result<()> {
    let backend = MockBackend::new().fail_confirmation(Contract::ValueToken);
    let outcome = run_migration(&backend).await;

    assert!(!outcome.is_success());
    assert_eq!(backend.submit_count(Contract::ValueFeed), 0);

    let failures = outcome.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, Contract::ValueToken);
    assert_eq!(
        outcome.skipped(),
        vec![(Contract::ValueFeed, Contract::ValueToken)]
    );

    Ok(())
}

#[tokio::test]
async fn test_constructor_arity_failure_never_submits() -> Result<()> {
    setup_logging();

    // The test token's constructor takes no arguments, so handing the step a
    // literal marks it failed before any transaction is built
    let plan = DeployPlan::new(vec![DeployStep {
        contract: Contract::TestToken,
        args: vec![ConstructorArg::Uint(U256::from(42u64))],
    }])?;

    let backend = MockBackend::new();
    let outcome = execute_plan(&plan, &backend).await;

    assert!(!outcome.is_success());
    assert!(backend.events().is_empty());

    let failures = outcome.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, Contract::TestToken);
    assert!(matches!(failures[0].1, ScriptError::CalldataConstruction(_)));

    Ok(())
}

#[tokio::test]
async fn test_test_token_failure_leaves_others_unaffected() -> Result<()> {
    let backend = MockBackend::new().fail_submit(Contract::TestToken);
    let outcome = run_migration(&backend).await;

    assert!(!outcome.is_success());

    let failures = outcome.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, Contract::TestToken);
    assert!(outcome.skipped().is_empty());

    // The token and feed deploy as if nothing happened
    assert!(outcome.address_of(Contract::ValueToken).is_some());
    assert!(outcome.address_of(Contract::ValueFeed).is_some());

    Ok(())
}
