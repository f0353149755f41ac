//! Helpers shared across the deploy script test suites

use std::sync::Once;

use scripts::plan::{execute_plan, DeployPlan, PlanOutcome};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use crate::mock::MockBackend;

static TRACING_INIT: Once = Once::new();

/// Set up logging for a test, respecting `RUST_LOG`
pub fn setup_logging() {
    TRACING_INIT.call_once(|| {
        fmt().with_env_filter(EnvFilter::from_default_env()).init();
    });
}

/// Execute the migration plan against the given mock backend
pub async fn run_migration(backend: &MockBackend) -> PlanOutcome {
    setup_logging();

    debug!("Executing migration plan...");
    execute_plan(&DeployPlan::migration(), backend).await
}
