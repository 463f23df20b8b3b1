//! Common test utilities and setup for integration tests.

use std::sync::Once;

use verdex_core::{RoleConfig, RuntimeConfig, VerdexRuntime};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive(tracing::Level::INFO.into()),
            )
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Launch a headless runtime with the given role configs.
pub async fn launch(role_configs: Vec<RoleConfig>) -> VerdexRuntime {
    init_tracing();
    VerdexRuntime::launch(RuntimeConfig::default(), role_configs)
        .await
        .expect("failed to launch runtime")
}
