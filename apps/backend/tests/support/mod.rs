#![allow(dead_code)]

pub mod factory;
pub mod state_builder_ext;

use backend::infra::state::{build_state, StateBuilder};
use backend::state::security_config::SecurityConfig;

// Re-export only what current tests actually import
pub use app_builder::create_test_app;

/// Security config shared by the integration suites. Tokens minted with
/// this config verify against states built from `test_state_builder`.
pub fn test_security_config() -> SecurityConfig {
    SecurityConfig::new("test_secret_key_for_testing_purposes_only".as_bytes())
}

/// State builder preloaded with the test security config.
pub fn test_state_builder() -> StateBuilder {
    build_state().with_security(test_security_config())
}
