//! Environment variable source: VCSM__ prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Add environment variable overlay to builder.
/// `VCSM__HASHING__MODE=merkle` sets `hashing.mode`; the prefix takes the same `__` separator.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(environment_source(None)))
}

/// The `VCSM` environment source, reading `vars` instead of the process environment when given
fn environment_source(vars: Option<config::Map<String, String>>) -> Environment {
    Environment::with_prefix("VCSM")
        .separator("__")
        .try_parsing(true)
        .source(vars)
}
