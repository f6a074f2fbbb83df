//! Merge rules: defaults, override order.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("hashing.mode", "rolling")?
        .set_default("hashing.chunk_size", crate::types::DEFAULT_CHUNK_SIZE as i64)
}
