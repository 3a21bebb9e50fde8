//! Config path resolution.

use lira_common::ConfigError;
use std::path::PathBuf;

/// Platform-specific default config file path.
///
/// On macOS: `~/Library/Application Support/lira/config.toml`
/// On Linux: `~/.config/lira/config.toml`
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))?;
    Ok(config_dir.join("lira").join("config.toml"))
}
