use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigResult;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Reads `path` and returns the validated [`Config`] it describes
///
/// Keys missing from the file keep their defaults, so an empty file is a
/// valid configuration.
///
/// # Errors
///
/// * `ConfigError::Io` - the file cannot be read
/// * `ConfigError::Parse` - the file is not valid TOML for [`Config`]
/// * `ConfigError::Validation` / `InvalidUrl` / `InvalidSelector` - a value is unusable
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    parse_config(&std::fs::read_to_string(path)?)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> ConfigResult<Config> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Hex-encoded SHA-256 of the configuration file at `path`
///
/// Logged at startup so two runs can be matched to the exact settings used.
pub fn compute_config_hash(path: &Path) -> ConfigResult<String> {
    Ok(digest(&std::fs::read_to_string(path)?))
}

/// Like [`load_config`], also returning the hash of the bytes that were parsed
pub fn load_config_with_hash(path: &Path) -> ConfigResult<(Config, String)> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    Ok((config, digest(&content)))
}

fn digest(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}
