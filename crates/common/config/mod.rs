use std::io::BufRead;

use serde::Deserialize;
use tracing::debug;

pub mod errors;

use errors::ConfigError;

pub const ENV_PREFIX: &str = "ETHGUARD_";

/// Default cap on list nesting. An EIP-1559 transaction needs 4 levels
/// (transaction, access list, access list entry, storage keys).
pub const DEFAULT_MAX_DEPTH: usize = ethguard_rlp::constants::DEFAULT_MAX_DEPTH;
pub const MIN_MAX_DEPTH: usize = 4;
/// Same limit geth applies to pooled transactions.
pub const DEFAULT_MAX_TX_SIZE: usize = 128 * 1024;

/// Limits applied while decoding a raw transaction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DecoderConfig {
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default = "default_max_tx_size")]
    pub max_tx_size: usize,
    /// Reject signatures whose `s` lies in the upper half of the curve order (EIP-2).
    #[serde(default)]
    pub require_low_s: bool,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_max_tx_size() -> usize {
    DEFAULT_MAX_TX_SIZE
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_tx_size: DEFAULT_MAX_TX_SIZE,
            require_low_s: false,
        }
    }
}

impl DecoderConfig {
    /// Reads `ETHGUARD_MAX_DEPTH`, `ETHGUARD_MAX_TX_SIZE` and `ETHGUARD_REQUIRE_LOW_S`.
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_prefixed_env(ENV_PREFIX)
    }

    pub fn from_prefixed_env(prefix: &str) -> Result<Self, ConfigError> {
        let config = envy::prefixed(prefix)
            .from_env::<Self>()
            .map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth < MIN_MAX_DEPTH {
            return Err(ConfigError::InvalidConfig(format!(
                "max_depth must be at least {MIN_MAX_DEPTH}, got {}",
                self.max_depth
            )));
        }
        if self.max_tx_size == 0 {
            return Err(ConfigError::InvalidConfig(
                "max_tx_size must be greater than zero".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Loads `KEY=value` lines from the file named by `ENV_FILE` (`.env` by default)
/// into the process environment.
pub fn read_env_file() -> Result<(), ConfigError> {
    let env_file_name = std::env::var("ENV_FILE").unwrap_or_else(|_| ".env".to_string());
    read_env_file_from(&env_file_name)
}

pub fn read_env_file_from(path: &str) -> Result<(), ConfigError> {
    let env_file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(env_file);

    for line in reader.lines() {
        let line = line?;

        if line.starts_with('#') {
            // Skip comments
            continue;
        };

        match line.split_once('=') {
            Some((key, value)) => {
                debug!("Setting env var from {path}: {key}={value}");
                std::env::set_var(key.trim(), value.trim())
            }
            None => continue,
        };
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_when_env_is_empty() {
        let config = DecoderConfig::from_prefixed_env("ETHGUARD_TEST_EMPTY_").unwrap();
        assert_eq!(config, DecoderConfig::default());
    }

    #[test]
    fn reads_values_from_env() {
        std::env::set_var("ETHGUARD_TEST_SET_MAX_DEPTH", "8");
        std::env::set_var("ETHGUARD_TEST_SET_MAX_TX_SIZE", "4096");
        std::env::set_var("ETHGUARD_TEST_SET_REQUIRE_LOW_S", "true");
        let config = DecoderConfig::from_prefixed_env("ETHGUARD_TEST_SET_").unwrap();
        assert_eq!(
            config,
            DecoderConfig {
                max_depth: 8,
                max_tx_size: 4096,
                require_low_s: true,
            }
        );
    }

    #[test]
    fn rejects_depth_too_small_for_access_lists() {
        std::env::set_var("ETHGUARD_TEST_SHALLOW_MAX_DEPTH", "3");
        let result = DecoderConfig::from_prefixed_env("ETHGUARD_TEST_SHALLOW_");
        assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_unparseable_values() {
        std::env::set_var("ETHGUARD_TEST_BAD_MAX_TX_SIZE", "lots");
        let result = DecoderConfig::from_prefixed_env("ETHGUARD_TEST_BAD_");
        assert!(matches!(
            result,
            Err(ConfigError::ConfigDeserializationError(_))
        ));
    }

    #[test]
    fn env_file_values_are_loaded() {
        let path = std::env::temp_dir().join(format!("ethguard-{}.env", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "# decoder limits").unwrap();
        writeln!(file, "ETHGUARD_TEST_FILE_MAX_DEPTH=6").unwrap();
        writeln!(file, "not a key value line").unwrap();
        drop(file);

        read_env_file_from(path.to_str().unwrap()).unwrap();
        let config = DecoderConfig::from_prefixed_env("ETHGUARD_TEST_FILE_").unwrap();
        assert_eq!(config.max_depth, 6);

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_env_file_is_an_error() {
        let result = read_env_file_from("/nonexistent/ethguard.env");
        assert!(matches!(result, Err(ConfigError::EnvFileError(_))));
    }
}
