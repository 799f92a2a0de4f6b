use crate::chain_provider::{EXPECTED_CHAIN_ID, INIT_MAX_RETRIES, INIT_RETRY_DELAY_SECS};
use crate::error::FaucetError;
use crate::retry::RetryPolicy;
use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;
use toml::map::Map;

const COMMON_CONFIG_PATH: &str = "configs/common.toml";
const PRIVATE_KEYS_VAR: &str = "PRIVATE_KEYS";

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct FaucetConfig {
    pub chain: ChainSettings,
    pub retry: RetrySettings,
    pub provider: ProviderSettings,
    pub monitoring: MonitoringSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ChainSettings {
    pub chain_id: u64,
    pub rpc_url: String,
    pub explorer_tx_url: String,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self {
            chain_id: EXPECTED_CHAIN_ID,
            rpc_url: "https://carrot.megaeth.com/rpc".to_string(),
            explorer_tx_url: "https://www.megaexplorer.xyz/tx/".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub backoff_min_seconds: u64,
    pub backoff_max_seconds: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_min_seconds: 5,
            backoff_max_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ProviderSettings {
    pub init_max_retries: u32,
    pub init_retry_delay_seconds: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            init_max_retries: INIT_MAX_RETRIES,
            init_retry_delay_seconds: INIT_RETRY_DELAY_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct MonitoringSettings {
    pub poll_interval_seconds: u64,
}

impl Default for MonitoringSettings {
    fn default() -> Self {
        Self {
            poll_interval_seconds: 2,
        }
    }
}

impl FaucetConfig {
    pub fn load(path: &str) -> Result<Self> {
        dotenv::dotenv().ok();

        let common_content = Self::load_common_config(Path::new(COMMON_CONFIG_PATH))?;
        let specific_content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path, e))?;

        let merged_content = Self::merge_configs(common_content, specific_content)?;
        let content = Self::substitute_env_vars(merged_content)?;

        let config: FaucetConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn load_common_config(path: &Path) -> Result<String> {
        // A missing common file just means there is nothing to merge.
        match fs::read_to_string(path) {
            Ok(content) => Ok(content),
            Err(_) => Ok(String::new()),
        }
    }

    fn merge_configs(common: String, specific: String) -> Result<String> {
        if common.trim().is_empty() {
            return Ok(specific);
        }

        let common_toml: toml::Value = toml::from_str(&common)?;
        let specific_toml: toml::Value = toml::from_str(&specific)?;

        // Specific overrides common, table by table.
        let merged = Self::merge_toml_values(common_toml, specific_toml);
        Ok(toml::to_string_pretty(&merged)?)
    }

    fn merge_toml_values(mut base: toml::Value, override_val: toml::Value) -> toml::Value {
        match (&mut base, override_val) {
            (toml::Value::Table(base_map), toml::Value::Table(override_map)) => {
                for (key, value) in override_map {
                    let existing = base_map
                        .remove(&key)
                        .unwrap_or(toml::Value::Table(Map::new()));
                    base_map.insert(key, Self::merge_toml_values(existing, value));
                }
                base
            }
            (_, override_val) => override_val,
        }
    }

    fn substitute_env_vars(content: String) -> Result<String> {
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")?;
        let result = re.replace_all(&content, |cap: &regex::Captures| {
            env::var(&cap[1]).unwrap_or_else(|_| cap[0].to_string())
        });
        Ok(result.into_owned())
    }

    pub fn validate(&self) -> Result<(), FaucetError> {
        if self.chain.chain_id != EXPECTED_CHAIN_ID {
            return Err(FaucetError::NetworkMismatch {
                expected: EXPECTED_CHAIN_ID,
                actual: self.chain.chain_id,
            });
        }
        url::Url::parse(&self.chain.rpc_url).map_err(|e| {
            FaucetError::Validation(format!("invalid rpc_url '{}': {}", self.chain.rpc_url, e))
        })?;
        if self.retry.max_attempts == 0 {
            return Err(FaucetError::Validation(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.retry.backoff_min_seconds > self.retry.backoff_max_seconds {
            return Err(FaucetError::Validation(format!(
                "retry backoff range is reversed ({} > {})",
                self.retry.backoff_min_seconds, self.retry.backoff_max_seconds
            )));
        }
        if self.provider.init_max_retries == 0 {
            return Err(FaucetError::Validation(
                "provider.init_max_retries must be at least 1".to_string(),
            ));
        }
        if self.monitoring.poll_interval_seconds == 0 {
            return Err(FaucetError::Validation(
                "monitoring.poll_interval_seconds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry.max_attempts,
            self.retry.backoff_min_seconds..=self.retry.backoff_max_seconds,
        )
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.monitoring.poll_interval_seconds)
    }
}

/// Reads `PRIVATE_KEYS` (comma separated) from the environment or `.env`.
pub fn load_private_keys() -> Result<Vec<String>> {
    dotenv::dotenv().ok();
    let raw = env::var(PRIVATE_KEYS_VAR)
        .map_err(|_| anyhow::anyhow!("{} is not set", PRIVATE_KEYS_VAR))?;
    let keys = parse_private_keys(&raw);
    if keys.is_empty() {
        return Err(anyhow::anyhow!("{} contains no keys", PRIVATE_KEYS_VAR));
    }
    Ok(keys)
}

fn parse_private_keys(raw: &str) -> Vec<String> {
    raw.split(|c| c == ',' || c == '\n')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect()
}
