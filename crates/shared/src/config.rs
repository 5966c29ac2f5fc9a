//! Application configuration management.

use serde::Deserialize;

use crate::types::AccountCode;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Period-closing policy.
    #[serde(default)]
    pub closing: ClosingPolicy,
}

/// Policy governing which accounts may legitimately carry a negative
/// closing balance.
///
/// Contra accounts (accumulated depreciation, provisions, retained
/// earnings) offset their class's normal balance, so a negative figure
/// there is bookkeeping, not an error. Every other account with a
/// negative closing balance blocks period close.
#[derive(Debug, Clone, Deserialize)]
pub struct ClosingPolicy {
    /// Code prefixes of accounts exempt from the negative-balance check.
    #[serde(default = "default_contra_prefixes")]
    pub contra_account_prefixes: Vec<String>,
}

fn default_contra_prefixes() -> Vec<String> {
    vec!["214".to_string(), "229".to_string(), "421".to_string()]
}

impl Default for ClosingPolicy {
    fn default() -> Self {
        Self {
            contra_account_prefixes: default_contra_prefixes(),
        }
    }
}

impl ClosingPolicy {
    /// Returns true if the account is on the contra allowlist.
    #[must_use]
    pub fn is_contra(&self, account: &AccountCode) -> bool {
        self.contra_account_prefixes
            .iter()
            .any(|prefix| account.as_str().starts_with(prefix.as_str()))
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FIDUCIA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
