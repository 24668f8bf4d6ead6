//! Engine configuration management.
//!
//! Holds the host-tunable knobs: aging schedule brackets, VAT rounding
//! precision, and the default period count for new reporting periods.
//! Chart section code ranges live on the account type enum itself and are
//! not configurable.

use serde::Deserialize;

/// Engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Aging schedule configuration.
    #[serde(default)]
    pub aging: AgingConfig,
    /// Posting configuration.
    #[serde(default)]
    pub posting: PostingConfig,
}

/// Aging schedule bracket configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AgingConfig {
    /// Upper bound (inclusive, in days) of each aging bracket.
    ///
    /// Amounts older than the last bound fall into a final open-ended
    /// bracket.
    #[serde(default = "default_brackets")]
    pub brackets: Vec<u32>,
}

fn default_brackets() -> Vec<u32> {
    vec![30, 90, 180, 270, 365]
}

impl Default for AgingConfig {
    fn default() -> Self {
        Self {
            brackets: default_brackets(),
        }
    }
}

/// Posting configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PostingConfig {
    /// Decimal places used when converting amounts to the functional
    /// currency.
    #[serde(default = "default_functional_precision")]
    pub functional_precision: u32,
}

fn default_functional_precision() -> u32 {
    4
}

impl Default for PostingConfig {
    fn default() -> Self {
        Self {
            functional_precision: default_functional_precision(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            aging: AgingConfig::default(),
            posting: PostingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from config files and environment.
    ///
    /// Reads `config/default` and `config/{RUN_MODE}` when present, then
    /// applies `IFRS__`-prefixed environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or deserialized.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("IFRS").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
