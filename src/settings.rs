//! Runtime settings. Read from an optional `splitit.toml` in the working
//! directory, then overridden by `SPLITIT_*` environment variables
//! (`SPLITIT_SERVER__BIND=127.0.0.1:8080`, `SPLITIT_ROSTER=Ann,Bo`).

use crate::currency::{currency_for_region, Currency, CurrencyError, DEFAULT_CURRENCY};
use crate::model::{SplitState, SAMPLE_ROSTER};
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Max memoized evaluations kept by the HTTP host
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            bind: default_bind(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// ISO 4217 display currency
    pub currency: Option<String>,

    /// ISO 3166-1 alpha-2 country, used when no currency is set
    pub country: Option<String>,

    #[serde(default = "default_roster")]
    pub roster: Vec<String>,

    #[serde(default)]
    pub server: ServerSettings,
}

fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_cache_capacity() -> usize {
    256
}

fn default_roster() -> Vec<String> {
    SAMPLE_ROSTER.iter().map(|name| name.to_string()).collect()
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            currency: None,
            country: None,
            roster: default_roster(),
            server: ServerSettings::default(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("splitit").required(false))
            .add_source(
                Environment::with_prefix("SPLITIT")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("roster")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Explicit currency, else the country's currency, else USD
    pub fn currency(&self) -> Result<Currency, CurrencyError> {
        let code = match (&self.currency, &self.country) {
            (Some(code), _) => code.as_str(),
            (None, Some(country)) => currency_for_region(country),
            (None, None) => DEFAULT_CURRENCY,
        };
        Currency::parse(code)
    }

    /// Fresh session seeded with the configured roster
    pub fn initial_state(&self) -> SplitState {
        SplitState::with_roster(self.roster.iter().map(String::as_str))
    }
}
