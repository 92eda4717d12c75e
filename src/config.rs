//! Configuration handling for opstat.
//!
//! The user settings file is stored at `$OPSTAT_HOME/user_settings.json` and lists the
//! currencies and stock symbols to enrich the dashboard with. Provider API keys come from the
//! environment.

use crate::{utils, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const USER_SETTINGS_JSON: &str = "user_settings.json";
const RATES_API_KEY_VAR: &str = "RATES_API_KEY";
const STOCKS_API_KEY_VAR: &str = "STOCKS_API_KEY";

/// The user's enrichment preferences. A missing or corrupt settings file degrades to the empty
/// defaults, which switches the enrichment views off rather than failing the program.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    user_currencies: Vec<String>,
    user_stocks: Vec<String>,
}

impl UserSettings {
    pub fn new(user_currencies: Vec<String>, user_stocks: Vec<String>) -> Self {
        Self {
            user_currencies,
            user_stocks,
        }
    }

    pub fn user_currencies(&self) -> &[String] {
        &self.user_currencies
    }

    pub fn user_stocks(&self) -> &[String] {
        &self.user_stocks
    }
}

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$OPSTAT_HOME` and from there it loads `$OPSTAT_HOME/user_settings.json` and the
/// provider API keys from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    settings: UserSettings,
    rates_api_key: Option<String>,
    stocks_api_key: Option<String>,
}

impl Config {
    /// Loads the configuration. Never fails on a missing or corrupt settings file: enrichment is
    /// a feature that degrades, not a precondition.
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let root = home.into();
        let settings_path = root.join(USER_SETTINGS_JSON);

        let settings = match utils::deserialize::<UserSettings>(&settings_path).await {
            Ok(settings) => {
                debug!("Loaded user settings from {}", settings_path.display());
                settings
            }
            Err(e) => {
                warn!("User settings unavailable, enrichment views will be empty: {e:#}");
                UserSettings::default()
            }
        };

        Ok(Self {
            root,
            settings,
            rates_api_key: non_empty_env(RATES_API_KEY_VAR),
            stocks_api_key: non_empty_env(STOCKS_API_KEY_VAR),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }

    pub fn rates_api_key(&self) -> Option<&str> {
        self.rates_api_key.as_deref()
    }

    pub fn stocks_api_key(&self) -> Option<&str> {
        self.stocks_api_key.as_deref()
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}
