//! Mock settings and their persistence.
//!
//! Settings live in a small JSON key-value file under the `mockConfig` key so
//! they survive restarts of the CLI and the server. When the file holds no
//! settings, the environment is consulted, then the defaults.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

pub const CONFIG_KEY: &str = "mockConfig";
pub const ENV_USE_MOCKS: &str = "AGREEMENT_MOCK_USE_MOCKS";
pub const ENV_MOCK_DELAY: &str = "AGREEMENT_MOCK_DELAY";
pub const DEFAULT_CONFIG_FILE: &str = "agreement-mock.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorConfig {
    pub enabled: bool,
    /// Probability in `[0, 1]` that a request fails
    pub error_rate: f64,
    /// Operation name -> message that operation always fails with
    pub specific_errors: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MockConfig {
    pub use_mocks: bool,
    /// Fixed latency per request, in milliseconds
    pub mock_delay: u64,
    pub error_config: ErrorConfig,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            use_mocks: true,
            mock_delay: 0,
            error_config: ErrorConfig::default(),
        }
    }
}

impl MockConfig {
    pub fn from_env() -> Self {
        let mut values = HashMap::new();
        for key in [ENV_USE_MOCKS, ENV_MOCK_DELAY] {
            if let Ok(value) = std::env::var(key) {
                values.insert(key.to_string(), value);
            }
        }
        Self::from_map(&values)
    }

    /// Builds settings from environment-style values; anything missing or
    /// unparseable keeps its default.
    pub fn from_map(values: &HashMap<String, String>) -> Self {
        let mut config = Self::default();

        if let Some(value) = values.get(ENV_USE_MOCKS) {
            config.use_mocks = value.trim().eq_ignore_ascii_case("true");
        }
        if let Some(delay) = values
            .get(ENV_MOCK_DELAY)
            .and_then(|value| value.trim().parse().ok())
        {
            config.mock_delay = delay;
        }

        config
    }

    /// Clamps values into their valid ranges
    pub fn normalized(mut self) -> Self {
        self.error_config.error_rate = clamp_rate(self.error_config.error_rate);
        self
    }

    pub fn enable_mocks(&mut self) {
        self.use_mocks = true;
    }

    pub fn disable_mocks(&mut self) {
        self.use_mocks = false;
    }

    pub fn set_delay(&mut self, millis: u64) {
        self.mock_delay = millis;
    }

    pub fn enable_errors(&mut self, rate: f64) {
        self.error_config.enabled = true;
        self.error_config.error_rate = clamp_rate(rate);
    }

    pub fn disable_errors(&mut self) {
        self.error_config.enabled = false;
    }

    /// Makes `operation` always fail with `message` while errors are enabled
    pub fn set_specific_error(&mut self, operation: impl Into<String>, message: impl Into<String>) {
        self.error_config
            .specific_errors
            .insert(operation.into(), message.into());
    }

    pub fn clear_specific_error(&mut self, operation: &str) -> bool {
        self.error_config.specific_errors.remove(operation).is_some()
    }
}

fn clamp_rate(rate: f64) -> f64 {
    if rate.is_nan() {
        0.0
    } else {
        rate.clamp(0.0, 1.0)
    }
}

/// JSON key-value file holding the persisted settings
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persisted settings first, then the environment, then defaults.
    pub fn load(&self) -> Result<MockConfig> {
        match self.read_persisted()? {
            Some(config) => {
                debug!("Loaded mock settings from {}", self.path.display());
                Ok(config.normalized())
            }
            None => Ok(MockConfig::from_env().normalized()),
        }
    }

    pub fn save(&self, config: &MockConfig) -> Result<()> {
        let mut entries = self.read_entries()?;
        entries.insert(
            CONFIG_KEY.to_string(),
            serde_json::to_value(config.clone().normalized())?,
        );

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(&Value::Object(entries))?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("writing {}", self.path.display()))?;

        info!("Saved mock settings to {}", self.path.display());
        Ok(())
    }

    /// Loads, applies `change`, saves, and returns the new settings
    pub fn update<F>(&self, change: F) -> Result<MockConfig>
    where
        F: FnOnce(&mut MockConfig),
    {
        let mut config = self.load()?;
        change(&mut config);
        self.save(&config)?;
        Ok(config.normalized())
    }

    fn read_persisted(&self) -> Result<Option<MockConfig>> {
        let mut entries = self.read_entries()?;
        match entries.remove(CONFIG_KEY) {
            Some(value) => {
                let config = serde_json::from_value(value)
                    .with_context(|| format!("invalid {} in {}", CONFIG_KEY, self.path.display()))?;
                Ok(Some(config))
            }
            None => Ok(None),
        }
    }

    fn read_entries(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&contents)
            .with_context(|| format!("parsing {}", self.path.display()))?
        {
            Value::Object(entries) => Ok(entries),
            _ => anyhow::bail!("{} is not a JSON object", self.path.display()),
        }
    }
}
