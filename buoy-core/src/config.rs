use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::dataset::Dataset;

pub const DEFAULT_REALTIME_BASE_URL: &str = "https://www.ndbc.noaa.gov/data/realtime2";
pub const DEFAULT_ACTIVE_STATIONS_URL: &str = "https://www.ndbc.noaa.gov/activestations.xml";
pub const DEFAULT_FORECAST_URL: &str =
    "https://graphical.weather.gov/xml/sample_products/browser_interface/ndfdXMLclient.php";

/// Where each resource is fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Directory holding `{STATION}.txt` / `{STATION}.spec`.
    pub realtime_base_url: String,
    pub active_stations_url: String,
    pub forecast_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            realtime_base_url: DEFAULT_REALTIME_BASE_URL.to_string(),
            active_stations_url: DEFAULT_ACTIVE_STATIONS_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Point every endpoint at one host, e.g. a local test server.
    pub fn rooted_at(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            realtime_base_url: format!("{base}/data/realtime2"),
            active_stations_url: format!("{base}/activestations.xml"),
            forecast_url: format!("{base}/ndfdXMLclient.php"),
        }
    }

    pub fn realtime_url(&self, station_id: &str, dataset: Dataset) -> String {
        format!(
            "{}/{}.{}",
            self.realtime_base_url.trim_end_matches('/'),
            station_id.trim().to_uppercase(),
            dataset.as_str()
        )
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// default_station = "41013"
/// default_dataset = "txt"
///
/// [endpoints]
/// realtime_base_url = "https://www.ndbc.noaa.gov/data/realtime2"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub default_station: Option<String>,

    /// `txt` or `spec`.
    pub default_dataset: Option<String>,

    /// Sent with every request; weather.gov rejects anonymous clients.
    pub user_agent: Option<String>,

    pub endpoints: Endpoints,
}

impl Config {
    pub fn default_station(&self) -> Result<&str> {
        self.default_station.as_deref().ok_or_else(|| {
            anyhow!(
                "No station given and no default station configured.\n\
                 Hint: pass a station id (e.g. `buoy observations 41013`) or run `buoy configure`."
            )
        })
    }

    /// Configured dataset, falling back to meteorological.
    pub fn default_dataset(&self) -> Result<Dataset> {
        match &self.default_dataset {
            Some(s) => Dataset::try_from(s.as_str())
                .with_context(|| format!("Invalid default_dataset in config: '{s}'")),
            None => Ok(Dataset::default()),
        }
    }

    pub fn set_default_station(&mut self, station_id: &str) {
        self.default_station = Some(station_id.trim().to_uppercase());
    }

    pub fn set_default_dataset(&mut self, dataset: Dataset) {
        self.default_dataset = Some(dataset.as_str().to_string());
    }

    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("buoy-core/{}", env!("CARGO_PKG_VERSION")))
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "buoy", "buoy-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
