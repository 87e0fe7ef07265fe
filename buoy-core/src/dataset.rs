use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt, str::FromStr};

use crate::error::NdbcError;

/// Realtime dataset published per station under `data/realtime2/`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    /// Standard meteorological data (`.txt`).
    #[default]
    Meteorological,
    /// Spectral wave summary data (`.spec`).
    WaveSummary,
}

impl Dataset {
    /// File extension NDBC uses for this dataset.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Meteorological => "txt",
            Dataset::WaveSummary => "spec",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Dataset::Meteorological => "standard meteorological",
            Dataset::WaveSummary => "spectral wave summary",
        }
    }

    pub const fn all() -> &'static [Dataset] {
        &[Dataset::Meteorological, Dataset::WaveSummary]
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Dataset {
    type Error = NdbcError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "txt" | "meteorological" | "met" => Ok(Dataset::Meteorological),
            "spec" | "wave_summary" | "wave-summary" | "waves" => Ok(Dataset::WaveSummary),
            _ => Err(NdbcError::UnknownDataset(value.to_string())),
        }
    }
}

impl FromStr for Dataset {
    type Err = NdbcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dataset::try_from(s)
    }
}
