use crate::calendar::{parse_iso_date, ParseDateError};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::Date;
use tracing::info;

pub(crate) const DEFAULT_MONTHS_IN_ADVANCE: u32 = 2;

/// Contents of a listing's TOML configuration file
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    /// Number of months after the current one at which the calendar opens
    pub(crate) months_in_advance: u32,

    /// Dates that are already reserved or blocked, as `YYYY-MM-DD` strings
    pub(crate) unavailable: Vec<String>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            months_in_advance: DEFAULT_MONTHS_IN_ADVANCE,
            unavailable: Vec::new(),
        }
    }
}

impl Config {
    pub(crate) fn load(path: &Path) -> Result<Config, ConfigError> {
        let src = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let config = Config::parse(&src).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        info!(
            path = %path.display(),
            unavailable = config.unavailable.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    pub(crate) fn parse(src: &str) -> Result<Config, toml::de::Error> {
        toml::from_str(src)
    }

    /// Parse all of the unavailable dates.  A single malformed entry causes
    /// the whole list to be rejected.
    pub(crate) fn unavailable_dates(&self) -> Result<Vec<Date>, ParseDateError> {
        self.unavailable.iter().map(|s| parse_iso_date(s)).collect()
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read configuration file {}", .path.display())]
    Read {
        path: PathBuf,
        source: io::Error,
    },
    #[error("failed to parse configuration file {}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
