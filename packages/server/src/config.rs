//! Server configuration.
//!
//! Settings come from TOML: the embedded `config/default.toml`, or the
//! file named by `CIDADE_ALERTA_CONFIG`. `BIND_ADDR` and `PORT` override
//! the bind address last.

use std::path::{Path, PathBuf};

use cidade_alerta_geo::{BucketSize, DistanceUnit};
use serde::Deserialize;

/// Environment variable naming an alternate config file.
pub const CONFIG_PATH_ENV: &str = "CIDADE_ALERTA_CONFIG";

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`ServerConfig`].
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range.
    #[error("Invalid config: {message}")]
    Invalid {
        /// Which value is wrong and why.
        message: String,
    },
}

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfig {
    /// Where to listen.
    #[serde(default)]
    pub server: BindConfig,
    /// Where the fixture data lives.
    #[serde(default)]
    pub data: DataConfig,
    /// Defaults for geo requests.
    #[serde(default)]
    pub geo: GeoConfig,
}

/// Listen address.
#[derive(Debug, Clone, Deserialize)]
pub struct BindConfig {
    /// Interface to bind.
    pub bind_addr: String,
    /// TCP port.
    pub port: u16,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Locations of the JSON files backing the in-memory collaborators.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// JSON array of reports.
    pub reports: PathBuf,
    /// JSON array of user accounts.
    pub users: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            reports: PathBuf::from("data/reports.json"),
            users: PathBuf::from("data/users.json"),
        }
    }
}

/// Defaults applied when a request omits radius or bucket size.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeoConfig {
    /// Radius for the "near you" view, in meters.
    pub nearby_radius_m: f64,
    /// Radius for location-scoped searches, in kilometers.
    pub search_radius_km: f64,
    /// Grid step for marker clustering, in degrees.
    pub bucket_size: BucketSize,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            nearby_radius_m: 300.0,
            search_radius_km: 5.0,
            bucket_size: BucketSize::DEFAULT,
        }
    }
}

impl GeoConfig {
    /// Search radius converted to meters.
    #[must_use]
    pub fn search_radius_m(&self) -> f64 {
        DistanceUnit::Kilometers.to_meters(self.search_radius_km)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("geo.nearby_radius_m", self.nearby_radius_m),
            ("geo.search_radius_km", self.search_radius_km),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    message: format!("{name} must be a non-negative number, got {value}"),
                });
            }
        }
        Ok(())
    }
}

impl ServerConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the TOML is malformed or a value is out
    /// of range.
    pub fn parse(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::de::from_str(toml_str)?;
        config.geo.validate()?;
        Ok(config)
    }

    /// Loads and validates the config file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw)
    }

    /// Loads the configuration for this process.
    ///
    /// Reads the file named by [`CONFIG_PATH_ENV`] if set, otherwise the
    /// embedded defaults, then applies `BIND_ADDR` and `PORT`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the selected config cannot be loaded.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => {
                log::info!("Loading config from {path}");
                Self::load(Path::new(path.trim()))?
            }
            _ => Self::parse(DEFAULT_CONFIG)?,
        };

        if let Ok(bind_addr) = std::env::var("BIND_ADDR") {
            config.server.bind_addr = bind_addr;
        }
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            config.server.port = port;
        }

        Ok(config)
    }
}
