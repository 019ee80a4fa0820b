//! # Configuration State
//!
//! Resolved once at startup, read-only afterwards.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command line flags (`--db`, `--output-dir`, `--assets`, `--format`, `--ephemeral`)
//! 2. Environment variables (`COTIZADOR_*`)
//! 3. Config file (`--config <path>` or `config.toml` in the platform config dir)
//! 4. Defaults (this file)
//!
//! ## Config File
//! ```toml
//! [paths]
//! database = "/var/lib/cotizador/cotizador.db"
//! output_dir = "cotizaciones"
//! asset_dir = "assets"
//! format = "pdf"
//!
//! [currency]
//! symbol = "$"
//! decimals = 0
//!
//! [company]
//! name = "AUTOROSEMBERG"
//! logo = "LOGO.jpg"
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use cotizador_core::{CompanyProfile, CurrencyFormat};
use cotizador_render::RenderFormat;

pub const ENV_DB_PATH: &str = "COTIZADOR_DB_PATH";
pub const ENV_OUTPUT_DIR: &str = "COTIZADOR_OUTPUT_DIR";
pub const ENV_ASSET_DIR: &str = "COTIZADOR_ASSET_DIR";
pub const ENV_FORMAT: &str = "COTIZADOR_FORMAT";

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DATABASE_FILE_NAME: &str = "cotizador.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {origin}: {message}")]
    InvalidValue { origin: String, message: String },
}

// =============================================================================
// File Layer
// =============================================================================

/// Contents of `config.toml`. Every section and key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub paths: PathsSection,
    pub currency: Option<CurrencyFormat>,
    pub company: Option<CompanyProfile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PathsSection {
    pub database: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub asset_dir: Option<PathBuf>,
    pub format: Option<String>,
}

impl ConfigFile {
    /// Parses a config file. A missing file is only an error when `required`.
    pub fn read(path: &Path, required: bool) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
                debug!(path = %path.display(), "No config file");
                return Ok(ConfigFile::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

// =============================================================================
// Flag Layer
// =============================================================================

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub database: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub asset_dir: Option<PathBuf>,
    pub format: Option<RenderFormat>,
    /// Keep the counter in memory for this run only.
    pub ephemeral: bool,
}

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Where the quotation counter lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum CounterStorage {
    File(PathBuf),
    /// Nothing persists past the process.
    Memory,
}

/// Application configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigState {
    pub storage: CounterStorage,
    pub output_dir: PathBuf,
    pub asset_dir: PathBuf,
    pub format: RenderFormat,
    pub currency: CurrencyFormat,
    pub company: CompanyProfile,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            storage: CounterStorage::File(PathBuf::from(DATABASE_FILE_NAME)),
            output_dir: PathBuf::from("."),
            asset_dir: PathBuf::from("assets"),
            format: RenderFormat::Pdf,
            currency: CurrencyFormat::default(),
            company: CompanyProfile::default(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("co", "autorosemberg", "cotizador")
}

impl ConfigState {
    /// Resolves configuration from the real environment and filesystem.
    pub fn load(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let dirs = project_dirs();

        let file = match &overrides.config_file {
            Some(path) => ConfigFile::read(path, true)?,
            None => match &dirs {
                Some(dirs) => ConfigFile::read(&dirs.config_dir().join(CONFIG_FILE_NAME), false)?,
                None => ConfigFile::default(),
            },
        };

        let default_db = dirs
            .as_ref()
            .map(|d| d.data_dir().join(DATABASE_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE_NAME));

        ConfigState::resolve(file, |key| std::env::var(key).ok(), overrides, default_db)
    }

    /// Merges the layers. `env` looks up an environment variable.
    pub fn resolve(
        file: ConfigFile,
        env: impl Fn(&str) -> Option<String>,
        overrides: &ConfigOverrides,
        default_db: PathBuf,
    ) -> Result<Self, ConfigError> {
        let defaults = ConfigState::default();
        let env_path = |key: &str| env(key).filter(|v| !v.trim().is_empty()).map(PathBuf::from);

        let storage = if overrides.ephemeral {
            CounterStorage::Memory
        } else {
            let path = overrides
                .database
                .clone()
                .or_else(|| env_path(ENV_DB_PATH))
                .or(file.paths.database)
                .unwrap_or(default_db);
            CounterStorage::File(path)
        };

        let output_dir = overrides
            .output_dir
            .clone()
            .or_else(|| env_path(ENV_OUTPUT_DIR))
            .or(file.paths.output_dir)
            .unwrap_or(defaults.output_dir);

        let asset_dir = overrides
            .asset_dir
            .clone()
            .or_else(|| env_path(ENV_ASSET_DIR))
            .or(file.paths.asset_dir)
            .unwrap_or(defaults.asset_dir);

        let format = match overrides.format {
            Some(format) => format,
            None => match env(ENV_FORMAT).filter(|v| !v.trim().is_empty()) {
                Some(raw) => parse_format(&raw, ENV_FORMAT)?,
                None => match file.paths.format {
                    Some(raw) => parse_format(&raw, "[paths].format")?,
                    None => defaults.format,
                },
            },
        };

        let config = ConfigState {
            storage,
            output_dir,
            asset_dir,
            format,
            currency: file.currency.unwrap_or(defaults.currency),
            company: file.company.unwrap_or(defaults.company),
        };

        debug!(storage = ?config.storage, format = %config.format, "Configuration resolved");
        Ok(config)
    }
}

fn parse_format(raw: &str, origin: &str) -> Result<RenderFormat, ConfigError> {
    raw.parse().map_err(|e: cotizador_render::RenderError| ConfigError::InvalidValue {
        origin: origin.to_string(),
        message: e.to_string(),
    })
}
