//! Layered configuration for quire.
//!
//! Sources, lowest priority first:
//!
//! 1. Built-in defaults (`root = "data"`).
//! 2. The user configuration file, `config.toml` in the platform config
//!    directory (e.g. `~/.config/quire/config.toml`), or an explicit file
//!    given on the command-line instead. TOML, YAML and JSON are accepted,
//!    picked by file extension.
//! 3. Environment variables prefixed with `QUIRE_` (e.g. `QUIRE_ROOT`).
//! 4. Command-line [`Overrides`].

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Storage root used when nothing else is configured.
pub const DEFAULT_ROOT: &str = "data";
/// Prefix of environment variables read into the configuration.
pub const ENV_PREFIX: &str = "QUIRE_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding `index.json` and one directory per work.
    pub root: PathBuf,
}
impl Default for Config {
    fn default() -> Self {
        Self { root: PathBuf::from(DEFAULT_ROOT) }
    }
}

/// Values given on the command-line; unset fields leave lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
}

/// Location of the per-user configuration file, if the platform has a
/// configuration directory.
pub fn default_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", "quire").map(|dirs| dirs.config_dir().join("config.toml"))
}

impl Config {
    /// Loads the configuration from every layer.
    ///
    /// When `file` is given it replaces the per-user configuration file and
    /// must exist; the per-user file is optional.
    #[instrument(skip(overrides))]
    pub fn load(file: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let file = match file {
            Some(path) if !path.is_file() => exn::bail!(ErrorKind::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => default_file().filter(|path| path.is_file()),
        };
        Self::from_figment(Self::figment(file.as_deref(), overrides)?)
    }

    /// Builds the layered [`Figment`] without extracting it.
    pub fn figment(file: Option<&Path>, overrides: Overrides) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = file {
            tracing::debug!(path = %path.display(), "Reading configuration file");
            figment = match path.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => figment.merge(Toml::file(path)),
                Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
                Some("json") => figment.merge(Json::file(path)),
                _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
            };
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX)).merge(Serialized::defaults(overrides)))
    }

    fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract().map_err(|e| ErrorKind::Invalid(e.to_string()))?;
        config.validate()?;
        tracing::debug!(root = %config.root.display(), "Configuration loaded");
        Ok(config)
    }

    /// Checks values that deserialize fine but can't be used.
    pub fn validate(&self) -> Result<()> {
        if self.root.as_os_str().is_empty() {
            exn::bail!(ErrorKind::EmptyRoot);
        }
        Ok(())
    }
}
