//! `marquee.toml` configuration.
//!
//! Every field has a default, so the file is optional. The TMDB access
//! token is never read from the file, only from `TMDB_TOKEN`.

use anyhow::{Context, Result};
use curation::{CurationPolicy, EligibilityPolicy, SweepConfig};
use provider::TmdbConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "marquee.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tmdb: TmdbConfig,
    pub catalog: CatalogSection,
    pub sessions: SessionsSection,
    pub eligibility: EligibilityPolicy,
    pub curation: CurationPolicy,
    pub sweep: SweepConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSection {
    pub data_dir: PathBuf,
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/catalog"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionsSection {
    pub dir: PathBuf,
}

impl Default for SessionsSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data/sessions"),
        }
    }
}

impl AppConfig {
    /// Load the configuration.
    ///
    /// An explicit `path` must exist. Without one, `marquee.toml` in the
    /// working directory is used if present, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        Ok(config.with_env())
    }

    fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    fn with_env(mut self) -> Self {
        self.tmdb = self.tmdb.with_token_from_env();
        self
    }
}
