use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level Plutus configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlutusConfig {
    /// I/O settings.
    #[serde(default)]
    pub io: IoConfig,

    /// Analysis toggles.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl PlutusConfig {
    /// Loads configuration from a TOML file, or returns defaults when no
    /// path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str).context("failed to parse TOML config")
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoConfig {
    /// CSV of state labels.
    pub input: Option<PathBuf>,
    /// CSV of conditioning-class labels (spatial lag classes).
    pub conditioning: Option<PathBuf>,
    /// JSON report destination.
    pub output: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Compute the stationary distribution and passage times.
    #[serde(default = "default_true")]
    pub ergodics: bool,
    /// Run homogeneity tests in the `spatial` subcommand.
    #[serde(default = "default_true")]
    pub homogeneity: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ergodics: true,
            homogeneity: true,
        }
    }
}

fn default_true() -> bool {
    true
}
