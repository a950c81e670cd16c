//! Configuration file support.
//!
//! Two locations are read:
//! - Global: `~/.qtprobe/config.toml` - user-wide defaults
//! - Project: `.qtprobe/config.toml` - overrides for the current directory
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const CONFIG_DIR: &str = ".qtprobe";
const CONFIG_FILE: &str = "config.toml";

/// Probe configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub probe: ProbeConfig,
}

/// Settings for locating and probing installations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ProbeConfig {
    /// Query executables to probe when none is given on the command line.
    pub qmake: Vec<PathBuf>,

    /// Base names searched for in `PATH`.
    pub executable_names: Vec<String>,

    /// Resolve the ABIs of a multi-ABI installation on a thread pool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel_abis: Option<bool>,

    /// Only resolve these ABIs of a multi-ABI installation.
    pub abis: Vec<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            qmake: Vec::new(),
            executable_names: default_executable_names(),
            parallel_abis: None,
            abis: Vec::new(),
        }
    }
}

fn default_executable_names() -> Vec<String> {
    vec!["qmake".to_string()]
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration, falling back to defaults if the file is missing
    /// or broken.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if !other.probe.qmake.is_empty() {
            self.probe.qmake = other.probe.qmake;
        }
        if other.probe.executable_names != default_executable_names() {
            self.probe.executable_names = other.probe.executable_names;
        }
        if other.probe.parallel_abis.is_some() {
            self.probe.parallel_abis = other.probe.parallel_abis;
        }
        if !other.probe.abis.is_empty() {
            self.probe.abis = other.probe.abis;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.qtprobe/config.toml)
/// 2. Global config (~/.qtprobe/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path.filter(|p| p.exists()) {
        config.merge(Config::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// `~/.qtprobe`
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(CONFIG_DIR))
}

pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join(CONFIG_FILE))
}

pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR).join(CONFIG_FILE)
}
