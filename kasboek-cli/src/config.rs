use anyhow::{Context, Result, bail};
use kasboek_banks::ProfileRegistry;
use kasboek_core::{BankProfile, ZeroSumPolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "kasboek.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsSection,
    #[serde(default)]
    pub aggregate: AggregateSection,
    /// Extra profiles; a name matching a built-in replaces it.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub banks: Vec<BankProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsSection {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateSection {
    #[serde(default)]
    pub zero_sum: ZeroSumPolicy,
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            results_dir: default_results_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

impl Config {
    /// Built-in profiles with this config's `[[banks]]` applied on top.
    pub fn registry(&self) -> Result<ProfileRegistry> {
        let mut registry = ProfileRegistry::builtin();
        for bank in &self.banks {
            registry
                .insert(bank.clone())
                .with_context(|| format!("bank profile {:?}", bank.name))?;
        }
        Ok(registry)
    }
}

/// Load `explicit` (which must exist), else `./kasboek.toml` if present,
/// else defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(p) => {
            if !p.exists() {
                bail!("config not found: {}", p.display());
            }
            p.to_path_buf()
        }
        None => {
            let p = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !p.exists() {
                return Ok(Config::default());
            }
            p
        }
    };

    let s = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg = toml::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    log::debug!("loaded config from {}", path.display());
    Ok(cfg)
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Write the default config unless one already exists.
pub fn init_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config(path, &Config::default())?;
    Ok(true)
}
