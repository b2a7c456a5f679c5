use crate::source::{FileType, ALPHAFOLD_HOST, ALPHAFOLD_VERSIONS, ESM_ATLAS_HOST};
use crate::uniprot::UNIPROT_REST_BASE;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Per-URL retry parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per URL (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.5 = 500ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 0.5,
            max_delay_secs: 8,
        }
    }
}

/// Global configuration loaded from `~/.config/sfetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SfetchConfig {
    /// Directory downloads are saved to; `None` = current directory.
    #[serde(default)]
    pub fetch_path: Option<PathBuf>,
    /// File type used when `--type` is not given.
    #[serde(default)]
    pub default_type: FileType,
    /// AlphaFold DB mirrors, tried in order for each model version.
    pub alphafold_hosts: Vec<String>,
    /// ESM Atlas mirrors, tried in order.
    pub esm_hosts: Vec<String>,
    /// AlphaFold model versions to try, newest first.
    pub alphafold_versions: Vec<u32>,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
    /// Fetch and save the UniProt entry text alongside AlphaFold models.
    pub uniprot_entry: bool,
    /// UniProt REST base URL (`/uniprotkb` and `/unisave` live below it).
    pub uniprot_base: String,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for SfetchConfig {
    fn default() -> Self {
        Self {
            fetch_path: None,
            default_type: FileType::Cif,
            alphafold_hosts: vec![ALPHAFOLD_HOST.to_string()],
            esm_hosts: vec![ESM_ATLAS_HOST.to_string()],
            alphafold_versions: ALPHAFOLD_VERSIONS.to_vec(),
            connect_timeout_secs: 15,
            timeout_secs: 120,
            uniprot_entry: true,
            uniprot_base: UNIPROT_REST_BASE.to_string(),
            retry: None,
        }
    }
}

impl SfetchConfig {
    /// Download directory; blank or unset means the current directory.
    pub fn resolved_fetch_path(&self) -> PathBuf {
        match &self.fetch_path {
            Some(p) if !p.as_os_str().is_empty() => p.clone(),
            _ => PathBuf::from("."),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("sfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SfetchConfig> {
    load_or_init_at(&config_path()?)
}

pub fn load_or_init_at(path: &Path) -> Result<SfetchConfig> {
    if !path.exists() {
        let default_cfg = SfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: SfetchConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
