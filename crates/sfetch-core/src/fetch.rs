//! Batch fetch: normalize codes, download the first available model, save it
//! and hand it to the host.
//!
//! Each code in a batch succeeds or fails on its own; a bad token or an
//! exhausted mirror list is recorded in the report and the batch continues.

use crate::accession::{self, AccessionError};
use crate::checksum;
use crate::config::SfetchConfig;
use crate::naming;
use crate::scene::{Host, LoadSummary, SceneError};
use crate::source::{self, Candidate, FileType, Source};
use crate::storage;
use crate::transport::Fetcher;
use crate::uniprot;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Options shared by every code in a batch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub source: Source,
    pub file_type: FileType,
    /// Object name for every code; `None` names each object after its code.
    pub name: Option<String>,
    /// Directory downloads are saved to.
    pub path: PathBuf,
    /// `None` = decide per batch, see [`resolve_discrete`].
    pub discrete: Option<bool>,
    pub hosts: Vec<String>,
    pub versions: Vec<u32>,
    /// UniProt REST base; `Some` saves the entry text for AlphaFold codes.
    pub uniprot_base: Option<String>,
}

impl FetchOptions {
    /// Options for `source` with hosts, versions, type and path from config.
    pub fn from_config(source: Source, cfg: &SfetchConfig) -> Self {
        let (hosts, uniprot_base) = match source {
            Source::AlphaFold => (
                cfg.alphafold_hosts.clone(),
                cfg.uniprot_entry.then(|| cfg.uniprot_base.clone()),
            ),
            Source::EsmAtlas => (cfg.esm_hosts.clone(), None),
        };
        Self {
            source,
            file_type: cfg.default_type,
            name: None,
            path: cfg.resolved_fetch_path(),
            discrete: None,
            hosts,
            versions: cfg.alphafold_versions.clone(),
            uniprot_base,
        }
    }
}

/// Whether models are loaded as extra states of an existing object.
///
/// An explicit choice wins. Otherwise several codes loaded under one
/// caller-supplied name become states of that object.
pub fn resolve_discrete(explicit: Option<bool>, name: Option<&str>, batch_len: usize) -> bool {
    explicit.unwrap_or_else(|| {
        let named = name.map_or(false, |n| !n.trim().is_empty());
        named && batch_len > 1
    })
}

/// One failed download URL.
#[derive(Debug, Clone, Serialize)]
pub struct Attempt {
    pub url: String,
    pub error: String,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    NotFound(#[from] AccessionError),
    #[error("unable to fetch '{code}': {} source(s) tried", .attempts.len())]
    Exhausted { code: String, attempts: Vec<Attempt> },
    #[error("unable to load '{code}': {source}")]
    Load {
        code: String,
        #[source]
        source: SceneError,
    },
}

impl FetchError {
    pub fn attempts(&self) -> &[Attempt] {
        match self {
            FetchError::Exhausted { attempts, .. } => attempts,
            _ => &[],
        }
    }
}

/// A model that made it into the scene.
#[derive(Debug, Clone, Serialize)]
pub struct Fetched {
    pub code: String,
    #[serde(flatten)]
    pub load: LoadSummary,
    /// URL the model came from; `None` when a saved copy was reused.
    pub url: Option<String>,
    /// Saved file; `None` when saving failed and the model was loaded from memory.
    pub file: Option<PathBuf>,
    pub sha256: String,
    pub cached: bool,
    /// AlphaFold model version of the loaded file; `None` for ESM Atlas.
    pub version: Option<u32>,
    /// Mirrors/versions that failed before the one that worked.
    pub skipped: Vec<Attempt>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ItemStatus {
    Loaded(Fetched),
    Failed {
        error: String,
        attempts: Vec<Attempt>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct UniprotSaved {
    pub saved_to: PathBuf,
    #[serde(skip)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemOutcome {
    pub token: String,
    pub code: Option<String>,
    #[serde(flatten)]
    pub status: ItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uniprot: Option<UniprotSaved>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub discrete: bool,
    pub items: Vec<ItemOutcome>,
}

impl BatchReport {
    pub fn loaded(&self) -> impl Iterator<Item = &Fetched> {
        self.items.iter().filter_map(|i| match &i.status {
            ItemStatus::Loaded(f) => Some(f),
            ItemStatus::Failed { .. } => None,
        })
    }

    pub fn failed_count(&self) -> usize {
        self.items.len() - self.loaded().count()
    }

    /// True when there was something to fetch and nothing loaded.
    pub fn all_failed(&self) -> bool {
        !self.items.is_empty() && self.loaded().next().is_none()
    }
}

/// Code used to build URLs for `token`.
pub fn resolve_code(source: Source, token: &str) -> Result<String, AccessionError> {
    if source.normalizes_codes() {
        accession::extract_accession(token).map(|a| a.into_string())
    } else if token.is_empty() {
        Err(AccessionError::NotFound(String::new()))
    } else {
        Ok(token.to_string())
    }
}

/// Fetches every whitespace-separated code in `codes`.
pub fn fetch_batch<F, H>(codes: &str, opts: &FetchOptions, fetcher: &F, host: &mut H) -> BatchReport
where
    F: Fetcher + ?Sized,
    H: Host + ?Sized,
{
    let tokens: Vec<&str> = codes.split_whitespace().collect();
    let discrete = resolve_discrete(opts.discrete, opts.name.as_deref(), tokens.len());
    tracing::info!(
        "fetching {} code(s) from {} (type {}, discrete {})",
        tokens.len(),
        opts.source.label(),
        opts.file_type,
        discrete
    );

    let mut report = BatchReport {
        discrete,
        items: Vec::with_capacity(tokens.len()),
    };

    for token in tokens {
        let code = resolve_code(opts.source, token);
        let uniprot = match (&code, &opts.uniprot_base) {
            (Ok(code), Some(base)) if opts.source == Source::AlphaFold => {
                save_uniprot_entry(fetcher, base, code, &opts.path)
            }
            _ => None,
        };

        let result = match &code {
            Ok(code) => fetch_one(code, opts, discrete, fetcher, host),
            Err(e) => Err(FetchError::NotFound(e.clone())),
        };

        let status = match result {
            Ok(fetched) => ItemStatus::Loaded(fetched),
            Err(e) => {
                tracing::warn!("{}: {}", token, e);
                ItemStatus::Failed {
                    error: e.to_string(),
                    attempts: e.attempts().to_vec(),
                }
            }
        };
        report.items.push(ItemOutcome {
            token: token.to_string(),
            code: code.ok(),
            status,
            uniprot,
        });
    }

    report
}

fn save_uniprot_entry<F: Fetcher + ?Sized>(
    fetcher: &F,
    base: &str,
    code: &str,
    dir: &Path,
) -> Option<UniprotSaved> {
    match uniprot::fetch_entry(fetcher, base, code, dir) {
        Ok(entry) => Some(UniprotSaved {
            saved_to: entry.saved_to,
            text: entry.text,
        }),
        Err(e) => {
            tracing::warn!("UniProt entry for {}: {:#}", code, e);
            None
        }
    }
}

/// Fetches one already-normalized code.
///
/// A saved copy of any candidate file is reused without touching the network.
/// Otherwise candidates are downloaded in order until one succeeds.
pub fn fetch_one<F, H>(
    code: &str,
    opts: &FetchOptions,
    discrete: bool,
    fetcher: &F,
    host: &mut H,
) -> Result<Fetched, FetchError>
where
    F: Fetcher + ?Sized,
    H: Host + ?Sized,
{
    let object = host.legal_name(&naming::object_name(code, opts.name.as_deref()));
    let candidates = source::candidate_urls(
        opts.source,
        code,
        opts.file_type,
        &opts.hosts,
        &opts.versions,
    );

    let load_err = |source| FetchError::Load {
        code: code.to_string(),
        source,
    };

    if let Some(file) =
        storage::find_existing(&opts.path, candidates.iter().map(|c| c.file_name.as_str()))
    {
        tracing::info!("{}: using saved {}", code, file.display());
        let load = host
            .load_file(&file, &object, opts.file_type, discrete)
            .map_err(load_err)?;
        let sha256 = match checksum::sha256_path(&file) {
            Ok(sum) => sum,
            Err(e) => {
                tracing::warn!("cannot checksum {}: {:#}", file.display(), e);
                String::new()
            }
        };
        let version = file
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| candidates.iter().find(|c| c.file_name == n))
            .and_then(|c| c.version);
        return Ok(Fetched {
            code: code.to_string(),
            load,
            url: None,
            file: Some(file),
            sha256,
            cached: true,
            version,
            skipped: Vec::new(),
        });
    }

    let mut attempts = Vec::new();
    for candidate in &candidates {
        let body = match fetcher.fetch(&candidate.url) {
            Ok(body) if body.is_empty() => {
                attempts.push(attempt(candidate, "empty response body"));
                continue;
            }
            Ok(body) => body,
            Err(e) => {
                tracing::debug!("failed to fetch from {}: {}", candidate.url, e);
                attempts.push(attempt(candidate, &e.to_string()));
                continue;
            }
        };

        let file = opts.path.join(&candidate.file_name);
        let (load, file) = match storage::save_atomic(&file, &body) {
            Ok(()) => (host.load_file(&file, &object, opts.file_type, discrete), Some(file)),
            Err(e) => {
                tracing::warn!("cannot write {}: {:#}; loading from memory", file.display(), e);
                (host.load_bytes(&body, &object, opts.file_type, discrete), None)
            }
        };
        let load = load.map_err(load_err)?;

        tracing::info!("{}: loaded {} as '{}'", code, candidate.url, load.object);
        return Ok(Fetched {
            code: code.to_string(),
            load,
            url: Some(candidate.url.clone()),
            file,
            sha256: checksum::sha256_bytes(&body),
            cached: false,
            version: candidate.version,
            skipped: attempts,
        });
    }

    Err(FetchError::Exhausted {
        code: code.to_string(),
        attempts,
    })
}

fn attempt(candidate: &Candidate, error: &str) -> Attempt {
    Attempt {
        url: candidate.url.clone(),
        error: error.to_string(),
    }
}
