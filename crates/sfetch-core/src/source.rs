//! Predicted-structure repositories and their URL templates.

use crate::naming;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const ALPHAFOLD_HOST: &str = "https://alphafold.ebi.ac.uk/files";
pub const ESM_ATLAS_HOST: &str = "https://api.esmatlas.com/fetchPredictedStructure";

/// AlphaFold DB model versions, newest first.
pub const ALPHAFOLD_VERSIONS: [u32; 6] = [6, 5, 4, 3, 2, 1];

/// Where a structure model is fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    AlphaFold,
    EsmAtlas,
}

impl Source {
    pub fn label(self) -> &'static str {
        match self {
            Source::AlphaFold => "AlphaFold DB",
            Source::EsmAtlas => "ESM Atlas",
        }
    }

    /// AlphaFold codes are reduced to an accession first; ESM Atlas
    /// (MGnify) identifiers are used as given.
    pub fn normalizes_codes(self) -> bool {
        matches!(self, Source::AlphaFold)
    }
}

/// Structure file format requested from the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Pdb,
    #[default]
    Cif,
}

impl FileType {
    pub fn extension(self) -> &'static str {
        match self {
            FileType::Pdb => "pdb",
            FileType::Cif => "cif",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdb" => Ok(FileType::Pdb),
            "cif" | "mmcif" => Ok(FileType::Cif),
            other => Err(format!("unsupported file type '{other}' (expected pdb or cif)")),
        }
    }
}

/// One download attempt: URL plus the local file name it is saved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub url: String,
    pub file_name: String,
    /// AlphaFold model version; `None` for unversioned sources.
    pub version: Option<u32>,
}

/// Builds the ordered list of download attempts for `code`.
///
/// Versions are the outer loop, mirror hosts the inner one, so every mirror
/// is asked for the newest model before any older version is tried.
pub fn candidate_urls(
    source: Source,
    code: &str,
    file_type: FileType,
    hosts: &[String],
    versions: &[u32],
) -> Vec<Candidate> {
    let ext = file_type.extension();
    let hosts: Vec<&str> = hosts.iter().map(|h| h.trim().trim_end_matches('/')).collect();

    let mut out = Vec::new();
    match source {
        Source::AlphaFold => {
            for &version in versions {
                let file_name = format!("AF-{code}-F1-model_v{version}.{ext}");
                for host in &hosts {
                    out.push(candidate(format!("{host}/{file_name}"), &file_name, Some(version)));
                }
            }
        }
        Source::EsmAtlas => {
            let file_name = format!("{code}.{ext}");
            for host in &hosts {
                out.push(candidate(format!("{host}/{file_name}"), &file_name, None));
            }
        }
    }
    out
}

fn candidate(url: String, fallback_name: &str, version: Option<u32>) -> Candidate {
    let file_name =
        naming::file_name_from_url(&url).unwrap_or_else(|| fallback_name.to_string());
    Candidate {
        url,
        file_name,
        version,
    }
}
