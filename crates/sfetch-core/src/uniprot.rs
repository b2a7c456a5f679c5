//! UniProt entry text for fetched AlphaFold accessions.
//!
//! The flat-file entry is asked for first; retired accessions come back
//! empty there, in which case the UniSave history is saved instead.

use crate::storage;
use crate::transport::Fetcher;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub const UNIPROT_REST_BASE: &str = "https://rest.uniprot.org";

/// Where an entry's text came from and where it was saved.
#[derive(Debug, Clone)]
pub struct EntryText {
    pub code: String,
    pub url: String,
    pub text: String,
    pub saved_to: PathBuf,
}

pub fn entry_url(base: &str, code: &str) -> String {
    format!("{}/uniprotkb/{code}.txt", base.trim_end_matches('/'))
}

pub fn unisave_url(base: &str, code: &str) -> String {
    format!("{}/unisave/{code}", base.trim_end_matches('/'))
}

/// Fetches the entry text for `code` and saves it as `<dir>/<code>.txt`.
pub fn fetch_entry<F: Fetcher + ?Sized>(
    fetcher: &F,
    base: &str,
    code: &str,
    dir: &Path,
) -> Result<EntryText> {
    let mut url = entry_url(base, code);
    let mut body = fetcher
        .fetch(&url)
        .with_context(|| format!("fetch {url}"))?;

    if body.is_empty() {
        tracing::info!("entry {} is not available in UniProtKB, trying UniSave", code);
        url = unisave_url(base, code);
        body = fetcher
            .fetch(&url)
            .with_context(|| format!("fetch {url}"))?;
    }

    let text = String::from_utf8_lossy(&body).into_owned();
    let saved_to = dir.join(format!("{code}.txt"));
    storage::save_atomic(&saved_to, text.as_bytes())?;
    tracing::debug!("saved UniProt entry {} to {}", code, saved_to.display());

    Ok(EntryText {
        code: code.to_string(),
        url,
        text,
        saved_to,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportError;
    use std::collections::HashMap;

    struct MapFetcher(HashMap<String, Vec<u8>>);

    impl Fetcher for MapFetcher {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, TransportError> {
            self.0.get(url).cloned().ok_or(TransportError::Http(404))
        }
    }

    #[test]
    fn urls() {
        assert_eq!(
            entry_url("https://rest.uniprot.org/", "P19484"),
            "https://rest.uniprot.org/uniprotkb/P19484.txt"
        );
        assert_eq!(
            unisave_url(UNIPROT_REST_BASE, "P19484"),
            "https://rest.uniprot.org/unisave/P19484"
        );
    }

    #[test]
    fn saves_entry_text() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = MapFetcher(HashMap::from([(
            entry_url(UNIPROT_REST_BASE, "P19484"),
            b"ID   TFEB_HUMAN   Reviewed;   476 AA.\n".to_vec(),
        )]));
        let entry = fetch_entry(&fetcher, UNIPROT_REST_BASE, "P19484", dir.path()).unwrap();
        assert!(entry.text.starts_with("ID   TFEB_HUMAN"));
        assert_eq!(entry.saved_to, dir.path().join("P19484.txt"));
        assert_eq!(std::fs::read_to_string(&entry.saved_to).unwrap(), entry.text);
    }

    #[test]
    fn empty_entry_falls_back_to_unisave() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = MapFetcher(HashMap::from([
            (entry_url(UNIPROT_REST_BASE, "Q00000"), Vec::new()),
            (
                unisave_url(UNIPROT_REST_BASE, "Q00000"),
                b"{\"results\": []}".to_vec(),
            ),
        ]));
        let entry = fetch_entry(&fetcher, UNIPROT_REST_BASE, "Q00000", dir.path()).unwrap();
        assert_eq!(entry.url, unisave_url(UNIPROT_REST_BASE, "Q00000"));
        assert_eq!(entry.text, "{\"results\": []}");
    }

    #[test]
    fn fetch_failure_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = MapFetcher(HashMap::new());
        assert!(fetch_entry(&fetcher, UNIPROT_REST_BASE, "P19484", dir.path()).is_err());
        assert!(!dir.path().join("P19484.txt").exists());
    }
}
