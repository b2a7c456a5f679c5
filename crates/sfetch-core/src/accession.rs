//! Accession extraction from loosely-structured identifiers.
//!
//! Users hand us bare UniProt codes, AlphaFold model file names, RCSB copies
//! of AlphaFold entries, or whole download URLs. Each form is reduced here to
//! the accession that download URLs are built from.

use std::fmt;
use thiserror::Error;

/// RCSB mirrors AlphaFold entries as `AF_AF<accession>F1`.
const RCSB_PREFIX: &str = "AF_AF";
const RCSB_SUFFIX: &str = "F1";
/// AlphaFold DB model file names: `AF-<accession>-F1-model_v<N>.<ext>`.
const AFDB_PREFIX: &str = "AF-";

/// Shortest accepted accession (a PDB code). Anything shorter is a fragment.
pub const MIN_ACCESSION_LEN: usize = 4;

/// The only normalization failure: the token holds no recognizable accession.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessionError {
    #[error("no accession found in {0:?}")]
    NotFound(String),
}

/// Canonical accession: ASCII upper-case letters and digits only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Accession(String);

impl Accession {
    /// Validates `raw` as a canonical accession.
    ///
    /// Outputs shorter than [`MIN_ACCESSION_LEN`] are rejected even when they
    /// are clean upper-case alphanumerics, so `"AF"`, `"ABC"` or the `"X"`
    /// body of `AF_AFXF1` are `NotFound`.
    pub fn new(raw: impl Into<String>) -> Result<Self, AccessionError> {
        let raw = raw.into();
        let well_formed = raw.len() >= MIN_ACCESSION_LEN
            && raw
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
        if well_formed {
            Ok(Self(raw))
        } else {
            Err(AccessionError::NotFound(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Accession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Accession {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Extraction strategies, in the order they are tried.
///
/// `AfdbModel` and `DashComposite` are exclusive: a token with the `AF-`
/// prefix is never re-read as a generic dash composite, even when the
/// AlphaFold shape check fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// `AF_AFA0A009IHW8F1` (RCSB copy of an AlphaFold entry).
    RcsbCopy,
    /// `AF-Q5VSL9-F1-model_v6.cif` (AlphaFold DB model file name).
    AfdbModel,
    /// Any other dash-delimited name; first 5 or 10 character code wins.
    DashComposite,
    /// No dash: keep only upper-case letters and digits.
    Bare,
}

impl Strategy {
    /// Picks the strategy for a non-URL token.
    pub fn select(token: &str) -> Self {
        if token.starts_with(RCSB_PREFIX) && token.ends_with(RCSB_SUFFIX) {
            Strategy::RcsbCopy
        } else if token.starts_with(AFDB_PREFIX) {
            Strategy::AfdbModel
        } else if token.contains('-') {
            Strategy::DashComposite
        } else {
            Strategy::Bare
        }
    }

    /// Runs this strategy on `token`. `None` means the token did not fit.
    pub fn apply(self, token: &str) -> Option<String> {
        match self {
            Strategy::RcsbCopy => Some(rcsb_copy_body(token).to_string()),
            Strategy::AfdbModel => afdb_model_accession(token).map(str::to_string),
            Strategy::DashComposite => token
                .split('-')
                .map(|seg| seg.split_once('.').map_or(seg, |(head, _)| head))
                .find(|seg| is_composite_code(seg))
                .map(str::to_string),
            Strategy::Bare => Some(
                token
                    .chars()
                    .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
                    .collect(),
            ),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::RcsbCopy => "rcsb-copy",
            Strategy::AfdbModel => "afdb-model",
            Strategy::DashComposite => "dash-composite",
            Strategy::Bare => "bare",
        }
    }
}

/// Text between the RCSB prefix and suffix; empty when the two overlap.
fn rcsb_copy_body(token: &str) -> &str {
    let end = token.len().saturating_sub(RCSB_SUFFIX.len());
    token.get(RCSB_PREFIX.len()..end).unwrap_or("")
}

fn afdb_model_accession(token: &str) -> Option<&str> {
    let parts: Vec<&str> = token.split('-').collect();
    match parts.as_slice() {
        ["AF", code, "F1", model, ..] if model.split('_').next() == Some("model") => Some(*code),
        _ => None,
    }
}

/// 5 or 10 characters; once digits are removed, only upper-case letters remain.
fn is_composite_code(seg: &str) -> bool {
    (seg.len() == 5 || seg.len() == 10)
        && seg
            .chars()
            .filter(|c| !c.is_ascii_digit())
            .all(|c| c.is_ascii_uppercase())
}

/// Raw strategy output for a non-URL token.
///
/// The `Bare` strategy can return an empty string; callers that need a usable
/// code go through [`extract_accession`].
pub fn parse_id(token: &str) -> Option<String> {
    let strategy = Strategy::select(token);
    let out = strategy.apply(token);
    tracing::debug!(token, strategy = strategy.name(), result = ?out, "parse_id");
    out
}

/// Extracts the accession from a bare code, a composite file name or a URL.
///
/// For URLs the first path segment carrying an upper-case letter is taken
/// (host names and scheme are lower case) and parsed with [`parse_id`].
///
/// ```
/// use sfetch_core::accession::extract_accession;
///
/// let acc = extract_accession("AF-Q5VSL9-F1-model_v6.cif").unwrap();
/// assert_eq!(acc.as_str(), "Q5VSL9");
/// assert!(extract_accession("abc-def-ghijk").is_err());
/// ```
pub fn extract_accession(token: &str) -> Result<Accession, AccessionError> {
    let raw = if token.contains("://") {
        token
            .split('/')
            .find(|seg| seg.chars().any(|c| c.is_ascii_uppercase()))
            .and_then(parse_id)
    } else {
        parse_id(token)
    };

    raw.and_then(|r| Accession::new(r).ok())
        .ok_or_else(|| AccessionError::NotFound(token.to_string()))
}

/// Splits on `-` or `/` and returns the middle segment (index `count / 2`)
/// when there are at least three, otherwise the last one.
pub fn extract_middle_token(token: &str) -> &str {
    let parts: Vec<&str> = token.split(|c| c == '-' || c == '/').collect();
    if parts.len() >= 3 {
        parts[parts.len() / 2]
    } else {
        parts.last().copied().unwrap_or(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acc(token: &str) -> Option<String> {
        extract_accession(token).ok().map(Accession::into_string)
    }

    #[test]
    fn rcsb_copy() {
        assert_eq!(acc("AF_AFA0A009IHW8F1").as_deref(), Some("A0A009IHW8"));
        assert_eq!(Strategy::select("AF_AFA0A009IHW8F1"), Strategy::RcsbCopy);
    }

    #[test]
    fn afdb_model_file_names() {
        assert_eq!(acc("AF-Q5VSL9-F1-model_v6.cif").as_deref(), Some("Q5VSL9"));
        assert_eq!(acc("AF-Q5VSL9-F1-model_v6").as_deref(), Some("Q5VSL9"));
        assert_eq!(acc("AF-P19484-F1-model_v4.pdb").as_deref(), Some("P19484"));
    }

    #[test]
    fn url_takes_first_upper_case_segment() {
        assert_eq!(
            acc("https://alphafold.ebi.ac.uk/files/AF-Q5VSL9-F1-model_v4.pdb").as_deref(),
            Some("Q5VSL9")
        );
        assert_eq!(
            acc("https://rest.uniprot.org/uniprotkb/P19484.txt").as_deref(),
            Some("P19484")
        );
    }

    #[test]
    fn url_without_upper_case_segment_is_not_found() {
        assert_eq!(
            extract_accession("https://example.org/files/model.cif"),
            Err(AccessionError::NotFound(
                "https://example.org/files/model.cif".to_string()
            ))
        );
    }

    #[test]
    fn bare_code_kept() {
        assert_eq!(acc("P19484").as_deref(), Some("P19484"));
        assert_eq!(acc("A0A009IHW8").as_deref(), Some("A0A009IHW8"));
    }

    #[test]
    fn bare_code_strips_noise() {
        assert_eq!(acc(" P19484.txt").as_deref(), Some("P19484"));
        assert_eq!(acc("uniprot:Q5VSL9").as_deref(), Some("Q5VSL9"));
    }

    #[test]
    fn bare_code_strips_non_ascii() {
        assert_eq!(acc("P19É484").as_deref(), Some("P19484"));
        assert_eq!(parse_id("ÄQ5VSL9ß").as_deref(), Some("Q5VSL9"));
    }

    #[test]
    fn canonical_accessions_are_fixed_points() {
        for a in ["P19484", "Q5VSL9", "A0A009IHW8", "1ABC", "MGYP000911143359"] {
            assert_eq!(acc(a).as_deref(), Some(a), "{a}");
        }
    }

    #[test]
    fn dash_composite_without_candidate() {
        assert!(extract_accession("abc-def-ghijk").is_err());
        assert_eq!(Strategy::select("abc-def-ghijk"), Strategy::DashComposite);
    }

    #[test]
    fn dash_composite_picks_first_qualifying_segment() {
        assert_eq!(acc("run-Q5VS1-P12345.pdb").as_deref(), Some("Q5VS1"));
        assert_eq!(acc("model-A0A009IHW8.cif").as_deref(), Some("A0A009IHW8"));
        // length 6 never qualifies
        assert!(extract_accession("model-P19484.cif").is_err());
    }

    #[test]
    fn dash_composite_rejects_lower_case_and_unicode() {
        assert!(extract_accession("x-q5vs1").is_err());
        assert!(extract_accession("x-ÄBCD").is_err());
    }

    #[test]
    fn malformed_afdb_prefix_does_not_fall_through() {
        // "Q5VS1" would qualify as a dash composite, but AF- tokens never get there.
        assert!(extract_accession("AF-Q5VS1-F2-model_v4").is_err());
        assert!(extract_accession("AF-Q5VSL9").is_err());
        assert!(extract_accession("AF-Q5VSL9-F1-summary_v4.json").is_err());
        assert_eq!(Strategy::AfdbModel.apply("AF-Q5VSL9-F1"), None);
    }

    #[test]
    fn short_tokens_do_not_panic() {
        for t in ["", "A", "AF", "AF_", "AF_AF", "AF_AF1", "F1", "-", "://"] {
            let _ = extract_accession(t);
        }
        assert!(extract_accession("AF").is_err());
        assert!(extract_accession("").is_err());
    }

    #[test]
    fn overlapping_rcsb_markers_yield_nothing() {
        assert_eq!(Strategy::select("AF_AF1"), Strategy::RcsbCopy);
        assert_eq!(parse_id("AF_AF1").as_deref(), Some(""));
        assert!(extract_accession("AF_AF1").is_err());
        assert_eq!(parse_id("AF_AFF1").as_deref(), Some(""));
        assert!(extract_accession("AF_AFF1").is_err());
    }

    #[test]
    fn short_clean_outputs_rejected() {
        assert_eq!(parse_id("ABC").as_deref(), Some("ABC"));
        assert!(extract_accession("ABC").is_err());
        assert_eq!(parse_id("AF_AFXF1").as_deref(), Some("X"));
        assert!(extract_accession("AF_AFXF1").is_err());
    }

    #[test]
    fn bare_strategy_can_yield_empty() {
        assert_eq!(parse_id("lowercase").as_deref(), Some(""));
        assert!(extract_accession("lowercase").is_err());
    }

    #[test]
    fn middle_token() {
        assert_eq!(extract_middle_token("a-b-c"), "b");
        assert_eq!(extract_middle_token("a-b-c-d"), "c");
        assert_eq!(extract_middle_token("solo"), "solo");
        assert_eq!(extract_middle_token("left/right"), "right");
        assert_eq!(extract_middle_token("AF-Q5VSL9-F1-model_v6"), "F1");
        assert_eq!(extract_middle_token(""), "");
    }
}
