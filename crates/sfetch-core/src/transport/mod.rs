//! Fetching raw bytes from mirror hosts.
//!
//! The orchestrator only depends on [`Fetcher`]; [`CurlFetcher`] is the
//! libcurl-backed implementation used by the CLI.

mod http;

pub use http::CurlFetcher;

use thiserror::Error;

/// How much of a body is inspected for an HTML error page.
const SNIFF_LEN: usize = 500;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid URL {0:?}")]
    InvalidUrl(String),
    #[error("{0}")]
    Curl(#[from] curl::Error),
    #[error("HTTP {0}")]
    Http(u32),
    /// Some mirrors answer missing files with 200 and an HTML page.
    #[error("server returned an HTML page instead of a structure file")]
    HtmlErrorPage,
}

/// Downloads a whole resource into memory.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, TransportError>;
}

impl<F: Fetcher + ?Sized> Fetcher for &F {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        (**self).fetch(url)
    }
}

/// True if `<html` (any case) appears in the first 500 bytes.
pub fn looks_like_html(body: &[u8]) -> bool {
    let head = &body[..body.len().min(SNIFF_LEN)];
    head.windows(5)
        .any(|w| w.eq_ignore_ascii_case(b"<html"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_error_page_detected() {
        assert!(looks_like_html(b"<!DOCTYPE html>\n<HTML><body>404</body></HTML>"));
        assert!(looks_like_html(b"  <html lang=\"en\">"));
    }

    #[test]
    fn structure_files_pass() {
        assert!(!looks_like_html(b"data_AF-Q5VSL9-F1\n#\n_entry.id AF-Q5VSL9-F1\n"));
        assert!(!looks_like_html(b"HEADER    PREDICTED MODEL\nATOM      1  N   MET A   1\n"));
        assert!(!looks_like_html(b""));
    }

    #[test]
    fn html_after_sniff_window_ignored() {
        let mut body = vec![b'A'; SNIFF_LEN];
        body.extend_from_slice(b"<html>");
        assert!(!looks_like_html(&body));
    }
}
