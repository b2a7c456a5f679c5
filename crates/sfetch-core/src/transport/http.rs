//! libcurl GET into memory.

use super::{looks_like_html, Fetcher, TransportError};
use crate::config::SfetchConfig;
use crate::retry::{self, RetryPolicy};
use std::time::Duration;

const USER_AGENT: &str = concat!("sfetch/", env!("CARGO_PKG_VERSION"));

/// Blocking curl fetcher. Call from `spawn_blocking` if used from async code.
#[derive(Debug, Clone)]
pub struct CurlFetcher {
    connect_timeout: Duration,
    timeout: Duration,
    retry: RetryPolicy,
}

impl CurlFetcher {
    pub fn new(connect_timeout: Duration, timeout: Duration, retry: RetryPolicy) -> Self {
        Self {
            connect_timeout,
            timeout,
            retry,
        }
    }

    pub fn from_config(cfg: &SfetchConfig) -> Self {
        Self::new(
            Duration::from_secs(cfg.connect_timeout_secs),
            Duration::from_secs(cfg.timeout_secs),
            cfg.retry
                .as_ref()
                .map(RetryPolicy::from_config)
                .unwrap_or_default(),
        )
    }

    fn get_once(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let parsed =
            url::Url::parse(url).map_err(|_| TransportError::InvalidUrl(url.to_string()))?;
        let is_http = matches!(parsed.scheme(), "http" | "https");

        let mut body = Vec::new();
        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.useragent(USER_AGENT)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        // FTP mirrors report FTP reply codes here; only HTTP is checked.
        if is_http {
            let code = easy.response_code()?;
            if !(200..300).contains(&code) {
                return Err(TransportError::Http(code));
            }
        }

        if looks_like_html(&body) {
            return Err(TransportError::HtmlErrorPage);
        }
        Ok(body)
    }
}

impl Fetcher for CurlFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        tracing::debug!("GET {}", url);
        retry::run_with_retry(&self.retry, || self.get_once(url))
    }
}
