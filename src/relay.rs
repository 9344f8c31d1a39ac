//! Same-origin access to remote documents.
//!
//! [`rewrite`] attaches `/proxy` and `/download` links to each descriptor
//! after aggregation; [`RelayPolicy`] and [`open`] serve those links by
//! streaming the upstream body back to the browser.

use axum::body::Bytes;
use futures::stream::{BoxStream, StreamExt};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use url::{form_urlencoded, Url};

use crate::document::DocumentDescriptor;
use crate::error::{FilingsError, Result};
use crate::utils::rate_limit::RateLimiter;

pub const PROXY_PATH: &str = "/proxy";
pub const DOWNLOAD_PATH: &str = "/download";

pub fn proxy_url(source: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("url", source)
        .finish();
    format!("{}?{}", PROXY_PATH, query)
}

pub fn download_url(source: &str, filename: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("url", source)
        .append_pair("filename", filename)
        .finish();
    format!("{}?{}", DOWNLOAD_PATH, query)
}

/// Adds relay links in place. Names, order and source URLs are untouched.
pub fn rewrite(documents: &mut [DocumentDescriptor]) {
    for doc in documents.iter_mut() {
        doc.proxy_url = Some(proxy_url(&doc.url));
        doc.download_url = Some(download_url(&doc.url, &doc.name));
    }
}

/// Which upstream hosts the relay may fetch from.
#[derive(Debug, Clone)]
pub struct RelayPolicy {
    allowed_hosts: Vec<String>,
}

impl RelayPolicy {
    /// An empty list or a `*` entry allows any host.
    pub fn new(allowed_hosts: Vec<String>) -> Self {
        Self {
            allowed_hosts: allowed_hosts
                .into_iter()
                .map(|h| h.trim().to_ascii_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
        }
    }

    /// Extends the allowlist. A policy that already allows any host is left
    /// as is.
    pub fn allow_hosts<I>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        if self.allows_any() {
            return self;
        }
        for host in hosts {
            let host = host.trim().to_ascii_lowercase();
            if !host.is_empty() && !self.allowed_hosts.contains(&host) {
                self.allowed_hosts.push(host);
            }
        }
        self
    }

    fn allows_any(&self) -> bool {
        self.allowed_hosts.is_empty() || self.allowed_hosts.iter().any(|h| h == "*")
    }

    pub fn validate(&self, raw: &str) -> Result<Url> {
        let url = Url::parse(raw)
            .map_err(|e| FilingsError::InvalidInput(format!("invalid url {:?}: {}", raw, e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(FilingsError::InvalidInput(format!(
                "unsupported scheme: {}",
                url.scheme()
            )));
        }
        let host = url
            .host_str()
            .ok_or_else(|| FilingsError::InvalidInput(format!("url has no host: {}", raw)))?
            .to_ascii_lowercase();
        if !self.allows_any() && !self.allowed_hosts.contains(&host) {
            return Err(FilingsError::InvalidInput(format!(
                "host not allowed: {}",
                host
            )));
        }
        Ok(url)
    }
}

/// Attachment name: the requested one if given, else the last path segment
/// of the URL, reduced to printable ASCII without quotes or path
/// separators so it fits in a header.
pub fn attachment_filename(url: &Url, requested: Option<&str>) -> String {
    let candidate = requested
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| {
            url.path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
                .filter(|s| !s.is_empty())
        })
        .unwrap_or_else(|| "document".to_string());

    let cleaned: String = candidate
        .chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control() && !matches!(c, '"' | '\\' | '/'))
        .collect();
    if cleaned.is_empty() {
        "document".to_string()
    } else {
        cleaned
    }
}

/// An upstream document ready to be streamed.
pub struct RelayedBody {
    pub content_type: String,
    pub stream: BoxStream<'static, reqwest::Result<Bytes>>,
}

/// Opens `url` upstream. The connection permit travels with the stream and
/// is released when the body has been fully sent or dropped.
pub async fn open(client: &Client, limiter: &RateLimiter, url: &Url) -> Result<RelayedBody> {
    log::info!("Relaying {}", url);
    let permit = limiter.acquire_owned().await?;
    let response = client.get(url.as_str()).send().await.map_err(|e| {
        log::warn!("Relay fetch failed for {}: {}", url, e);
        FilingsError::from(e)
    })?;

    if !response.status().is_success() {
        log::warn!("Relay upstream {} returned {}", url, response.status());
        return Err(FilingsError::UpstreamUnavailable(format!(
            "{} returned status {}",
            url,
            response.status()
        )));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string());

    let stream = response.bytes_stream().map(move |chunk| {
        let _held = &permit;
        chunk
    });

    Ok(RelayedBody {
        content_type,
        stream: stream.boxed(),
    })
}
