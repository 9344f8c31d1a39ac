use async_trait::async_trait;
use log::info;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use super::filing::CompanySubmissions;
use super::tickers::{parse_tickers, TickerEntry};
use super::utils::fetch_json;
use crate::core::config::QuickFilingsConfig;
use crate::error::{FilingsError, Result};
use crate::utils::rate_limit::RateLimiter;

/// The two regulatory collaborators the search pipeline depends on.
#[async_trait]
pub trait FilingFeed: Send + Sync {
    /// The bulk symbol to identifier table.
    async fn company_tickers(&self) -> Result<Vec<TickerEntry>>;

    /// The submission history of one filer, keyed by its padded id.
    async fn submissions(&self, cik: &str) -> Result<CompanySubmissions>;
}

pub struct EdgarClient {
    client: Client,
    limiter: RateLimiter,
    data_url: Url,
    tickers_url: Url,
}

impl EdgarClient {
    pub fn new(client: Client, limiter: RateLimiter, data_url: Url, tickers_url: Url) -> Self {
        Self {
            client,
            limiter,
            data_url,
            tickers_url,
        }
    }

    pub fn from_config(config: &QuickFilingsConfig, client: Client, limiter: RateLimiter) -> Self {
        Self::new(
            client,
            limiter,
            config.edgar_data_url.clone(),
            config.edgar_tickers_url.clone(),
        )
    }

    fn submissions_url(&self, cik: &str) -> Result<Url> {
        // Ensure CIK is 10 digits with leading zeros
        let padded_cik = format!("{:0>10}", cik);
        let base = self.data_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{}/submissions/CIK{}.json", base, padded_cik))
            .map_err(|e| FilingsError::InvalidInput(format!("invalid submissions url: {}", e)))
    }
}

/// Shared HTTP client for every upstream call: identifier table, history and
/// relayed documents.
pub fn build_http_client(user_agent: &str, timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .build()
}

#[async_trait]
impl FilingFeed for EdgarClient {
    async fn company_tickers(&self) -> Result<Vec<TickerEntry>> {
        info!("Fetching company tickers from {}", self.tickers_url);
        let content = fetch_json(&self.client, &self.tickers_url, &self.limiter).await?;
        parse_tickers(&content)
    }

    async fn submissions(&self, cik: &str) -> Result<CompanySubmissions> {
        let url = self.submissions_url(cik)?;
        info!("Fetching company filings from {}", url);
        let content = fetch_json(&self.client, &url, &self.limiter).await?;
        CompanySubmissions::parse(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submissions_url_is_padded() {
        let client = EdgarClient::new(
            Client::new(),
            RateLimiter::default(),
            Url::parse("https://data.sec.gov/").unwrap(),
            Url::parse("https://www.sec.gov/files/company_tickers.json").unwrap(),
        );
        assert_eq!(
            client.submissions_url("320193").unwrap().as_str(),
            "https://data.sec.gov/submissions/CIK0000320193.json"
        );
    }
}
