use anyhow::{anyhow, Result};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_USER_AGENT: &str = "QuickFilings/1.0 (contact@quickfilings.com)";
pub const EDGAR_DATA_URL: &str = "https://data.sec.gov";
pub const EDGAR_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";
pub const EDGAR_ARCHIVE_URL: &str = "https://www.sec.gov/Archives/edgar/data";
pub const DEFAULT_RELAY_HOSTS: &str = "www.sec.gov,sec.gov,data.sec.gov";

#[derive(Clone, Debug)]
pub struct QuickFilingsConfig {
    pub host: String,
    pub port: u16,
    pub user_agent: String,
    pub edgar_data_url: Url,
    pub edgar_tickers_url: Url,
    pub archive_root: String,
    pub timeout: Duration,
    pub max_connections: usize,
    pub cache_ttl: Duration,
    pub max_age_years: Option<u32>,
    pub ir_documents: Option<PathBuf>,
    pub relay_allowed_hosts: Vec<String>,
}

impl Default for QuickFilingsConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            edgar_data_url: Url::parse(EDGAR_DATA_URL).expect("valid default url"),
            edgar_tickers_url: Url::parse(EDGAR_TICKERS_URL).expect("valid default url"),
            archive_root: EDGAR_ARCHIVE_URL.to_string(),
            timeout: Duration::from_secs(30),
            max_connections: 10,
            cache_ttl: Duration::from_secs(24 * 60 * 60),
            max_age_years: None,
            ir_documents: None,
            relay_allowed_hosts: split_hosts(DEFAULT_RELAY_HOSTS),
        }
    }
}

impl QuickFilingsConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source; unset
    /// variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = parse_var(&var, "PORT")?.unwrap_or(defaults.port);
        let timeout_secs: u64 = parse_var(&var, "QUICKFILINGS_TIMEOUT_SECS")?
            .unwrap_or(defaults.timeout.as_secs());
        let max_connections = parse_var(&var, "QUICKFILINGS_MAX_CONNECTIONS")?
            .unwrap_or(defaults.max_connections);
        if max_connections == 0 {
            return Err(anyhow!("QUICKFILINGS_MAX_CONNECTIONS must be at least 1"));
        }
        let cache_ttl_hours: u64 = parse_var(&var, "QUICKFILINGS_CACHE_TTL_HOURS")?
            .unwrap_or(defaults.cache_ttl.as_secs() / 3600);

        Ok(Self {
            host: var("QUICKFILINGS_HOST").unwrap_or(defaults.host),
            port,
            user_agent: var("USER_AGENT").unwrap_or(defaults.user_agent),
            edgar_data_url: parse_url(&var, "EDGAR_DATA_URL")?.unwrap_or(defaults.edgar_data_url),
            edgar_tickers_url: parse_url(&var, "EDGAR_TICKERS_URL")?
                .unwrap_or(defaults.edgar_tickers_url),
            archive_root: parse_url(&var, "EDGAR_ARCHIVE_URL")?
                .map(|u| u.to_string().trim_end_matches('/').to_string())
                .unwrap_or(defaults.archive_root),
            timeout: Duration::from_secs(timeout_secs),
            max_connections,
            cache_ttl: Duration::from_secs(cache_ttl_hours * 3600),
            max_age_years: parse_var(&var, "QUICKFILINGS_MAX_AGE_YEARS")?,
            ir_documents: var("QUICKFILINGS_IR_DOCUMENTS").map(PathBuf::from),
            relay_allowed_hosts: var("RELAY_ALLOWED_HOSTS")
                .map(|h| split_hosts(&h))
                .unwrap_or(defaults.relay_allowed_hosts),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T, F>(var: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    var(key)
        .map(|v| {
            v.parse::<T>()
                .map_err(|e| anyhow!("{} has invalid value {:?}: {}", key, v, e))
        })
        .transpose()
}

fn parse_url<F>(var: &F, key: &str) -> Result<Option<Url>>
where
    F: Fn(&str) -> Option<String>,
{
    var(key)
        .map(|v| Url::parse(&v).map_err(|e| anyhow!("{} is not a valid url: {}", key, e)))
        .transpose()
}

fn split_hosts(hosts: &str) -> Vec<String> {
    hosts
        .split(',')
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(str::to_string)
        .collect()
}
