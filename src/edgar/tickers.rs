use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{FilingsError, Result};

pub const MAX_TICKER_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ticker(String);

impl Ticker {
    pub fn new(ticker: &str) -> Result<Self> {
        let uppercase_ticker = ticker.trim().to_uppercase();
        if uppercase_ticker.is_empty() {
            return Err(FilingsError::InvalidInput(
                "Ticker cannot be empty".to_string(),
            ));
        }
        if uppercase_ticker.chars().count() > MAX_TICKER_LEN {
            return Err(FilingsError::InvalidInput(format!(
                "Ticker must be at most {} characters: {}",
                MAX_TICKER_LEN, ticker
            )));
        }
        if !uppercase_ticker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
        {
            return Err(FilingsError::InvalidInput(format!(
                "Ticker must contain only alphanumeric characters, dots or hyphens: {}",
                ticker
            )));
        }
        Ok(Ticker(uppercase_ticker))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Exchange {
    #[serde(rename = "NASDAQ")]
    Nasdaq,
    #[serde(rename = "NYSE")]
    Nyse,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl Exchange {
    /// Display hint derived from the shape of the symbol. Never used for
    /// filtering.
    pub fn guess(ticker: &Ticker) -> Self {
        let symbol = ticker.as_str();
        if symbol.len() <= 4 && symbol.chars().all(|c| c.is_ascii_alphabetic()) {
            Exchange::Nasdaq
        } else {
            Exchange::Nyse
        }
    }

    /// Applies a caller supplied hint: `auto` (or nothing) keeps the guess,
    /// a recognized exchange name overrides it, anything else is `Unknown`.
    pub fn from_hint(hint: Option<&str>, ticker: &Ticker) -> Self {
        match hint.map(|h| h.trim().to_uppercase()) {
            None => Self::guess(ticker),
            Some(h) => match h.as_str() {
                "" | "AUTO" => Self::guess(ticker),
                "NASDAQ" => Exchange::Nasdaq,
                "NYSE" => Exchange::Nyse,
                _ => Exchange::Unknown,
            },
        }
    }
}

impl std::fmt::Display for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Exchange::Nasdaq => write!(f, "NASDAQ"),
            Exchange::Nyse => write!(f, "NYSE"),
            Exchange::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A resolved filer. `cik` is always the 10-digit zero-padded form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilerIdentity {
    pub name: String,
    pub ticker: String,
    pub cik: String,
    pub exchange: Exchange,
    pub sector: Option<String>,
    pub industry: Option<String>,
}

impl FilerIdentity {
    /// Numeric id without the zero padding, as used in archive paths.
    pub fn unpadded_cik(&self) -> &str {
        let trimmed = self.cik.trim_start_matches('0');
        if trimmed.is_empty() {
            "0"
        } else {
            trimmed
        }
    }
}

pub fn pad_cik(cik: u64) -> String {
    format!("{:010}", cik)
}

/// One entry of the bulk `company_tickers.json` document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TickerEntry {
    pub cik_str: u64,
    pub ticker: String,
    pub title: String,
}

/// Decodes the bulk identifier table. The upstream document is an object
/// keyed by row number; entries come back in row order so the first row
/// wins when a symbol is listed twice.
pub fn parse_tickers(json: &str) -> Result<Vec<TickerEntry>> {
    let table: BTreeMap<u64, TickerEntry> = serde_json::from_str(json)?;
    log::debug!("Found {} ticker entries", table.len());
    Ok(table.into_values().collect())
}

pub fn find_ticker<'a>(entries: &'a [TickerEntry], ticker: &Ticker) -> Option<&'a TickerEntry> {
    entries
        .iter()
        .find(|entry| entry.ticker.trim().eq_ignore_ascii_case(ticker.as_str()))
}
