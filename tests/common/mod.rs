#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use quickfilings::edgar::filing::CompanySubmissions;
use quickfilings::edgar::tickers::TickerEntry;
use quickfilings::edgar::FilingFeed;
use quickfilings::error::{FilingsError, Result};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const AAPL_CIK: u64 = 320193;

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
}

pub fn days_ago(n: u64) -> NaiveDate {
    today().checked_sub_days(Days::new(n)).unwrap()
}

/// (form, filing date, accession number, primary document)
pub type Row = (&'static str, String, &'static str, &'static str);

/// In-process stand-in for the regulatory feed.
pub struct FakeFeed {
    pub rows: Vec<Row>,
    pub broken_submissions: Option<FilingsError>,
    pub ticker_calls: AtomicUsize,
    pub submission_calls: AtomicUsize,
}

impl FakeFeed {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows,
            broken_submissions: None,
            ticker_calls: AtomicUsize::new(0),
            submission_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: FilingsError) -> Self {
        Self {
            broken_submissions: Some(error),
            ..Self::new(Vec::new())
        }
    }

    pub fn ticker_calls(&self) -> usize {
        self.ticker_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FilingFeed for FakeFeed {
    async fn company_tickers(&self) -> Result<Vec<TickerEntry>> {
        self.ticker_calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![
            TickerEntry {
                cik_str: AAPL_CIK,
                ticker: "AAPL".to_string(),
                title: "Apple Inc.".to_string(),
            },
            TickerEntry {
                cik_str: 1067983,
                ticker: "BRK-B".to_string(),
                title: "BERKSHIRE HATHAWAY INC".to_string(),
            },
        ])
    }

    async fn submissions(&self, cik: &str) -> Result<CompanySubmissions> {
        self.submission_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(e) = &self.broken_submissions {
            return Err(match e {
                FilingsError::UpstreamMalformed(m) => FilingsError::UpstreamMalformed(m.clone()),
                other => FilingsError::UpstreamUnavailable(other.to_string()),
            });
        }
        assert_eq!(cik.len(), 10, "identifier must be zero padded");

        let doc = json!({
            "cik": cik.trim_start_matches('0'),
            "name": "Apple Inc.",
            "sic": "3571",
            "sicDescription": "Electronic Computers",
            "filings": {
                "recent": {
                    "form": self.rows.iter().map(|r| r.0).collect::<Vec<_>>(),
                    "filingDate": self.rows.iter().map(|r| r.1.clone()).collect::<Vec<_>>(),
                    "accessionNumber": self.rows.iter().map(|r| r.2).collect::<Vec<_>>(),
                    "primaryDocument": self.rows.iter().map(|r| r.3).collect::<Vec<_>>(),
                },
                "files": []
            }
        });
        CompanySubmissions::parse(&doc.to_string())
    }
}
