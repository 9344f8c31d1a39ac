use chrono::NaiveDate;
use log::{info, warn};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use url::Url;
use std::fs;
use std::path::Path;

use crate::document::{DocumentDescriptor, UNKNOWN_SIZE};
use crate::edgar::tickers::Ticker;
use crate::eligibility::{parse_date, Category, RequestedFilter};

/// One investor-relations document as listed in the source file.
#[derive(Debug, Clone, Deserialize)]
pub struct IrEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub label: String,
    pub date: String,
    pub url: String,
    pub category: String,
    #[serde(default)]
    pub form_type: Option<String>,
}

/// Secondary document source, merged after the regulatory feed. Loaded once
/// at startup and never modified.
#[derive(Debug, Clone, Default)]
pub struct IrSource {
    entries: HashMap<String, Vec<IrEntry>>,
}

impl IrSource {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let raw: HashMap<String, Vec<IrEntry>> = serde_json::from_str(json)
            .map_err(|e| anyhow::anyhow!("Failed to parse IR documents JSON: {}", e))?;
        let entries = raw
            .into_iter()
            .map(|(symbol, docs)| (symbol.trim().to_uppercase(), docs))
            .collect();
        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        info!("Loading IR documents from {:?}", path);
        let json = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {:?}: {}", path, e))?;
        let source = Self::from_json(&json)?;
        info!("Loaded IR documents for {} symbols", source.entries.len());
        Ok(source)
    }

    /// Hosts the listed documents live on, lowercased and deduplicated.
    /// Entries whose URL does not parse are left out.
    pub fn hosts(&self) -> Vec<String> {
        self.entries
            .values()
            .flatten()
            .filter_map(|entry| Url::parse(&entry.url).ok())
            .filter_map(|url| url.host_str().map(str::to_ascii_lowercase))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn documents(
        &self,
        ticker: &Ticker,
        filter: &RequestedFilter,
        today: NaiveDate,
    ) -> Vec<DocumentDescriptor> {
        let Some(entries) = self.entries.get(ticker.as_str()) else {
            return Vec::new();
        };

        entries
            .iter()
            .filter_map(|entry| {
                let Some(date) = parse_date(&entry.date) else {
                    warn!(
                        "Skipping IR document {} for {}: malformed date {:?}",
                        entry.name, ticker, entry.date
                    );
                    return None;
                };
                let category = entry.category.parse::<Category>().ok()?;
                filter
                    .admits_category(category, date, today)
                    .then(|| DocumentDescriptor {
                        name: entry.name.clone(),
                        label: entry.label.clone(),
                        date,
                        size: UNKNOWN_SIZE.to_string(),
                        url: entry.url.clone(),
                        proxy_url: None,
                        download_url: None,
                        form_type: entry.form_type.clone(),
                        period_end: None,
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IR_JSON: &str = r#"{
        "aapl": [
            {"name": "AAPL_Q3_2025_deck.pdf", "type": "Earnings Presentation", "date": "2025-05-01",
             "url": "https://ir.example.com/q3.pdf", "category": "earnings"},
            {"name": "AAPL_investor_day.pdf", "type": "Investor Presentation", "date": "2024-09-10",
             "url": "https://ir.example.com/day.pdf", "category": "presentations"},
            {"name": "AAPL_bad.pdf", "type": "Investor Presentation", "date": "2024-99-10",
             "url": "https://ir.example.com/bad.pdf", "category": "presentations"},
            {"name": "AAPL_misc.pdf", "type": "Other", "date": "2025-05-01",
             "url": "https://ir.example.com/misc.pdf", "category": "misc"}
        ]
    }"#;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    #[test]
    fn test_documents_filtered_by_category_and_window() {
        let source = IrSource::from_json(IR_JSON).unwrap();
        let ticker = Ticker::new("AAPL").unwrap();

        let filter = RequestedFilter::new(
            vec!["earnings".to_string(), "presentations".to_string()],
            1,
            1,
        );
        let docs = source.documents(&ticker, &filter, today());
        let names: Vec<_> = docs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["AAPL_Q3_2025_deck.pdf", "AAPL_investor_day.pdf"]);
        assert_eq!(docs[0].size, "Unknown");

        let filter = RequestedFilter::new(vec!["presentations".to_string()], 1, 0);
        assert!(source.documents(&ticker, &filter, today()).is_empty());
    }

    #[test]
    fn test_unknown_symbol_has_no_documents() {
        let source = IrSource::from_json(IR_JSON).unwrap();
        let filter = RequestedFilter::new(vec!["earnings".to_string()], 4, 4);
        assert!(source
            .documents(&Ticker::new("MSFT").unwrap(), &filter, today())
            .is_empty());
    }

    #[test]
    fn test_hosts() {
        let source = IrSource::from_json(
            r#"{
                "AAPL": [
                    {"name": "a.pdf", "type": "Deck", "date": "2025-05-01",
                     "url": "https://IR.example.com/a.pdf", "category": "earnings"},
                    {"name": "b.pdf", "type": "Deck", "date": "2025-05-01",
                     "url": "not a url", "category": "earnings"}
                ],
                "MSFT": [
                    {"name": "c.pdf", "type": "Deck", "date": "2025-05-01",
                     "url": "https://cdn.example.net/c.pdf", "category": "earnings"},
                    {"name": "d.pdf", "type": "Deck", "date": "2025-05-01",
                     "url": "https://ir.example.com/d.pdf", "category": "earnings"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(source.hosts(), ["cdn.example.net", "ir.example.com"]);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ir.json");
        fs::write(&path, IR_JSON).unwrap();
        assert!(IrSource::load(&path).is_ok());
        assert!(IrSource::load(&dir.path().join("missing.json")).is_err());
    }
}
