use log::warn;
use serde::Deserialize;

use super::report::ReportType;
use crate::error::{FilingsError, Result};

/// The parts of `submissions/CIK##########.json` the engine reads.
#[derive(Debug, Deserialize)]
pub struct CompanySubmissions {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sic: Option<String>,
    #[serde(rename = "sicDescription", default)]
    pub sic_description: Option<String>,
    #[serde(default)]
    pub filings: Option<FilingsData>,
}

#[derive(Debug, Deserialize)]
pub struct FilingsData {
    #[serde(default)]
    pub recent: Option<FilingEntry>,
}

/// Columnar table as published upstream: one array per field, row `i` being
/// the `i`-th element of each.
#[derive(Debug, Deserialize)]
pub struct FilingEntry {
    #[serde(rename = "accessionNumber")]
    pub accession_number: Vec<String>,
    #[serde(rename = "filingDate")]
    pub filing_date: Vec<String>,
    #[serde(rename = "form")]
    pub report_type: Vec<String>,
    #[serde(rename = "primaryDocument")]
    pub primary_document: Vec<String>,
    #[serde(rename = "reportDate", default)]
    pub report_date: Option<Vec<String>>,
}

/// One filing, as a record. Dates are kept as upstream text; parsing
/// happens per row in the classifier so one bad date only loses one row.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFilingRow {
    pub form: ReportType,
    pub filing_date: String,
    pub accession_number: String,
    pub primary_document: String,
    pub report_date: Option<String>,
}

impl CompanySubmissions {
    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn sector(&self) -> Option<String> {
        non_empty(self.sic.as_deref())
    }

    pub fn industry(&self) -> Option<String> {
        non_empty(self.sic_description.as_deref())
    }

    /// Converts the recent-filings table into row records, in upstream
    /// order.
    pub fn rows(&self) -> Result<Vec<RawFilingRow>> {
        let recent = self
            .filings
            .as_ref()
            .and_then(|f| f.recent.as_ref())
            .ok_or_else(|| {
                FilingsError::UpstreamMalformed("recent filings table is missing".to_string())
            })?;
        recent.rows()
    }
}

impl FilingEntry {
    pub fn rows(&self) -> Result<Vec<RawFilingRow>> {
        let len = self.report_type.len();
        if self.filing_date.len() != len
            || self.accession_number.len() != len
            || self.primary_document.len() != len
        {
            return Err(FilingsError::UpstreamMalformed(format!(
                "recent filings columns differ in length: form={}, filingDate={}, accessionNumber={}, primaryDocument={}",
                len,
                self.filing_date.len(),
                self.accession_number.len(),
                self.primary_document.len()
            )));
        }

        let report_dates = match &self.report_date {
            Some(dates) if dates.len() == len => Some(dates),
            Some(dates) => {
                warn!(
                    "Ignoring reportDate column: {} entries for {} filings",
                    dates.len(),
                    len
                );
                None
            }
            None => None,
        };

        let rows = self
            .report_type
            .iter()
            .zip(&self.filing_date)
            .zip(&self.accession_number)
            .zip(&self.primary_document)
            .enumerate()
            .map(|(i, (((form, date), accession), document))| RawFilingRow {
                form: form.parse().unwrap_or_else(|_| ReportType::Other(form.clone())),
                filing_date: date.clone(),
                accession_number: accession.clone(),
                primary_document: document.clone(),
                report_date: report_dates.and_then(|d| non_empty(Some(d[i].as_str()))),
            })
            .collect();

        Ok(rows)
    }
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUBMISSIONS_JSON: &str = r#"{
        "cik": "320193",
        "name": "Apple Inc.",
        "sic": "3571",
        "sicDescription": "Electronic Computers",
        "filings": {
            "recent": {
                "accessionNumber": ["0000320193-24-000123", "0000320193-24-000081"],
                "filingDate": ["2024-11-01", "2024-08-02"],
                "reportDate": ["2024-09-28", ""],
                "form": ["10-K", "10-Q"],
                "primaryDocument": ["aapl-20240928.htm", "aapl-20240629.htm"]
            },
            "files": []
        }
    }"#;

    #[test]
    fn test_rows_in_upstream_order() {
        let submissions = CompanySubmissions::parse(SUBMISSIONS_JSON).unwrap();
        let rows = submissions.rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].form, ReportType::Form10K);
        assert_eq!(rows[0].accession_number, "0000320193-24-000123");
        assert_eq!(rows[0].report_date.as_deref(), Some("2024-09-28"));
        assert_eq!(rows[1].form, ReportType::Form10Q);
        assert_eq!(rows[1].report_date, None);
        assert_eq!(submissions.sector().as_deref(), Some("3571"));
        assert_eq!(submissions.industry().as_deref(), Some("Electronic Computers"));
    }

    #[test]
    fn test_missing_recent_table() {
        let submissions = CompanySubmissions::parse(r#"{"name": "X", "filings": {}}"#).unwrap();
        assert!(matches!(
            submissions.rows(),
            Err(FilingsError::UpstreamMalformed(_))
        ));
    }

    #[test]
    fn test_mismatched_columns() {
        let json = r#"{
            "filings": {
                "recent": {
                    "accessionNumber": ["0000320193-24-000123"],
                    "filingDate": ["2024-11-01", "2024-08-02"],
                    "form": ["10-K", "10-Q"],
                    "primaryDocument": ["a.htm", "b.htm"]
                }
            }
        }"#;
        let submissions = CompanySubmissions::parse(json).unwrap();
        assert!(matches!(
            submissions.rows(),
            Err(FilingsError::UpstreamMalformed(_))
        ));
    }

    #[test]
    fn test_mismatched_report_dates_are_dropped() {
        let json = r#"{
            "filings": {
                "recent": {
                    "accessionNumber": ["0000320193-24-000123"],
                    "filingDate": ["2024-11-01"],
                    "reportDate": [],
                    "form": ["10-K"],
                    "primaryDocument": ["a.htm"]
                }
            }
        }"#;
        let rows = CompanySubmissions::parse(json).unwrap().rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].report_date, None);
    }
}
