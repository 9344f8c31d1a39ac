use chrono::NaiveDate;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::edgar::tickers::FilerIdentity;
use crate::eligibility::{parse_date, EligibleFiling};

pub const UNKNOWN_SIZE: &str = "Unknown";

static ACCESSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{10}-\d{2}-\d{6}$").expect("valid accession pattern"));

/// One document offered to the caller. `name` is its identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub label: String,
    pub date: NaiveDate,
    pub size: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default)]
    pub form_type: Option<String>,
    #[serde(default)]
    pub period_end: Option<NaiveDate>,
}

#[derive(Debug, PartialEq)]
pub enum SynthesisError {
    Accession(String),
    EmptyDocument,
}

impl std::fmt::Display for SynthesisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SynthesisError::Accession(a) => write!(f, "unparseable accession id {:?}", a),
            SynthesisError::EmptyDocument => write!(f, "missing primary document"),
        }
    }
}

/// Form kinds become file-name safe: anything but letters, digits and
/// hyphens turns into `_` ("10-K/A" -> "10-K_A", "DEF 14A" -> "DEF_14A").
pub fn sanitize_kind(kind: &str) -> String {
    kind.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

pub fn display_name(kind: &str, filing_date: NaiveDate, primary_document: &str) -> String {
    let extension = if primary_document.to_ascii_lowercase().ends_with(".htm") {
        "htm"
    } else {
        "pdf"
    };
    format!(
        "{}_{}.{}",
        sanitize_kind(kind),
        filing_date.format("%Y%m%d"),
        extension
    )
}

pub fn source_url(
    archive_root: &str,
    unpadded_cik: &str,
    accession_number: &str,
    primary_document: &str,
) -> Result<String, SynthesisError> {
    if !ACCESSION_RE.is_match(accession_number) {
        return Err(SynthesisError::Accession(accession_number.to_string()));
    }
    let document = primary_document.trim();
    if document.is_empty() {
        return Err(SynthesisError::EmptyDocument);
    }
    Ok(format!(
        "{}/{}/{}/{}",
        archive_root.trim_end_matches('/'),
        unpadded_cik,
        accession_number.replace('-', ""),
        document
    ))
}

/// Builds the descriptor for an eligible filing.
pub fn synthesize(
    filing: &EligibleFiling,
    identity: &FilerIdentity,
    archive_root: &str,
) -> Result<DocumentDescriptor, SynthesisError> {
    let row = &filing.row;
    let url = source_url(
        archive_root,
        identity.unpadded_cik(),
        &row.accession_number,
        &row.primary_document,
    )?;
    let kind = row.form.to_string();

    Ok(DocumentDescriptor {
        name: display_name(&kind, filing.filing_date, &row.primary_document),
        label: row.form.label(),
        date: filing.filing_date,
        size: UNKNOWN_SIZE.to_string(),
        url,
        proxy_url: None,
        download_url: None,
        form_type: Some(kind),
        period_end: row
            .report_date
            .as_deref()
            .and_then(parse_date)
            .or(Some(filing.filing_date)),
    })
}

/// Synthesizes every filing, dropping (and logging) the ones that fail.
pub fn synthesize_all(
    filings: &[EligibleFiling],
    identity: &FilerIdentity,
    archive_root: &str,
) -> Vec<DocumentDescriptor> {
    filings
        .iter()
        .filter_map(|filing| match synthesize(filing, identity, archive_root) {
            Ok(descriptor) => Some(descriptor),
            Err(e) => {
                warn!(
                    "Could not create file info for {} {}: {}",
                    filing.row.form, filing.row.accession_number, e
                );
                None
            }
        })
        .collect()
}
