use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Filing kinds the engine knows how to classify and label.
///
/// Anything else is carried through as `Other` with the upstream text kept
/// verbatim, and is never admitted by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ReportType {
    Form10K,
    Form10KA,
    Form10Q,
    Form10QA,
    Form8K,
    Form8KA,
    FormDEF14A,
    Other(String),
}

impl TryFrom<String> for ReportType {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        ReportType::from_str(&s)
    }
}

impl From<ReportType> for String {
    fn from(r: ReportType) -> Self {
        r.to_string()
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportType::Form10K => write!(f, "10-K"),
            ReportType::Form10KA => write!(f, "10-K/A"),
            ReportType::Form10Q => write!(f, "10-Q"),
            ReportType::Form10QA => write!(f, "10-Q/A"),
            ReportType::Form8K => write!(f, "8-K"),
            ReportType::Form8KA => write!(f, "8-K/A"),
            ReportType::FormDEF14A => write!(f, "DEF 14A"),
            ReportType::Other(s) => write!(f, "{}", s),
        }
    }
}

impl ReportType {
    /// Human label shown next to a document. Amendments and unknown kinds
    /// fall back to the raw kind string.
    pub fn label(&self) -> String {
        match self {
            ReportType::Form10K => "Annual Report".to_string(),
            ReportType::Form10Q => "Quarterly Report".to_string(),
            ReportType::Form8K => "Current Report".to_string(),
            ReportType::FormDEF14A => "Proxy Statement".to_string(),
            other => other.to_string(),
        }
    }
}

/// Matches the upstream kind text exactly. Case or whitespace variants are
/// not the same kind and end up as `Other`.
impl FromStr for ReportType {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<ReportType, std::string::String> {
        match s {
            "10-K" => Ok(ReportType::Form10K),
            "10-K/A" => Ok(ReportType::Form10KA),
            "10-Q" => Ok(ReportType::Form10Q),
            "10-Q/A" => Ok(ReportType::Form10QA),
            "8-K" => Ok(ReportType::Form8K),
            "8-K/A" => Ok(ReportType::Form8KA),
            "DEF 14A" => Ok(ReportType::FormDEF14A),
            _ => Ok(ReportType::Other(s.to_string())),
        }
    }
}
