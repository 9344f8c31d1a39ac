use serde::{Deserialize, Serialize};

use crate::document::DocumentDescriptor;
use crate::edgar::tickers::FilerIdentity;

fn default_quarters_back() -> u32 {
    6
}

fn default_annuals_back() -> u32 {
    5
}

fn default_exchange() -> String {
    "auto".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub ticker: String,
    pub file_types: Vec<String>,
    #[serde(default = "default_quarters_back")]
    pub quarters_back: u32,
    #[serde(default = "default_annuals_back")]
    pub annuals_back: u32,
    #[serde(default = "default_exchange")]
    pub exchange: String,
}

impl SearchRequest {
    pub fn new(ticker: &str, file_types: &[&str], quarters_back: u32, annuals_back: u32) -> Self {
        Self {
            ticker: ticker.to_string(),
            file_types: file_types.iter().map(|s| s.to_string()).collect(),
            quarters_back,
            annuals_back,
            exchange: default_exchange(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub company: FilerIdentity,
    pub files: Vec<DocumentDescriptor>,
    pub total_files: usize,
}
