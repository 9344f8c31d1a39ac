//! Decides which filings qualify for a request.
//!
//! Inclusion is driven by [`RULES`]: a filing is admitted when some rule
//! names a requested category and the filing's kind, and the filing date
//! falls inside that rule's recency window. Adding a category means adding
//! rows to the table.

use chrono::{Days, NaiveDate};
use log::warn;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::edgar::filing::RawFilingRow;
use crate::edgar::report::ReportType;
use crate::error::{FilingsError, Result};

pub const DAYS_PER_QUARTER: u64 = 90;
pub const DAYS_PER_YEAR: u64 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "quarterlyAnnual")]
    QuarterlyAnnual,
    #[serde(rename = "form8k")]
    Form8K,
    #[serde(rename = "earnings")]
    Earnings,
    #[serde(rename = "presentations")]
    Presentations,
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "quarterlyAnnual" => Ok(Category::QuarterlyAnnual),
            "form8k" => Ok(Category::Form8K),
            "earnings" => Ok(Category::Earnings),
            "presentations" => Ok(Category::Presentations),
            other => Err(format!("unknown category: {}", other)),
        }
    }
}

impl Category {
    /// Window used for documents that carry a category but no filing kind,
    /// such as investor-relations material.
    pub fn default_window(&self) -> Window {
        match self {
            Category::Form8K | Category::Earnings => Window::Quarters,
            Category::QuarterlyAnnual | Category::Presentations => Window::Annuals,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Quarters,
    Annuals,
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub category: Category,
    pub kinds: Vec<ReportType>,
    pub window: Window,
}

pub static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule {
            category: Category::QuarterlyAnnual,
            kinds: vec![
                ReportType::Form10K,
                ReportType::Form10KA,
                ReportType::FormDEF14A,
            ],
            window: Window::Annuals,
        },
        Rule {
            category: Category::QuarterlyAnnual,
            kinds: vec![ReportType::Form10Q, ReportType::Form10QA],
            window: Window::Quarters,
        },
        Rule {
            category: Category::Form8K,
            kinds: vec![ReportType::Form8K, ReportType::Form8KA],
            window: Window::Quarters,
        },
        Rule {
            category: Category::Earnings,
            kinds: vec![ReportType::Form8K],
            window: Window::Quarters,
        },
        Rule {
            category: Category::Presentations,
            kinds: vec![ReportType::Form8K, ReportType::FormDEF14A],
            window: Window::Annuals,
        },
    ]
});

/// What the caller asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestedFilter {
    pub categories: Vec<String>,
    pub quarters_back: u32,
    pub annuals_back: u32,
    /// Absolute bound applied on top of the per-category windows.
    #[serde(default)]
    pub max_age_years: Option<u32>,
}

impl RequestedFilter {
    pub fn new(categories: Vec<String>, quarters_back: u32, annuals_back: u32) -> Self {
        Self {
            categories,
            quarters_back,
            annuals_back,
            max_age_years: None,
        }
    }

    pub fn with_max_age_years(mut self, years: Option<u32>) -> Self {
        self.max_age_years = years;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(FilingsError::InvalidInput(
                "At least one file type must be selected".to_string(),
            ));
        }
        Ok(())
    }

    /// Requested categories from the known vocabulary. Unknown tokens are
    /// dropped here and so match nothing.
    pub fn known_categories(&self) -> Vec<Category> {
        let mut categories = Vec::new();
        for token in &self.categories {
            if let Ok(category) = token.parse::<Category>() {
                if !categories.contains(&category) {
                    categories.push(category);
                }
            }
        }
        categories
    }

    /// Oldest admissible date for `window`, or `None` when the window is
    /// zero and admits nothing.
    pub fn cutoff(&self, window: Window, today: NaiveDate) -> Option<NaiveDate> {
        let (count, days) = match window {
            Window::Quarters => (self.quarters_back, DAYS_PER_QUARTER),
            Window::Annuals => (self.annuals_back, DAYS_PER_YEAR),
        };
        days_back(today, count, days)
    }

    fn within_max_age(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match self.max_age_years {
            None => true,
            Some(years) => days_back(today, years, DAYS_PER_YEAR).is_some_and(|c| date >= c),
        }
    }

    fn within(&self, window: Window, date: NaiveDate, today: NaiveDate) -> bool {
        self.cutoff(window, today).is_some_and(|c| date >= c) && self.within_max_age(date, today)
    }

    /// Whether a filing of `kind` dated `date` qualifies.
    pub fn admits(&self, kind: &ReportType, date: NaiveDate, today: NaiveDate) -> bool {
        let categories = self.known_categories();
        RULES.iter().any(|rule| {
            categories.contains(&rule.category)
                && rule.kinds.contains(kind)
                && self.within(rule.window, date, today)
        })
    }

    /// Whether a document tagged with `category` and dated `date`
    /// qualifies.
    pub fn admits_category(&self, category: Category, date: NaiveDate, today: NaiveDate) -> bool {
        self.known_categories().contains(&category)
            && self.within(category.default_window(), date, today)
    }
}

fn days_back(today: NaiveDate, count: u32, days: u64) -> Option<NaiveDate> {
    if count == 0 {
        return None;
    }
    Some(
        today
            .checked_sub_days(Days::new(u64::from(count) * days))
            .unwrap_or(NaiveDate::MIN),
    )
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// A row that passed the filter, with its date parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct EligibleFiling {
    pub row: RawFilingRow,
    pub filing_date: NaiveDate,
}

/// Keeps the qualifying rows, preserving input order. Rows with an
/// unparseable filing date are skipped.
pub fn select(
    rows: Vec<RawFilingRow>,
    filter: &RequestedFilter,
    today: NaiveDate,
) -> Vec<EligibleFiling> {
    rows.into_iter()
        .filter_map(|row| {
            let Some(filing_date) = parse_date(&row.filing_date) else {
                warn!(
                    "Skipping {} {}: malformed filing date {:?}",
                    row.form, row.accession_number, row.filing_date
                );
                return None;
            };
            filter
                .admits(&row.form, filing_date, today)
                .then_some(EligibleFiling { row, filing_date })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    fn days_ago(n: u64) -> NaiveDate {
        today().checked_sub_days(Days::new(n)).unwrap()
    }

    fn row(form: &str, date: &str) -> RawFilingRow {
        RawFilingRow {
            form: form.parse().unwrap(),
            filing_date: date.to_string(),
            accession_number: "0000320193-25-000001".to_string(),
            primary_document: "doc.htm".to_string(),
            report_date: None,
        }
    }

    fn filter(categories: &[&str], quarters: u32, annuals: u32) -> RequestedFilter {
        RequestedFilter::new(
            categories.iter().map(|s| s.to_string()).collect(),
            quarters,
            annuals,
        )
    }

    #[test]
    fn test_zero_windows_admit_nothing() {
        let f = filter(
            &["quarterlyAnnual", "form8k", "earnings", "presentations"],
            0,
            0,
        );
        for kind in ["10-K", "10-K/A", "10-Q", "10-Q/A", "8-K", "8-K/A", "DEF 14A"] {
            let kind: ReportType = kind.parse().unwrap();
            assert!(!f.admits(&kind, today(), today()), "{} admitted", kind);
            assert!(!f.admits(&kind, days_ago(1), today()), "{} admitted", kind);
        }
    }

    #[test]
    fn test_unknown_kinds_never_admitted() {
        let f = filter(
            &["quarterlyAnnual", "form8k", "earnings", "presentations"],
            100,
            100,
        );
        for kind in ["S-1", "4", "SC 13G", "10-KT", "DEFA14A"] {
            let kind: ReportType = kind.parse().unwrap();
            assert!(!f.admits(&kind, days_ago(1), today()));
        }
    }

    #[test]
    fn test_case_variants_of_known_kinds_rejected() {
        let f = filter(&["quarterlyAnnual", "form8k"], 4, 5);
        for kind in ["10-q", "10-k", " 8-K", "8-k"] {
            let kind: ReportType = kind.parse().unwrap();
            assert!(!f.admits(&kind, days_ago(10), today()), "{:?} admitted", kind);
        }
        assert!(f.admits(&ReportType::Form10Q, days_ago(10), today()));
    }

    #[test]
    fn test_category_mapping_is_a_hard_filter() {
        let earnings = filter(&["earnings"], 8, 8);
        assert!(earnings.admits(&ReportType::Form8K, days_ago(10), today()));
        assert!(!earnings.admits(&ReportType::Form8KA, days_ago(10), today()));
        assert!(!earnings.admits(&ReportType::Form10Q, days_ago(10), today()));

        let presentations = filter(&["presentations"], 8, 8);
        assert!(presentations.admits(&ReportType::FormDEF14A, days_ago(10), today()));
        assert!(!presentations.admits(&ReportType::Form10K, days_ago(10), today()));
    }

    #[test]
    fn test_quarterly_annual_windows() {
        let f = filter(&["quarterlyAnnual"], 4, 1);
        // 10-Q: 4 * 90 = 360 days back
        assert!(f.admits(&ReportType::Form10Q, days_ago(360), today()));
        assert!(!f.admits(&ReportType::Form10Q, days_ago(361), today()));
        // 10-K: 1 * 365 days back
        assert!(f.admits(&ReportType::Form10K, days_ago(365), today()));
        assert!(!f.admits(&ReportType::Form10K, days_ago(366), today()));
        assert!(f.admits(&ReportType::FormDEF14A, days_ago(300), today()));
    }

    #[test]
    fn test_presentations_use_annual_window_for_8k() {
        let f = filter(&["presentations"], 1, 2);
        assert!(f.admits(&ReportType::Form8K, days_ago(500), today()));
        let f = filter(&["form8k"], 1, 2);
        assert!(!f.admits(&ReportType::Form8K, days_ago(500), today()));
    }

    #[test]
    fn test_unknown_category_matches_nothing() {
        let f = filter(&["transcripts"], 10, 10);
        assert!(f.validate().is_ok());
        assert!(f.known_categories().is_empty());
        assert!(!f.admits(&ReportType::Form10K, days_ago(1), today()));
    }

    #[test]
    fn test_empty_categories_rejected() {
        assert!(matches!(
            filter(&[], 4, 5).validate(),
            Err(FilingsError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_max_age_bound() {
        let f = filter(&["quarterlyAnnual"], 4, 10).with_max_age_years(Some(6));
        assert!(f.admits(&ReportType::Form10K, days_ago(6 * 365), today()));
        assert!(!f.admits(&ReportType::Form10K, days_ago(6 * 365 + 1), today()));
        let unbounded = filter(&["quarterlyAnnual"], 4, 10);
        assert!(unbounded.admits(&ReportType::Form10K, days_ago(6 * 365 + 1), today()));
    }

    #[test]
    fn test_select_skips_malformed_dates() {
        let f = filter(&["quarterlyAnnual"], 4, 5);
        let rows = vec![
            row("10-Q", &days_ago(30).to_string()),
            row("10-Q", "2024-13-40"),
            row("10-K", &days_ago(400).to_string()),
        ];
        let selected = select(rows, &f, today());
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].filing_date, days_ago(30));
        assert_eq!(selected[1].filing_date, days_ago(400));
    }

    #[test]
    fn test_admits_category() {
        let f = filter(&["presentations"], 1, 1);
        assert!(f.admits_category(Category::Presentations, days_ago(200), today()));
        assert!(!f.admits_category(Category::Earnings, days_ago(10), today()));
        let f = filter(&["earnings"], 1, 5);
        assert!(!f.admits_category(Category::Earnings, days_ago(200), today()));
    }
}
