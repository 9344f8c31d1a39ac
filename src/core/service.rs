use chrono::{Local, NaiveDate};
use log::{error, info};
use std::sync::Arc;

use super::types::{SearchRequest, SearchResult};
use crate::aggregate::aggregate;
use crate::document::synthesize_all;
use crate::edgar::client::FilingFeed;
use crate::edgar::resolver::IdentifierResolver;
use crate::edgar::tickers::{Exchange, FilerIdentity, Ticker};
use crate::eligibility::{self, RequestedFilter};
use crate::error::Result;
use crate::ir::IrSource;
use crate::relay;

/// Runs the search pipeline: resolve, fetch, classify, synthesize,
/// aggregate, relay.
pub struct SearchService {
    feed: Arc<dyn FilingFeed>,
    resolver: IdentifierResolver,
    ir: Option<IrSource>,
    archive_root: String,
    max_age_years: Option<u32>,
}

impl SearchService {
    pub fn new(
        feed: Arc<dyn FilingFeed>,
        resolver: IdentifierResolver,
        archive_root: impl Into<String>,
    ) -> Self {
        Self {
            feed,
            resolver,
            ir: None,
            archive_root: archive_root.into(),
            max_age_years: None,
        }
    }

    pub fn with_ir_source(mut self, ir: Option<IrSource>) -> Self {
        self.ir = ir;
        self
    }

    pub fn with_max_age_years(mut self, years: Option<u32>) -> Self {
        self.max_age_years = years;
        self
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResult> {
        self.search_as_of(request, Local::now().date_naive()).await
    }

    /// Same as [`search`](Self::search) with an explicit reference date for
    /// the recency windows.
    pub async fn search_as_of(
        &self,
        request: &SearchRequest,
        today: NaiveDate,
    ) -> Result<SearchResult> {
        info!(
            "Searching for {} with types: {:?}",
            request.ticker, request.file_types
        );
        let result = self.run(request, today).await;
        match &result {
            Ok(r) => info!("Found {} files for {}", r.total_files, request.ticker),
            Err(e) if !e.is_client_error() => error!("Search for {} failed: {}", request.ticker, e),
            Err(_) => {}
        }
        result
    }

    async fn run(&self, request: &SearchRequest, today: NaiveDate) -> Result<SearchResult> {
        let ticker = Ticker::new(&request.ticker)?;
        let filter = RequestedFilter::new(
            request.file_types.clone(),
            request.quarters_back,
            request.annuals_back,
        )
        .with_max_age_years(self.max_age_years);
        filter.validate()?;

        let mut company = self.resolver.resolve(&ticker).await?;
        company.exchange = Exchange::from_hint(Some(&request.exchange), &ticker);

        let secondary = async {
            self.ir
                .as_ref()
                .map(|ir| ir.documents(&ticker, &filter, today))
                .unwrap_or_default()
        };
        let (submissions, ir_documents) =
            tokio::join!(self.feed.submissions(&company.cik), secondary);
        let submissions = submissions?;

        company.sector = submissions.sector();
        company.industry = submissions.industry();

        let eligible = eligibility::select(submissions.rows()?, &filter, today);
        let edgar_documents = synthesize_all(&eligible, &company, &self.archive_root);

        let mut files = aggregate(vec![edgar_documents, ir_documents]);
        relay::rewrite(&mut files);

        Ok(SearchResult {
            total_files: files.len(),
            company,
            files,
        })
    }

    /// Resolved identity enriched with the sector and industry from the
    /// submission history.
    pub async fn company(&self, ticker: &str) -> Result<FilerIdentity> {
        let ticker = Ticker::new(ticker)?;
        let mut company = self.resolver.resolve(&ticker).await?;
        match self.feed.submissions(&company.cik).await {
            Ok(submissions) => {
                company.sector = submissions.sector();
                company.industry = submissions.industry();
            }
            Err(e) => log::warn!("Could not fetch detailed info for CIK {}: {}", company.cik, e),
        }
        Ok(company)
    }
}
