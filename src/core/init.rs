use anyhow::{anyhow, Result};
use std::sync::Arc;

use super::config::QuickFilingsConfig;
use super::service::SearchService;
use crate::api::AppState;
use crate::edgar::client::{build_http_client, EdgarClient, FilingFeed};
use crate::edgar::resolver::IdentifierResolver;
use crate::ir::IrSource;
use crate::relay::RelayPolicy;
use crate::utils::rate_limit::RateLimiter;

pub fn initialize_http_client(config: &QuickFilingsConfig) -> Result<reqwest::Client> {
    build_http_client(&config.user_agent, config.timeout)
        .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))
}

pub fn initialize_ir_source(config: &QuickFilingsConfig) -> Result<Option<IrSource>> {
    config
        .ir_documents
        .as_deref()
        .map(IrSource::load)
        .transpose()
}

/// Wires a search service around any feed.
pub fn initialize_service(
    config: &QuickFilingsConfig,
    feed: Arc<dyn FilingFeed>,
    ir: Option<IrSource>,
) -> SearchService {
    let resolver = IdentifierResolver::new(feed.clone(), config.cache_ttl);
    SearchService::new(feed, resolver, config.archive_root.clone())
        .with_ir_source(ir)
        .with_max_age_years(config.max_age_years)
}

/// Relay allowlist: the configured hosts plus every host the IR source
/// links to, so the links emitted for IR documents can be followed.
pub fn initialize_relay_policy(config: &QuickFilingsConfig, ir: Option<&IrSource>) -> RelayPolicy {
    let policy = RelayPolicy::new(config.relay_allowed_hosts.clone());
    match ir {
        Some(source) => policy.allow_hosts(source.hosts()),
        None => policy,
    }
}

fn assemble_app_state(
    config: &QuickFilingsConfig,
    http_client: reqwest::Client,
    limiter: RateLimiter,
    feed: Arc<dyn FilingFeed>,
    ir: Option<IrSource>,
) -> AppState {
    let relay_policy = initialize_relay_policy(config, ir.as_ref());
    AppState {
        service: Arc::new(initialize_service(config, feed, ir)),
        http_client,
        limiter,
        relay_policy,
    }
}

/// App state around any feed. The relay gets its own client built from the
/// same settings.
pub fn initialize_app_state_with(
    config: &QuickFilingsConfig,
    feed: Arc<dyn FilingFeed>,
    ir: Option<IrSource>,
) -> Result<AppState> {
    let http_client = initialize_http_client(config)?;
    let limiter = RateLimiter::new(config.max_connections);
    Ok(assemble_app_state(config, http_client, limiter, feed, ir))
}

/// Everything the HTTP server needs, talking to the real regulatory feed.
pub fn initialize_app_state(config: &QuickFilingsConfig) -> Result<AppState> {
    let http_client = initialize_http_client(config)?;
    let limiter = RateLimiter::new(config.max_connections);
    let feed: Arc<dyn FilingFeed> = Arc::new(EdgarClient::from_config(
        config,
        http_client.clone(),
        limiter.clone(),
    ));
    let ir = initialize_ir_source(config)?;
    Ok(assemble_app_state(config, http_client, limiter, feed, ir))
}
