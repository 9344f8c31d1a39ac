use log::debug;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use super::client::FilingFeed;
use super::names;
use super::tickers::{find_ticker, pad_cik, Exchange, FilerIdentity, Ticker};
use crate::error::{FilingsError, Result};

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

struct CachedIdentity {
    identity: FilerIdentity,
    expires_at: Instant,
}

/// Maps ticker symbols to filer identities, remembering each answer for
/// `ttl`. Expired entries are dropped whenever a fresh answer is stored.
///
/// Two requests racing on the same uncached symbol both go upstream and the
/// last one to finish overwrites the entry; both writes carry the same
/// identity.
pub struct IdentifierResolver {
    feed: Arc<dyn FilingFeed>,
    cache: RwLock<HashMap<Ticker, CachedIdentity>>,
    ttl: Duration,
}

impl IdentifierResolver {
    pub fn new(feed: Arc<dyn FilingFeed>, ttl: Duration) -> Self {
        Self {
            feed,
            cache: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub async fn resolve(&self, ticker: &Ticker) -> Result<FilerIdentity> {
        if let Some(cached) = self.cache.read().await.get(ticker) {
            if Instant::now() < cached.expires_at {
                debug!("Identity cache hit for {}", ticker);
                return Ok(cached.identity.clone());
            }
        }
        debug!("Identity cache miss for {}", ticker);

        let entries = self.feed.company_tickers().await?;
        let entry = find_ticker(&entries, ticker)
            .ok_or_else(|| FilingsError::NotFound(ticker.to_string()))?;

        let identity = FilerIdentity {
            name: names::display_name(ticker.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| entry.title.clone()),
            ticker: ticker.to_string(),
            cik: pad_cik(entry.cik_str),
            exchange: Exchange::guess(ticker),
            sector: None,
            industry: None,
        };

        let mut cache = self.cache.write().await;
        let now = Instant::now();
        cache.retain(|_, cached| now < cached.expires_at);
        cache.insert(
            ticker.clone(),
            CachedIdentity {
                identity: identity.clone(),
                expires_at: now + self.ttl,
            },
        );

        Ok(identity)
    }

    pub async fn cached_len(&self) -> usize {
        self.cache.read().await.len()
    }
}
