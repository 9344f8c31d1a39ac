use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore, SemaphorePermit};

use crate::error::{FilingsError, Result};

/// Process-wide ceiling on concurrent upstream connections.
///
/// Every call to a collaborator (identifier table, history, relayed document)
/// holds one permit for its whole duration.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    semaphore: Arc<Semaphore>,
}

impl RateLimiter {
    pub fn new(max_concurrent: usize) -> Self {
        RateLimiter {
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    pub async fn acquire(&self) -> Result<SemaphorePermit<'_>> {
        self.semaphore
            .acquire()
            .await
            .map_err(|_| FilingsError::UpstreamUnavailable("connection pool closed".to_string()))
    }

    /// Permit that can outlive the borrow, for calls whose body is streamed
    /// back after the handler returns.
    pub async fn acquire_owned(&self) -> Result<OwnedSemaphorePermit> {
        self.semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| FilingsError::UpstreamUnavailable("connection pool closed".to_string()))
    }

    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(10) // SEC allows 10 requests per second
    }
}
