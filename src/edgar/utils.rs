use reqwest::Client;
use url::Url;

use crate::error::{FilingsError, Result};
use crate::utils::rate_limit::RateLimiter;

/// GETs a JSON document and returns its body as text, holding one
/// connection permit for the duration of the call.
pub async fn fetch_json(client: &Client, url: &Url, limiter: &RateLimiter) -> Result<String> {
    log::debug!("Fetching URL: {}", url);

    let _permit = limiter.acquire().await?;
    let response = client
        .get(url.as_str())
        .header(reqwest::header::ACCEPT, mime::APPLICATION_JSON.as_ref())
        .send()
        .await?;

    log::debug!("Response status: {}", response.status());

    if !response.status().is_success() {
        return Err(FilingsError::UpstreamUnavailable(format!(
            "{} returned status {}",
            url,
            response.status()
        )));
    }

    let content = response.text().await?;
    log::debug!("Received content length: {}", content.len());

    Ok(content)
}
