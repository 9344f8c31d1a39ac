use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::core::{SearchRequest, SearchResult, SearchService};
use crate::edgar::tickers::FilerIdentity;
use crate::error::FilingsError;
use crate::relay::{self, RelayPolicy};
use crate::utils::rate_limit::RateLimiter;

pub const SERVICE_NAME: &str = "QuickFilings API";
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for FilingsError {
    fn into_response(self) -> Response {
        let status = match &self {
            FilingsError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            FilingsError::NotFound(_) => StatusCode::NOT_FOUND,
            FilingsError::UpstreamUnavailable(_) | FilingsError::UpstreamMalformed(_) => {
                StatusCode::BAD_GATEWAY
            }
        };
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SearchService>,
    pub http_client: Client,
    pub limiter: RateLimiter,
    pub relay_policy: RelayPolicy,
}

#[derive(Debug, Deserialize)]
pub struct RelayQuery {
    url: String,
    filename: Option<String>,
}

async fn root() -> impl IntoResponse {
    Json(json!({
        "service": SERVICE_NAME,
        "version": SERVICE_VERSION,
        "description": "SEC filings and presentations download service",
        "endpoints": {
            "/health": "Health check",
            "/search": "Search company filings (POST)",
            "/companies/{ticker}": "Get company info by ticker",
            "/proxy": "Stream a filing document inline",
            "/download": "Download a filing document as an attachment"
        }
    }))
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Local::now().to_rfc3339(),
        "service": SERVICE_NAME,
        "version": SERVICE_VERSION
    }))
}

async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResult>, FilingsError> {
    Ok(Json(state.service.search(&request).await?))
}

async fn company(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<FilerIdentity>, FilingsError> {
    Ok(Json(state.service.company(&ticker).await?))
}

async fn relay_response(
    state: &AppState,
    query: &RelayQuery,
    attachment: bool,
) -> Result<Response, FilingsError> {
    let url = state.relay_policy.validate(&query.url)?;
    let body = relay::open(&state.http_client, &state.limiter, &url).await?;

    if attachment {
        let filename = relay::attachment_filename(&url, query.filename.as_deref());
        Ok((
            [
                (header::CONTENT_TYPE, body.content_type),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", filename),
                ),
            ],
            Body::from_stream(body.stream),
        )
            .into_response())
    } else {
        Ok((
            [(header::CONTENT_TYPE, body.content_type)],
            Body::from_stream(body.stream),
        )
            .into_response())
    }
}

async fn proxy(
    State(state): State<AppState>,
    Query(query): Query<RelayQuery>,
) -> Result<Response, FilingsError> {
    relay_response(&state, &query, false).await
}

async fn download(
    State(state): State<AppState>,
    Query(query): Query<RelayQuery>,
) -> Result<Response, FilingsError> {
    relay_response(&state, &query, true).await
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/search", post(search))
        .route("/companies/:ticker", get(company))
        .route(relay::PROXY_PATH, get(proxy))
        .route(relay::DOWNLOAD_PATH, get(download))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
