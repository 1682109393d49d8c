use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Query, Request, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use pdfmarkup::{ExtractOptions, FullTextReport, HighlightReport, Pdf, ResponseEnvelope};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::body::read_pdf;
use crate::config::Config;
use crate::error::{AppError, ErrorResponse};

pub const SERVICE_NAME: &str = "pdf-annotations";
pub const SERVICE_VERSION: &str = "1.5.0";

/// Shared per-process state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

/// Query parameters accepted by `/parse`.
///
/// Values are kept as strings so a malformed flag degrades to its default
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ParseQuery {
    pub compact: Option<String>,
    pub pages: Option<String>,
    pub truncate_span: Option<String>,
    pub debug: Option<String>,
}

impl ParseQuery {
    pub fn debug_enabled(&self) -> bool {
        flag(self.debug.as_deref())
    }

    pub fn options(&self, byte_budget: usize) -> ExtractOptions {
        ExtractOptions {
            compact: flag(self.compact.as_deref()),
            pages: self
                .pages
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
            truncate_span: self.truncate_span.as_deref().and_then(parse_digits),
            byte_budget,
            ..ExtractOptions::default()
        }
    }
}

/// Query parameters accepted by the report routes.
#[derive(Debug, Default, Deserialize)]
pub struct DebugQuery {
    pub debug: Option<String>,
}

fn flag(value: Option<&str>) -> bool {
    value == Some("1")
}

/// Only plain ASCII digits count; signs and whitespace are rejected.
fn parse_digits(value: &str) -> Option<usize> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// Build the application router with all routes configured.
pub fn app(config: Config) -> Router {
    let max_body = config.max_body;
    let state = AppState {
        config: Arc::new(config),
    };
    Router::new()
        .route("/", get(health_check))
        .route("/parse", post(parse_pdf))
        .route("/extract", post(extract_highlights))
        .route("/fulltext", post(fulltext))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check.
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": SERVICE_NAME,
        "version": SERVICE_VERSION,
    }))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Not Found".to_string(),
        }),
    )
}

/// Per-page text with markup, compact or full.
pub async fn parse_pdf(
    State(state): State<AppState>,
    Query(query): Query<ParseQuery>,
    request: Request,
) -> Result<Json<ResponseEnvelope>, AppError> {
    let debug = query.debug_enabled();
    let bytes = read_pdf(request, &state, state.config.max_body).await?;
    let options = query.options(state.config.byte_budget);

    let response = run_blocking(debug, move || {
        let pdf = Pdf::open(&bytes).map_err(AppError::Open)?;
        pdf.extract(&options)
            .map_err(|e| AppError::extraction(e, debug))
    })
    .await?;

    tracing::info!(
        page_count = response.meta.page_count,
        returned_pages = response.meta.returned_pages,
        compact = response.meta.compact,
        "parse done"
    );
    Ok(Json(response))
}

/// Text under every highlight annotation.
pub async fn extract_highlights(
    State(state): State<AppState>,
    Query(query): Query<DebugQuery>,
    request: Request,
) -> Result<Json<HighlightReport>, AppError> {
    let debug = flag(query.debug.as_deref());
    let bytes = read_pdf(request, &state, state.config.max_body).await?;

    let report = run_blocking(debug, move || {
        let pdf = Pdf::open(&bytes).map_err(AppError::Open)?;
        pdf.highlights().map_err(|e| AppError::extraction(e, debug))
    })
    .await?;

    tracing::info!(count = report.count, "extract done");
    Ok(Json(report))
}

/// Plain text per page.
pub async fn fulltext(
    State(state): State<AppState>,
    Query(query): Query<DebugQuery>,
    request: Request,
) -> Result<Json<FullTextReport>, AppError> {
    let debug = flag(query.debug.as_deref());
    let bytes = read_pdf(request, &state, state.config.max_body).await?;

    let report = run_blocking(debug, move || {
        let pdf = Pdf::open(&bytes).map_err(AppError::Open)?;
        pdf.fulltext().map_err(|e| AppError::extraction(e, debug))
    })
    .await?;

    tracing::info!(page_count = report.page_count, "fulltext done");
    Ok(Json(report))
}

/// Run CPU-bound extraction off the async workers.
async fn run_blocking<T, F>(debug: bool, work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal {
            kind: "JoinError",
            detail: e.to_string(),
            debug,
        })?
}
