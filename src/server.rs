use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::audit::runner::CommandRunner;
use crate::audit::{AuditContext, run_all_automated};
use crate::checklist::{AUTOMATED_SECTIONS, MANUAL_SECTIONS, is_manual_key};
use crate::model::{ManualVerdict, ReportFilter, ResultsDocument};
use crate::report::generate_report;
use crate::store::ResultsStore;
use crate::util::now_utc_string;

const DASHBOARD_TEMPLATE: &str = include_str!("dashboard.html");

/// Shared server state. Handlers that write the results file take `writer`
/// first so runs, resets and manual updates never interleave.
pub struct AppState {
    pub ctx: AuditContext,
    pub store: ResultsStore,
    pub runner: Box<dyn CommandRunner>,
    writer: Mutex<()>,
}

impl AppState {
    pub fn new(ctx: AuditContext, store: ResultsStore, runner: Box<dyn CommandRunner>) -> Self {
        Self {
            ctx,
            store,
            runner,
            writer: Mutex::new(()),
        }
    }
}

pub type SharedState = Arc<AppState>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message),
            Self::Internal(err) => {
                let message = format!("{err:#}");
                warn!(error = %message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct ManualUpdate {
    pub key: String,
    pub value: ManualVerdict,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub filter: Option<String>,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/api/results", get(results))
        .route("/api/reset", post(reset))
        .route("/api/run", post(run_checks))
        .route("/api/manual", post(set_manual))
        .route("/api/report", get(report))
        .fallback(not_found)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            },
        ))
}

pub async fn serve(addr: SocketAddr, state: SharedState) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(
        address = %addr,
        results = %state.store.path().display(),
        dist = %state.ctx.dist.display(),
        "launch checklist dashboard listening"
    );
    axum::serve(listener, router(state))
        .await
        .context("dashboard server stopped unexpectedly")
}

fn render_dashboard() -> Result<String> {
    let manual = serde_json::to_string(MANUAL_SECTIONS).context("failed to encode manual sections")?;
    let automated =
        serde_json::to_string(&AUTOMATED_SECTIONS).context("failed to encode automated sections")?;
    Ok(DASHBOARD_TEMPLATE
        .replace("__MANUAL_SECTIONS__", &manual)
        .replace("__AUTOMATED_SECTIONS__", &automated))
}

async fn dashboard() -> Result<Html<String>, ApiError> {
    Ok(Html(render_dashboard()?))
}

async fn results(State(state): State<SharedState>) -> Json<ResultsDocument> {
    Json(state.store.load())
}

async fn reset(State(state): State<SharedState>) -> Result<Json<ResultsDocument>, ApiError> {
    let _writer = state.writer.lock().await;
    let document = state.store.reset()?;
    info!("results reset");
    Ok(Json(document))
}

async fn run_checks(State(state): State<SharedState>) -> Result<Json<ResultsDocument>, ApiError> {
    let _writer = state.writer.lock().await;
    let worker = Arc::clone(&state);
    let document = tokio::task::spawn_blocking(move || {
        run_all_automated(&worker.ctx, worker.runner.as_ref(), &worker.store)
    })
    .await
    .context("audit run task failed")??;
    Ok(Json(document))
}

async fn set_manual(
    State(state): State<SharedState>,
    payload: Result<Json<ManualUpdate>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(update) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    if !is_manual_key(&update.key) {
        return Err(ApiError::BadRequest(format!(
            "unknown manual item key: {}",
            update.key
        )));
    }

    let _writer = state.writer.lock().await;
    state.store.set_manual_verdict(&update.key, update.value)?;
    info!(key = %update.key, verdict = ?update.value, "manual verdict recorded");
    Ok(Json(json!({ "ok": true })))
}

async fn report(
    State(state): State<SharedState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ApiError> {
    let filter = query
        .filter
        .as_deref()
        .unwrap_or_default()
        .parse::<ReportFilter>()
        .map_err(|err| ApiError::BadRequest(err.to_string()))?;
    let body = generate_report(&state.store.load(), filter, &now_utc_string());
    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        body,
    )
        .into_response())
}

async fn not_found() -> ApiError {
    ApiError::NotFound("not found".to_string())
}
