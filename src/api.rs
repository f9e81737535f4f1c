//! HTTP/JSON API.
//!
//! | Method | Path                  | Response                 |
//! |--------|-----------------------|--------------------------|
//! | POST   | `/emi/calculate`      | `EmiResponse`            |
//! | GET    | `/emi/id/:id`         | `EmiResponse`            |
//! | GET    | `/emi/email/:email`   | `[EmiResponse]`          |
//! | GET    | `/health`             | `{"status": "ok"}`       |
//!
//! Failures are rendered as [`ApiError`] bodies.

use crate::amount::Money;
use crate::error::{EmiError, Result};
use crate::record::{EmiRecord, RecordId};
use crate::request::EmiCalculationInput;
use crate::service::EmiService;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::{error, info, warn};
use serde::Serialize;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

/// Message returned after a successful calculation.
pub const CALCULATED_MESSAGE: &str = "EMI calculated and saved successfully";

/// Message returned after a successful lookup.
pub const FETCHED_MESSAGE: &str = "EMI fetched successfully";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EmiService>,
}

impl AppState {
    pub fn new(service: EmiService) -> Self {
        AppState {
            service: Arc::new(service),
        }
    }
}

/// Successful response for a stored record.
#[derive(Debug, Serialize)]
pub struct EmiResponse {
    pub id: RecordId,
    pub emi: Money,
    pub message: &'static str,
}

impl EmiResponse {
    fn from_record(record: &EmiRecord, message: &'static str) -> Self {
        EmiResponse {
            id: record.id,
            emi: record.emi,
            message,
        }
    }
}

/// Structured error body.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub message: String,
    pub details: Vec<String>,
}

impl ApiError {
    fn new(message: impl Into<String>, details: Vec<String>) -> Self {
        ApiError {
            message: message.into(),
            details,
        }
    }
}

impl IntoResponse for EmiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            EmiError::Validation(violations) => (
                StatusCode::BAD_REQUEST,
                ApiError::new(
                    "Validation Failed",
                    violations.iter().map(|v| v.to_string()).collect(),
                ),
            ),
            EmiError::MalformedRequest(reason) => (
                StatusCode::BAD_REQUEST,
                ApiError::new("Malformed Request", vec![reason]),
            ),
            EmiError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                ApiError::new(self.to_string(), Vec::new()),
            ),
            EmiError::Calculation(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("Calculation Failed", vec![e.to_string()]),
            ),
            other => {
                error!("Request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("Internal Server Error", Vec::new()),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Create the API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/emi/calculate", post(calculate_emi))
        .route("/emi/id/:id", get(get_emi_by_id))
        .route("/emi/email/:email", get(get_emis_by_email))
        .route("/health", get(health_check))
        .with_state(state)
}

/// Serves `router` on `addr` until `shutdown` resolves.
pub async fn serve<F>(router: Router, addr: SocketAddr, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("EMI API listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("EMI API stopped");
    Ok(())
}

/// Runs a store-bound closure off the async executor.
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| EmiError::Task(e.to_string()))?
}

async fn calculate_emi(
    State(state): State<AppState>,
    payload: std::result::Result<Json<EmiCalculationInput>, JsonRejection>,
) -> Result<Json<EmiResponse>> {
    let Json(input) = payload.map_err(|rejection| {
        warn!("Rejected calculation request: {}", rejection.body_text());
        EmiError::MalformedRequest(rejection.body_text())
    })?;

    let violations = input.validate();
    if !violations.is_empty() {
        warn!("Rejected calculation request: {} invalid field(s)", violations.len());
        return Err(EmiError::Validation(violations));
    }

    let service = Arc::clone(&state.service);
    let record = run_blocking(move || service.calculate_and_save(&input)).await?;
    Ok(Json(EmiResponse::from_record(&record, CALCULATED_MESSAGE)))
}

async fn get_emi_by_id(
    State(state): State<AppState>,
    id: std::result::Result<Path<RecordId>, PathRejection>,
) -> Result<Json<EmiResponse>> {
    let Path(id) = id.map_err(|rejection| EmiError::MalformedRequest(rejection.body_text()))?;

    let service = Arc::clone(&state.service);
    let record = run_blocking(move || service.find_by_id(id)).await?;
    Ok(Json(EmiResponse::from_record(&record, FETCHED_MESSAGE)))
}

async fn get_emis_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<EmiResponse>>> {
    let service = Arc::clone(&state.service);
    let records = run_blocking(move || service.find_by_email(&email)).await?;
    Ok(Json(
        records
            .iter()
            .map(|r| EmiResponse::from_record(r, FETCHED_MESSAGE))
            .collect(),
    ))
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
