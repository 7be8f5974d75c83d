//! HTTP handlers for cinema operations
//!
//! Handlers only pull the `Authorization` header and the request fields out
//! of the HTTP request; everything else happens in [`CinemaService`].

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use crate::core::error::CinemaError;
use crate::core::request::{CreateRequest, SearchRequest, UpdateRequest};
use crate::core::service::CinemaService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CinemaService>,
}

impl AppState {
    pub fn new(service: CinemaService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Success envelope: `{"status": ..., "data": ...}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: &'static str, data: T) -> Self {
        Self { status, data }
    }

    fn into_response_with(self, code: StatusCode) -> Response {
        (code, Json(self)).into_response()
    }
}

fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok())
}

/// Unwrap a JSON body, deferring a decode failure to the token check
async fn decoded<T>(
    state: &AppState,
    headers: &HeaderMap,
    operation: &'static str,
    body: Result<Json<T>, JsonRejection>,
) -> Result<T, CinemaError> {
    match body {
        Ok(Json(request)) => Ok(request),
        Err(rejection) => Err(state
            .service
            .reject_undecodable(operation, authorization(headers), rejection.body_text())
            .await),
    }
}

/// Search with location fields in the query string
///
/// GET /cines?tenant_id=...&departamento=...
pub async fn search_query(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<SearchRequest>, QueryRejection>,
) -> Result<Response, CinemaError> {
    let request = match query {
        Ok(Query(request)) => request,
        Err(rejection) => {
            return Err(state
                .service
                .reject_undecodable("search", authorization(&headers), rejection.body_text())
                .await);
        }
    };
    search(&state, &headers, request).await
}

/// Search with location fields in a JSON body
///
/// POST /cines/search
pub async fn search_body(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Response, CinemaError> {
    let request = decoded(&state, &headers, "search", body).await?;
    search(&state, &headers, request).await
}

async fn search(
    state: &AppState,
    headers: &HeaderMap,
    request: SearchRequest,
) -> Result<Response, CinemaError> {
    let records = state.service.search(authorization(headers), request).await?;
    Ok(ApiResponse::new("Search successful", records).into_response_with(StatusCode::OK))
}

/// Create or replace a cinema
///
/// POST /cines
pub async fn create_cinema(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<CreateRequest>, JsonRejection>,
) -> Result<Response, CinemaError> {
    let request = decoded(&state, &headers, "create", body).await?;
    let record = state.service.create(authorization(&headers), request).await?;
    Ok(ApiResponse::new("Cinema created", record).into_response_with(StatusCode::CREATED))
}

/// Update attributes of an existing cinema
///
/// PUT /cines, PATCH /cines
pub async fn update_cinema(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<Response, CinemaError> {
    let request = decoded(&state, &headers, "update", body).await?;
    let record = state.service.update(authorization(&headers), request).await?;
    Ok(ApiResponse::new("Cinema updated", record).into_response_with(StatusCode::OK))
}

/// Liveness check
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "cines-api"
    }))
}
