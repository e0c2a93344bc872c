use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::Error;
use crate::logic::query;
use crate::logic::{AnnotationBundle, ExpressionBundle};
use crate::model::{AnnotationKey, Bucket, Coordinate, ScatterPlotType};
use crate::store::Store;

pub type AppState<S> = Arc<S>;

type ApiError = (StatusCode, Json<ErrorResponse>);

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

fn error_response(error: Error) -> ApiError {
    let status = match &error {
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        Error::Integrity(_) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse::new(&error.to_string())))
}

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

pub async fn get_buckets<S: Store>(
    State(store): State<AppState<S>>,
) -> Result<Json<Vec<Bucket>>, ApiError> {
    query::list_buckets(&*store)
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn get_annotation_list<S: Store>(
    State(store): State<AppState<S>>,
    Path(bucket_slug): Path<String>,
) -> Result<Json<Vec<AnnotationKey>>, ApiError> {
    query::list_annotation_keys(&*store, &bucket_slug)
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn get_annotation_values<S: Store>(
    State(store): State<AppState<S>>,
    Path((bucket_slug, annotation_slug)): Path<(String, String)>,
) -> Result<Json<AnnotationBundle>, ApiError> {
    query::get_annotation(&*store, &bucket_slug, &annotation_slug)
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn get_expression_values<S: Store>(
    State(store): State<AppState<S>>,
    Path((bucket_slug, gene)): Path<(String, String)>,
) -> Result<Json<ExpressionBundle>, ApiError> {
    query::get_expression(&*store, &bucket_slug, &gene)
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn get_umap_coordinates<S: Store>(
    State(store): State<AppState<S>>,
    Path(bucket_slug): Path<String>,
) -> Result<Json<Vec<Coordinate>>, ApiError> {
    query::get_scatter(&*store, &bucket_slug, ScatterPlotType::Umap)
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn get_tsne_coordinates<S: Store>(
    State(store): State<AppState<S>>,
    Path(bucket_slug): Path<String>,
) -> Result<Json<Vec<Coordinate>>, ApiError> {
    query::get_scatter(&*store, &bucket_slug, ScatterPlotType::Tsne)
        .await
        .map(Json)
        .map_err(error_response)
}

/// The stored vignette body is already serialized JSON; return it
/// verbatim instead of re-encoding it.
pub async fn get_vignettes<S: Store>(
    State(store): State<AppState<S>>,
    Path(bucket_slug): Path<String>,
) -> Result<([(header::HeaderName, &'static str); 1], String), ApiError> {
    query::get_vignettes(&*store, &bucket_slug)
        .await
        .map(|body| ([(header::CONTENT_TYPE, "application/json")], body))
        .map_err(error_response)
}
