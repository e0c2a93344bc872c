use axum::{routing::get, Router};
use std::sync::Arc;

use crate::api::handlers;
use crate::store::Store;

pub fn create_router<S: Store + 'static>() -> Router<Arc<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Buckets
        .route("/buckets", get(handlers::get_buckets::<S>))
        // Annotations
        .route(
            "/annotation_list/:bucket_slug",
            get(handlers::get_annotation_list::<S>),
        )
        .route(
            "/annotation/:bucket_slug/:annotation_slug",
            get(handlers::get_annotation_values::<S>),
        )
        // Gene expression
        .route(
            "/expression/:bucket_slug/:gene",
            get(handlers::get_expression_values::<S>),
        )
        // Embeddings
        .route("/umap/:bucket_slug", get(handlers::get_umap_coordinates::<S>))
        .route("/tsne/:bucket_slug", get(handlers::get_tsne_coordinates::<S>))
        // Vignettes
        .route("/vignettes/:bucket_slug", get(handlers::get_vignettes::<S>))
}
