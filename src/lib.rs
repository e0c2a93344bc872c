pub mod api;
pub mod codec;
pub mod config;
pub mod dataset;
pub mod error;
pub mod logic;
pub mod model;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

// Export error types
pub use error::{Error, Result};

// Export logic types
pub use logic::{
    get_annotation, get_expression, get_scatter, get_vignettes, import_vignette, ingest_dataset,
    list_annotation_keys, list_buckets, validate_vignette, AnnotationBundle, ExpressionBundle,
    IngestParams,
};

// Export all model types
pub use model::*;

// Export store types
pub use store::{SqliteStore, Store};

/// Run the HTTP server with configuration from the environment. Also
/// used by integration tests.
pub async fn run_server() -> anyhow::Result<()> {
    use axum::serve;
    use std::sync::Arc;
    use tokio::net::TcpListener;

    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging with INFO level only (suppress DEBUG logs)
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    // Load configuration
    let config = crate::config::AppConfig::load()?;

    // Open the SQLite store and make sure the schema exists
    let database_url = config.database_url()?;
    let sqlite_store = crate::store::SqliteStore::new(&database_url).await?;
    sqlite_store.migrate().await?;

    let store = Arc::new(sqlite_store);

    // Create router with state
    let app = crate::api::routes::create_router().with_state(store);

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;

    serve(listener, app).await?;

    Ok(())
}
