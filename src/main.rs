use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use cellbucket::api::routes::create_router;
use cellbucket::config::{AppConfig, DatasetConfig};
use cellbucket::dataset::{downsample::downsample, Dataset};
use cellbucket::logic::{import_vignette, ingest_dataset, IngestParams};
use cellbucket::store::SqliteStore;

#[derive(Parser)]
#[command(
    name = "cellbucket",
    about = "Single-cell expression dataset store and query server"
)]
struct Cli {
    /// Enable verbose logging
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP query server
    Serve,
    /// Ingest a dataset described by a dataset config file
    AddDataset { config_file: PathBuf },
    /// Validate and import a vignette document
    AddVignette { vignette_file: PathBuf },
    /// Write a reduced copy of a dataset, for test fixtures
    Downsample {
        config_file: PathBuf,
        output_file: PathBuf,
        /// Number of cells to keep
        #[arg(long, default_value_t = 100)]
        num_cells: usize,
    },
    /// Drop and recreate all tables
    ResetDb,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging with explicit filter to suppress sqlx debug logs
    use env_logger::Builder;
    use log::LevelFilter;

    let level = if cli.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };
    Builder::new()
        .filter_level(level)
        .filter_module("sqlx", LevelFilter::Warn)
        .init();

    match cli.command {
        Command::Serve => serve().await,
        Command::AddDataset { config_file } => add_dataset(&config_file).await,
        Command::AddVignette { vignette_file } => add_vignette(&vignette_file).await,
        Command::Downsample {
            config_file,
            output_file,
            num_cells,
        } => run_downsample(&config_file, &output_file, num_cells),
        Command::ResetDb => reset_db().await,
    }
}

async fn open_store() -> anyhow::Result<SqliteStore> {
    let config = AppConfig::load()?;
    let database_url = config.database_url()?;
    let store = SqliteStore::new(&database_url).await?;
    store.migrate().await?;
    Ok(store)
}

async fn serve() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    println!(
        "Configuration loaded: server={}:{}",
        config.server.host, config.server.port
    );

    let database_url = config.database_url()?;
    println!("Opening SQLite store at {}", database_url);
    let store = SqliteStore::new(&database_url).await?;
    store.migrate().await?;

    let app = create_router().with_state(Arc::new(store));

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    println!("cellbucket server running on http://{}", bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn add_dataset(config_file: &Path) -> anyhow::Result<()> {
    println!("Adding data from config file: {}.", config_file.display());
    let dataset_config = DatasetConfig::load(config_file)?;

    let file_name = &dataset_config.dataset.file_name;
    let dataset = Dataset::read_json(file_name)
        .with_context(|| format!("failed to read dataset '{}'", file_name))?;
    let base_name = Path::new(file_name)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| file_name.clone());

    let store = open_store().await?;
    let params = IngestParams {
        name: base_name,
        slug: dataset_config.dataset.slug.clone(),
        description: dataset_config.dataset.description.clone(),
        url: dataset_config.dataset.url.clone(),
        gene_list: dataset_config.gene_list(),
    };
    let bucket = ingest_dataset(&store, &dataset, &params).await?;
    println!("Done! Created bucket '{}' (id {}).", bucket.slug, bucket.id);
    Ok(())
}

async fn add_vignette(vignette_file: &Path) -> anyhow::Result<()> {
    println!("Importing vignette: {}.", vignette_file.display());
    let body = std::fs::read_to_string(vignette_file)
        .with_context(|| format!("failed to read '{}'", vignette_file.display()))?;
    let document: serde_json::Value = serde_json::from_str(&body)?;

    let store = open_store().await?;
    let id = import_vignette(&store, &document).await?;
    println!("Done! Created vignette {}.", id);
    Ok(())
}

fn run_downsample(config_file: &Path, output_file: &Path, num_cells: usize) -> anyhow::Result<()> {
    println!("Using config file: {}.", config_file.display());
    let dataset_config = DatasetConfig::load(config_file)?;

    let dataset = Dataset::read_json(&dataset_config.dataset.file_name)?;
    let reduced = downsample(&dataset, num_cells, &dataset_config.gene_list())?;
    reduced.write_json(output_file)?;
    println!("Writing new data to: {}.", output_file.display());
    Ok(())
}

async fn reset_db() -> anyhow::Result<()> {
    println!("Resetting database to a clean slate.");
    let store = open_store().await?;
    store.reset().await?;
    println!("Done!");
    Ok(())
}
