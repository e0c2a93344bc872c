use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub connection_string: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            connection_string: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, an optional `config` file and
    /// `CELLBUCKET_`-prefixed environment variables.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        config = config.add_source(config::Config::try_from(&AppConfig::default())?);
        config = config.add_source(config::File::with_name("config").required(false));
        config = config.add_source(
            config::Environment::with_prefix("CELLBUCKET")
                .separator("_")
                .prefix_separator("_"),
        );

        let config = config.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        Ok(app_config)
    }

    /// Get the database URL from config or environment
    pub fn database_url(&self) -> anyhow::Result<String> {
        if let Some(connection_string) = &self.database.connection_string {
            return Ok(connection_string.clone());
        }

        if let Ok(url) = std::env::var("DATABASE_URL") {
            return Ok(url);
        }

        // Default for local development
        Ok("sqlite://cellbucket.db".to_string())
    }

    /// Get the server bind address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Import parameters for one dataset, loaded from a TOML file. Parsed
/// once into a typed structure; downstream code never re-checks field
/// presence.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    pub dataset: DatasetSection,
    pub genes: Option<GenesSection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetSection {
    pub file_name: String,
    pub description: Option<String>,
    pub url: Option<String>,
    /// Explicit bucket slug; defaults to the normalized base file name.
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenesSection {
    /// Comma-separated gene allow-list.
    pub gene_list: String,
}

impl DatasetConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .build()?;
        let dataset_config: DatasetConfig = config.try_deserialize()?;
        Ok(dataset_config)
    }

    /// The effective gene allow-list; empty means import every gene.
    pub fn gene_list(&self) -> Vec<String> {
        match &self.genes {
            Some(genes) => genes
                .gene_list
                .split(',')
                .map(|gene| gene.trim().to_string())
                .filter(|gene| !gene.is_empty())
                .collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::TempPath {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.into_temp_path()
    }

    #[test]
    fn loads_dataset_config_with_genes() {
        let path = write_config(
            r#"
            [dataset]
            file_name = "fixtures/brain-atlas-mini.json"
            description = "Mini test dataset"
            url = "https://example.org/brain-atlas"

            [genes]
            gene_list = "Egfr, P2ry12, Serpina1c"
            "#,
        );
        let config = DatasetConfig::load(&path).unwrap();
        assert_eq!(config.dataset.file_name, "fixtures/brain-atlas-mini.json");
        assert_eq!(
            config.dataset.description.as_deref(),
            Some("Mini test dataset")
        );
        assert_eq!(config.dataset.slug, None);
        assert_eq!(config.gene_list(), vec!["Egfr", "P2ry12", "Serpina1c"]);
    }

    #[test]
    fn missing_genes_section_means_all_genes() {
        let path = write_config(
            r#"
            [dataset]
            file_name = "fixtures/brain-atlas-mini.json"
            "#,
        );
        let config = DatasetConfig::load(&path).unwrap();
        assert!(config.gene_list().is_empty());
    }

    #[test]
    fn missing_dataset_section_is_an_error() {
        let path = write_config("[genes]\ngene_list = \"Egfr\"\n");
        assert!(DatasetConfig::load(&path).is_err());
    }
}
