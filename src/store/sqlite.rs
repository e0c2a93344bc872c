use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use crate::error::{Error, Result};
use crate::model::{
    Annotation, AnnotationKey, AnnotationType, Bucket, NewAnnotation, NewBucket, NewScatterPlot,
    NewVignette, ScatterPlot, ScatterPlotType, Vignette,
};
use crate::store::traits::{
    AnnotationStore, BucketStore, ScatterPlotStore, Store, VignetteStore,
};

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at the given URL.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// In-memory store for tests. A single never-recycled connection
    /// keeps the memory database alive for the pool's lifetime.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Create all tables if they do not exist.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS bucket (
                id INTEGER PRIMARY KEY,
                slug TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                description TEXT,
                url TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cellular_annotation (
                id INTEGER PRIMARY KEY,
                slug TEXT NOT NULL,
                label TEXT NOT NULL,
                type TEXT NOT NULL,
                value_list TEXT NOT NULL,
                bucket_id INTEGER NOT NULL REFERENCES bucket(id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS scatter_plot (
                id INTEGER PRIMARY KEY,
                type TEXT NOT NULL,
                coordinate_list TEXT NOT NULL,
                bucket_id INTEGER NOT NULL REFERENCES bucket(id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS vignette (
                id INTEGER PRIMARY KEY,
                bucket_id INTEGER NOT NULL REFERENCES bucket(id),
                json TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Drop every table and recreate the schema from scratch.
    pub async fn reset(&self) -> Result<()> {
        for table in ["vignette", "scatter_plot", "cellular_annotation", "bucket"] {
            sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
                .execute(&self.pool)
                .await?;
        }
        self.migrate().await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Map constraint failures onto the integrity branch of the taxonomy;
/// everything else stays a store error.
fn map_write_error(error: sqlx::Error, what: &str) -> Error {
    if let sqlx::Error::Database(ref db) = error {
        if matches!(
            db.kind(),
            sqlx::error::ErrorKind::UniqueViolation | sqlx::error::ErrorKind::ForeignKeyViolation
        ) {
            return Error::Integrity(format!("{}: {}", what, db.message()));
        }
    }
    Error::Store(error)
}

fn bucket_from_row(row: &sqlx::sqlite::SqliteRow) -> Bucket {
    Bucket {
        id: row.get("id"),
        slug: row.get("slug"),
        name: row.get("name"),
        description: row.get("description"),
        url: row.get("url"),
    }
}

#[async_trait::async_trait]
impl BucketStore for SqliteStore {
    async fn create_bucket(&self, bucket: NewBucket) -> Result<Bucket> {
        let result = sqlx::query(
            "INSERT INTO bucket (slug, name, description, url) VALUES (?, ?, ?, ?)",
        )
        .bind(&bucket.slug)
        .bind(&bucket.name)
        .bind(&bucket.description)
        .bind(&bucket.url)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "bucket"))?;

        Ok(Bucket {
            id: result.last_insert_rowid(),
            slug: bucket.slug,
            name: bucket.name,
            description: bucket.description,
            url: bucket.url,
        })
    }

    async fn get_bucket_by_slug(&self, slug: &str) -> Result<Option<Bucket>> {
        let row = sqlx::query(
            "SELECT id, slug, name, description, url FROM bucket WHERE slug = ?",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(bucket_from_row))
    }

    async fn list_buckets(&self) -> Result<Vec<Bucket>> {
        let rows = sqlx::query("SELECT id, slug, name, description, url FROM bucket")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(bucket_from_row).collect())
    }
}

#[async_trait::async_trait]
impl AnnotationStore for SqliteStore {
    async fn create_annotation(&self, annotation: NewAnnotation) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO cellular_annotation (slug, label, type, value_list, bucket_id)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&annotation.slug)
        .bind(&annotation.label)
        .bind(annotation.annotation_type.as_str())
        .bind(&annotation.value_list)
        .bind(annotation.bucket_id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "cellular_annotation"))?;

        Ok(result.last_insert_rowid())
    }

    async fn list_annotation_keys(
        &self,
        bucket_id: i64,
        annotation_type: AnnotationType,
    ) -> Result<Vec<AnnotationKey>> {
        let rows = sqlx::query(
            r#"
            SELECT slug, label FROM cellular_annotation
            WHERE bucket_id = ? AND type = ?
            ORDER BY slug
            "#,
        )
        .bind(bucket_id)
        .bind(annotation_type.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| AnnotationKey {
                slug: row.get("slug"),
                label: row.get("label"),
            })
            .collect())
    }

    async fn get_annotation(
        &self,
        bucket_id: i64,
        slug: &str,
        annotation_type: AnnotationType,
    ) -> Result<Option<Annotation>> {
        let row = sqlx::query(
            r#"
            SELECT id, slug, label, type, value_list, bucket_id FROM cellular_annotation
            WHERE bucket_id = ? AND slug = ? AND type = ?
            "#,
        )
        .bind(bucket_id)
        .bind(slug)
        .bind(annotation_type.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let stored_type: String = row.get("type");
        Ok(Some(Annotation {
            id: row.get("id"),
            slug: row.get("slug"),
            label: row.get("label"),
            annotation_type: AnnotationType::parse(&stored_type)?,
            value_list: row.get("value_list"),
            bucket_id: row.get("bucket_id"),
        }))
    }
}

#[async_trait::async_trait]
impl ScatterPlotStore for SqliteStore {
    async fn create_scatter_plot(&self, scatter_plot: NewScatterPlot) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO scatter_plot (type, coordinate_list, bucket_id) VALUES (?, ?, ?)",
        )
        .bind(scatter_plot.plot_type.as_str())
        .bind(&scatter_plot.coordinate_list)
        .bind(scatter_plot.bucket_id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "scatter_plot"))?;

        Ok(result.last_insert_rowid())
    }

    async fn get_scatter_plot(
        &self,
        bucket_id: i64,
        plot_type: ScatterPlotType,
    ) -> Result<Option<ScatterPlot>> {
        let row = sqlx::query(
            r#"
            SELECT id, type, coordinate_list, bucket_id FROM scatter_plot
            WHERE bucket_id = ? AND type = ?
            LIMIT 1
            "#,
        )
        .bind(bucket_id)
        .bind(plot_type.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let stored_type: String = row.get("type");
        Ok(Some(ScatterPlot {
            id: row.get("id"),
            plot_type: ScatterPlotType::parse(&stored_type)?,
            coordinate_list: row.get("coordinate_list"),
            bucket_id: row.get("bucket_id"),
        }))
    }
}

#[async_trait::async_trait]
impl VignetteStore for SqliteStore {
    async fn create_vignette(&self, vignette: NewVignette) -> Result<i64> {
        let result = sqlx::query("INSERT INTO vignette (bucket_id, json) VALUES (?, ?)")
            .bind(vignette.bucket_id)
            .bind(&vignette.json)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "vignette"))?;

        Ok(result.last_insert_rowid())
    }

    async fn get_vignette(&self, bucket_id: i64) -> Result<Option<Vignette>> {
        let row = sqlx::query("SELECT id, bucket_id, json FROM vignette WHERE bucket_id = ? LIMIT 1")
            .bind(bucket_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| Vignette {
            id: row.get("id"),
            bucket_id: row.get("bucket_id"),
            json: row.get("json"),
        }))
    }
}

impl Store for SqliteStore {}
