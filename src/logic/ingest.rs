//! Dataset ingestion pipeline.
//!
//! Derives entities from an in-memory dataset and writes them through the
//! store, one insert per statement. Steps are independently committed: a
//! failure after step N leaves steps 1..N persisted. There is no global
//! rollback.

use std::collections::HashSet;

use log::info;

use crate::codec;
use crate::dataset::{Dataset, TSNE_KEY, UMAP_KEY};
use crate::error::{Error, Result};
use crate::model::{
    normalize, AnnotationType, Bucket, NewAnnotation, NewBucket, NewScatterPlot, ScatterPlotType,
};
use crate::store::Store;

/// Observation columns with this many or more distinct values are treated
/// as free-text/continuous fields and skipped. A cardinality heuristic,
/// not a type check.
pub const CARDINALITY_LIMIT: usize = 100;

/// Parameters of one ingestion run, resolved from the dataset config.
#[derive(Debug, Clone)]
pub struct IngestParams {
    /// Human-readable bucket name (source file base name).
    pub name: String,
    /// Explicit bucket slug; defaults to `normalize(name)`.
    pub slug: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    /// Gene allow-list; empty means import every gene in `var`.
    pub gene_list: Vec<String>,
}

/// Run the full pipeline: bucket, observation annotations, scatter
/// plots, gene expression. Returns the created bucket.
pub async fn ingest_dataset<S: Store>(
    store: &S,
    dataset: &Dataset,
    params: &IngestParams,
) -> Result<Bucket> {
    let bucket = persist_bucket(store, params).await?;
    persist_annotations(store, dataset, bucket.id).await?;
    persist_scatter_plots(store, dataset, bucket.id).await?;
    persist_expression(store, dataset, bucket.id, &params.gene_list).await?;
    Ok(bucket)
}

async fn persist_bucket<S: Store>(store: &S, params: &IngestParams) -> Result<Bucket> {
    let slug = params
        .slug
        .clone()
        .unwrap_or_else(|| normalize(&params.name));
    info!("Persisting bucket: {} (slug {})", params.name, slug);
    let bucket = store
        .create_bucket(NewBucket {
            slug,
            name: params.name.clone(),
            description: params.description.clone(),
            url: params.url.clone(),
        })
        .await?;
    info!("Got bucket ID: {}", bucket.id);
    Ok(bucket)
}

async fn persist_annotations<S: Store>(store: &S, dataset: &Dataset, bucket_id: i64) -> Result<()> {
    for column in &dataset.obs {
        let distinct: HashSet<&str> = column.values.iter().map(String::as_str).collect();
        if distinct.len() < CARDINALITY_LIMIT {
            info!("Persisting annotations: {}.", column.name);
            store
                .create_annotation(NewAnnotation {
                    slug: normalize(&column.name),
                    label: column.name.clone(),
                    annotation_type: AnnotationType::Other,
                    value_list: codec::encode_values(&column.values),
                    bucket_id,
                })
                .await?;
        } else {
            info!("Skipping annotations: {}.", column.name);
        }
    }
    Ok(())
}

async fn persist_scatter_plots<S: Store>(
    store: &S,
    dataset: &Dataset,
    bucket_id: i64,
) -> Result<()> {
    for (key, plot_type) in [
        (UMAP_KEY, ScatterPlotType::Umap),
        (TSNE_KEY, ScatterPlotType::Tsne),
    ] {
        if let Some(embedding) = dataset.embedding(key) {
            info!("Persisting: {}.", key);
            store
                .create_scatter_plot(NewScatterPlot {
                    plot_type,
                    coordinate_list: codec::encode_coordinates(&embedding.coordinates),
                    bucket_id,
                })
                .await?;
        }
    }
    Ok(())
}

async fn persist_expression<S: Store>(
    store: &S,
    dataset: &Dataset,
    bucket_id: i64,
    gene_list: &[String],
) -> Result<()> {
    let gene_index = dataset.gene_index();
    let effective_genes: Vec<&String> = if gene_list.is_empty() {
        dataset.var.iter().collect()
    } else {
        gene_list.iter().collect()
    };

    for gene in effective_genes {
        // A missing gene aborts the remaining gene steps; already
        // persisted genes stay in place.
        let index = *gene_index
            .get(gene.as_str())
            .ok_or_else(|| Error::Dataset(format!("gene '{}' not present in dataset", gene)))?;
        info!("Persisting: {}, index={}.", gene, index);
        let column = dataset.gene_column(index)?;
        store
            .create_annotation(NewAnnotation {
                slug: normalize(gene),
                label: gene.clone(),
                annotation_type: AnnotationType::GeneExpression,
                value_list: codec::encode_values(&column),
                bucket_id,
            })
            .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Embedding, ObsColumn};
    use crate::store::{AnnotationStore, BucketStore, SqliteStore};

    fn wide_dataset() -> Dataset {
        // 120 cells; "free_text" has one distinct value per cell and must
        // be skipped by the cardinality filter.
        let cells = 120;
        Dataset {
            x: (0..cells).map(|i| vec![i as f64 * 0.5]).collect(),
            obs: vec![
                ObsColumn {
                    name: "tissue".to_string(),
                    values: (0..cells)
                        .map(|i| if i % 2 == 0 { "brain" } else { "liver" }.to_string())
                        .collect(),
                },
                ObsColumn {
                    name: "free_text".to_string(),
                    values: (0..cells).map(|i| format!("note {}", i)).collect(),
                },
            ],
            obsm: vec![Embedding {
                key: UMAP_KEY.to_string(),
                coordinates: (0..cells).map(|i| (i as f64, -(i as f64))).collect(),
            }],
            var: vec!["Egfr".to_string()],
        }
    }

    async fn fresh_store() -> SqliteStore {
        let store = SqliteStore::in_memory().await.unwrap();
        store.migrate().await.unwrap();
        store
    }

    #[tokio::test]
    async fn cardinality_filter_skips_high_cardinality_columns() {
        let store = fresh_store().await;
        let dataset = wide_dataset();
        let bucket = ingest_dataset(
            &store,
            &dataset,
            &IngestParams {
                name: "wide.json".to_string(),
                slug: None,
                description: None,
                url: None,
                gene_list: vec![],
            },
        )
        .await
        .unwrap();

        let keys = store
            .list_annotation_keys(bucket.id, AnnotationType::Other)
            .await
            .unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].slug, "tissue");
    }

    #[tokio::test]
    async fn missing_gene_aborts_remaining_steps() {
        let store = fresh_store().await;
        let dataset = wide_dataset();
        let err = ingest_dataset(
            &store,
            &dataset,
            &IngestParams {
                name: "wide.json".to_string(),
                slug: None,
                description: None,
                url: None,
                gene_list: vec!["Egfr".to_string(), "Nope".to_string()],
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Dataset(_)));

        // The bucket and the gene persisted before the failure remain.
        let bucket = store.get_bucket_by_slug("wide").await.unwrap().unwrap();
        let egfr = store
            .get_annotation(bucket.id, "egfr", AnnotationType::GeneExpression)
            .await
            .unwrap();
        assert!(egfr.is_some());
    }

    #[tokio::test]
    async fn duplicate_bucket_slug_is_an_integrity_error() {
        let store = fresh_store().await;
        let dataset = wide_dataset();
        let params = IngestParams {
            name: "wide.json".to_string(),
            slug: None,
            description: None,
            url: None,
            gene_list: vec!["Egfr".to_string()],
        };
        ingest_dataset(&store, &dataset, &params).await.unwrap();
        let err = ingest_dataset(&store, &dataset, &params).await.unwrap_err();
        assert!(matches!(err, Error::Integrity(_)));
    }
}
