//! End-to-end tests: ingest the fixture dataset into an in-memory store
//! and exercise every query operation against it.

use cellbucket::dataset::Dataset;
use cellbucket::logic::{
    get_annotation, get_expression, get_scatter, get_vignettes, import_vignette,
    ingest_dataset, list_annotation_keys, list_buckets, IngestParams,
};
use cellbucket::store::{SqliteStore, VignetteStore};
use cellbucket::{Error, ScatterPlotType};

const FIXTURE: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/brain-atlas-mini.json"
);
const VIGNETTE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/vignette_valid.json");

fn fixture() -> Dataset {
    Dataset::read_json(FIXTURE).unwrap()
}

fn select_gene_params() -> IngestParams {
    IngestParams {
        name: "brain-atlas-mini.json".to_string(),
        slug: None,
        description: Some("Mini test dataset".to_string()),
        url: Some("https://example.org/brain-atlas".to_string()),
        gene_list: vec![
            "Egfr".to_string(),
            "P2ry12".to_string(),
            "Serpina1c".to_string(),
        ],
    }
}

async fn loaded_store() -> SqliteStore {
    let store = SqliteStore::in_memory().await.unwrap();
    store.migrate().await.unwrap();
    ingest_dataset(&store, &fixture(), &select_gene_params())
        .await
        .unwrap();
    store
}

#[tokio::test]
async fn bucket_listing() {
    let store = loaded_store().await;
    let buckets = list_buckets(&store).await.unwrap();
    assert_eq!(buckets.len(), 1);
    let bucket = &buckets[0];
    assert_eq!(bucket.name, "brain-atlas-mini.json");
    assert_eq!(bucket.slug, "brain_atlas_mini");
    assert_eq!(bucket.description.as_deref(), Some("Mini test dataset"));
    assert_eq!(
        bucket.url.as_deref(),
        Some("https://example.org/brain-atlas")
    );
}

#[tokio::test]
async fn annotation_keys_are_filtered_and_ordered() {
    let store = loaded_store().await;
    let keys = list_annotation_keys(&store, "brain_atlas_mini").await.unwrap();

    // 12 obs columns, 3 skipped by the cardinality filter.
    assert_eq!(keys.len(), 9);
    assert_eq!(keys[0].slug, "cell_ontology_class");
    assert_eq!(keys[1].slug, "clusters_from_manuscript");
    assert_eq!(keys[8].slug, "tissue");
    assert_eq!(keys[0].label, "cell_ontology_class");

    let err = list_annotation_keys(&store, "no_such_bucket")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn annotation_bundle_decodes_and_sorts() {
    let store = loaded_store().await;
    let bundle = get_annotation(&store, "brain_atlas_mini", "cell_ontology_class")
        .await
        .unwrap();

    assert_eq!(bundle.label, "cell_ontology_class");
    assert_eq!(bundle.values_ordered.len(), 100);
    assert_eq!(bundle.values_ordered[0], "epidermal cell");
    assert_eq!(bundle.values_ordered[1], "endothelial cell");

    assert_eq!(bundle.values_distinct.len(), 37);
    assert_eq!(bundle.values_distinct[0], "astrocyte");
    assert_eq!(bundle.values_distinct[1], "B cell");

    let err = get_annotation(&store, "brain_atlas_mini", "no_such_annotation")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn distinct_values_use_natural_order() {
    let store = loaded_store().await;
    let bundle = get_annotation(&store, "brain_atlas_mini", "clusters_from_manuscript")
        .await
        .unwrap();

    // "2" sorts before "10" under natural ordering.
    let expected: Vec<String> = (0..=10).map(|n| n.to_string()).collect();
    assert_eq!(bundle.values_distinct, expected);
}

#[tokio::test]
async fn expression_bundle_is_case_insensitive() {
    let store = loaded_store().await;

    for symbol in ["Egfr", "EGFR", "egfr"] {
        let bundle = get_expression(&store, "brain_atlas_mini", symbol)
            .await
            .unwrap();
        assert_eq!(bundle.gene, symbol);
        assert_eq!(bundle.values_ordered.len(), 100);
        assert_eq!(bundle.values_ordered[0], 0.6931472);
        assert_eq!(bundle.values_ordered[1], 0.6931472);
        assert_eq!(bundle.values_ordered[2], 4.1136827);
        assert_eq!(bundle.max_expression, 4.1136827);
    }

    // Actb exists in the dataset but was not in the allow-list.
    let err = get_expression(&store, "brain_atlas_mini", "Actb")
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = get_expression(&store, "no_such_bucket", "Egfr")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn annotation_namespaces_do_not_shadow() {
    let store = loaded_store().await;

    // An obs column cannot be fetched through the expression lookup...
    let err = get_expression(&store, "brain_atlas_mini", "cell_ontology_class")
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    // ...and a gene cannot be fetched through the annotation lookup.
    let err = get_annotation(&store, "brain_atlas_mini", "egfr")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn scatter_plots_decode_in_row_order() {
    let store = loaded_store().await;

    let umap = get_scatter(&store, "brain_atlas_mini", ScatterPlotType::Umap)
        .await
        .unwrap();
    assert_eq!(umap.len(), 100);
    assert!((umap[0].x - -0.437479).abs() < 1e-9);
    assert!((umap[0].y - 13.087562).abs() < 1e-9);

    let tsne = get_scatter(&store, "brain_atlas_mini", ScatterPlotType::Tsne)
        .await
        .unwrap();
    assert_eq!(tsne.len(), 100);
    assert!((tsne[0].x - -43.720875).abs() < 1e-9);
    assert!((tsne[0].y - -48.974918).abs() < 1e-9);

    let err = get_scatter(&store, "no_such_bucket", ScatterPlotType::Umap)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn all_genes_are_imported_without_allow_list() {
    let store = SqliteStore::in_memory().await.unwrap();
    store.migrate().await.unwrap();
    let params = IngestParams {
        gene_list: vec![],
        ..select_gene_params()
    };
    ingest_dataset(&store, &fixture(), &params).await.unwrap();

    let bundle = get_expression(&store, "brain_atlas_mini", "Actb")
        .await
        .unwrap();
    assert_eq!(bundle.values_ordered.len(), 100);
}

#[tokio::test]
async fn explicit_slug_overrides_derived_slug() {
    let store = SqliteStore::in_memory().await.unwrap();
    store.migrate().await.unwrap();
    let params = IngestParams {
        slug: Some("custom_slug".to_string()),
        ..select_gene_params()
    };
    ingest_dataset(&store, &fixture(), &params).await.unwrap();

    assert!(list_annotation_keys(&store, "custom_slug").await.is_ok());
    assert!(list_annotation_keys(&store, "brain_atlas_mini")
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn vignette_import_and_readback() {
    let store = loaded_store().await;

    let body = std::fs::read_to_string(VIGNETTE).unwrap();
    let document: serde_json::Value = serde_json::from_str(&body).unwrap();
    import_vignette(&store, &document).await.unwrap();

    let stored = get_vignettes(&store, "brain_atlas_mini").await.unwrap();
    let restored: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(restored["bucket_slug"], "brain_atlas_mini");
    assert_eq!(restored["vignettes"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn vignette_import_rejects_bad_documents_before_writing() {
    let store = loaded_store().await;
    let bucket_id = 1;

    // Unknown bucket slug.
    let document = serde_json::json!({
        "bucket_slug": "no_such_bucket",
        "slug": "tour",
        "label": "Tour"
    });
    let err = import_vignette(&store, &document).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    // Schema violation.
    let document = serde_json::json!({ "bucket_slug": "brain_atlas_mini" });
    let err = import_vignette(&store, &document).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    // Nothing was persisted by either attempt.
    assert!(store.get_vignette(bucket_id).await.unwrap().is_none());
    let err = get_vignettes(&store, "brain_atlas_mini").await.unwrap_err();
    assert!(err.is_not_found());
}
