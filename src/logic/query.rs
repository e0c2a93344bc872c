//! Query layer: slug-based lookups over the encoded rows, decoded into
//! typed response bundles. Every operation resolves the bucket slug
//! first and fails fast with `NotFound` when it is unresolved.

use std::collections::HashSet;

use serde::Serialize;

use crate::codec;
use crate::error::{Error, Result};
use crate::model::{
    normalize, AnnotationKey, AnnotationType, Bucket, Coordinate, ScatterPlotType,
};
use crate::store::Store;

/// Full decoded view of one observation annotation.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotationBundle {
    pub label: String,
    pub slug: String,
    pub values_distinct: Vec<String>,
    pub values_ordered: Vec<String>,
}

/// Full decoded view of one gene's expression vector.
#[derive(Debug, Clone, Serialize)]
pub struct ExpressionBundle {
    pub gene: String,
    pub max_expression: f64,
    pub values_ordered: Vec<f64>,
}

async fn resolve_bucket<S: Store>(store: &S, bucket_slug: &str) -> Result<Bucket> {
    store
        .get_bucket_by_slug(bucket_slug)
        .await?
        .ok_or_else(|| Error::not_found(format!("bucket '{}'", bucket_slug)))
}

/// All buckets, unordered.
pub async fn list_buckets<S: Store>(store: &S) -> Result<Vec<Bucket>> {
    store.list_buckets().await
}

/// (slug, label) pairs of the bucket's observation annotations, ordered
/// by slug. A bucket with zero observation annotations is reported as
/// `NotFound`, matching the list-variant API contract.
pub async fn list_annotation_keys<S: Store>(
    store: &S,
    bucket_slug: &str,
) -> Result<Vec<AnnotationKey>> {
    let bucket = resolve_bucket(store, bucket_slug).await?;
    let keys = store
        .list_annotation_keys(bucket.id, AnnotationType::Other)
        .await?;
    if keys.is_empty() {
        return Err(Error::not_found(format!(
            "annotations for bucket '{}'",
            bucket_slug
        )));
    }
    Ok(keys)
}

/// One observation annotation, decoded, with its distinct values in
/// natural (case-insensitive, numeric-aware) order.
pub async fn get_annotation<S: Store>(
    store: &S,
    bucket_slug: &str,
    annotation_slug: &str,
) -> Result<AnnotationBundle> {
    let bucket = resolve_bucket(store, bucket_slug).await?;
    let annotation = store
        .get_annotation(bucket.id, annotation_slug, AnnotationType::Other)
        .await?
        .ok_or_else(|| Error::not_found(format!("annotation '{}'", annotation_slug)))?;

    let values_ordered = codec::decode_values(&annotation.value_list);
    let distinct: HashSet<&String> = values_ordered.iter().collect();
    let mut values_distinct: Vec<String> = distinct.into_iter().cloned().collect();
    values_distinct.sort_by(|a, b| natord::compare_ignore_case(a, b));

    Ok(AnnotationBundle {
        label: annotation.label,
        slug: annotation.slug,
        values_distinct,
        values_ordered,
    })
}

/// One gene's expression vector and its maximum. The symbol is
/// normalized before matching the stored slug, so the lookup is
/// case-insensitive.
pub async fn get_expression<S: Store>(
    store: &S,
    bucket_slug: &str,
    gene: &str,
) -> Result<ExpressionBundle> {
    let bucket = resolve_bucket(store, bucket_slug).await?;
    let annotation = store
        .get_annotation(bucket.id, &normalize(gene), AnnotationType::GeneExpression)
        .await?
        .ok_or_else(|| Error::not_found(format!("gene '{}'", gene)))?;

    let values_ordered = codec::decode_numeric(&annotation.value_list)?;
    let max_expression = values_ordered
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);

    Ok(ExpressionBundle {
        gene: gene.to_string(),
        max_expression,
        values_ordered,
    })
}

/// Decoded (x, y) pairs of the bucket's embedding of the given kind.
pub async fn get_scatter<S: Store>(
    store: &S,
    bucket_slug: &str,
    kind: ScatterPlotType,
) -> Result<Vec<Coordinate>> {
    let bucket = resolve_bucket(store, bucket_slug).await?;
    let scatter_plot = store
        .get_scatter_plot(bucket.id, kind)
        .await?
        .ok_or_else(|| {
            Error::not_found(format!(
                "{} scatter plot for bucket '{}'",
                kind.as_str(),
                bucket_slug
            ))
        })?;

    let pairs = codec::decode_coordinates(&scatter_plot.coordinate_list)?;
    Ok(pairs.into_iter().map(|(x, y)| Coordinate { x, y }).collect())
}

/// The stored vignette body for the bucket, verbatim. Not re-validated
/// at read time.
pub async fn get_vignettes<S: Store>(store: &S, bucket_slug: &str) -> Result<String> {
    let bucket = resolve_bucket(store, bucket_slug).await?;
    let vignette = store
        .get_vignette(bucket.id)
        .await?
        .ok_or_else(|| Error::not_found(format!("vignettes for bucket '{}'", bucket_slug)))?;
    Ok(vignette.json)
}
