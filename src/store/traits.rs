use crate::error::Result;
use crate::model::{
    Annotation, AnnotationKey, AnnotationType, Bucket, NewAnnotation, NewBucket, NewScatterPlot,
    NewVignette, ScatterPlot, ScatterPlotType, Vignette,
};

#[async_trait::async_trait]
pub trait BucketStore: Send + Sync {
    /// Insert a bucket. A slug collision is an integrity violation.
    async fn create_bucket(&self, bucket: NewBucket) -> Result<Bucket>;
    async fn get_bucket_by_slug(&self, slug: &str) -> Result<Option<Bucket>>;
    async fn list_buckets(&self) -> Result<Vec<Bucket>>;
}

#[async_trait::async_trait]
pub trait AnnotationStore: Send + Sync {
    async fn create_annotation(&self, annotation: NewAnnotation) -> Result<i64>;
    /// (slug, label) pairs of one type within a bucket, ordered by slug.
    async fn list_annotation_keys(
        &self,
        bucket_id: i64,
        annotation_type: AnnotationType,
    ) -> Result<Vec<AnnotationKey>>;
    /// Lookup scoped by (bucket, slug, type) so gene-expression rows can
    /// never shadow observation columns that share a slug.
    async fn get_annotation(
        &self,
        bucket_id: i64,
        slug: &str,
        annotation_type: AnnotationType,
    ) -> Result<Option<Annotation>>;
}

#[async_trait::async_trait]
pub trait ScatterPlotStore: Send + Sync {
    async fn create_scatter_plot(&self, scatter_plot: NewScatterPlot) -> Result<i64>;
    /// First matching row for (bucket, type), if any.
    async fn get_scatter_plot(
        &self,
        bucket_id: i64,
        plot_type: ScatterPlotType,
    ) -> Result<Option<ScatterPlot>>;
}

#[async_trait::async_trait]
pub trait VignetteStore: Send + Sync {
    async fn create_vignette(&self, vignette: NewVignette) -> Result<i64>;
    async fn get_vignette(&self, bucket_id: i64) -> Result<Option<Vignette>>;
}

pub trait Store:
    BucketStore + AnnotationStore + ScatterPlotStore + VignetteStore + Send + Sync
{
}
