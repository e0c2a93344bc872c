pub mod ingest;
pub mod query;
pub mod vignettes;

pub use ingest::{ingest_dataset, IngestParams, CARDINALITY_LIMIT};
pub use query::{
    get_annotation, get_expression, get_scatter, get_vignettes, list_annotation_keys,
    list_buckets, AnnotationBundle, ExpressionBundle,
};
pub use vignettes::{import_vignette, validate_vignette};
