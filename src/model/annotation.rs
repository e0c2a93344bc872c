use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Discriminator for the two annotation namespaces within a bucket.
///
/// Gene-expression vectors and observation columns may normalize to the
/// same slug, so lookups are always scoped by (bucket, slug, type).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnnotationType {
    GeneExpression,
    Other,
}

impl AnnotationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationType::GeneExpression => "GENE_EXPRESSION",
            AnnotationType::Other => "OTHER",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "GENE_EXPRESSION" => Ok(AnnotationType::GeneExpression),
            "OTHER" => Ok(AnnotationType::Other),
            other => Err(Error::Decode(format!("unknown annotation type '{}'", other))),
        }
    }
}

/// One named per-cell value vector, scoped to a bucket.
///
/// `value_list` is the delimited encoding of the vector; element order is
/// cell order. Immutable after creation.
#[derive(Debug, Clone, Serialize)]
pub struct Annotation {
    pub id: i64,
    pub slug: String,
    pub label: String,
    pub annotation_type: AnnotationType,
    pub value_list: String,
    pub bucket_id: i64,
}

/// An annotation before it has been assigned a storage id.
#[derive(Debug, Clone)]
pub struct NewAnnotation {
    pub slug: String,
    pub label: String,
    pub annotation_type: AnnotationType,
    pub value_list: String,
    pub bucket_id: i64,
}

/// (slug, label) pair returned by annotation key listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationKey {
    pub slug: String,
    pub label: String,
}
