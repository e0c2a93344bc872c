use serde::{Deserialize, Serialize};

/// One ingested dataset: a named collection of cells.
///
/// `slug` is unique across all buckets; child entities reference the
/// bucket by id and are never re-parented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
}

/// A bucket before it has been assigned a storage id.
#[derive(Debug, Clone)]
pub struct NewBucket {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
}
