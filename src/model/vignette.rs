use serde::Serialize;

/// An opaque structured document attached to a bucket, stored as its
/// serialized body. Schema-validated before persistence; returned
/// verbatim at read time.
#[derive(Debug, Clone, Serialize)]
pub struct Vignette {
    pub id: i64,
    pub bucket_id: i64,
    pub json: String,
}

/// A vignette before it has been assigned a storage id.
#[derive(Debug, Clone)]
pub struct NewVignette {
    pub bucket_id: i64,
    pub json: String,
}
