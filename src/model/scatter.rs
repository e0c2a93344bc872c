use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Embedding family of a scatter plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScatterPlotType {
    Umap,
    Tsne,
}

impl ScatterPlotType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScatterPlotType::Umap => "UMAP",
            ScatterPlotType::Tsne => "TSNE",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "UMAP" => Ok(ScatterPlotType::Umap),
            "TSNE" => Ok(ScatterPlotType::Tsne),
            other => Err(Error::Decode(format!(
                "unknown scatter plot type '{}'",
                other
            ))),
        }
    }
}

/// A named 2D coordinate embedding scoped to a bucket. At most one row
/// per (bucket, type); row order matches annotation cell order.
#[derive(Debug, Clone, Serialize)]
pub struct ScatterPlot {
    pub id: i64,
    pub plot_type: ScatterPlotType,
    pub coordinate_list: String,
    pub bucket_id: i64,
}

/// A scatter plot before it has been assigned a storage id.
#[derive(Debug, Clone)]
pub struct NewScatterPlot {
    pub plot_type: ScatterPlotType,
    pub coordinate_list: String,
    pub bucket_id: i64,
}

/// One (x, y) point of a decoded embedding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}
