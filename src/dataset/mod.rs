//! In-memory matrix dataset.
//!
//! The scientific file reader is an external collaborator; this module
//! defines the dataset contract it produces, plus a serde-backed JSON
//! form used by fixtures and the downsampler. Row order is cell order
//! everywhere, and every consumer preserves it.

pub mod downsample;

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Embedding key holding UMAP coordinates.
pub const UMAP_KEY: &str = "X_umap";
/// Embedding key holding t-SNE coordinates.
pub const TSNE_KEY: &str = "X_tsne";

/// One named per-cell annotation column (`obs`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObsColumn {
    pub name: String,
    pub values: Vec<String>,
}

/// One named per-cell 2D embedding (`obsm`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Embedding {
    pub key: String,
    pub coordinates: Vec<(f64, f64)>,
}

/// A single-cell expression dataset.
///
/// `x` is the expression matrix, rows = cells, columns = genes in `var`
/// order. `obs` columns and `obsm` embeddings have one entry per cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub x: Vec<Vec<f64>>,
    pub obs: Vec<ObsColumn>,
    pub obsm: Vec<Embedding>,
    pub var: Vec<String>,
}

impl Dataset {
    /// Read a dataset from its JSON file form.
    pub fn read_json(path: impl AsRef<Path>) -> Result<Dataset> {
        let file = File::open(path.as_ref())?;
        let dataset = serde_json::from_reader(BufReader::new(file))?;
        Ok(dataset)
    }

    /// Write the dataset to its JSON file form.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path.as_ref())?;
        serde_json::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn cell_count(&self) -> usize {
        self.x.len()
    }

    pub fn gene_count(&self) -> usize {
        self.var.len()
    }

    /// Gene symbol -> column index in `x`.
    pub fn gene_index(&self) -> HashMap<&str, usize> {
        self.var
            .iter()
            .enumerate()
            .map(|(index, gene)| (gene.as_str(), index))
            .collect()
    }

    /// Extract one gene's full expression column, in cell order.
    pub fn gene_column(&self, column: usize) -> Result<Vec<f64>> {
        self.x
            .iter()
            .map(|row| {
                row.get(column).copied().ok_or_else(|| {
                    Error::Dataset(format!("matrix row shorter than column index {}", column))
                })
            })
            .collect()
    }

    pub fn embedding(&self, key: &str) -> Option<&Embedding> {
        self.obsm.iter().find(|embedding| embedding.key == key)
    }
}
