//! Dataset downsampler.
//!
//! Produces a reduced copy of a dataset for test fixtures: the first
//! `num_cells` rows across `x`, `obs` and every `obsm` embedding, and
//! only the columns named in `gene_list`. Pure transform, no storage.

use log::info;

use crate::dataset::{Dataset, Embedding, ObsColumn};
use crate::error::{Error, Result};

pub fn downsample(dataset: &Dataset, num_cells: usize, gene_list: &[String]) -> Result<Dataset> {
    let num_rows = dataset.cell_count().min(num_cells);
    info!("Restricting new dataset to {} cells.", num_rows);
    info!("Restricting new dataset to {} genes.", gene_list.len());

    let gene_index = dataset.gene_index();
    let mut columns = Vec::with_capacity(gene_list.len());
    for gene in gene_list {
        let index = *gene_index
            .get(gene.as_str())
            .ok_or_else(|| Error::Dataset(format!("gene '{}' not present in dataset", gene)))?;
        info!("Extracting: {}, index={}.", gene, index);
        columns.push(index);
    }

    let x = dataset
        .x
        .iter()
        .take(num_rows)
        .map(|row| {
            columns
                .iter()
                .map(|&column| {
                    row.get(column).copied().ok_or_else(|| {
                        Error::Dataset(format!(
                            "matrix row shorter than column index {}",
                            column
                        ))
                    })
                })
                .collect::<Result<Vec<f64>>>()
        })
        .collect::<Result<Vec<Vec<f64>>>>()?;

    let obs = dataset
        .obs
        .iter()
        .map(|column| ObsColumn {
            name: column.name.clone(),
            values: column.values.iter().take(num_rows).cloned().collect(),
        })
        .collect();

    let obsm = dataset
        .obsm
        .iter()
        .map(|embedding| {
            info!("Extracting: {}.", embedding.key);
            Embedding {
                key: embedding.key.clone(),
                coordinates: embedding.coordinates.iter().take(num_rows).copied().collect(),
            }
        })
        .collect();

    Ok(Dataset {
        x,
        obs,
        obsm,
        var: gene_list.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::UMAP_KEY;

    fn sample() -> Dataset {
        Dataset {
            x: vec![
                vec![1.0, 2.0, 3.0],
                vec![4.0, 5.0, 6.0],
                vec![7.0, 8.0, 9.0],
                vec![10.0, 11.0, 12.0],
            ],
            obs: vec![ObsColumn {
                name: "tissue".to_string(),
                values: vec![
                    "brain".to_string(),
                    "liver".to_string(),
                    "brain".to_string(),
                    "lung".to_string(),
                ],
            }],
            obsm: vec![Embedding {
                key: UMAP_KEY.to_string(),
                coordinates: vec![(0.1, 0.2), (0.3, 0.4), (0.5, 0.6), (0.7, 0.8)],
            }],
            var: vec!["Egfr".to_string(), "Actb".to_string(), "Pten".to_string()],
        }
    }

    #[test]
    fn slices_rows_and_columns_consistently() {
        let reduced = downsample(&sample(), 2, &["Pten".to_string(), "Egfr".to_string()]).unwrap();
        assert_eq!(reduced.x, vec![vec![3.0, 1.0], vec![6.0, 4.0]]);
        assert_eq!(reduced.var, vec!["Pten", "Egfr"]);
        assert_eq!(reduced.obs[0].values, vec!["brain", "liver"]);
        assert_eq!(reduced.obsm[0].coordinates, vec![(0.1, 0.2), (0.3, 0.4)]);
    }

    #[test]
    fn target_larger_than_source_keeps_all_rows() {
        let reduced = downsample(&sample(), 100, &["Actb".to_string()]).unwrap();
        assert_eq!(reduced.cell_count(), 4);
    }

    #[test]
    fn missing_gene_is_fatal() {
        let err = downsample(&sample(), 2, &["Nope".to_string()]).unwrap_err();
        assert!(matches!(err, Error::Dataset(_)));
    }
}
