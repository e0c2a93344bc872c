//! Delimited vector codec.
//!
//! Per-cell vectors are stored as a single delimited text column. Two
//! encodings share the `DB_DELIM` delimiter: a scalar-vector form
//! (`a|b|c`) and a 2-column coordinate form (`x,y|x,y|`, trailing
//! delimiter included). The delimiter is not escaped; it must never
//! appear inside an encoded element.

use std::fmt::Display;
use std::fmt::Write as _;

use crate::error::{Error, Result};

/// Delimiter used in `value_list` / `coordinate_list` columns.
pub const DB_DELIM: &str = "|";

/// Encode an ordered sequence of scalars into a single delimited string.
pub fn encode_values<T: Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(DB_DELIM)
}

/// Decode a delimited string back into its ordered string elements.
/// Each token is trimmed of surrounding whitespace.
pub fn decode_values(encoded: &str) -> Vec<String> {
    encoded
        .split(DB_DELIM)
        .map(|token| token.trim().to_string())
        .collect()
}

/// Decode a delimited string into an ordered numeric vector.
/// A token that does not parse as a float is corrupt data.
pub fn decode_numeric(encoded: &str) -> Result<Vec<f64>> {
    encoded
        .split(DB_DELIM)
        .map(|token| {
            let token = token.trim();
            token
                .parse::<f64>()
                .map_err(|_| Error::Decode(format!("non-numeric token '{}'", token)))
        })
        .collect()
}

/// Encode (x, y) coordinate pairs, 6 decimal digits each, with a
/// trailing delimiter after every pair.
pub fn encode_coordinates(coordinates: &[(f64, f64)]) -> String {
    let mut encoded = String::new();
    for (x, y) in coordinates {
        // Infallible for String targets.
        let _ = write!(encoded, "{:.6},{:.6}{}", x, y, DB_DELIM);
    }
    encoded
}

/// Decode a coordinate list. Empty tokens (the trailing delimiter
/// produces one) are skipped; anything other than exactly two
/// comma-separated floats per token is corrupt data.
pub fn decode_coordinates(encoded: &str) -> Result<Vec<(f64, f64)>> {
    let mut coordinates = Vec::new();
    for token in encoded.split(DB_DELIM) {
        if token.is_empty() {
            continue;
        }
        let parts: Vec<&str> = token.split(',').collect();
        if parts.len() != 2 {
            return Err(Error::Decode(format!(
                "coordinate pair '{}' does not have exactly 2 fields",
                token
            )));
        }
        let x = parts[0]
            .parse::<f64>()
            .map_err(|_| Error::Decode(format!("non-numeric coordinate '{}'", parts[0])))?;
        let y = parts[1]
            .parse::<f64>()
            .map_err(|_| Error::Decode(format!("non-numeric coordinate '{}'", parts[1])))?;
        coordinates.push((x, y));
    }
    Ok(coordinates)
}
