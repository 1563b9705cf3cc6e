use crate::core::io::traits::DataFile;
use crate::core::models::prediction::PredictionResult;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Highest result-schema version this reader understands.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}

/// On-disk layout of a prediction result.
///
/// `predicted_aligned_error`, `iptm` and `ptm` are required. Optional fields fall back
/// to typed defaults: an empty pLDDT vector, no ranking confidence, schema version 1.
#[derive(Debug, Serialize, Deserialize)]
struct RawPrediction {
    #[serde(default = "default_schema_version")]
    schema_version: u32,
    #[serde(alias = "pae")]
    predicted_aligned_error: Vec<Vec<f64>>,
    #[serde(default)]
    plddt: Vec<f64>,
    iptm: f64,
    ptm: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ranking_confidence: Option<f64>,
}

#[derive(Debug, Error)]
pub enum PredictionLoadError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed prediction result: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported result schema version {found} (newest supported is {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
    #[error("PAE matrix is empty")]
    EmptyMatrix,
    #[error("PAE matrix is not square: row {row} has {len} columns, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("PAE entry ({row}, {col}) is not a finite non-negative number: {value}")]
    InvalidValue { row: usize, col: usize, value: f64 },
    #[error("pLDDT has {found} values but the PAE matrix covers {expected} residues")]
    PlddtLength { found: usize, expected: usize },
}

/// Reader for the versioned JSON prediction-result schema.
pub struct PredictionFile;

impl DataFile for PredictionFile {
    type Content = PredictionResult;
    type Error = PredictionLoadError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Content, Self::Error> {
        let raw: RawPrediction = serde_json::from_reader(reader)?;

        if raw.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(PredictionLoadError::UnsupportedVersion {
                found: raw.schema_version,
                supported: CURRENT_SCHEMA_VERSION,
            });
        }

        let n = raw.predicted_aligned_error.len();
        if n == 0 {
            return Err(PredictionLoadError::EmptyMatrix);
        }
        for (row, values) in raw.predicted_aligned_error.iter().enumerate() {
            if values.len() != n {
                return Err(PredictionLoadError::NotSquare {
                    row,
                    len: values.len(),
                    expected: n,
                });
            }
            if let Some((col, &value)) = values
                .iter()
                .enumerate()
                .find(|(_, v)| !v.is_finite() || **v < 0.0)
            {
                return Err(PredictionLoadError::InvalidValue { row, col, value });
            }
        }
        if !raw.plddt.is_empty() && raw.plddt.len() != n {
            return Err(PredictionLoadError::PlddtLength {
                found: raw.plddt.len(),
                expected: n,
            });
        }

        let pae = DMatrix::from_fn(n, n, |i, j| raw.predicted_aligned_error[i][j]);
        Ok(PredictionResult {
            pae,
            plddt: raw.plddt,
            iptm: raw.iptm,
            ptm: raw.ptm,
            ranking_confidence: raw.ranking_confidence,
        })
    }
}

impl PredictionFile {
    /// Serializes a result in the current schema version.
    pub fn write_to(result: &PredictionResult, writer: &mut impl Write) -> Result<(), PredictionLoadError> {
        let raw = RawPrediction {
            schema_version: CURRENT_SCHEMA_VERSION,
            predicted_aligned_error: result
                .pae
                .row_iter()
                .map(|row| row.iter().copied().collect())
                .collect(),
            plddt: result.plddt.clone(),
            iptm: result.iptm,
            ptm: result.ptm,
            ranking_confidence: result.ranking_confidence,
        };
        serde_json::to_writer(writer, &raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_full_schema() {
        let json = r#"{
            "schema_version": 1,
            "predicted_aligned_error": [[0.5, 12.0], [14.0, 0.25]],
            "plddt": [88.0, 42.0],
            "iptm": 0.61, "ptm": 0.7, "ranking_confidence": 0.63
        }"#;
        let result = PredictionFile::read_from(&mut Cursor::new(json)).unwrap();
        assert_eq!(result.num_residues(), 2);
        assert_eq!(result.pae[(0, 1)], 12.0);
        assert_eq!(result.pae[(1, 0)], 14.0);
        assert_eq!(result.ranking_confidence, Some(0.63));
    }

    #[test]
    fn optional_fields_take_typed_defaults() {
        let json = r#"{"pae": [[1.0]], "iptm": 0.2, "ptm": 0.3}"#;
        let result = PredictionFile::read_from(&mut Cursor::new(json)).unwrap();
        assert!(result.plddt.is_empty());
        assert_eq!(result.ranking_confidence, None);
    }

    #[test]
    fn missing_required_field_is_malformed() {
        let json = r#"{"predicted_aligned_error": [[1.0]], "ptm": 0.3}"#;
        let result = PredictionFile::read_from(&mut Cursor::new(json));
        assert!(matches!(result, Err(PredictionLoadError::Json(_))));
    }

    #[test]
    fn future_schema_version_is_rejected() {
        let json = r#"{"schema_version": 2, "pae": [[1.0]], "iptm": 0.2, "ptm": 0.3}"#;
        let result = PredictionFile::read_from(&mut Cursor::new(json));
        assert!(matches!(
            result,
            Err(PredictionLoadError::UnsupportedVersion { found: 2, .. })
        ));
    }

    #[test]
    fn ragged_matrix_is_rejected() {
        let json = r#"{"pae": [[1.0, 2.0], [1.0]], "iptm": 0.2, "ptm": 0.3}"#;
        let result = PredictionFile::read_from(&mut Cursor::new(json));
        assert!(matches!(
            result,
            Err(PredictionLoadError::NotSquare { row: 1, len: 1, expected: 2 })
        ));
    }

    #[test]
    fn negative_error_is_rejected() {
        let json = r#"{"pae": [[1.0, -2.0], [1.0, 0.0]], "iptm": 0.2, "ptm": 0.3}"#;
        let result = PredictionFile::read_from(&mut Cursor::new(json));
        assert!(matches!(
            result,
            Err(PredictionLoadError::InvalidValue { row: 0, col: 1, .. })
        ));
    }

    #[test]
    fn mismatched_plddt_is_rejected() {
        let json = r#"{"pae": [[1.0]], "plddt": [50.0, 60.0], "iptm": 0.2, "ptm": 0.3}"#;
        let result = PredictionFile::read_from(&mut Cursor::new(json));
        assert!(matches!(
            result,
            Err(PredictionLoadError::PlddtLength { found: 2, expected: 1 })
        ));
    }

    #[test]
    fn written_result_is_readable() {
        let result = PredictionResult {
            pae: DMatrix::from_row_slice(2, 2, &[0.0, 3.0, 4.0, 0.0]),
            plddt: vec![70.0, 80.0],
            iptm: 0.4,
            ptm: 0.5,
            ranking_confidence: Some(0.42),
        };
        let mut out = Vec::new();
        PredictionFile::write_to(&result, &mut out).unwrap();
        let back = PredictionFile::read_from(&mut Cursor::new(out)).unwrap();
        assert_eq!(back, result);
    }
}
