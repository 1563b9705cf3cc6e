use nalgebra::{DMatrix, Scalar};
use serde::Serialize;
use std::fmt::Display;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const CSV_DELIMITER: u8 = b',';
pub const TSV_DELIMITER: u8 = b'\t';

#[derive(Debug, Error)]
pub enum TableError {
    #[error("I/O error for '{path}': {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("CSV error for '{path}': {source}")]
    Csv { path: PathBuf, source: csv::Error },
}

/// Writes serializable rows with a header taken from the row type's field names.
///
/// An empty row set produces an empty file.
pub fn write_rows<T: Serialize>(path: &Path, rows: &[T], delimiter: u8) -> Result<(), TableError> {
    let csv_err = |source| TableError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .map_err(csv_err)?;
    for row in rows {
        writer.serialize(row).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Wrote {} rows to {:?}", rows.len(), path);
    Ok(())
}

/// Writes `header` followed by the serialized rows, so the header is present even
/// when there are no rows.
pub fn write_rows_with_header<T: Serialize>(
    path: &Path,
    header: &[&str],
    rows: &[T],
    delimiter: u8,
) -> Result<(), TableError> {
    let csv_err = |source| TableError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_path(path)
        .map_err(csv_err)?;
    writer.write_record(header).map_err(csv_err)?;
    for row in rows {
        writer.serialize(row).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Wrote {} rows to {:?}", rows.len(), path);
    Ok(())
}

/// Writes a matrix as comma-separated rows without a header.
pub fn write_matrix<T>(path: &Path, matrix: &DMatrix<T>) -> Result<(), TableError>
where
    T: Scalar + Display,
{
    let io_err = |source| TableError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut writer = io::BufWriter::new(file);
    for row in matrix.row_iter() {
        let line = row
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        writeln!(writer, "{}", line).map_err(io_err)?;
    }
    writer.flush().map_err(io_err)
}

/// Appends a single line to a plain-text log file, creating it when absent.
pub fn append_line(path: &Path, line: &str) -> Result<(), TableError> {
    let io_err = |source| TableError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)?;
    writeln!(file, "{}", line).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[derive(Serialize)]
    struct Row {
        #[serde(rename = "Protein_1")]
        protein: &'static str,
        #[serde(rename = "LIS")]
        lis: f64,
    }

    #[test]
    fn rows_are_written_with_renamed_headers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let rows = [Row { protein: "TP53", lis: 0.123 }];
        write_rows(&path, &rows, CSV_DELIMITER).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "Protein_1,LIS\nTP53,0.123\n");
    }

    #[test]
    fn empty_row_set_writes_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.tsv");
        write_rows::<Row>(&path, &[], TSV_DELIMITER).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn explicit_header_survives_empty_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("regions.tsv");
        write_rows_with_header::<(String, f64)>(&path, &["TF", "Score"], &[], TSV_DELIMITER).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "TF\tScore\n");

        let rows = [("TP53".to_string(), 0.5)];
        write_rows_with_header(&path, &["TF", "Score"], &rows, TSV_DELIMITER).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "TF\tScore\nTP53\t0.5\n");
    }

    #[test]
    fn matrix_rows_are_comma_separated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("map.csv");
        let m = DMatrix::from_row_slice(2, 2, &[0i8, 1, -1, 0]);
        write_matrix(&path, &m).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "0,1\n-1,0\n");
    }

    #[test]
    fn append_line_accumulates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.txt");
        append_line(&path, "a.fa").unwrap();
        append_line(&path, "b.fa").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a.fa\nb.fa\n");
    }
}
