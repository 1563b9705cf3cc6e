use crate::core::io::fasta::{AlignmentFile, FastaError};
use crate::core::io::traits::DataFile;
use calamine::{DataType, Reader, open_workbook_auto};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

pub const DEFAULT_EXEMPLAR_SHEET: &str = "tAD-seq";

const GENE_COLUMN: &str = "Gene";
const FRAGMENT_COLUMN: &str = "Fragment";
const SEQUENCE_COLUMN: &str = "Sequence";
const ALIGNMENT_EXTENSION: &str = "fa";

/// A known domain sequence used for exact substring matching.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Exemplar {
    /// Gene or domain family the exemplar belongs to.
    #[serde(rename = "Gene")]
    pub family: String,
    /// Free-form fragment label; empty for alignment-derived exemplars.
    #[serde(rename = "Fragment", default)]
    pub fragment: String,
    #[serde(rename = "Sequence")]
    pub sequence: String,
}

#[derive(Debug, Error)]
pub enum ExemplarError {
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: PathBuf, source: csv::Error },
    #[error("Workbook error for '{path}': {source}")]
    Workbook {
        path: PathBuf,
        source: calamine::Error,
    },
    #[error("Workbook '{path}' has no sheet named '{sheet}'")]
    MissingSheet { path: PathBuf, sheet: String },
    #[error("Table '{path}' has no '{column}' column")]
    MissingColumn { path: PathBuf, column: &'static str },
    #[error("Alignment file '{path}': {source}")]
    Alignment { path: PathBuf, source: FastaError },
    #[error("Failed to walk alignment directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// An ordered collection of exemplar sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExemplarLibrary {
    exemplars: Vec<Exemplar>,
}

impl ExemplarLibrary {
    pub fn new(exemplars: Vec<Exemplar>) -> Self {
        Self {
            exemplars: exemplars
                .into_iter()
                .filter(|e| !e.sequence.trim().is_empty())
                .collect(),
        }
    }

    pub fn exemplars(&self) -> &[Exemplar] {
        &self.exemplars
    }

    pub fn len(&self) -> usize {
        self.exemplars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exemplars.is_empty()
    }

    /// Loads a `Gene`/`Fragment`/`Sequence` table.
    ///
    /// `.xlsx`, `.xls` and `.ods` files are read from the sheet named `sheet`; `.tsv` files
    /// are tab-delimited; anything else is read as CSV.
    pub fn from_table(path: &Path, sheet: &str) -> Result<Self, ExemplarError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let library = match extension.as_str() {
            "xlsx" | "xlsm" | "xls" | "ods" => Self::from_workbook(path, sheet)?,
            "tsv" => Self::from_delimited(path, b'\t')?,
            _ => Self::from_delimited(path, b',')?,
        };
        debug!("Loaded {} exemplars from {:?}", library.len(), path);
        Ok(library)
    }

    /// Loads every `*.fa` alignment below `dir`.
    ///
    /// The family of each exemplar is the alignment's file stem; sequences are ungapped.
    /// Files are visited in path order so that the library order is reproducible.
    pub fn from_alignment_dir(dir: &Path) -> Result<Self, ExemplarError> {
        let mut exemplars = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(ALIGNMENT_EXTENSION)
            {
                continue;
            }
            let family = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let sequences =
                AlignmentFile::read_from_path(path).map_err(|source| ExemplarError::Alignment {
                    path: path.to_path_buf(),
                    source,
                })?;
            debug!("Alignment {:?}: {} sequences", path, sequences.len());
            exemplars.extend(sequences.into_iter().map(|sequence| Exemplar {
                family: family.clone(),
                fragment: String::new(),
                sequence,
            }));
        }
        Ok(Self::new(exemplars))
    }

    fn from_delimited(path: &Path, delimiter: u8) -> Result<Self, ExemplarError> {
        let csv_err = |source| ExemplarError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(csv_err)?;
        let mut exemplars = Vec::new();
        for record in reader.deserialize::<Exemplar>() {
            exemplars.push(record.map_err(csv_err)?);
        }
        Ok(Self::new(exemplars))
    }

    fn from_workbook(path: &Path, sheet: &str) -> Result<Self, ExemplarError> {
        let mut workbook = open_workbook_auto(path).map_err(|source| ExemplarError::Workbook {
            path: path.to_path_buf(),
            source,
        })?;
        let range = workbook
            .worksheet_range(sheet)
            .ok_or_else(|| ExemplarError::MissingSheet {
                path: path.to_path_buf(),
                sheet: sheet.to_string(),
            })?
            .map_err(|source| ExemplarError::Workbook {
                path: path.to_path_buf(),
                source,
            })?;

        let mut rows = range.rows();
        let header: Vec<String> = rows
            .next()
            .map(|row| row.iter().map(cell_to_string).collect())
            .unwrap_or_default();
        let column = |name: &'static str| {
            header
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| ExemplarError::MissingColumn {
                    path: path.to_path_buf(),
                    column: name,
                })
        };
        let gene_idx = column(GENE_COLUMN)?;
        let fragment_idx = column(FRAGMENT_COLUMN).ok();
        let sequence_idx = column(SEQUENCE_COLUMN)?;

        let cell = |row: &[DataType], idx: usize| {
            row.get(idx)
                .map(cell_to_string)
                .unwrap_or_default()
                .trim()
                .to_string()
        };
        let exemplars = rows
            .map(|row| Exemplar {
                family: cell(row, gene_idx),
                fragment: fragment_idx.map(|i| cell(row, i)).unwrap_or_default(),
                sequence: cell(row, sequence_idx),
            })
            .collect();
        Ok(Self::new(exemplars))
    }
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn csv_table_is_loaded_and_blank_sequences_dropped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tads.csv");
        fs::write(
            &path,
            "Gene,Fragment,Sequence\nGCN4,F1,DFDLDMLG\nVP16,F2, \nP53,F3,EPPLSQETFSDLW\n",
        )
        .unwrap();

        let library = ExemplarLibrary::from_table(&path, DEFAULT_EXEMPLAR_SHEET).unwrap();
        assert_eq!(library.len(), 2);
        assert_eq!(library.exemplars()[1].family, "P53");
        assert_eq!(library.exemplars()[1].sequence, "EPPLSQETFSDLW");
    }

    #[test]
    fn tsv_table_uses_tab_delimiter() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tads.tsv");
        fs::write(&path, "Gene\tFragment\tSequence\nGCN4\t7\tDFDLDMLG\n").unwrap();

        let library = ExemplarLibrary::from_table(&path, DEFAULT_EXEMPLAR_SHEET).unwrap();
        assert_eq!(library.exemplars()[0].fragment, "7");
    }

    #[test]
    fn table_without_sequence_column_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "Gene,Fragment\nGCN4,F1\n").unwrap();
        assert!(matches!(
            ExemplarLibrary::from_table(&path, DEFAULT_EXEMPLAR_SHEET),
            Err(ExemplarError::Csv { .. })
        ));
    }

    #[test]
    fn alignment_directory_is_walked_recursively() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("2018_AddAlignments");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("Homeodomain.fa"), ">a\nRR-KRT\n>b\nRRK-RT\n").unwrap();
        fs::write(dir.path().join("bHLH.fa"), ">c\nERR-R\n").unwrap();
        fs::write(dir.path().join("README.txt"), "not an alignment").unwrap();

        let library = ExemplarLibrary::from_alignment_dir(dir.path()).unwrap();
        assert_eq!(library.len(), 3);
        let families: Vec<_> = library.exemplars().iter().map(|e| e.family.as_str()).collect();
        assert!(families.contains(&"Homeodomain"));
        assert!(families.contains(&"bHLH"));
        assert!(library.exemplars().iter().all(|e| !e.sequence.contains('-')));
    }
}
