use crate::core::io::fasta::FastaFile;
use crate::core::io::pdb::PdbFile;
use crate::core::io::prediction::PredictionFile;
use crate::core::io::traits::DataFile;
use crate::core::models::prediction::PredictionResult;
use crate::core::models::sequence::SequenceRecord;
use crate::core::models::structure::Structure;
use crate::workflows::error::WorkflowError;
use std::fs;
use std::path::{Path, PathBuf};

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> WorkflowError + '_ {
    move |source| WorkflowError::Io {
        path: path.to_path_buf(),
        source,
    }
}

pub(crate) fn ensure_dir(path: &Path) -> Result<(), WorkflowError> {
    fs::create_dir_all(path).map_err(io_error(path))
}

/// Regular files in `dir` with the given extension, sorted by name.
pub(crate) fn list_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, WorkflowError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error(dir))? {
        let path = entry.map_err(io_error(dir))?.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(extension) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Subdirectories of `dir` whose names start with `prefix`, sorted by name.
pub(crate) fn list_subdirs(dir: &Path, prefix: Option<&str>) -> Result<Vec<PathBuf>, WorkflowError> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error(dir))? {
        let path = entry.map_err(io_error(dir))?.path();
        let matches_prefix = prefix.is_none_or(|p| file_name(&path).starts_with(p));
        if path.is_dir() && matches_prefix {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub(crate) fn read_sequences(path: &Path) -> Result<Vec<SequenceRecord>, WorkflowError> {
    FastaFile::read_from_path(path).map_err(|source| WorkflowError::Fasta {
        path: path.to_path_buf(),
        source,
    })
}

/// The first record of a single-sequence FASTA file.
pub(crate) fn read_first_sequence(path: &Path) -> Result<SequenceRecord, WorkflowError> {
    read_sequences(path)?
        .into_iter()
        .next()
        .ok_or_else(|| WorkflowError::Input {
            path: path.to_path_buf(),
            message: "empty or invalid FASTA file".into(),
        })
}

pub(crate) fn read_structure(path: &Path) -> Result<Structure, WorkflowError> {
    PdbFile::read_from_path(path).map_err(|source| WorkflowError::Structure {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn read_prediction(path: &Path) -> Result<PredictionResult, WorkflowError> {
    PredictionFile::read_from_path(path).map_err(|source| WorkflowError::Prediction {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn write_text(path: &Path, contents: &[u8]) -> Result<(), WorkflowError> {
    fs::write(path, contents).map_err(io_error(path))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::core::io::prediction::PredictionFile;
    use crate::core::models::prediction::PredictionResult;
    use nalgebra::DMatrix;
    use std::fs;
    use std::path::Path;

    pub fn atom_line(serial: usize, chain: char, seq: isize, xyz: [f64; 3]) -> String {
        format!(
            "ATOM  {:>5}  CA  ALA {}{:>4}    {:>8.3}{:>8.3}{:>8.3}  1.00 90.00           C",
            serial, chain, seq, xyz[0], xyz[1], xyz[2]
        )
    }

    /// Writes a PDB with consecutive chains of the given lengths along the x axis.
    pub fn write_chains_pdb(path: &Path, chains: &[(char, usize)]) {
        let mut lines = Vec::new();
        let mut serial = 1;
        for &(chain, len) in chains {
            for i in 0..len {
                lines.push(atom_line(serial, chain, i as isize + 1, [serial as f64 * 3.8, 0.0, 0.0]));
                serial += 1;
            }
            lines.push("TER".to_string());
        }
        lines.push("END".to_string());
        fs::write(path, lines.join("\n")).unwrap();
    }

    pub fn write_prediction(path: &Path, pae: DMatrix<f64>, iptm: f64, ptm: f64) {
        let n = pae.nrows();
        let result = PredictionResult {
            pae,
            plddt: vec![75.0; n],
            iptm,
            ptm,
            ranking_confidence: None,
        };
        let mut file = fs::File::create(path).unwrap();
        PredictionFile::write_to(&result, &mut file).unwrap();
    }
}
