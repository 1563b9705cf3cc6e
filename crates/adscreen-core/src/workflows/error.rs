use crate::core::io::exemplars::ExemplarError;
use crate::core::io::fasta::FastaError;
use crate::core::io::locations::LocationError;
use crate::core::io::pairs::PairError;
use crate::core::io::pdb::PdbError;
use crate::core::io::prediction::PredictionLoadError;
use crate::core::io::ranking::RankingError;
use crate::core::io::tables::TableError;
use crate::engine::error::EngineError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("I/O error for '{path}': {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("Failed to walk '{path}': {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("Failed to read sequences from '{path}': {source}")]
    Fasta { path: PathBuf, source: FastaError },

    #[error("Failed to read locations from '{path}': {source}")]
    Locations { path: PathBuf, source: LocationError },

    #[error("Failed to read pair list '{path}': {source}")]
    Pairs { path: PathBuf, source: PairError },

    #[error("Failed to read structure '{path}': {source}")]
    Structure { path: PathBuf, source: PdbError },

    #[error("Failed to read prediction result '{path}': {source}")]
    Prediction {
        path: PathBuf,
        source: PredictionLoadError,
    },

    #[error("Failed to read ranking '{path}': {source}")]
    Ranking { path: PathBuf, source: RankingError },

    #[error(transparent)]
    Exemplars(#[from] ExemplarError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Invalid input '{path}': {message}")]
    Input { path: PathBuf, message: String },
}
