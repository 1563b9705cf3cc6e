use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("Partition point {k} is outside a matrix of {n} residues")]
    InvalidPartition { k: usize, n: usize },

    #[error("Chain lengths sum to {total} but the matrix covers {n} residues")]
    ChainLengthMismatch { total: usize, n: usize },

    #[error("Chain '{0}' not found in structure")]
    ChainNotFound(char),

    #[error("Empty selection: {0}")]
    EmptySelection(String),

    #[error(
        "Atom count mismatch after selecting common residues: reference ({} atoms) {:?} vs. target ({} atoms) {:?}",
        reference.len(),
        reference,
        target.len(),
        target
    )]
    ShapeMismatch {
        reference: Vec<isize>,
        target: Vec<isize>,
    },

    #[error("No prediction samples could be scored in '{0}'")]
    NoSamples(String),
}
