//! # Core Models Module
//!
//! The data model of the screening pipeline. Every entity follows the same lifecycle,
//! "loaded → transformed → written", and none of them is mutated after it is built.
//!
//! ## Key Components
//!
//! - [`sequence`] - Protein sequence records read from FASTA files
//! - [`feature`] - Annotated sequence features reported by an external proteome service
//! - [`range`] - 1-indexed inclusive domain ranges and range merging
//! - [`prediction`] - Predicted aligned error, pLDDT and the global confidence scalars
//! - [`structure`] - Chains, residues and atoms read from coordinate files

pub mod feature;
pub mod prediction;
pub mod range;
pub mod sequence;
pub mod structure;
