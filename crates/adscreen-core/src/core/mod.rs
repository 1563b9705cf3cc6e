//! # Core Module
//!
//! Fundamental data structures and file formats shared by every adscreen job.
//!
//! ## Architecture
//!
//! - **Data models** ([`models`]) - Sequences, domain ranges, prediction results and
//!   coordinate structures. All of them are read-only once loaded.
//! - **File I/O** ([`io`]) - FASTA and alignment files, `Location:` annotation files,
//!   PDB coordinates, the versioned prediction-result schema, exemplar tables and the
//!   delimited output tables.
//! - **Utilities** ([`utils`]) - Geometry helpers (distances, RMSD, contact maps).

pub mod io;
pub mod models;
pub mod utils;
