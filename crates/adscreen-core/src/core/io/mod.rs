//! Provides input/output functionality for the file formats of the screening pipeline.
//!
//! Readers share the [`traits::DataFile`] interface so that every format can be read
//! from any buffered reader or straight from a path. Output tables are written through
//! the [`tables`] helpers.

pub mod alphamissense;
pub mod exemplars;
pub mod fasta;
pub mod locations;
pub mod pairs;
pub mod pdb;
pub mod prediction;
pub mod ranking;
pub mod tables;
pub mod traits;
pub mod uniprot;
