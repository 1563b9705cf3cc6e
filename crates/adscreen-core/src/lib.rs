//! # adscreen Core Library
//!
//! Domain detection and AlphaFold-multimer post-processing for screening
//! transcription-factor activation domains (ADs) against a co-activator domain.
//!
//! ## Architectural Philosophy
//!
//! The library keeps a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Immutable data models (`SequenceRecord`, `DomainRange`,
//!   `PredictionResult`, `Structure`), file readers and writers, and geometry utilities.
//!
//! - **[`engine`]: The Logic Core.** The algorithms that reduce those models to numbers:
//!   Local Interaction Score scoring, threshold classification, region detection,
//!   structural comparison and the interface screen.
//!
//! - **[`workflows`]: The Public API.** One batch driver per research job. Each driver takes
//!   explicit inputs, processes its units sequentially, and returns an accumulated report.
//!   A failing unit is logged and skipped; it never aborts the batch.

pub mod core;
pub mod engine;
pub mod workflows;
