//! # Workflows Module
//!
//! One batch driver per screening job. Every driver takes its inputs and configuration
//! explicitly, walks its input directory in sorted order, and returns a report value
//! that accumulates the results of the run.
//!
//! A failing unit (one file or one prediction directory) is logged and skipped; only
//! failures that make the whole job meaningless, such as an unreadable input directory
//! or an unwritable output table, abort the run.
//!
//! - [`ad_locate`] - Activation-domain exemplar search over FASTA files
//! - [`dbd_locate`] - DNA-binding-domain search with a feature-annotation fallback
//! - [`pairs`] - Building and filtering custom pairing lists
//! - [`lis`] - LIS/LIA scoring and classification of prediction directories
//! - [`screen`] - Inter-chain PAE screen of a job listing
//! - [`compare`] - Domain comparison against a reference structure
//! - [`novel`] - Candidate activation regions from pathogenicity and pLDDT

pub mod ad_locate;
pub mod compare;
pub mod dbd_locate;
pub mod error;
pub(crate) mod inputs;
pub mod lis;
pub mod novel;
pub mod pairs;
pub mod screen;

/// A unit of work that was skipped, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedUnit {
    pub name: String,
    pub reason: String,
}
