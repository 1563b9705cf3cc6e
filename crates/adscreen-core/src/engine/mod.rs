//! # Engine Module
//!
//! The algorithms that turn loaded inputs into screening results.
//!
//! ## Architecture
//!
//! - **Scoring** ([`scoring`]) - PAE thresholding, interface counts, the LIS/LIA metrics
//!   and the composite confidence score.
//! - **Classification** ([`classify`]) - The positive/negative rule over repeated
//!   prediction samples and the table of empirically derived optimal thresholds.
//! - **Region detection** ([`regions`]) - Exemplar substring matching, keyword filtering
//!   of external feature annotations and range resolution.
//! - **Structural comparison** ([`compare`]) - Common-residue Cα selection, RMSD, key
//!   residue distances and contact maps.
//! - **Interface screen** ([`interface`]) - Detection of confident inter-chain PAE entries.
//! - **Novel regions** ([`novel`]) - Candidate activation regions from pathogenicity and
//!   pLDDT profiles.
//! - **Configuration** ([`config`]), **Errors** ([`error`]) and **Progress** ([`progress`]).

pub mod classify;
pub mod compare;
pub mod config;
pub mod error;
pub mod interface;
pub mod novel;
pub mod progress;
pub mod regions;
pub mod scoring;
