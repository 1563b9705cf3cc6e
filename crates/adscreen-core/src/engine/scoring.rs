//! Interface statistics over a predicted aligned error matrix.
//!
//! The matrix is split at a partition point `k` into the first chain (`[0, k)`) and the
//! second (`[k, n)`). The local interaction area (LIA) counts confident entries in the
//! two off-diagonal blocks; the local interaction score (LIS) averages the rescaled
//! confidence of those entries.

use crate::core::models::prediction::PredictionResult;
use crate::engine::error::EngineError;
use nalgebra::{DMatrix, DMatrixView};

/// Weight of ipTM in the composite confidence score; pTM gets the remainder.
pub const IPTM_WEIGHT: f64 = 0.8;

/// Binary mask of entries strictly below `cutoff`.
pub fn threshold(pae: &DMatrix<f64>, cutoff: f64) -> DMatrix<u8> {
    pae.map(|e| u8::from(e < cutoff))
}

/// `clamp((cutoff - E) / cutoff, 0, 1)` applied element-wise.
pub fn reverse_and_scale(pae: &DMatrix<f64>, cutoff: f64) -> DMatrix<f64> {
    pae.map(|e| ((cutoff - e) / cutoff).clamp(0.0, 1.0))
}

/// Counts of thresholded entries in each block of a two-chain partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InterfaceCounts {
    pub first_chain: usize,
    pub second_chain: usize,
    /// Block `[0, k) × [k, n)`.
    pub interface_1: usize,
    /// Block `[k, n) × [0, k)`.
    pub interface_2: usize,
}

impl InterfaceCounts {
    /// The local interaction area: both off-diagonal blocks together.
    pub fn area(&self) -> usize {
        self.interface_1 + self.interface_2
    }
}

fn check_partition(n: usize, k: usize) -> Result<(), EngineError> {
    if k > n {
        return Err(EngineError::InvalidPartition { k, n });
    }
    Ok(())
}

fn count_nonzero(block: DMatrixView<'_, u8>) -> usize {
    block.iter().filter(|&&v| v != 0).count()
}

pub fn interface_counts(mask: &DMatrix<u8>, k: usize) -> Result<InterfaceCounts, EngineError> {
    let n = mask.nrows();
    check_partition(n, k)?;
    let m = n - k;
    Ok(InterfaceCounts {
        first_chain: count_nonzero(mask.view((0, 0), (k, k))),
        second_chain: count_nonzero(mask.view((k, k), (m, m))),
        interface_1: count_nonzero(mask.view((0, k), (k, m))),
        interface_2: count_nonzero(mask.view((k, 0), (m, k))),
    })
}

fn masked_mean(scaled: DMatrixView<'_, f64>, mask: DMatrixView<'_, u8>) -> f64 {
    let (sum, count) = scaled
        .iter()
        .zip(mask.iter())
        .filter(|(_, m)| **m == 1)
        .fold((0.0, 0usize), |(s, c), (v, _)| (s + v, c + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// The local interaction score.
///
/// Each off-diagonal block contributes the mean rescaled confidence of its thresholded
/// entries (an empty selection contributes 0); the score is the mean of the two.
pub fn interaction_score(pae: &DMatrix<f64>, k: usize, cutoff: f64) -> Result<f64, EngineError> {
    let n = pae.nrows();
    check_partition(n, k)?;
    let m = n - k;
    let mask = threshold(pae, cutoff);
    let scaled = reverse_and_scale(pae, cutoff);
    let block_1 = masked_mean(scaled.view((0, k), (k, m)), mask.view((0, k), (k, m)));
    let block_2 = masked_mean(scaled.view((k, 0), (m, k)), mask.view((k, 0), (m, k)));
    Ok((block_1 + block_2) / 2.0)
}

pub fn composite_confidence(iptm: f64, ptm: f64) -> f64 {
    IPTM_WEIGHT * iptm + (1.0 - IPTM_WEIGHT) * ptm
}

/// Rounds half away from zero to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Statistics of one prediction sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleScore {
    pub lis: f64,
    pub lia: usize,
    pub counts: InterfaceCounts,
    pub iptm: f64,
    pub ptm: f64,
    pub confidence: f64,
    pub mean_plddt: Option<f64>,
}

pub fn score_sample(
    result: &PredictionResult,
    k: usize,
    cutoff: f64,
) -> Result<SampleScore, EngineError> {
    let mask = threshold(&result.pae, cutoff);
    let counts = interface_counts(&mask, k)?;
    let lis = interaction_score(&result.pae, k, cutoff)?;
    Ok(SampleScore {
        lis,
        lia: counts.area(),
        counts,
        iptm: result.iptm,
        ptm: result.ptm,
        confidence: composite_confidence(result.iptm, result.ptm),
        mean_plddt: result.mean_plddt(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_matrix() -> DMatrix<f64> {
        // chain 1 = residues 0..2, chain 2 = residues 2..4
        DMatrix::from_row_slice(
            4,
            4,
            &[
                0.5, 1.0, 6.0, 40.0, //
                1.0, 0.5, 9.0, 12.0, //
                3.0, 30.0, 0.5, 1.0, //
                15.0, 20.0, 1.0, 0.5,
            ],
        )
    }

    #[test]
    fn scaled_entries_stay_in_unit_interval_and_vanish_above_cutoff() {
        let pae = sample_matrix();
        for cutoff in [1.0, 5.0, 12.0, 30.0] {
            let scaled = reverse_and_scale(&pae, cutoff);
            for (s, e) in scaled.iter().zip(pae.iter()) {
                assert!((0.0..=1.0).contains(s));
                if *e >= cutoff {
                    assert_eq!(*s, 0.0);
                }
            }
        }
    }

    #[test]
    fn threshold_counts_grow_with_cutoff() {
        let pae = sample_matrix();
        let mut previous = 0;
        for cutoff in [0.1, 1.0, 5.0, 10.0, 12.0, 20.0, 30.0, 50.0] {
            let total: usize = threshold(&pae, cutoff).iter().map(|&v| v as usize).sum();
            assert!(total >= previous);
            previous = total;
        }
    }

    #[test]
    fn interface_counts_split_blocks() {
        let mask = threshold(&sample_matrix(), 12.0);
        let counts = interface_counts(&mask, 2).unwrap();
        assert_eq!(counts.first_chain, 4);
        assert_eq!(counts.second_chain, 4);
        assert_eq!(counts.interface_1, 2); // 6.0, 9.0
        assert_eq!(counts.interface_2, 1); // 3.0
        assert_eq!(counts.area(), 3);
    }

    #[test]
    fn interaction_score_averages_block_means() {
        let pae = sample_matrix();
        let lis = interaction_score(&pae, 2, 12.0).unwrap();
        let block_1 = ((12.0 - 6.0) / 12.0 + (12.0 - 9.0) / 12.0) / 2.0;
        let block_2 = (12.0 - 3.0) / 12.0;
        assert!((lis - (block_1 + block_2) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn empty_interface_selection_scores_zero() {
        let pae = DMatrix::from_row_slice(2, 2, &[0.0, 50.0, 50.0, 0.0]);
        assert_eq!(interaction_score(&pae, 1, 10.0).unwrap(), 0.0);
        assert_eq!(interaction_score(&pae, 0, 10.0).unwrap(), 0.0);
    }

    #[test]
    fn partition_beyond_matrix_is_rejected() {
        let pae = sample_matrix();
        assert_eq!(
            interaction_score(&pae, 5, 12.0),
            Err(EngineError::InvalidPartition { k: 5, n: 4 })
        );
    }

    #[test]
    fn composite_confidence_weights_iptm() {
        assert!((composite_confidence(0.5, 0.25) - 0.45).abs() < 1e-12);
    }

    #[test]
    fn rounding_uses_requested_places() {
        assert_eq!(round_to(0.12345, 3), 0.123);
        assert_eq!(round_to(87.456, 2), 87.46);
    }

    #[test]
    fn sample_score_collects_all_statistics() {
        let result = PredictionResult {
            pae: sample_matrix(),
            plddt: vec![80.0, 70.0, 60.0, 50.0],
            iptm: 0.5,
            ptm: 0.25,
            ranking_confidence: None,
        };
        let score = score_sample(&result, 2, 12.0).unwrap();
        assert_eq!(score.lia, 3);
        assert_eq!(score.mean_plddt, Some(65.0));
        assert!((score.confidence - 0.45).abs() < 1e-12);
    }
}
