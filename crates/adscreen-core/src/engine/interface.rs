use crate::engine::error::EngineError;
use nalgebra::DMatrix;

/// True when any inter-chain PAE entry lies strictly below `cutoff`.
///
/// The matrix is partitioned into consecutive chains of the given lengths; every
/// intra-chain diagonal block is ignored.
pub fn has_confident_interface(
    pae: &DMatrix<f64>,
    chain_lengths: &[usize],
    cutoff: f64,
) -> Result<bool, EngineError> {
    let n = pae.nrows();
    let total: usize = chain_lengths.iter().sum();
    if total != n {
        return Err(EngineError::ChainLengthMismatch { total, n });
    }

    let mut chain_of = Vec::with_capacity(n);
    for (chain, &len) in chain_lengths.iter().enumerate() {
        chain_of.extend(std::iter::repeat_n(chain, len));
    }

    Ok((0..n).any(|i| (0..n).any(|j| chain_of[i] != chain_of[j] && pae[(i, j)] < cutoff)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intra_chain_entries_are_masked() {
        let pae = DMatrix::from_row_slice(
            3,
            3,
            &[
                0.1, 0.2, 25.0, //
                0.2, 0.1, 25.0, //
                25.0, 25.0, 0.1,
            ],
        );
        assert!(!has_confident_interface(&pae, &[2, 1], 10.0).unwrap());
    }

    #[test]
    fn single_confident_inter_chain_entry_passes() {
        let mut pae = DMatrix::from_element(4, 4, 30.0);
        pae[(3, 0)] = 9.5;
        assert!(has_confident_interface(&pae, &[2, 2], 10.0).unwrap());
        assert!(!has_confident_interface(&pae, &[2, 2], 9.5).unwrap());
    }

    #[test]
    fn three_chains_are_partitioned() {
        let mut pae = DMatrix::from_element(3, 3, 30.0);
        pae[(1, 2)] = 1.0;
        assert!(has_confident_interface(&pae, &[1, 1, 1], 10.0).unwrap());
        assert!(!has_confident_interface(&pae, &[1, 2], 10.0).unwrap());
    }

    #[test]
    fn chain_lengths_must_cover_the_matrix() {
        let pae = DMatrix::from_element(3, 3, 1.0);
        assert_eq!(
            has_confident_interface(&pae, &[1, 1], 10.0),
            Err(EngineError::ChainLengthMismatch { total: 2, n: 3 })
        );
    }
}
