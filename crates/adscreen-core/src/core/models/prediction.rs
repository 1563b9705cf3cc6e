use nalgebra::DMatrix;

/// The scored output of one structure-prediction sample.
///
/// Produced by an external model and consumed once: the square predicted aligned
/// error (PAE) matrix, the per-residue pLDDT vector (0–100 scale) and the global
/// confidence scalars.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    /// Pairwise predicted aligned error in Ångström; smaller is more confident.
    pub pae: DMatrix<f64>,
    /// Per-residue local confidence. Empty when the producer did not record it.
    pub plddt: Vec<f64>,
    /// Interface predicted TM-score.
    pub iptm: f64,
    /// Predicted TM-score.
    pub ptm: f64,
    /// Model ranking confidence, when recorded.
    pub ranking_confidence: Option<f64>,
}

impl PredictionResult {
    /// Number of residues covered by the PAE matrix.
    pub fn num_residues(&self) -> usize {
        self.pae.nrows()
    }

    /// Mean pLDDT across all residues, or `None` when no pLDDT was recorded.
    pub fn mean_plddt(&self) -> Option<f64> {
        if self.plddt.is_empty() {
            None
        } else {
            Some(self.plddt.iter().sum::<f64>() / self.plddt.len() as f64)
        }
    }

    /// pLDDT of a 1-indexed residue position.
    pub fn plddt_at(&self, position: usize) -> Option<f64> {
        position
            .checked_sub(1)
            .and_then(|idx| self.plddt.get(idx))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with_plddt(plddt: Vec<f64>) -> PredictionResult {
        PredictionResult {
            pae: DMatrix::zeros(plddt.len(), plddt.len()),
            plddt,
            iptm: 0.5,
            ptm: 0.25,
            ranking_confidence: None,
        }
    }

    #[test]
    fn mean_plddt_averages_all_residues() {
        let result = result_with_plddt(vec![50.0, 70.0, 90.0]);
        assert_eq!(result.mean_plddt(), Some(70.0));
        assert_eq!(result.num_residues(), 3);
    }

    #[test]
    fn mean_plddt_is_none_without_values() {
        assert_eq!(result_with_plddt(Vec::new()).mean_plddt(), None);
    }

    #[test]
    fn plddt_lookup_is_one_indexed() {
        let result = result_with_plddt(vec![10.0, 20.0]);
        assert_eq!(result.plddt_at(1), Some(10.0));
        assert_eq!(result.plddt_at(2), Some(20.0));
        assert_eq!(result.plddt_at(0), None);
        assert_eq!(result.plddt_at(3), None);
    }
}
