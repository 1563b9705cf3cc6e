use crate::engine::config::ClassificationThresholds;
use crate::engine::scoring::round_to;
use serde::Serialize;

/// The call for one protein pair and the statistics that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub positive: bool,
    pub best_lis: f64,
    pub best_lia: f64,
    pub average_lis: f64,
    pub average_lia: f64,
}

impl ClassificationThresholds {
    pub fn is_positive(&self, best_lis: f64, best_lia: f64, average_lis: f64, average_lia: f64) -> bool {
        (best_lis >= self.best_lis && best_lia >= self.best_lia)
            || (average_lis >= self.average_lis && average_lia >= self.average_lia)
    }
}

/// Classifies a protein pair from its per-sample `(LIS, LIA)` values.
///
/// Returns `None` when there are no samples.
pub fn classify(
    samples: &[(f64, usize)],
    thresholds: &ClassificationThresholds,
) -> Option<Classification> {
    if samples.is_empty() {
        return None;
    }
    let n = samples.len() as f64;
    let best_lis = samples.iter().map(|(lis, _)| *lis).fold(f64::MIN, f64::max);
    let best_lia = samples.iter().map(|(_, lia)| *lia).max().unwrap_or(0) as f64;
    let average_lis = samples.iter().map(|(lis, _)| lis).sum::<f64>() / n;
    let average_lia = samples.iter().map(|(_, lia)| *lia as f64).sum::<f64>() / n;
    Some(Classification {
        positive: thresholds.is_positive(best_lis, best_lia, average_lis, average_lia),
        best_lis,
        best_lia,
        average_lis,
        average_lia,
    })
}

/// One row of the empirically derived threshold table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdMetric {
    #[serde(rename = "Metric")]
    pub metric: &'static str,
    #[serde(rename = "Optimal Threshold")]
    pub optimal_threshold: f64,
    #[serde(rename = "Specificity")]
    pub specificity: f64,
    #[serde(rename = "Sensitivity")]
    pub sensitivity: f64,
    #[serde(rename = "AUC")]
    pub auc: f64,
    #[serde(rename = "Youden's Index")]
    pub youden_index: f64,
}

impl ThresholdMetric {
    const fn new(
        metric: &'static str,
        optimal_threshold: f64,
        specificity: f64,
        sensitivity: f64,
        auc: f64,
        youden_index: f64,
    ) -> Self {
        Self {
            metric,
            optimal_threshold,
            specificity,
            sensitivity,
            auc,
            youden_index,
        }
    }

    pub fn rounded(&self, places: i32) -> Self {
        Self {
            metric: self.metric,
            optimal_threshold: round_to(self.optimal_threshold, places),
            specificity: round_to(self.specificity, places),
            sensitivity: round_to(self.sensitivity, places),
            auc: round_to(self.auc, places),
            youden_index: round_to(self.youden_index, places),
        }
    }
}

#[rustfmt::skip]
pub const OPTIMAL_THRESHOLDS: [ThresholdMetric; 12] = [
    ThresholdMetric::new("Average LIS", 0.0734, 0.926011561, 0.786516854, 0.910601632, 0.712528415),
    ThresholdMetric::new("Best LIS", 0.203, 0.919075145, 0.730337079, 0.890710312, 0.649412223),
    ThresholdMetric::new("Average LIA", 1610.4, 0.876300578, 0.767790262, 0.888699097, 0.64409084),
    ThresholdMetric::new("Best LIA", 3432.0, 0.855491329, 0.775280899, 0.86613626, 0.630772228),
    ThresholdMetric::new("Average ipTM", 0.322, 0.937572254, 0.711610487, 0.891301336, 0.649182741),
    ThresholdMetric::new("Best ipTM", 0.38, 0.823121387, 0.734082397, 0.862501353, 0.557203784),
    ThresholdMetric::new("Average Confidence", 0.3672, 0.951445087, 0.674157303, 0.859056959, 0.62560239),
    ThresholdMetric::new("Best Confidence", 0.432, 0.85433526, 0.685393258, 0.84053387, 0.539728519),
    ThresholdMetric::new("Average pDockQ", 0.133427109, 0.804624277, 0.68164794, 0.79601221, 0.486272218),
    ThresholdMetric::new("Best pDockQ", 0.148516258, 0.865895954, 0.666666667, 0.818267628, 0.53256262),
    ThresholdMetric::new("Average pDockQ2", 0.015093248, 0.917919075, 0.692883895, 0.841622827, 0.61080297),
    ThresholdMetric::new("Best pDockQ2", 0.02106924, 0.895953757, 0.670411985, 0.832053863, 0.566365742),
];

/// The threshold table as written to reports, rounded to three decimals.
pub fn optimal_threshold_table() -> Vec<ThresholdMetric> {
    OPTIMAL_THRESHOLDS.iter().map(|m| m.rounded(3)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_clause_alone_makes_a_positive() {
        let t = ClassificationThresholds::default();
        assert!(t.is_positive(0.11, 3500.0, 0.0, 0.0));
    }

    #[test]
    fn weak_statistics_are_negative() {
        let t = ClassificationThresholds::default();
        assert!(!t.is_positive(0.05, 1000.0, 0.05, 1000.0));
    }

    #[test]
    fn average_clause_alone_makes_a_positive() {
        let t = ClassificationThresholds::default();
        assert!(t.is_positive(0.09, 2000.0, 0.06, 1610.0));
    }

    #[test]
    fn classify_aggregates_samples() {
        let samples = [(0.12, 3500), (0.02, 100), (0.04, 200)];
        let result = classify(&samples, &ClassificationThresholds::default()).unwrap();
        assert!(result.positive);
        assert_eq!(result.best_lis, 0.12);
        assert_eq!(result.best_lia, 3500.0);
        assert!((result.average_lis - 0.06).abs() < 1e-12);
        assert!((result.average_lia - 1266.666_666_666_666_7).abs() < 1e-6);
    }

    #[test]
    fn classify_without_samples_is_none() {
        assert!(classify(&[], &ClassificationThresholds::default()).is_none());
    }

    #[test]
    fn threshold_table_is_rounded() {
        let table = optimal_threshold_table();
        assert_eq!(table.len(), 12);
        assert_eq!(table[0].optimal_threshold, 0.073);
        assert_eq!(table[2].optimal_threshold, 1610.4);
        assert_eq!(table[8].metric, "Average pDockQ");
        assert_eq!(table[8].optimal_threshold, 0.133);
        assert_eq!(table[11].youden_index, 0.566);
    }
}
