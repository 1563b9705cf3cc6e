use crate::core::io::traits::DataFile;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::{self, BufRead};
use thiserror::Error;

/// The `ranking_debug.json` summary written next to multimer predictions.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RankingDebug {
    /// Model names, best first.
    pub order: Vec<String>,
    #[serde(rename = "iptm+ptm", default)]
    pub iptm_ptm: HashMap<String, f64>,
}

impl RankingDebug {
    pub fn best_model(&self) -> Option<&str> {
        self.order.first().map(String::as_str)
    }

    /// The combined `iptm+ptm` score of the best model, when the file records one.
    pub fn best_score(&self) -> Option<f64> {
        self.best_model()
            .and_then(|model| self.iptm_ptm.get(model))
            .copied()
    }
}

#[derive(Debug, Error)]
pub enum RankingError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed ranking file: {0}")]
    Json(#[from] serde_json::Error),
}

pub struct RankingFile;

impl DataFile for RankingFile {
    type Content = RankingDebug;
    type Error = RankingError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Content, Self::Error> {
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn best_model_and_score_come_from_order() {
        let json = r#"{
            "iptm+ptm": {"model_1_multimer_v3_pred_0": 0.41, "model_2_multimer_v3_pred_0": 0.77},
            "order": ["model_2_multimer_v3_pred_0", "model_1_multimer_v3_pred_0"]
        }"#;
        let ranking = RankingFile::read_from(&mut Cursor::new(json)).unwrap();
        assert_eq!(ranking.best_model(), Some("model_2_multimer_v3_pred_0"));
        assert_eq!(ranking.best_score(), Some(0.77));
    }

    #[test]
    fn monomer_ranking_has_no_combined_score() {
        let json = r#"{"plddts": {"model_1": 80.0}, "order": ["model_1"]}"#;
        let ranking = RankingFile::read_from(&mut Cursor::new(json)).unwrap();
        assert_eq!(ranking.best_model(), Some("model_1"));
        assert_eq!(ranking.best_score(), None);
    }
}
