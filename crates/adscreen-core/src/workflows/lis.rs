use crate::core::io::tables::{CSV_DELIMITER, write_rows};
use crate::core::models::structure::Structure;
use crate::engine::classify::{Classification, classify, optimal_threshold_table};
use crate::engine::config::ScoringConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::scoring::{round_to, score_sample};
use crate::workflows::SkippedUnit;
use crate::workflows::error::WorkflowError;
use crate::workflows::inputs;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

pub const TOTAL_TABLE: &str = "Total_Prediction.csv";
pub const POSITIVE_TABLE: &str = "Positive_PPI.csv";
pub const THRESHOLD_TABLE: &str = "Optimal_Thresholds.csv";

/// Where to look for prediction directories and how to label the two partners.
#[derive(Debug, Clone)]
pub struct LisInputs<'a> {
    pub base_dir: &'a Path,
    /// Only subdirectories whose names start with this prefix are scored.
    pub prefix: Option<&'a str>,
    pub protein_1: &'a str,
    pub protein_2: &'a str,
}

/// One scored sample, in the column layout of the prediction tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LisRow {
    #[serde(rename = "Protein_1")]
    pub protein_1: String,
    #[serde(rename = "Protein_2")]
    pub protein_2: String,
    #[serde(rename = "LIS")]
    pub lis: f64,
    #[serde(rename = "LIA")]
    pub lia: usize,
    #[serde(rename = "ipTM")]
    pub iptm: f64,
    #[serde(rename = "Confidence")]
    pub confidence: f64,
    #[serde(rename = "pTM")]
    pub ptm: f64,
    #[serde(rename = "pLDDT")]
    pub plddt: Option<f64>,
    #[serde(rename = "Model")]
    pub model: usize,
    #[serde(rename = "Recycle")]
    pub recycle: usize,
    #[serde(rename = "saved folder")]
    pub saved_folder: String,
    pub pdb: String,
    pub result: String,
}

/// The outcome for one prediction directory.
#[derive(Debug, Clone, PartialEq)]
pub struct PairOutcome {
    pub directory: PathBuf,
    pub classification: Classification,
    pub rows: Vec<LisRow>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LisReport {
    pub pairs: Vec<PairOutcome>,
    pub skipped: Vec<SkippedUnit>,
}

impl LisReport {
    pub fn total_rows(&self) -> Vec<LisRow> {
        self.pairs.iter().flat_map(|p| p.rows.iter().cloned()).collect()
    }

    pub fn positive_rows(&self) -> Vec<LisRow> {
        self.pairs
            .iter()
            .filter(|p| p.classification.positive)
            .flat_map(|p| p.rows.iter().cloned())
            .collect()
    }

    pub fn positive_count(&self) -> usize {
        self.pairs.iter().filter(|p| p.classification.positive).count()
    }
}

/// Residue count of the configured partition chain, or of the first chain in file order.
///
/// An unset chain never falls back to looking up chain `B` by name.
pub fn partition_point(structure: &Structure, chain: Option<char>) -> Result<usize, EngineError> {
    match chain {
        Some(id) => structure
            .chain(id)
            .map(|c| c.len())
            .ok_or(EngineError::ChainNotFound(id)),
        None => structure
            .chains()
            .first()
            .map(|c| c.len())
            .ok_or_else(|| EngineError::EmptySelection("structure has no chains".into())),
    }
}

/// Scores every sample of one prediction directory and classifies the pair.
pub fn score_directory(
    dir: &Path,
    config: &ScoringConfig,
    protein_1: &str,
    protein_2: &str,
) -> Result<PairOutcome, WorkflowError> {
    let structure = inputs::read_structure(&dir.join(&config.pdb_name))?;
    let k = partition_point(&structure, config.partition_chain)?;
    debug!("Partition point for {:?}: {}", dir, k);

    let saved_folder = dir.to_string_lossy().into_owned();
    let mut rows = Vec::new();
    for (model, pred) in config.samples() {
        let result_name = config.result_file_name(model, pred);
        let result = match inputs::read_prediction(&dir.join(&result_name)) {
            Ok(result) => result,
            Err(e) => {
                warn!("Skipping sample {}: {}", result_name, e);
                continue;
            }
        };
        let score = score_sample(&result, k, config.pae_cutoff)?;
        rows.push(LisRow {
            protein_1: protein_1.to_string(),
            protein_2: protein_2.to_string(),
            lis: round_to(score.lis, 3),
            lia: score.lia,
            iptm: round_to(score.iptm, 3),
            confidence: round_to(score.confidence, 3),
            ptm: round_to(score.ptm, 3),
            plddt: score.mean_plddt.map(|p| round_to(p, 2)),
            model,
            recycle: pred,
            saved_folder: saved_folder.clone(),
            pdb: config.pdb_name.clone(),
            result: result_name,
        });
    }

    let samples: Vec<(f64, usize)> = rows.iter().map(|r| (r.lis, r.lia)).collect();
    let classification = classify(&samples, &config.thresholds)
        .ok_or_else(|| EngineError::NoSamples(saved_folder.clone()))?;
    Ok(PairOutcome {
        directory: dir.to_path_buf(),
        classification,
        rows,
    })
}

/// Scores every matching prediction directory under `inputs.base_dir` and writes the
/// total, positive and threshold tables to `output_dir`.
#[instrument(skip_all, name = "lis_workflow")]
pub fn run(
    inputs: &LisInputs<'_>,
    config: &ScoringConfig,
    output_dir: &Path,
    reporter: &ProgressReporter,
) -> Result<LisReport, WorkflowError> {
    inputs::ensure_dir(output_dir)?;
    let dirs = inputs::list_subdirs(inputs.base_dir, inputs.prefix)?;
    info!(
        "Scoring {} prediction directories (PAE cutoff {}).",
        dirs.len(),
        config.pae_cutoff
    );
    reporter.report(Progress::JobStart {
        name: "LIS scoring",
        total_units: dirs.len() as u64,
    });

    let mut report = LisReport::default();
    for dir in &dirs {
        let name = inputs::file_name(dir);
        reporter.report(Progress::UnitStart { name: name.clone() });
        match score_directory(dir, config, inputs.protein_1, inputs.protein_2) {
            Ok(outcome) => {
                debug!(
                    "{}: best LIS {:.3}, best LIA {}, positive = {}",
                    name,
                    outcome.classification.best_lis,
                    outcome.classification.best_lia,
                    outcome.classification.positive
                );
                report.pairs.push(outcome);
            }
            Err(e) => {
                warn!("Error processing directory {}: {}", name, e);
                reporter.report(Progress::UnitSkipped {
                    name: name.clone(),
                    reason: e.to_string(),
                });
                report.skipped.push(SkippedUnit {
                    name,
                    reason: e.to_string(),
                });
            }
        }
        reporter.report(Progress::UnitFinish);
    }
    reporter.report(Progress::JobFinish);

    let total = report.total_rows();
    let positive = report.positive_rows();
    write_rows(&output_dir.join(TOTAL_TABLE), &total, CSV_DELIMITER)?;
    write_rows(&output_dir.join(POSITIVE_TABLE), &positive, CSV_DELIMITER)?;
    write_rows(
        &output_dir.join(THRESHOLD_TABLE),
        &optimal_threshold_table(),
        CSV_DELIMITER,
    )?;
    info!(
        "Wrote {} rows to '{}' and {} rows to '{}' ({} positive pairs).",
        total.len(),
        TOTAL_TABLE,
        positive.len(),
        POSITIVE_TABLE,
        report.positive_count()
    );
    Ok(report)
}
