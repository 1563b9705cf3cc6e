use crate::core::io::tables::{TSV_DELIMITER, write_rows_with_header};
use crate::engine::config::NovelConfig;
use crate::engine::novel::{CandidateRegion, find_candidate_regions, plddt_profile};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::workflows::SkippedUnit;
use crate::workflows::error::WorkflowError;
use crate::workflows::inputs;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

pub const REGION_TABLE_HEADER: [&str; 5] = [
    "TF",
    "UniprotID",
    "Region",
    "Average_AFmissense",
    "Average_pLDDT",
];

/// Supplies per-position pathogenicity scores for a UniProt accession.
///
/// Returns `None` when no substitution table is available.
pub trait SubstitutionSource {
    fn substitutions(&mut self, accession: &str) -> Option<BTreeMap<usize, f64>>;
}

impl<F> SubstitutionSource for F
where
    F: FnMut(&str) -> Option<BTreeMap<usize, f64>>,
{
    fn substitutions(&mut self, accession: &str) -> Option<BTreeMap<usize, f64>> {
        self(accession)
    }
}

#[derive(Debug, Clone)]
pub struct NovelInputs<'a> {
    /// FASTA files named `<TF>_<UniProt>.fa`.
    pub fasta_dir: &'a Path,
    pub predictions_dir: &'a Path,
    /// Result file holding the pLDDT profile inside a prediction directory.
    pub result_file: &'a str,
}

/// Splits `<TF>_<UniProt>.fa` at the first underscore.
pub fn split_file_name(name: &str) -> Option<(&str, &str)> {
    let stem = name.strip_suffix(".fa")?;
    let (tf, accession) = stem.split_once('_')?;
    (!tf.is_empty() && !accession.is_empty()).then_some((tf, accession))
}

/// The first prediction directory whose name contains `accession` and which holds
/// `result_file`, in sorted walk order.
pub fn find_prediction_for(
    predictions_dir: &Path,
    accession: &str,
    result_file: &str,
) -> Result<Option<PathBuf>, WorkflowError> {
    for entry in WalkDir::new(predictions_dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|source| WorkflowError::Walk {
            path: predictions_dir.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_dir() || !entry.file_name().to_string_lossy().contains(accession) {
            continue;
        }
        let candidate = entry.path().join(result_file);
        if candidate.is_file() {
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}

#[derive(Debug, Clone, PartialEq)]
pub struct NovelRegion {
    pub tf: String,
    pub accession: String,
    pub region: CandidateRegion,
}

#[derive(Debug, Serialize)]
struct RegionRow {
    tf: String,
    accession: String,
    region: String,
    mean_score: String,
    mean_plddt: String,
}

impl From<&NovelRegion> for RegionRow {
    fn from(found: &NovelRegion) -> Self {
        Self {
            tf: found.tf.clone(),
            accession: found.accession.clone(),
            region: format!("{}-{}", found.region.start, found.region.end),
            mean_score: format!("{:.4}", found.region.mean_score),
            mean_plddt: found
                .region
                .mean_plddt
                .map(|p| format!("{:.4}", p))
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NovelReport {
    pub regions: Vec<NovelRegion>,
    /// Accessions for which no substitution table was available.
    pub without_substitutions: Vec<String>,
    pub skipped: Vec<SkippedUnit>,
}

enum Outcome {
    Regions(Vec<CandidateRegion>),
    NoSubstitutions,
}

fn scan_file(
    path: &Path,
    accession: &str,
    inputs: &NovelInputs<'_>,
    substitutions: &mut impl SubstitutionSource,
    config: &NovelConfig,
) -> Result<Outcome, WorkflowError> {
    let sequence = inputs::read_first_sequence(path)?;
    debug!("Read {} ({} residues)", sequence.id, sequence.len());

    let prediction = find_prediction_for(inputs.predictions_dir, accession, inputs.result_file)?
        .ok_or_else(|| WorkflowError::Input {
            path: path.to_path_buf(),
            message: format!("no prediction found for UniProt ID {}", accession),
        })?;
    let result = inputs::read_prediction(&prediction)?;
    let plddt = plddt_profile(&result.plddt);

    let Some(scores) = substitutions.substitutions(accession) else {
        return Ok(Outcome::NoSubstitutions);
    };
    Ok(Outcome::Regions(find_candidate_regions(&scores, &plddt, config)))
}

/// Scans every `<TF>_<UniProt>.fa` file for candidate activation regions and writes
/// them as a tab-separated table to `output`. The header is written even when no
/// region is found.
#[instrument(skip_all, name = "novel_workflow")]
pub fn run(
    inputs: &NovelInputs<'_>,
    substitutions: &mut impl SubstitutionSource,
    config: &NovelConfig,
    output: &Path,
    reporter: &ProgressReporter,
) -> Result<NovelReport, WorkflowError> {
    let files = inputs::list_files(inputs.fasta_dir, "fa")?;
    info!("Scanning {} FASTA files for candidate activation regions.", files.len());
    reporter.report(Progress::JobStart {
        name: "Novel region scan",
        total_units: files.len() as u64,
    });

    let mut report = NovelReport::default();
    for path in &files {
        let name = inputs::file_name(path);
        reporter.report(Progress::UnitStart { name: name.clone() });
        let result = match split_file_name(&name) {
            Some((tf, accession)) => {
                scan_file(path, accession, inputs, substitutions, config).map(|outcome| (tf, accession, outcome))
            }
            None => Err(WorkflowError::Input {
                path: path.clone(),
                message: "file name is not of the form <TF>_<UniProt>.fa".into(),
            }),
        };

        match result {
            Ok((tf, accession, Outcome::Regions(regions))) => {
                debug!("{}: {} candidate regions", accession, regions.len());
                report.regions.extend(regions.into_iter().map(|region| NovelRegion {
                    tf: tf.to_string(),
                    accession: accession.to_string(),
                    region,
                }));
            }
            Ok((_, accession, Outcome::NoSubstitutions)) => {
                warn!("No AlphaMissense data found for {}", accession);
                report.without_substitutions.push(accession.to_string());
            }
            Err(e) => {
                warn!("Skipping {}: {}", name, e);
                reporter.report(Progress::UnitSkipped {
                    name: name.clone(),
                    reason: e.to_string(),
                });
                report.skipped.push(SkippedUnit {
                    name: name.clone(),
                    reason: e.to_string(),
                });
            }
        }
        reporter.report(Progress::UnitFinish);
    }
    reporter.report(Progress::JobFinish);

    let rows: Vec<RegionRow> = report.regions.iter().map(RegionRow::from).collect();
    write_rows_with_header(output, &REGION_TABLE_HEADER, &rows, TSV_DELIMITER)?;
    info!(
        "Found {} candidate regions; {} accessions without substitution data, {} files skipped.",
        report.regions.len(),
        report.without_substitutions.len(),
        report.skipped.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::inputs::fixtures::write_prediction;
    use nalgebra::DMatrix;
    use std::fs;
    use tempfile::tempdir;

    const RESULT: &str = "result_model_1_multimer_v3_pred_0.json";

    #[test]
    fn file_names_split_at_first_underscore() {
        assert_eq!(split_file_name("TP53_P04637.fa"), Some(("TP53", "P04637")));
        assert_eq!(split_file_name("NKX2_1_P43699.fa"), Some(("NKX2", "1_P43699")));
        assert_eq!(split_file_name("TP53.fa"), None);
        assert_eq!(split_file_name("TP53_P04637.txt"), None);
    }

    #[test]
    fn prediction_lookup_requires_the_result_file() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("EP300_and_P04637_empty")).unwrap();
        let with_result = dir.path().join("EP300_and_P04637");
        fs::create_dir_all(&with_result).unwrap();
        write_prediction(&with_result.join(RESULT), DMatrix::zeros(2, 2), 0.5, 0.5);

        let found = find_prediction_for(dir.path(), "P04637", RESULT).unwrap();
        assert_eq!(found, Some(with_result.join(RESULT)));
        assert_eq!(find_prediction_for(dir.path(), "Q00000", RESULT).unwrap(), None);
    }

    #[test]
    fn regions_are_written_per_accession() {
        let dir = tempdir().unwrap();
        let fasta_dir = dir.path().join("fasta");
        let predictions = dir.path().join("predictions");
        fs::create_dir_all(&fasta_dir).unwrap();
        fs::write(fasta_dir.join("TF1_P11111.fa"), ">P11111\nMKVLAAG\n").unwrap();
        fs::write(fasta_dir.join("TF2_P22222.fa"), ">P22222\nMKV\n").unwrap();
        fs::write(fasta_dir.join("TF3_P33333.fa"), ">P33333\nMKV\n").unwrap();
        let pred_dir = predictions.join("EP300_and_P11111");
        fs::create_dir_all(&pred_dir).unwrap();
        write_prediction(&pred_dir.join(RESULT), DMatrix::zeros(7, 7), 0.5, 0.5);
        let pred_dir = predictions.join("EP300_and_P22222");
        fs::create_dir_all(&pred_dir).unwrap();
        write_prediction(&pred_dir.join(RESULT), DMatrix::zeros(3, 3), 0.5, 0.5);

        let mut source = |accession: &str| match accession {
            "P11111" => Some(plddt_profile(&[0.1, 0.1, 0.9, 0.8, 0.3, 0.1, 0.1])),
            _ => None,
        };
        let inputs = NovelInputs {
            fasta_dir: &fasta_dir,
            predictions_dir: &predictions,
            result_file: RESULT,
        };
        let output = dir.path().join("Novel_ADs.tsv");
        let report = run(
            &inputs,
            &mut source,
            &NovelConfig::default(),
            &output,
            &ProgressReporter::new(),
        )
        .unwrap();

        assert_eq!(report.regions.len(), 1);
        assert_eq!(report.without_substitutions, vec!["P22222"]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].name, "TF3_P33333.fa");

        let table = fs::read_to_string(&output).unwrap();
        assert_eq!(
            table,
            "TF\tUniprotID\tRegion\tAverage_AFmissense\tAverage_pLDDT\n\
             TF1\tP11111\t3-5\t0.6667\t75.0000\n"
        );
    }
}
