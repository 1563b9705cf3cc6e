use crate::core::io::tables::{CSV_DELIMITER, write_matrix, write_rows};
use crate::core::utils::geometry::{contact_map_as_int, contact_map_difference};
use crate::engine::compare::{ReferenceProfile, StructureComparison, compare_to_reference};
use crate::engine::config::ComparisonConfig;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::workflows::SkippedUnit;
use crate::workflows::error::WorkflowError;
use crate::workflows::inputs;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

pub const RMSD_TABLE: &str = "rmsd_results.csv";
pub const DISTANCE_TABLE: &str = "distance_results.csv";
pub const REFERENCE_DISTANCE_TABLE: &str = "reference_distance_results.csv";
pub const REFERENCE_CONTACT_MAP: &str = "contact_map_reference.csv";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RmsdRow {
    #[serde(rename = "PDB File")]
    pub pdb_file: String,
    #[serde(rename = "RMSD")]
    pub rmsd: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceRow {
    #[serde(rename = "PDB File")]
    pub pdb_file: String,
    #[serde(rename = "Residue 1")]
    pub residue_1: isize,
    #[serde(rename = "Residue 2")]
    pub residue_2: isize,
    #[serde(rename = "Distance")]
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceDistanceRow {
    #[serde(rename = "Residue 1")]
    pub residue_1: isize,
    #[serde(rename = "Residue 2")]
    pub residue_2: isize,
    #[serde(rename = "Reference Distance")]
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelComparison {
    pub name: String,
    pub path: PathBuf,
    pub comparison: StructureComparison,
    /// False when the target and reference contact maps differ in shape.
    pub has_difference_map: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompareReport {
    pub models: Vec<ModelComparison>,
    pub skipped: Vec<SkippedUnit>,
}

/// Every file named `model_file` below `predictions_dir`, in sorted walk order.
pub fn find_models(predictions_dir: &Path, model_file: &str) -> Result<Vec<PathBuf>, WorkflowError> {
    let mut models = Vec::new();
    for entry in WalkDir::new(predictions_dir).sort_by_file_name() {
        let entry = entry.map_err(|source| WorkflowError::Walk {
            path: predictions_dir.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() && entry.file_name() == model_file {
            models.push(entry.into_path());
        }
    }
    Ok(models)
}

/// Names a model by its path below the predictions directory, joined with `_`.
pub fn model_label(predictions_dir: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(predictions_dir).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("_")
}

fn matrix_file_stem(label: &str) -> &str {
    label.strip_suffix(".pdb").unwrap_or(label)
}

fn compare_model(
    path: &Path,
    label: &str,
    reference: &ReferenceProfile,
    config: &ComparisonConfig,
    output_dir: &Path,
) -> Result<ModelComparison, WorkflowError> {
    let target = inputs::read_structure(path)?;
    let comparison = compare_to_reference(reference, &target, config)?;
    let stem = matrix_file_stem(label);
    write_matrix(
        &output_dir.join(format!("contact_map_{}.csv", stem)),
        &contact_map_as_int(&comparison.contact_map),
    )?;

    let difference = contact_map_difference(&comparison.contact_map, &reference.contact_map);
    let has_difference_map = difference.is_some();
    match difference {
        Some(diff) => write_matrix(&output_dir.join(format!("contact_map_diff_{}.csv", stem)), &diff)?,
        None => warn!(
            "Contact maps of {} ({} residues) and the reference ({} residues) differ in shape; no difference map written",
            label,
            comparison.contact_map.nrows(),
            reference.contact_map.nrows()
        ),
    }

    Ok(ModelComparison {
        name: label.to_string(),
        path: path.to_path_buf(),
        comparison,
        has_difference_map,
    })
}

/// Compares the configured domain of every predicted model against a reference structure.
///
/// The reference selection, key distances and contact map are computed once; a reference
/// that yields no selection aborts the run. Each model's RMSD is taken over the residues
/// it shares with the reference, in the shared coordinate frame.
#[instrument(skip_all, name = "compare_workflow")]
pub fn run(
    reference_pdb: &Path,
    predictions_dir: &Path,
    config: &ComparisonConfig,
    output_dir: &Path,
    reporter: &ProgressReporter,
) -> Result<CompareReport, WorkflowError> {
    inputs::ensure_dir(output_dir)?;
    let reference_structure = inputs::read_structure(reference_pdb)?;
    let reference = ReferenceProfile::from_structure(&reference_structure, config)?;
    info!(
        "Reference chain '{}' has {} Cα atoms in residues {}..={}.",
        config.reference_chain,
        reference.selection.len(),
        config.residues.start(),
        config.residues.end()
    );
    write_matrix(
        &output_dir.join(REFERENCE_CONTACT_MAP),
        &contact_map_as_int(&reference.contact_map),
    )?;

    let models = find_models(predictions_dir, &config.model_file)?;
    info!("Found {} '{}' models to compare.", models.len(), config.model_file);
    reporter.report(Progress::JobStart {
        name: "Structure comparison",
        total_units: models.len() as u64,
    });

    let mut report = CompareReport::default();
    for path in &models {
        let label = model_label(predictions_dir, path);
        reporter.report(Progress::UnitStart { name: label.clone() });
        match compare_model(path, &label, &reference, config, output_dir) {
            Ok(model) => {
                debug!("{}: RMSD {:.3} Å over {} residues", label, model.comparison.rmsd, model.comparison.common_residues.len());
                report.models.push(model);
            }
            Err(e) => {
                warn!("Skipping {}: {}", label, e);
                reporter.report(Progress::UnitSkipped {
                    name: label.clone(),
                    reason: e.to_string(),
                });
                report.skipped.push(SkippedUnit {
                    name: label,
                    reason: e.to_string(),
                });
            }
        }
        reporter.report(Progress::UnitFinish);
    }
    reporter.report(Progress::JobFinish);

    let rmsd_rows: Vec<RmsdRow> = report
        .models
        .iter()
        .map(|m| RmsdRow {
            pdb_file: m.name.clone(),
            rmsd: m.comparison.rmsd,
        })
        .collect();
    let distance_rows: Vec<DistanceRow> = report
        .models
        .iter()
        .flat_map(|m| {
            m.comparison.key_distances.iter().map(|d| DistanceRow {
                pdb_file: m.name.clone(),
                residue_1: d.residue_1,
                residue_2: d.residue_2,
                distance: d.distance,
            })
        })
        .collect();
    let reference_rows: Vec<ReferenceDistanceRow> = reference
        .key_distances
        .iter()
        .map(|d| ReferenceDistanceRow {
            residue_1: d.residue_1,
            residue_2: d.residue_2,
            distance: d.distance,
        })
        .collect();

    write_rows(&output_dir.join(RMSD_TABLE), &rmsd_rows, CSV_DELIMITER)?;
    write_rows(&output_dir.join(DISTANCE_TABLE), &distance_rows, CSV_DELIMITER)?;
    write_rows(&output_dir.join(REFERENCE_DISTANCE_TABLE), &reference_rows, CSV_DELIMITER)?;
    info!(
        "Comparison complete: {} models compared, {} skipped.",
        report.models.len(),
        report.skipped.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::ComparisonConfigBuilder;
    use crate::workflows::inputs::fixtures::atom_line;
    use std::fs;
    use tempfile::tempdir;

    fn write_domain(path: &Path, chain: char, residues: &[isize], y: f64) {
        let lines: Vec<String> = residues
            .iter()
            .enumerate()
            .map(|(i, &n)| atom_line(i + 1, chain, n, [n as f64 * 3.8, y, 0.0]))
            .chain(std::iter::once("END".to_string()))
            .collect();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, lines.join("\n")).unwrap();
    }

    fn config() -> ComparisonConfig {
        ComparisonConfigBuilder::new()
            .reference_chain('A')
            .target_chain('B')
            .residues(1..=4)
            .contact_threshold(5.0)
            .key_pairs(vec![(1, 4)])
            .model_file("ranked_0.pdb")
            .build()
            .unwrap()
    }

    #[test]
    fn labels_join_relative_components() {
        let base = Path::new("/data/predictions");
        let path = base.join("EP300_and_TP53").join("ranked_0.pdb");
        assert_eq!(model_label(base, &path), "EP300_and_TP53_ranked_0.pdb");
    }

    #[test]
    fn models_are_compared_and_tables_written() {
        let dir = tempdir().unwrap();
        let reference = dir.path().join("reference.pdb");
        write_domain(&reference, 'A', &[1, 2, 3, 4, 5], 0.0);
        let predictions = dir.path().join("predictions");
        write_domain(&predictions.join("job1").join("ranked_0.pdb"), 'B', &[1, 2, 3, 4], 2.0);
        write_domain(&predictions.join("job2").join("ranked_0.pdb"), 'B', &[2, 3, 4], 0.0);
        write_domain(&predictions.join("job3").join("ranked_0.pdb"), 'A', &[1, 2], 0.0);
        write_domain(&predictions.join("job1").join("ranked_1.pdb"), 'B', &[1], 0.0);

        let out = dir.path().join("out");
        let report = run(&reference, &predictions, &config(), &out, &ProgressReporter::new()).unwrap();

        assert_eq!(report.models.len(), 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].name, "job3_ranked_0.pdb");

        let job1 = &report.models[0];
        assert_eq!(job1.name, "job1_ranked_0.pdb");
        assert!((job1.comparison.rmsd - 2.0).abs() < 1e-6);
        assert!(job1.has_difference_map);
        let job2 = &report.models[1];
        assert_eq!(job2.comparison.common_residues, vec![2, 3, 4]);
        assert!(!job2.has_difference_map);

        let rmsd = fs::read_to_string(out.join(RMSD_TABLE)).unwrap();
        assert!(rmsd.starts_with("PDB File,RMSD\njob1_ranked_0.pdb,"));
        let distances = fs::read_to_string(out.join(DISTANCE_TABLE)).unwrap();
        assert_eq!(distances.lines().count(), 2);
        let reference_distances = fs::read_to_string(out.join(REFERENCE_DISTANCE_TABLE)).unwrap();
        assert!(reference_distances.starts_with("Residue 1,Residue 2,Reference Distance\n1,4,"));

        let map = fs::read_to_string(out.join("contact_map_job1_ranked_0.csv")).unwrap();
        assert_eq!(map.lines().next(), Some("0,1,0,0"));
        let diff = fs::read_to_string(out.join("contact_map_diff_job1_ranked_0.csv")).unwrap();
        assert_eq!(diff.lines().next(), Some("0,0,0,0"));
        assert!(out.join(REFERENCE_CONTACT_MAP).exists());
        assert!(!out.join("contact_map_diff_job2_ranked_0.csv").exists());
    }
}
