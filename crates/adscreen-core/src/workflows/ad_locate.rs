use crate::core::io::exemplars::ExemplarLibrary;
use crate::core::io::locations::{LocationFile, LocationRecord};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::regions::find_exemplar_matches;
use crate::workflows::SkippedUnit;
use crate::workflows::error::WorkflowError;
use crate::workflows::inputs;
use std::path::Path;
use tracing::{info, instrument, warn};

pub const NO_DOMAIN_NOTE: &str = "No activation domain detected";
pub const NO_DOMAIN_LIST: &str = "no_activation_domain.txt";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdLocateReport {
    /// FASTA files with at least one exemplar match.
    pub with_domain: Vec<String>,
    /// FASTA files without any match; also written to [`NO_DOMAIN_LIST`].
    pub without_domain: Vec<String>,
    pub skipped: Vec<SkippedUnit>,
}

/// Searches every `*.fa` file in `fasta_dir` for activation-domain exemplars.
///
/// Each input gets a same-named location file in `output_dir` listing every match,
/// one `Location:` line each, without merging.
#[instrument(skip_all, name = "ad_locate_workflow")]
pub fn run(
    fasta_dir: &Path,
    exemplars: &ExemplarLibrary,
    output_dir: &Path,
    reporter: &ProgressReporter,
) -> Result<AdLocateReport, WorkflowError> {
    inputs::ensure_dir(output_dir)?;
    let files = inputs::list_files(fasta_dir, "fa")?;
    info!(
        "Searching {} FASTA files against {} activation-domain exemplars.",
        files.len(),
        exemplars.len()
    );
    reporter.report(Progress::JobStart {
        name: "AD search",
        total_units: files.len() as u64,
    });

    let mut report = AdLocateReport::default();
    for path in &files {
        let name = inputs::file_name(path);
        reporter.report(Progress::UnitStart { name: name.clone() });
        match locate_in_file(path, exemplars, &output_dir.join(&name)) {
            Ok(true) => report.with_domain.push(name),
            Ok(false) => report.without_domain.push(name),
            Err(e) => {
                warn!("Skipping {}: {}", name, e);
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

    let mut listing = String::new();
    for name in &report.without_domain {
        listing.push_str(name);
        listing.push('\n');
    }
    inputs::write_text(&output_dir.join(NO_DOMAIN_LIST), listing.as_bytes())?;

    reporter.report(Progress::JobFinish);
    info!(
        "AD search complete: {} with domains, {} without, {} skipped.",
        report.with_domain.len(),
        report.without_domain.len(),
        report.skipped.len()
    );
    Ok(report)
}

fn locate_in_file(
    path: &Path,
    exemplars: &ExemplarLibrary,
    output: &Path,
) -> Result<bool, WorkflowError> {
    let sequence = inputs::read_first_sequence(path)?;
    let mut record = LocationRecord::new(&sequence.description);
    record.ranges = find_exemplar_matches(&sequence, exemplars);
    let found = !record.ranges.is_empty();
    if !found {
        record.notes.push(NO_DOMAIN_NOTE.to_string());
    }

    let mut out = Vec::new();
    LocationFile::write_to(&[record], &mut out).map_err(|source| WorkflowError::Io {
        path: output.to_path_buf(),
        source,
    })?;
    inputs::write_text(output, &out)?;
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::exemplars::Exemplar;
    use std::fs;
    use tempfile::tempdir;

    fn exemplars() -> ExemplarLibrary {
        ExemplarLibrary::new(vec![
            Exemplar {
                family: "GCN4".into(),
                fragment: "1".into(),
                sequence: "DFDLDML".into(),
            },
            Exemplar {
                family: "VP16".into(),
                fragment: "2".into(),
                sequence: "PADALDDFDLDML".into(),
            },
        ])
    }

    #[test]
    fn matches_and_misses_are_written() {
        let dir = tempdir().unwrap();
        let fasta_dir = dir.path().join("fasta");
        let out_dir = dir.path().join("out");
        fs::create_dir(&fasta_dir).unwrap();
        fs::write(fasta_dir.join("TF1_P1.fa"), ">TF1_P1 activator\nMMPADALDD\nFDLDMLKK\n").unwrap();
        fs::write(fasta_dir.join("TF2_P2.fa"), ">TF2_P2\nMKKKKKKK\n").unwrap();
        fs::write(fasta_dir.join("broken.fa"), "").unwrap();

        let report = run(&fasta_dir, &exemplars(), &out_dir, &ProgressReporter::new()).unwrap();
        assert_eq!(report.with_domain, vec!["TF1_P1.fa"]);
        assert_eq!(report.without_domain, vec!["TF2_P2.fa"]);
        assert_eq!(report.skipped.len(), 1);

        let hit = fs::read_to_string(out_dir.join("TF1_P1.fa")).unwrap();
        assert_eq!(
            hit,
            ">TF1_P1 activator\nLocation: 9-15\nLocation: 3-15\n"
        );
        let miss = fs::read_to_string(out_dir.join("TF2_P2.fa")).unwrap();
        assert_eq!(miss, ">TF2_P2\nNo activation domain detected\n");
        let listing = fs::read_to_string(out_dir.join(NO_DOMAIN_LIST)).unwrap();
        assert_eq!(listing, "TF2_P2.fa\n");
    }
}
