use crate::core::io::exemplars::ExemplarLibrary;
use crate::core::io::locations::{LocationFile, LocationRecord};
use crate::core::io::tables::append_line;
use crate::core::models::feature::FeatureAnnotation;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::regions::{DomainResolution, resolve_domain};
use crate::workflows::SkippedUnit;
use crate::workflows::error::WorkflowError;
use crate::workflows::inputs;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

pub const VALID_LOG: &str = "valid_dbd_log.txt";
pub const MISSING_LOG: &str = "missing_dbd_log.txt";
pub const OUTPUT_SUFFIX: &str = ".dbd_locations.txt";

/// Supplies feature annotations for a sequence accession.
///
/// Returns `None` when the annotation service has no entry or cannot be reached.
pub trait FeatureSource {
    fn features(&mut self, accession: &str) -> Option<Vec<FeatureAnnotation>>;
}

impl<F> FeatureSource for F
where
    F: FnMut(&str) -> Option<Vec<FeatureAnnotation>>,
{
    fn features(&mut self, accession: &str) -> Option<Vec<FeatureAnnotation>> {
        self(accession)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DbdLocateReport {
    /// Number of records with a located domain.
    pub located: usize,
    /// Number of records written with a reason instead of a location.
    pub missing: usize,
    /// Records resolved through the feature-annotation fallback.
    pub from_features: usize,
    /// Records whose feature lookup returned no entry.
    pub lookup_unavailable: usize,
    pub skipped: Vec<SkippedUnit>,
}

/// Locates the DNA-binding domain of every record in every `*.fa` file of `fasta_dir`.
///
/// Writes `<file>.dbd_locations.txt` per input and appends the input's file name to
/// [`VALID_LOG`] or [`MISSING_LOG`] once per record. Both logs are recreated per run.
#[instrument(skip_all, name = "dbd_locate_workflow")]
pub fn run<S: AsRef<str>>(
    fasta_dir: &Path,
    exemplars: &ExemplarLibrary,
    keywords: &[S],
    features: &mut impl FeatureSource,
    output_dir: &Path,
    reporter: &ProgressReporter,
) -> Result<DbdLocateReport, WorkflowError> {
    inputs::ensure_dir(output_dir)?;
    let valid_log = output_dir.join(VALID_LOG);
    let missing_log = output_dir.join(MISSING_LOG);
    inputs::write_text(&valid_log, b"")?;
    inputs::write_text(&missing_log, b"")?;

    let files = inputs::list_files(fasta_dir, "fa")?;
    info!(
        "Locating DNA-binding domains in {} FASTA files ({} exemplars).",
        files.len(),
        exemplars.len()
    );
    reporter.report(Progress::JobStart {
        name: "DBD search",
        total_units: files.len() as u64,
    });

    let mut report = DbdLocateReport::default();
    for path in &files {
        let name = inputs::file_name(path);
        reporter.report(Progress::UnitStart { name: name.clone() });
        let result = inputs::read_sequences(path).and_then(|records| {
            let mut located = Vec::with_capacity(records.len());
            let mut written = Vec::with_capacity(records.len());
            for sequence in &records {
                debug!("Processing sequence {} with length {}", sequence.id, sequence.len());
                let resolution = resolve_domain(sequence, exemplars, keywords, || {
                    features.features(&sequence.id)
                });
                if resolution == DomainResolution::LookupUnavailable {
                    reporter.report(Progress::Message(format!(
                        "No feature annotations available for {}",
                        sequence.id
                    )));
                }
                let mut record = LocationRecord::new(&sequence.id);
                match (resolution.range(), resolution.reason()) {
                    (Some(range), _) => record.ranges.push(range.clone()),
                    (None, Some(reason)) => record.notes.push(reason.to_string()),
                    (None, None) => {}
                }
                located.push(resolution);
                written.push(record);
            }
            let mut out = Vec::new();
            let output = output_dir.join(format!("{}{}", name, OUTPUT_SUFFIX));
            LocationFile::write_to(&written, &mut out).map_err(|source| WorkflowError::Io {
                path: output.clone(),
                source,
            })?;
            inputs::write_text(&output, &out)?;
            Ok(located)
        });

        match result {
            Ok(resolutions) => {
                for resolution in resolutions {
                    if resolution.range().is_some() {
                        report.located += 1;
                        if matches!(resolution, DomainResolution::FromFeatures(_)) {
                            report.from_features += 1;
                        }
                        append_line(&valid_log, &name)?;
                    } else {
                        if resolution == DomainResolution::LookupUnavailable {
                            report.lookup_unavailable += 1;
                        }
                        report.missing += 1;
                        append_line(&missing_log, &name)?;
                    }
                }
            }
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

    reporter.report(Progress::JobFinish);
    info!(
        "DBD search complete: {} located ({} from feature annotations), {} missing ({} without annotations), {} files skipped.",
        report.located,
        report.from_features,
        report.missing,
        report.lookup_unavailable,
        report.skipped.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::exemplars::Exemplar;
    use crate::engine::regions::DBD_KEYWORDS;
    use std::fs;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    fn homeobox_library() -> ExemplarLibrary {
        ExemplarLibrary::new(vec![Exemplar {
            family: "Homeodomain".into(),
            fragment: String::new(),
            sequence: "RRKRTAYT".into(),
        }])
    }

    #[test]
    fn exemplar_hits_feature_fallback_and_misses_are_logged() {
        let dir = tempdir().unwrap();
        let fasta_dir = dir.path().join("fasta");
        let out_dir = dir.path().join("dbd");
        fs::create_dir(&fasta_dir).unwrap();
        fs::write(fasta_dir.join("HOXA1_P1.fa"), ">P1\nMSSRRKRTAYTKKQ\n").unwrap();
        fs::write(fasta_dir.join("MYB_P2.fa"), ">P2\nMAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA\n").unwrap();
        fs::write(fasta_dir.join("ORPHAN_P3.fa"), ">P3\nMKV\n").unwrap();

        let mut lookups = Vec::new();
        let mut source = |accession: &str| {
            lookups.push(accession.to_string());
            match accession {
                "P2" => Some(vec![FeatureAnnotation {
                    feature_type: "Domain".into(),
                    description: "HTH myb-type".into(),
                    start: Some(10),
                    end: Some(30),
                    ..Default::default()
                }]),
                _ => None,
            }
        };

        let report = run(
            &fasta_dir,
            &homeobox_library(),
            &DBD_KEYWORDS,
            &mut source,
            &out_dir,
            &ProgressReporter::new(),
        )
        .unwrap();
        assert_eq!(lookups, vec!["P2", "P3"]);
        assert_eq!(report.located, 2);
        assert_eq!(report.from_features, 1);
        assert_eq!(report.missing, 1);
        assert_eq!(report.lookup_unavailable, 1);

        let hox = fs::read_to_string(out_dir.join("HOXA1_P1.fa.dbd_locations.txt")).unwrap();
        assert_eq!(hox, ">P1\nLocation: 4-11\n");
        let myb = fs::read_to_string(out_dir.join("MYB_P2.fa.dbd_locations.txt")).unwrap();
        assert_eq!(myb, ">P2\nLocation: 10-30\n");
        let orphan = fs::read_to_string(out_dir.join("ORPHAN_P3.fa.dbd_locations.txt")).unwrap();
        assert_eq!(
            orphan,
            ">P3\nNo relevant features found in UniProt search results.\n"
        );

        let valid = fs::read_to_string(out_dir.join(VALID_LOG)).unwrap();
        assert_eq!(valid, "HOXA1_P1.fa\nMYB_P2.fa\n");
        let missing = fs::read_to_string(out_dir.join(MISSING_LOG)).unwrap();
        assert_eq!(missing, "ORPHAN_P3.fa\n");
    }

    #[test]
    fn unavailable_lookup_is_reported_and_counted() {
        let dir = tempdir().unwrap();
        let fasta_dir = dir.path().join("fasta");
        let out_dir = dir.path().join("dbd");
        fs::create_dir(&fasta_dir).unwrap();
        fs::write(fasta_dir.join("ORPHAN_P3.fa"), ">P3\nMKV\n").unwrap();
        fs::write(fasta_dir.join("PLAIN_P4.fa"), ">P4\nMKV\n").unwrap();

        let messages = Arc::new(Mutex::new(Vec::new()));
        let sink = messages.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |event: Progress| {
            if let Progress::Message(msg) = event {
                sink.lock().unwrap().push(msg);
            }
        }));
        let mut source = |accession: &str| match accession {
            "P4" => Some(Vec::new()),
            _ => None,
        };

        let report = run(
            &fasta_dir,
            &homeobox_library(),
            &DBD_KEYWORDS,
            &mut source,
            &out_dir,
            &reporter,
        )
        .unwrap();
        assert_eq!(report.missing, 2);
        assert_eq!(report.lookup_unavailable, 1);
        assert_eq!(
            *messages.lock().unwrap(),
            vec!["No feature annotations available for P3".to_string()]
        );

        let orphan = fs::read_to_string(out_dir.join("ORPHAN_P3.fa.dbd_locations.txt")).unwrap();
        let plain = fs::read_to_string(out_dir.join("PLAIN_P4.fa.dbd_locations.txt")).unwrap();
        assert_eq!(orphan, ">P3\nNo relevant features found in UniProt search results.\n");
        assert_eq!(plain, ">P4\nNo relevant features found in UniProt search results.\n");
    }
}
