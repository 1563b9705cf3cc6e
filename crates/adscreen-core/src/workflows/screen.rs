use crate::core::io::ranking::RankingFile;
use crate::core::io::tables::{CSV_DELIMITER, write_rows};
use crate::core::io::traits::DataFile;
use crate::engine::config::ScreenConfig;
use crate::engine::interface::has_confident_interface;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::workflows::SkippedUnit;
use crate::workflows::error::WorkflowError;
use crate::workflows::inputs;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

pub const RANKING_FILE: &str = "ranking_debug.json";
pub const GOOD_JOBS_TABLE: &str = "good_jobs.csv";

/// A prediction job named by a `group:` header, with the files it must contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobGroup {
    pub name: String,
    pub files: Vec<String>,
}

/// Parses a job listing: each line ending in `:` opens a group, the following
/// non-blank lines name files inside it. Lines before the first header are ignored.
pub fn parse_job_listing(text: &str) -> Vec<JobGroup> {
    let mut groups: Vec<JobGroup> = Vec::new();
    for line in text.lines().map(str::trim) {
        if let Some(name) = line.strip_suffix(':') {
            groups.push(JobGroup {
                name: name.trim().to_string(),
                files: Vec::new(),
            });
        } else if !line.is_empty() {
            if let Some(group) = groups.last_mut() {
                group.files.push(line.to_string());
            }
        }
    }
    groups
}

#[derive(Debug, Clone)]
pub struct ScreenInputs<'a> {
    /// Directory holding one subdirectory per job group.
    pub base_dir: &'a Path,
    pub listing: &'a Path,
    /// Structure whose chain lengths partition the PAE matrix.
    pub pdb_name: &'a str,
}

/// A job whose best model shows a confident inter-chain contact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoodJob {
    #[serde(rename = "jobs")]
    pub job: String,
    #[serde(rename = "iptm+ptm")]
    pub iptm_ptm: f64,
    pub iptm: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenReport {
    /// Passing jobs, best ipTM first.
    pub good_jobs: Vec<GoodJob>,
    /// Groups skipped because a listed file is absent.
    pub incomplete_groups: Vec<String>,
    pub missing_ranking: usize,
    /// Groups that were examined but have no confident inter-chain entry.
    pub rejected: Vec<String>,
    pub skipped: Vec<SkippedUnit>,
}

enum JobOutcome {
    Good(GoodJob),
    Rejected,
    NoRanking,
}

fn missing_files(base_dir: &Path, group: &JobGroup) -> Vec<PathBuf> {
    group
        .files
        .iter()
        .map(|file| base_dir.join(&group.name).join(file))
        .filter(|path| !path.exists())
        .collect()
}

fn screen_job(
    job_dir: &Path,
    name: &str,
    pdb_name: &str,
    config: &ScreenConfig,
) -> Result<JobOutcome, WorkflowError> {
    let ranking_path = job_dir.join(RANKING_FILE);
    if !ranking_path.is_file() {
        return Ok(JobOutcome::NoRanking);
    }
    let ranking = RankingFile::read_from_path(&ranking_path).map_err(|source| WorkflowError::Ranking {
        path: ranking_path.clone(),
        source,
    })?;
    let (Some(best_model), Some(iptm_ptm)) = (ranking.best_model(), ranking.best_score()) else {
        debug!("{} has no combined iptm+ptm score for its best model", name);
        return Ok(JobOutcome::Rejected);
    };

    let structure = inputs::read_structure(&job_dir.join(pdb_name))?;
    let result = inputs::read_prediction(&job_dir.join(format!("result_{}.json", best_model)))?;
    if has_confident_interface(&result.pae, &structure.chain_lengths(), config.pae_cutoff)? {
        Ok(JobOutcome::Good(GoodJob {
            job: name.to_string(),
            iptm_ptm,
            iptm: result.iptm,
        }))
    } else {
        Ok(JobOutcome::Rejected)
    }
}

/// Screens every complete job group of the listing for confident inter-chain PAE and
/// writes the passing jobs to [`GOOD_JOBS_TABLE`] in `output_dir`.
#[instrument(skip_all, name = "screen_workflow")]
pub fn run(
    inputs: &ScreenInputs<'_>,
    config: &ScreenConfig,
    output_dir: &Path,
    reporter: &ProgressReporter,
) -> Result<ScreenReport, WorkflowError> {
    inputs::ensure_dir(output_dir)?;
    let text = fs::read_to_string(inputs.listing).map_err(|source| WorkflowError::Io {
        path: inputs.listing.to_path_buf(),
        source,
    })?;
    let groups = parse_job_listing(&text);
    info!(
        "Screening {} job groups with inter-chain PAE cutoff {}.",
        groups.len(),
        config.pae_cutoff
    );
    reporter.report(Progress::JobStart {
        name: "Interface screen",
        total_units: groups.len() as u64,
    });

    let mut report = ScreenReport::default();
    for group in &groups {
        reporter.report(Progress::UnitStart {
            name: group.name.clone(),
        });
        let missing = missing_files(inputs.base_dir, group);
        if !missing.is_empty() {
            warn!("Skipping group {} due to missing files: {:?}", group.name, missing);
            reporter.report(Progress::UnitSkipped {
                name: group.name.clone(),
                reason: format!("{} listed files missing", missing.len()),
            });
            report.incomplete_groups.push(group.name.clone());
            reporter.report(Progress::UnitFinish);
            continue;
        }

        let job_dir = inputs.base_dir.join(&group.name);
        match screen_job(&job_dir, &group.name, inputs.pdb_name, config) {
            Ok(JobOutcome::Good(job)) => {
                debug!("{} passes with ipTM {:.3}", job.job, job.iptm);
                report.good_jobs.push(job);
            }
            Ok(JobOutcome::Rejected) => report.rejected.push(group.name.clone()),
            Ok(JobOutcome::NoRanking) => {
                warn!("{} not found for {}", RANKING_FILE, group.name);
                report.missing_ranking += 1;
            }
            Err(e) => {
                warn!("Skipping group {}: {}", group.name, e);
                reporter.report(Progress::UnitSkipped {
                    name: group.name.clone(),
                    reason: e.to_string(),
                });
                report.skipped.push(SkippedUnit {
                    name: group.name.clone(),
                    reason: e.to_string(),
                });
            }
        }
        reporter.report(Progress::UnitFinish);
    }
    reporter.report(Progress::JobFinish);

    report
        .good_jobs
        .sort_by(|a, b| b.iptm.total_cmp(&a.iptm));
    write_rows(&output_dir.join(GOOD_JOBS_TABLE), &report.good_jobs, CSV_DELIMITER)?;
    info!(
        "Screen complete: {} good jobs, {} rejected, {} incomplete groups, {} without {}.",
        report.good_jobs.len(),
        report.rejected.len(),
        report.incomplete_groups.len(),
        report.missing_ranking,
        RANKING_FILE
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::inputs::fixtures::{write_chains_pdb, write_prediction};
    use nalgebra::DMatrix;
    use tempfile::tempdir;

    fn write_job(base: &Path, name: &str, inter: f64, iptm: f64) {
        let dir = base.join(name);
        fs::create_dir_all(&dir).unwrap();
        write_chains_pdb(&dir.join("ranked_0.pdb"), &[('A', 2), ('B', 1)]);
        let pae = DMatrix::from_fn(3, 3, |i, j| if (i < 2) == (j < 2) { 0.5 } else { inter });
        write_prediction(
            &dir.join("result_model_3_multimer_v3_pred_0.json"),
            pae,
            iptm,
            0.5,
        );
        fs::write(
            dir.join(RANKING_FILE),
            format!(
                r#"{{"iptm+ptm": {{"model_3_multimer_v3_pred_0": {}}}, "order": ["model_3_multimer_v3_pred_0"]}}"#,
                iptm + 0.1
            ),
        )
        .unwrap();
    }

    #[test]
    fn listing_groups_follow_colon_headers() {
        let text = "stray.txt\njob_a:\nranked_0.pdb\n\nranking_debug.json\njob_b :\n";
        let groups = parse_job_listing(text);
        assert_eq!(
            groups,
            vec![
                JobGroup {
                    name: "job_a".into(),
                    files: vec!["ranked_0.pdb".into(), "ranking_debug.json".into()],
                },
                JobGroup {
                    name: "job_b".into(),
                    files: Vec::new(),
                },
            ]
        );
    }

    #[test]
    fn good_jobs_are_ranked_by_iptm() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("predictions");
        write_job(&base, "weak", 5.0, 0.3);
        write_job(&base, "strong", 5.0, 0.8);
        write_job(&base, "no_contact", 25.0, 0.9);
        fs::create_dir_all(base.join("unranked")).unwrap();
        fs::write(base.join("unranked").join("ranked_0.pdb"), "END\n").unwrap();

        let listing = dir.path().join("file_list.txt");
        fs::write(
            &listing,
            "weak:\nranked_0.pdb\nstrong:\nranked_0.pdb\nno_contact:\nranked_0.pdb\n\
             incomplete:\nranked_0.pdb\nunranked:\nranked_0.pdb\n",
        )
        .unwrap();

        let inputs = ScreenInputs {
            base_dir: &base,
            listing: &listing,
            pdb_name: "ranked_0.pdb",
        };
        let out = dir.path().join("out");
        let report = run(&inputs, &ScreenConfig::default(), &out, &ProgressReporter::new()).unwrap();

        let names: Vec<_> = report.good_jobs.iter().map(|j| j.job.as_str()).collect();
        assert_eq!(names, vec!["strong", "weak"]);
        assert_eq!(report.rejected, vec!["no_contact"]);
        assert_eq!(report.incomplete_groups, vec!["incomplete"]);
        assert_eq!(report.missing_ranking, 1);

        let table = fs::read_to_string(out.join(GOOD_JOBS_TABLE)).unwrap();
        let mut lines = table.lines();
        assert_eq!(lines.next(), Some("jobs,iptm+ptm,iptm"));
        assert!(lines.next().unwrap().starts_with("strong,"));
    }
}
