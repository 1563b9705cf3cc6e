use crate::core::io::locations::LocationFile;
use crate::core::io::pairs::{PairEntry, PairLine, PairListFile};
use crate::core::io::traits::DataFile;
use crate::core::models::range::DomainRange;
use crate::workflows::SkippedUnit;
use crate::workflows::error::WorkflowError;
use crate::workflows::inputs;
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Largest end of an N-terminal range (`1-N`) that the filter removes.
pub const DEFAULT_MAX_N_TERMINAL_END: usize = 100;

/// Finds `domain` in a domain-annotation file, returning it when any line mentions it.
pub fn find_domain_in_file(path: &Path, domain: &DomainRange) -> Result<Option<DomainRange>, WorkflowError> {
    let text = fs::read_to_string(path).map_err(|source| WorkflowError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let needle = domain.to_string();
    Ok(text
        .lines()
        .any(|line| line.contains(&needle))
        .then(|| domain.clone()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub lines: Vec<PairLine>,
    /// Location files that listed no activation-domain range.
    pub without_ranges: Vec<String>,
    pub skipped: Vec<SkippedUnit>,
}

/// Pairs the target domain with the activation domains found in `ad_dir`.
///
/// Every `*.fa` location file in `ad_dir` that lists at least one range produces a line
/// `TARGET,s-e;TF,s-e,...`, where `TF` is the header of the file's first record and the
/// ranges are all `Location:` ranges of the file. The list is written to `output`.
#[instrument(skip_all, name = "pairs_build_workflow")]
pub fn build(
    target: &str,
    domain: &DomainRange,
    ad_dir: &Path,
    output: &Path,
) -> Result<BuildReport, WorkflowError> {
    let files = inputs::list_files(ad_dir, "fa")?;
    info!(
        "Pairing {},{} with activation domains from {} files.",
        target,
        domain,
        files.len()
    );

    let mut report = BuildReport::default();
    for path in &files {
        let name = inputs::file_name(path);
        let records = match LocationFile::read_from_path(path) {
            Ok(records) => records,
            Err(source) => {
                let e = WorkflowError::Locations {
                    path: path.clone(),
                    source,
                };
                warn!("Skipping {}: {}", name, e);
                report.skipped.push(SkippedUnit {
                    name,
                    reason: e.to_string(),
                });
                continue;
            }
        };
        let Some(first) = records.first() else {
            report.without_ranges.push(name);
            continue;
        };
        let ranges: Vec<DomainRange> = records.iter().flat_map(|r| r.ranges.iter().cloned()).collect();
        if ranges.is_empty() {
            debug!("{} lists no activation domain", name);
            report.without_ranges.push(name);
            continue;
        }
        report.lines.push(PairLine {
            entries: vec![
                PairEntry {
                    protein: target.to_string(),
                    ranges: vec![DomainRange::new(domain.start, domain.end)],
                },
                PairEntry {
                    protein: first.header.clone(),
                    ranges,
                },
            ],
        });
    }

    write_pair_list(output, &report.lines)?;
    info!("Wrote {} pair lines to {:?}.", report.lines.len(), output);
    Ok(report)
}

/// True for ranges `1-N` with `N <= max_end`.
pub fn is_short_n_terminal(range: &DomainRange, max_end: usize) -> bool {
    range.start == 1 && range.end <= max_end
}

/// Removes short N-terminal ranges from every entry and drops entries left without
/// ranges. A line survives only when at least two entries remain.
pub fn filter_line(line: &PairLine, max_end: usize) -> Option<PairLine> {
    let entries: Vec<PairEntry> = line
        .entries
        .iter()
        .filter_map(|entry| {
            let ranges: Vec<DomainRange> = entry
                .ranges
                .iter()
                .filter(|r| !is_short_n_terminal(r, max_end))
                .cloned()
                .collect();
            (!ranges.is_empty()).then(|| PairEntry {
                protein: entry.protein.clone(),
                ranges,
            })
        })
        .collect();
    (entries.len() >= 2).then_some(PairLine { entries })
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterReport {
    pub kept: usize,
    pub dropped: usize,
}

#[instrument(skip_all, name = "pairs_filter_workflow")]
pub fn filter(input: &Path, output: &Path, max_end: usize) -> Result<FilterReport, WorkflowError> {
    let lines = PairListFile::read_from_path(input).map_err(|source| WorkflowError::Pairs {
        path: input.to_path_buf(),
        source,
    })?;
    let kept: Vec<PairLine> = lines.iter().filter_map(|l| filter_line(l, max_end)).collect();
    write_pair_list(output, &kept)?;
    let report = FilterReport {
        kept: kept.len(),
        dropped: lines.len() - kept.len(),
    };
    info!(
        "Filtered pair list: {} lines kept, {} dropped.",
        report.kept, report.dropped
    );
    Ok(report)
}

fn write_pair_list(path: &Path, lines: &[PairLine]) -> Result<(), WorkflowError> {
    let mut out = Vec::new();
    PairListFile::write_to(lines, &mut out).map_err(|source| WorkflowError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    inputs::write_text(path, &out)
}
