use crate::engine::config::NovelConfig;
use std::collections::BTreeMap;

/// A candidate activation region and its mean pathogenicity and confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRegion {
    pub start: usize,
    pub end: usize,
    pub mean_score: f64,
    /// `None` when no pLDDT value covers the region.
    pub mean_plddt: Option<f64>,
}

fn mean_over(values: &BTreeMap<usize, f64>, start: usize, end: usize) -> Option<f64> {
    let (sum, count) = values
        .range(start..=end)
        .fold((0.0, 0usize), |(s, c), (_, v)| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Scans a per-position pathogenicity profile for high-scoring stretches flanked by
/// low scores next to confidently predicted residues.
///
/// Positions are visited in ascending order, skipping the first and the last. A region
/// opens at position `i` when its score is at least `score_high`, one neighbour scores
/// at most `score_low` and one neighbour has pLDDT of at least `plddt_high`. An open
/// region closes at the first later position that fails the opening test and either
/// scores below `score_high` or is followed by a score of at most `score_low`. Regions
/// still open at the end of the profile are dropped. Missing pLDDT counts as 0.
pub fn find_candidate_regions(
    scores: &BTreeMap<usize, f64>,
    plddt: &BTreeMap<usize, f64>,
    config: &NovelConfig,
) -> Vec<CandidateRegion> {
    let positions: Vec<(usize, f64)> = scores.iter().map(|(&p, &s)| (p, s)).collect();
    let plddt_of = |position: usize| plddt.get(&position).copied().unwrap_or(0.0);

    let mut regions = Vec::new();
    let mut open: Option<usize> = None;
    for window in positions.windows(3) {
        let [(prev_pos, prev), (pos, current), (next_pos, next)] = window else {
            continue;
        };
        let opens = *current >= config.score_high
            && (*prev <= config.score_low || *next <= config.score_low)
            && (plddt_of(*prev_pos) >= config.plddt_high || plddt_of(*next_pos) >= config.plddt_high);

        if opens {
            if open.is_none() {
                open = Some(*pos);
            }
        } else if let Some(start) = open {
            if *current < config.score_high || *next <= config.score_low {
                let end = *pos;
                regions.push(CandidateRegion {
                    start,
                    end,
                    mean_score: mean_over(scores, start, end).unwrap_or(0.0),
                    mean_plddt: mean_over(plddt, start, end),
                });
                open = None;
            }
        }
    }
    regions
}

/// 1-indexed pLDDT profile of a prediction.
pub fn plddt_profile(plddt: &[f64]) -> BTreeMap<usize, f64> {
    plddt.iter().enumerate().map(|(i, &v)| (i + 1, v)).collect()
}
