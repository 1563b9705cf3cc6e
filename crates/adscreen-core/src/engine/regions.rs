use crate::core::io::exemplars::ExemplarLibrary;
use crate::core::models::feature::FeatureAnnotation;
use crate::core::models::range::{DomainRange, merge_ranges};
use crate::core::models::sequence::SequenceRecord;
use tracing::debug;

/// Keywords that mark a feature annotation as a DNA-binding domain.
pub const DBD_KEYWORDS: [&str; 30] = [
    "homeobox",
    "helix-turn-helix",
    "zinc finger",
    "leucine zipper",
    "winged helix",
    "forkhead",
    "ets",
    "tea",
    "gata-type",
    "nr c4-type",
    "hox",
    "myb",
    "rel",
    "pou",
    "mhox",
    "dm",
    "bhlh",
    "zf-c2h2",
    "zf-c4",
    "zf-c3h1",
    "t-box",
    "sry",
    "ctf/nf-i",
    "nfat",
    "dna-binding",
    "dna binding",
    "dna-binding",
    "dna binding",
    "nucleic acid binding",
    "sequence-specific dna binding",
];

pub fn default_dbd_keywords() -> Vec<String> {
    DBD_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

/// Locates every exemplar that occurs verbatim in `sequence`.
///
/// Only the first occurrence of each exemplar is reported, as a 1-indexed inclusive range
/// tagged with the exemplar's family. Results follow library order.
pub fn find_exemplar_matches(
    sequence: &SequenceRecord,
    exemplars: &ExemplarLibrary,
) -> Vec<DomainRange> {
    exemplars
        .exemplars()
        .iter()
        .filter_map(|exemplar| {
            let fragment = exemplar.sequence.trim();
            sequence.find(fragment).map(|start0| {
                DomainRange::with_family(start0 + 1, start0 + fragment.len(), &exemplar.family)
            })
        })
        .collect()
}

/// Ranges of the features whose type, description or note mentions any keyword.
pub fn features_matching_keywords<S: AsRef<str>>(
    features: &[FeatureAnnotation],
    keywords: &[S],
) -> Vec<DomainRange> {
    features
        .iter()
        .filter(|f| f.matches_any(keywords))
        .filter_map(FeatureAnnotation::range)
        .collect()
}

/// Drops ranges that span the whole sequence.
pub fn discard_full_length(ranges: Vec<DomainRange>, sequence_len: usize) -> Vec<DomainRange> {
    ranges
        .into_iter()
        .filter(|r| !r.is_full_length(sequence_len))
        .collect()
}

/// Where a domain call came from, or why none was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainResolution {
    FromExemplars(DomainRange),
    FromFeatures(DomainRange),
    /// Exemplars matched, but every match spanned the full sequence.
    NoValidExemplarMatches,
    /// Relevant features were reported, but every one spanned the full sequence.
    NoValidFeatures,
    /// No exemplar matched and the reported features had none of the keywords.
    NoRelevantFeatures,
    /// No exemplar matched and the annotation service returned no entry.
    LookupUnavailable,
}

impl DomainResolution {
    pub fn range(&self) -> Option<&DomainRange> {
        match self {
            Self::FromExemplars(r) | Self::FromFeatures(r) => Some(r),
            _ => None,
        }
    }

    /// The note written in place of a location when nothing was kept.
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            Self::FromExemplars(_) | Self::FromFeatures(_) => None,
            Self::NoValidExemplarMatches => Some("No valid DBD locations found."),
            Self::NoValidFeatures => Some("No valid features found in UniProt search results."),
            Self::NoRelevantFeatures | Self::LookupUnavailable => {
                Some("No relevant features found in UniProt search results.")
            }
        }
    }
}

/// Resolves the domain of one sequence.
///
/// Exemplar matches are tried first. Only when none match is `lookup_features` called;
/// it returns `None` when the annotation service has no data. Degenerate full-length
/// ranges are discarded, the rest merged, and the first merged range is kept.
pub fn resolve_domain<S, F>(
    sequence: &SequenceRecord,
    exemplars: &ExemplarLibrary,
    keywords: &[S],
    lookup_features: F,
) -> DomainResolution
where
    S: AsRef<str>,
    F: FnOnce() -> Option<Vec<FeatureAnnotation>>,
{
    let matches = find_exemplar_matches(sequence, exemplars);
    if !matches.is_empty() {
        debug!("{}: {} exemplar matches", sequence.id, matches.len());
        return match first_merged(matches, sequence.len()) {
            Some(range) => DomainResolution::FromExemplars(range),
            None => DomainResolution::NoValidExemplarMatches,
        };
    }

    let Some(features) = lookup_features() else {
        return DomainResolution::LookupUnavailable;
    };
    let relevant = features_matching_keywords(&features, keywords);
    if relevant.is_empty() {
        return DomainResolution::NoRelevantFeatures;
    }
    debug!("{}: {} relevant features", sequence.id, relevant.len());
    match first_merged(relevant, sequence.len()) {
        Some(range) => DomainResolution::FromFeatures(range),
        None => DomainResolution::NoValidFeatures,
    }
}

fn first_merged(ranges: Vec<DomainRange>, sequence_len: usize) -> Option<DomainRange> {
    let kept = discard_full_length(ranges, sequence_len);
    merge_ranges(&kept).into_iter().next()
}
