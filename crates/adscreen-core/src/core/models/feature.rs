use crate::core::models::range::DomainRange;

/// One feature of a protein entry, as reported by an external annotation service.
///
/// Positions are 1-indexed and inclusive; either bound may be absent when the service
/// reports an unknown position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeatureAnnotation {
    pub feature_type: String,
    pub description: String,
    pub note: String,
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl FeatureAnnotation {
    /// True when any keyword occurs, case-insensitively, in the type, description or note.
    pub fn matches_any<S: AsRef<str>>(&self, keywords: &[S]) -> bool {
        let fields = [
            self.feature_type.to_lowercase(),
            self.description.to_lowercase(),
            self.note.to_lowercase(),
        ];
        keywords.iter().any(|keyword| {
            let keyword = keyword.as_ref().to_lowercase();
            fields.iter().any(|field| field.contains(&keyword))
        })
    }

    /// The feature's range, when both bounds are known and ordered.
    pub fn range(&self) -> Option<DomainRange> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start <= end => Some(DomainRange::new(start, end)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(feature_type: &str, description: &str) -> FeatureAnnotation {
        FeatureAnnotation {
            feature_type: feature_type.into(),
            description: description.into(),
            start: Some(10),
            end: Some(70),
            ..Default::default()
        }
    }

    #[test]
    fn keyword_match_ignores_case() {
        assert!(feature("DNA-Binding region", "").matches_any(&["dna-binding"]));
        assert!(feature("Domain", "Homeobox").matches_any(&["HOMEOBOX"]));
        assert!(!feature("Region", "Disordered").matches_any(&["homeobox", "bhlh"]));
    }

    #[test]
    fn note_field_is_searched() {
        let f = FeatureAnnotation {
            note: "C2H2-type zinc finger".into(),
            ..feature("Region", "")
        };
        assert!(f.matches_any(&["zinc finger"]));
    }

    #[test]
    fn range_requires_both_bounds() {
        assert_eq!(feature("Domain", "").range(), Some(DomainRange::new(10, 70)));
        let open = FeatureAnnotation {
            end: None,
            ..feature("Domain", "")
        };
        assert_eq!(open.range(), None);
    }
}
