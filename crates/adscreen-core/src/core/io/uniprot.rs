//! Feature annotations from UniProtKB JSON entries.

use crate::core::models::feature::FeatureAnnotation;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(default)]
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    #[serde(rename = "type", default)]
    feature_type: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    note: String,
    #[serde(default)]
    location: RawLocation,
}

#[derive(Debug, Default, Deserialize)]
struct RawLocation {
    #[serde(default)]
    start: RawPosition,
    #[serde(default)]
    end: RawPosition,
}

#[derive(Debug, Default, Deserialize)]
struct RawPosition {
    #[serde(default)]
    value: Option<usize>,
}

/// Extracts the feature list of a UniProtKB entry. Entries without features yield an
/// empty list.
pub fn parse_features(json: &str) -> Result<Vec<FeatureAnnotation>, serde_json::Error> {
    let entry: Entry = serde_json::from_str(json)?;
    Ok(entry
        .features
        .into_iter()
        .map(|f| FeatureAnnotation {
            feature_type: f.feature_type,
            description: f.description,
            note: f.note,
            start: f.location.start.value,
            end: f.location.end.value,
        })
        .collect())
}
