use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlphaMissenseError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Variant '{0}' has no residue position")]
    InvalidVariant(String),
}

#[derive(Debug, Deserialize)]
struct SubstitutionRow {
    protein_variant: String,
    am_pathogenicity: f64,
}

/// Residue position encoded in a variant string such as `M1A`.
pub fn variant_position(variant: &str) -> Option<usize> {
    let mut chars = variant.chars();
    chars.next()?;
    chars.next_back()?;
    chars.as_str().parse().ok()
}

/// Reads an AlphaMissense substitution table into a per-position pathogenicity profile.
///
/// Every position carries several substitutions; the last row seen for a position wins.
pub fn read_substitutions(reader: impl Read) -> Result<BTreeMap<usize, f64>, AlphaMissenseError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut scores = BTreeMap::new();
    for row in csv_reader.deserialize::<SubstitutionRow>() {
        let row = row?;
        let position = variant_position(&row.protein_variant)
            .ok_or_else(|| AlphaMissenseError::InvalidVariant(row.protein_variant.clone()))?;
        scores.insert(position, row.am_pathogenicity);
    }
    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_parsed_from_variants() {
        assert_eq!(variant_position("M1A"), Some(1));
        assert_eq!(variant_position("P1234L"), Some(1234));
        assert_eq!(variant_position("MA"), None);
        assert_eq!(variant_position(""), None);
    }

    #[test]
    fn last_substitution_per_position_wins() {
        let text = "uniprot_id,protein_variant,am_pathogenicity,am_class\n\
                    P1,M1A,0.3,ambiguous\n\
                    P1,M1C,0.4,ambiguous\n\
                    P1,K2A,0.9,likely_pathogenic\n";
        let scores = read_substitutions(text.as_bytes()).unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[&1], 0.4);
        assert_eq!(scores[&2], 0.9);
    }

    #[test]
    fn malformed_variant_is_reported() {
        let text = "protein_variant,am_pathogenicity\nXY,0.1\n";
        assert!(matches!(
            read_substitutions(text.as_bytes()),
            Err(AlphaMissenseError::InvalidVariant(v)) if v == "XY"
        ));
    }
}
