use crate::core::models::structure::Structure;
use crate::core::utils::geometry::{calculate_rmsd, contact_map, distance};
use crate::engine::config::ComparisonConfig;
use crate::engine::error::EngineError;
use nalgebra::{DMatrix, Point3};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

/// Cα positions keyed by residue number, in ascending residue order.
pub type CaSelection = Vec<(isize, Point3<f64>)>;

pub fn select_alpha_carbons(
    structure: &Structure,
    chain_id: char,
    residues: &RangeInclusive<isize>,
) -> Result<CaSelection, EngineError> {
    let chain = structure
        .chain(chain_id)
        .ok_or(EngineError::ChainNotFound(chain_id))?;
    let mut selection = chain.alpha_carbons(residues);
    selection.sort_by_key(|(number, _)| *number);
    Ok(selection)
}

/// Paired coordinates over the residues present in both selections.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonResidues {
    pub residues: Vec<isize>,
    pub reference: Vec<Point3<f64>>,
    pub target: Vec<Point3<f64>>,
}

pub fn common_residue_ca(
    reference: &[(isize, Point3<f64>)],
    target: &[(isize, Point3<f64>)],
) -> Result<CommonResidues, EngineError> {
    let reference_ids: BTreeSet<isize> = reference.iter().map(|(n, _)| *n).collect();
    let target_ids: BTreeSet<isize> = target.iter().map(|(n, _)| *n).collect();
    let common: BTreeSet<isize> = reference_ids.intersection(&target_ids).copied().collect();
    if common.is_empty() {
        return Err(EngineError::EmptySelection(
            "no common residues between reference and target".into(),
        ));
    }

    let pick = |selection: &[(isize, Point3<f64>)]| -> CaSelection {
        selection
            .iter()
            .filter(|(n, _)| common.contains(n))
            .copied()
            .collect()
    };
    let reference_common = pick(reference);
    let target_common = pick(target);
    if reference_common.len() != target_common.len() {
        return Err(EngineError::ShapeMismatch {
            reference: reference_common.iter().map(|(n, _)| *n).collect(),
            target: target_common.iter().map(|(n, _)| *n).collect(),
        });
    }

    Ok(CommonResidues {
        residues: common.into_iter().collect(),
        reference: reference_common.into_iter().map(|(_, p)| p).collect(),
        target: target_common.into_iter().map(|(_, p)| p).collect(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyDistance {
    pub residue_1: isize,
    pub residue_2: isize,
    pub distance: f64,
}

/// Cα–Cα distances for the residue pairs present in `selection`; absent pairs are skipped.
pub fn key_distances(selection: &[(isize, Point3<f64>)], pairs: &[(isize, isize)]) -> Vec<KeyDistance> {
    let position = |number: isize| {
        selection
            .iter()
            .find(|(n, _)| *n == number)
            .map(|(_, p)| p)
    };
    pairs
        .iter()
        .filter_map(|&(r1, r2)| {
            let (p1, p2) = (position(r1)?, position(r2)?);
            Some(KeyDistance {
                residue_1: r1,
                residue_2: r2,
                distance: distance(p1, p2),
            })
        })
        .collect()
}

pub fn selection_contact_map(selection: &[(isize, Point3<f64>)], threshold: f64) -> DMatrix<bool> {
    let positions: Vec<_> = selection.iter().map(|(_, p)| *p).collect();
    contact_map(&positions, threshold)
}

/// The reference side of a comparison, computed once per batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceProfile {
    pub selection: CaSelection,
    pub key_distances: Vec<KeyDistance>,
    pub contact_map: DMatrix<bool>,
}

impl ReferenceProfile {
    pub fn from_structure(structure: &Structure, config: &ComparisonConfig) -> Result<Self, EngineError> {
        let selection = select_alpha_carbons(structure, config.reference_chain, &config.residues)?;
        if selection.is_empty() {
            return Err(EngineError::EmptySelection(format!(
                "reference chain '{}' has no Cα atoms in residues {}..={}",
                config.reference_chain,
                config.residues.start(),
                config.residues.end()
            )));
        }
        Ok(Self {
            key_distances: key_distances(&selection, &config.key_pairs),
            contact_map: selection_contact_map(&selection, config.contact_threshold),
            selection,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructureComparison {
    pub rmsd: f64,
    pub common_residues: Vec<isize>,
    pub key_distances: Vec<KeyDistance>,
    /// Contact map over every selected target residue, not only the common ones.
    pub contact_map: DMatrix<bool>,
}

/// Compares the configured domain of `target` against the reference, without superposition.
pub fn compare_to_reference(
    reference: &ReferenceProfile,
    target: &Structure,
    config: &ComparisonConfig,
) -> Result<StructureComparison, EngineError> {
    let selection = select_alpha_carbons(target, config.target_chain, &config.residues)?;
    if selection.is_empty() {
        return Err(EngineError::EmptySelection(format!(
            "target chain '{}' has no Cα atoms in residues {}..={}",
            config.target_chain,
            config.residues.start(),
            config.residues.end()
        )));
    }
    let common = common_residue_ca(&reference.selection, &selection)?;
    let rmsd = calculate_rmsd(&common.target, &common.reference).ok_or_else(|| {
        EngineError::EmptySelection("no paired coordinates for RMSD".into())
    })?;
    Ok(StructureComparison {
        rmsd,
        common_residues: common.residues,
        key_distances: key_distances(&selection, &config.key_pairs),
        contact_map: selection_contact_map(&selection, config.contact_threshold),
    })
}
