use nalgebra::Point3;
use std::collections::HashMap;
use std::ops::RangeInclusive;

pub const ALPHA_CARBON: &str = "CA";

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub serial: usize,         // Atom serial number from the source file
    pub name: String,          // Atom name (e.g., "CA", "N")
    pub position: Point3<f64>, // Cartesian coordinates in Ångström
}

#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub number: isize,           // Residue sequence number from the source file
    pub name: String,            // Residue name (e.g., "ALA")
    pub(crate) atoms: Vec<Atom>, // Atoms in file order
}

impl Residue {
    pub(crate) fn new(number: isize, name: &str) -> Self {
        Self {
            number,
            name: name.to_string(),
            atoms: Vec::new(),
        }
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// First atom with the given name (alternate locations keep only the first copy).
    pub fn atom(&self, name: &str) -> Option<&Atom> {
        self.atoms.iter().find(|a| a.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub id: char,                      // Chain identifier (e.g., 'A', 'B')
    pub(crate) residues: Vec<Residue>, // Residues in file order
}

impl Chain {
    pub(crate) fn new(id: char) -> Self {
        Self {
            id,
            residues: Vec::new(),
        }
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Alpha-carbon positions keyed by residue number, restricted to `numbers`.
    ///
    /// When a residue number occurs more than once only its first CA is kept, so the
    /// result holds at most one position per residue, in file order.
    pub fn alpha_carbons(&self, numbers: &RangeInclusive<isize>) -> Vec<(isize, Point3<f64>)> {
        let mut seen = std::collections::HashSet::new();
        self.residues
            .iter()
            .filter(|r| numbers.contains(&r.number))
            .filter_map(|r| r.atom(ALPHA_CARBON).map(|a| (r.number, a.position)))
            .filter(|(number, _)| seen.insert(*number))
            .collect()
    }
}

/// An atomic coordinate model: chains of residues of atoms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    chains: Vec<Chain>,
}

impl Structure {
    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    pub fn chain(&self, id: char) -> Option<&Chain> {
        self.chains.iter().find(|c| c.id == id)
    }

    /// Residue counts of every chain, in file order.
    pub fn chain_lengths(&self) -> Vec<usize> {
        self.chains.iter().map(Chain::len).collect()
    }

    pub fn atom_count(&self) -> usize {
        self.chains
            .iter()
            .flat_map(|c| c.residues.iter())
            .map(|r| r.atoms.len())
            .sum()
    }
}

/// Incremental builder used by the coordinate readers.
///
/// Atoms are appended to the current residue of the current chain. Re-opening a chain
/// that was seen before continues that chain; a residue is started whenever the residue
/// number changes.
#[derive(Debug, Default)]
pub struct StructureBuilder {
    structure: Structure,
    chain_index: HashMap<char, usize>,
    current_chain: Option<usize>,
}

impl StructureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_chain(&mut self, id: char) -> &mut Self {
        let idx = *self.chain_index.entry(id).or_insert_with(|| {
            self.structure.chains.push(Chain::new(id));
            self.structure.chains.len() - 1
        });
        self.current_chain = Some(idx);
        self
    }

    pub fn start_residue(&mut self, number: isize, name: &str) -> &mut Self {
        if self.current_chain.is_none() {
            self.start_chain(' ');
        }
        let Some(idx) = self.current_chain else {
            return self;
        };
        self.structure.chains[idx]
            .residues
            .push(Residue::new(number, name));
        self
    }

    /// Adds an atom to the current residue.
    ///
    /// Returns `false` when no residue has been started yet.
    pub fn add_atom(&mut self, serial: usize, name: &str, position: Point3<f64>) -> bool {
        let Some(residue) = self
            .current_chain
            .and_then(|idx| self.structure.chains[idx].residues.last_mut())
        else {
            return false;
        };
        residue.atoms.push(Atom {
            serial,
            name: name.to_string(),
            position,
        });
        true
    }

    pub fn is_empty(&self) -> bool {
        self.structure.atom_count() == 0
    }

    pub fn build(self) -> Structure {
        self.structure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_chain_structure() -> Structure {
        let mut builder = StructureBuilder::new();
        builder.start_chain('A');
        for n in 1..=3 {
            builder.start_residue(n, "ALA");
            builder.add_atom(n as usize * 2 - 1, "N", Point3::new(n as f64, 0.0, 0.0));
            builder.add_atom(n as usize * 2, "CA", Point3::new(n as f64, 1.0, 0.0));
        }
        builder.start_chain('B');
        builder.start_residue(10, "GLY");
        builder.add_atom(7, "CA", Point3::new(0.0, 0.0, 5.0));
        builder.build()
    }

    #[test]
    fn builder_groups_atoms_into_chains_and_residues() {
        let structure = two_chain_structure();
        assert_eq!(structure.chain_lengths(), vec![3, 1]);
        assert_eq!(structure.atom_count(), 7);
        assert_eq!(structure.chain('B').unwrap().residues()[0].name, "GLY");
    }

    #[test]
    fn reopening_a_chain_appends_to_it() {
        let mut builder = StructureBuilder::new();
        builder.start_chain('A').start_residue(1, "ALA");
        builder.add_atom(1, "CA", Point3::origin());
        builder.start_chain('B').start_residue(1, "GLY");
        builder.add_atom(2, "CA", Point3::origin());
        builder.start_chain('A').start_residue(2, "SER");
        builder.add_atom(3, "CA", Point3::origin());
        let structure = builder.build();
        assert_eq!(structure.chain_lengths(), vec![2, 1]);
    }

    #[test]
    fn add_atom_without_residue_is_rejected() {
        let mut builder = StructureBuilder::new();
        assert!(!builder.add_atom(1, "CA", Point3::origin()));
        assert!(builder.is_empty());
    }

    #[test]
    fn alpha_carbons_respect_range_and_skip_duplicate_residues() {
        let mut builder = StructureBuilder::new();
        builder.start_chain('A');
        builder.start_residue(5, "ALA");
        builder.add_atom(1, "CA", Point3::new(1.0, 0.0, 0.0));
        builder.start_residue(6, "ALA");
        builder.add_atom(2, "CA", Point3::new(2.0, 0.0, 0.0));
        builder.start_residue(6, "ALA");
        builder.add_atom(3, "CA", Point3::new(9.0, 0.0, 0.0));
        builder.start_residue(7, "ALA");
        builder.add_atom(4, "N", Point3::new(3.0, 0.0, 0.0));
        builder.start_residue(8, "ALA");
        builder.add_atom(5, "CA", Point3::new(4.0, 0.0, 0.0));
        let structure = builder.build();

        let cas = structure.chain('A').unwrap().alpha_carbons(&(5..=7));
        assert_eq!(cas.len(), 2);
        assert_eq!(cas[0].0, 5);
        assert_eq!(cas[1], (6, Point3::new(2.0, 0.0, 0.0)));
    }
}
