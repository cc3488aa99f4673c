use super::atom::AtomRecord;
use nalgebra::Point3;
use std::collections::HashMap;

/// Identifies an atom position by `(residue name, residue number, atom name)`.
///
/// This key ignores the chain identifier and the atom serial, so two records
/// that share it collapse onto one entry of the coordinate index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomKey {
    pub residue_name: String,
    pub residue_number: isize,
    pub atom_name: String,
}

impl AtomKey {
    pub fn new(residue_name: &str, residue_number: isize, atom_name: &str) -> Self {
        Self {
            residue_name: residue_name.to_string(),
            residue_number,
            atom_name: atom_name.to_string(),
        }
    }
}

impl From<&AtomRecord> for AtomKey {
    fn from(atom: &AtomRecord) -> Self {
        Self::new(&atom.residue_name, atom.residue_number, &atom.name)
    }
}

/// The parsed content of one coordinate file.
///
/// Holds every `ATOM` record in file order plus a coordinate index derived from
/// them. A structure is built once and never mutated afterwards.
///
/// # Duplicate keys
///
/// When several records share an [`AtomKey`] (for example the same residue
/// number in two chains, or several models concatenated in one file), the index
/// keeps the coordinate of the **last** such record. The full record list still
/// contains every atom.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    atoms: Vec<AtomRecord>,
    coordinates: HashMap<AtomKey, Point3<f64>>,
}

impl Structure {
    /// Builds a structure from records in file order.
    pub fn from_atoms(atoms: Vec<AtomRecord>) -> Self {
        let mut coordinates = HashMap::with_capacity(atoms.len());
        for atom in &atoms {
            coordinates.insert(AtomKey::from(atom), atom.position);
        }
        Self { atoms, coordinates }
    }

    /// All records in the order they were read.
    #[inline]
    pub fn atoms(&self) -> &[AtomRecord] {
        &self.atoms
    }

    /// The coordinate index keyed by residue name, residue number and atom name.
    #[inline]
    pub fn coordinates(&self) -> &HashMap<AtomKey, Point3<f64>> {
        &self.coordinates
    }

    /// Looks up a coordinate in the index.
    pub fn coordinate(
        &self,
        residue_name: &str,
        residue_number: isize,
        atom_name: &str,
    ) -> Option<&Point3<f64>> {
        self.coordinates
            .get(&AtomKey::new(residue_name, residue_number, atom_name))
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Consumes the structure and returns its records.
    pub fn into_atoms(self) -> Vec<AtomRecord> {
        self.atoms
    }
}
