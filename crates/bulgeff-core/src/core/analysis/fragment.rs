use crate::core::io::pdb::{PdbError, PdbFile};
use crate::core::io::traits::StructureFile;
use crate::core::models::atom::{AtomRecord, superposition_points};
use crate::core::models::structure::Structure;
use nalgebra::Point3;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FragmentError {
    #[error(
        "Missing residues in trinucleotide around {residue_name}-{residue_number}: {}",
        .missing.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(", ")
    )]
    MissingResidues {
        residue_name: String,
        residue_number: isize,
        missing: Vec<isize>,
    },
}

/// The trinucleotide `(i-1, i, i+1)` centred on a bulged residue.
///
/// Atoms are kept in file order. The central residue only contributes atoms
/// whose residue name matches the bulge, while the flanking positions accept any
/// residue name.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    residue_name: String,
    residue_number: isize,
    atoms: Vec<AtomRecord>,
}

impl Fragment {
    pub fn residue_name(&self) -> &str {
        &self.residue_name
    }

    pub fn residue_number(&self) -> isize {
        self.residue_number
    }

    pub fn atoms(&self) -> &[AtomRecord] {
        &self.atoms
    }

    /// P and C4' positions used to superpose prototypes onto this fragment.
    pub fn superposition_points(&self) -> Vec<Point3<f64>> {
        superposition_points(&self.atoms)
    }

    /// Serializes the fragment as fixed-column `ATOM` records.
    ///
    /// # Errors
    ///
    /// Propagates writer failures from the PDB serializer.
    pub fn to_pdb_string(&self) -> Result<String, PdbError> {
        PdbFile::write_to_string(&self.atoms)
    }
}

/// Extracts the trinucleotide around residue `(residue_name, residue_number)`.
///
/// # Errors
///
/// Returns [`FragmentError::MissingResidues`] naming every residue number of the
/// trinucleotide that contributed no atoms.
pub fn extract_trinucleotide(
    structure: &Structure,
    residue_name: &str,
    residue_number: isize,
) -> Result<Fragment, FragmentError> {
    debug!(
        "Processing trinucleotide with bulge residue: {}-{}",
        residue_number, residue_name
    );

    let targets = [residue_number - 1, residue_number, residue_number + 1];
    let mut found: BTreeMap<isize, &str> = BTreeMap::new();
    let mut atoms = Vec::new();

    for atom in structure.atoms() {
        let in_window = targets.contains(&atom.residue_number);
        let name_ok = atom.residue_number != residue_number || atom.residue_name == residue_name;
        if in_window && name_ok {
            found.insert(atom.residue_number, &atom.residue_name);
            atoms.push(atom.clone());
        }
    }

    let missing: Vec<isize> = targets
        .iter()
        .filter(|n| !found.contains_key(n))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(FragmentError::MissingResidues {
            residue_name: residue_name.to_string(),
            residue_number,
            missing,
        });
    }

    info!("Found trinucleotide atoms for residues: {:?}", found);
    Ok(Fragment {
        residue_name: residue_name.to_string(),
        residue_number,
        atoms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn atom(serial: usize, name: &str, res: &str, num: isize) -> AtomRecord {
        AtomRecord::new(serial, name, res, 'A', num, Point3::new(serial as f64, 0.0, 0.0))
    }

    fn structure() -> Structure {
        Structure::from_atoms(vec![
            atom(1, "P", "A", 4),
            atom(2, "P", "C", 5),
            atom(3, "C4'", "C", 5),
            atom(4, "P", "G", 6),
            atom(5, "C4'", "G", 6),
            atom(6, "N9", "G", 6),
            atom(7, "P", "U", 7),
            atom(8, "C4'", "U", 7),
            atom(9, "P", "A", 8),
        ])
    }

    #[test]
    fn extracts_three_residues_in_file_order() {
        let fragment = extract_trinucleotide(&structure(), "G", 6).unwrap();

        let serials: Vec<_> = fragment.atoms().iter().map(|a| a.serial).collect();
        assert_eq!(serials, vec![2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(fragment.residue_name(), "G");
        assert_eq!(fragment.residue_number(), 6);
    }

    #[test]
    fn superposition_points_skip_other_atoms() {
        let fragment = extract_trinucleotide(&structure(), "G", 6).unwrap();
        assert_eq!(fragment.superposition_points().len(), 6);
    }

    #[test]
    fn central_residue_requires_matching_name() {
        let mut atoms = structure().into_atoms();
        atoms.push(atom(10, "P", "A", 6));
        let fragment = extract_trinucleotide(&Structure::from_atoms(atoms), "G", 6).unwrap();
        assert!(fragment.atoms().iter().all(|a| a.serial != 10));
    }

    #[test]
    fn mismatched_central_name_reports_the_missing_residue() {
        let err = extract_trinucleotide(&structure(), "A", 6).unwrap_err();
        assert_eq!(
            err,
            FragmentError::MissingResidues {
                residue_name: "A".into(),
                residue_number: 6,
                missing: vec![6],
            }
        );
    }

    #[test]
    fn neighbours_are_accepted_by_position_alone() {
        let fragment = extract_trinucleotide(&structure(), "U", 7).unwrap();
        let names: Vec<_> = fragment.atoms().iter().map(|a| a.residue_name.as_str()).collect();
        assert!(names.contains(&"G"));
        assert!(names.contains(&"A"));
    }

    #[test]
    fn terminal_residue_is_missing_a_neighbour() {
        let err = extract_trinucleotide(&structure(), "A", 8).unwrap_err();
        let FragmentError::MissingResidues { missing, .. } = &err;
        assert_eq!(missing, &vec![9]);
        assert!(err.to_string().contains("A-8"));
    }

    #[test]
    fn serialized_fragment_parses_back_to_the_same_atoms() {
        let fragment = extract_trinucleotide(&structure(), "G", 6).unwrap();
        let text = fragment.to_pdb_string().unwrap();

        let reread = PdbFile::read_from(&mut Cursor::new(text)).unwrap();
        assert_eq!(reread.atoms(), fragment.atoms());
    }
}
