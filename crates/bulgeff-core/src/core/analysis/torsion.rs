use crate::core::models::atom::{C4_PRIME, PHOSPHORUS};
use crate::core::models::structure::Structure;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TorsionError {
    #[error("Residue {residue_name} with ID {residue_number} not found in any chain.")]
    ResidueNotFound {
        residue_name: String,
        residue_number: isize,
    },
    #[error("Missing atom(s) for eta/theta: {}", .missing.join(", "))]
    MissingAtoms { missing: Vec<String> },
}

/// Atom serials defining the eta and theta pseudo-torsions of a bulged residue `i`.
///
/// - eta = C4'(i-1), P(i), C4'(i), P(i+1)
/// - theta = P(i), C4'(i), P(i+1), C4'(i+1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TorsionAtoms {
    pub eta: [usize; 4],
    pub theta: [usize; 4],
}

impl TorsionAtoms {
    fn from_backbone(c4_prev: usize, p: usize, c4: usize, p_next: usize, c4_next: usize) -> Self {
        Self {
            eta: [c4_prev, p, c4, p_next],
            theta: [p, c4, p_next, c4_next],
        }
    }
}

/// Comma-separated serial list, e.g. `12,34,56,78`.
pub struct SerialList<'a>(pub &'a [usize; 4]);

impl fmt::Display for SerialList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{},{},{},{}", a, b, c, d)
    }
}

/// Locates the five backbone atoms spanning residues `i-1..=i+1` and builds the
/// eta/theta serial groups.
///
/// The chain is taken from the first atom of residue `(residue_name,
/// residue_number)`; only atoms of that chain are considered afterwards. Atoms of
/// residue `i` must carry the bulge residue name, flanking residues are matched
/// by number. When an atom occurs more than once, the last occurrence is used.
///
/// # Errors
///
/// Returns [`TorsionError::ResidueNotFound`] if the residue is absent, and
/// [`TorsionError::MissingAtoms`] listing labels such as `C4'_5` or `P_7` for
/// every backbone atom that could not be found.
pub fn locate_torsion_atoms(
    structure: &Structure,
    residue_name: &str,
    residue_number: isize,
) -> Result<TorsionAtoms, TorsionError> {
    debug!(
        "Locating eta/theta atoms for bulge residue: {}, bulge residue id: {}",
        residue_name, residue_number
    );

    let chain_id = structure
        .atoms()
        .iter()
        .find(|atom| atom.belongs_to(residue_name, residue_number))
        .map(|atom| atom.chain_id)
        .ok_or_else(|| TorsionError::ResidueNotFound {
            residue_name: residue_name.to_string(),
            residue_number,
        })?;

    let (mut c4_prev, mut p, mut c4, mut p_next, mut c4_next) = (None, None, None, None, None);
    for atom in structure.atoms().iter().filter(|a| a.chain_id == chain_id) {
        let name = atom.name.as_str();
        if atom.belongs_to(residue_name, residue_number) {
            match name {
                PHOSPHORUS => p = Some(atom.serial),
                C4_PRIME => c4 = Some(atom.serial),
                _ => {}
            }
        } else if atom.residue_number == residue_number - 1 {
            if name == C4_PRIME {
                c4_prev = Some(atom.serial);
            }
        } else if atom.residue_number == residue_number + 1 {
            match name {
                PHOSPHORUS => p_next = Some(atom.serial),
                C4_PRIME => c4_next = Some(atom.serial),
                _ => {}
            }
        }
    }

    match (c4_prev, p, c4, p_next, c4_next) {
        (Some(c4_prev), Some(p), Some(c4), Some(p_next), Some(c4_next)) => {
            let atoms = TorsionAtoms::from_backbone(c4_prev, p, c4, p_next, c4_next);
            info!("Atom id of eta: {}", SerialList(&atoms.eta));
            info!("Atom id of theta: {}", SerialList(&atoms.theta));
            Ok(atoms)
        }
        _ => {
            let required = [
                (c4_prev, C4_PRIME, residue_number - 1),
                (p, PHOSPHORUS, residue_number),
                (c4, C4_PRIME, residue_number),
                (p_next, PHOSPHORUS, residue_number + 1),
                (c4_next, C4_PRIME, residue_number + 1),
            ];
            let missing = required
                .iter()
                .filter(|(serial, _, _)| serial.is_none())
                .map(|(_, name, number)| format!("{}_{}", name, number))
                .collect();
            Err(TorsionError::MissingAtoms { missing })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::AtomRecord;
    use nalgebra::Point3;
    use std::collections::HashSet;

    fn atom(serial: usize, name: &str, res: &str, chain: char, num: isize) -> AtomRecord {
        AtomRecord::new(serial, name, res, chain, num, Point3::origin())
    }

    fn complete_structure() -> Structure {
        Structure::from_atoms(vec![
            atom(101, "P", "C", 'A', 5),
            atom(105, "C4'", "C", 'A', 5),
            atom(133, "P", "G", 'A', 6),
            atom(137, "C4'", "G", 'A', 6),
            atom(166, "P", "U", 'A', 7),
            atom(170, "C4'", "U", 'A', 7),
        ])
    }

    #[test]
    fn builds_eta_and_theta_groups_in_fixed_order() {
        let atoms = locate_torsion_atoms(&complete_structure(), "G", 6).unwrap();
        assert_eq!(atoms.eta, [105, 133, 137, 166]);
        assert_eq!(atoms.theta, [133, 137, 166, 170]);
    }

    #[test]
    fn groups_contain_unique_serials() {
        let atoms = locate_torsion_atoms(&complete_structure(), "G", 6).unwrap();
        for group in [atoms.eta, atoms.theta] {
            let unique: HashSet<_> = group.iter().collect();
            assert_eq!(unique.len(), 4);
        }
    }

    #[test]
    fn serial_list_formats_comma_separated() {
        assert_eq!(SerialList(&[1, 22, 333, 4444]).to_string(), "1,22,333,4444");
    }

    #[test]
    fn absent_residue_is_reported() {
        let err = locate_torsion_atoms(&complete_structure(), "A", 6).unwrap_err();
        assert_eq!(
            err,
            TorsionError::ResidueNotFound {
                residue_name: "A".into(),
                residue_number: 6
            }
        );
        assert_eq!(err.to_string(), "Residue A with ID 6 not found in any chain.");
    }

    #[test]
    fn missing_atoms_are_listed_with_residue_numbers() {
        let structure = Structure::from_atoms(vec![
            atom(133, "P", "G", 'A', 6),
            atom(137, "C4'", "G", 'A', 6),
            atom(170, "C4'", "U", 'A', 7),
        ]);

        let err = locate_torsion_atoms(&structure, "G", 6).unwrap_err();
        assert_eq!(
            err,
            TorsionError::MissingAtoms {
                missing: vec!["C4'_5".into(), "P_7".into()]
            }
        );
        assert_eq!(err.to_string(), "Missing atom(s) for eta/theta: C4'_5, P_7");
    }

    #[test]
    fn only_the_chain_of_the_bulge_is_searched() {
        let mut atoms = complete_structure().into_atoms();
        atoms.retain(|a| a.serial != 166);
        atoms.push(atom(900, "P", "U", 'B', 7));

        let err = locate_torsion_atoms(&Structure::from_atoms(atoms), "G", 6).unwrap_err();
        assert_eq!(
            err,
            TorsionError::MissingAtoms {
                missing: vec!["P_7".into()]
            }
        );
    }

    #[test]
    fn chain_is_taken_from_first_matching_atom() {
        let mut atoms = vec![
            atom(1, "P", "G", 'B', 6),
            atom(2, "C4'", "G", 'B', 6),
            atom(3, "C4'", "C", 'B', 5),
            atom(4, "P", "U", 'B', 7),
            atom(5, "C4'", "U", 'B', 7),
        ];
        atoms.extend(complete_structure().into_atoms());

        let result = locate_torsion_atoms(&Structure::from_atoms(atoms), "G", 6).unwrap();
        assert_eq!(result.eta, [3, 1, 2, 4]);
        assert_eq!(result.theta, [1, 2, 4, 5]);
    }
}
