use nalgebra::Point3;

/// Phosphorus atom name in nucleic acid backbones.
pub const PHOSPHORUS: &str = "P";
/// Sugar C4' atom name.
pub const C4_PRIME: &str = "C4'";

/// One `ATOM` record of a fixed-column coordinate file.
///
/// Records are immutable once parsed and are identified within a structure by
/// their serial number. Every field mirrors a column range of the PDB format;
/// the residue number is signed because insertion-free numbering in deposited
/// structures may start below zero.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    /// Atom serial number (columns 7-11).
    pub serial: usize,
    /// Atom name with surrounding blanks removed (columns 13-16), e.g. `C4'`.
    pub name: String,
    /// Residue name (columns 18-20), e.g. `G`.
    pub residue_name: String,
    /// Chain identifier (column 22). Blank chains are stored as `' '`.
    pub chain_id: char,
    /// Residue sequence number (columns 23-26).
    pub residue_number: isize,
    /// Orthogonal coordinates in Angstroms (columns 31-54).
    pub position: Point3<f64>,
    /// Occupancy (columns 55-60).
    pub occupancy: f64,
    /// Temperature factor (columns 61-66).
    pub temp_factor: f64,
    /// Element symbol (columns 77-78), possibly empty.
    pub element: String,
}

impl AtomRecord {
    /// Creates a record with unit occupancy, zero temperature factor and no element.
    pub fn new(
        serial: usize,
        name: &str,
        residue_name: &str,
        chain_id: char,
        residue_number: isize,
        position: Point3<f64>,
    ) -> Self {
        Self {
            serial,
            name: name.to_string(),
            residue_name: residue_name.to_string(),
            chain_id,
            residue_number,
            position,
            occupancy: 1.0,
            temp_factor: 0.0,
            element: String::new(),
        }
    }

    /// Returns `true` for the atoms used to superpose trinucleotides (P and C4').
    #[inline]
    pub fn is_superposition_atom(&self) -> bool {
        self.name == PHOSPHORUS || self.name == C4_PRIME
    }

    /// Returns `true` if this atom belongs to the residue `(name, number)`.
    #[inline]
    pub fn belongs_to(&self, residue_name: &str, residue_number: isize) -> bool {
        self.residue_number == residue_number && self.residue_name == residue_name
    }
}

/// Positions of the P and C4' atoms, in record order.
pub fn superposition_points(atoms: &[AtomRecord]) -> Vec<Point3<f64>> {
    atoms
        .iter()
        .filter(|atom| atom.is_superposition_atom())
        .map(|atom| atom.position)
        .collect()
}
