use crate::core::models::structure::Structure;
use crate::core::utils::geometry::dihedral_angle;
use nalgebra::Point3;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

/// Furanose ring atoms in the order C4', O4', C1', C2', C3'.
pub const RING_ATOMS: [&str; 5] = ["C4'", "O4'", "C1'", "C2'", "C3'"];

/// Below this amplitude (radians) the ring is treated as planar and has no phase.
const MIN_PUCKER_AMPLITUDE: f64 = 1e-6;

/// Sugar pucker category of a nucleotide, derived from its pseudorotation phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SugarPucker {
    /// North pucker, phase in [0, 54] or [342, 360] degrees.
    C3Endo,
    /// South pucker, phase in [126, 198] degrees.
    C2Endo,
    /// Any phase outside both ranges.
    Others,
}

impl SugarPucker {
    /// The canonical label, also used for prototype library file names and the function table.
    pub const fn label(&self) -> &'static str {
        match self {
            SugarPucker::C3Endo => "C3'-endo",
            SugarPucker::C2Endo => "C2'-endo",
            SugarPucker::Others => "Others",
        }
    }

    /// Assigns the category for a phase angle in degrees. Range boundaries are inclusive.
    pub fn from_phase(phase: f64) -> Self {
        if (0.0..=54.0).contains(&phase) || (342.0..=360.0).contains(&phase) {
            SugarPucker::C3Endo
        } else if (126.0..=198.0).contains(&phase) {
            SugarPucker::C2Endo
        } else {
            SugarPucker::Others
        }
    }
}

impl fmt::Display for SugarPucker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SugarPucker {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "C3'-endo" => Ok(SugarPucker::C3Endo),
            "C2'-endo" => Ok(SugarPucker::C2Endo),
            "Others" => Ok(SugarPucker::Others),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PuckerError {
    #[error(
        "Missing atoms for residue {residue_name}-{residue_number} when calculating phase angle: {}",
        .missing.join(", ")
    )]
    MissingRingAtoms {
        residue_name: String,
        residue_number: isize,
        missing: Vec<String>,
    },
}

/// Pseudorotation parameters of one furanose ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PuckerAnalysis {
    /// Endocyclic torsions nu0..nu4 in radians.
    pub torsions: [f64; 5],
    /// Phase angle in degrees within [0, 360), `None` for a planar ring.
    pub phase: Option<f64>,
    /// Puckering amplitude in degrees.
    pub amplitude: f64,
    pub pucker: SugarPucker,
}

/// Endocyclic torsions nu0..nu4 of a ring given as C4', O4', C1', C2', C3'.
pub fn ring_torsions(ring: &[Point3<f64>; 5]) -> [f64; 5] {
    let [c4, o4, c1, c2, c3] = ring;
    [
        dihedral_angle(c4, o4, c1, c2),
        dihedral_angle(o4, c1, c2, c3),
        dihedral_angle(c1, c2, c3, c4),
        dihedral_angle(c2, c3, c4, o4),
        dihedral_angle(c3, c4, o4, c1),
    ]
}

/// Computes `(phase in degrees, amplitude in radians)` from torsions nu0..nu4.
///
/// The torsions are taken in the order nu2, nu3, nu4, nu0, nu1 and weighted by
/// cos/sin of multiples of 144 degrees. The phase is `None` when the amplitude
/// vanishes.
pub fn pseudorotation(torsions: &[f64; 5]) -> (Option<f64>, f64) {
    let ordered = [
        torsions[2],
        torsions[3],
        torsions[4],
        torsions[0],
        torsions[1],
    ];

    let (mut a, mut b) = (0.0, 0.0);
    for (j, nu) in ordered.iter().enumerate() {
        let t = 0.8 * PI * j as f64;
        a += nu * t.cos();
        b += nu * t.sin();
    }
    a *= 0.4;
    b *= -0.4;

    let amplitude = (a * a + b * b).sqrt();
    if !amplitude.is_finite() || amplitude < MIN_PUCKER_AMPLITUDE {
        return (None, amplitude);
    }

    let mut phase = (b / amplitude).atan2(a / amplitude).to_degrees();
    if phase < 0.0 {
        phase += 360.0;
    }
    (Some(phase), amplitude)
}

/// Computes the pseudorotation of residue `(residue_name, residue_number)`.
///
/// Ring atoms are taken from the structure's coordinate index.
///
/// # Errors
///
/// Returns [`PuckerError::MissingRingAtoms`] listing every absent ring atom.
pub fn analyze_pucker(
    structure: &Structure,
    residue_name: &str,
    residue_number: isize,
) -> Result<PuckerAnalysis, PuckerError> {
    debug!(
        "Calculating phase angle for residue {}-{}",
        residue_name, residue_number
    );

    let found: Vec<Option<&Point3<f64>>> = RING_ATOMS
        .iter()
        .map(|name| structure.coordinate(residue_name, residue_number, name))
        .collect();
    let missing: Vec<String> = RING_ATOMS
        .iter()
        .zip(&found)
        .filter(|(_, coord)| coord.is_none())
        .map(|(name, _)| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(PuckerError::MissingRingAtoms {
            residue_name: residue_name.to_string(),
            residue_number,
            missing,
        });
    }

    let ring: Vec<Point3<f64>> = found.into_iter().flatten().copied().collect();
    let ring = [ring[0], ring[1], ring[2], ring[3], ring[4]];
    let torsions = ring_torsions(&ring);
    let (phase, amplitude) = pseudorotation(&torsions);
    let pucker = phase.map_or(SugarPucker::Others, SugarPucker::from_phase);

    match phase {
        Some(p) => info!(
            "Residue {}-{}: phase angle {:.2} degrees, sugar type {}",
            residue_name, residue_number, p, pucker
        ),
        None => info!(
            "Residue {}-{}: planar sugar ring, sugar type {}",
            residue_name, residue_number, pucker
        ),
    }

    Ok(PuckerAnalysis {
        torsions,
        phase,
        amplitude: amplitude.to_degrees(),
        pucker,
    })
}

/// Classifies the sugar pucker of residue `(residue_name, residue_number)`.
///
/// # Errors
///
/// Returns [`PuckerError::MissingRingAtoms`] listing every absent ring atom.
pub fn classify_sugar(
    structure: &Structure,
    residue_name: &str,
    residue_number: isize,
) -> Result<SugarPucker, PuckerError> {
    analyze_pucker(structure, residue_name, residue_number).map(|a| a.pucker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::AtomRecord;

    /// Torsions of an ideal ring with the given phase (degrees) and amplitude (radians).
    fn ideal_torsions(phase_deg: f64, amplitude: f64) -> [f64; 5] {
        let phase = phase_deg.to_radians();
        let mut torsions = [0.0; 5];
        for (j, nu) in torsions.iter_mut().enumerate() {
            *nu = amplitude * (phase + 0.8 * PI * (j as f64 - 2.0)).cos();
        }
        torsions
    }

    fn ring_structure(name: &str, number: isize, ring: &[(&str, [f64; 3])]) -> Structure {
        let atoms = ring
            .iter()
            .enumerate()
            .map(|(i, (atom_name, pos))| {
                AtomRecord::new(i + 1, atom_name, name, 'A', number, Point3::from(*pos))
            })
            .collect();
        Structure::from_atoms(atoms)
    }

    #[test]
    fn phase_boundaries_for_c3_endo_are_inclusive() {
        for phase in [0.0, 18.0, 54.0, 342.0, 359.9, 360.0] {
            assert_eq!(SugarPucker::from_phase(phase), SugarPucker::C3Endo, "{phase}");
        }
    }

    #[test]
    fn phase_boundaries_for_c2_endo_are_inclusive() {
        for phase in [126.0, 162.0, 198.0] {
            assert_eq!(SugarPucker::from_phase(phase), SugarPucker::C2Endo, "{phase}");
        }
    }

    #[test]
    fn phases_outside_both_ranges_are_others() {
        for phase in [54.01, 90.0, 125.99, 198.01, 270.0, 341.99] {
            assert_eq!(SugarPucker::from_phase(phase), SugarPucker::Others, "{phase}");
        }
    }

    #[test]
    fn pseudorotation_recovers_phase_of_ideal_ring() {
        for expected in [9.0, 18.0, 90.0, 162.0, 250.0, 350.0] {
            let (phase, amplitude) = pseudorotation(&ideal_torsions(expected, 0.65));
            let phase = phase.unwrap();
            assert!((phase - expected).abs() < 1e-9, "{expected} vs {phase}");
            assert!((amplitude - 0.65).abs() < 1e-9);
        }
    }

    #[test]
    fn pseudorotation_phase_is_wrapped_into_positive_range() {
        let (phase, _) = pseudorotation(&ideal_torsions(-30.0, 0.6));
        let phase = phase.unwrap();
        assert!((phase - 330.0).abs() < 1e-9);
    }

    #[test]
    fn planar_ring_has_no_phase() {
        let (phase, amplitude) = pseudorotation(&[0.0; 5]);
        assert!(phase.is_none());
        assert_eq!(amplitude, 0.0);
    }

    #[test]
    fn label_round_trips_through_from_str() {
        for pucker in [SugarPucker::C3Endo, SugarPucker::C2Endo, SugarPucker::Others] {
            assert_eq!(pucker.label().parse::<SugarPucker>(), Ok(pucker));
            assert_eq!(pucker.to_string(), pucker.label());
        }
        assert!("C2-endo".parse::<SugarPucker>().is_err());
    }

    #[test]
    fn planar_ring_in_structure_is_classified_as_others() {
        let ring: Vec<(&str, [f64; 3])> = RING_ATOMS
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let angle = 2.0 * PI * i as f64 / 5.0;
                (*name, [1.2 * angle.cos(), 1.2 * angle.sin(), 0.0])
            })
            .collect();
        let structure = ring_structure("G", 6, &ring);

        let analysis = analyze_pucker(&structure, "G", 6).unwrap();
        assert!(analysis.phase.is_none());
        assert_eq!(analysis.pucker, SugarPucker::Others);
        assert_eq!(classify_sugar(&structure, "G", 6), Ok(SugarPucker::Others));
    }

    #[test]
    fn puckered_ring_produces_a_phase_in_range() {
        let structure = ring_structure(
            "G",
            6,
            &[
                ("C4'", [0.0, 0.0, 0.0]),
                ("O4'", [1.45, 0.0, 0.0]),
                ("C1'", [1.9, 1.38, 0.0]),
                ("C2'", [0.75, 2.2, 0.45]),
                ("C3'", [-0.4, 1.35, -0.2]),
            ],
        );

        let analysis = analyze_pucker(&structure, "G", 6).unwrap();
        let phase = analysis.phase.unwrap();
        assert!((0.0..360.0).contains(&phase));
        assert!(analysis.amplitude > 0.0);
        assert_eq!(analysis.pucker, SugarPucker::from_phase(phase));
    }

    #[test]
    fn missing_ring_atoms_are_all_reported() {
        let structure = ring_structure(
            "G",
            6,
            &[("C4'", [0.0, 0.0, 0.0]), ("C1'", [1.0, 1.0, 0.0]), ("C3'", [0.0, 1.0, 0.0])],
        );

        let err = analyze_pucker(&structure, "G", 6).unwrap_err();
        assert_eq!(
            err,
            PuckerError::MissingRingAtoms {
                residue_name: "G".into(),
                residue_number: 6,
                missing: vec!["O4'".into(), "C2'".into()],
            }
        );
        assert!(err.to_string().contains("G-6"));
        assert!(err.to_string().contains("O4', C2'"));
    }

    #[test]
    fn residue_name_must_match_for_ring_lookup() {
        let structure = ring_structure("A", 6, &[("C4'", [0.0, 0.0, 0.0])]);
        let err = classify_sugar(&structure, "G", 6).unwrap_err();
        let PuckerError::MissingRingAtoms { missing, .. } = err;
        assert_eq!(missing.len(), 5);
    }
}
