use crate::core::analysis::torsion::{SerialList, TorsionAtoms};
use crate::core::functions::BiasFunctions;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

pub const DEFAULT_MOLTYPE: &str = "rna";
pub const DEFAULT_STRIDE: u64 = 5000;

/// Everything emitted for one restrained bulge residue.
#[derive(Debug, Clone, PartialEq)]
pub struct RestraintEntry {
    pub residue_name: String,
    pub residue_number: isize,
    pub torsions: TorsionAtoms,
    pub functions: BiasFunctions,
}

impl RestraintEntry {
    /// Residue label used in every action name, e.g. `G6`.
    pub fn label(&self) -> String {
        format!("{}{}", self.residue_name, self.residue_number)
    }
}

struct Role<'a> {
    torsion: &'static str,
    bias: &'static str,
    atoms: &'a [usize; 4],
    function: Option<&'a str>,
}

/// Writer for PLUMED input files restraining the eta/theta pseudo-torsions.
///
/// The file starts with a `MOLINFO` line, followed by one block per entry:
/// two `TORSION` actions, a `CUSTOM` bias and a `BIASVALUE` for each function,
/// and a `PRINT` action per biased torsion.
///
/// A fully resolved entry has eight directives. When a function is missing only
/// its `TORSION` action is written, so the entry has five directives with one
/// function and two with none. No `FUNC=None` placeholder is ever emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlumedFile {
    structure: String,
    moltype: String,
    stride: u64,
}

impl PlumedFile {
    pub fn new(structure: impl Into<String>, moltype: impl Into<String>, stride: u64) -> Self {
        Self {
            structure: structure.into(),
            moltype: moltype.into(),
            stride,
        }
    }

    pub fn write_to(&self, entries: &[RestraintEntry], writer: &mut impl Write) -> io::Result<()> {
        writeln!(
            writer,
            "MOLINFO STRUCTURE={} MOLTYPE={}",
            self.structure, self.moltype
        )?;
        for entry in entries {
            self.write_entry(entry, writer)?;
        }
        Ok(())
    }

    fn write_entry(&self, entry: &RestraintEntry, writer: &mut impl Write) -> io::Result<()> {
        let id = entry.label();
        let roles = [
            Role {
                torsion: "eta",
                bias: "e",
                atoms: &entry.torsions.eta,
                function: entry.functions.eta.as_deref(),
            },
            Role {
                torsion: "theta",
                bias: "t",
                atoms: &entry.torsions.theta,
                function: entry.functions.theta.as_deref(),
            },
        ];

        writeln!(writer)?;
        writeln!(writer, "# Bulge {}", id)?;
        for role in &roles {
            writeln!(
                writer,
                "{}_{}: TORSION ATOMS={}",
                role.torsion,
                id,
                SerialList(role.atoms)
            )?;
        }
        for role in &roles {
            match role.function {
                Some(function) => writeln!(
                    writer,
                    "bias_{t}_{id}: CUSTOM ARG={t}_{id} FUNC={function} PERIODIC=NO",
                    t = role.torsion,
                )?,
                None => warn!(
                    "No {} bias function for {}; only the torsion is defined.",
                    role.torsion, id
                ),
            }
        }
        for role in roles.iter().filter(|r| r.function.is_some()) {
            writeln!(
                writer,
                "bias_{b}_{id}: BIASVALUE ARG=bias_{t}_{id}",
                b = role.bias,
                t = role.torsion,
            )?;
        }
        for role in roles.iter().filter(|r| r.function.is_some()) {
            writeln!(
                writer,
                "PRINT ARG={t}_{id},bias_{b}_{id}.bias FILE={t}_{id}.dat STRIDE={stride}",
                t = role.torsion,
                b = role.bias,
                stride = self.stride,
            )?;
        }
        Ok(())
    }

    /// Writes the file at `path`, creating or truncating it.
    pub fn write_to_path<P: AsRef<Path>>(
        &self,
        entries: &[RestraintEntry],
        path: P,
    ) -> io::Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(entries, &mut writer)?;
        writer.flush()?;
        info!("PLUMED file written to {:?} ({} residue(s)).", path, entries.len());
        Ok(())
    }

    pub fn write_to_string(&self, entries: &[RestraintEntry]) -> io::Result<String> {
        let mut buffer = Vec::new();
        self.write_to(entries, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl Default for PlumedFile {
    fn default() -> Self {
        Self::new("reference.pdb", DEFAULT_MOLTYPE, DEFAULT_STRIDE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entry(name: &str, number: isize, eta: Option<&str>, theta: Option<&str>) -> RestraintEntry {
        RestraintEntry {
            residue_name: name.to_string(),
            residue_number: number,
            torsions: TorsionAtoms {
                eta: [105, 133, 137, 166],
                theta: [133, 137, 166, 170],
            },
            functions: BiasFunctions {
                eta: eta.map(str::to_string),
                theta: theta.map(str::to_string),
            },
        }
    }

    #[test]
    fn writes_complete_block_for_fully_resolved_residue() {
        let text = PlumedFile::default()
            .write_to_string(&[entry("G", 6, Some("0.5*x^2"), Some("1.5*x^2"))])
            .unwrap();

        let expected = "\
MOLINFO STRUCTURE=reference.pdb MOLTYPE=rna

# Bulge G6
eta_G6: TORSION ATOMS=105,133,137,166
theta_G6: TORSION ATOMS=133,137,166,170
bias_eta_G6: CUSTOM ARG=eta_G6 FUNC=0.5*x^2 PERIODIC=NO
bias_theta_G6: CUSTOM ARG=theta_G6 FUNC=1.5*x^2 PERIODIC=NO
bias_e_G6: BIASVALUE ARG=bias_eta_G6
bias_t_G6: BIASVALUE ARG=bias_theta_G6
PRINT ARG=eta_G6,bias_e_G6.bias FILE=eta_G6.dat STRIDE=5000
PRINT ARG=theta_G6,bias_t_G6.bias FILE=theta_G6.dat STRIDE=5000
";
        assert_eq!(text, expected);
    }

    #[test]
    fn header_uses_configured_structure_and_moltype() {
        let text = PlumedFile::new("md/start.pdb", "dna", 100)
            .write_to_string(&[])
            .unwrap();
        assert_eq!(text, "MOLINFO STRUCTURE=md/start.pdb MOLTYPE=dna\n");
    }

    #[test]
    fn custom_stride_is_used_in_print_actions() {
        let text = PlumedFile::new("reference.pdb", "rna", 250)
            .write_to_string(&[entry("A", 12, Some("x"), Some("x"))])
            .unwrap();
        assert!(text.contains("FILE=eta_A12.dat STRIDE=250"));
        assert!(text.contains("FILE=theta_A12.dat STRIDE=250"));
    }

    #[test]
    fn missing_function_keeps_only_the_torsion_for_that_role() {
        let text = PlumedFile::default()
            .write_to_string(&[entry("G", 6, Some("0.5*x^2"), None)])
            .unwrap();

        assert!(text.contains("theta_G6: TORSION ATOMS=133,137,166,170"));
        assert!(text.contains("bias_eta_G6: CUSTOM"));
        assert!(!text.contains("bias_theta_G6"));
        assert!(!text.contains("bias_t_G6"));
        assert!(!text.contains("FILE=theta_G6.dat"));
    }

    #[test]
    fn directive_count_drops_with_each_missing_function() {
        let directives = |eta: Option<&str>, theta: Option<&str>| {
            PlumedFile::default()
                .write_to_string(&[entry("G", 6, eta, theta)])
                .unwrap()
                .lines()
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .filter(|line| !line.starts_with("MOLINFO"))
                .count()
        };

        assert_eq!(directives(Some("a"), Some("b")), 8);
        assert_eq!(directives(Some("a"), None), 5);
        assert_eq!(directives(None, Some("b")), 5);
        assert_eq!(directives(None, None), 2);

        let text = PlumedFile::default()
            .write_to_string(&[entry("G", 6, None, None)])
            .unwrap();
        assert!(!text.contains("None"));
    }

    #[test]
    fn each_block_carries_its_own_label() {
        let text = PlumedFile::default()
            .write_to_string(&[
                entry("G", 6, Some("a"), Some("b")),
                entry("U", 9, Some("c"), Some("d")),
            ])
            .unwrap();

        let g6 = text.find("# Bulge G6").unwrap();
        let u9 = text.find("# Bulge U9").unwrap();
        assert!(g6 < u9);
        assert!(text[u9..].contains("bias_eta_U9: CUSTOM ARG=eta_U9 FUNC=c PERIODIC=NO"));
        assert!(!text[u9..].contains("G6"));
    }

    #[test]
    fn write_to_path_creates_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plumed.dat");
        let entries = [entry("G", 6, Some("a"), Some("b"))];

        PlumedFile::default().write_to_path(&entries, &path).unwrap();
        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert_eq!(on_disk, PlumedFile::default().write_to_string(&entries).unwrap());
    }
}
