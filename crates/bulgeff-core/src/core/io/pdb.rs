use crate::core::io::traits::StructureFile;
use crate::core::models::atom::AtomRecord;
use crate::core::models::structure::Structure;
use nalgebra::Point3;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

const ATOM_RECORD: &str = "ATOM";
const MODEL_RECORD: &str = "MODEL";
const END_MODEL_RECORD: &str = "ENDMDL";

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("PDB file '{}' not found. Please check the file path.", .path.display())]
    NotFound { path: PathBuf },
    #[error("Failed to read PDB file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: Box<PdbError>,
    },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PdbParseErrorKind,
    },
    #[error("Invalid MODEL record on line {line}: '{content}'")]
    InvalidModel { line: usize, content: String },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Non-finite value in columns {columns} (value: '{value}')")]
    NonFinite { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
}

/// One model of a multi-model PDB file, with the index declared by its `MODEL` record.
#[derive(Debug, Clone, PartialEq)]
pub struct PdbModel {
    pub index: usize,
    pub structure: Structure,
}

/// Field text in `start..end`, clamped to the line so a short final field is kept.
fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    let len = line.len();
    line.get(start.min(len)..end.min(len)).unwrap_or("").trim()
}

fn columns(start: usize, end: usize) -> String {
    format!("{}-{}", start + 1, end)
}

fn parse_int<T: FromStr>(line: &str, line_num: usize, start: usize, end: usize) -> Result<T, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidInt {
            columns: columns(start, end),
            value: value.into(),
        },
    })
}

fn parse_float(line: &str, line_num: usize, start: usize, end: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    let parsed: f64 = value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: columns(start, end),
            value: value.into(),
        },
    })?;
    if !parsed.is_finite() {
        return Err(PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::NonFinite {
                columns: columns(start, end),
                value: value.into(),
            },
        });
    }
    Ok(parsed)
}

fn parse_atom_line(line: &str, line_num: usize) -> Result<AtomRecord, PdbError> {
    let serial: usize = parse_int(line, line_num, 6, 11)?;

    let name = slice_and_trim(line, 12, 16);
    if name.is_empty() {
        return Err(PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::MissingRequiredField {
                columns: columns(12, 16),
            },
        });
    }
    let residue_name = slice_and_trim(line, 17, 20);
    let chain_id = line.get(21..22).and_then(|s| s.chars().next()).unwrap_or(' ');
    let residue_number: isize = parse_int(line, line_num, 22, 26)?;

    let x = parse_float(line, line_num, 30, 38)?;
    let y = parse_float(line, line_num, 38, 46)?;
    let z = parse_float(line, line_num, 46, 54)?;
    let occupancy = parse_float(line, line_num, 54, 60)?;
    let temp_factor = parse_float(line, line_num, 60, 66)?;
    let element = slice_and_trim(line, 76, 78);

    Ok(AtomRecord {
        serial,
        name: name.to_string(),
        residue_name: residue_name.to_string(),
        chain_id,
        residue_number,
        position: Point3::new(x, y, z),
        occupancy,
        temp_factor,
        element: element.to_string(),
    })
}

fn parse_model_index(line: &str, line_num: usize) -> Result<usize, PdbError> {
    line.split_whitespace()
        .nth(1)
        .and_then(|token| token.parse().ok())
        .ok_or_else(|| PdbError::InvalidModel {
            line: line_num,
            content: line.to_string(),
        })
}

fn wrap_path_error(path: &Path, error: PdbError) -> PdbError {
    PdbError::Read {
        path: path.to_path_buf(),
        source: Box::new(error),
    }
}

fn open(path: &Path) -> Result<BufReader<File>, PdbError> {
    File::open(path).map(BufReader::new).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            PdbError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            wrap_path_error(path, PdbError::Io(e))
        }
    })
}

/// Reader and writer for the fixed-column PDB coordinate format.
///
/// Only `ATOM` records are significant; every other record type (including
/// `HETATM`) is skipped. Fields are taken by column, not by whitespace, so
/// records with touching fields parse correctly.
pub struct PdbFile;

impl PdbFile {
    /// Reads every model of a multi-model file.
    ///
    /// Each `MODEL <n>` record opens a model that lasts until `ENDMDL` or the next
    /// `MODEL` record. Atoms outside any model are ignored when the file declares
    /// models; a file without `MODEL` records is returned as a single model with
    /// index 1.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed `ATOM` or `MODEL` records, or if the file
    /// contains no atoms at all.
    pub fn read_models_from(reader: &mut impl BufRead) -> Result<Vec<PdbModel>, PdbError> {
        let mut models: Vec<PdbModel> = Vec::new();
        let mut current: Option<(usize, Vec<AtomRecord>)> = None;
        let mut loose_atoms: Vec<AtomRecord> = Vec::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            if line.starts_with(MODEL_RECORD) {
                if let Some((index, atoms)) = current.take() {
                    models.push(PdbModel {
                        index,
                        structure: Structure::from_atoms(atoms),
                    });
                }
                current = Some((parse_model_index(&line, line_num)?, Vec::new()));
            } else if line.starts_with(END_MODEL_RECORD) {
                if let Some((index, atoms)) = current.take() {
                    models.push(PdbModel {
                        index,
                        structure: Structure::from_atoms(atoms),
                    });
                }
            } else if line.starts_with(ATOM_RECORD) {
                let atom = parse_atom_line(&line, line_num)?;
                match current.as_mut() {
                    Some((_, atoms)) => atoms.push(atom),
                    None => loose_atoms.push(atom),
                }
            }
        }
        if let Some((index, atoms)) = current.take() {
            models.push(PdbModel {
                index,
                structure: Structure::from_atoms(atoms),
            });
        }

        if models.is_empty() {
            if loose_atoms.is_empty() {
                return Err(PdbError::MissingRecord("MODEL or ATOM records".into()));
            }
            models.push(PdbModel {
                index: 1,
                structure: Structure::from_atoms(loose_atoms),
            });
        } else if !loose_atoms.is_empty() {
            debug!(
                "Ignored {} ATOM record(s) outside MODEL/ENDMDL blocks.",
                loose_atoms.len()
            );
        }
        Ok(models)
    }

    /// Reads every model of a multi-model file from a path.
    ///
    /// # Errors
    ///
    /// Returns [`PdbError::NotFound`] if the file does not exist and
    /// [`PdbError::Read`] wrapping the cause for any other failure.
    pub fn read_models_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<PdbModel>, PdbError> {
        let path = path.as_ref();
        let mut reader = open(path)?;
        let models = Self::read_models_from(&mut reader).map_err(|e| wrap_path_error(path, e))?;
        info!("Parsed {} model(s) from {:?}", models.len(), path);
        Ok(models)
    }
}

impl StructureFile for PdbFile {
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<Structure, Self::Error> {
        let mut atoms = Vec::new();
        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            if line.starts_with(ATOM_RECORD) {
                atoms.push(parse_atom_line(&line, line_num + 1)?);
            }
        }
        Ok(Structure::from_atoms(atoms))
    }

    fn write_to(atoms: &[AtomRecord], writer: &mut impl Write) -> Result<(), Self::Error> {
        for atom in atoms {
            writeln!(
                writer,
                "ATOM  {:>5} {:<4} {:<3} {}{:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:<2}",
                atom.serial,
                atom.name,
                atom.residue_name,
                atom.chain_id,
                atom.residue_number,
                atom.position.x,
                atom.position.y,
                atom.position.z,
                atom.occupancy,
                atom.temp_factor,
                atom.element
            )?;
        }
        writeln!(writer, "END")?;
        Ok(())
    }

    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Structure, Self::Error> {
        let path = path.as_ref();
        let mut reader = open(path)?;
        let structure = Self::read_from(&mut reader).map_err(|e| wrap_path_error(path, e))?;
        info!("Read PDB file: {:?} ({} atoms).", path, structure.len());
        Ok(structure)
    }
}
