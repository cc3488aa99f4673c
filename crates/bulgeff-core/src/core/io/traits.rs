use crate::core::models::atom::AtomRecord;
use crate::core::models::structure::Structure;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing coordinate file formats.
///
/// Implementors handle the format-specific parsing and serialization of atom
/// records; the path-based helpers are provided on top of the reader/writer
/// methods.
pub trait StructureFile {
    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads a structure from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<Structure, Self::Error>;

    /// Writes atom records, in the given order, to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(atoms: &[AtomRecord], writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Reads a structure from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Structure, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes atom records to a file path, creating or truncating the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(atoms: &[AtomRecord], path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(atoms, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Serializes atom records into an in-memory string.
    ///
    /// # Errors
    ///
    /// Returns an error if the implementation fails to serialize a record.
    fn write_to_string(atoms: &[AtomRecord]) -> Result<String, Self::Error> {
        let mut buffer = Vec::new();
        Self::write_to(atoms, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
