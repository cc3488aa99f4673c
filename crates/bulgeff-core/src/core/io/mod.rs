//! Provides input/output functionality for structure files and restraint output.
//!
//! Structure files are read and written through the [`traits::StructureFile`]
//! interface. The PDB implementation also understands multi-model files, which
//! is how prototype libraries are stored. Restraint definitions are written in
//! PLUMED input syntax by [`plumed::PlumedFile`].

pub mod pdb;
pub mod plumed;
pub mod traits;
