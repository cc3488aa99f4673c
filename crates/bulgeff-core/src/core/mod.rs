//! # Core Module
//!
//! Fundamental building blocks for analysing bulged nucleotides.
//!
//! - **Structure Representation** ([`models`]) - Atom records and parsed structures
//! - **File I/O** ([`io`]) - PDB reading/writing and PLUMED restraint output
//! - **Geometry** ([`utils`]) - Dihedrals, superposition and RMSD
//! - **Structural Analysis** ([`analysis`]) - Sugar pucker, trinucleotide fragments
//!   and eta/theta torsion atoms
//! - **Prototype Libraries** ([`prototypes`]) - Reference conformers per pucker category
//! - **Bias Functions** ([`functions`]) - Tabulated eta/theta bias expressions

pub mod analysis;
pub mod functions;
pub mod io;
pub mod models;
pub mod prototypes;
pub mod utils;
