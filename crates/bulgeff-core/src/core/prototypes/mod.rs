//! Prototype conformer libraries.
//!
//! Each sugar pucker category with a defined geometry (C2'-endo, C3'-endo) has a
//! multi-model PDB file of representative trinucleotide conformers. Conformers
//! are identified by their category and the index declared in their `MODEL`
//! record.

pub mod library;
