//! Structural analysis of a bulged nucleotide and its sequence neighbours.
//!
//! - [`pucker`] - Pseudorotation phase and sugar pucker category of the bulge
//! - [`fragment`] - The trinucleotide (i-1, i, i+1) used for prototype matching
//! - [`torsion`] - Atom serials of the eta and theta pseudo-torsions

pub mod fragment;
pub mod pucker;
pub mod torsion;
