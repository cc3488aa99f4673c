//! # Workflows Module
//!
//! High-level entry points combining `core` and `engine`.
//!
//! - [`restrain`] - Classifies, matches and writes PLUMED restraints for every bulge residue
//! - [`pucker`] - Reports the sugar pucker of residues without matching

pub mod pucker;
pub mod restrain;
