//! # BulgeFF Core Library
//!
//! Classifies bulged nucleotides in RNA structures by sugar pucker, matches the
//! surrounding trinucleotide against a library of prototype conformers, and
//! produces PLUMED bias definitions for the two backbone pseudo-torsions
//! (eta and theta) that span the bulge.
//!
//! ## Architecture
//!
//! The library follows a three-layer layout:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Structure`, `AtomRecord`),
//!   geometry, structural analysis (pucker, fragment, torsion atoms), prototype
//!   libraries, function tables and file I/O.
//!
//! - **[`engine`]: The Logic Core.** Configuration, the error channel, progress
//!   reporting and the structural matcher that scores prototypes against a fragment.
//!
//! - **[`workflows`]: The Public API.** Ties `core` and `engine` together into the
//!   per-residue restraint pipeline.

pub mod core;
pub mod engine;
pub mod workflows;
