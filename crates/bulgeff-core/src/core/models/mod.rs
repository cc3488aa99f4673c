//! Data structures for parsed coordinate files.
//!
//! An [`atom::AtomRecord`] mirrors one fixed-column `ATOM` line. A
//! [`structure::Structure`] owns the records of one file in input order together
//! with a coordinate index keyed by residue name, residue number and atom name.

pub mod atom;
pub mod structure;
