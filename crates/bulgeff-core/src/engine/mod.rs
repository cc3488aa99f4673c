//! # Engine Module
//!
//! Run configuration, the hard-failure error channel, progress reporting and
//! the structural matcher that scores prototype conformers against a bulge
//! fragment.
//!
//! - **Configuration** ([`config`]) - Targets, paths, RMSD thresholds and restraint output options
//! - **Matching** ([`matching`]) - Superposition scoring and threshold-based selection
//! - **Progress Monitoring** ([`progress`]) - Caller-owned event sink
//! - **Error Handling** ([`error`]) - Errors that abort a run

pub mod config;
pub mod error;
pub mod matching;
pub mod progress;
