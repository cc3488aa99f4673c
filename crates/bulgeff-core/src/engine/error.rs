use thiserror::Error;

use super::config::ConfigError;
use super::matching::SuperpositionError;
use crate::core::analysis::fragment::FragmentError;
use crate::core::analysis::pucker::PuckerError;
use crate::core::analysis::torsion::TorsionError;
use crate::core::functions::FunctionTableError;
use crate::core::io::pdb::PdbError;
use crate::core::prototypes::library::LibraryLoadError;
use std::path::PathBuf;

/// Failures that abort a run. Threshold rejections are not errors; they are
/// reported as per-residue outcomes.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Structure(#[from] PdbError),

    #[error(transparent)]
    Pucker(#[from] PuckerError),

    #[error(transparent)]
    Fragment(#[from] FragmentError),

    #[error(transparent)]
    Torsion(#[from] TorsionError),

    #[error(transparent)]
    Library(#[from] LibraryLoadError),

    #[error(transparent)]
    Superposition(#[from] SuperpositionError),

    #[error(transparent)]
    FunctionTable(#[from] FunctionTableError),

    #[error("Failed to write '{}': {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
