use crate::core::analysis::pucker::SugarPucker;
use crate::core::io::pdb::{PdbError, PdbFile};
use crate::core::models::atom::superposition_points;
use crate::core::models::structure::Structure;
use nalgebra::Point3;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum LibraryLoadError {
    #[error("No prototype library exists for sugar type '{0}'")]
    UnsupportedCategory(SugarPucker),
    #[error("Failed to load prototype library '{}': {source}", .path.display())]
    Pdb {
        path: PathBuf,
        #[source]
        source: PdbError,
    },
}

/// One model of a prototype library, identified by `(category, index)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Conformer {
    pub index: usize,
    pub category: SugarPucker,
    pub structure: Structure,
}

impl Conformer {
    /// The conformer name used by the function table, e.g. `model12`.
    pub fn name(&self) -> String {
        format!("model{}", self.index)
    }

    pub fn superposition_points(&self) -> Vec<Point3<f64>> {
        superposition_points(self.structure.atoms())
    }
}

/// All conformers of one sugar category, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct PrototypeLibrary {
    category: SugarPucker,
    conformers: Vec<Conformer>,
}

impl PrototypeLibrary {
    /// Path of the library file for `category` inside `dir`, e.g. `dir/C2'-endo.pdb`.
    pub fn file_path(dir: &Path, category: SugarPucker) -> PathBuf {
        dir.join(format!("{}.pdb", category.label()))
    }

    /// Loads the library of `category` from `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryLoadError::UnsupportedCategory`] for [`SugarPucker::Others`],
    /// which has no library of its own, and [`LibraryLoadError::Pdb`] if the file
    /// is missing, malformed or holds no models.
    pub fn load(dir: &Path, category: SugarPucker) -> Result<Self, LibraryLoadError> {
        if category == SugarPucker::Others {
            return Err(LibraryLoadError::UnsupportedCategory(category));
        }

        let path = Self::file_path(dir, category);
        debug!("Loading {} prototypes from {:?}", category, path);
        let models = PdbFile::read_models_from_path(&path)
            .map_err(|source| LibraryLoadError::Pdb { path, source })?;

        let conformers: Vec<Conformer> = models
            .into_iter()
            .map(|model| Conformer {
                index: model.index,
                category,
                structure: model.structure,
            })
            .collect();
        info!("Loaded {} {} prototype(s).", conformers.len(), category);

        Ok(Self {
            category,
            conformers,
        })
    }

    pub fn category(&self) -> SugarPucker {
        self.category
    }

    pub fn conformers(&self) -> &[Conformer] {
        &self.conformers
    }

    pub fn len(&self) -> usize {
        self.conformers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conformers.is_empty()
    }
}

/// Conformers compared against a fragment, chosen from its sugar category.
///
/// A definite pucker uses its own library. An unclassified (`Others`) sugar is
/// compared against both libraries; every conformer still carries the category
/// of the library it was read from, so the winner resolves its own category.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateSet {
    Single(PrototypeLibrary),
    Merged {
        c2_endo: PrototypeLibrary,
        c3_endo: PrototypeLibrary,
    },
}

impl CandidateSet {
    /// Loads the libraries needed for a residue of sugar type `pucker`.
    ///
    /// # Errors
    ///
    /// Propagates [`LibraryLoadError`] from every library that is read.
    pub fn for_pucker(dir: &Path, pucker: SugarPucker) -> Result<Self, LibraryLoadError> {
        match pucker {
            SugarPucker::C2Endo | SugarPucker::C3Endo => {
                Ok(CandidateSet::Single(PrototypeLibrary::load(dir, pucker)?))
            }
            SugarPucker::Others => Ok(CandidateSet::Merged {
                c2_endo: PrototypeLibrary::load(dir, SugarPucker::C2Endo)?,
                c3_endo: PrototypeLibrary::load(dir, SugarPucker::C3Endo)?,
            }),
        }
    }

    /// Iterates over candidates; merged sets yield C2'-endo before C3'-endo.
    pub fn iter(&self) -> impl Iterator<Item = &Conformer> {
        let (first, second): (&[Conformer], &[Conformer]) = match self {
            CandidateSet::Single(library) => (library.conformers(), &[]),
            CandidateSet::Merged { c2_endo, c3_endo } => {
                (c2_endo.conformers(), c3_endo.conformers())
            }
        };
        first.iter().chain(second.iter())
    }

    pub fn len(&self) -> usize {
        match self {
            CandidateSet::Single(library) => library.len(),
            CandidateSet::Merged { c2_endo, c3_endo } => c2_endo.len() + c3_endo.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
