use crate::core::analysis::pucker::SugarPucker;
use crate::core::io::plumed::{DEFAULT_MOLTYPE, DEFAULT_STRIDE, PlumedFile};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_C2_ENDO_THRESHOLD: f64 = 1.3;
pub const DEFAULT_C3_ENDO_THRESHOLD: f64 = 1.2;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error(
        "The number of bulge residue names ({names}) does not match the number of residue ids ({ids})"
    )]
    MismatchedTargets { names: usize, ids: usize },
    #[error("At least one bulge residue must be given")]
    NoTargets,
    #[error("Threshold '{name}' must be a positive number of Angstroms (got {value})")]
    InvalidThreshold { name: &'static str, value: f64 },
    #[error("PRINT stride must be greater than zero")]
    ZeroStride,
}

/// A bulged residue identified by residue name and number, e.g. `G6`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BulgeTarget {
    pub residue_name: String,
    pub residue_number: isize,
}

impl BulgeTarget {
    pub fn new(residue_name: impl Into<String>, residue_number: isize) -> Self {
        Self {
            residue_name: residue_name.into(),
            residue_number,
        }
    }

    /// Pairs names and numbers position by position.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MismatchedTargets`] if the lists differ in length
    /// and [`ConfigError::NoTargets`] if both are empty.
    pub fn zip(names: &[String], numbers: &[isize]) -> Result<Vec<Self>, ConfigError> {
        if names.len() != numbers.len() {
            return Err(ConfigError::MismatchedTargets {
                names: names.len(),
                ids: numbers.len(),
            });
        }
        if names.is_empty() {
            return Err(ConfigError::NoTargets);
        }
        Ok(names
            .iter()
            .zip(numbers)
            .map(|(name, number)| Self::new(name.clone(), *number))
            .collect())
    }
}

impl fmt::Display for BulgeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.residue_name, self.residue_number)
    }
}

/// Maximum accepted RMSD (Angstroms) per prototype category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchThresholds {
    pub c2_endo: f64,
    pub c3_endo: f64,
}

impl MatchThresholds {
    /// Threshold for a conformer of `category`; `Others` has no library and no threshold.
    pub fn for_category(&self, category: SugarPucker) -> Option<f64> {
        match category {
            SugarPucker::C2Endo => Some(self.c2_endo),
            SugarPucker::C3Endo => Some(self.c3_endo),
            SugarPucker::Others => None,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("c2_endo", self.c2_endo), ("c3_endo", self.c3_endo)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }
        Ok(())
    }
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            c2_endo: DEFAULT_C2_ENDO_THRESHOLD,
            c3_endo: DEFAULT_C3_ENDO_THRESHOLD,
        }
    }
}

/// Options for the emitted PLUMED file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestraintOptions {
    /// `MOLINFO STRUCTURE=` value; the MD structure path when unset.
    pub structure: Option<String>,
    pub moltype: String,
    pub stride: u64,
}

impl Default for RestraintOptions {
    fn default() -> Self {
        Self {
            structure: None,
            moltype: DEFAULT_MOLTYPE.to_string(),
            stride: DEFAULT_STRIDE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulgeConfig {
    pub bulge_structure_path: PathBuf,
    pub md_structure_path: PathBuf,
    pub targets: Vec<BulgeTarget>,
    pub prototype_dir: PathBuf,
    pub function_table_path: PathBuf,
    pub output_path: PathBuf,
    pub fragment_dir: Option<PathBuf>,
    pub thresholds: MatchThresholds,
    pub restraints: RestraintOptions,
}

impl BulgeConfig {
    pub fn plumed_writer(&self) -> PlumedFile {
        let structure = self
            .restraints
            .structure
            .clone()
            .unwrap_or_else(|| self.md_structure_path.display().to_string());
        PlumedFile::new(
            structure,
            self.restraints.moltype.clone(),
            self.restraints.stride,
        )
    }
}

#[derive(Default)]
pub struct BulgeConfigBuilder {
    bulge_structure_path: Option<PathBuf>,
    md_structure_path: Option<PathBuf>,
    residue_names: Vec<String>,
    residue_numbers: Vec<isize>,
    prototype_dir: Option<PathBuf>,
    function_table_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    fragment_dir: Option<PathBuf>,
    thresholds: MatchThresholds,
    restraints: RestraintOptions,
}

impl BulgeConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bulge_structure_path(mut self, path: impl AsRef<Path>) -> Self {
        self.bulge_structure_path = Some(path.as_ref().to_path_buf());
        self
    }
    pub fn md_structure_path(mut self, path: impl AsRef<Path>) -> Self {
        self.md_structure_path = Some(path.as_ref().to_path_buf());
        self
    }
    pub fn residue_names(mut self, names: Vec<String>) -> Self {
        self.residue_names = names;
        self
    }
    pub fn residue_numbers(mut self, numbers: Vec<isize>) -> Self {
        self.residue_numbers = numbers;
        self
    }
    pub fn prototype_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.prototype_dir = Some(path.as_ref().to_path_buf());
        self
    }
    pub fn function_table_path(mut self, path: impl AsRef<Path>) -> Self {
        self.function_table_path = Some(path.as_ref().to_path_buf());
        self
    }
    pub fn output_path(mut self, path: impl AsRef<Path>) -> Self {
        self.output_path = Some(path.as_ref().to_path_buf());
        self
    }
    pub fn fragment_dir(mut self, path: Option<PathBuf>) -> Self {
        self.fragment_dir = path;
        self
    }
    pub fn thresholds(mut self, thresholds: MatchThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }
    pub fn restraints(mut self, restraints: RestraintOptions) -> Self {
        self.restraints = restraints;
        self
    }

    /// Validates the collected settings. No file is touched.
    pub fn build(self) -> Result<BulgeConfig, ConfigError> {
        let targets = BulgeTarget::zip(&self.residue_names, &self.residue_numbers)?;
        self.thresholds.validate()?;
        if self.restraints.stride == 0 {
            return Err(ConfigError::ZeroStride);
        }

        Ok(BulgeConfig {
            bulge_structure_path: self
                .bulge_structure_path
                .ok_or(ConfigError::MissingParameter("bulge_structure_path"))?,
            md_structure_path: self
                .md_structure_path
                .ok_or(ConfigError::MissingParameter("md_structure_path"))?,
            targets,
            prototype_dir: self
                .prototype_dir
                .ok_or(ConfigError::MissingParameter("prototype_dir"))?,
            function_table_path: self
                .function_table_path
                .ok_or(ConfigError::MissingParameter("function_table_path"))?,
            output_path: self
                .output_path
                .ok_or(ConfigError::MissingParameter("output_path"))?,
            fragment_dir: self.fragment_dir,
            thresholds: self.thresholds,
            restraints: self.restraints,
        })
    }
}
