use crate::core::analysis::pucker::SugarPucker;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

const ETA_ROLE: &str = "eta";
const THETA_ROLE: &str = "theta";

#[derive(Debug, Error)]
pub enum FunctionTableError {
    #[error("Function table '{}' not found.", .path.display())]
    NotFound { path: PathBuf },
    #[error("Failed to read function table '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Analytic bias expressions for the two pseudo-torsions of one conformer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BiasFunctions {
    pub eta: Option<String>,
    pub theta: Option<String>,
}

impl BiasFunctions {
    pub fn is_empty(&self) -> bool {
        self.eta.is_none() && self.theta.is_none()
    }
}

/// Bias functions keyed by `(sugar category label, conformer name)`.
///
/// The table file starts with a header line followed by rows of exactly four
/// whitespace-separated fields: `category conformer role expression`, where the
/// role is `eta` or `theta`. Rows with any other field count, or an unknown
/// role, are skipped. A later row overrides an earlier one for the same key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionTable {
    entries: HashMap<(String, String), BiasFunctions>,
}

impl FunctionTable {
    pub fn parse(content: &str) -> Self {
        let mut entries: HashMap<(String, String), BiasFunctions> = HashMap::new();
        let mut skipped = 0usize;

        for line in content.lines().skip(1) {
            let fields: Vec<&str> = line.split_whitespace().collect();
            let [category, conformer, role, expression] = fields.as_slice() else {
                if !fields.is_empty() {
                    skipped += 1;
                }
                continue;
            };

            if *role != ETA_ROLE && *role != THETA_ROLE {
                skipped += 1;
                continue;
            }
            let slot = entries
                .entry((category.to_string(), conformer.to_string()))
                .or_default();
            if *role == ETA_ROLE {
                slot.eta = Some(expression.to_string());
            } else {
                slot.theta = Some(expression.to_string());
            }
        }

        if skipped > 0 {
            debug!("Skipped {} malformed function table row(s).", skipped);
        }
        Self { entries }
    }

    /// Reads and parses the table at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FunctionTableError::NotFound`] if the file does not exist and
    /// [`FunctionTableError::Io`] for any other read failure.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FunctionTableError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                FunctionTableError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                FunctionTableError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let table = Self::parse(&content);
        info!(
            "Loaded function table {:?} ({} conformer entries).",
            path,
            table.len()
        );
        Ok(table)
    }

    /// Looks up the bias functions of `conformer` in `category`.
    ///
    /// An absent pair yields empty functions rather than an error.
    pub fn lookup(&self, category: SugarPucker, conformer: &str) -> BiasFunctions {
        let functions = self
            .entries
            .get(&(category.label().to_string(), conformer.to_string()))
            .cloned()
            .unwrap_or_default();

        debug!(
            "Function lookup for {} {}: eta={:?}, theta={:?}",
            category, conformer, functions.eta, functions.theta
        );
        functions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
