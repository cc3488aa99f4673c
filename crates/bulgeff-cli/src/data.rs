use crate::error::{CliError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const PROTOTYPE_DIR: &str = "prototype_db";
const FUNCTION_DIR: &str = "function";
const FUNCTION_TABLE_FILE: &str = "fix_function.txt";
const PATH_CONFIG_FILE: &str = "path.conf";

/// Locates the data directory holding prototype libraries and the function table.
///
/// Layout under the data directory:
///
/// ```text
/// prototype_db/C2'-endo.pdb
/// prototype_db/C3'-endo.pdb
/// function/fix_function.txt
/// ```
#[derive(Debug)]
pub struct DataManager {
    base_path: PathBuf,
}

impl DataManager {
    /// Uses the persisted custom path if one was set, otherwise the OS data directory.
    pub fn new() -> Result<Self> {
        let persisted = match path_config_file() {
            Some(file) => read_persisted_path(&file)?,
            None => None,
        };
        let base_path = match persisted {
            Some(path) => path,
            None => default_data_dir()?,
        };
        debug!("Resolved data directory: {:?}", &base_path);
        Ok(Self { base_path })
    }

    pub fn with_custom_path(path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: path.into(),
        }
    }

    pub fn get_data_path(&self) -> &Path {
        &self.base_path
    }

    pub fn prototype_dir(&self) -> PathBuf {
        self.base_path.join(PROTOTYPE_DIR)
    }

    pub fn function_table_path(&self) -> PathBuf {
        self.base_path.join(FUNCTION_DIR).join(FUNCTION_TABLE_FILE)
    }

    /// Persists `path` so later runs resolve the data directory to it.
    pub fn set_custom_path(path: &Path) -> Result<()> {
        let file = path_config_file().ok_or_else(|| {
            CliError::Data("Could not determine the user configuration directory.".to_string())
        })?;
        write_persisted_path(&file, path)
    }

    /// Forgets any persisted path. Succeeds when none was set.
    pub fn reset_path() -> Result<()> {
        match path_config_file() {
            Some(file) => clear_persisted_path(&file),
            None => Ok(()),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "bulgeff", "bulgeff")
}

fn path_config_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(PATH_CONFIG_FILE))
}

fn default_data_dir() -> Result<PathBuf> {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            CliError::Data("Could not determine the default data directory.".to_string())
        })
}

fn read_persisted_path(file: &Path) -> Result<Option<PathBuf>> {
    if !file.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(file)?;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        warn!("{:?} is empty, using the default data directory.", file);
        return Ok(None);
    }
    Ok(Some(PathBuf::from(trimmed)))
}

fn write_persisted_path(file: &Path, path: &Path) -> Result<()> {
    if let Some(parent) = file.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file, path.to_string_lossy().as_bytes())?;
    Ok(())
}

fn clear_persisted_path(file: &Path) -> Result<()> {
    if file.exists() {
        fs::remove_file(file)?;
    }
    Ok(())
}
