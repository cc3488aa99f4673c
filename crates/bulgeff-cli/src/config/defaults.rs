use bulgeff::core::io::plumed::{DEFAULT_MOLTYPE, DEFAULT_STRIDE};
use bulgeff::engine::config::{DEFAULT_C2_ENDO_THRESHOLD, DEFAULT_C3_ENDO_THRESHOLD};
use std::path::PathBuf;

pub struct DefaultsConfig {
    pub output: PathBuf,
    pub c2_endo_threshold: f64,
    pub c3_endo_threshold: f64,
    pub moltype: String,
    pub stride: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("plumed.dat"),
            c2_endo_threshold: DEFAULT_C2_ENDO_THRESHOLD,
            c3_endo_threshold: DEFAULT_C3_ENDO_THRESHOLD,
            moltype: DEFAULT_MOLTYPE.to_string(),
            stride: DEFAULT_STRIDE,
        }
    }
}
