mod defaults;

use crate::cli::RunArgs;
use crate::data::DataManager;
use crate::error::{CliError, Result};
use bulgeff::engine::config as core_config;
use defaults::DefaultsConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialPathsConfig {
    prototype_dir: Option<PathBuf>,
    function_table: Option<PathBuf>,
    output: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialMatchingConfig {
    c2_endo_threshold: Option<f64>,
    c3_endo_threshold: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialRestraintsConfig {
    structure: Option<String>,
    moltype: Option<String>,
    stride: Option<u64>,
}

/// Settings read from the optional TOML file, before CLI arguments and
/// defaults are merged in.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialBulgeConfig {
    paths: Option<PartialPathsConfig>,
    matching: Option<PartialMatchingConfig>,
    restraints: Option<PartialRestraintsConfig>,
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value.parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value))
    })
}

impl PartialBulgeConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Resolves the final run configuration. Precedence: `-S` values, then
    /// CLI flags, then the config file, then the data directory and defaults.
    pub fn merge_with_cli(
        mut self,
        args: &RunArgs,
        data_manager: &DataManager,
    ) -> Result<core_config::BulgeConfig> {
        self.apply_set_values(&args.set_values)?;
        let defaults = DefaultsConfig::default();

        let paths = self.paths.take().unwrap_or_default();
        let matching = self.matching.take().unwrap_or_default();
        let restraints = self.restraints.take().unwrap_or_default();

        let prototype_dir = args
            .prototype_dir
            .clone()
            .or(paths.prototype_dir)
            .unwrap_or_else(|| data_manager.prototype_dir());
        let function_table_path = args
            .function_table
            .clone()
            .or(paths.function_table)
            .unwrap_or_else(|| data_manager.function_table_path());
        let output_path = args
            .output
            .clone()
            .or(paths.output)
            .unwrap_or(defaults.output);

        let thresholds = core_config::MatchThresholds {
            c2_endo: matching
                .c2_endo_threshold
                .unwrap_or(defaults.c2_endo_threshold),
            c3_endo: matching
                .c3_endo_threshold
                .unwrap_or(defaults.c3_endo_threshold),
        };
        let restraint_options = core_config::RestraintOptions {
            structure: restraints.structure,
            moltype: restraints.moltype.unwrap_or(defaults.moltype),
            stride: restraints.stride.unwrap_or(defaults.stride),
        };

        let config = core_config::BulgeConfigBuilder::new()
            .bulge_structure_path(&args.bulge_pdb)
            .md_structure_path(&args.md_pdb)
            .residue_names(args.targets.bulge_names.clone())
            .residue_numbers(args.targets.bulge_ids.clone())
            .prototype_dir(prototype_dir)
            .function_table_path(function_table_path)
            .output_path(output_path)
            .fragment_dir(args.fragment_dir.clone())
            .thresholds(thresholds)
            .restraints(restraint_options)
            .build()?;
        Ok(config)
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key {
                "paths.prototype-dir" => {
                    self.paths.get_or_insert_with(Default::default).prototype_dir =
                        Some(PathBuf::from(value_str));
                }
                "paths.function-table" => {
                    self.paths.get_or_insert_with(Default::default).function_table =
                        Some(PathBuf::from(value_str));
                }
                "paths.output" => {
                    self.paths.get_or_insert_with(Default::default).output =
                        Some(PathBuf::from(value_str));
                }
                "matching.c2-endo-threshold" => {
                    self.matching
                        .get_or_insert_with(Default::default)
                        .c2_endo_threshold = Some(parse_value(key, value_str, "float")?);
                }
                "matching.c3-endo-threshold" => {
                    self.matching
                        .get_or_insert_with(Default::default)
                        .c3_endo_threshold = Some(parse_value(key, value_str, "float")?);
                }
                "restraints.structure" => {
                    self.restraints
                        .get_or_insert_with(Default::default)
                        .structure = Some(value_str.to_string());
                }
                "restraints.moltype" => {
                    self.restraints
                        .get_or_insert_with(Default::default)
                        .moltype = Some(value_str.to_string());
                }
                "restraints.stride" => {
                    self.restraints
                        .get_or_insert_with(Default::default)
                        .stride = Some(parse_value(key, value_str, "integer")?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}
