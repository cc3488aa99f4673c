use crate::cli::RunArgs;
use crate::config::PartialBulgeConfig;
use crate::data::DataManager;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use bulgeff::engine::config::BulgeTarget;
use bulgeff::engine::progress::ProgressReporter;
use bulgeff::workflows;
use bulgeff::workflows::restrain::ResidueOutcome;
use tracing::{info, warn};

pub fn run(args: RunArgs) -> Result<()> {
    // Unequal name/id lists abort before any file is touched.
    BulgeTarget::zip(&args.targets.bulge_names, &args.targets.bulge_ids)?;

    let data_manager = match &args.data_dir {
        Some(dir) => DataManager::with_custom_path(dir),
        None => DataManager::new()?,
    };
    info!("Using data directory {:?}", data_manager.get_data_path());

    let partial_config = match &args.config {
        Some(path) => PartialBulgeConfig::from_file(path)?,
        None => PartialBulgeConfig::default(),
    };
    let config = partial_config.merge_with_cli(&args, &data_manager)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.callback());

    let report = workflows::restrain::run(&config, &reporter)?;

    for outcome in &report.outcomes {
        match outcome {
            ResidueOutcome::Restrained {
                target,
                pucker,
                prototype,
                ..
            } => println!(
                "✓ {:<8} {:<10} {} (RMSD {:.3} Å)",
                target.to_string(),
                pucker.pucker.to_string(),
                prototype.conformer,
                prototype.rmsd
            ),
            ResidueOutcome::Rejected {
                target, outcome, ..
            } => println!("✗ {:<8} {}", target.to_string(), outcome),
        }
    }

    let written = report.restrained().count();
    if written == 0 {
        warn!("No residue passed its RMSD threshold; the output has no bias blocks.");
    }
    println!(
        "Restraints for {} of {} residue(s) written to: {}",
        written,
        report.outcomes.len(),
        report.output_path.display()
    );
    Ok(())
}
