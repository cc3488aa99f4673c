use crate::cli::PuckerArgs;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use bulgeff::engine::config::BulgeTarget;
use bulgeff::engine::progress::ProgressReporter;
use bulgeff::workflows;
use tracing::info;

pub fn run(args: PuckerArgs) -> Result<()> {
    let targets = BulgeTarget::zip(&args.targets.bulge_names, &args.targets.bulge_ids)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.callback());

    info!("Computing sugar pucker for {} residue(s)", targets.len());
    let reports = workflows::pucker::run(&args.bulge_pdb, &targets, &reporter)?;

    for report in &reports {
        let phase = report
            .analysis
            .phase
            .map_or_else(|| "undefined".to_string(), |p| format!("{:.2}°", p));
        println!(
            "{:<8} phase {:>9}  amplitude {:>6.2}°  {}",
            report.target.to_string(),
            phase,
            report.analysis.amplitude,
            report.analysis.pucker
        );
    }
    Ok(())
}
