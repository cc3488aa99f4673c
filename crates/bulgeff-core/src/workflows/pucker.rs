use crate::core::analysis::pucker::{PuckerAnalysis, analyze_pucker};
use crate::core::io::pdb::PdbFile;
use crate::core::io::traits::StructureFile;
use crate::engine::config::BulgeTarget;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use std::path::Path;
use tracing::instrument;

#[derive(Debug, Clone, PartialEq)]
pub struct PuckerReport {
    pub target: BulgeTarget,
    pub analysis: PuckerAnalysis,
}

/// Computes the sugar pucker of every target in `structure_path`, in input order.
#[instrument(skip_all, name = "pucker_workflow")]
pub fn run(
    structure_path: &Path,
    targets: &[BulgeTarget],
    reporter: &ProgressReporter,
) -> Result<Vec<PuckerReport>, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Sugar Pucker",
    });
    let structure = PdbFile::read_from_path(structure_path)?;

    reporter.report(Progress::ResiduesStart {
        total: targets.len() as u64,
    });
    let mut reports = Vec::with_capacity(targets.len());
    for target in targets {
        reporter.report(Progress::ResidueStart {
            label: target.to_string(),
        });
        let analysis = analyze_pucker(&structure, &target.residue_name, target.residue_number)?;
        reports.push(PuckerReport {
            target: target.clone(),
            analysis,
        });
        reporter.report(Progress::ResidueFinish);
    }
    reporter.report(Progress::ResiduesFinish);
    reporter.report(Progress::PhaseFinish);

    Ok(reports)
}
