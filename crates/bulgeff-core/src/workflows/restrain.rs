use crate::core::analysis::fragment::{Fragment, extract_trinucleotide};
use crate::core::analysis::pucker::{PuckerAnalysis, SugarPucker, analyze_pucker};
use crate::core::analysis::torsion::locate_torsion_atoms;
use crate::core::functions::FunctionTable;
use crate::core::io::pdb::PdbFile;
use crate::core::io::plumed::RestraintEntry;
use crate::core::io::traits::StructureFile;
use crate::core::models::structure::Structure;
use crate::core::prototypes::library::CandidateSet;
use crate::engine::config::{BulgeConfig, BulgeTarget};
use crate::engine::error::EngineError;
use crate::engine::matching::{MatchOutcome, PrototypeMatch, find_best_match};
use crate::engine::progress::{Progress, ProgressReporter};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// What happened to one requested bulge residue.
#[derive(Debug, Clone, PartialEq)]
pub enum ResidueOutcome {
    Restrained {
        target: BulgeTarget,
        pucker: PuckerAnalysis,
        prototype: PrototypeMatch,
        entry: RestraintEntry,
    },
    /// The best prototype exceeded its RMSD threshold; no restraint was written.
    Rejected {
        target: BulgeTarget,
        pucker: PuckerAnalysis,
        outcome: MatchOutcome,
    },
}

impl ResidueOutcome {
    pub fn target(&self) -> &BulgeTarget {
        match self {
            ResidueOutcome::Restrained { target, .. } | ResidueOutcome::Rejected { target, .. } => {
                target
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RestraintReport {
    /// One outcome per target, in input order.
    pub outcomes: Vec<ResidueOutcome>,
    pub output_path: PathBuf,
}

impl RestraintReport {
    pub fn restrained(&self) -> impl Iterator<Item = &RestraintEntry> {
        self.outcomes.iter().filter_map(|o| match o {
            ResidueOutcome::Restrained { entry, .. } => Some(entry),
            ResidueOutcome::Rejected { .. } => None,
        })
    }

    pub fn rejected(&self) -> impl Iterator<Item = &ResidueOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ResidueOutcome::Rejected { .. }))
    }
}

struct Inputs {
    bulge: Structure,
    md: Structure,
    functions: FunctionTable,
}

#[instrument(skip_all, name = "restraint_workflow")]
pub fn run(config: &BulgeConfig, reporter: &ProgressReporter) -> Result<RestraintReport, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Loading Inputs",
    });
    let inputs = load_inputs(config)?;
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart {
        name: "Matching Prototypes",
    });
    reporter.report(Progress::ResiduesStart {
        total: config.targets.len() as u64,
    });
    let mut candidate_sets: HashMap<SugarPucker, CandidateSet> = HashMap::new();
    let mut outcomes = Vec::with_capacity(config.targets.len());
    for target in &config.targets {
        reporter.report(Progress::ResidueStart {
            label: target.to_string(),
        });
        let outcome = process_residue(config, &inputs, target, &mut candidate_sets)?;
        if let ResidueOutcome::Rejected { outcome, .. } = &outcome {
            warn!("Skipping {}: {}", target, outcome);
            reporter.report(Progress::Message(format!("{}: {}", target, outcome)));
        }
        outcomes.push(outcome);
        reporter.report(Progress::ResidueFinish);
    }
    reporter.report(Progress::ResiduesFinish);
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart {
        name: "Writing Restraints",
    });
    let report = RestraintReport {
        outcomes,
        output_path: config.output_path.clone(),
    };
    let entries: Vec<RestraintEntry> = report.restrained().cloned().collect();
    config
        .plumed_writer()
        .write_to_path(&entries, &config.output_path)
        .map_err(|source| EngineError::Output {
            path: config.output_path.clone(),
            source,
        })?;
    reporter.report(Progress::PhaseFinish);

    info!(
        "Restrained {} of {} bulge residue(s).",
        entries.len(),
        report.outcomes.len()
    );
    Ok(report)
}

fn load_inputs(config: &BulgeConfig) -> Result<Inputs, EngineError> {
    let bulge = PdbFile::read_from_path(&config.bulge_structure_path)?;
    let md = if config.md_structure_path == config.bulge_structure_path {
        bulge.clone()
    } else {
        PdbFile::read_from_path(&config.md_structure_path)?
    };
    let functions = FunctionTable::load(&config.function_table_path)?;
    Ok(Inputs {
        bulge,
        md,
        functions,
    })
}

fn process_residue(
    config: &BulgeConfig,
    inputs: &Inputs,
    target: &BulgeTarget,
    candidate_sets: &mut HashMap<SugarPucker, CandidateSet>,
) -> Result<ResidueOutcome, EngineError> {
    let name = target.residue_name.as_str();
    let number = target.residue_number;

    let fragment = extract_trinucleotide(&inputs.bulge, name, number)?;
    if let Some(dir) = &config.fragment_dir {
        export_fragment(dir, target, &fragment)?;
    }
    let torsions = locate_torsion_atoms(&inputs.md, name, number)?;
    let pucker = analyze_pucker(&inputs.bulge, name, number)?;

    let candidates = match candidate_sets.entry(pucker.pucker) {
        Entry::Occupied(entry) => entry.into_mut(),
        Entry::Vacant(entry) => {
            entry.insert(CandidateSet::for_pucker(&config.prototype_dir, pucker.pucker)?)
        }
    };

    match find_best_match(&fragment, candidates, &config.thresholds)? {
        MatchOutcome::Accepted(prototype) => {
            let functions = inputs
                .functions
                .lookup(prototype.category, &prototype.conformer);
            let entry = RestraintEntry {
                residue_name: target.residue_name.clone(),
                residue_number: number,
                torsions,
                functions,
            };
            Ok(ResidueOutcome::Restrained {
                target: target.clone(),
                pucker,
                prototype,
                entry,
            })
        }
        outcome @ MatchOutcome::Rejected { .. } => Ok(ResidueOutcome::Rejected {
            target: target.clone(),
            pucker,
            outcome,
        }),
    }
}

fn export_fragment(dir: &Path, target: &BulgeTarget, fragment: &Fragment) -> Result<(), EngineError> {
    let output_error = |source: std::io::Error| EngineError::Output {
        path: dir.to_path_buf(),
        source,
    };
    fs::create_dir_all(dir).map_err(output_error)?;
    let path = dir.join(format!("{}_fragment.pdb", target));
    PdbFile::write_to_path(fragment.atoms(), &path)?;
    info!("Wrote trinucleotide fragment to {:?}", path);
    Ok(())
}
