use super::config::MatchThresholds;
use crate::core::analysis::fragment::Fragment;
use crate::core::analysis::pucker::SugarPucker;
use crate::core::prototypes::library::{CandidateSet, Conformer};
use crate::core::utils::geometry::superposed_rmsd;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, trace};

#[derive(Debug, Error, PartialEq)]
pub enum SuperpositionError {
    #[error(
        "Prototype {conformer} ({category}) has {found} P/C4' atoms but the fragment around {residue} has {expected}"
    )]
    AtomCountMismatch {
        residue: String,
        conformer: String,
        category: SugarPucker,
        expected: usize,
        found: usize,
    },
    #[error("Superposition of prototype {conformer} ({category}) onto {residue} is undefined")]
    Degenerate {
        residue: String,
        conformer: String,
        category: SugarPucker,
    },
    #[error("No prototype candidates available for {residue}")]
    NoCandidates { residue: String },
    #[error("No RMSD threshold is defined for sugar type {0}")]
    NoThreshold(SugarPucker),
}

/// The accepted best-scoring prototype.
#[derive(Debug, Clone, PartialEq)]
pub struct PrototypeMatch {
    /// Conformer name, e.g. `model12`.
    pub conformer: String,
    pub index: usize,
    /// Category of the library the conformer was read from.
    pub category: SugarPucker,
    pub rmsd: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    Accepted(PrototypeMatch),
    /// The best candidate exceeded the threshold of its category.
    Rejected {
        category: SugarPucker,
        rmsd: f64,
        threshold: f64,
    },
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchOutcome::Accepted(m) => write!(
                f,
                "Selected prototype {} ({}) with RMSD {:.3} Å",
                m.conformer, m.category, m.rmsd
            ),
            MatchOutcome::Rejected {
                category,
                rmsd,
                threshold,
            } => write!(
                f,
                "No suitable prototype found as the RMSD value exceeds the threshold for {}. RMSD: {:.3} Å, Threshold: {} Å",
                category, rmsd, threshold
            ),
        }
    }
}

fn score(fragment: &Fragment, conformer: &Conformer) -> Result<f64, SuperpositionError> {
    let target = fragment.superposition_points();
    let mobile = conformer.superposition_points();
    let residue = format!("{}{}", fragment.residue_name(), fragment.residue_number());

    if mobile.len() != target.len() {
        return Err(SuperpositionError::AtomCountMismatch {
            residue,
            conformer: conformer.name(),
            category: conformer.category,
            expected: target.len(),
            found: mobile.len(),
        });
    }
    superposed_rmsd(&mobile, &target)
        .filter(|rmsd| rmsd.is_finite())
        .ok_or_else(|| SuperpositionError::Degenerate {
            residue,
            conformer: conformer.name(),
            category: conformer.category,
        })
}

/// Superposes every candidate onto the fragment's P/C4' atoms and keeps the
/// lowest RMSD. On ties the first candidate wins. The winner is accepted if its
/// RMSD does not exceed the threshold of its own category.
///
/// # Errors
///
/// Returns a [`SuperpositionError`] when a candidate cannot be paired with the
/// fragment atom by atom, or when there is nothing to compare against.
pub fn find_best_match(
    fragment: &Fragment,
    candidates: &CandidateSet,
    thresholds: &MatchThresholds,
) -> Result<MatchOutcome, SuperpositionError> {
    debug!(
        "Comparing {}{} against {} prototype(s).",
        fragment.residue_name(),
        fragment.residue_number(),
        candidates.len()
    );

    let mut best: Option<(&Conformer, f64)> = None;
    for conformer in candidates.iter() {
        let rmsd = score(fragment, conformer)?;
        trace!("{} ({}): RMSD {:.4}", conformer.name(), conformer.category, rmsd);
        if best.is_none_or(|(_, best_rmsd)| rmsd < best_rmsd) {
            best = Some((conformer, rmsd));
        }
    }

    let (winner, rmsd) = best.ok_or_else(|| SuperpositionError::NoCandidates {
        residue: format!("{}{}", fragment.residue_name(), fragment.residue_number()),
    })?;
    let threshold = thresholds
        .for_category(winner.category)
        .ok_or(SuperpositionError::NoThreshold(winner.category))?;

    let outcome = if rmsd > threshold {
        MatchOutcome::Rejected {
            category: winner.category,
            rmsd,
            threshold,
        }
    } else {
        MatchOutcome::Accepted(PrototypeMatch {
            conformer: winner.name(),
            index: winner.index,
            category: winner.category,
            rmsd,
        })
    };
    info!("{}", outcome);
    Ok(outcome)
}
