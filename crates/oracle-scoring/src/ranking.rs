//! Ranking of scored candidates into a recommendation.

use std::cmp::Ordering;

use oracle_core::errors::SimulationError;
use oracle_core::models::{RankedTreatment, Recommendation, SimulationReport};
use oracle_simulation::CandidateRun;

use crate::scorer;

/// Score one simulated candidate.
///
/// Scores come from the shifted candidate; the declared one is kept for
/// display and for re-simulation.
pub fn build_ranked(run: CandidateRun) -> RankedTreatment {
    let scores = scorer::score(&run.effective, &run.aggregate);
    let evidence_strength = run.candidate.evidence_strength;
    RankedTreatment {
        confidence: scorer::confidence(&run.aggregate, evidence_strength),
        evidence_strength,
        scores,
        candidate: run.candidate,
        aggregate: run.aggregate,
    }
}

/// Total order used for ranking; `Less` means `a` ranks ahead of `b`.
///
/// Higher suitability first, then higher optimal path probability, higher
/// evidence strength, lower risk, and finally name.
pub fn rank_order(a: &RankedTreatment, b: &RankedTreatment) -> Ordering {
    desc(a.suitability_score(), b.suitability_score())
        .then_with(|| {
            desc(
                a.aggregate.optimal_path_probability,
                b.aggregate.optimal_path_probability,
            )
        })
        .then_with(|| desc(a.evidence_strength, b.evidence_strength))
        .then_with(|| {
            a.scores
                .risk_score
                .partial_cmp(&b.scores.risk_score)
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.name().cmp(b.name()))
}

fn desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// True when `a` ranks strictly ahead of `b`.
pub fn outranks(a: &RankedTreatment, b: &RankedTreatment) -> bool {
    rank_order(a, b) == Ordering::Less
}

/// Sort `ranked` and split it into primary and alternatives.
pub fn rank(
    mut ranked: Vec<RankedTreatment>,
    report: SimulationReport,
) -> Result<Recommendation, SimulationError> {
    if ranked.is_empty() {
        return Err(SimulationError::NoCandidates);
    }
    ranked.sort_by(rank_order);
    let primary = ranked.remove(0);
    Ok(Recommendation {
        primary,
        alternatives: ranked,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{aggregate_with, candidate, report};
    use oracle_core::models::RiskBenefitScore;

    fn ranked(name: &str, suitability: f64, opp: f64, evidence: f64, risk: f64) -> RankedTreatment {
        RankedTreatment {
            candidate: candidate(name, 0.5, 0.5),
            scores: RiskBenefitScore {
                benefit_score: 0.5,
                risk_score: risk,
                suitability_score: suitability,
            },
            confidence: 50.0,
            evidence_strength: evidence,
            aggregate: aggregate_with(opp, 0.8),
        }
    }

    #[test]
    fn highest_suitability_is_primary() {
        let rec = rank(
            vec![
                ranked("b", 0.3, 0.5, 0.5, 0.1),
                ranked("a", 0.6, 0.5, 0.5, 0.1),
                ranked("c", 0.1, 0.5, 0.5, 0.1),
            ],
            report(),
        )
        .unwrap();
        assert_eq!(rec.primary.name(), "a");
        let rest: Vec<_> = rec.alternatives.iter().map(|r| r.name()).collect();
        assert_eq!(rest, ["b", "c"]);
    }

    #[test]
    fn ties_break_in_documented_order() {
        let base = ranked("m", 0.5, 0.5, 0.5, 0.5);
        assert!(outranks(&ranked("z", 0.5, 0.6, 0.0, 0.9), &base));
        assert!(outranks(&ranked("z", 0.5, 0.5, 0.6, 0.9), &base));
        assert!(outranks(&ranked("z", 0.5, 0.5, 0.5, 0.4), &base));
        assert!(outranks(&ranked("a", 0.5, 0.5, 0.5, 0.5), &base));
        assert!(!outranks(&base, &base));
    }

    #[test]
    fn empty_ranking_is_rejected() {
        assert_eq!(rank(vec![], report()).unwrap_err(), SimulationError::NoCandidates);
    }
}
