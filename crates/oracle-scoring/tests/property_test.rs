use std::collections::BTreeMap;

use oracle_core::models::{
    AggregateOutcome, BenefitFactor, CandidateTreatment, ConvergenceDiagnostic, FieldSummary,
    RiskFactor, Timeframe,
};
use oracle_scoring::score;
use proptest::prelude::*;

fn make_aggregate(robustness_score: f64) -> AggregateOutcome {
    let summary = FieldSummary {
        mean: 12.0,
        std_dev: 2.0,
        p10: 9.0,
        p50: 12.0,
        p90: 15.0,
    };
    AggregateOutcome {
        candidate: "c".to_string(),
        universe_count: 50,
        overall_survival: summary,
        progression_free_survival: summary,
        quality_adjusted_life_years: summary,
        treatment_burden: summary,
        patient_satisfaction: summary,
        optimal_path_probability: 0.5,
        robustness_score,
        tail_risk: 8.0,
        side_effect_incidence: BTreeMap::new(),
        convergence: ConvergenceDiagnostic {
            standard_error: 0.3,
            relative_standard_error: 0.025,
            converged: false,
        },
    }
}

fn make_candidate(magnitude: f64, certainty: f64, probability: f64, severity: f64) -> CandidateTreatment {
    CandidateTreatment {
        name: "c".to_string(),
        reasoning: String::new(),
        evidence_strength: 0.5,
        target_markers: vec![],
        risks: vec![RiskFactor {
            name: "r".to_string(),
            probability,
            severity,
            mitigation: String::new(),
        }],
        benefits: vec![BenefitFactor {
            name: "b".to_string(),
            magnitude,
            timeframe: Timeframe::LongTerm,
            certainty,
        }],
    }
}

proptest! {
    #[test]
    fn suitability_non_decreasing_in_benefit(
        magnitude in 0.0f64..=1.0,
        certainty in 0.0f64..=1.0,
        bump in 0.0f64..=1.0,
        probability in 0.0f64..=1.0,
        severity in 0.0f64..=1.0,
        robustness in 0.0f64..=1.0,
    ) {
        let agg = make_aggregate(robustness);
        let low = score(&make_candidate(magnitude, certainty, probability, severity), &agg);
        let more_magnitude = score(
            &make_candidate((magnitude + bump).min(1.0), certainty, probability, severity),
            &agg,
        );
        let more_certainty = score(
            &make_candidate(magnitude, (certainty + bump).min(1.0), probability, severity),
            &agg,
        );
        prop_assert!(more_magnitude.suitability_score >= low.suitability_score - 1e-12);
        prop_assert!(more_certainty.suitability_score >= low.suitability_score - 1e-12);
    }

    #[test]
    fn suitability_non_increasing_in_risk(
        magnitude in 0.0f64..=1.0,
        certainty in 0.0f64..=1.0,
        probability in 0.0f64..=1.0,
        severity in 0.0f64..=1.0,
        bump in 0.0f64..=1.0,
        robustness in 0.0f64..=1.0,
    ) {
        let agg = make_aggregate(robustness);
        let base = score(&make_candidate(magnitude, certainty, probability, severity), &agg);
        let riskier = score(
            &make_candidate(magnitude, certainty, (probability + bump).min(1.0), severity),
            &agg,
        );
        let harsher = score(
            &make_candidate(magnitude, certainty, probability, (severity + bump).min(1.0)),
            &agg,
        );
        prop_assert!(riskier.suitability_score <= base.suitability_score + 1e-12);
        prop_assert!(harsher.suitability_score <= base.suitability_score + 1e-12);
    }

    #[test]
    fn scores_stay_in_unit_range(
        magnitude in 0.0f64..=1.0,
        certainty in 0.0f64..=1.0,
        probability in 0.0f64..=1.0,
        severity in 0.0f64..=1.0,
        robustness in 0.0f64..=1.0,
    ) {
        let s = score(&make_candidate(magnitude, certainty, probability, severity), &make_aggregate(robustness));
        prop_assert!((0.0..=1.0).contains(&s.benefit_score));
        prop_assert!((0.0..=1.0).contains(&s.risk_score));
        prop_assert!((0.0..=1.0).contains(&s.suitability_score));
    }
}
