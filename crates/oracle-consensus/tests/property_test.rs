use oracle_consensus::ConsensusManager;
use oracle_core::errors::ConsensusError;
use oracle_core::models::ReviewerPosition;
use proptest::prelude::*;

fn arb_position() -> impl Strategy<Value = (String, f64)> {
    (
        prop_oneof![Just("A"), Just("a "), Just("B"), Just("C"), Just(" c")],
        0.0f64..=100.0,
    )
        .prop_map(|(rec, conf)| (rec.to_string(), conf))
}

proptest! {
    #[test]
    fn agreement_and_support_stay_in_range(
        positions in prop::collection::vec(arb_position(), 1..20),
    ) {
        let manager = ConsensusManager::default();
        let id = manager.open_session(None);
        for (i, (rec, conf)) in positions.iter().enumerate() {
            manager.submit_position(&id, ReviewerPosition {
                reviewer_id: format!("r{i}"),
                specialty: String::new(),
                recommendation: rec.clone(),
                confidence_level: *conf,
                reasoning: String::new(),
                critical_concerns: vec![],
            }).unwrap();
        }
        let reconciliation = manager.reconcile(&id).unwrap();
        prop_assert!((0.0..=100.0).contains(&reconciliation.agreement_level));

        let result = manager.finalize(&id, None).unwrap();
        let fc = &result.final_consensus;
        prop_assert!((0.0..=1.0).contains(&fc.support_level));
        prop_assert!((fc.support_level * 100.0 - result.agreement_level).abs() < 1e-9);
        prop_assert_eq!(
            fc.dissenting.len(),
            positions.len() - (fc.support_level * positions.len() as f64).round() as usize
        );
        prop_assert!(fc.dissenting.is_empty() == result.major_discrepancies.is_empty());

        let rejected = manager.submit_position(&id, ReviewerPosition {
            reviewer_id: "late".to_string(),
            specialty: String::new(),
            recommendation: "A".to_string(),
            confidence_level: 50.0,
            reasoning: String::new(),
            critical_concerns: vec![],
        });
        let is_finalized = matches!(rejected, Err(ConsensusError::SessionFinalized { .. }));
        prop_assert!(is_finalized);
    }
}
