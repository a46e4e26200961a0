//! Plurality and discrepancy computation over reviewer positions.
//!
//! Pure functions; the session state machine decides when they run.

use serde::{Deserialize, Serialize};

use oracle_core::models::{DiscrepancySide, MajorDiscrepancy, ReviewerPosition};

/// Canonical form used to compare recommendations.
pub fn normalize(recommendation: &str) -> String {
    recommendation.trim().to_lowercase()
}

/// Snapshot of a reconciled session, before finalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Plurality recommendation as first written by a reviewer.
    pub plurality: String,
    /// Percentage of reviewers backing the plurality, 0–100.
    pub agreement_level: f64,
    pub reviewer_count: usize,
    pub major_discrepancies: Vec<MajorDiscrepancy>,
}

/// Reviewers grouped by normalized recommendation.
struct Group<'a> {
    key: String,
    display: String,
    positions: Vec<&'a ReviewerPosition>,
    total_confidence: f64,
}

impl Group<'_> {
    fn side(&self) -> DiscrepancySide {
        let mut critical_concerns: Vec<String> = Vec::new();
        for concern in self.positions.iter().flat_map(|p| &p.critical_concerns) {
            if !critical_concerns.contains(concern) {
                critical_concerns.push(concern.clone());
            }
        }
        DiscrepancySide {
            recommendation: self.display.clone(),
            reviewers: self.positions.iter().map(|p| p.reviewer_id.clone()).collect(),
            reasoning: self.positions.iter().map(|p| p.reasoning.clone()).collect(),
            critical_concerns,
        }
    }

    /// Plurality order: more reviewers, then more total confidence, then name.
    fn beats(&self, other: &Group<'_>) -> bool {
        self.positions
            .len()
            .cmp(&other.positions.len())
            .then_with(|| {
                self.total_confidence
                    .partial_cmp(&other.total_confidence)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| other.key.cmp(&self.key))
            .is_gt()
    }
}

fn group(positions: &[ReviewerPosition]) -> Vec<Group<'_>> {
    let mut groups: Vec<Group<'_>> = Vec::new();
    for p in positions {
        let key = normalize(&p.recommendation);
        match groups.iter_mut().find(|g| g.key == key) {
            Some(g) => {
                g.positions.push(p);
                g.total_confidence += p.confidence_level;
            }
            None => groups.push(Group {
                key,
                display: p.recommendation.trim().to_string(),
                positions: vec![p],
                total_confidence: p.confidence_level,
            }),
        }
    }
    groups
}

/// Reconcile `positions`. `None` when there are no positions.
pub fn reconcile(positions: &[ReviewerPosition]) -> Option<Reconciliation> {
    let mut groups = group(positions);
    let best = (0..groups.len()).reduce(|best, i| if groups[i].beats(&groups[best]) { i } else { best })?;
    let plurality = groups.remove(best);

    // Largest minorities first.
    groups.sort_by(|a, b| {
        b.positions
            .len()
            .cmp(&a.positions.len())
            .then_with(|| a.key.cmp(&b.key))
    });

    let plurality_side = plurality.side();
    let major_discrepancies = groups
        .iter()
        .map(|minority| MajorDiscrepancy {
            issue: format!("{} vs {}", plurality.display, minority.display),
            sides: vec![plurality_side.clone(), minority.side()],
            resolution_path: None,
        })
        .collect();

    Some(Reconciliation {
        agreement_level: 100.0 * plurality.positions.len() as f64 / positions.len() as f64,
        plurality: plurality.display,
        reviewer_count: positions.len(),
        major_discrepancies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(id: &str, rec: &str, confidence: f64) -> ReviewerPosition {
        ReviewerPosition {
            reviewer_id: id.to_string(),
            specialty: "oncology".to_string(),
            recommendation: rec.to_string(),
            confidence_level: confidence,
            reasoning: format!("{id} reasoning"),
            critical_concerns: vec![format!("{id} concern")],
        }
    }

    #[test]
    fn empty_positions_do_not_reconcile() {
        assert!(reconcile(&[]).is_none());
    }

    #[test]
    fn two_to_one_split() {
        let r = reconcile(&[
            position("r1", "A", 80.0),
            position("r2", " a ", 70.0),
            position("r3", "B", 90.0),
        ])
        .unwrap();
        assert_eq!(r.plurality, "A");
        assert!((r.agreement_level - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(r.major_discrepancies.len(), 1);

        let d = &r.major_discrepancies[0];
        assert_eq!(d.sides[0].reviewers, ["r1", "r2"]);
        assert_eq!(d.sides[1].reviewers, ["r3"]);
        assert_eq!(d.sides[1].reasoning, ["r3 reasoning"]);
        assert_eq!(d.resolution_path, None);
    }

    #[test]
    fn unanimous_has_no_discrepancy() {
        let r = reconcile(&[position("r1", "A", 50.0), position("r2", "A", 50.0)]).unwrap();
        assert_eq!(r.agreement_level, 100.0);
        assert!(r.major_discrepancies.is_empty());
    }

    #[test]
    fn ties_break_on_confidence_then_name() {
        let r = reconcile(&[position("r1", "B", 60.0), position("r2", "A", 90.0)]).unwrap();
        assert_eq!(r.plurality, "A");

        let r = reconcile(&[position("r1", "B", 60.0), position("r2", "A", 60.0)]).unwrap();
        assert_eq!(r.plurality, "A");
        assert_eq!(r.agreement_level, 50.0);
    }

    #[test]
    fn each_minority_gets_its_own_discrepancy() {
        let r = reconcile(&[
            position("r1", "A", 50.0),
            position("r2", "A", 50.0),
            position("r3", "B", 50.0),
            position("r4", "C", 50.0),
        ])
        .unwrap();
        let issues: Vec<_> = r.major_discrepancies.iter().map(|d| d.issue.as_str()).collect();
        assert_eq!(issues, ["A vs B", "A vs C"]);
    }
}
