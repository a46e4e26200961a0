//! Clinical query: The patient context submitted by the caller.

use serde::{Deserialize, Serialize};

use crate::errors::SimulationError;

/// Patient-level preference factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientFactors {
    pub age: u32,
    /// ECOG performance status, 0 (fully active) to 4 (bedbound).
    pub performance_status: u8,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub preferences: Vec<String>,
}

impl PatientFactors {
    /// True when any stated goal prioritises quality of life.
    pub fn prioritises_quality_of_life(&self) -> bool {
        self.goals.iter().any(|g| {
            let g = g.to_ascii_lowercase();
            g.contains("quality") || g.contains("comfort")
        })
    }
}

/// Immutable clinical context for one simulation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalQuery {
    pub id: String,
    pub cancer_type: String,
    /// Stage label, e.g. "II", "IIIA", "IV".
    pub stage: String,
    #[serde(default)]
    pub prior_treatments: Vec<String>,
    #[serde(default)]
    pub comorbidities: Vec<String>,
    #[serde(default)]
    pub genetic_markers: Vec<String>,
    #[serde(default)]
    pub current_symptoms: Vec<String>,
    /// Clinical urgency, 0–100.
    pub urgency: u8,
    pub patient: PatientFactors,
}

impl ClinicalQuery {
    /// Reject out-of-range fields before any sampling work begins.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.urgency > 100 {
            return Err(invalid_query("urgency", "must be between 0 and 100"));
        }
        if self.patient.performance_status > 4 {
            return Err(invalid_query(
                "patient.performance_status",
                "ECOG status must be between 0 and 4",
            ));
        }
        if self.patient.age > 130 {
            return Err(invalid_query("patient.age", "must be at most 130"));
        }
        if self.stage.trim().is_empty() {
            return Err(invalid_query("stage", "must not be empty"));
        }
        Ok(())
    }

    /// Baseline monthly progression hazard implied by stage, urgency and
    /// treatment history.
    pub fn baseline_progression_hazard(&self) -> f64 {
        let stage = self.stage.trim().to_ascii_uppercase();
        let base = if stage.starts_with("IV") {
            0.12
        } else if stage.starts_with("III") {
            0.07
        } else if stage.starts_with("II") {
            0.04
        } else if stage.starts_with('I') {
            0.02
        } else {
            0.06
        };
        let urgency = 1.0 + f64::from(self.urgency) / 200.0;
        let history = 1.0 + 0.05 * self.prior_treatments.len() as f64;
        (base * urgency * history).clamp(0.0, 0.5)
    }

    /// Baseline quality of life (0–100) implied by performance status and age.
    pub fn baseline_quality_of_life(&self) -> f64 {
        let ps = f64::from(self.patient.performance_status);
        let age_penalty = (f64::from(self.patient.age) - 60.0).max(0.0) * 0.5;
        (95.0 - 15.0 * ps - age_penalty).clamp(10.0, 100.0)
    }

    /// Recovery capacity in [0.2, 1.0], reduced by comorbidities.
    pub fn resilience(&self) -> f64 {
        (1.0 - 0.1 * self.comorbidities.len() as f64).clamp(0.2, 1.0)
    }

    /// True when the query carries `marker` (case-insensitive).
    pub fn has_marker(&self, marker: &str) -> bool {
        self.genetic_markers
            .iter()
            .any(|m| m.eq_ignore_ascii_case(marker.trim()))
    }
}

fn invalid_query(field: &str, reason: &str) -> SimulationError {
    SimulationError::InvalidQuery {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
