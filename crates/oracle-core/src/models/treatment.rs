//! Candidate treatments and their declared risk/benefit factors.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::errors::SimulationError;

/// Horizon over which a benefit materialises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    Immediate,
    ShortTerm,
    LongTerm,
}

impl Timeframe {
    /// Weight of a benefit with this timeframe in the benefit score.
    pub fn weight(&self) -> f64 {
        match self {
            Self::Immediate => constants::WEIGHT_IMMEDIATE,
            Self::ShortTerm => constants::WEIGHT_SHORT_TERM,
            Self::LongTerm => constants::WEIGHT_LONG_TERM,
        }
    }
}

/// A named adverse risk of a treatment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub name: String,
    pub probability: f64,
    pub severity: f64,
    #[serde(default)]
    pub mitigation: String,
}

/// A named expected benefit of a treatment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenefitFactor {
    pub name: String,
    pub magnitude: f64,
    pub timeframe: Timeframe,
    pub certainty: f64,
}

/// A named treatment path under evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateTreatment {
    pub name: String,
    #[serde(default)]
    pub reasoning: String,
    /// Strength of the supporting evidence, 0–1.
    #[serde(default)]
    pub evidence_strength: f64,
    /// Genetic markers this treatment is matched to.
    #[serde(default)]
    pub target_markers: Vec<String>,
    #[serde(default)]
    pub risks: Vec<RiskFactor>,
    #[serde(default)]
    pub benefits: Vec<BenefitFactor>,
}

impl CandidateTreatment {
    /// Reject factors outside [0, 1].
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.name.trim().is_empty() {
            return Err(self.invalid("name must not be empty"));
        }
        if !unit(self.evidence_strength) {
            return Err(self.invalid("evidence_strength must be in [0, 1]"));
        }
        for r in &self.risks {
            if !unit(r.probability) || !unit(r.severity) {
                return Err(self.invalid(&format!(
                    "risk factor {} must have probability and severity in [0, 1]",
                    r.name
                )));
            }
        }
        for b in &self.benefits {
            if !unit(b.magnitude) || !unit(b.certainty) {
                return Err(self.invalid(&format!(
                    "benefit factor {} must have magnitude and certainty in [0, 1]",
                    b.name
                )));
            }
        }
        Ok(())
    }

    fn invalid(&self, reason: &str) -> SimulationError {
        SimulationError::InvalidCandidate {
            name: self.name.clone(),
            reason: reason.to_string(),
        }
    }

    /// Copy of this candidate with an adverse `shift` applied to `factor`.
    ///
    /// - a risk factor of that name gains `shift` probability;
    /// - a benefit factor of that name loses `shift` certainty;
    /// - `toxicity` scales every risk probability by `1 + shift`;
    /// - `treatment_response` scales every benefit certainty by `1 - shift`.
    ///
    /// All values stay clamped to [0, 1].
    pub fn with_shift(&self, factor: &str, shift: f64) -> Self {
        let mut shifted = self.clone();
        if shift <= 0.0 {
            return shifted;
        }
        for r in &mut shifted.risks {
            if factor == constants::FACTOR_TOXICITY {
                r.probability *= 1.0 + shift;
            }
            if r.name == factor {
                r.probability += shift;
            }
            r.probability = r.probability.clamp(0.0, 1.0);
        }
        for b in &mut shifted.benefits {
            if factor == constants::FACTOR_TREATMENT_RESPONSE {
                b.certainty *= 1.0 - shift;
            }
            if b.name == factor {
                b.certainty -= shift;
            }
            b.certainty = b.certainty.clamp(0.0, 1.0);
        }
        shifted
    }

    /// True when any of `target_markers` is present in the query.
    pub fn marker_match(&self, query: &crate::models::ClinicalQuery) -> bool {
        self.target_markers.iter().any(|m| query.has_marker(m))
    }
}

fn unit(v: f64) -> bool {
    v.is_finite() && (0.0..=1.0).contains(&v)
}
