//! Engine-wide constants shared by the simulation and scoring crates.

// --- Model bounds ---

/// Longest horizon a model may declare (50 years).
pub const MAX_HORIZON_MONTHS: i64 = 600;
/// Largest universe set a model may declare.
pub const MAX_UNIVERSE_COUNT: usize = 1_000_000;

// --- Well-known uncertainty factors ---

/// Scales benefit certainty and per-universe response.
pub const FACTOR_TREATMENT_RESPONSE: &str = "treatment_response";
/// Scales every risk factor's probability.
pub const FACTOR_TOXICITY: &str = "toxicity";
/// Raises the per-step progression hazard.
pub const FACTOR_DISEASE_PROGRESSION: &str = "disease_progression";
/// Lowers quality-of-life recovery between steps.
pub const FACTOR_PATIENT_RESILIENCE: &str = "patient_resilience";

/// Standard deviation of a factor deviation at uncertainty level 1.0.
pub const FACTOR_SPREAD: f64 = 0.25;

// --- Trajectory dynamics ---

/// Per-step side-effect probability at `probability × severity = 1`.
pub const RISK_STEP_SCALE: f64 = 0.25;
/// Per-step improvement probability at benefit drive 1.0.
pub const IMPROVE_STEP_SCALE: f64 = 0.35;
/// Maximum absolute monthly change in treatment response.
pub const MAX_RESPONSE_STEP: f64 = 10.0;
/// Maximum absolute monthly change in quality of life.
pub const MAX_QOL_STEP: f64 = 8.0;
/// Quality-of-life penalty per unit severity of a new side effect.
pub const SIDE_EFFECT_QOL_PENALTY: f64 = 12.0;
/// Side effects at or above this severity trigger a management intervention.
pub const SEVERE_SIDE_EFFECT: f64 = 0.6;
/// Multiplier applied to benefit drive when a target marker matches.
pub const MARKER_MATCH_BOOST: f64 = 1.15;

/// Intervention recorded when disease status turns progressive.
pub const INTERVENTION_REASSESS: &str = "reassess_treatment";

// --- Scoring ---

/// Benefit weight by timeframe.
pub const WEIGHT_IMMEDIATE: f64 = 1.0;
pub const WEIGHT_SHORT_TERM: f64 = 0.9;
pub const WEIGHT_LONG_TERM: f64 = 0.75;

/// Confidence blend: optimal path probability, robustness, evidence.
pub const CONFIDENCE_WEIGHTS: (f64, f64, f64) = (0.5, 0.3, 0.2);

// --- Aggregation ---

/// Declared percentiles reported for every outcome field.
pub const PERCENTILES: [u32; 3] = [10, 50, 90];
/// Fraction of worst universes averaged for tail risk.
pub const TAIL_FRACTION: f64 = 0.10;
