// Single source of truth for all default values.

// --- Simulation ---
pub const DEFAULT_WORKER_THREADS: usize = 0; // 0 = one per core
pub const DEFAULT_UNIVERSE_COUNT: usize = 1_000;
pub const DEFAULT_HORIZON_MONTHS: i64 = 12;
pub const DEFAULT_MIN_OVERALL_SURVIVAL_MONTHS: f64 = 9.0;
pub const DEFAULT_MIN_QALY: f64 = 0.5;
pub const DEFAULT_CONVERGENCE_RSE: f64 = 0.02;
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

// --- Sensitivity ---
pub const DEFAULT_SENSITIVITY_MAX_UNIVERSES: usize = 250;
pub const DEFAULT_BISECTION_ITERATIONS: u32 = 10;
pub const DEFAULT_WORK_WARNING_THRESHOLD: usize = 50_000;

// --- Consensus ---
pub const DEFAULT_MIN_REVIEWERS: usize = 2;

// --- Jobs ---
pub const DEFAULT_JOB_DEADLINE_MS: u64 = 0; // 0 = no deadline

// --- Observability ---
pub const DEFAULT_LOG_FILTER: &str = "oracle=info";
pub const DEFAULT_JSON_LOGS: bool = false;
