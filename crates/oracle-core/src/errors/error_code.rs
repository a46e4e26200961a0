//! OracleErrorCode trait for RPC/boundary conversion.

/// Trait for converting oracle errors to stable error code strings.
/// Every error enum implements this so callers behind an RPC boundary
/// can match on a code instead of a message.
pub trait OracleErrorCode {
    /// Returns the error code string (e.g., "INVALID_MODEL").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted boundary string: `[ERROR_CODE] message`.
    fn boundary_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

// Error code constants for the caller boundary.
pub const INVALID_MODEL: &str = "INVALID_MODEL";
pub const INVALID_HORIZON: &str = "INVALID_HORIZON";
pub const INVALID_QUERY: &str = "INVALID_QUERY";
pub const INVALID_CANDIDATE: &str = "INVALID_CANDIDATE";
pub const NO_CANDIDATES: &str = "NO_CANDIDATES";
pub const EMPTY_INPUT: &str = "EMPTY_INPUT";
pub const SIMULATION_TIMEOUT: &str = "SIMULATION_TIMEOUT";
pub const CANCELLED: &str = "CANCELLED";
pub const JOB_NOT_FOUND: &str = "JOB_NOT_FOUND";
pub const SESSION_FINALIZED: &str = "SESSION_FINALIZED";
pub const SESSION_NOT_FOUND: &str = "SESSION_NOT_FOUND";
pub const NO_POSITIONS: &str = "NO_POSITIONS";
pub const INVALID_TRANSITION: &str = "INVALID_TRANSITION";
pub const INVALID_POSITION: &str = "INVALID_POSITION";
pub const DISCREPANCY_NOT_FOUND: &str = "DISCREPANCY_NOT_FOUND";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
