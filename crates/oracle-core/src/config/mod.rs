//! Configuration for every engine subsystem.
//!
//! # Examples
//!
//! ```
//! use oracle_core::config::OracleConfig;
//!
//! let config = OracleConfig::default();
//! assert_eq!(config.simulation.default_universe_count, 1_000);
//! assert!(config.validate().is_ok());
//! ```

pub mod consensus_config;
pub mod defaults;
pub mod observability_config;
pub mod oracle_config;
pub mod sensitivity_config;
pub mod simulation_config;

pub use consensus_config::ConsensusConfig;
pub use observability_config::ObservabilityConfig;
pub use oracle_config::OracleConfig;
pub use sensitivity_config::SensitivityConfig;
pub use simulation_config::SimulationConfig;
