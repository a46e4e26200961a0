//! # oracle-consensus
//!
//! Merges independent reviewer positions on a recommendation into a
//! consensus result, surfacing every disagreement verbatim.
//!
//! Sessions move `Collecting → Reconciling → Finalized`; see [`session`].

pub mod manager;
pub mod reconcile;
pub mod session;

pub use manager::ConsensusManager;
pub use reconcile::Reconciliation;
pub use session::{ConsensusSession, SessionState};
