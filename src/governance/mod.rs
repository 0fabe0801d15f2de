//! Community Fund Governance Module
//!
//! Implements the on-ledger decision engine for community spending:
//! - Membership registry (lazy enrollment, never revoked)
//! - Proposal store (dense ids, immutable fields, mutable tallies/status)
//! - Resolution engine (write-once vote ledger, fixed-quorum strict-majority
//!   resolution)
//! - Fact stream with observer subscriptions and an append-only audit trail

pub mod audit;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod registry;
pub mod store;

#[cfg(test)]
mod proptests;

pub use audit::{format_audit_log, AuditEntry, AuditKind, AuditQuery, AuditTrail};
pub use config::GovernanceConfig;
pub use engine::{FundEngine, VoteLedger};
pub use error::{GovernanceError, GovernanceResult};
pub use events::{EventSink, GovernanceEvent, RecordingSink, TracingSink};
pub use registry::MemberRegistry;
pub use store::{Proposal, ProposalStatus, ProposalStore};
