//! Phloem - Community Fund Governance Engine
//!
//! A deterministic decision engine for community spending proposals:
//! members submit proposals, votes resolve them by fixed-quorum majority.
//!
//! Key principles:
//! - Strictly sequential state machine (no internal parallelism)
//! - All-or-nothing calls (no partial mutation, no fact without commit)
//! - Write-once vote ledger (one vote per member per proposal, forever)
//! - Facts published to subscribers after every committed mutation

pub mod governance;
pub mod identity;
