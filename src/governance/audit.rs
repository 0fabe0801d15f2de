//! Audit trail.
//!
//! Append-only record of every committed state change. The trail subscribes
//! to the engine's fact stream, so an entry exists exactly when a mutation
//! committed; nothing is ever recorded for rejected calls.
//!
//! Design principles:
//! - Immutable append-only log (no deletion)
//! - Chronological ordering via timestamp
//! - Query interface for the console's /audit command

use crate::governance::events::{EventSink, GovernanceEvent};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

/// Kind of audited state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditKind {
    ProposalCreated,
    VoteCast,
    StatusChanged,
}

/// Single audit log entry: one committed fact plus when it was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unix timestamp (seconds since epoch).
    pub timestamp: u64,
    /// The committed fact.
    pub event: GovernanceEvent,
}

impl AuditEntry {
    /// Create an entry with the current timestamp.
    pub fn new(event: GovernanceEvent) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("System clock is before UNIX epoch")
            .as_secs();

        Self { timestamp, event }
    }

    pub fn kind(&self) -> AuditKind {
        match self.event {
            GovernanceEvent::ProposalCreated { .. } => AuditKind::ProposalCreated,
            GovernanceEvent::VoteCast { .. } => AuditKind::VoteCast,
            GovernanceEvent::ProposalStatusChanged { .. } => AuditKind::StatusChanged,
        }
    }

    /// Format timestamp as human-readable relative time.
    pub fn timestamp_display(&self) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("System clock is before UNIX epoch")
            .as_secs();

        if now < self.timestamp {
            // Future timestamp (clock skew?)
            return format!("Unix: {}", self.timestamp);
        }

        let elapsed = now - self.timestamp;

        match elapsed {
            0..=60 => "Just now".to_string(),
            61..=3600 => format!("{} min ago", elapsed / 60),
            3601..=86400 => format!("{} hours ago", elapsed / 3600),
            _ => format!("Unix: {}", self.timestamp),
        }
    }

    /// One-line description of the recorded change.
    pub fn describe(&self) -> String {
        match &self.event {
            GovernanceEvent::ProposalCreated {
                id,
                proposer,
                title,
                amount,
            } => format!(
                "Proposal #{} \"{}\" created by {} for {} units",
                id, title, proposer, amount
            ),
            GovernanceEvent::VoteCast {
                proposal_id,
                voter,
                support,
            } => format!(
                "{} voted {} on proposal #{}",
                voter,
                if *support { "yes" } else { "no" },
                proposal_id
            ),
            GovernanceEvent::ProposalStatusChanged {
                proposal_id,
                new_status,
            } => format!("Proposal #{} resolved: {}", proposal_id, new_status),
        }
    }
}

/// Query options for the audit log.
#[derive(Debug, Clone)]
pub struct AuditQuery {
    /// Filter by change kind.
    pub kind: Option<AuditKind>,
    /// Filter by proposal id.
    pub proposal_id: Option<u64>,
    /// Limit number of results (most recent first).
    pub limit: Option<usize>,
    /// Only show entries after this timestamp.
    pub after_timestamp: Option<u64>,
}

impl Default for AuditQuery {
    fn default() -> Self {
        Self {
            kind: None,
            proposal_id: None,
            limit: Some(50), // Default: last 50 entries
            after_timestamp: None,
        }
    }
}

/// Append-only audit trail.
///
/// Clones share the same log, so the console keeps one handle and hands
/// another to the engine as a subscribed sink.
#[derive(Debug, Clone, Default)]
pub struct AuditTrail {
    entries: Arc<Mutex<Vec<AuditEntry>>>,
}

impl AuditTrail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries in append order.
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    /// Query the log with filters. Returns entries most recent first.
    pub fn query(&self, query: &AuditQuery) -> Vec<AuditEntry> {
        let entries = self.entries.lock().unwrap();
        let mut filtered: Vec<AuditEntry> = entries
            .iter()
            .filter(|entry| {
                if let Some(kind) = query.kind {
                    if entry.kind() != kind {
                        return false;
                    }
                }

                if let Some(proposal_id) = query.proposal_id {
                    if entry.event.proposal_id() != proposal_id {
                        return false;
                    }
                }

                if let Some(after_ts) = query.after_timestamp {
                    if entry.timestamp <= after_ts {
                        return false;
                    }
                }

                true
            })
            .cloned()
            .collect();

        // Append order is chronological; reverse for most-recent-first.
        filtered.reverse();

        if let Some(limit) = query.limit {
            filtered.truncate(limit);
        }

        filtered
    }
}

impl EventSink for AuditTrail {
    fn publish(&mut self, event: &GovernanceEvent) {
        self.entries
            .lock()
            .unwrap()
            .push(AuditEntry::new(event.clone()));
    }
}

/// Format audit entries for console display.
pub fn format_audit_log(entries: &[AuditEntry]) -> String {
    if entries.is_empty() {
        return "No audit entries found.".to_string();
    }

    let mut output = String::from("Audit trail\n\n");

    for entry in entries {
        output.push_str(&format!(
            "- {} — {}\n",
            entry.timestamp_display(),
            entry.describe()
        ));
    }

    output.trim_end().to_string()
}
