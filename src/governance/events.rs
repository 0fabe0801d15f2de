//! Governance facts and the observer interface.
//!
//! Every committed mutation publishes exactly one fact; consumers subscribe
//! instead of re-fetching engine state after each call. Facts are never
//! published for failed operations.

use crate::governance::store::ProposalStatus;
use crate::identity::MemberId;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Observable fact emitted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GovernanceEvent {
    /// A proposal was stored and its proposer enrolled.
    ProposalCreated {
        id: u64,
        proposer: MemberId,
        title: String,
        amount: u128,
    },

    /// A vote was recorded and the matching tally incremented.
    VoteCast {
        proposal_id: u64,
        voter: MemberId,
        support: bool,
    },

    /// A proposal resolved from Pending to its terminal status.
    ProposalStatusChanged {
        proposal_id: u64,
        new_status: ProposalStatus,
    },
}

impl GovernanceEvent {
    /// Id of the proposal this fact concerns.
    pub fn proposal_id(&self) -> u64 {
        match self {
            GovernanceEvent::ProposalCreated { id, .. } => *id,
            GovernanceEvent::VoteCast { proposal_id, .. } => *proposal_id,
            GovernanceEvent::ProposalStatusChanged { proposal_id, .. } => *proposal_id,
        }
    }
}

/// Subscriber to the engine's fact stream.
///
/// Sinks are invoked synchronously, in subscription order, after the
/// mutation they describe has committed.
pub trait EventSink {
    fn publish(&mut self, event: &GovernanceEvent);
}

/// Sink that logs each fact as a structured tracing event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn publish(&mut self, event: &GovernanceEvent) {
        match event {
            GovernanceEvent::ProposalCreated {
                id,
                proposer,
                title,
                amount,
            } => {
                tracing::info!(id, %proposer, %title, amount, "proposal created");
            }
            GovernanceEvent::VoteCast {
                proposal_id,
                voter,
                support,
            } => {
                tracing::info!(proposal_id, %voter, support, "vote cast");
            }
            GovernanceEvent::ProposalStatusChanged {
                proposal_id,
                new_status,
            } => {
                tracing::info!(proposal_id, %new_status, "proposal resolved");
            }
        }
    }
}

/// Sink that collects every published fact behind a shared handle.
///
/// Clones share the same buffer, so a test (or the console) can keep one
/// handle and hand another to the engine.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<GovernanceEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all facts published so far, in order.
    pub fn events(&self) -> Vec<GovernanceEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }
}

impl EventSink for RecordingSink {
    fn publish(&mut self, event: &GovernanceEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
