//! Proposal storage.
//!
//! The store owns the proposal collection and id assignment. Ids are dense
//! and zero-based in creation order, so the backing `Vec` index is the id.
//! Tallies and status are mutated only through the crate-internal operations
//! the resolution engine calls; everything else is immutable after creation.

use crate::governance::error::{GovernanceError, GovernanceResult};
use crate::governance::registry::MemberRegistry;
use crate::identity::MemberId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a proposal.
///
/// Transitions exactly once, from `Pending` to one of the terminal states,
/// and is frozen afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProposalStatus::Pending => write!(f, "Pending"),
            ProposalStatus::Approved => write!(f, "Approved"),
            ProposalStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

/// A spending proposal.
///
/// `amount` is denominated in the smallest indivisible currency unit;
/// conversion to a human-readable figure is a presentation concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: u64,
    pub proposer: MemberId,
    pub title: String,
    pub description: String,
    pub amount: u128,
    pub yes_votes: u32,
    pub no_votes: u32,
    pub status: ProposalStatus,
    /// Unix timestamp (seconds) captured at creation.
    pub created_at: u64,
}

impl Proposal {
    /// Total votes cast so far.
    pub fn total_votes(&self) -> u32 {
        self.yes_votes + self.no_votes
    }
}

/// Owner of the proposal collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProposalStore {
    proposals: Vec<Proposal>,
}

impl ProposalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store a new proposal, enrolling the proposer.
    ///
    /// Returns the dense id assigned in creation order. Nothing is stored
    /// and no member is enrolled when validation fails.
    pub fn create(
        &mut self,
        registry: &mut MemberRegistry,
        proposer: MemberId,
        title: &str,
        description: &str,
        amount: u128,
        now: u64,
    ) -> GovernanceResult<u64> {
        if title.trim().is_empty() {
            return Err(GovernanceError::InvalidInput(
                "Title cannot be empty".to_string(),
            ));
        }
        if amount == 0 {
            return Err(GovernanceError::InvalidInput(
                "Amount must be greater than 0".to_string(),
            ));
        }

        let id = self.proposals.len() as u64;
        registry.register(proposer.clone());
        self.proposals.push(Proposal {
            id,
            proposer,
            title: title.to_string(),
            description: description.to_string(),
            amount,
            yes_votes: 0,
            no_votes: 0,
            status: ProposalStatus::Pending,
            created_at: now,
        });

        Ok(id)
    }

    /// Immutable snapshot of a proposal.
    pub fn get(&self, id: u64) -> GovernanceResult<Proposal> {
        self.proposals
            .get(id as usize)
            .cloned()
            .ok_or(GovernanceError::NotFound(id))
    }

    /// Number of proposals ever created.
    pub fn count(&self) -> u64 {
        self.proposals.len() as u64
    }

    /// All proposal ids in creation order (ascending).
    pub fn all_ids(&self) -> Vec<u64> {
        (0..self.count()).collect()
    }

    /// Current status of a proposal.
    pub(crate) fn status(&self, id: u64) -> GovernanceResult<ProposalStatus> {
        self.proposals
            .get(id as usize)
            .map(|p| p.status)
            .ok_or(GovernanceError::NotFound(id))
    }

    /// Increment the matching tally. Caller has already checked that the
    /// proposal exists and is pending. Returns the updated tallies.
    pub(crate) fn apply_vote(&mut self, id: u64, support: bool) -> (u32, u32) {
        let proposal = &mut self.proposals[id as usize];
        if support {
            proposal.yes_votes += 1;
        } else {
            proposal.no_votes += 1;
        }
        (proposal.yes_votes, proposal.no_votes)
    }

    /// One-time transition out of `Pending`. Caller has already checked
    /// that the proposal exists and is pending.
    pub(crate) fn finalize(&mut self, id: u64, status: ProposalStatus) {
        self.proposals[id as usize].status = status;
    }
}
