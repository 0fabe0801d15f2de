//! Resolution engine.
//!
//! Composes the membership registry, the proposal store, and the write-once
//! vote ledger into the engine callers interact with. Every operation is a
//! strictly ordered, all-or-nothing state transition: validation failures
//! mutate nothing and publish nothing, successful calls commit their
//! mutations and publish the matching facts before returning.

use crate::governance::config::GovernanceConfig;
use crate::governance::error::{GovernanceError, GovernanceResult};
use crate::governance::events::{EventSink, GovernanceEvent};
use crate::governance::registry::MemberRegistry;
use crate::governance::store::{Proposal, ProposalStatus, ProposalStore};
use crate::identity::MemberId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::time::{SystemTime, UNIX_EPOCH};

/// Write-once record of who voted on which proposal.
///
/// Entries are only ever added; a recorded vote can never be changed or
/// withdrawn, which is what blocks double-voting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoteLedger {
    votes: HashMap<u64, BTreeSet<MemberId>>,
}

impl VoteLedger {
    /// Record a vote. Returns false when the voter already has a record
    /// for this proposal, leaving the ledger unchanged.
    fn record(&mut self, proposal_id: u64, voter: MemberId) -> bool {
        self.votes.entry(proposal_id).or_default().insert(voter)
    }

    /// Whether a vote record exists for this (proposal, voter) pair.
    pub fn has_voted(&self, proposal_id: u64, voter: &MemberId) -> bool {
        self.votes
            .get(&proposal_id)
            .is_some_and(|voters| voters.contains(voter))
    }
}

/// The community fund decision engine.
///
/// One instance owns all governance state. Calls are processed one at a
/// time; callers exposing the engine behind a network service must totally
/// order incoming calls themselves.
pub struct FundEngine {
    config: GovernanceConfig,
    registry: MemberRegistry,
    store: ProposalStore,
    ledger: VoteLedger,
    sinks: Vec<Box<dyn EventSink>>,
}

impl FundEngine {
    /// Create an engine with the given governance parameters and no
    /// subscribers.
    pub fn new(config: GovernanceConfig) -> Self {
        Self {
            config,
            registry: MemberRegistry::new(),
            store: ProposalStore::new(),
            ledger: VoteLedger::default(),
            sinks: Vec::new(),
        }
    }

    /// Subscribe a sink to the fact stream. Sinks receive every fact
    /// published after their subscription, in publication order.
    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Submit a spending proposal.
    ///
    /// Validates the title and amount, stores the proposal under the next
    /// dense id, enrolls the proposer as a member (idempotent), and
    /// publishes `ProposalCreated`.
    pub fn create_proposal(
        &mut self,
        proposer: MemberId,
        title: &str,
        description: &str,
        amount: u128,
    ) -> GovernanceResult<u64> {
        let now = unix_now();
        let id = self.store.create(
            &mut self.registry,
            proposer.clone(),
            title,
            description,
            amount,
            now,
        )?;

        tracing::debug!(id, %proposer, "stored proposal");
        self.publish(GovernanceEvent::ProposalCreated {
            id,
            proposer,
            title: title.to_string(),
            amount,
        });

        Ok(id)
    }

    /// Cast a vote on a pending proposal.
    ///
    /// Rejected with `NotFound` for unknown ids, `AlreadyFinalized` for
    /// decided proposals, and `DuplicateVote` when the voter already has a
    /// record. On success the matching tally is incremented and `VoteCast`
    /// published; when the total reaches the quorum the proposal resolves
    /// by strict majority and `ProposalStatusChanged` is published in the
    /// same call.
    pub fn vote(
        &mut self,
        proposal_id: u64,
        voter: MemberId,
        support: bool,
    ) -> GovernanceResult<()> {
        let status = self.store.status(proposal_id)?;
        if status != ProposalStatus::Pending {
            return Err(GovernanceError::AlreadyFinalized(proposal_id));
        }
        if !self.ledger.record(proposal_id, voter.clone()) {
            return Err(GovernanceError::DuplicateVote(proposal_id));
        }

        let (yes, no) = self.store.apply_vote(proposal_id, support);
        self.publish(GovernanceEvent::VoteCast {
            proposal_id,
            voter,
            support,
        });

        let total = yes + no;
        if total >= self.config.quorum {
            // Strict majority: a tie at an even quorum rejects.
            let new_status = if yes * 2 > total {
                ProposalStatus::Approved
            } else {
                ProposalStatus::Rejected
            };
            self.store.finalize(proposal_id, new_status);
            tracing::debug!(proposal_id, yes, no, %new_status, "quorum reached");
            self.publish(GovernanceEvent::ProposalStatusChanged {
                proposal_id,
                new_status,
            });
        }

        Ok(())
    }

    /// Immutable snapshot of a proposal.
    pub fn get_proposal(&self, proposal_id: u64) -> GovernanceResult<Proposal> {
        self.store.get(proposal_id)
    }

    /// Whether the identity has voted on the proposal.
    pub fn has_voted(&self, proposal_id: u64, identity: &MemberId) -> GovernanceResult<bool> {
        // Existence check first so unknown ids fail rather than read false.
        self.store.status(proposal_id)?;
        Ok(self.ledger.has_voted(proposal_id, identity))
    }

    /// Number of proposals ever created.
    pub fn proposal_count(&self) -> u64 {
        self.store.count()
    }

    /// All proposal ids in creation order.
    pub fn all_proposal_ids(&self) -> Vec<u64> {
        self.store.all_ids()
    }

    /// Number of distinct registered members.
    pub fn member_count(&self) -> u64 {
        self.registry.count()
    }

    /// Whether the identity is a registered member.
    pub fn is_member(&self, identity: &MemberId) -> bool {
        self.registry.is_member(identity)
    }

    /// Registered members in sorted order.
    pub fn members(&self) -> Vec<MemberId> {
        self.registry.members().cloned().collect()
    }

    fn publish(&mut self, event: GovernanceEvent) {
        for sink in &mut self.sinks {
            sink.publish(&event);
        }
    }
}

impl Default for FundEngine {
    fn default() -> Self {
        Self::new(GovernanceConfig::default())
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("System clock is before UNIX epoch")
        .as_secs()
}
