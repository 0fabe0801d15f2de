//! Property-based tests for the governance engine.

use super::config::GovernanceConfig;
use super::engine::FundEngine;
use super::error::GovernanceError;
use super::store::ProposalStatus;
use crate::identity::MemberId;
use proptest::prelude::*;
use std::collections::HashSet;

fn voter(index: u8) -> MemberId {
    MemberId::new(format!("voter{}", index))
}

proptest! {
    // Successful creations get ids 0, 1, 2, ... in call order; failed
    // creations consume no id and enroll no member.
    #[test]
    fn prop_ids_are_dense_in_creation_order(
        titles in proptest::collection::vec("[ a-z]{0,12}", 1..24),
        amounts in proptest::collection::vec(0u128..1000, 1..24),
    ) {
        let mut engine = FundEngine::default();
        let mut expected_id = 0u64;
        let mut expected_members = HashSet::new();

        for (i, title) in titles.iter().enumerate() {
            let amount = amounts[i % amounts.len()];
            let proposer = voter((i % 4) as u8);
            let result = engine.create_proposal(proposer.clone(), title, "desc", amount);

            if title.trim().is_empty() || amount == 0 {
                prop_assert!(matches!(result, Err(GovernanceError::InvalidInput(_))));
            } else {
                prop_assert_eq!(result.unwrap(), expected_id);
                expected_id += 1;
                expected_members.insert(proposer);
            }
        }

        prop_assert_eq!(engine.proposal_count(), expected_id);
        let ids = engine.all_proposal_ids();
        prop_assert_eq!(ids.len() as u64, expected_id);
        prop_assert!(ids.windows(2).all(|w| w[1] == w[0] + 1));
        prop_assert_eq!(engine.member_count(), expected_members.len() as u64);
    }

    // Any vote script preserves the ledger invariants: duplicates and
    // post-resolution votes are rejected without mutation, tallies count
    // exactly the accepted votes, and the status matches the strict-majority
    // rule at the quorum.
    #[test]
    fn prop_vote_script_preserves_invariants(
        script in proptest::collection::vec((0u8..8, any::<bool>()), 0..32),
    ) {
        let mut engine = FundEngine::default();
        let id = engine
            .create_proposal(MemberId::new("proposer"), "Title", "", 1)
            .unwrap();

        let mut yes = 0u32;
        let mut no = 0u32;
        let mut seen = HashSet::new();

        for (index, support) in script {
            let result = engine.vote(id, voter(index), support);

            if yes + no >= 3 {
                prop_assert!(matches!(result, Err(GovernanceError::AlreadyFinalized(_))));
            } else if seen.contains(&index) {
                prop_assert!(matches!(result, Err(GovernanceError::DuplicateVote(_))));
            } else {
                prop_assert!(result.is_ok());
                seen.insert(index);
                if support {
                    yes += 1;
                } else {
                    no += 1;
                }
            }

            // Accepted voters are exactly those with a ledger record.
            prop_assert_eq!(engine.has_voted(id, &voter(index)).unwrap(), seen.contains(&index));
        }

        let proposal = engine.get_proposal(id).unwrap();
        prop_assert_eq!(proposal.yes_votes, yes);
        prop_assert_eq!(proposal.no_votes, no);

        let total = yes + no;
        if total >= 3 {
            prop_assert_eq!(total, 3);
            let expected = if yes * 2 > total {
                ProposalStatus::Approved
            } else {
                ProposalStatus::Rejected
            };
            prop_assert_eq!(proposal.status, expected);
        } else {
            prop_assert_eq!(proposal.status, ProposalStatus::Pending);
        }
    }

    // The resolution rule agrees with the final tallies for any quorum.
    #[test]
    fn prop_resolution_matches_strict_majority(
        quorum in 1u32..7,
        supports in proptest::collection::vec(any::<bool>(), 7),
    ) {
        let mut engine = FundEngine::new(GovernanceConfig { quorum });
        let id = engine
            .create_proposal(MemberId::new("proposer"), "Title", "", 1)
            .unwrap();

        let mut yes = 0u32;
        for (index, support) in supports.iter().take(quorum as usize).enumerate() {
            engine.vote(id, voter(index as u8), *support).unwrap();
            if *support {
                yes += 1;
            }
        }

        let proposal = engine.get_proposal(id).unwrap();
        prop_assert_eq!(proposal.total_votes(), quorum);
        let expected = if yes * 2 > quorum {
            ProposalStatus::Approved
        } else {
            ProposalStatus::Rejected
        };
        prop_assert_eq!(proposal.status, expected);
    }
}
