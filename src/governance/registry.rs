//! Membership registry.
//!
//! Tracks which identities are members and how many exist. Membership is
//! granted lazily (first successful proposal enrolls the proposer) and is
//! never revoked, so the count only grows.

use crate::identity::MemberId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Set of registered members.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberRegistry {
    members: BTreeSet<MemberId>,
}

impl MemberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an identity. Idempotent: returns true only when the
    /// identity was not a member before.
    pub fn register(&mut self, identity: MemberId) -> bool {
        self.members.insert(identity)
    }

    /// Whether the identity is a registered member.
    pub fn is_member(&self, identity: &MemberId) -> bool {
        self.members.contains(identity)
    }

    /// Number of distinct registered members.
    pub fn count(&self) -> u64 {
        self.members.len() as u64
    }

    /// Members in sorted order.
    pub fn members(&self) -> impl Iterator<Item = &MemberId> {
        self.members.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = MemberRegistry::new();

        assert!(registry.register(MemberId::new("alice")));
        assert!(!registry.register(MemberId::new("alice")));

        assert_eq!(registry.count(), 1);
        assert!(registry.is_member(&MemberId::new("alice")));
    }

    #[test]
    fn test_count_tracks_distinct_members() {
        let mut registry = MemberRegistry::new();
        registry.register(MemberId::new("alice"));
        registry.register(MemberId::new("bob"));
        registry.register(MemberId::new("alice"));

        assert_eq!(registry.count(), 2);
    }

    #[test]
    fn test_unknown_identity_is_not_member() {
        let registry = MemberRegistry::new();
        assert!(!registry.is_member(&MemberId::new("mallory")));
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_members_iterates_sorted() {
        let mut registry = MemberRegistry::new();
        registry.register(MemberId::new("carol"));
        registry.register(MemberId::new("alice"));

        let names: Vec<&str> = registry.members().map(|m| m.as_str()).collect();
        assert_eq!(names, vec!["alice", "carol"]);
    }
}
