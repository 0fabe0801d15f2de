//! Governance parameters.

use crate::governance::error::{GovernanceError, GovernanceResult};
use serde::{Deserialize, Serialize};

fn default_quorum() -> u32 {
    3
}

/// Governance parameters controlling proposal resolution.
///
/// The quorum is a fixed number of total votes, independent of how many
/// members exist: a proposal resolves on the vote that reaches it, however
/// large the membership grows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernanceConfig {
    /// Total votes required to resolve a proposal.
    #[serde(default = "default_quorum")]
    pub quorum: u32,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            quorum: default_quorum(),
        }
    }
}

impl GovernanceConfig {
    /// Validate parameters loaded from an external source.
    pub fn validate(&self) -> GovernanceResult<()> {
        if self.quorum == 0 {
            return Err(GovernanceError::InvalidInput(
                "Quorum must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
